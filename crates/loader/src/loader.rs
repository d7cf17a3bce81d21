use std::path::{Path, PathBuf};

use mergegate_schema::SchemaDocument;
use tracing::instrument;

use crate::{LoadError, RemoteSchema, UrlResolver};

const SCHEMA_EXTENSION: &str = "graphql";

/// Loads every `*.graphql` file of `dir`, sorted by file name.
#[instrument(skip_all, fields(dir = %dir.as_ref().display()), err(Debug), level = "debug")]
pub fn load_dir(dir: impl AsRef<Path>, resolver: &UrlResolver) -> Result<Vec<RemoteSchema>, LoadError> {
    let dir = dir.as_ref();
    let read_dir_error = |source| LoadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let path = entry.map_err(read_dir_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == SCHEMA_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();

    paths.into_iter().map(|path| load_file(path, resolver)).collect()
}

fn load_file(path: PathBuf, resolver: &UrlResolver) -> Result<RemoteSchema, LoadError> {
    let sdl = match std::fs::read_to_string(&path) {
        Ok(sdl) => sdl,
        Err(source) => return Err(LoadError::ReadFile { path, source }),
    };
    let document = match SchemaDocument::parse(&sdl) {
        Ok(document) => document,
        Err(source) => return Err(LoadError::Parse { path, source }),
    };

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let url = resolver.resolve(&name)?;

    tracing::info!(service = %name, url = %url, types = document.types.len(), "Schema loaded.");
    Ok(RemoteSchema { name, url, document })
}
