use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read schema directory '{}'.", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read schema file '{}'.", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse schema file '{}': {source}", path.display())]
    Parse { path: PathBuf, source: parser::Error },

    #[error("No upstream URL for service '{service}'. Set the environment variable '{var}'.")]
    MissingUrl { service: String, var: String },
}
