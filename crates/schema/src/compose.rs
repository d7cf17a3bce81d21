use tracing::instrument;

use crate::{merge::merge, MergeError, MergeOptions, MergeOrder, SchemaDocument};

/// Merges named sources into a new schema seeded with the built-in definitions.
///
/// The accumulator is private to this call, so no intermediate state is ever
/// observable. Sources are folded in the order chosen by `options.order`.
#[instrument(skip_all, err(Debug), level = "debug")]
pub fn compose(
    sources: impl IntoIterator<Item = (String, SchemaDocument)>,
    options: &MergeOptions,
) -> Result<SchemaDocument, MergeError> {
    let mut sources: Vec<(String, SchemaDocument)> = sources.into_iter().collect();
    if options.order == MergeOrder::BySource {
        sources.sort_by(|(a, _), (b, _)| a.cmp(b));
    }

    let mut schema = SchemaDocument::with_builtins();
    for (source, document) in &sources {
        tracing::debug!(source = %source, types = document.types.len(), "Merge source.");
        merge(&mut schema, document, options)?;
    }

    tracing::info!(
        sources = sources.len(),
        types = schema.types.len(),
        directives = schema.directives.len(),
        "Schemas merged."
    );
    Ok(schema)
}
