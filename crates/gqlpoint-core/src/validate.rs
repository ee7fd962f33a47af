//! Final check that at least one source carries definitions

use crate::aggregate::{DocumentFile, LoadedSource};
use crate::error::{LoaderError, LoaderResult};
use crate::pointer::Pointers;
use tracing::debug;

/// Drop missing and empty sources; fail when nothing is left
pub fn validate_results(
    sources: Vec<LoadedSource>,
    pointers: &Pointers,
) -> LoaderResult<Vec<DocumentFile>> {
    let total = sources.len();
    let documents: Vec<DocumentFile> = sources
        .into_iter()
        .filter_map(|source| match source.document {
            Some(content) if !content.is_empty() => Some(DocumentFile {
                file_path: source.file_path,
                content,
            }),
            _ => None,
        })
        .collect();

    debug!(total, kept = documents.len(), "Validated loaded sources");
    if documents.is_empty() {
        return Err(LoaderError::no_definitions_found(pointers.as_slice()));
    }
    Ok(documents)
}
