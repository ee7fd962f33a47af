//! Merging and kind filtering across loaded sources

use crate::document::{AstDocument, FilterPolicy, Kind};
use tracing::debug;

/// One pointer or file after loading; `document` is `None` when loading it failed
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub file_path: String,
    pub document: Option<AstDocument>,
}

impl LoadedSource {
    pub fn new(file_path: impl Into<String>, document: Option<AstDocument>) -> Self {
        Self {
            file_path: file_path.into(),
            document,
        }
    }

    /// Present and holding at least one definition
    pub fn has_definitions(&self) -> bool {
        self.document.as_ref().is_some_and(|d| !d.is_empty())
    }
}

/// A source that survived loading, filtering and validation
#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub file_path: String,
    pub content: AstDocument,
}

/// Concatenate every loaded document in source order
pub fn merge_sources(sources: &[LoadedSource]) -> AstDocument {
    AstDocument::concat(sources.iter().filter_map(|s| s.document.as_ref()))
}

/// Log every definition of the merged document the policy would drop and
/// return their kinds
pub fn report_filtered_kinds(merged: &AstDocument, policy: &FilterPolicy) -> Vec<Kind> {
    let filtered: Vec<Kind> = merged.kinds().filter(|kind| policy.excludes(*kind)).collect();
    for kind in &filtered {
        debug!(kind = %kind, policy = %policy, "Filtered document of kind {} due to filter policy ({})", kind, policy);
    }
    filtered
}

/// Give each source its own copy without excluded definitions
pub fn filter_sources(sources: Vec<LoadedSource>, policy: &FilterPolicy) -> Vec<LoadedSource> {
    if policy.is_empty() {
        return sources;
    }
    sources
        .into_iter()
        .map(|source| LoadedSource {
            document: source.document.map(|d| d.without_kinds(policy)),
            file_path: source.file_path,
        })
        .collect()
}

/// Report excluded kinds across all sources, then filter each source
/// independently
pub fn aggregate(sources: Vec<LoadedSource>, policy: &FilterPolicy) -> Vec<LoadedSource> {
    if policy.is_empty() {
        return sources;
    }
    let merged = merge_sources(&sources);
    if !merged.is_empty() {
        report_filtered_kinds(&merged, policy);
    }
    filter_sources(sources, policy)
}
