//! End-to-end loading: classify, load, filter, validate
//!
//! Copyright (c) 2025 Gqlpoint Team
//! Licensed under the Apache-2.0 license

use crate::aggregate::{aggregate, DocumentFile, LoadedSource};
use crate::document::{AstDocument, FilterPolicy};
use crate::error::LoaderResult;
use crate::loader::{resolve_path, FileSystemLoader, LoaderRegistry, UrlLoader};
use crate::options::LoadOptions;
use crate::pointer::{classify, PointerSource, Pointers};
use crate::validate::validate_results;
use std::path::Path;
use tracing::{info, instrument};

/// Loads GraphQL definitions from any mix of pointers
#[derive(Debug, Clone, Default)]
pub struct TypedefsLoader {
    registry: LoaderRegistry,
    url_loader: UrlLoader,
}

impl TypedefsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the format registry
    pub fn with_registry(mut self, registry: LoaderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the remote schema loader
    pub fn with_url_loader(mut self, url_loader: UrlLoader) -> Self {
        self.url_loader = url_loader;
        self
    }

    pub fn registry(&self) -> &LoaderRegistry {
        &self.registry
    }

    /// Load every pointer in order, drop the kinds `filter` excludes and
    /// return the sources that still hold definitions.
    ///
    /// Pointers are processed one after another; files matched by one glob
    /// are loaded concurrently.
    #[instrument(skip_all, fields(pointers = pointers.len(), cwd = %cwd.display()))]
    pub async fn load(
        &self,
        pointers: &Pointers,
        options: &LoadOptions,
        filter: &FilterPolicy,
        cwd: &Path,
    ) -> LoaderResult<Vec<DocumentFile>> {
        let filesystem = FileSystemLoader::new(&self.registry, options, cwd);

        let mut found = Vec::new();
        for pointer in pointers {
            let sources = self.load_pointer(pointer, &filesystem, options).await?;
            found.extend(sources);
        }

        let documents = validate_results(aggregate(found, filter), pointers)?;
        info!(
            sources = documents.len(),
            definitions = documents.iter().map(|d| d.content.len()).sum::<usize>(),
            "Loaded GraphQL definitions"
        );
        Ok(documents)
    }

    async fn load_pointer(
        &self,
        pointer: &str,
        filesystem: &FileSystemLoader<'_>,
        options: &LoadOptions,
    ) -> LoaderResult<Vec<LoadedSource>> {
        match classify(pointer) {
            PointerSource::Inline(document) => Ok(vec![LoadedSource::new(pointer, Some(document))]),
            PointerSource::File(path) => filesystem.load_path(&path).await,
            PointerSource::Glob(pattern) => filesystem.load_glob(&pattern).await,
            PointerSource::Uri(url) => {
                let document = self.url_loader.load(&url, options).await?;
                Ok(vec![LoadedSource::new(pointer, Some(document))])
            }
        }
    }

    /// Load one file, resolved against `cwd`, by its extension.
    ///
    /// Errors are returned as they are; unsupported extensions yield `None`.
    pub async fn load_single_file(
        &self,
        path: &str,
        options: &LoadOptions,
        cwd: &Path,
    ) -> LoaderResult<Option<AstDocument>> {
        self.registry
            .load_file(&resolve_path(cwd, path), options)
            .await
    }
}

/// Load definitions from `pointers` with the default loaders
pub async fn load_typedefs(
    pointers: impl Into<Pointers>,
    options: &LoadOptions,
    filter: &FilterPolicy,
    cwd: &Path,
) -> LoaderResult<Vec<DocumentFile>> {
    TypedefsLoader::new()
        .load(&pointers.into(), options, filter, cwd)
        .await
}

/// Load operations and fragments only
pub async fn load_documents(
    pointers: impl Into<Pointers>,
    options: &LoadOptions,
    cwd: &Path,
) -> LoaderResult<Vec<DocumentFile>> {
    load_typedefs(pointers, options, &FilterPolicy::non_operations(), cwd).await
}

/// Load type system definitions only
pub async fn load_schema_typedefs(
    pointers: impl Into<Pointers>,
    options: &LoadOptions,
    cwd: &Path,
) -> LoaderResult<Vec<DocumentFile>> {
    load_typedefs(pointers, options, &FilterPolicy::operations(), cwd).await
}

/// Load one file with the default loaders
pub async fn load_single_file(
    path: &str,
    options: &LoadOptions,
    cwd: &Path,
) -> LoaderResult<Option<AstDocument>> {
    TypedefsLoader::new()
        .load_single_file(path, options, cwd)
        .await
}

/// Concatenate loaded sources into a single document
pub fn merge_typedefs(documents: &[DocumentFile]) -> AstDocument {
    AstDocument::concat(documents.iter().map(|d| &d.content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Kind;
    use std::fs;

    #[tokio::test]
    async fn test_inline_scalar() {
        let cwd = tempfile::tempdir().unwrap();
        let documents = load_typedefs("scalar Date", &LoadOptions::default(), &FilterPolicy::none(), cwd.path())
            .await
            .unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].file_path, "scalar Date");
        let kinds: Vec<Kind> = documents[0].content.kinds().collect();
        assert_eq!(kinds, vec![Kind::ScalarTypeDefinition]);
        assert_eq!(documents[0].content.defined_names(), vec!["Date"]);
    }

    #[tokio::test]
    async fn test_documents_and_schema_split() {
        let cwd = tempfile::tempdir().unwrap();
        fs::write(cwd.path().join("all.graphql"), "type Query { me: String }\nquery Me { me }\n").unwrap();
        let options = LoadOptions::default();

        let operations = load_documents("all.graphql", &options, cwd.path()).await.unwrap();
        let kinds: Vec<Kind> = operations[0].content.kinds().collect();
        assert_eq!(kinds, vec![Kind::OperationDefinition]);

        let schema = load_schema_typedefs("all.graphql", &options, cwd.path()).await.unwrap();
        let kinds: Vec<Kind> = schema[0].content.kinds().collect();
        assert_eq!(kinds, vec![Kind::ObjectTypeDefinition]);
    }

    #[tokio::test]
    async fn test_merge_typedefs() {
        let cwd = tempfile::tempdir().unwrap();
        let documents = load_typedefs(
            vec!["type A { a: Int }", "scalar B"],
            &LoadOptions::default(),
            &FilterPolicy::none(),
            cwd.path(),
        )
        .await
        .unwrap();

        let merged = merge_typedefs(&documents);
        assert_eq!(merged.type_names().into_iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_load_single_file() {
        let cwd = tempfile::tempdir().unwrap();
        fs::write(cwd.path().join("user.graphql"), "type User { id: ID }").unwrap();
        let options = LoadOptions::default();

        let document = load_single_file("user.graphql", &options, cwd.path()).await.unwrap();
        assert!(document.is_some());
        assert!(load_single_file("notes.txt", &options, cwd.path()).await.unwrap().is_none());
        assert!(load_single_file("missing.graphql", &options, cwd.path()).await.is_err());
    }
}
