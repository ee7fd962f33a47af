//! Extension-keyed registry of format loaders

use super::code_file::CodeFileLoader;
use super::format::{extension_of, Format};
use super::json_file::JsonFileLoader;
use super::sdl_file::SdlFileLoader;
use crate::document::AstDocument;
use crate::error::LoaderResult;
use crate::options::LoadOptions;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Loads one file of a given format into a document
#[async_trait]
pub trait FormatLoader: Send + Sync + Debug {
    /// Format this loader handles
    fn format(&self) -> Format;

    /// Load the file at `path`.
    ///
    /// `Ok(None)` means the file was understood but deliberately yields no
    /// document.
    async fn load(&self, path: &Path, options: &LoadOptions) -> LoaderResult<Option<AstDocument>>;
}

/// Static mapping from lowercased extension to loader
#[derive(Debug, Clone)]
pub struct LoaderRegistry {
    loaders: HashMap<&'static str, Arc<dyn FormatLoader>>,
}

impl LoaderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Registry with the introspection, SDL and embedded-code loaders
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonFileLoader));
        registry.register(Arc::new(SdlFileLoader));
        registry.register(Arc::new(CodeFileLoader));
        registry
    }

    /// Register a loader for every extension of its format, replacing any
    /// earlier loader for those extensions
    pub fn register(&mut self, loader: Arc<dyn FormatLoader>) {
        for extension in loader.format().extensions() {
            self.loaders.insert(*extension, Arc::clone(&loader));
        }
    }

    pub fn lookup(&self, path: &Path) -> Option<&Arc<dyn FormatLoader>> {
        let extension = extension_of(path)?;
        self.loaders.get(extension.as_str())
    }

    /// Registered extensions, sorted
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut extensions: Vec<&'static str> = self.loaders.keys().copied().collect();
        extensions.sort_unstable();
        extensions
    }

    /// Dispatch on extension; unsupported files yield no document
    pub async fn load_file(
        &self,
        path: &Path,
        options: &LoadOptions,
    ) -> LoaderResult<Option<AstDocument>> {
        match self.lookup(path) {
            Some(loader) => loader.load(path, options).await,
            None => {
                debug!(path = %path.display(), "Skipping file with unsupported extension");
                Ok(None)
            }
        }
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
