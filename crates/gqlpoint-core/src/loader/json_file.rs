//! Loader for JSON introspection files

use super::format::{read_file, Format};
use super::registry::FormatLoader;
use crate::document::AstDocument;
use crate::error::{LoaderError, LoaderResult};
use crate::introspection::{parse_introspection, ClientSchema};
use crate::options::LoadOptions;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Builds a client schema from introspection JSON, prints it and reparses it
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileLoader;

impl JsonFileLoader {
    /// Convert introspection text that did not come from disk
    pub fn load_str(content: &str, path: &Path) -> LoaderResult<AstDocument> {
        let schema = parse_introspection(content, path)?;
        let client = ClientSchema::build(schema, path)?;
        client.to_document(&path.display().to_string())
    }
}

#[async_trait]
impl FormatLoader for JsonFileLoader {
    fn format(&self) -> Format {
        Format::Introspection
    }

    async fn load(&self, path: &Path, _options: &LoadOptions) -> LoaderResult<Option<AstDocument>> {
        let content = read_file(path).await?;
        if content.is_empty() {
            return Err(LoaderError::empty_content(path));
        }

        let document = Self::load_str(&content, path)?;
        debug!(path = %path.display(), definitions = document.len(), "Loaded introspection file");
        Ok(Some(document))
    }
}
