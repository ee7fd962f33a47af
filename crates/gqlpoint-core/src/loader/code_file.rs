//! Loader for JavaScript and TypeScript files with embedded GraphQL

use super::format::{read_file, Format};
use super::registry::FormatLoader;
use crate::document::AstDocument;
use crate::error::{LoaderError, LoaderResult};
use crate::options::LoadOptions;
use crate::pluck::pluck;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;

/// Extracts tagged template literals and parses their concatenation
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeFileLoader;

#[async_trait]
impl FormatLoader for CodeFileLoader {
    fn format(&self) -> Format {
        Format::Code
    }

    async fn load(&self, path: &Path, options: &LoadOptions) -> LoaderResult<Option<AstDocument>> {
        let content = read_file(path).await?;
        let fragments = pluck(&content, &options.tag_pluck, path)?;

        if fragments.is_empty() {
            if options.no_require {
                debug!(path = %path.display(), "No tagged GraphQL, skipping");
                return Ok(None);
            }
            return Err(LoaderError::no_tagged_definitions(path));
        }

        debug!(path = %path.display(), fragments = fragments.len(), "Plucked GraphQL from code file");
        AstDocument::parse(&fragments.join("\n\n"), &path.display().to_string()).map(Some)
    }
}
