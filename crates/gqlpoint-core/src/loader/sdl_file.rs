//! Loader for native GraphQL SDL files

use super::format::{read_file, Format};
use super::registry::FormatLoader;
use crate::document::AstDocument;
use crate::error::LoaderResult;
use crate::options::LoadOptions;
use async_trait::async_trait;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct SdlFileLoader;

#[async_trait]
impl FormatLoader for SdlFileLoader {
    fn format(&self) -> Format {
        Format::Sdl
    }

    async fn load(&self, path: &Path, _options: &LoadOptions) -> LoaderResult<Option<AstDocument>> {
        let content = read_file(path).await?;
        AstDocument::parse(&content, &path.display().to_string()).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoaderError;
    use std::fs;

    #[tokio::test]
    async fn test_loads_sdl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.graphql");
        fs::write(&path, "type User { id: ID! }\nextend type User { name: String }\n").unwrap();

        let document = SdlFileLoader
            .load(&path, &LoadOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(document.len(), 2);
    }

    #[tokio::test]
    async fn test_syntax_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.gql");
        fs::write(&path, "type User {").unwrap();

        let err = SdlFileLoader.load(&path, &LoadOptions::default()).await.unwrap_err();
        assert!(matches!(err, LoaderError::SyntaxError { .. }));
        assert!(err.to_string().contains("broken.gql"));
    }
}
