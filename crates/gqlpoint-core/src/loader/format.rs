//! File formats recognised by extension
//!
//! Copyright (c) 2025 Gqlpoint Team
//! Licensed under the Apache-2.0 license

use crate::error::{LoaderError, LoaderResult};
use std::path::Path;

/// Supported source file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON introspection result (.json)
    Introspection,
    /// Native GraphQL SDL (.graphql, .graphqls, .gql)
    Sdl,
    /// JavaScript or TypeScript with embedded GraphQL (.ts, .tsx, .js, .jsx)
    Code,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Introspection, Format::Sdl, Format::Code];

    /// Detect format from file extension; `None` for anything unrecognised
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = extension_of(path)?;
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }

    /// Get file extensions for this format
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Format::Introspection => &["json"],
            Format::Sdl => &["graphql", "graphqls", "gql"],
            Format::Code => &["ts", "tsx", "js", "jsx"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Format::Introspection => "introspection",
            Format::Sdl => "sdl",
            Format::Code => "code",
        }
    }
}

/// Lowercased extension without the dot
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
}

/// Read a whole file as UTF-8 text
pub async fn read_file(path: &Path) -> LoaderResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| LoaderError::io_error(path, e))
}
