//! Error types for document loading operations
//!
//! Copyright (c) 2025 Gqlpoint Team
//! Licensed under the Apache-2.0 license

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for loader operations
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Error types for every stage of the loading pipeline
#[derive(Error, Debug)]
pub enum LoaderError {
    /// File I/O errors
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A literal path that does not exist on disk
    #[error("Unable to locate local file: {path}")]
    FileNotFound { path: PathBuf },

    /// An introspection file that exists but has no content
    #[error("Unable to read local introspection file: {path}")]
    EmptyContent { path: PathBuf },

    /// JSON parsing errors
    #[error("Failed to parse JSON file '{path}': {source}")]
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Introspection JSON without a `__schema` root
    #[error("Invalid schema provided! '{path}' has no __schema root")]
    InvalidSchema { path: PathBuf },

    /// Introspection JSON that cannot be turned into a client schema
    #[error("Invalid or incomplete introspection result in '{path}': {reason}")]
    IncompleteIntrospection { path: PathBuf, reason: String },

    /// GraphQL syntax errors reported by the parser
    #[error("Syntax error in '{source_name}': {message}")]
    SyntaxError {
        source_name: String,
        message: String,
    },

    /// A document that parsed but holds no definitions
    #[error("No GraphQL definitions found in '{source_name}'")]
    EmptyDocument { source_name: String },

    /// Embedded code with a template literal that never closes
    #[error("Unterminated template literal in '{path}' at byte {offset}")]
    UnterminatedTemplate { path: PathBuf, offset: usize },

    /// Embedded code without any tagged GraphQL
    #[error("No tagged GraphQL definitions found in '{path}'")]
    NoTaggedDefinitions { path: PathBuf },

    /// Tag pluck configuration that cannot be compiled into a matcher
    #[error("Invalid tag pluck configuration: {reason}")]
    PluckConfig { reason: String },

    /// Transport errors while fetching a remote schema
    #[error("Failed to fetch remote schema '{url}': {source}")]
    HttpError { url: String, source: reqwest::Error },

    /// Remote schema endpoint answered with a non-success status
    #[error("Remote schema '{url}' responded with HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// URI pointer whose scheme has no loader
    #[error("Unsupported URI scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    /// Malformed collaborator setting in the options extension map
    #[error("Invalid value for option '{key}': {reason}")]
    InvalidExtension { key: String, reason: String },

    /// Glob pattern errors
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    GlobPattern { pattern: String, reason: String },

    /// Definition kind name that is not recognised
    #[error("Unknown definition kind '{name}'")]
    UnknownKind { name: String },

    /// Nothing usable survived loading and filtering
    #[error(
        "Unable to find any GraphQL type definitions for the following pointers: {}",
        pointers.join(", ")
    )]
    NoDefinitionsFound { pointers: Vec<String> },
}

impl From<std::io::Error> for LoaderError {
    fn from(error: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::from("<unknown>"),
            source: error,
        }
    }
}

impl LoaderError {
    /// Create an I/O error with path context, mapping `NotFound` to [`LoaderError::FileNotFound`]
    pub fn io_error(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        let path = path.into();
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::IoError {
                path,
                source: error,
            }
        }
    }

    pub fn empty_content(path: impl Into<PathBuf>) -> Self {
        Self::EmptyContent { path: path.into() }
    }

    /// Create a JSON parsing error with path context
    pub fn json_parse_error(path: impl Into<PathBuf>, error: serde_json::Error) -> Self {
        Self::JsonParseError {
            path: path.into(),
            source: error,
        }
    }

    pub fn invalid_schema(path: impl Into<PathBuf>) -> Self {
        Self::InvalidSchema { path: path.into() }
    }

    pub fn incomplete_introspection(path: &Path, reason: impl Into<String>) -> Self {
        Self::IncompleteIntrospection {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a syntax error for a named source (file path, URL or inline text)
    pub fn syntax_error(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn empty_document(source_name: impl Into<String>) -> Self {
        Self::EmptyDocument {
            source_name: source_name.into(),
        }
    }

    pub fn unterminated_template(path: &Path, offset: usize) -> Self {
        Self::UnterminatedTemplate {
            path: path.to_path_buf(),
            offset,
        }
    }

    pub fn no_tagged_definitions(path: &Path) -> Self {
        Self::NoTaggedDefinitions {
            path: path.to_path_buf(),
        }
    }

    /// Create a transport error for a remote schema
    pub fn http_error(url: impl Into<String>, error: reqwest::Error) -> Self {
        Self::HttpError {
            url: url.into(),
            source: error,
        }
    }

    pub fn invalid_extension(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidExtension {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a glob pattern error
    pub fn glob_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GlobPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create the aggregate error raised when no source survives
    pub fn no_definitions_found(pointers: &[String]) -> Self {
        Self::NoDefinitionsFound {
            pointers: pointers.to_vec(),
        }
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::IoError { path, .. }
            | Self::FileNotFound { path }
            | Self::EmptyContent { path }
            | Self::JsonParseError { path, .. }
            | Self::InvalidSchema { path }
            | Self::IncompleteIntrospection { path, .. }
            | Self::UnterminatedTemplate { path, .. }
            | Self::NoTaggedDefinitions { path } => Some(path),
            _ => None,
        }
    }

    /// Whether this error fails a literal file pointer instead of being
    /// absorbed as a missing document.
    ///
    /// Format validation failures are fatal; everything else that can go wrong
    /// with one file (missing, unreadable, bad syntax) is not. Files reached
    /// through glob expansion absorb every error regardless.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidSchema { .. }
                | Self::EmptyContent { .. }
                | Self::IncompleteIntrospection { .. }
                | Self::UnterminatedTemplate { .. }
        )
    }
}
