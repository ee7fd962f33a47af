//! # gqlpoint-core
//!
//! Resolve GraphQL "pointers" (inline SDL, file paths, glob patterns,
//! introspection JSON files and remote endpoints) into parsed documents,
//! optionally dropping unwanted definition kinds.
//!
//! ```rust,no_run
//! use gqlpoint_core::{load_typedefs, FilterPolicy, LoadOptions};
//! use std::path::Path;
//!
//! # async fn run() -> gqlpoint_core::LoaderResult<()> {
//! let documents = load_typedefs(
//!     vec!["./schema/**/*.graphql", "scalar Date"],
//!     &LoadOptions::default(),
//!     &FilterPolicy::operations(),
//!     Path::new("/srv/app"),
//! )
//! .await?;
//!
//! for document in &documents {
//!     println!("{}: {} definitions", document.file_path, document.content.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod document;
pub mod error;
pub mod introspection;
pub mod loader;
pub mod options;
pub mod pipeline;
pub mod pluck;
pub mod pointer;
pub mod validate;

pub use aggregate::{DocumentFile, LoadedSource};
pub use document::{AstDocument, FilterPolicy, Kind, NON_OPERATION_KINDS, OPERATION_KINDS};
pub use error::{LoaderError, LoaderResult};
pub use loader::{
    Format, FormatLoader, LoaderRegistry, UrlLoader, HEADERS_EXTENSION, METHOD_EXTENSION,
};
pub use options::LoadOptions;
pub use pipeline::{
    load_documents, load_schema_typedefs, load_single_file, load_typedefs, merge_typedefs,
    TypedefsLoader,
};
pub use pluck::TagPluckConfig;
pub use pointer::{classify, PointerSource, Pointers};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
