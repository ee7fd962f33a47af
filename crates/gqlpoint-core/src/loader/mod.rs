//! Source loading: format loaders, the filesystem fan-out and remote schemas
//!
//! Every file is dispatched on its lowercased extension through a
//! [`LoaderRegistry`]; each registered [`FormatLoader`] turns one file into
//! an [`AstDocument`](crate::document::AstDocument).
//!
//! Copyright (c) 2025 Gqlpoint Team
//! Licensed under the Apache-2.0 license

pub mod code_file;
pub mod filesystem;
pub mod format;
pub mod json_file;
pub mod registry;
pub mod remote;
pub mod sdl_file;

pub use code_file::CodeFileLoader;
pub use filesystem::{expand_braces, is_relevant_file, resolve_path, FileSystemLoader};
pub use format::Format;
pub use json_file::JsonFileLoader;
pub use registry::{FormatLoader, LoaderRegistry};
pub use remote::{UrlLoader, HEADERS_EXTENSION, METHOD_EXTENSION};
pub use sdl_file::SdlFileLoader;
