//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use gqlpoint_core::Kind;
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// gqlpoint - load GraphQL documents from SDL, files, globs, URLs and introspection
///
/// Every pointer is classified on its own: inline SDL text, a file path, a
/// glob pattern or a remote endpoint. Loaded sources can be filtered by
/// definition kind and printed as SDL or structured data.
#[derive(Parser, Debug)]
#[command(
    name = "gqlpoint",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GQLPOINT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load, filter and print GraphQL documents
    Load(LoadArgs),

    /// List the definition kinds accepted by --exclude-kind
    Kinds,
}

/// Arguments for the load command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Inline SDL, file path, glob pattern, or http(s) endpoint
    #[arg(value_name = "POINTER", required = true)]
    pub pointers: Vec<String>,

    /// Glob pattern to leave out of glob expansion (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub ignore: Vec<String>,

    /// Definition kind to drop, e.g. OperationDefinition (repeatable)
    #[arg(long = "exclude-kind", value_name = "KIND")]
    pub exclude_kinds: Vec<Kind>,

    /// Keep only operations and fragments
    #[arg(long, conflicts_with = "schema")]
    pub documents: bool,

    /// Keep only type system definitions
    #[arg(long)]
    pub schema: bool,

    /// Print every source merged into one document
    #[arg(long)]
    pub merge: bool,

    /// Directory that relative paths and globs resolve against
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Skip code files without tagged GraphQL instead of failing them
    #[arg(long)]
    pub no_require: bool,

    /// Extra request header for remote endpoints (repeatable)
    #[arg(long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (SDL)
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

/// Parse `Name: value` into a header pair
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header name is empty in '{}'", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}
