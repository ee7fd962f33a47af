//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

use crate::cli::LoadArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use gqlpoint_core::{FilterPolicy, LoadOptions, Pointers, TypedefsLoader, HEADERS_EXTENSION};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle the load command
pub async fn handle_load(args: LoadArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let cwd = resolve_cwd(args.cwd.as_deref())?;
    let options = build_options(&args, config)?;
    let filter = build_filter(&args);

    for (name, value) in options.string_map_extension(HEADERS_EXTENSION)? {
        debug!(header = %name, value = %redaction::redact_header(&name, &value), "Request header");
    }

    output.info(&format!(
        "Loading {} pointer(s) from {}",
        args.pointers.len(),
        cwd.display()
    ))?;

    let timer = Timer::with_details("load", &args.pointers.join(", "));
    let pointers = Pointers::from(args.pointers);
    let documents = TypedefsLoader::new()
        .load(&pointers, &options, &filter, &cwd)
        .await?;
    let elapsed = timer.elapsed();
    drop(timer);

    info!(
        sources = documents.len(),
        filter = %filter,
        duration_ms = elapsed.as_millis() as u64,
        "Load finished"
    );

    output.documents(&documents, args.merge)?;
    output.success(&format!(
        "Loaded {} source(s) in {} ms",
        documents.len(),
        elapsed.as_millis()
    ))
}

/// Handle the kinds command
pub fn handle_kinds(output: &mut OutputWriter) -> Result<()> {
    output.kinds()
}

/// `--cwd` resolved against the process working directory
fn resolve_cwd(requested: Option<&Path>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    let cwd = match requested {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => current.join(dir),
        None => current,
    };
    if !cwd.is_dir() {
        return Err(Error::invalid_args(format!(
            "--cwd '{}' is not a directory",
            cwd.display()
        )));
    }
    Ok(cwd)
}

/// Configured options with command-line flags layered on top
fn build_options(args: &LoadArgs, config: &Config) -> Result<LoadOptions> {
    let mut options = config.load.clone();
    options.ignore.extend(args.ignore.iter().cloned());
    options.no_require |= args.no_require;

    if !args.headers.is_empty() {
        let mut headers = match options.extensions.remove(HEADERS_EXTENSION) {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(existing)) => existing,
            Some(_) => {
                return Err(Error::config(format!(
                    "load.extensions.{} must be a map of header names to values",
                    HEADERS_EXTENSION
                )))
            }
        };
        for (name, value) in &args.headers {
            headers.insert(name.clone(), Value::String(value.clone()));
        }
        options
            .extensions
            .insert(HEADERS_EXTENSION.to_string(), Value::Object(headers));
    }

    Ok(options)
}

/// `--documents` and `--schema` pick a group, `--exclude-kind` adds to it
fn build_filter(args: &LoadArgs) -> FilterPolicy {
    let base = if args.documents {
        FilterPolicy::non_operations()
    } else if args.schema {
        FilterPolicy::operations()
    } else {
        FilterPolicy::none()
    };
    base.kinds()
        .chain(args.exclude_kinds.iter().copied())
        .collect::<FilterPolicy>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands, OutputFormat};
    use clap::Parser;
    use gqlpoint_core::Kind;
    use std::fs;
    use tempfile::NamedTempFile;

    fn load_args(argv: &[&str]) -> LoadArgs {
        let mut full = vec!["gqlpoint", "load"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Commands::Load(args) => args,
            other => panic!("expected load, got {:?}", other),
        }
    }

    fn json_writer() -> (OutputWriter, NamedTempFile) {
        let file = NamedTempFile::new().unwrap();
        let output = OutputWriter::with_writers(
            OutputFormat::Json,
            false,
            true,
            Box::new(file.reopen().unwrap()),
            Box::new(std::io::sink()),
        );
        (output, file)
    }

    #[test]
    fn test_filter_groups() {
        let filter = build_filter(&load_args(&["x.graphql", "--documents"]));
        assert!(filter.excludes(Kind::ObjectTypeDefinition));
        assert!(!filter.excludes(Kind::OperationDefinition));

        let filter = build_filter(&load_args(&[
            "x.graphql",
            "--schema",
            "--exclude-kind",
            "DirectiveDefinition",
        ]));
        assert!(filter.excludes(Kind::FragmentDefinition));
        assert!(filter.excludes(Kind::DirectiveDefinition));
        assert!(!filter.excludes(Kind::ScalarTypeDefinition));

        assert!(build_filter(&load_args(&["x.graphql"])).is_empty());
    }

    #[test]
    fn test_options_layering() {
        let mut config = Config::default();
        config.load.ignore.push("legacy/**".to_string());
        config.load.extensions.insert(
            "headers".to_string(),
            serde_json::json!({ "X-Team": "core", "Authorization": "old" }),
        );

        let args = load_args(&[
            "https://example.com/graphql",
            "--ignore",
            "tmp/**",
            "--no-require",
            "--header",
            "Authorization: Bearer new",
        ]);
        let options = build_options(&args, &config).unwrap();
        assert_eq!(options.ignore, vec!["legacy/**", "tmp/**"]);
        assert!(options.no_require);

        // the core remote loader reads the same key
        let headers = options.string_map_extension(HEADERS_EXTENSION).unwrap();
        assert_eq!(headers.get("X-Team").map(String::as_str), Some("core"));
        assert_eq!(
            headers.get("Authorization").map(String::as_str),
            Some("Bearer new")
        );
    }

    #[test]
    fn test_malformed_configured_headers() {
        let mut config = Config::default();
        config
            .load
            .extensions
            .insert("headers".to_string(), serde_json::json!("nope"));
        let args = load_args(&["x.graphql", "--header", "A: b"]);
        assert!(matches!(build_options(&args, &config), Err(Error::Config(_))));
    }

    #[test]
    fn test_cwd_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_cwd(Some(dir.path())).unwrap(), dir.path());

        let file = dir.path().join("file.graphql");
        fs::write(&file, "scalar A").unwrap();
        assert!(matches!(resolve_cwd(Some(&file)), Err(Error::InvalidArgs(_))));
    }

    #[tokio::test]
    async fn test_handle_load_writes_reports() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("types.graphql"), "type User { id: ID! }").unwrap();
        fs::write(dir.path().join("ops.graphql"), "query Me { me { id } }").unwrap();

        let cwd = dir.path().to_string_lossy().to_string();
        let args = load_args(&["./*.graphql", "--schema", "--cwd", &cwd]);
        let (mut output, file) = json_writer();
        handle_load(args, &Config::default(), &mut output).await.unwrap();

        let written = fs::read_to_string(file.path()).unwrap();
        let reports: serde_json::Value = serde_json::from_str(written.trim()).unwrap();
        let reports = reports.as_array().unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0]["file_path"]
            .as_str()
            .unwrap()
            .ends_with("types.graphql"));
        assert_eq!(reports[0]["names"], serde_json::json!(["User"]));
    }

    #[tokio::test]
    async fn test_handle_load_without_matches() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().to_string_lossy().to_string();
        let args = load_args(&["./*.graphql", "--cwd", &cwd]);
        let (mut output, _file) = json_writer();

        let err = handle_load(args, &Config::default(), &mut output)
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
