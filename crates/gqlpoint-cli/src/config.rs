//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON/TOML)
//! - Command-line arguments, which take precedence

use crate::error::{Error, Result};
use crate::logging::LogFormat;
use gqlpoint_core::LoadOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json", "toml"];

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Options handed to the loading pipeline
    pub load: LoadOptions,

    /// Logging settings
    pub logging: LoggingSettings,

    /// Output settings
    pub output: OutputSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,

    /// Log format (compact, full, json)
    pub format: Option<LogFormat>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Use colored output by default
    pub color: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self { color: true }
    }
}

impl Config {
    /// Load configuration from a file, picking the format by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_lowercase);
        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::config(format!(
                    "unsupported config file '{}', expected one of: {}",
                    path.display(),
                    CONFIG_EXTENSIONS.join(", ")
                )))
            }
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load(cwd: &Path) -> Result<Self> {
        for path in Self::default_config_paths(cwd) {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        // Return default config if no config file found
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>, cwd: &Path) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(cwd),
        }
    }

    /// Project files first, then the user config directory
    fn default_config_paths(cwd: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = CONFIG_EXTENSIONS
            .iter()
            .map(|ext| cwd.join(format!(".gqlpoint.{}", ext)))
            .collect();

        if let Some(config_dir) = dirs::config_dir() {
            let gqlpoint_dir = config_dir.join("gqlpoint");
            paths.extend(
                CONFIG_EXTENSIONS
                    .iter()
                    .map(|ext| gqlpoint_dir.join(format!("config.{}", ext))),
            );
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gqlpoint.yaml");
        fs::write(
            &path,
            "load:\n  ignore: '**/legacy/**'\n  no_require: true\n  extensions:\n    headers:\n      x-api-key: abc\nlogging:\n  format: json\n",
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.load.ignore, vec!["**/legacy/**"]);
        assert!(config.load.no_require);
        assert_eq!(config.logging.format, Some(LogFormat::Json));
        assert!(config.output.color);
        assert_eq!(
            config.load.string_map_extension("headers").unwrap().get("x-api-key").map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn test_toml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gqlpoint.toml");
        fs::write(
            &path,
            "[load]\nignore = [\"a/**\", \"b/**\"]\n\n[load.tag_pluck]\nidentifiers = [\"schema\"]\n\n[output]\ncolor = false\n",
        )
        .unwrap();

        let config = Config::load_with_file(Some(&path), dir.path()).unwrap();
        assert_eq!(config.load.ignore, vec!["a/**", "b/**"]);
        assert_eq!(config.load.tag_pluck.identifiers, vec!["schema"]);
        assert_eq!(config.load.tag_pluck.magic_comment, "GraphQL");
        assert!(!config.output.color);
    }

    #[test]
    fn test_explicit_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(
            Config::load_with_file(Some(&missing), dir.path()),
            Err(Error::FileNotFound { .. })
        ));

        let odd = dir.path().join("config.ini");
        fs::write(&odd, "x=1").unwrap();
        assert!(matches!(Config::from_file(&odd), Err(Error::Config(_))));
    }
}
