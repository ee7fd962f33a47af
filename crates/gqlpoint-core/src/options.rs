//! Caller options for a load
//!
//! Copyright (c) 2025 Gqlpoint Team
//! Licensed under the Apache-2.0 license

use crate::error::{LoaderError, LoaderResult};
use crate::pluck::TagPluckConfig;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Options shared by every loader in a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LoadOptions {
    /// Glob patterns excluded from expansion
    #[serde(deserialize_with = "one_or_many")]
    pub ignore: Vec<String>,
    /// Settings for the embedded-code extractor
    pub tag_pluck: TagPluckConfig,
    /// Skip code files without tagged SDL instead of failing them
    pub no_require: bool,
    /// Collaborator-specific settings, passed through untouched
    pub extensions: Map<String, Value>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore(mut self, pattern: impl Into<String>) -> Self {
        self.ignore.push(pattern.into());
        self
    }

    pub fn with_tag_pluck(mut self, config: TagPluckConfig) -> Self {
        self.tag_pluck = config;
        self
    }

    pub fn with_no_require(mut self, no_require: bool) -> Self {
        self.no_require = no_require;
        self
    }

    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Read `extensions.<key>` as a flat string map.
    ///
    /// Missing keys give an empty map. Non-string values are rendered with
    /// their JSON form so numeric header values still work.
    pub fn string_map_extension(&self, key: &str) -> LoaderResult<BTreeMap<String, String>> {
        let Some(value) = self.extension(key) else {
            return Ok(BTreeMap::new());
        };
        let object = value
            .as_object()
            .ok_or_else(|| LoaderError::invalid_extension(key, "expected an object"))?;

        object
            .iter()
            .map(|(name, value)| match value {
                Value::String(s) => Ok((name.clone(), s.clone())),
                Value::Number(_) | Value::Bool(_) => Ok((name.clone(), value.to_string())),
                _ => Err(LoaderError::invalid_extension(
                    key,
                    format!("value for '{}' must be a string", name),
                )),
            })
            .collect()
    }

    /// Read `extensions.<key>` as a string, if present
    pub fn string_extension(&self, key: &str) -> LoaderResult<Option<&str>> {
        match self.extension(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(LoaderError::invalid_extension(key, "expected a string")),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(pattern) => vec![pattern],
        OneOrMany::Many(patterns) => patterns,
    })
}
