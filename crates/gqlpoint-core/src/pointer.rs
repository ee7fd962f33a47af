//! Pointer normalization and classification
//!
//! A pointer is whatever string the caller handed us: inline SDL, a file
//! path, a glob pattern or a URI. Nothing declares which; [`classify`] infers it.

use crate::document::AstDocument;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

static EXTENSION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn extension_pattern() -> &'static Regex {
    EXTENSION_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\.[a-z0-9]+$").expect("extension pattern is a valid regex")
    })
}

/// Ordered list of pointers; order preserved, duplicates kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pointers(Vec<String>);

impl Pointers {
    pub fn new(pointers: Vec<String>) -> Self {
        Self(pointers)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for Pointers {
    fn from(pointer: &str) -> Self {
        Self(vec![pointer.to_string()])
    }
}

impl From<String> for Pointers {
    fn from(pointer: String) -> Self {
        Self(vec![pointer])
    }
}

impl From<&String> for Pointers {
    fn from(pointer: &String) -> Self {
        Self(vec![pointer.clone()])
    }
}

impl From<Vec<String>> for Pointers {
    fn from(pointers: Vec<String>) -> Self {
        Self(pointers)
    }
}

impl From<Vec<&str>> for Pointers {
    fn from(pointers: Vec<&str>) -> Self {
        pointers.into_iter().map(str::to_string).collect()
    }
}

impl From<&[&str]> for Pointers {
    fn from(pointers: &[&str]) -> Self {
        pointers.iter().map(|p| p.to_string()).collect()
    }
}

impl From<&[String]> for Pointers {
    fn from(pointers: &[String]) -> Self {
        Self(pointers.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for Pointers {
    fn from(pointers: [&str; N]) -> Self {
        pointers.iter().map(|p| p.to_string()).collect()
    }
}

impl FromIterator<String> for Pointers {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Pointers {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// What a pointer turned out to be
#[derive(Debug, Clone)]
pub enum PointerSource {
    /// SDL text, already parsed
    Inline(AstDocument),
    /// Remote schema endpoint
    Uri(Url),
    /// Literal filesystem path
    File(String),
    /// Glob pattern to expand against the working directory
    Glob(String),
}

impl PointerSource {
    pub fn kind_name(&self) -> &'static str {
        match self {
            PointerSource::Inline(_) => "inline",
            PointerSource::Uri(_) => "uri",
            PointerSource::File(_) => "file",
            PointerSource::Glob(_) => "glob",
        }
    }

    /// File or glob
    pub fn is_path_like(&self) -> bool {
        matches!(self, PointerSource::File(_) | PointerSource::Glob(_))
    }
}

/// Classify a pointer.
///
/// A trailing `.ext` skips the SDL parse so that bare file names are never
/// fed to the parser; URIs are still recognised there. Otherwise SDL wins
/// over URI, and URI wins over path.
pub fn classify(pointer: &str) -> PointerSource {
    let source = if has_file_extension(pointer) {
        parse_uri(pointer)
            .map(PointerSource::Uri)
            .unwrap_or_else(|| path_like(pointer))
    } else if let Ok(document) = AstDocument::parse(pointer, pointer) {
        PointerSource::Inline(document)
    } else if let Some(url) = parse_uri(pointer) {
        PointerSource::Uri(url)
    } else {
        path_like(pointer)
    };

    debug!(pointer = %pointer, kind = source.kind_name(), "Classified pointer");
    source
}

/// Ends in `.` followed by ASCII letters or digits
pub fn has_file_extension(pointer: &str) -> bool {
    extension_pattern().is_match(pointer)
}

/// Contains glob metacharacters or brace alternatives
pub fn is_glob(pointer: &str) -> bool {
    pointer.starts_with('!')
        || pointer.contains(['*', '?', '['])
        || (pointer.contains('{') && pointer.contains('}'))
}

fn path_like(pointer: &str) -> PointerSource {
    if is_glob(pointer) {
        PointerSource::Glob(pointer.to_string())
    } else {
        PointerSource::File(pointer.to_string())
    }
}

/// Absolute URI with a real scheme; single-letter schemes are Windows drives
fn parse_uri(pointer: &str) -> Option<Url> {
    Url::parse(pointer.trim())
        .ok()
        .filter(|url| url.scheme().len() > 1)
}
