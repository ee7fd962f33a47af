//! Extraction of GraphQL embedded in JavaScript and TypeScript sources
//!
//! Looks for template literals tagged with one of the configured identifiers
//! (`gql`, `graphql` by default) or preceded by a magic comment
//! (`/* GraphQL */`). Interpolations are dropped from the extracted text.

use crate::error::{LoaderError, LoaderResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the embedded-code extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct TagPluckConfig {
    /// Tag identifiers that mark a template literal as GraphQL
    pub identifiers: Vec<String>,
    /// Comment text that marks the following template literal as GraphQL
    pub magic_comment: String,
    /// Keep fragment indentation as written
    pub skip_indent: bool,
}

impl Default for TagPluckConfig {
    fn default() -> Self {
        Self {
            identifiers: vec!["gql".to_string(), "graphql".to_string()],
            magic_comment: "GraphQL".to_string(),
            skip_indent: false,
        }
    }
}

impl TagPluckConfig {
    fn validate(&self) -> LoaderResult<()> {
        if self.identifiers.iter().all(|id| id.is_empty()) && self.magic_comment.trim().is_empty() {
            return Err(LoaderError::PluckConfig {
                reason: "no identifiers and no magic comment configured".to_string(),
            });
        }
        if let Some(bad) = self.identifiers.iter().find(|id| !id.bytes().all(is_ident_byte)) {
            return Err(LoaderError::PluckConfig {
                reason: format!("'{}' is not a valid identifier", bad),
            });
        }
        Ok(())
    }

    fn is_tag(&self, identifier: &str) -> bool {
        !identifier.is_empty() && self.identifiers.iter().any(|id| id == identifier)
    }
}

/// Pull every tagged GraphQL fragment out of `source`, in source order.
///
/// Strings, comments and regular expression literals are skipped so that
/// backticks inside them are not taken for template literals. A `/` starts a
/// regular expression when the previous token cannot end an operand (an
/// operator, an opening bracket, a keyword such as `return`, or the start of
/// input); otherwise it is division. Untagged templates are scanned and
/// dropped. Fragments that are blank once interpolations are removed are
/// skipped.
pub fn pluck(source: &str, config: &TagPluckConfig, path: &Path) -> LoaderResult<Vec<String>> {
    config.validate()?;

    let bytes = source.as_bytes();
    let mut fragments = Vec::new();
    let mut magic = false;
    // last significant byte outside comments, for telling regex from division
    let mut last: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = find_byte(bytes, b'\n', i).unwrap_or(bytes.len());
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let close = source[i + 2..]
                    .find("*/")
                    .map(|p| i + 2 + p)
                    .unwrap_or(bytes.len());
                magic = source[i + 2..close].trim() == config.magic_comment.trim()
                    && !config.magic_comment.trim().is_empty();
                i = (close + 2).min(bytes.len());
            }
            b'/' if starts_regex(source, i, last) => {
                i = skip_regex(bytes, i + 1);
                magic = false;
                last = Some(b'/');
            }
            quote @ (b'\'' | b'"') => {
                i = skip_string(bytes, i + 1, quote);
                magic = false;
                last = Some(quote);
            }
            b'`' => {
                let tagged = magic || config.is_tag(identifier_before(source, i));
                let (raw, end) = read_template(source, i + 1, path)?;
                if tagged {
                    let fragment = if config.skip_indent { raw } else { dedent(&raw) };
                    if !fragment.trim().is_empty() {
                        fragments.push(fragment);
                    }
                }
                i = end;
                magic = false;
                last = Some(b'`');
            }
            b if b.is_ascii_whitespace() => i += 1,
            b => {
                magic = false;
                last = Some(b);
                i += 1;
            }
        }
    }

    Ok(fragments)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Identifier ending right before `end`, ignoring whitespace in between
fn identifier_before(source: &str, end: usize) -> &str {
    let bytes = source.as_bytes();
    let mut stop = end;
    while stop > 0 && bytes[stop - 1].is_ascii_whitespace() {
        stop -= 1;
    }
    let mut start = stop;
    while start > 0 && is_ident_byte(bytes[start - 1]) {
        start -= 1;
    }
    // member access such as `foo.gql` is not a tag
    if start > 0 && bytes[start - 1] == b'.' {
        return "";
    }
    &source[start..stop]
}

const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

/// Whether a `/` at `at` opens a regular expression literal
fn starts_regex(source: &str, at: usize, last: Option<u8>) -> bool {
    match last {
        None => true,
        Some(b) if b"(,=:[!&|?{};+-*%<>~^".contains(&b) => true,
        Some(b) if is_ident_byte(b) => REGEX_KEYWORDS.contains(&identifier_before(source, at)),
        _ => false,
    }
}

/// Offset just past a regular expression body; `/` inside `[...]` does not
/// close it and a newline ends an unterminated one
fn skip_regex(bytes: &[u8], mut i: usize) -> usize {
    let mut in_class = false;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b'[' => {
                in_class = true;
                i += 1;
            }
            b']' => {
                in_class = false;
                i += 1;
            }
            b'/' if !in_class => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes[from..].iter().position(|&b| b == needle).map(|p| from + p)
}

/// Offset just past a quoted string; single-line strings stop at a newline
fn skip_string(bytes: &[u8], mut i: usize, quote: u8) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i + 1,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Scan a template literal body starting at `start`; returns the body with
/// `${...}` removed and the offset just past the closing backtick.
fn read_template(source: &str, start: usize, path: &Path) -> LoaderResult<(String, usize)> {
    let bytes = source.as_bytes();
    let mut out = String::new();
    let mut i = start;
    let mut segment_start = start;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                out.push_str(&source[segment_start..i]);
                return Ok((unescape(&out), i + 1));
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                out.push_str(&source[segment_start..i]);
                i = skip_interpolation(bytes, i + 2)
                    .ok_or_else(|| LoaderError::unterminated_template(path, start))?;
                segment_start = i;
            }
            _ => i += 1,
        }
    }

    Err(LoaderError::unterminated_template(path, start))
}

/// Offset just past the `}` that closes an interpolation opened before `i`
fn skip_interpolation(bytes: &[u8], mut i: usize) -> Option<usize> {
    let mut depth = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn unescape(raw: &str) -> String {
    raw.replace("\\`", "`").replace("\\$", "$")
}

/// Strip the indentation common to all non-blank lines and drop leading and
/// trailing blank lines.
fn dedent(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let body: Vec<&str> = lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect();

    let first = body.iter().position(|l| !l.trim().is_empty()).unwrap_or(0);
    let last = body
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |p| p + 1);

    if first >= last {
        return String::new();
    }
    body[first..last].join("\n")
}
