//! Filesystem fan-out for file and glob pointers
//!
//! Copyright (c) 2025 Gqlpoint Team
//! Licensed under the Apache-2.0 license

use super::registry::LoaderRegistry;
use crate::aggregate::LoadedSource;
use crate::error::{LoaderError, LoaderResult};
use crate::options::LoadOptions;
use futures::future::join_all;
use glob::{MatchOptions, Pattern};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Suffixes of generated declarations and test files
const EXCLUDED_SUFFIXES: &[&str] = &[".d.ts", ".spec.ts", ".spec.js", ".test.ts", ".test.js"];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Resolves file and glob pointers against a working directory and loads
/// every matching file concurrently
#[derive(Debug, Clone, Copy)]
pub struct FileSystemLoader<'a> {
    registry: &'a LoaderRegistry,
    options: &'a LoadOptions,
    cwd: &'a Path,
}

impl<'a> FileSystemLoader<'a> {
    pub fn new(registry: &'a LoaderRegistry, options: &'a LoadOptions, cwd: &'a Path) -> Self {
        Self {
            registry,
            options,
            cwd,
        }
    }

    /// Load a literal path.
    ///
    /// The source keeps the pointer as written. Format validation failures
    /// propagate; any other failure leaves the source without a document.
    pub async fn load_path(&self, pointer: &str) -> LoaderResult<Vec<LoadedSource>> {
        let fixed = normalize_separators(pointer);
        if !is_relevant_file(&fixed) {
            debug!(path = %pointer, "Skipping excluded file");
            return Ok(Vec::new());
        }

        let full_path = resolve_path(self.cwd, &fixed);
        self.load_files(vec![(pointer.to_string(), full_path)], true)
            .await
    }

    /// Expand a glob and load every match; every per-file failure is absorbed
    pub async fn load_glob(&self, pattern: &str) -> LoaderResult<Vec<LoadedSource>> {
        let files: Vec<(String, PathBuf)> = self
            .expand_glob(pattern)?
            .into_iter()
            .filter(|path| is_relevant_file(&path.to_string_lossy()))
            .map(|path| (path.to_string_lossy().into_owned(), path))
            .collect();

        debug!(pattern = %pattern, files = files.len(), "Expanded glob");
        self.load_files(files, false).await
    }

    /// Files matching `pattern` under the working directory, minus ignored ones,
    /// in listing order without duplicates
    pub fn expand_glob(&self, pattern: &str) -> LoaderResult<Vec<PathBuf>> {
        let fixed = normalize_separators(pattern);
        let ignores = self.ignore_patterns()?;

        let mut seen = HashSet::new();
        let mut files = Vec::new();
        for alternative in expand_braces(&fixed) {
            let rooted = root_pattern(self.cwd, &alternative);
            let entries = glob::glob(&rooted)
                .map_err(|e| LoaderError::glob_pattern(pattern, e.msg))?;

            for entry in entries {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => {
                        warn!(pattern = %pattern, error = %e, "Unreadable glob entry");
                        continue;
                    }
                };
                if !path.is_file() {
                    continue;
                }
                if ignores.iter().any(|ignore| ignore.matches_path_with(&path, MATCH_OPTIONS)) {
                    debug!(path = %path.display(), "Ignored by pattern");
                    continue;
                }
                if seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }

        Ok(files)
    }

    fn ignore_patterns(&self) -> LoaderResult<Vec<Pattern>> {
        self.options
            .ignore
            .iter()
            .flat_map(|ignore| expand_braces(&normalize_separators(ignore)))
            .map(|ignore| {
                Pattern::new(&root_pattern(self.cwd, &ignore))
                    .map_err(|e| LoaderError::glob_pattern(ignore.clone(), e.msg))
            })
            .collect()
    }

    /// Load all files concurrently and gather in input order.
    ///
    /// With `strict`, fatal format errors abort the whole batch.
    async fn load_files(
        &self,
        files: Vec<(String, PathBuf)>,
        strict: bool,
    ) -> LoaderResult<Vec<LoadedSource>> {
        let loads = files.into_iter().map(|(file_path, full_path)| async move {
            let result = self.registry.load_file(&full_path, self.options).await;
            (file_path, result)
        });

        let mut sources = Vec::new();
        for (file_path, result) in join_all(loads).await {
            let document = match result {
                Ok(document) => document,
                Err(e) if strict && e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(path = %file_path, error = %e, "Failed to find any GraphQL type definitions");
                    None
                }
            };
            sources.push(LoadedSource::new(file_path, document));
        }
        Ok(sources)
    }
}

/// False for anything under `node_modules`, declaration files and test files
pub fn is_relevant_file(path: &str) -> bool {
    let in_node_modules = Path::new(path)
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"));

    !in_node_modules && !EXCLUDED_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
}

/// Absolute paths are kept; relative ones are joined onto `cwd`
pub fn resolve_path(cwd: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Expand `{a,b}` alternatives, which the glob engine does not understand.
///
/// Groups without a comma are left as they are.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let mut depth = 0usize;
    let mut open = 0usize;
    let mut commas = Vec::new();

    for (i, byte) in pattern.bytes().enumerate() {
        match byte {
            b'{' => {
                if depth == 0 {
                    open = i;
                    commas.clear();
                }
                depth += 1;
            }
            b',' if depth == 1 => commas.push(i),
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 && !commas.is_empty() {
                    let (prefix, suffix) = (&pattern[..open], &pattern[i + 1..]);
                    let mut bounds = vec![open];
                    bounds.extend(&commas);
                    bounds.push(i);

                    return bounds
                        .windows(2)
                        .flat_map(|w| {
                            expand_braces(&format!("{}{}{}", prefix, &pattern[w[0] + 1..w[1]], suffix))
                        })
                        .collect();
                }
            }
            _ => {}
        }
    }

    vec![pattern.to_string()]
}

/// Backslash separators become `/` on Windows
fn normalize_separators(pattern: &str) -> Cow<'_, str> {
    if cfg!(windows) {
        Cow::Owned(pattern.replace('\\', "/"))
    } else {
        Cow::Borrowed(pattern)
    }
}

fn root_pattern(cwd: &Path, pattern: &str) -> String {
    if Path::new(pattern).is_absolute() {
        return pattern.to_string();
    }
    let root = normalize_separators(&cwd.to_string_lossy()).into_owned();
    let relative = pattern.trim_start_matches("./");
    format!("{}/{}", Pattern::escape(root.trim_end_matches('/')), relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_relevant_files() {
        assert!(is_relevant_file("src/schema.graphql"));
        assert!(is_relevant_file("src/types.ts"));
        assert!(!is_relevant_file("/app/node_modules/pkg/schema.graphql"));
        assert!(!is_relevant_file("src/types.d.ts"));
        assert!(!is_relevant_file("src/user.spec.ts"));
        assert!(!is_relevant_file("src/user.test.js"));
        assert!(is_relevant_file("src/node_modules_backup/a.graphql"));
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("src/*.graphql"), vec!["src/*.graphql"]);
        assert_eq!(
            expand_braces("src/**/*.{graphql,gql}"),
            vec!["src/**/*.graphql", "src/**/*.gql"]
        );
        assert_eq!(
            expand_braces("{a,b}/{c,d}"),
            vec!["a/c", "a/d", "b/c", "b/d"]
        );
        assert_eq!(expand_braces("x/{single}/y"), vec!["x/{single}/y"]);
    }

    #[test]
    fn test_expand_glob_honors_ignore() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schema/user.graphql", "type User { id: ID }");
        write(dir.path(), "schema/legacy/old.graphql", "type Old { id: ID }");
        write(dir.path(), "schema/post.gql", "type Post { id: ID }");

        let registry = LoaderRegistry::with_defaults();
        let options = LoadOptions::default().with_ignore("**/legacy/**");
        let loader = FileSystemLoader::new(&registry, &options, dir.path());

        let files = loader.expand_glob("./schema/**/*.{graphql,gql}").unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["user.graphql", "post.gql"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[tokio::test]
    async fn test_glob_absorbs_failures() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.graphql", "type A { a: Int }");
        write(dir.path(), "broken.graphql", "type {");
        write(dir.path(), "bad.json", r#"{"nope": true}"#);
        write(dir.path(), "a.test.js", "gql`type T { t: Int }`");

        let registry = LoaderRegistry::with_defaults();
        let options = LoadOptions::default();
        let loader = FileSystemLoader::new(&registry, &options, dir.path());

        let sources = loader.load_glob("*").await.unwrap();
        assert_eq!(sources.len(), 3);
        let loaded: Vec<&LoadedSource> = sources.iter().filter(|s| s.document.is_some()).collect();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].file_path.ends_with("a.graphql"));
    }

    #[tokio::test]
    async fn test_literal_path_keeps_pointer() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.graphql", "type A { a: Int }");

        let registry = LoaderRegistry::with_defaults();
        let options = LoadOptions::default();
        let loader = FileSystemLoader::new(&registry, &options, dir.path());

        let found = loader.load_path("a.graphql").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].file_path, "a.graphql");
        assert!(found[0].document.is_some());

        let missing = loader.load_path("b.graphql").await.unwrap();
        assert_eq!(missing.len(), 1);
        assert!(missing[0].document.is_none());
    }

    #[tokio::test]
    async fn test_literal_invalid_introspection_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "schema.json", r#"{"data": {}}"#);

        let registry = LoaderRegistry::with_defaults();
        let options = LoadOptions::default();
        let loader = FileSystemLoader::new(&registry, &options, dir.path());

        let err = loader.load_path("schema.json").await.unwrap_err();
        assert!(err.to_string().contains("Invalid schema provided"));
    }
}
