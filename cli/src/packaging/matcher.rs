//! # Path Patterns (`packaging::matcher`)
//!
//! File: cli/src/packaging/matcher.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `PathMatcher` is the predicate behind `zip-with-exclusions` (which files to
//! drop) and `layer-split` (which files to defer to a separate layer). It
//! takes gitignore-flavoured glob patterns and compiles them into a single
//! `regex::RegexSet`:
//!
//! - `*` matches within one path component, `**` across components, `?` one character.
//! - A trailing `/` restricts the pattern to directories: `tests/` matches
//!   every file below any directory named `tests`.
//! - A pattern without an inner `/` floats: `*.md` matches at any depth.
//! - A pattern with an inner or leading `/` is anchored at the bundle root:
//!   `src/generated` matches only that path (and files below it).
//!
use crate::core::error::PackError;
use regex::RegexSet;

/// A compiled set of path patterns.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    patterns: Vec<String>,
    set: RegexSet,
}

impl PathMatcher {
    /// Compiles `patterns`.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidInput` for blank patterns.
    pub fn new<I, S>(patterns: I) -> Result<Self, PackError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .collect();
        let mut sources = Vec::with_capacity(patterns.len());
        for pattern in &patterns {
            if pattern.is_empty() || pattern == "/" {
                return Err(PackError::InvalidInput(
                    "path patterns must not be blank".to_string(),
                ));
            }
            sources.push(glob_to_regex(pattern));
        }
        let set = RegexSet::new(&sources).map_err(|e| {
            PackError::InvalidInput(format!("could not compile path patterns: {}", e))
        })?;
        Ok(PathMatcher { patterns, set })
    }

    /// A matcher that matches nothing.
    pub fn empty() -> Self {
        PathMatcher {
            patterns: Vec::new(),
            set: RegexSet::empty(),
        }
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl PartialEq for PathMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.patterns == other.patterns
    }
}

impl Eq for PathMatcher {}

fn glob_to_regex(pattern: &str) -> String {
    let anchored_root = pattern.starts_with('/');
    let trimmed = pattern.trim_start_matches('/');
    let dir_only = trimmed.ends_with('/');
    let body = trimmed.trim_end_matches('/');
    let anchored = anchored_root || body.contains('/');

    let mut regex = String::from("^");
    if !anchored {
        regex.push_str("(?:.*/)?");
    }

    let chars: Vec<char> = body.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                if chars.get(i + 2) == Some(&'/') {
                    regex.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    regex.push_str(".*");
                    i += 2;
                }
                continue;
            }
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    if dir_only {
        regex.push_str("/.*$");
    } else {
        regex.push_str("(?:/.*)?$");
    }
    regex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floating_extension_pattern() {
        let m = PathMatcher::new(["*.md"]).unwrap();
        assert!(m.is_match("README.md"));
        assert!(m.is_match("docs/guide/intro.md"));
        assert!(!m.is_match("index.js"));
        assert!(!m.is_match("md"));
    }

    #[test]
    fn test_directory_pattern() {
        let m = PathMatcher::new(["tests/"]).unwrap();
        assert!(m.is_match("tests/unit.js"));
        assert!(m.is_match("pkg/tests/fixtures/data.json"));
        assert!(!m.is_match("tests"));
        assert!(!m.is_match("contests/a.js"));
    }

    #[test]
    fn test_anchored_pattern() {
        let m = PathMatcher::new(["src/generated"]).unwrap();
        assert!(m.is_match("src/generated"));
        assert!(m.is_match("src/generated/schema.rs"));
        assert!(!m.is_match("lib/src/generated"));

        let rooted = PathMatcher::new(["/vendor/"]).unwrap();
        assert!(rooted.is_match("vendor/lib.so"));
        assert!(!rooted.is_match("app/vendor/lib.so"));
    }

    #[test]
    fn test_double_star() {
        let m = PathMatcher::new(["src/**/*.test.js"]).unwrap();
        assert!(m.is_match("src/a.test.js"));
        assert!(m.is_match("src/deep/er/b.test.js"));
        assert!(!m.is_match("src/a.js"));
    }

    #[test]
    fn test_question_mark_and_escaping() {
        let m = PathMatcher::new(["file?.txt"]).unwrap();
        assert!(m.is_match("file1.txt"));
        assert!(!m.is_match("file10.txt"));
        assert!(!m.is_match("file1xtxt"));
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(!PathMatcher::empty().is_match("anything"));
        assert!(PathMatcher::new(Vec::<String>::new()).unwrap().is_empty());
        assert!(matches!(
            PathMatcher::new(["  "]),
            Err(PackError::InvalidInput(_))
        ));
    }
}
