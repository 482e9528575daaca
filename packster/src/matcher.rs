//! Exclude pattern matching
//!
//! Patterns use shell glob semantics as `fnmatch` does: `*` and `?` also
//! match `/`, and matching is case sensitive.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::{error::Result, utils::member_name};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// True if `path` matches any of `patterns`
pub fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    let name = member_name(path);
    patterns
        .iter()
        .any(|pattern| pattern.matches_with(&name, MATCH_OPTIONS))
}

/// Exclude patterns of one package, compiled once, plus directories whose
/// whole subtree is excluded
#[derive(Debug, Clone, Default)]
pub struct ExcludeMatcher {
    patterns: Vec<Pattern>,
    reserved: Vec<PathBuf>,
}

impl ExcludeMatcher {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| Pattern::new(p.as_ref()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            patterns,
            reserved: Vec::new(),
        })
    }

    /// Also exclude everything below `dir`. Empty paths are ignored.
    pub fn with_reserved(mut self, dir: PathBuf) -> Self {
        if dir.as_os_str().is_empty() {
            return self;
        }
        self.reserved.push(dir);
        self
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.reserved.iter().any(|dir| path.starts_with(dir)) || is_excluded(path, &self.patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_star_matches_across_directories() {
        let matcher = ExcludeMatcher::new(&["*.tmp"]).unwrap();
        assert!(matcher.is_excluded(Path::new("b.tmp")));
        assert!(matcher.is_excluded(Path::new("src/nested/b.tmp")));
        assert!(!matcher.is_excluded(Path::new("src/a.txt")));
    }

    #[test]
    fn test_question_mark_and_classes() {
        let matcher = ExcludeMatcher::new(&["src/?.log", "*.[ch]"]).unwrap();
        assert!(matcher.is_excluded(Path::new("src/a.log")));
        assert!(!matcher.is_excluded(Path::new("src/ab.log")));
        assert!(matcher.is_excluded(Path::new("lib/main.c")));
        assert!(matcher.is_excluded(Path::new("lib/main.h")));
        assert!(!matcher.is_excluded(Path::new("lib/main.o")));
    }

    #[test]
    fn test_directory_prefix_pattern() {
        let matcher = ExcludeMatcher::new(&["build/*"]).unwrap();
        assert!(matcher.is_excluded(Path::new("build/out/app")));
        assert!(!matcher.is_excluded(Path::new("src/build.rs")));
    }

    #[test]
    fn test_hidden_files_match_star() {
        let matcher = ExcludeMatcher::new(&["*/.git*"]).unwrap();
        assert!(matcher.is_excluded(Path::new("src/.gitignore")));
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = ExcludeMatcher::new(&["*.TMP"]).unwrap();
        assert!(!matcher.is_excluded(Path::new("a.tmp")));
    }

    #[test]
    fn test_no_patterns_excludes_nothing() {
        let matcher = ExcludeMatcher::new::<&str>(&[]).unwrap();
        assert!(!matcher.is_excluded(Path::new("anything")));
    }

    #[test]
    fn test_reserved_subtree() {
        let matcher = ExcludeMatcher::default()
            .with_reserved(PathBuf::from("dist"))
            .with_reserved(PathBuf::new());
        assert!(matcher.is_excluded(Path::new("dist")));
        assert!(matcher.is_excluded(Path::new("dist/old.zip")));
        assert!(!matcher.is_excluded(Path::new("distribution/a.txt")));
        assert!(!matcher.is_excluded(Path::new("src/a.txt")));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(ExcludeMatcher::new(&["[abc"]), Err(Error::Glob(_))));
    }
}
