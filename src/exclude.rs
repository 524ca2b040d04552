//! Exclusion pattern matching
//!
//! Gitignore-semantics matching for build exclusions and runtime directories,
//! built on the `ignore` crate. Patterns are relative to the tree root:
//! `var/cache/` matches that directory and everything under it, `.env.dev`
//! matches the file at any depth.

use std::path::Path;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use crate::error::{DeployError, DeployResult};

/// A compiled set of exclusion patterns.
#[derive(Debug)]
pub struct ExcludeSet {
    matcher: Gitignore,
}

impl ExcludeSet {
    /// Compile a pattern list.
    pub fn new<I, S>(patterns: I) -> DeployResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new("");
        for pattern in patterns {
            let pattern = pattern.as_ref();
            builder
                .add_line(None, pattern)
                .map_err(|e| DeployError::InvalidPattern {
                    pattern: pattern.to_string(),
                    message: e.to_string(),
                })?;
        }
        let matcher = builder
            .build()
            .map_err(|e| DeployError::InvalidPattern {
                pattern: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { matcher })
    }

    /// Check whether a path (relative to the tree root) is excluded.
    pub fn is_excluded(&self, rel_path: &Path, is_dir: bool) -> bool {
        self.matcher
            .matched_path_or_any_parents(rel_path, is_dir)
            .is_ignore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn build_excludes() -> ExcludeSet {
        ExcludeSet::new([
            ".git/",
            "var/cache/",
            "var/log/",
            "var/sessions/",
            "node_modules/",
            "tests/",
            ".env.dev",
            ".env.test",
        ])
        .unwrap()
    }

    #[test]
    fn test_directory_patterns_match_dirs() {
        let set = build_excludes();
        assert!(set.is_excluded(Path::new(".git"), true));
        assert!(set.is_excluded(Path::new("var/cache"), true));
        assert!(set.is_excluded(Path::new("node_modules"), true));
    }

    #[test]
    fn test_contents_of_excluded_dirs_match() {
        let set = build_excludes();
        assert!(set.is_excluded(Path::new("var/cache/pools/app.php"), false));
        assert!(set.is_excluded(Path::new(".git/HEAD"), false));
    }

    #[test]
    fn test_file_patterns_match_files() {
        let set = build_excludes();
        assert!(set.is_excluded(Path::new(".env.dev"), false));
        assert!(set.is_excluded(Path::new(".env.test"), false));
    }

    #[test]
    fn test_kept_paths_do_not_match() {
        let set = build_excludes();
        assert!(!set.is_excluded(Path::new("src"), true));
        assert!(!set.is_excluded(Path::new("src/Kernel.php"), false));
        assert!(!set.is_excluded(Path::new("app.php"), false));
        assert!(!set.is_excluded(Path::new(".env"), false));
        // var itself survives, only the runtime subdirs are excluded
        assert!(!set.is_excluded(Path::new("var"), true));
        assert!(!set.is_excluded(Path::new("var/data.db"), false));
    }

    #[test]
    fn test_invalid_pattern_error_names_the_pattern() {
        // GitignoreBuilder is extremely permissive, so the error path is
        // exercised directly
        let err = DeployError::InvalidPattern {
            pattern: "a/**b".to_string(),
            message: "bad glob".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid exclusion pattern 'a/**b': bad glob"
        );
    }
}
