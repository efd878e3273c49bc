use crate::{EnvTokenError, Result};
use glob::{MatchOptions, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Selects the files of a directory tree whose relative path matches a glob
#[derive(Debug, Clone)]
pub struct FileSelector {
    pattern: Pattern,
}

impl FileSelector {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern).map_err(|source| EnvTokenError::InvalidGlobPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    /// Whether `relative` (a path relative to the walk root) is selected
    pub fn matches(&self, relative: &Path) -> bool {
        self.pattern.matches_path_with(relative, MATCH_OPTIONS)
    }

    /// Walk `root` recursively and return every file matching the pattern,
    /// in traversal order (entries of a directory sorted by name).
    ///
    /// Entries that cannot be read are logged and skipped.
    pub fn select(&self, root: &Path) -> Vec<PathBuf> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("{}", EnvTokenError::TraversalEntry(e));
                    continue;
                }
            };

            let path = entry.path();
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            if path.is_file() && self.matches(relative) {
                debug!(path = %path.display(), "Selected file");
                files.push(path.to_path_buf());
            }
        }

        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("config").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::write(temp_dir.path().join("b.yml"), "b").unwrap();
        fs::write(temp_dir.path().join("config").join("c.txt"), "c").unwrap();
        fs::write(nested.join("d.yml"), "d").unwrap();
        temp_dir
    }

    fn relative_names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = FileSelector::new("[unclosed");
        assert!(matches!(result, Err(EnvTokenError::InvalidGlobPattern { .. })));
    }

    #[test]
    fn test_double_star_selects_every_file() {
        let temp_dir = tree();
        let files = FileSelector::new("**").unwrap().select(temp_dir.path());
        assert_eq!(
            relative_names(temp_dir.path(), &files),
            vec!["a.txt", "b.yml", "config/c.txt", "config/deep/d.yml"]
        );
    }

    #[test]
    fn test_single_star_stays_at_top_level() {
        let temp_dir = tree();
        let files = FileSelector::new("*.txt").unwrap().select(temp_dir.path());
        assert_eq!(relative_names(temp_dir.path(), &files), vec!["a.txt"]);
    }

    #[test]
    fn test_recursive_extension_pattern() {
        let temp_dir = tree();
        let files = FileSelector::new("**/*.yml").unwrap().select(temp_dir.path());
        assert_eq!(
            relative_names(temp_dir.path(), &files),
            vec!["b.yml", "config/deep/d.yml"]
        );
    }

    #[test]
    fn test_directories_are_never_selected() {
        let temp_dir = tree();
        let files = FileSelector::new("config").unwrap().select(temp_dir.path());
        assert!(files.is_empty());
    }

    #[test]
    fn test_traversal_order_is_lexical() {
        let temp_dir = tree();
        let files = FileSelector::new("**").unwrap().select(temp_dir.path());
        let in_order: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(in_order, vec!["a.txt", "b.yml", "config/c.txt", "config/deep/d.yml"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tree();
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("secret.txt"), "s").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let files = FileSelector::new("**").unwrap().select(temp_dir.path());
        let names = relative_names(temp_dir.path(), &files);

        // Restore access so the temp dir can be removed
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        for sibling in ["a.txt", "b.yml", "config/c.txt", "config/deep/d.yml"] {
            assert!(names.iter().any(|n| n == sibling), "{sibling} missing from {names:?}");
        }
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let files = FileSelector::new("**")
            .unwrap()
            .select(&temp_dir.path().join("absent"));
        assert!(files.is_empty());
    }
}
