//! Removal of generated listing pages.
//!
//! Deletes every file named `index.html` under a root, at any depth. There
//! is no filtering: hidden directories and the icon folder are swept too,
//! and a hand-written `index.html` goes the same way as a generated one.

use crate::filter::INDEX_FILENAME;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Result of a cleanup sweep.
#[derive(Debug, Default)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
    /// Files that could not be deleted, with the error message.
    pub failed: Vec<(PathBuf, String)>,
}

/// Delete every `index.html` below `root`.
///
/// A file that cannot be deleted, or a directory that cannot be read, is
/// logged and recorded in [`CleanReport::failed`]; the sweep continues.
pub fn clean_indexes(root: &Path) -> Result<CleanReport, CleanError> {
    if !root.is_dir() {
        return Err(CleanError::NotADirectory(root.to_path_buf()));
    }

    let mut report = CleanReport::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                log::error!("Cannot read {}: {}", path.display(), e);
                report.failed.push((path, e.to_string()));
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != INDEX_FILENAME {
            continue;
        }
        let path = entry.into_path();
        match fs::remove_file(&path) {
            Ok(()) => {
                log::debug!("Removed {}", path.display());
                report.removed.push(path);
            }
            Err(e) => {
                log::error!("Cannot remove {}: {}", path.display(), e);
                report.failed.push((path, e.to_string()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn removes_pages_at_every_depth() {
        let tmp = TempDir::new().unwrap();
        make_tree(
            tmp.path(),
            &[
                "index.html",
                "a/index.html",
                "a/b/c/index.html",
                "a/keep.txt",
                "a/b/index.htm",
                "notes.html",
            ],
        );

        let report = clean_indexes(tmp.path()).unwrap();

        assert_eq!(report.removed.len(), 3);
        assert!(report.failed.is_empty());
        assert!(index_pages_under(tmp.path()).is_empty());
        assert!(tmp.path().join("a/keep.txt").exists());
        assert!(tmp.path().join("a/b/index.htm").exists());
        assert!(tmp.path().join("notes.html").exists());
    }

    #[test]
    fn sweeps_hidden_directories() {
        let tmp = TempDir::new().unwrap();
        make_tree(tmp.path(), &[".cache/index.html", "_icons/index.html"]);

        let report = clean_indexes(tmp.path()).unwrap();
        assert_eq!(report.removed.len(), 2);
    }

    #[test]
    fn directory_named_index_html_is_kept() {
        let tmp = TempDir::new().unwrap();
        make_tree(tmp.path(), &["index.html/"]);

        let report = clean_indexes(tmp.path()).unwrap();
        assert!(report.removed.is_empty());
        assert!(tmp.path().join("index.html").is_dir());
    }

    #[test]
    fn clean_after_index_leaves_no_pages() {
        let tmp = site_dir();
        make_tree(tmp.path(), &["a.txt", "x/y/z.txt"]);
        index_tree(tmp.path(), &crate::index::RunOptions::default());
        assert_eq!(index_pages_under(tmp.path()).len(), 3);

        clean_indexes(tmp.path()).unwrap();
        assert!(index_pages_under(tmp.path()).is_empty());
        assert!(tmp.path().join("x/y/z.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_does_not_stop_sweep() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        make_tree(
            tmp.path(),
            &["index.html", "a/index.html", "locked/index.html", "z/index.html"],
        );
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root can read anywhere; nothing to observe then.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = clean_indexes(tmp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        let report = result.unwrap();

        assert_eq!(report.removed.len(), 3);
        assert!(!tmp.path().join("z/index.html").exists());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, locked);
        assert_eq!(index_pages_under(tmp.path()), vec!["locked/index.html"]);
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = clean_indexes(&tmp.path().join("nope"));
        assert!(matches!(result, Err(CleanError::NotADirectory(_))));
    }
}
