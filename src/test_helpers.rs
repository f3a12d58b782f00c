//! Shared test utilities for the autoindex test suite.
//!
//! Trees are built in temp directories from short relative paths, and
//! [`NamesRenderer`] produces pages that contain only the listed names so
//! assertions do not depend on timestamps or markup.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = site_dir();
//! make_tree(tmp.path(), &["a.txt", "docs/", "docs/b.txt"]);
//! index_tree(tmp.path(), &RunOptions::default());
//! assert_eq!(listed_names(&read_page(tmp.path())), vec!["docs", "a.txt"]);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::config::IndexConfig;
use crate::filter::INDEX_FILENAME;
use crate::index::{IndexReport, RunOptions, create_indexes};
use crate::render::{ListingContext, Renderer};

// =========================================================================
// Tree setup
// =========================================================================

/// A temp directory to index, named `siteXXXX`.
///
/// `TempDir::new()` names its directory `.tmpXXXX`, which counts as a hidden
/// root and never gets a page of its own.
pub fn site_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("site")
        .tempdir()
        .unwrap_or_else(|e| panic!("cannot create temp dir: {e}"))
}

/// Create files and directories under `root`.
///
/// A path ending in `/` is a directory; anything else is a file whose
/// content is its own path. Parent directories are created as needed.
pub fn make_tree(root: &Path, paths: &[&str]) {
    for rel in paths {
        let path = root.join(rel.trim_end_matches('/'));
        if rel.ends_with('/') {
            fs::create_dir_all(&path).unwrap();
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, rel.as_bytes()).unwrap();
        }
    }
}

// =========================================================================
// Rendering
// =========================================================================

/// Renders a heading line with the page title, then one entry name per line.
pub struct NamesRenderer;

impl Renderer for NamesRenderer {
    fn render(&self, listing: &ListingContext) -> String {
        let mut out = format!("# {}\n", listing.title());
        for entry in &listing.entries {
            out.push_str(&entry.name);
            out.push('\n');
        }
        out
    }
}

/// Index `root` with stock config and [`NamesRenderer`]. Panics on error.
pub fn index_tree(root: &Path, options: &RunOptions) -> IndexReport {
    create_indexes(root, &IndexConfig::default(), options, &NamesRenderer)
        .unwrap_or_else(|e| panic!("indexing {} failed: {e}", root.display()))
}

// =========================================================================
// Inspection
// =========================================================================

/// Read the `index.html` in `dir`. Panics if missing.
pub fn read_page(dir: &Path) -> String {
    let path = dir.join(INDEX_FILENAME);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}

/// Entry names from a [`NamesRenderer`] page, in listing order.
pub fn listed_names(page: &str) -> Vec<String> {
    page.lines()
        .filter(|l| !l.starts_with("# "))
        .map(str::to_string)
        .collect()
}

/// All `index.html` files under `root`, as sorted `/`-separated relative paths.
pub fn index_pages_under(root: &Path) -> Vec<String> {
    let mut pages: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && e.file_name() == INDEX_FILENAME)
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    pages.sort();
    pages
}
