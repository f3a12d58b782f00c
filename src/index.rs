//! Directory indexing: one listing page per visited directory.
//!
//! The walk is top-down and depth-first, sorted by file name, and runs on a
//! single thread. For every directory it:
//!
//! 1. reads the immediate children and splits them into directory and file
//!    names,
//! 2. filters both lists ([`filter_names`]),
//! 3. builds and sorts an [`Entry`] per name (directories first, then files),
//! 4. renders a [`ListingContext`] through the [`Renderer`],
//! 5. writes `index.html` according to the [`WritePolicy`].
//!
//! ## Failure Handling
//!
//! - A page that cannot be written is logged and recorded as
//!   [`PageStatus::Failed`]; the walk moves on to the next directory.
//! - An entry whose metadata cannot be read (broken symlink) is logged and
//!   left out of its listing.
//! - A directory that cannot be read aborts the run with [`IndexError`].
//!
//! ## Hidden Directories
//!
//! Hidden subdirectories are filtered out of their parent's listing and are
//! never descended into. The root is checked on its own: a hidden root gets
//! no page, but its visible subdirectories are still indexed.

use crate::config::{IndexConfig, WritePolicy};
use crate::entry::{Entry, build_entry, sort_entries};
use crate::filter::{INDEX_FILENAME, filter_names, is_hidden, is_listed_dir, normalize_extensions};
use crate::render::{ListingContext, Renderer};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Per-invocation options, separate from the file-based config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Descend into subdirectories. When false only the root gets a page and
    /// its listing shows no subdirectories.
    pub recurse: bool,
    /// File suffixes left out of every listing, each starting with `.`.
    pub ignored_extensions: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            recurse: true,
            ignored_extensions: Vec::new(),
        }
    }
}

impl RunOptions {
    pub fn new<I, S>(recurse: bool, ignored_extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            recurse,
            ignored_extensions: normalize_extensions(ignored_extensions),
        }
    }
}

/// Run totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Directory entries listed across all pages.
    pub directories: usize,
    /// File entries listed across all pages.
    pub files: usize,
    /// Pages actually written.
    pub generated: usize,
}

/// What happened to one directory's `index.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageStatus {
    /// Created or replaced.
    Written,
    /// Existing page already had the same content.
    Unchanged,
    /// Existing page left alone under [`WritePolicy::IfMissing`].
    Kept,
    /// Could not be written; the message is the I/O error.
    Failed(String),
}

/// Outcome for one visited directory.
#[derive(Debug, Clone)]
pub struct PageOutcome {
    /// Directory relative to the root, `/`-separated; empty for the root.
    pub dir: String,
    pub entries: usize,
    pub status: PageStatus,
}

/// Result of a full run.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub stats: IndexStats,
    /// One outcome per visited directory, in walk order.
    pub pages: Vec<PageOutcome>,
}

impl IndexReport {
    pub fn failed(&self) -> impl Iterator<Item = &PageOutcome> {
        self.pages
            .iter()
            .filter(|p| matches!(p.status, PageStatus::Failed(_)))
    }
}

/// Create or update `index.html` in `root` and, when recursing, in every
/// listed subdirectory below it.
pub fn create_indexes(
    root: &Path,
    config: &IndexConfig,
    options: &RunOptions,
    renderer: &dyn Renderer,
) -> Result<IndexReport, IndexError> {
    if !root.is_dir() {
        return Err(IndexError::NotADirectory(root.to_path_buf()));
    }

    let max_depth = if options.recurse { usize::MAX } else { 0 };
    let walker = WalkDir::new(root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || (e.file_type().is_dir()
                    && is_listed_dir(&e.file_name().to_string_lossy(), config))
        });

    let mut report = IndexReport::default();

    for dir in walker {
        let dir = dir?;
        let path = dir.path();

        let hidden = path
            .file_name()
            .is_some_and(|n| is_hidden(&n.to_string_lossy()));
        if config.hide_hidden_entries && hidden {
            log::debug!("Skipping hidden directory {}", path.display());
            continue;
        }

        let (listing, stats) = build_listing(path, root, config, options)?;
        let page = renderer.render(&listing);
        let status = write_page(&path.join(INDEX_FILENAME), &page, config.write_policy);

        report.stats.directories += stats.directories;
        report.stats.files += stats.files;
        if status == PageStatus::Written {
            report.stats.generated += 1;
        }
        report.pages.push(PageOutcome {
            dir: listing.index_of,
            entries: listing.entries.len(),
            status,
        });
    }

    Ok(report)
}

/// Read, filter and classify the children of `dir`.
///
/// Returns the render context and the entry counts (`generated` is zero).
pub fn build_listing(
    dir: &Path,
    root: &Path,
    config: &IndexConfig,
    options: &RunOptions,
) -> Result<(ListingContext, IndexStats), IndexError> {
    let (dirnames, filenames) = read_names(dir)?;
    let dirnames = if options.recurse { dirnames } else { Vec::new() };
    let (dirnames, filenames) =
        filter_names(dirnames, filenames, config, &options.ignored_extensions);

    let mut entries = build_entries(dir, root, &dirnames, config);
    let files = build_entries(dir, root, &filenames, config);

    let stats = IndexStats {
        directories: entries.len(),
        files: files.len(),
        generated: 0,
    };
    entries.extend(files);

    Ok((ListingContext::new(entries, root, dir, config), stats))
}

/// Split the children of `dir` into directory names and file names.
///
/// Symbolic links are classified by their target; a dangling link counts as
/// a file. Names stay raw so a non-UTF-8 name still joins back to a real
/// path.
fn read_names(dir: &Path) -> io::Result<(Vec<OsString>, Vec<OsString>)> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if entry.path().is_dir() {
            dirs.push(name);
        } else {
            files.push(name);
        }
    }
    Ok((dirs, files))
}

/// Build sorted entries for `names` inside `dir`, skipping unreadable ones.
fn build_entries(dir: &Path, root: &Path, names: &[OsString], config: &IndexConfig) -> Vec<Entry> {
    let mut entries: Vec<Entry> = names
        .iter()
        .filter_map(|name| {
            let path = dir.join(name);
            match build_entry(&path, root, config) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();
    sort_entries(&mut entries);
    entries
}

/// Apply the write policy to one page. Never returns an error: failures are
/// logged and reported as [`PageStatus::Failed`].
pub fn write_page(index_path: &Path, content: &str, policy: WritePolicy) -> PageStatus {
    let result = needs_write(index_path, content, policy).and_then(|needed| match needed {
        Some(status) => Ok(status),
        None => fs::write(index_path, content).map(|()| PageStatus::Written),
    });

    match result {
        Ok(status) => {
            log::debug!("{}: {:?}", index_path.display(), status);
            status
        }
        Err(e) => {
            log::error!("Cannot write {}: {}", index_path.display(), e);
            PageStatus::Failed(e.to_string())
        }
    }
}

/// `Ok(None)` when the page must be written, otherwise the status to report.
fn needs_write(
    index_path: &Path,
    content: &str,
    policy: WritePolicy,
) -> io::Result<Option<PageStatus>> {
    match policy {
        WritePolicy::IfMissing => {
            if index_path.exists() {
                Ok(Some(PageStatus::Kept))
            } else {
                Ok(None)
            }
        }
        WritePolicy::WhenChanged => match fs::read_to_string(index_path) {
            Ok(existing) if existing.trim() == content.trim() => Ok(Some(PageStatus::Unchanged)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            // Not UTF-8, so it cannot match a rendered page.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => Ok(None),
            Err(e) => Err(e),
        },
    }
}
