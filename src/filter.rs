//! Name filtering applied to a directory's raw listing.
//!
//! Runs before any [`Entry`](crate::entry::Entry) is built. Every rule is
//! independent of the others and can be toggled in [`IndexConfig`]:
//!
//! | Rule | Applies to | Toggle |
//! |------|------------|--------|
//! | literal `index.html` | files | `hide_index_files` |
//! | icon folder name | directories | `hide_icon_folder` |
//! | leading `.` | both | `hide_hidden_entries` |
//! | run-ignored extension suffix | files | `--ignore-exts` |
//!
//! Filtering builds new vectors; the inputs are consumed, not edited while
//! being iterated. Names may be raw `OsString`s straight from `read_dir`:
//! rules are checked against their lossy UTF-8 form, but the original name
//! is what comes out.

use crate::config::IndexConfig;
use std::ffi::OsStr;

/// File name the indexer writes into every directory.
pub const INDEX_FILENAME: &str = "index.html";

/// Prefix marking hidden entries.
pub const HIDDEN_MARKER: char = '.';

/// Whether a name is hidden (starts with `.`).
pub fn is_hidden(name: &str) -> bool {
    name.starts_with(HIDDEN_MARKER)
}

/// Normalize user-supplied extensions to start with a dot.
///
/// `"log"` and `".log"` both become `".log"`, so `catalog` is never caught
/// by an ignored `log`. Empty strings are dropped.
pub fn normalize_extensions<I, S>(exts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    exts.into_iter()
        .map(|e| e.as_ref().trim().to_string())
        .filter(|e| !e.is_empty() && e != ".")
        .map(|e| {
            if e.starts_with('.') {
                e
            } else {
                format!(".{e}")
            }
        })
        .collect()
}

/// Whether a subdirectory survives filtering.
///
/// The walker uses the same rule to decide where to descend, so a directory
/// missing from a listing never gets a page of its own.
pub fn is_listed_dir(name: &str, config: &IndexConfig) -> bool {
    !(config.hide_icon_folder && name == config.icons.folder_name)
        && !(config.hide_hidden_entries && is_hidden(name))
}

/// Whether a file survives filtering.
pub fn is_listed_file(name: &str, config: &IndexConfig, ignored_extensions: &[String]) -> bool {
    !(config.hide_index_files && name == INDEX_FILENAME)
        && !(config.hide_hidden_entries && is_hidden(name))
        && !ignored_extensions.iter().any(|ext| name.ends_with(ext.as_str()))
}

/// Filter the immediate subdirectory and file names of one directory.
///
/// Returns `(dirs, files)` with the input order preserved.
pub fn filter_names<N: AsRef<OsStr>>(
    dirnames: Vec<N>,
    filenames: Vec<N>,
    config: &IndexConfig,
    ignored_extensions: &[String],
) -> (Vec<N>, Vec<N>) {
    let dirs = dirnames
        .into_iter()
        .filter(|name| is_listed_dir(&name.as_ref().to_string_lossy(), config))
        .collect();

    let files = filenames
        .into_iter()
        .filter(|name| {
            is_listed_file(&name.as_ref().to_string_lossy(), config, ignored_extensions)
        })
        .collect();

    (dirs, files)
}
