//! Listing entries: one row per file or subdirectory.
//!
//! An [`Entry`] is a plain record built from a path's metadata and discarded
//! once its page is rendered. Construction resolves everything the renderer
//! needs so templates never touch the filesystem:
//!
//! - **Timestamp**: mtime in UTC, shifted forward by [`MTIME_OFFSET_HOURS`],
//!   formatted `YYYY-MM-DD HH:MM`. The shift is a fixed constant, not a
//!   timezone conversion.
//! - **Size**: [`format_size`] for files, `None` for directories.
//! - **Icon**: [`resolve_icon`] against the ordered extension table.
//! - **Link**: `name/index.html` for directories, `name` for files.
//! - **Open link**: [`external_link`] for configured file types (notebooks).

use crate::config::{IconsConfig, IndexConfig, LinksConfig};
use chrono::{DateTime, TimeDelta, Utc};
use std::fs;
use std::io;
use std::path::{Component, Path};
use std::time::SystemTime;

/// Hours added to the UTC modification time before display.
pub const MTIME_OFFSET_HOURS: i64 = 1;

/// Display format for modification times.
pub const MTIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Link target of the synthetic parent-directory row.
pub const PARENT_URL: &str = "../index.html";

pub const BACK_ICON: &str = "back.gif";
pub const FOLDER_ICON: &str = "folder.gif";
pub const UNKNOWN_ICON: &str = "unknown.gif";

const SIZE_UNITS: &[&str] = &["bytes", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// `YYYY-MM-DD HH:MM`, see [`format_mtime`].
    pub modified_at: String,
    /// Human-readable size; `None` for directories.
    pub size: Option<String>,
    /// Icon file name inside the icon folder.
    pub icon: String,
    /// Relative link target.
    pub url: String,
    pub open_link: Option<ExternalLink>,
    pub is_dir: bool,
}

/// An external viewer link shown in the last column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLink {
    pub url: String,
    pub label: String,
}

/// Build the entry for `path`, which lives somewhere under `root`.
///
/// Follows symbolic links. A link whose target cannot be read (broken
/// symlink) returns the underlying I/O error; the indexer skips such
/// entries.
pub fn build_entry(path: &Path, root: &Path, config: &IndexConfig) -> io::Result<Entry> {
    let metadata = fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let is_dir = metadata.is_dir();

    let modified_at = format_mtime(metadata.modified()?);
    let size = (!is_dir).then(|| format_size(metadata.len()));
    let icon = resolve_icon(&name, is_dir, &config.icons).to_string();
    let url = if is_dir {
        format!("{name}/index.html")
    } else {
        name.clone()
    };
    let open_link = if metadata.is_file() {
        external_link(path, root, &config.links)
    } else {
        None
    };

    Ok(Entry {
        name,
        modified_at,
        size,
        icon,
        url,
        open_link,
        is_dir,
    })
}

/// Sort entries by name, case-sensitive, ascending.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Format a modification time as shown in the listing.
pub fn format_mtime(modified: SystemTime) -> String {
    let shifted = DateTime::<Utc>::from(modified) + TimeDelta::hours(MTIME_OFFSET_HOURS);
    shifted.format(MTIME_FORMAT).to_string()
}

/// Convert a byte count to a human-readable, 1024-based size.
///
/// Counts below 1024 are returned as a plain integer (`"1023"`); larger
/// counts get two decimals and a unit (`"1.00 KB"`, `"1.50 MB"`).
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return bytes.to_string();
    }
    let mut num = bytes as f64;
    for unit in SIZE_UNITS {
        if num < 1024.0 {
            return format!("{num:.2} {unit}");
        }
        num /= 1024.0;
    }
    // Beyond yottabytes: keep scaling in the largest unit.
    format!("{:.2} {}", num * 1024.0, SIZE_UNITS[SIZE_UNITS.len() - 1])
}

/// Resolve the icon for an entry name.
///
/// Priority: parent link → folder → first configured suffix → unknown.
/// Suffixes are compared literally and case-sensitively, in table order.
pub fn resolve_icon<'a>(name: &str, is_dir: bool, icons: &'a IconsConfig) -> &'a str {
    if name == PARENT_URL {
        return BACK_ICON;
    }
    if is_dir {
        return FOLDER_ICON;
    }
    icons
        .extensions
        .iter()
        .find(|(ext, _)| name.ends_with(ext.as_str()))
        .map(|(_, icon)| icon.as_str())
        .unwrap_or(UNKNOWN_ICON)
}

/// Build the external viewer link for a file, if its extension is configured.
///
/// The link is `viewer_url` + `base_url` without its scheme + the path
/// components following `path_marker` in the absolute path. When the marker
/// is not part of the path, the path relative to `root` is used instead.
pub fn external_link(path: &Path, root: &Path, links: &LinksConfig) -> Option<ExternalLink> {
    let name = path.file_name()?.to_string_lossy();
    if !links.extensions.iter().any(|ext| name.ends_with(ext.as_str())) {
        return None;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let tail = path_after_marker(&absolute, &links.path_marker)
        .or_else(|| relative_segments(path, root))?;

    let base = strip_scheme(&links.base_url).trim_end_matches('/');
    let url = if base.is_empty() {
        format!("{}{}", links.viewer_url, tail)
    } else {
        format!("{}{}/{}", links.viewer_url, base, tail)
    };

    Some(ExternalLink {
        url,
        label: links.label.clone(),
    })
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Components after the last occurrence of `marker`, joined with `/`.
fn path_after_marker(path: &Path, marker: &str) -> Option<String> {
    if marker.is_empty() {
        return None;
    }
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    let idx = parts.iter().rposition(|p| p == marker)?;
    let tail = &parts[idx + 1..];
    (!tail.is_empty()).then(|| tail.join("/"))
}

fn relative_segments(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}
