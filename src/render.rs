//! Listing page rendering.
//!
//! The indexer does not know any HTML. It builds a [`ListingContext`] per
//! directory and hands it to a [`Renderer`], which returns the page text.
//! [`ApacheRenderer`] is the stock implementation: a `mod_autoindex` style
//! table rendered with [maud](https://maud.lambda.xyz/), so every name and
//! path is escaped.
//!
//! ## Page Layout
//!
//! ```text
//! Index of /docs
//! [ICO]  Name               Last modified      Size  Description
//! ---------------------------------------------------------------
//! [PARENTDIR] Parent Directory                    -
//! [DIR]  api/               2024-05-01 13:02      -
//! [   ]  guide.txt          2024-05-01 13:05  1.20 KB
//! ---------------------------------------------------------------
//! Apache/2.4.18 Server at localhost Port 80
//! ```

use crate::config::{IconsConfig, IndexConfig};
use crate::entry::{Entry, PARENT_URL, resolve_icon};
use maud::{DOCTYPE, Markup, html};
use std::path::{Component, Path, PathBuf};

/// Icon shown in the header row.
const BLANK_ICON: &str = "blank.gif";

/// Everything a renderer needs to produce one listing page.
#[derive(Debug, Clone)]
pub struct ListingContext {
    /// Sorted rows: directories first, then files.
    pub entries: Vec<Entry>,
    pub root: PathBuf,
    pub current_dir: PathBuf,
    /// Path of `current_dir` relative to `root`, `/`-separated; empty at the root.
    pub index_of: String,
    /// CSS font family, empty for the browser default.
    pub font: String,
    /// Banner text, present only when the banner is enabled.
    pub server_info: Option<String>,
    /// Base href for icon images, relative to `current_dir` or absolute.
    pub icons_href: String,
    /// Whether to render the parent-directory row.
    pub has_parent: bool,
    /// Icon for the parent-directory row.
    pub parent_icon: String,
}

impl ListingContext {
    /// Build the context for `current_dir` under `root`.
    pub fn new(entries: Vec<Entry>, root: &Path, current_dir: &Path, config: &IndexConfig) -> Self {
        let index_of = relative_label(current_dir, root);
        Self {
            entries,
            root: root.to_path_buf(),
            current_dir: current_dir.to_path_buf(),
            has_parent: !index_of.is_empty(),
            index_of,
            font: if config.monospaced_font {
                "monospace".to_string()
            } else {
                String::new()
            },
            server_info: config
                .show_server_info
                .then(|| config.server_info.clone()),
            icons_href: icons_href(current_dir, root, &config.icons),
            parent_icon: resolve_icon(PARENT_URL, true, &config.icons).to_string(),
        }
    }

    /// Page title, e.g. `Index of /docs/api`.
    pub fn title(&self) -> String {
        format!("Index of /{}", self.index_of)
    }
}

/// Turns a listing context into page text.
pub trait Renderer {
    fn render(&self, listing: &ListingContext) -> String;
}

/// Apache `mod_autoindex` look-alike.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApacheRenderer;

impl Renderer for ApacheRenderer {
    fn render(&self, listing: &ListingContext) -> String {
        render_listing(listing).into_string()
    }
}

/// Where pages in `dir` load icons from.
///
/// A configured remote URL wins. Otherwise the path from `dir` to the icon
/// folder at `root`, e.g. `_icons` at the root and `../../_icons` two levels
/// down.
pub fn icons_href(dir: &Path, root: &Path, icons: &IconsConfig) -> String {
    if let Some(remote) = &icons.remote_url {
        return remote.trim_end_matches('/').to_string();
    }
    let target = root.join(&icons.folder_name);
    match pathdiff::diff_paths(&target, dir) {
        Some(rel) => join_components(&rel),
        None => icons.folder_name.clone(),
    }
}

fn relative_label(dir: &Path, root: &Path) -> String {
    dir.strip_prefix(root)
        .map(join_components)
        .unwrap_or_default()
}

/// Join path components with `/` regardless of platform.
fn join_components(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

// ============================================================================
// HTML Components
// ============================================================================

fn render_listing(listing: &ListingContext) -> Markup {
    let title = listing.title();
    let body_style = (!listing.font.is_empty()).then(|| format!("font-family: {};", listing.font));

    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { (title) }
            }
            body style=[body_style] {
                h1 { (title) }
                table {
                    tr {
                        th valign="top" {
                            img src={ (listing.icons_href) "/" (BLANK_ICON) } alt="[ICO]";
                        }
                        th { "Name" }
                        th { "Last modified" }
                        th { "Size" }
                        th { "Description" }
                    }
                    tr { th colspan="5" { hr; } }
                    @if listing.has_parent {
                        (parent_row(listing))
                    }
                    @for entry in &listing.entries {
                        (entry_row(entry, &listing.icons_href))
                    }
                    tr { th colspan="5" { hr; } }
                }
                @if let Some(info) = &listing.server_info {
                    address { (info) }
                }
            }
        }
    }
}

fn parent_row(listing: &ListingContext) -> Markup {
    html! {
        tr {
            td valign="top" {
                img src={ (listing.icons_href) "/" (listing.parent_icon) } alt="[PARENTDIR]";
            }
            td { a href=(PARENT_URL) { "Parent Directory" } }
            td { "\u{a0}" }
            td align="right" { "  - " }
            td { "\u{a0}" }
        }
    }
}

fn entry_row(entry: &Entry, icons_href: &str) -> Markup {
    let alt = if entry.is_dir { "[DIR]" } else { "[   ]" };
    let display_name = if entry.is_dir {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    };
    let modified = entry.modified_at.replace(' ', "\u{a0}");
    let size = entry.size.as_deref().unwrap_or("  - ").replace(' ', "\u{a0}");

    html! {
        tr {
            td valign="top" {
                img src={ (icons_href) "/" (entry.icon) } alt=(alt);
            }
            td { a href=(entry.url) { (display_name) } }
            td align="right" { (modified) }
            td align="right" { (size) }
            td {
                @if let Some(link) = &entry.open_link {
                    a href=(link.url) { (link.label) }
                } @else {
                    "\u{a0}"
                }
            }
        }
    }
}
