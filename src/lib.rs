//! # autoindex
//!
//! Generates Apache `mod_autoindex` style `index.html` listing pages for a
//! directory tree, one page per directory. Each row shows an icon, the
//! linked name, the modification time, the size and an optional external
//! viewer link.
//!
//! # Pipeline
//!
//! ```text
//! walk → filter names → build entries → render → idempotent write
//! ```
//!
//! Every stage below the walk is a plain function of its inputs, so tests
//! exercise filtering, entry construction and rendering without a full run.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`index`] | Walks the tree and writes one page per directory |
//! | [`filter`] | Removes hidden, generated, icon-folder and ignored names |
//! | [`entry`] | Builds listing rows: icon, size, timestamp, links |
//! | [`render`] | `Renderer` trait, `ListingContext`, maud Apache renderer |
//! | [`clean`] | Deletes generated `index.html` files |
//! | [`config`] | `.autoindex.toml` loading, merging and validation |
//! | [`output`] | CLI summary formatting |
//!
//! # Design Decisions
//!
//! ## Idempotent Writes
//!
//! A page is only written when its content changed (compared after trimming
//! surrounding whitespace), so re-running over an unchanged tree touches no
//! files and leaves modification times alone. The `if-missing` write policy
//! goes further and never replaces an existing page.
//!
//! ## Explicit Configuration
//!
//! The config is resolved once at startup and passed by reference. Per-run
//! switches (recursion, ignored extensions) live in
//! [`index::RunOptions`]. There is no global state.
//!
//! ## Ordered Icon Table
//!
//! Icons are matched by suffix against an ordered table and the first match
//! wins, so overlapping suffixes (`.tar.gz` and `.gz`) resolve the same way
//! on every run.
//!
//! ## Fixed Timestamp Offset
//!
//! Modification times are shown in UTC shifted forward by one hour
//! ([`entry::MTIME_OFFSET_HOURS`]). This is a fixed offset, not a local
//! time conversion.

pub mod clean;
pub mod config;
pub mod entry;
pub mod filter;
pub mod index;
pub mod output;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
