//! Index configuration module.
//!
//! Handles loading, validating, and merging `.autoindex.toml` files. The
//! configuration is layered: stock defaults are overridden by a user config
//! file, either `<root>/.autoindex.toml` or a path given on the command line.
//!
//! The resolved [`IndexConfig`] is built once at startup and passed by
//! reference into the indexer and the renderer. Nothing mutates it during a
//! run.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! hide_hidden_entries = true   # Skip dotfiles and dot-directories
//! hide_index_files = true      # Do not list generated index.html files
//! hide_icon_folder = true      # Do not list the icon asset folder
//! monospaced_font = true       # Render the listing in a monospace font
//! show_server_info = true      # Print the server banner under the table
//! server_info = "Apache/2.4.18 Server at localhost Port 80"
//! write_policy = "when-changed"   # or "if-missing"
//!
//! [icons]
//! folder_name = "_icons"       # Icon folder at the listing root
//! # remote_url = "https://example.com/icons"
//!
//! [icons.extensions]
//! ".txt" = "text.gif"
//! ".png" = "image2.gif"
//!
//! [links]
//! base_url = "https://example.com/"
//! viewer_url = "http://nbviewer.ipython.org/urls/"
//! path_marker = "Public"
//! extensions = [".ipynb"]
//! label = "nbview"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse, override just the values you want:
//!
//! ```toml
//! show_server_info = false
//!
//! [icons.extensions]
//! ".rs" = "text.gif"
//! ```
//!
//! Extension tables are merged key by key onto the stock table, and the
//! resulting order is stock order followed by any new keys in file order.
//! Unknown keys are rejected to catch typos early.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the per-tree config file looked up in the listing root.
pub const CONFIG_FILENAME: &str = ".autoindex.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// When an existing `index.html` may be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    /// Write when the page is missing or its trimmed content differs.
    WhenChanged,
    /// Write only when no page exists yet. Existing pages are never touched.
    IfMissing,
}

/// Listing configuration loaded from `.autoindex.toml`.
///
/// All fields have defaults matching a stock Apache listing. Unknown keys
/// are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Skip entries (and directories) whose name starts with `.`.
    pub hide_hidden_entries: bool,
    /// Do not list `index.html` files in the listings.
    pub hide_index_files: bool,
    /// Do not list the icon folder.
    pub hide_icon_folder: bool,
    /// Render the page in a monospace font.
    pub monospaced_font: bool,
    /// Show the server banner below the table.
    pub show_server_info: bool,
    /// Banner text.
    pub server_info: String,
    /// Replacement rule for existing pages.
    pub write_policy: WritePolicy,
    /// Icon folder and extension mapping.
    pub icons: IconsConfig,
    /// External "open" links for special file types.
    pub links: LinksConfig,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            hide_hidden_entries: true,
            hide_index_files: true,
            hide_icon_folder: true,
            monospaced_font: true,
            show_server_info: true,
            server_info: "Apache/2.4.18 Server at localhost Port 80".to_string(),
            write_policy: WritePolicy::WhenChanged,
            icons: IconsConfig::default(),
            links: LinksConfig::default(),
        }
    }
}

impl IndexConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let folder = &self.icons.folder_name;
        if folder.is_empty() || folder.contains('/') || folder.contains('\\') {
            return Err(ConfigError::Validation(
                "icons.folder_name must be a single non-empty path component".into(),
            ));
        }
        if let Some((ext, _)) = self.icons.extensions.iter().find(|(e, _)| e.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "icons.extensions has an empty extension key: {ext:?}"
            )));
        }
        if let Some((ext, _)) = self.icons.extensions.iter().find(|(_, i)| i.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "icons.extensions.{ext:?} must name an icon file"
            )));
        }
        if self.links.extensions.iter().any(|e| e.is_empty()) {
            return Err(ConfigError::Validation(
                "links.extensions must not contain empty entries".into(),
            ));
        }
        Ok(())
    }
}

/// Icon asset location and extension → icon mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    /// Name of the icon folder inside the listing root.
    pub folder_name: String,
    /// Absolute icon base URL. When set, pages link here instead of the
    /// relative local folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    /// Suffix → icon file. Checked in order, first match wins.
    pub extensions: IndexMap<String, String>,
}

impl Default for IconsConfig {
    fn default() -> Self {
        let extensions = [
            (".txt", "text.gif"),
            (".png", "image2.gif"),
            (".jpg", "image2.gif"),
            (".jpeg", "image2.gif"),
            (".bmp", "image2.gif"),
            (".gif", "image2.gif"),
            (".doc", "doc.gif"),
            (".htm", "link.gif"),
            (".html", "link.gif"),
            (".mp3", "sound2.gif"),
            (".mp4", "sound2.gif"),
            (".flac", "sound2.gif"),
            (".wav", "sound2.gif"),
            (".wma", "sound2.gif"),
            (".midi", "sound2.gif"),
            (".py", "python.gif"),
            (".tex", "tex.gif"),
            (".tar", "tar.gif"),
        ]
        .into_iter()
        .map(|(ext, icon)| (ext.to_string(), icon.to_string()))
        .collect();

        Self {
            folder_name: "_icons".to_string(),
            remote_url: None,
            extensions,
        }
    }
}

/// External viewer links (e.g. notebooks rendered by nbviewer).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    /// Public URL the listed tree is served from.
    pub base_url: String,
    /// Viewer prefix the scheme-less base URL is appended to.
    pub viewer_url: String,
    /// Path component after which the absolute path maps onto `base_url`.
    pub path_marker: String,
    /// File extensions that get an external link.
    pub extensions: Vec<String>,
    /// Link text.
    pub label: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.com/".to_string(),
            viewer_url: "http://nbviewer.ipython.org/urls/".to_string(),
            path_marker: "Public".to_string(),
            extensions: vec![".ipynb".to_string()],
            label: "nbview".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(IndexConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys in place).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
/// - New keys from overlay are appended after the base keys.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(slot) => {
                        let base_val = std::mem::replace(slot, toml::Value::Boolean(false));
                        *slot = merge_toml(base_val, overlay_val);
                    }
                    None => {
                        base_table.insert(key, overlay_val);
                    }
                }
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<IndexConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: IndexConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `.autoindex.toml` in the listing root.
///
/// Uses stock defaults when the file does not exist.
pub fn load_config(root: &Path) -> Result<IndexConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILENAME))
}

/// Load config from an explicit file path, merged onto stock defaults.
pub fn load_config_file(config_path: &Path) -> Result<IndexConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(config_path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `.autoindex.toml` with all keys.
///
/// Used by the `--gen-config` flag.
pub fn stock_config_toml() -> &'static str {
    r##"# autoindex configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at <root>/.autoindex.toml or pass it with --config.
# Unknown keys will cause an error.

# Skip files and directories whose name starts with a dot.
hide_hidden_entries = true

# Do not list generated index.html files.
hide_index_files = true

# Do not list the icon folder (see [icons] folder_name).
hide_icon_folder = true

# Render the listing in a monospace font.
monospaced_font = true

# Server banner shown below the listing table.
show_server_info = true
server_info = "Apache/2.4.18 Server at localhost Port 80"

# When to replace an existing index.html:
#   "when-changed" -> rewrite only if the rendered page differs
#   "if-missing"   -> never touch an existing index.html
write_policy = "when-changed"

# ---------------------------------------------------------------------------
# Icons
# ---------------------------------------------------------------------------
[icons]
# Folder holding the icon files, relative to the listing root.
folder_name = "_icons"

# Absolute URL to serve icons from instead of the local folder.
# remote_url = "https://example.com/icons"

# Suffix -> icon file. Checked top to bottom, the first match wins, so list
# longer suffixes before shorter ones that end the same way.
[icons.extensions]
".txt" = "text.gif"
".png" = "image2.gif"
".jpg" = "image2.gif"
".jpeg" = "image2.gif"
".bmp" = "image2.gif"
".gif" = "image2.gif"
".doc" = "doc.gif"
".htm" = "link.gif"
".html" = "link.gif"
".mp3" = "sound2.gif"
".mp4" = "sound2.gif"
".flac" = "sound2.gif"
".wav" = "sound2.gif"
".wma" = "sound2.gif"
".midi" = "sound2.gif"
".py" = "python.gif"
".tex" = "tex.gif"
".tar" = "tar.gif"

# ---------------------------------------------------------------------------
# External viewer links
# ---------------------------------------------------------------------------
[links]
# Public URL the listed tree is served from.
base_url = "https://example.com/"

# Viewer prefix; the base URL without its scheme is appended to it.
viewer_url = "http://nbviewer.ipython.org/urls/"

# Path component after which the file path maps onto base_url.
path_marker = "Public"

# Files with these extensions get an extra link in the listing.
extensions = [".ipynb"]

# Link text.
label = "nbview"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_hides_everything() {
        let config = IndexConfig::default();
        assert!(config.hide_hidden_entries);
        assert!(config.hide_index_files);
        assert!(config.hide_icon_folder);
        assert_eq!(config.write_policy, WritePolicy::WhenChanged);
    }

    #[test]
    fn default_icon_table_keeps_order() {
        let config = IndexConfig::default();
        let keys: Vec<&str> = config
            .icons
            .extensions
            .keys()
            .take(3)
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec![".txt", ".png", ".jpg"]);
        assert_eq!(config.icons.folder_name, "_icons");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
show_server_info = false
write_policy = "if-missing"
"#;
        let config: IndexConfig = toml::from_str(toml).unwrap();
        assert!(!config.show_server_info);
        assert_eq!(config.write_policy, WritePolicy::IfMissing);
        // Defaults preserved
        assert!(config.hide_hidden_entries);
        assert_eq!(config.links.label, "nbview");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.icons.extensions.len(), 18);
        assert_eq!(config.server_info, IndexConfig::default().server_info);
    }

    #[test]
    fn load_config_merges_icon_table() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            r#"
[icons.extensions]
".txt" = "plain.gif"
".rs" = "rust.gif"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        let exts = &config.icons.extensions;
        assert_eq!(exts.get(".txt").map(String::as_str), Some("plain.gif"));
        assert_eq!(exts.get(".png").map(String::as_str), Some("image2.gif"));
        // Overridden key stays in place, new key goes last
        assert_eq!(exts.get_index(0).map(|(k, _)| k.as_str()), Some(".txt"));
        assert_eq!(exts.last().map(|(k, _)| k.as_str()), Some(".rs"));
    }

    #[test]
    fn load_config_file_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "monospaced_font = false\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert!(!config.monospaced_font);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = "hide_everything = true\n";
        let result: Result<IndexConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_write_policy_rejected() {
        let toml = "write_policy = \"always\"\n";
        let result: Result<IndexConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validate_folder_name_with_slash() {
        let mut config = IndexConfig::default();
        config.icons.folder_name = "assets/icons".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_empty_icon_rejected() {
        let mut config = IndexConfig::default();
        config
            .icons
            .extensions
            .insert(".rs".to_string(), String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(IndexConfig::default().validate().is_ok());
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str("[x.y]\nz = 1\nw = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[x.y]\nz = 9").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["x"]["y"]["z"].as_integer(), Some(9));
        assert_eq!(merged["x"]["y"]["w"].as_integer(), Some(2));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[icons]\nfolder_name = \"\"").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: IndexConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = IndexConfig::default();
        assert_eq!(parsed.icons.extensions, defaults.icons.extensions);
        assert_eq!(parsed.server_info, defaults.server_info);
        assert_eq!(parsed.write_policy, defaults.write_policy);
        assert_eq!(parsed.links.viewer_url, defaults.links.viewer_url);
        assert_eq!(parsed.icons.remote_url, None);
    }
}
