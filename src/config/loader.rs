// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{Layout, RawLayout};
use crate::errors::Result;

/// File name looked up in `--root` when no `--layout` is given.
pub const DEFAULT_LAYOUT_FILE: &str = "Dashgraph.toml";

/// Load a layout file and return the raw `RawLayout`.
///
/// This only performs TOML deserialization; it does **not** validate or
/// resolve paths. Use [`load_layout`] for that.
pub fn load_raw_layout(path: impl AsRef<Path>) -> Result<RawLayout> {
    let contents = fs::read_to_string(path.as_ref())?;
    let raw: RawLayout = toml::from_str(&contents)?;
    Ok(raw)
}

/// Load and validate the layout for a dashgraph instance.
///
/// - If `path` exists it is parsed; relative paths inside it resolve against
///   the file's directory.
/// - If it does not exist, the default layout rooted at `root` is used.
pub fn load_layout(root: impl AsRef<Path>, path: impl AsRef<Path>) -> Result<Layout> {
    let root = root.as_ref();
    let path = path.as_ref();

    let (base, raw) = if path.is_file() {
        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => root.to_path_buf(),
        };
        (base, load_raw_layout(path)?)
    } else {
        debug!(path = ?path, "no layout file; using defaults");
        (root.to_path_buf(), RawLayout::default())
    };

    Layout::try_from_raw(&base, raw)
}
