// src/theme/mod.rs

//! Theme lookup and installation.
//!
//! Compilation itself is delegated to a [`ThemeCompiler`]; this module only
//! finds `{theme}.scss` (custom themes first, then built-in ones) and writes
//! the compiled bytes to the stylesheet path the rendering layer serves.
//! On any failure the previously installed stylesheet stays in place.

pub mod compiler;

use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::Layout;
use crate::errors::{LoadError, ResourceKind};
use crate::fs::FileSystem;

pub use compiler::{CompileError, SassCompiler, ThemeCompiler};

/// Extension of theme source files.
pub const THEME_EXTENSION: &str = "scss";

/// Theme names are bare file stems; anything that could leave the theme
/// directories is refused.
fn is_valid_theme_name(theme: &str) -> bool {
    !theme.is_empty()
        && !theme.contains("..")
        && !theme.contains(['/', '\\', '\0'])
}

/// Locate the source file for `theme`.
pub fn resolve_theme(
    fs: &dyn FileSystem,
    layout: &Layout,
    theme: &str,
) -> Result<PathBuf, LoadError> {
    if !is_valid_theme_name(theme) {
        return Err(LoadError::missing(ResourceKind::Theme, theme));
    }
    let file_name = format!("{theme}.{THEME_EXTENSION}");
    [layout.custom_themes_dir(), layout.system_themes_dir()]
        .into_iter()
        .map(|dir| dir.join(&file_name))
        .find(|candidate| fs.is_file(candidate))
        .ok_or_else(|| LoadError::missing(ResourceKind::Theme, theme))
}

/// Compile `theme` and install it as the served stylesheet.
pub fn install_theme(
    fs: &dyn FileSystem,
    compiler: &dyn ThemeCompiler,
    layout: &Layout,
    theme: &str,
) -> Result<(), LoadError> {
    let result = resolve_theme(fs, layout, theme)
        .and_then(|source| compile(compiler, theme, &source))
        .and_then(|css| write_stylesheet(fs, layout.stylesheet(), theme, &css));

    match &result {
        Ok(()) => info!(theme = %theme, stylesheet = ?layout.stylesheet(), "theme compiled"),
        Err(err) => error!(
            theme = %theme,
            error = %err,
            "theme not installed; keeping previous stylesheet"
        ),
    }
    result
}

fn compile(
    compiler: &dyn ThemeCompiler,
    theme: &str,
    source: &Path,
) -> Result<Vec<u8>, LoadError> {
    compiler.compile(source).map_err(|e| LoadError::Compile {
        theme: theme.to_string(),
        message: e.to_string(),
    })
}

fn write_stylesheet(
    fs: &dyn FileSystem,
    target: &Path,
    theme: &str,
    css: &[u8],
) -> Result<(), LoadError> {
    fs.write(target, css).map_err(|e| LoadError::Compile {
        theme: theme.to_string(),
        message: format!("{e:#}"),
    })
}
