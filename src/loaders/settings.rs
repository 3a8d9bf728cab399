// src/loaders/settings.rs

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use crate::errors::LoadError;
use crate::fs::FileSystem;
use crate::model::{DEFAULT_THEME, QueryProvider, Settings};

#[derive(Debug, Deserialize, Default)]
struct RawSettingsFile {
    #[serde(default)]
    settings: RawSettings,
    #[serde(default)]
    query_providers: Option<Vec<QueryProvider>>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    #[serde(default = "default_theme")]
    theme: String,
    #[serde(flatten)]
    options: toml::Table,
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            options: toml::Table::new(),
        }
    }
}

/// Parse `settings.toml`.
///
/// On any read or parse failure the failure is logged and
/// [`Settings::fallback`] is returned with the error attached.
pub fn load_settings(fs: &dyn FileSystem, path: &Path) -> Settings {
    match try_load(fs, path) {
        Ok(settings) => {
            info!(theme = %settings.theme(), "settings loaded");
            settings
        }
        Err(err) => {
            error!(path = ?path, error = %err, "could not load settings");
            Settings::fallback(Some(err))
        }
    }
}

fn try_load(fs: &dyn FileSystem, path: &Path) -> Result<Settings, LoadError> {
    let source_name = source_name(path);
    let contents = fs
        .read_to_string(path)
        .map_err(|e| LoadError::source_parse(&source_name, format!("{e:#}")))?;
    let raw: RawSettingsFile =
        toml::from_str(&contents).map_err(|e| LoadError::source_parse(&source_name, e))?;

    if raw.settings.theme.trim().is_empty() {
        return Err(LoadError::source_parse(
            &source_name,
            "[settings].theme must not be empty",
        ));
    }

    Ok(Settings::new(
        raw.settings.theme,
        raw.query_providers,
        raw.settings.options,
    ))
}

pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
