// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Layout file as read from TOML.
///
/// ```toml
/// [paths]
/// config_dir = "config"
/// dashboards_dir = "config/dashboards"
/// custom_themes_dir = "config/themes"
/// system_themes_dir = "themes"
/// stylesheet = "static/css/vendors/bootstrap.min.css"
/// log_file = "dashgraph.log"
///
/// [dashboards]
/// pattern = "*.toml"
/// main = "main"
///
/// [watch]
/// extra_dirs = ["config/platform", "config/templates"]
/// ```
///
/// All sections are optional and have reasonable defaults. Relative paths are
/// kept as written here; [`Layout`] holds the resolved form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLayout {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub dashboards: DashboardsSection,

    #[serde(default)]
    pub watch: WatchSection,
}

/// `[paths]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    /// Directory holding `settings.toml`, `data_sources.toml`,
    /// `shared_cards.toml` and `users.toml`.
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// One TOML file per dashboard.
    #[serde(default = "default_dashboards_dir")]
    pub dashboards_dir: PathBuf,

    /// User themes; searched before `system_themes_dir`.
    #[serde(default = "default_custom_themes_dir")]
    pub custom_themes_dir: PathBuf,

    #[serde(default = "default_system_themes_dir")]
    pub system_themes_dir: PathBuf,

    /// Where the compiled theme is written for the rendering layer.
    #[serde(default = "default_stylesheet")]
    pub stylesheet: PathBuf,

    /// Optional log file. When set, logs go there instead of stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_config_dir() -> PathBuf {
    PathBuf::from("config")
}

fn default_dashboards_dir() -> PathBuf {
    PathBuf::from("config/dashboards")
}

fn default_custom_themes_dir() -> PathBuf {
    PathBuf::from("config/themes")
}

fn default_system_themes_dir() -> PathBuf {
    PathBuf::from("themes")
}

fn default_stylesheet() -> PathBuf {
    PathBuf::from("static/css/vendors/bootstrap.min.css")
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            dashboards_dir: default_dashboards_dir(),
            custom_themes_dir: default_custom_themes_dir(),
            system_themes_dir: default_system_themes_dir(),
            stylesheet: default_stylesheet(),
            log_file: None,
        }
    }
}

/// `[dashboards]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardsSection {
    /// Glob matched against file names in `dashboards_dir`.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Dashboard returned when a lookup by name misses.
    #[serde(default = "default_main")]
    pub main: String,
}

fn default_pattern() -> String {
    "*.toml".to_string()
}

fn default_main() -> String {
    "main".to_string()
}

impl Default for DashboardsSection {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            main: default_main(),
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// Additional directories whose every change triggers a full rebuild
    /// (templates, markdown, platform plugins).
    #[serde(default)]
    pub extra_dirs: Vec<PathBuf>,
}

/// Validated layout with every path resolved against the layout root.
///
/// Construct via [`Layout::try_from_raw`] (or the loader); the fields are
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
    config_dir: PathBuf,
    dashboards_dir: PathBuf,
    custom_themes_dir: PathBuf,
    system_themes_dir: PathBuf,
    stylesheet: PathBuf,
    log_file: Option<PathBuf>,
    dashboard_pattern: String,
    main_dashboard: String,
    extra_watch_dirs: Vec<PathBuf>,
}

impl Layout {
    /// Build a layout without validation. Used by the validator once the raw
    /// values have been checked.
    pub(crate) fn new_unchecked(root: &Path, raw: RawLayout) -> Self {
        fn resolve(root: &Path, p: &Path) -> PathBuf {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        }

        Self {
            root: root.to_path_buf(),
            config_dir: resolve(root, &raw.paths.config_dir),
            dashboards_dir: resolve(root, &raw.paths.dashboards_dir),
            custom_themes_dir: resolve(root, &raw.paths.custom_themes_dir),
            system_themes_dir: resolve(root, &raw.paths.system_themes_dir),
            stylesheet: resolve(root, &raw.paths.stylesheet),
            log_file: raw.paths.log_file.as_deref().map(|p| resolve(root, p)),
            dashboard_pattern: raw.dashboards.pattern,
            main_dashboard: raw.dashboards.main,
            extra_watch_dirs: raw
                .watch
                .extra_dirs
                .iter()
                .map(|p| resolve(root, p))
                .collect(),
        }
    }

    /// Default layout rooted at `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self::new_unchecked(root.as_ref(), RawLayout::default())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    pub fn data_sources_file(&self) -> PathBuf {
        self.config_dir.join("data_sources.toml")
    }

    pub fn shared_cards_file(&self) -> PathBuf {
        self.config_dir.join("shared_cards.toml")
    }

    pub fn users_file(&self) -> PathBuf {
        self.config_dir.join("users.toml")
    }

    pub fn dashboards_dir(&self) -> &Path {
        &self.dashboards_dir
    }

    pub fn custom_themes_dir(&self) -> &Path {
        &self.custom_themes_dir
    }

    pub fn system_themes_dir(&self) -> &Path {
        &self.system_themes_dir
    }

    pub fn stylesheet(&self) -> &Path {
        &self.stylesheet
    }

    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn dashboard_pattern(&self) -> &str {
        &self.dashboard_pattern
    }

    pub fn main_dashboard(&self) -> &str {
        &self.main_dashboard
    }

    pub fn extra_watch_dirs(&self) -> &[PathBuf] {
        &self.extra_watch_dirs
    }
}
