#![allow(dead_code)]

use std::path::PathBuf;

use dashgraph::config::Layout;
use dashgraph::fs::mock::MockFileSystem;

/// Root every builder-made layout lives under.
pub const SITE_ROOT: &str = "/site";

pub const VALID_SETTINGS: &str = r#"
[settings]
theme = "dark"
"#;

pub const VALID_DATA_SOURCES: &str = r#"
[weather]
platform = "weather"
location = "Oslo"
"#;

/// Builder for an in-memory config tree using the default layout.
pub struct ConfigTreeBuilder {
    fs: MockFileSystem,
    layout: Layout,
}

impl ConfigTreeBuilder {
    /// Empty tree: only the directories exist.
    pub fn empty() -> Self {
        let fs = MockFileSystem::new();
        let layout = Layout::with_root(SITE_ROOT);
        fs.add_dir(layout.dashboards_dir());
        fs.add_dir(layout.custom_themes_dir());
        fs.add_dir(layout.system_themes_dir());
        Self { fs, layout }
    }

    /// Valid settings and data sources, the built-in `dark` theme, no dashboards.
    pub fn new() -> Self {
        Self::empty()
            .settings(VALID_SETTINGS)
            .data_sources(VALID_DATA_SOURCES)
            .shared_cards("")
            .system_theme("dark", "body { color: #eee; }")
    }

    pub fn settings(self, contents: &str) -> Self {
        self.fs.add_file(self.layout.settings_file(), contents);
        self
    }

    pub fn data_sources(self, contents: &str) -> Self {
        self.fs.add_file(self.layout.data_sources_file(), contents);
        self
    }

    pub fn shared_cards(self, contents: &str) -> Self {
        self.fs.add_file(self.layout.shared_cards_file(), contents);
        self
    }

    pub fn dashboard(self, name: &str, contents: &str) -> Self {
        self.fs.add_file(self.dashboard_path(name), contents);
        self
    }

    /// Dashboard with `n` simple cards named `<name>-<i>`.
    pub fn dashboard_with_cards(self, name: &str, n: usize) -> Self {
        let contents = (0..n)
            .map(|i| format!("[[card]]\nname = \"{name}-{i}\"\ntype = \"link\"\n"))
            .collect::<Vec<_>>()
            .join("\n");
        self.dashboard(name, &contents)
    }

    pub fn system_theme(self, name: &str, contents: &str) -> Self {
        self.fs
            .add_file(self.layout.system_themes_dir().join(format!("{name}.scss")), contents);
        self
    }

    pub fn custom_theme(self, name: &str, contents: &str) -> Self {
        self.fs
            .add_file(self.layout.custom_themes_dir().join(format!("{name}.scss")), contents);
        self
    }

    pub fn dashboard_path(&self, name: &str) -> PathBuf {
        self.layout.dashboards_dir().join(format!("{name}.toml"))
    }

    pub fn build(self) -> (MockFileSystem, Layout) {
        (self.fs, self.layout)
    }
}

impl Default for ConfigTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
