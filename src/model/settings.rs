// src/model/settings.rs

use serde::Deserialize;

use crate::errors::LoadError;

/// Theme used when settings do not name one (or failed to load).
pub const DEFAULT_THEME: &str = "dark";

/// Where a settings-like object came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Parsed from its source file.
    Source,
    /// Safe default installed after a failed load. It is never re-parsed;
    /// only the next full rebuild reads the source again.
    Fallback,
}

/// A search provider offered by the search bar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryProvider {
    pub name: String,
    pub url: String,
    /// Bang-style prefix, e.g. `"!g"`.
    #[serde(default)]
    pub prefix: Option<String>,
}

impl QueryProvider {
    fn builtin(name: &str, url: &str, prefix: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            prefix: Some(prefix.to_string()),
        }
    }
}

/// The built-in query-provider registry.
pub fn default_query_providers() -> Vec<QueryProvider> {
    vec![
        QueryProvider::builtin("Google", "https://www.google.com/search?q=", "!g"),
        QueryProvider::builtin("DuckDuckGo", "https://duckduckgo.com/?q=", "!d"),
        QueryProvider::builtin(
            "Wikipedia",
            "https://en.wikipedia.org/wiki/Special:Search?search=",
            "!w",
        ),
        QueryProvider::builtin("YouTube", "https://www.youtube.com/results?search_query=", "!yt"),
    ]
}

/// Global options from `settings.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    theme: String,
    query_providers: Option<Vec<QueryProvider>>,
    options: toml::Table,
    origin: Origin,
    error: Option<LoadError>,
}

impl Settings {
    pub fn new(
        theme: impl Into<String>,
        query_providers: Option<Vec<QueryProvider>>,
        options: toml::Table,
    ) -> Self {
        Self {
            theme: theme.into(),
            query_providers,
            options,
            origin: Origin::Source,
            error: None,
        }
    }

    /// Safe defaults: default theme, no registry override.
    pub fn fallback(error: Option<LoadError>) -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
            query_providers: None,
            options: toml::Table::new(),
            origin: Origin::Fallback,
            error,
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Registry override, if the source declared one.
    pub fn query_providers(&self) -> Option<&[QueryProvider]> {
        self.query_providers.as_deref()
    }

    /// Any other `[settings]` keys, passed through to the rendering layer.
    pub fn options(&self) -> &toml::Table {
        &self.options
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// Same settings with another active theme.
    pub fn with_theme(&self, theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            ..self.clone()
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::fallback(None)
    }
}
