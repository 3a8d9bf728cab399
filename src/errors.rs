// src/errors.rs

//! Crate-wide error types.
//!
//! Two families live here:
//! - [`DashgraphError`]: operational failures (bad layout file, a watch that
//!   could not be registered). These are returned with `?`.
//! - [`LoadError`]: failures of a single configuration source. These are never
//!   propagated; they are attached as values to the objects they concern
//!   (and stamped onto dashboards when they come from upstream sources).

use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashgraphError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DashgraphError>;

/// What kind of resource a [`LoadError::MissingResource`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Theme,
    SharedCard,
    QueryProvider,
    Dashboard,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Theme => "theme",
            ResourceKind::SharedCard => "shared card",
            ResourceKind::QueryProvider => "query provider",
            ResourceKind::Dashboard => "dashboard",
        };
        f.write_str(s)
    }
}

/// Failure of one configuration source, kept as a value on the object it
/// belongs to so the presentation layer can show it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// A settings / data-source / dashboard / shared-card file is malformed
    /// or unreadable.
    #[error("could not load {source_name}: {message}")]
    SourceParse {
        source_name: String,
        message: String,
    },

    /// Theme stylesheet compilation failed.
    #[error("could not compile theme '{theme}': {message}")]
    Compile { theme: String, message: String },

    /// A referenced theme, shared card or query provider does not exist.
    #[error("{kind} '{name}' not found")]
    MissingResource { kind: ResourceKind, name: String },
}

impl LoadError {
    pub fn source_parse(source_name: impl Into<String>, err: impl fmt::Display) -> Self {
        LoadError::SourceParse {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    pub fn missing(kind: ResourceKind, name: impl Into<String>) -> Self {
        LoadError::MissingResource {
            kind,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_messages_name_the_source() {
        let err = LoadError::source_parse("settings.toml", "expected `=`");
        assert_eq!(err.to_string(), "could not load settings.toml: expected `=`");

        let err = LoadError::missing(ResourceKind::SharedCard, "bookmarks");
        assert_eq!(err.to_string(), "shared card 'bookmarks' not found");
    }
}
