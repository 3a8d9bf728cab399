// src/model/dashboard.rs

use std::path::{Path, PathBuf};

use crate::errors::{LoadError, ResourceKind};
use crate::model::card::Card;

/// One dashboard, loaded from `<dashboards_dir>/<name>.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    name: String,
    title: Option<String>,
    source: PathBuf,
    source_hash: Option<String>,
    cards: Vec<Card>,
    error: Option<LoadError>,
    generation: u64,
}

impl Dashboard {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<PathBuf>,
        generation: u64,
    ) -> Self {
        Self {
            name: name.into(),
            title: None,
            source: source.into(),
            source_hash: None,
            cards: Vec::new(),
            error: None,
            generation,
        }
    }

    /// Stand-in used when the configured main dashboard has no source file.
    pub fn placeholder(name: &str, dashboards_dir: &Path, generation: u64) -> Self {
        Dashboard::new(name, dashboards_dir.join(format!("{name}.toml")), generation)
            .with_error(LoadError::missing(ResourceKind::Dashboard, name))
    }

    pub fn with_title(self, title: Option<String>) -> Self {
        Self { title, ..self }
    }

    pub fn with_cards(self, cards: Vec<Card>) -> Self {
        Self { cards, ..self }
    }

    pub fn with_source_hash(self, hash: impl Into<String>) -> Self {
        Self {
            source_hash: Some(hash.into()),
            ..self
        }
    }

    /// The same dashboard reporting `error`, replacing any error it had.
    pub fn with_error(self, error: LoadError) -> Self {
        Self {
            error: Some(error),
            ..self
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// blake3 hash of the source text the cards were parsed from.
    pub fn source_hash(&self) -> Option<&str> {
        self.source_hash.as_deref()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    /// Id of the rebuild that produced this dashboard.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
