// src/model/data_source.rs

use std::collections::BTreeMap;

use crate::errors::LoadError;
use crate::model::settings::Origin;

/// Connection / query configuration for one named data source.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub platform: String,
    pub options: toml::Table,
}

/// Lookup table of data sources from `data_sources.toml`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSourceHandler {
    sources: BTreeMap<String, DataSource>,
    origin: Origin,
    error: Option<LoadError>,
}

impl DataSourceHandler {
    pub fn new(sources: BTreeMap<String, DataSource>) -> Self {
        Self {
            sources,
            origin: Origin::Source,
            error: None,
        }
    }

    /// Empty table carrying `error`.
    pub fn fallback(error: Option<LoadError>) -> Self {
        Self {
            sources: BTreeMap::new(),
            origin: Origin::Fallback,
            error,
        }
    }

    pub fn get(&self, name: &str) -> Option<&DataSource> {
        self.sources.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }
}

impl Default for DataSourceHandler {
    fn default() -> Self {
        DataSourceHandler::fallback(None)
    }
}
