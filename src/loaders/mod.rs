// src/loaders/mod.rs

//! Loaders for the individual configuration sources.
//!
//! Every loader returns a value, never an error: a failed load is logged and
//! produces a degraded object that carries a [`LoadError`](crate::errors::LoadError).
//! The orchestrator decides how those errors propagate.

pub mod dashboard;
pub mod data_sources;
pub mod settings;
pub mod shared_cards;

use serde::Deserialize;

pub use dashboard::{LoadContext, content_hash, dashboard_name, load_dashboard};
pub use data_sources::load_data_sources;
pub use settings::load_settings;
pub use shared_cards::load_shared_cards;

/// A `[[card]]` entry as written in a dashboard or shared-cards file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawCard {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub data_source: Option<String>,
    /// Reference to a shared card; only meaningful in dashboard files.
    #[serde(default)]
    pub shared: Option<String>,
    #[serde(flatten)]
    pub options: toml::Table,
}
