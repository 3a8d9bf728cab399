// src/model/mod.rs

//! In-memory configuration graph.
//!
//! Every object here is an immutable value. The orchestrator derives new
//! values (e.g. an error-stamped [`Dashboard`]) instead of mutating loaded
//! ones, and publishes a whole [`Generation`] at once.

pub mod card;
pub mod dashboard;
pub mod data_source;
pub mod generation;
pub mod settings;

pub use card::{Card, DEFAULT_CARD_TYPE, SharedCards};
pub use dashboard::Dashboard;
pub use data_source::{DataSource, DataSourceHandler};
pub use generation::{Generation, GenerationParts};
pub use settings::{DEFAULT_THEME, Origin, QueryProvider, Settings, default_query_providers};
