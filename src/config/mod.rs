// src/config/mod.rs

//! Configuration of the dashgraph process itself.
//!
//! Responsibilities:
//! - Define the TOML-backed layout model (`model.rs`).
//! - Load `Dashgraph.toml` from disk and resolve relative paths (`loader.rs`).
//! - Validate basic invariants like the dashboard glob compiling (`validate.rs`).
//!
//! The dashboard configuration graph (settings, data sources, dashboards)
//! is *not* handled here; see [`crate::loaders`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{DEFAULT_LAYOUT_FILE, load_layout, load_raw_layout};
pub use model::{DashboardsSection, Layout, PathsSection, RawLayout, WatchSection};
