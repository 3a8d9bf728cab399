// src/loaders/data_sources.rs

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use crate::errors::LoadError;
use crate::fs::FileSystem;
use crate::loaders::settings::source_name;
use crate::model::{DataSource, DataSourceHandler};

#[derive(Debug, Deserialize)]
struct RawDataSource {
    platform: String,
    #[serde(flatten)]
    options: toml::Table,
}

/// Parse `data_sources.toml`: one table per source, each with a `platform`.
///
/// Failure yields an empty table carrying the error.
pub fn load_data_sources(fs: &dyn FileSystem, path: &Path) -> DataSourceHandler {
    match try_load(fs, path) {
        Ok(handler) => {
            info!(sources = handler.len(), "data sources loaded");
            handler
        }
        Err(err) => {
            error!(path = ?path, error = %err, "could not load data sources");
            DataSourceHandler::fallback(Some(err))
        }
    }
}

fn try_load(fs: &dyn FileSystem, path: &Path) -> Result<DataSourceHandler, LoadError> {
    let source_name = source_name(path);
    let contents = fs
        .read_to_string(path)
        .map_err(|e| LoadError::source_parse(&source_name, format!("{e:#}")))?;
    let raw: BTreeMap<String, RawDataSource> =
        toml::from_str(&contents).map_err(|e| LoadError::source_parse(&source_name, e))?;

    let sources = raw
        .into_iter()
        .map(|(name, src)| {
            (
                name,
                DataSource {
                    platform: src.platform,
                    options: src.options,
                },
            )
        })
        .collect();

    Ok(DataSourceHandler::new(sources))
}
