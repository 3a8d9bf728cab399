// src/config/validate.rs

use std::path::Path;

use globset::Glob;

use crate::config::model::{Layout, RawLayout};
use crate::errors::{DashgraphError, Result};

impl Layout {
    /// Validate `raw` and resolve its paths against `root`.
    pub fn try_from_raw(root: &Path, raw: RawLayout) -> Result<Self> {
        validate_raw_layout(&raw)?;
        Ok(Layout::new_unchecked(root, raw))
    }
}

fn validate_raw_layout(raw: &RawLayout) -> Result<()> {
    validate_dashboards(raw)?;
    validate_watch(raw)?;
    Ok(())
}

fn validate_dashboards(raw: &RawLayout) -> Result<()> {
    if raw.dashboards.main.trim().is_empty() {
        return Err(DashgraphError::Config(
            "[dashboards].main must name a dashboard (got an empty string)".to_string(),
        ));
    }

    // Surface a bad glob at startup rather than on the first rebuild.
    Glob::new(&raw.dashboards.pattern)?;
    Ok(())
}

fn validate_watch(raw: &RawLayout) -> Result<()> {
    for dir in raw.watch.extra_dirs.iter() {
        if dir.as_os_str().is_empty() {
            return Err(DashgraphError::Config(
                "[watch].extra_dirs must not contain empty paths".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_main_dashboard_is_rejected() {
        let mut raw = RawLayout::default();
        raw.dashboards.main = "  ".to_string();

        match Layout::try_from_raw(Path::new("/"), raw) {
            Err(DashgraphError::Config(msg)) => assert!(msg.contains("[dashboards].main")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn invalid_dashboard_glob_is_rejected() {
        let mut raw = RawLayout::default();
        raw.dashboards.pattern = "*.{toml".to_string();

        assert!(matches!(
            Layout::try_from_raw(Path::new("/"), raw),
            Err(DashgraphError::Pattern(_))
        ));
    }
}
