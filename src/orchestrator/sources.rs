// src/orchestrator/sources.rs

//! Watches on the top-level configuration sources.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::engine::ReloadRequest;
use crate::watch::{EventFilter, WatchCallback};

use super::{Orchestrator, lock};

impl Orchestrator {
    /// Every top-level source and the event class that triggers a full rebuild.
    pub fn source_watch_targets(&self) -> Vec<(PathBuf, EventFilter)> {
        let layout = &self.layout;
        let mut targets = vec![
            (layout.settings_file(), EventFilter::FileModified),
            (layout.dashboards_dir().to_path_buf(), EventFilter::EntryAdded),
            (layout.data_sources_file(), EventFilter::FileModified),
            (layout.shared_cards_file(), EventFilter::FileModified),
            (layout.users_file(), EventFilter::FileModified),
            (layout.custom_themes_dir().to_path_buf(), EventFilter::AnyEvent),
        ];
        targets.extend(
            layout
                .extra_watch_dirs()
                .iter()
                .map(|dir| (dir.clone(), EventFilter::AnyEvent)),
        );
        targets
    }

    /// Register the top-level watches. Each fires a full rebuild request.
    ///
    /// Sources that cannot be watched (e.g. a missing directory) are logged
    /// and skipped. Returns how many subscriptions are active. Calling this
    /// again replaces the previous set.
    pub fn start_watching(&self) -> usize {
        let mut subscriptions = Vec::new();
        for (path, filter) in self.source_watch_targets() {
            let tx = self.requests.clone();
            let callback: WatchCallback = Arc::new(move || {
                let _ = tx.send(ReloadRequest::Full);
            });
            match self.services.watcher.subscribe(&path, filter, callback) {
                Ok(sub) => subscriptions.push(sub),
                Err(err) => warn!(path = ?path, error = %err, "could not watch source; skipping"),
            }
        }

        let count = subscriptions.len();
        let mut work = lock(&self.work);
        for mut old in std::mem::replace(&mut work.source_watches, subscriptions) {
            old.cancel();
        }
        info!(count, "source watches started");
        count
    }
}
