// src/orchestrator/build.rs

//! The full rebuild sequence.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::engine::ReloadRequest;
use crate::errors::LoadError;
use crate::loaders::{
    LoadContext, dashboard_name, load_dashboard, load_data_sources, load_settings,
    load_shared_cards,
};
use crate::model::{
    Dashboard, DataSourceHandler, Generation, GenerationParts, QueryProvider, Settings,
    SharedCards, default_query_providers,
};
use crate::theme::install_theme;
use crate::watch::{EventFilter, WatchCallback};

use super::{Orchestrator, WorkState, lock};

/// Replace every dashboard with a copy carrying `err`.
fn stamp(dashboards: BTreeMap<String, Dashboard>, err: &LoadError) -> BTreeMap<String, Dashboard> {
    dashboards
        .into_iter()
        .map(|(name, dboard)| (name, dboard.with_error(err.clone())))
        .collect()
}

impl Orchestrator {
    /// One rebuild cycle. Holds the work lock throughout.
    pub(super) fn run_build(&self) -> Arc<Generation> {
        let mut work = lock(&self.work);
        work.last_id += 1;
        let id = work.last_id;
        info!(generation = id, "rebuilding configuration");

        let fs = self.services.fs.as_ref();

        // Errors travel as values on the loaded objects; nothing to clear.

        let settings = load_settings(fs, &self.layout.settings_file());
        let query_providers: Arc<Vec<QueryProvider>> = Arc::new(match settings.query_providers() {
            Some(providers) => providers.to_vec(),
            None => default_query_providers(),
        });

        let theme_error = install_theme(
            fs,
            self.services.compiler.as_ref(),
            &self.layout,
            settings.theme(),
        )
        .err();

        let data_sources = load_data_sources(fs, &self.layout.data_sources_file());

        let shared_cards = load_shared_cards(fs, &self.layout.shared_cards_file());

        let dashboards = self.load_dashboards(id, &query_providers, &shared_cards);

        let (settings, dashboards) = match settings.error().cloned() {
            Some(err) => {
                warn!(error = %err, "settings failed to load; stamping error onto dashboards");
                let dashboards = stamp(dashboards, &err);
                (Settings::fallback(Some(err)), dashboards)
            }
            None => (settings, dashboards),
        };

        let (data_sources, dashboards) = match data_sources.error().cloned() {
            Some(err) => {
                warn!(error = %err, "data sources failed to load; stamping error onto dashboards");
                let dashboards = stamp(dashboards, &err);
                (DataSourceHandler::fallback(Some(err)), dashboards)
            }
            None => (data_sources, dashboards),
        };

        let generation = Arc::new(Generation::assemble(
            GenerationParts {
                id,
                settings,
                data_sources,
                shared_cards,
                query_providers,
                theme_error,
                dashboards,
            },
            self.layout.main_dashboard(),
            self.layout.dashboards_dir(),
        ));

        self.sync_dashboard_watches(&mut work, &generation);

        self.publish(Arc::clone(&generation));
        info!(
            generation = id,
            dashboards = generation.dashboard_names().count(),
            "configuration built"
        );
        generation
    }

    /// Load every dashboard file currently in the dashboards directory.
    fn load_dashboards(
        &self,
        id: u64,
        query_providers: &[QueryProvider],
        shared_cards: &SharedCards,
    ) -> BTreeMap<String, Dashboard> {
        let fs = self.services.fs.as_ref();
        let dir = self.layout.dashboards_dir();

        if !fs.is_dir(dir) {
            warn!(dir = ?dir, "dashboards directory missing; serving no dashboards");
            return BTreeMap::new();
        }
        let mut entries: Vec<PathBuf> = match fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                error!(dir = ?dir, error = %format!("{err:#}"), "could not list dashboards");
                Vec::new()
            }
        };
        // Directory order is arbitrary; duplicates resolve deterministically.
        entries.sort();

        let ctx = LoadContext {
            query_providers,
            shared_cards,
            generation: id,
        };

        let mut dashboards = BTreeMap::new();
        for path in entries {
            if !fs.is_file(&path) {
                continue;
            }
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if file_name.to_string_lossy().starts_with('.')
                || !self.dashboard_pattern.is_match(file_name)
            {
                debug!(path = ?path, "not a dashboard file; skipping");
                continue;
            }
            let Some(name) = dashboard_name(&path) else {
                continue;
            };
            if dashboards.contains_key(&name) {
                warn!(dashboard = %name, path = ?path, "duplicate dashboard name; skipping");
                continue;
            }
            let dboard = load_dashboard(fs, &path, &name, ctx);
            dashboards.insert(name, dboard);
        }
        dashboards
    }

    /// Point one card-level watch at each dashboard of `generation`,
    /// cancelling watches of dashboards that no longer exist.
    fn sync_dashboard_watches(&self, work: &mut WorkState, generation: &Generation) {
        let desired: BTreeMap<String, PathBuf> = generation
            .dashboards()
            .map(|d| (d.name().to_string(), d.source().to_path_buf()))
            .collect();

        let watcher = Arc::clone(&self.services.watcher);
        let diff = work.dashboard_watches.sync(&desired, |name, path| {
            let tx = self.requests.clone();
            let name = name.to_string();
            let callback: WatchCallback = Arc::new(move || {
                let _ = tx.send(ReloadRequest::Dashboard(name.clone()));
            });
            watcher.subscribe(path, EventFilter::FileModified, callback)
        });

        if !diff.added.is_empty() || !diff.removed.is_empty() {
            info!(
                added = ?diff.added,
                removed = ?diff.removed,
                kept = diff.kept.len(),
                "dashboard watches updated"
            );
        }
    }
}
