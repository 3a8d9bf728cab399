// src/orchestrator/mod.rs

//! The rebuild orchestrator.
//!
//! Owns the live [`Generation`], sequences full rebuilds, re-wires the
//! per-dashboard watch subscriptions after each one, and serves lookups.
//!
//! Locking:
//! - `control` decides who builds. A `build()` that arrives while another
//!   is in flight only sets `pending`; the in-flight builder runs one more
//!   cycle before returning.
//! - `work` is held for the whole rebuild sequence, and for card-level
//!   reloads and theme changes, so those never interleave.
//! - `current` is an `ArcSwap`; readers never block and only a finished
//!   generation is ever stored.

mod build;
mod sources;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use arc_swap::ArcSwap;
use globset::{Glob, GlobMatcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::Layout;
use crate::engine::{ReloadRequest, ReloadTarget};
use crate::errors::{LoadError, Result};
use crate::fs::FileSystem;
use crate::loaders::{LoadContext, load_dashboard};
use crate::model::{Dashboard, Generation};
use crate::theme::{ThemeCompiler, install_theme};
use crate::watch::{SubscriptionTable, WatchBackend, WatchSubscription};

/// Result of [`Orchestrator::build`].
#[derive(Debug, Clone)]
pub enum BuildOutcome {
    /// This call ran the rebuild (plus any that were requested meanwhile).
    Built(Arc<Generation>),
    /// Another rebuild was in flight; it will run once more on our behalf.
    Coalesced,
}

impl BuildOutcome {
    pub fn generation(&self) -> Option<&Arc<Generation>> {
        match self {
            BuildOutcome::Built(generation) => Some(generation),
            BuildOutcome::Coalesced => None,
        }
    }
}

/// Result of [`Orchestrator::reload_dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardReload {
    /// Cards were re-read and a new snapshot published.
    Reloaded,
    /// The source text has not changed since it was last loaded.
    Unchanged,
    /// No dashboard of that name in the current generation.
    Unknown,
    /// The source file is gone; a full rebuild was requested instead.
    Escalated,
}

#[derive(Debug, Default)]
struct BuildControl {
    building: bool,
    pending: bool,
}

/// Clears `building` if a rebuild unwinds, so later builds are not
/// coalesced into one that will never finish.
struct InFlight<'a> {
    control: &'a Mutex<BuildControl>,
    armed: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut control = lock(self.control);
            control.building = false;
            control.pending = false;
            warn!("rebuild aborted; clearing in-flight flag");
        }
    }
}

#[derive(Debug, Default)]
struct WorkState {
    last_id: u64,
    dashboard_watches: SubscriptionTable,
    source_watches: Vec<WatchSubscription>,
}

/// Collaborators the orchestrator needs.
#[derive(Debug, Clone)]
pub struct Services {
    pub fs: Arc<dyn FileSystem>,
    pub compiler: Arc<dyn ThemeCompiler>,
    pub watcher: Arc<dyn WatchBackend>,
}

pub struct Orchestrator {
    layout: Layout,
    services: Services,
    requests: mpsc::UnboundedSender<ReloadRequest>,
    dashboard_pattern: GlobMatcher,
    current: ArcSwap<Generation>,
    control: Mutex<BuildControl>,
    work: Mutex<WorkState>,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("layout", &self.layout)
            .field("generation", &self.current().id())
            .finish_non_exhaustive()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("orchestrator mutex poisoned; continuing");
        poisoned.into_inner()
    })
}

impl Orchestrator {
    /// Create an orchestrator serving an empty generation. Call
    /// [`build`](Self::build) to load the configuration.
    ///
    /// Watch callbacks send their requests to `requests`; hand the receiving
    /// end to a [`ReloadRuntime`](crate::engine::ReloadRuntime).
    pub fn new(
        layout: Layout,
        services: Services,
        requests: mpsc::UnboundedSender<ReloadRequest>,
    ) -> Result<Self> {
        let dashboard_pattern = Glob::new(layout.dashboard_pattern())?.compile_matcher();
        let empty = Generation::empty(layout.main_dashboard(), layout.dashboards_dir());

        Ok(Self {
            layout,
            services,
            requests,
            dashboard_pattern,
            current: ArcSwap::from_pointee(empty),
            control: Mutex::new(BuildControl::default()),
            work: Mutex::new(WorkState::default()),
        })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The generation currently being served.
    pub fn current(&self) -> Arc<Generation> {
        self.current.load_full()
    }

    fn publish(&self, generation: Arc<Generation>) {
        self.current.store(generation);
    }

    /// Exact-name lookup with fallback to the main dashboard. Never absent.
    pub fn get_dashboard_by_name(&self, name: &str) -> Arc<Dashboard> {
        self.current().get_dashboard_by_name(name)
    }

    /// Rebuild the whole configuration graph.
    ///
    /// If a rebuild is already running this returns
    /// [`BuildOutcome::Coalesced`] immediately and the running builder does
    /// one more full cycle after its current one, so the request is never
    /// lost and never interleaves.
    pub fn build(&self) -> BuildOutcome {
        {
            let mut control = lock(&self.control);
            if control.building {
                control.pending = true;
                debug!("rebuild already in flight; coalescing");
                return BuildOutcome::Coalesced;
            }
            control.building = true;
        }
        let mut in_flight = InFlight {
            control: &self.control,
            armed: true,
        };

        loop {
            let generation = self.run_build();

            let mut control = lock(&self.control);
            if control.pending {
                control.pending = false;
                debug!("running coalesced follow-up rebuild");
                continue;
            }
            control.building = false;
            in_flight.armed = false;
            return BuildOutcome::Built(generation);
        }
    }

    /// Re-read one dashboard's cards without a full rebuild.
    ///
    /// Upstream errors of the current generation are stamped onto the
    /// reloaded dashboard again, so it stays consistent with its siblings.
    pub fn reload_dashboard(&self, name: &str) -> DashboardReload {
        let _work = lock(&self.work);
        let current = self.current();

        if !current.contains_dashboard(name) {
            debug!(dashboard = %name, "reload for unknown dashboard ignored");
            return DashboardReload::Unknown;
        }
        let existing = current.get_dashboard_by_name(name);

        if !self.services.fs.is_file(existing.source()) {
            info!(dashboard = %name, "dashboard source vanished; requesting full rebuild");
            self.request(ReloadRequest::Full);
            return DashboardReload::Escalated;
        }

        let ctx = LoadContext {
            query_providers: current.query_providers(),
            shared_cards: current.shared_cards(),
            generation: current.id(),
        };
        let reloaded = load_dashboard(self.services.fs.as_ref(), existing.source(), name, ctx);

        if reloaded.source_hash().is_some() && reloaded.source_hash() == existing.source_hash() {
            debug!(dashboard = %name, "dashboard source unchanged; skipping");
            return DashboardReload::Unchanged;
        }

        let reloaded = match current.upstream_error() {
            Some(err) => reloaded.with_error(err.clone()),
            None => reloaded,
        };
        self.publish(Arc::new(current.with_dashboard(reloaded)));
        info!(dashboard = %name, "dashboard cards reloaded");
        DashboardReload::Reloaded
    }

    /// Switch the active theme and recompile it. No rebuild happens.
    pub fn change_theme(&self, theme: &str) -> std::result::Result<(), LoadError> {
        let _work = lock(&self.work);
        let current = self.current();

        let settings = current.settings().with_theme(theme);
        let result = install_theme(
            self.services.fs.as_ref(),
            self.services.compiler.as_ref(),
            &self.layout,
            theme,
        );
        self.publish(Arc::new(current.with_settings(settings, result.clone().err())));
        result
    }

    /// Names of dashboards that currently have a card-level watch.
    pub fn watched_dashboards(&self) -> Vec<String> {
        let work = lock(&self.work);
        let mut names: Vec<String> = self
            .current()
            .dashboard_names()
            .filter(|n| work.dashboard_watches.contains(n))
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    fn request(&self, request: ReloadRequest) {
        if self.requests.send(request).is_err() {
            warn!("reload runtime is gone; dropping reload request");
        }
    }

    /// Cancel every subscription this orchestrator holds.
    pub fn stop_watching(&self) {
        let mut work = lock(&self.work);
        work.dashboard_watches.clear();
        for mut sub in work.source_watches.drain(..) {
            sub.cancel();
        }
        info!("all watch subscriptions cancelled");
    }
}

impl ReloadTarget for Orchestrator {
    fn full_rebuild(&self) {
        self.build();
    }

    fn reload_dashboard(&self, name: &str) {
        Orchestrator::reload_dashboard(self, name);
    }
}
