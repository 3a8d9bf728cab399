use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use dashgraph::errors::Result;
use dashgraph::watch::{EventFilter, WatchBackend, WatchCallback, WatchSubscription};

struct FakeRoute {
    path: PathBuf,
    filter: EventFilter,
    active: Arc<AtomicBool>,
    callback: WatchCallback,
}

/// A watch backend that:
/// - records every subscription (including cancelled ones)
/// - invokes callbacks only when a test calls [`FakeWatchBackend::fire`].
#[derive(Clone, Default)]
pub struct FakeWatchBackend {
    routes: Arc<Mutex<Vec<FakeRoute>>>,
}

impl fmt::Debug for FakeWatchBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeWatchBackend")
            .field("active", &self.active_paths())
            .finish()
    }
}

impl FakeWatchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a qualifying event on `path`. Returns how many callbacks ran.
    pub fn fire(&self, path: impl AsRef<Path>) -> usize {
        let path = path.as_ref();
        let matched: Vec<(Arc<AtomicBool>, WatchCallback)> = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path && r.active.load(Ordering::Acquire))
            .map(|r| (Arc::clone(&r.active), Arc::clone(&r.callback)))
            .collect();

        let mut fired = 0;
        for (active, cb) in matched {
            if active.load(Ordering::Acquire) {
                cb();
                fired += 1;
            }
        }
        fired
    }

    /// Paths with at least one live subscription, sorted.
    pub fn active_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.active.load(Ordering::Acquire))
            .map(|r| r.path.clone())
            .collect();
        paths.sort();
        paths.dedup();
        paths
    }

    /// Number of live subscriptions on `path`.
    pub fn active_count(&self, path: impl AsRef<Path>) -> usize {
        self.routes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path.as_ref() && r.active.load(Ordering::Acquire))
            .count()
    }

    /// Filter of the live subscription on `path`, if any.
    pub fn filter_of(&self, path: impl AsRef<Path>) -> Option<EventFilter> {
        self.routes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.path == path.as_ref() && r.active.load(Ordering::Acquire))
            .map(|r| r.filter)
    }

    /// Total subscriptions ever made.
    pub fn total_subscriptions(&self) -> usize {
        self.routes.lock().unwrap().len()
    }
}

impl WatchBackend for FakeWatchBackend {
    fn subscribe(
        &self,
        path: &Path,
        filter: EventFilter,
        callback: WatchCallback,
    ) -> Result<WatchSubscription> {
        let active = Arc::new(AtomicBool::new(true));
        self.routes.lock().unwrap().push(FakeRoute {
            path: path.to_path_buf(),
            filter,
            active: Arc::clone(&active),
            callback,
        });
        Ok(WatchSubscription::new(path, filter, active, None))
    }
}
