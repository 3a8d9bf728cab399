// src/watch/subscription.rs

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::Result;
use crate::watch::filter::EventFilter;

/// Callback invoked when a qualifying event arrives. It runs on the
/// watcher's own thread and must not block.
pub type WatchCallback = Arc<dyn Fn() + Send + Sync>;

/// Something that can start watching a path.
///
/// Production code uses [`NotifyBackend`](crate::watch::NotifyBackend);
/// tests can register subscriptions and fire them by hand.
pub trait WatchBackend: Send + Sync + fmt::Debug {
    /// Begin monitoring `path`. Every qualifying event invokes `callback`;
    /// events are neither coalesced nor debounced.
    fn subscribe(
        &self,
        path: &Path,
        filter: EventFilter,
        callback: WatchCallback,
    ) -> Result<WatchSubscription>;
}

/// An active registration. Cancelled explicitly with [`cancel`](Self::cancel)
/// or implicitly on drop; after that its callback is never invoked again.
pub struct WatchSubscription {
    path: PathBuf,
    filter: EventFilter,
    active: Arc<AtomicBool>,
    on_cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchSubscription {
    /// `active` is the flag the backend checks before invoking the callback.
    /// `on_cancel` releases backend resources and runs at most once.
    pub fn new(
        path: impl Into<PathBuf>,
        filter: EventFilter,
        active: Arc<AtomicBool>,
        on_cancel: Option<Box<dyn FnOnce() + Send>>,
    ) -> Self {
        Self {
            path: path.into(),
            filter,
            active,
            on_cancel,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filter(&self) -> EventFilter {
        self.filter
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn cancel(&mut self) {
        self.active.store(false, Ordering::Release);
        if let Some(release) = self.on_cancel.take() {
            release();
        }
    }
}

impl Drop for WatchSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for WatchSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchSubscription")
            .field("path", &self.path)
            .field("filter", &self.filter)
            .field("active", &self.is_active())
            .finish()
    }
}
