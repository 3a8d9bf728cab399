// src/watch/notify_backend.rs

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::errors::{DashgraphError, Result};
use crate::watch::filter::EventFilter;
use crate::watch::subscription::{WatchBackend, WatchCallback, WatchSubscription};

/// One registered subscription as seen by the event handler.
struct Route {
    id: u64,
    /// Canonical file path, or canonical directory for directory filters.
    target: PathBuf,
    filter: EventFilter,
    active: Arc<AtomicBool>,
    callback: WatchCallback,
}

impl Route {
    fn wants(&self, event: &Event) -> bool {
        if !self.active.load(Ordering::Acquire) || !self.filter.matches(&event.kind) {
            return false;
        }
        if self.filter.watches_directory() {
            event.paths.iter().any(|p| p.starts_with(&self.target))
        } else {
            event.paths.iter().any(|p| p == &self.target)
        }
    }
}

#[derive(Debug)]
struct WatchedDir {
    recursive: bool,
    refs: usize,
}

/// The `notify` watcher plus the directories it currently watches.
///
/// Kept behind its own lock, separate from the routes, because `unwatch`
/// waits on the watcher thread, which may itself be waiting for the routes.
struct Dirs {
    watcher: RecommendedWatcher,
    watched: HashMap<PathBuf, WatchedDir>,
}

struct Shared {
    routes: Arc<Mutex<Vec<Route>>>,
    dirs: Mutex<Dirs>,
    next_id: AtomicU64,
}

/// [`WatchBackend`] built on a single `notify::RecommendedWatcher`.
///
/// File subscriptions watch the file's parent directory non-recursively and
/// filter by path, so editors that save by replacing the file keep working.
/// Directory subscriptions watch the directory recursively. Each watched
/// directory is reference counted and unwatched when its last subscription
/// is cancelled.
#[derive(Clone)]
pub struct NotifyBackend {
    shared: Arc<Shared>,
}

impl fmt::Debug for NotifyBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBackend").finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("watch backend mutex poisoned; continuing");
        poisoned.into_inner()
    })
}

impl NotifyBackend {
    pub fn new() -> Result<Self> {
        let routes: Arc<Mutex<Vec<Route>>> = Arc::new(Mutex::new(Vec::new()));

        // Called synchronously on notify's thread for every event.
        let watcher = RecommendedWatcher::new(
            {
                let routes = Arc::clone(&routes);
                move |res: notify::Result<Event>| match res {
                    Ok(event) => dispatch(&routes, &event),
                    Err(err) => warn!(error = %err, "file watch error"),
                }
            },
            Config::default(),
        )?;

        Ok(Self {
            shared: Arc::new(Shared {
                routes,
                dirs: Mutex::new(Dirs {
                    watcher,
                    watched: HashMap::new(),
                }),
                next_id: AtomicU64::new(1),
            }),
        })
    }

    fn watch_dir(&self, dir: &Path, recursive: bool) -> Result<()> {
        let mut dirs = lock(&self.shared.dirs);
        let Dirs { watcher, watched } = &mut *dirs;

        match watched.get_mut(dir) {
            Some(entry) if entry.recursive || !recursive => {
                entry.refs += 1;
            }
            Some(entry) => {
                // Upgrade an existing non-recursive watch.
                watcher.unwatch(dir)?;
                watcher.watch(dir, RecursiveMode::Recursive)?;
                entry.recursive = true;
                entry.refs += 1;
            }
            None => {
                let mode = if recursive {
                    RecursiveMode::Recursive
                } else {
                    RecursiveMode::NonRecursive
                };
                watcher.watch(dir, mode)?;
                watched.insert(dir.to_path_buf(), WatchedDir { recursive, refs: 1 });
                debug!(dir = ?dir, recursive, "watching directory");
            }
        }
        Ok(())
    }

    fn release(shared: &Shared, id: u64, dir: &Path) {
        lock(&shared.routes).retain(|r| r.id != id);

        let mut dirs = lock(&shared.dirs);
        let Dirs { watcher, watched } = &mut *dirs;
        let Some(entry) = watched.get_mut(dir) else {
            return;
        };
        entry.refs = entry.refs.saturating_sub(1);
        if entry.refs == 0 {
            watched.remove(dir);
            if let Err(err) = watcher.unwatch(dir) {
                debug!(dir = ?dir, error = %err, "unwatch failed");
            } else {
                debug!(dir = ?dir, "stopped watching directory");
            }
        }
    }
}

fn dispatch(routes: &Mutex<Vec<Route>>, event: &Event) {
    // Collect first so callbacks run without holding the lock.
    let matched: Vec<(Arc<AtomicBool>, WatchCallback)> = lock(routes)
        .iter()
        .filter(|r| r.wants(event))
        .map(|r| (Arc::clone(&r.active), Arc::clone(&r.callback)))
        .collect();

    // A subscription may be cancelled while earlier callbacks run.
    for (active, callback) in matched {
        if active.load(Ordering::Acquire) {
            callback();
        }
    }
}

/// Resolve the directory to watch and the path events are compared against.
fn resolve_target(path: &Path, filter: EventFilter) -> Result<(PathBuf, PathBuf)> {
    if filter.watches_directory() {
        let dir = path.canonicalize()?;
        return Ok((dir.clone(), dir));
    }

    let file_name = path.file_name().ok_or_else(|| {
        DashgraphError::Config(format!("cannot watch {:?}: not a file path", path))
    })?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = parent.canonicalize()?;
    let target = dir.join(file_name);
    Ok((dir, target))
}

impl WatchBackend for NotifyBackend {
    fn subscribe(
        &self,
        path: &Path,
        filter: EventFilter,
        callback: WatchCallback,
    ) -> Result<WatchSubscription> {
        let (dir, target) = resolve_target(path, filter)?;
        self.watch_dir(&dir, filter.watches_directory())?;

        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        lock(&self.shared.routes).push(Route {
            id,
            target,
            filter,
            active: Arc::clone(&active),
            callback,
        });

        info!(path = ?path, ?filter, "watch subscription started");

        let shared = Arc::clone(&self.shared);
        let on_cancel = Box::new(move || NotifyBackend::release(&shared, id, &dir));
        Ok(WatchSubscription::new(path, filter, active, Some(on_cancel)))
    }
}
