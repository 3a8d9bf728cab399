// src/engine/queue.rs

use std::collections::BTreeSet;

use tracing::debug;

use super::{ReloadJob, ReloadRequest};

/// Requests that arrived while the runtime was busy.
///
/// Semantics:
/// - Any number of `Full` requests collapse into one full rebuild.
/// - A full rebuild reloads every dashboard, so pending dashboard requests
///   are dropped when a `Full` is pending.
/// - Dashboard requests are de-duplicated by name.
/// - `Shutdown` is sticky.
#[derive(Debug, Default)]
pub struct ReloadQueue {
    full: bool,
    dashboards: BTreeSet<String>,
    shutdown: bool,
}

impl ReloadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there is no pending work.
    pub fn is_empty(&self) -> bool {
        !self.full && self.dashboards.is_empty()
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown
    }

    pub fn record(&mut self, request: ReloadRequest) {
        match request {
            ReloadRequest::Full => {
                if self.full {
                    debug!("coalesced full rebuild request");
                }
                self.full = true;
            }
            ReloadRequest::Dashboard(name) => {
                let inserted = self.dashboards.insert(name);
                if !inserted {
                    debug!("coalesced duplicate dashboard reload request");
                }
            }
            ReloadRequest::Shutdown => self.shutdown = true,
        }
    }

    /// Take all pending work as a list of jobs.
    pub fn drain(&mut self) -> Vec<ReloadJob> {
        let dashboards = std::mem::take(&mut self.dashboards);
        if std::mem::take(&mut self.full) {
            if !dashboards.is_empty() {
                debug!(
                    dropped = dashboards.len(),
                    "full rebuild subsumes pending dashboard reloads"
                );
            }
            return vec![ReloadJob::Full];
        }
        dashboards.into_iter().map(ReloadJob::Dashboard).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_requests_collapse_and_subsume_dashboards() {
        let mut q = ReloadQueue::new();
        q.record(ReloadRequest::Dashboard("media".into()));
        q.record(ReloadRequest::Full);
        q.record(ReloadRequest::Full);

        assert_eq!(q.drain(), vec![ReloadJob::Full]);
        assert!(q.is_empty());
    }

    #[test]
    fn dashboard_requests_are_deduplicated() {
        let mut q = ReloadQueue::new();
        q.record(ReloadRequest::Dashboard("media".into()));
        q.record(ReloadRequest::Dashboard("main".into()));
        q.record(ReloadRequest::Dashboard("media".into()));

        assert_eq!(
            q.drain(),
            vec![
                ReloadJob::Dashboard("main".into()),
                ReloadJob::Dashboard("media".into())
            ]
        );
        assert!(q.drain().is_empty());
    }

    #[test]
    fn shutdown_is_sticky() {
        let mut q = ReloadQueue::new();
        q.record(ReloadRequest::Shutdown);
        q.drain();
        assert!(q.shutdown_requested());
    }
}
