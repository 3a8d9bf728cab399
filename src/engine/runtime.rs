// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::errors::Result;

use super::{ReloadJob, ReloadQueue, ReloadRequest, ReloadTarget};

/// Single consumer of [`ReloadRequest`]s.
///
/// Each loop iteration waits for one request, then drains everything else
/// already queued, so a burst of filesystem events turns into one batch of
/// coalesced jobs. Jobs run on the blocking pool, one after another.
pub struct ReloadRuntime<T: ReloadTarget> {
    target: Arc<T>,
    request_rx: mpsc::UnboundedReceiver<ReloadRequest>,
    queue: ReloadQueue,
}

impl<T: ReloadTarget> fmt::Debug for ReloadRuntime<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadRuntime")
            .field("queue", &self.queue)
            .finish_non_exhaustive()
    }
}

impl<T: ReloadTarget> ReloadRuntime<T> {
    pub fn new(target: Arc<T>, request_rx: mpsc::UnboundedReceiver<ReloadRequest>) -> Self {
        Self {
            target,
            request_rx,
            queue: ReloadQueue::new(),
        }
    }

    /// Main event loop. Returns when the channel closes or on `Shutdown`.
    pub async fn run(mut self) -> Result<()> {
        info!("reload runtime started");

        loop {
            let request = match self.request_rx.recv().await {
                Some(r) => r,
                None => {
                    info!("reload request channel closed; exiting");
                    break;
                }
            };
            self.queue.record(request);
            while let Ok(more) = self.request_rx.try_recv() {
                self.queue.record(more);
            }

            if self.queue.shutdown_requested() {
                info!("shutdown requested; stopping reload runtime");
                break;
            }

            for job in self.queue.drain() {
                self.execute(job).await;
            }
        }

        info!("reload runtime exiting");
        Ok(())
    }

    /// A panicking job is logged; the runtime keeps serving requests.
    async fn execute(&self, job: ReloadJob) {
        debug!(?job, "running reload job");
        let target = Arc::clone(&self.target);
        let label = format!("{job:?}");
        let result = tokio::task::spawn_blocking(move || match job {
            ReloadJob::Full => target.full_rebuild(),
            ReloadJob::Dashboard(name) => target.reload_dashboard(&name),
        })
        .await;
        if let Err(err) = result {
            error!(job = %label, error = %err, "reload job failed");
        }
    }
}
