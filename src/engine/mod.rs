// src/engine/mod.rs

//! Reload engine.
//!
//! Watch callbacks never rebuild anything themselves; they push a
//! [`ReloadRequest`] into a channel. A single consumer ([`ReloadRuntime`])
//! drains whatever burst of requests is pending, coalesces it with the pure
//! [`ReloadQueue`], and runs the resulting jobs one at a time.

pub mod queue;
pub mod runtime;

/// Requests flowing into the runtime from watch callbacks and signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadRequest {
    /// Rebuild the whole configuration graph.
    Full,
    /// Re-read one dashboard's cards.
    Dashboard(String),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    Shutdown,
}

/// A unit of work after coalescing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadJob {
    Full,
    Dashboard(String),
}

/// What the runtime drives. Implemented by the orchestrator; tests can
/// provide a recording fake.
pub trait ReloadTarget: Send + Sync + 'static {
    fn full_rebuild(&self);
    fn reload_dashboard(&self, name: &str);
}

pub use queue::ReloadQueue;
pub use runtime::ReloadRuntime;
