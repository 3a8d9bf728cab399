// src/watch/mod.rs

//! Filesystem watch subscriptions.
//!
//! This module is responsible for:
//! - Classifying `notify` events into the three event classes a subscriber
//!   can ask for ([`EventFilter`]).
//! - Cancellable [`WatchSubscription`]s: once cancelled (or dropped) a
//!   subscription never invokes its callback again.
//! - A production [`WatchBackend`] on top of a single `notify` watcher.
//! - The per-dashboard [`SubscriptionTable`] that is diffed on every rebuild.
//!
//! It does **not** know what a callback does; callers decide that.

pub mod filter;
pub mod notify_backend;
pub mod subscription;
pub mod table;

pub use filter::EventFilter;
pub use notify_backend::NotifyBackend;
pub use subscription::{WatchBackend, WatchCallback, WatchSubscription};
pub use table::{SubscriptionTable, TableDiff};
