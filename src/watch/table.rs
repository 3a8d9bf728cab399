// src/watch/table.rs

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::Result;
use crate::watch::subscription::WatchSubscription;

/// What [`SubscriptionTable::sync`] changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub kept: Vec<String>,
}

/// Active per-item subscriptions keyed by name.
///
/// Each rebuild hands the desired `name -> path` set to [`sync`](Self::sync):
/// subscriptions for names that disappeared (or whose path changed) are
/// cancelled, new names are subscribed, unchanged ones are left alone so they
/// are neither duplicated nor briefly dropped.
#[derive(Debug, Default)]
pub struct SubscriptionTable {
    entries: HashMap<String, WatchSubscription>,
}

impl SubscriptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(|s| s.path())
    }

    /// Bring the table in line with `desired`.
    ///
    /// `subscribe` is called once per new name. A failed subscription is
    /// logged and left out; it is retried on the next sync.
    pub fn sync<F>(&mut self, desired: &BTreeMap<String, PathBuf>, mut subscribe: F) -> TableDiff
    where
        F: FnMut(&str, &Path) -> Result<WatchSubscription>,
    {
        let mut diff = TableDiff::default();

        let stale: Vec<String> = self
            .entries
            .iter()
            .filter(|(name, sub)| desired.get(*name).map(|p| p.as_path()) != Some(sub.path()))
            .map(|(name, _)| name.clone())
            .collect();
        for name in stale {
            if let Some(mut sub) = self.entries.remove(&name) {
                sub.cancel();
                debug!(name = %name, "cancelled subscription");
            }
            diff.removed.push(name);
        }

        for (name, path) in desired {
            if self.entries.contains_key(name) {
                diff.kept.push(name.clone());
                continue;
            }
            match subscribe(name, path) {
                Ok(sub) => {
                    self.entries.insert(name.clone(), sub);
                    diff.added.push(name.clone());
                }
                Err(err) => {
                    warn!(name = %name, path = ?path, error = %err, "could not subscribe");
                }
            }
        }

        diff.removed.sort();
        diff
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        for (_, mut sub) in self.entries.drain() {
            sub.cancel();
        }
    }
}
