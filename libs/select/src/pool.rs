//! Worker pool snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::SelectError;

/// Load of a single worker at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSnapshot {
    /// Worker hostname, used as the worker identifier.
    pub host: String,

    /// Maximum number of concurrent tasks.
    pub capacity: u32,

    /// Tasks currently assigned.
    #[serde(default)]
    pub current_load: u32,
}

impl WorkerSnapshot {
    pub fn new(host: impl Into<String>, capacity: u32, current_load: u32) -> Self {
        Self {
            host: host.into(),
            capacity,
            current_load,
        }
    }

    /// Remaining task slots. Overloaded workers report zero.
    pub fn free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.current_load)
    }

    /// Returns true if the worker can accept another task.
    pub fn has_capacity(&self) -> bool {
        self.current_load < self.capacity
    }
}

/// Snapshot of all workers known to the controller, keyed by host.
///
/// Iteration is in ascending host order, which gives selection its
/// deterministic tie-break.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<WorkerSnapshot>", into = "Vec<WorkerSnapshot>")]
pub struct WorkerPool {
    workers: BTreeMap<String, WorkerSnapshot>,
}

impl WorkerPool {
    /// Build a pool from worker snapshots. A repeated host replaces the
    /// earlier entry.
    pub fn new(workers: impl IntoIterator<Item = WorkerSnapshot>) -> Self {
        Self {
            workers: workers
                .into_iter()
                .map(|w| (w.host.clone(), w))
                .collect(),
        }
    }

    /// Parse a pool from a JSON array of worker snapshots.
    pub fn from_json(json: &str) -> Result<Self, SelectError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, host: &str) -> Option<&WorkerSnapshot> {
        self.workers.get(host)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// All workers in ascending host order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkerSnapshot> {
        self.workers.values()
    }

    /// Workers that can accept another task, in ascending host order.
    pub fn eligible(&self) -> impl Iterator<Item = &WorkerSnapshot> {
        self.iter().filter(|w| w.has_capacity())
    }
}

impl From<Vec<WorkerSnapshot>> for WorkerPool {
    fn from(workers: Vec<WorkerSnapshot>) -> Self {
        Self::new(workers)
    }
}

impl From<WorkerPool> for Vec<WorkerSnapshot> {
    fn from(pool: WorkerPool) -> Self {
        pool.workers.into_values().collect()
    }
}
