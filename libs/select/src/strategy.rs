//! Worker selection strategies.
//!
//! `fillCapacityWithAffinity` walks the affinity list for the task's key and
//! takes the first preferred host that has room. Without an affinity entry,
//! or when every preferred host is full, it falls back to the worker with the
//! most free capacity, tie-breaking by host name for determinism.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AffinityConfig, SelectError, WorkerPool, WorkerSnapshot};

/// Outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// The task should be assigned to this worker.
    Worker(&'a WorkerSnapshot),

    /// No worker has free capacity. The caller should defer the task.
    NoEligibleWorker,
}

impl<'a> Selection<'a> {
    pub fn worker(&self) -> Option<&'a WorkerSnapshot> {
        match self {
            Selection::Worker(w) => Some(w),
            Selection::NoEligibleWorker => None,
        }
    }

    pub fn host(&self) -> Option<&'a str> {
        self.worker().map(|w| w.host.as_str())
    }

    pub fn is_none_eligible(&self) -> bool {
        matches!(self, Selection::NoEligibleWorker)
    }
}

/// Selection strategy, tagged by `type` in configuration documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WorkerSelectStrategy {
    /// Prefer affinity hosts for the task's key, then fill by free capacity.
    FillCapacityWithAffinity {
        #[serde(rename = "affinityConfig", default)]
        affinity_config: AffinityConfig,
    },

    /// Always pick the worker with the most free capacity.
    #[default]
    EqualDistribution,
}

impl WorkerSelectStrategy {
    pub fn fill_capacity_with_affinity(affinity_config: AffinityConfig) -> Self {
        Self::FillCapacityWithAffinity { affinity_config }
    }

    /// Parse a strategy from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, SelectError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pick a worker for a task with the given affinity key.
    pub fn select<'a>(&self, pool: &'a WorkerPool, affinity_key: Option<&str>) -> Selection<'a> {
        match self {
            Self::FillCapacityWithAffinity { affinity_config } => {
                select_with_affinity(pool, affinity_config, affinity_key)
            }
            Self::EqualDistribution => select_most_free(pool),
        }
    }
}

/// Select the first preferred host with capacity, falling back to
/// [`select_most_free`].
pub fn select_with_affinity<'a>(
    pool: &'a WorkerPool,
    affinity: &AffinityConfig,
    affinity_key: Option<&str>,
) -> Selection<'a> {
    if let Some(hosts) = affinity_key.and_then(|key| affinity.preferred_hosts(key)) {
        let preferred = hosts
            .iter()
            .filter_map(|host| pool.get(host))
            .find(|w| w.has_capacity());

        if let Some(worker) = preferred {
            debug!(
                affinity_key = affinity_key.unwrap_or_default(),
                host = %worker.host,
                "Selected affinity worker"
            );
            return Selection::Worker(worker);
        }

        debug!(
            affinity_key = affinity_key.unwrap_or_default(),
            preferred = hosts.len(),
            "No preferred worker has capacity, falling back"
        );
    }

    select_most_free(pool)
}

/// Select the worker with the most free capacity. Ties go to the
/// lexicographically smallest host.
pub fn select_most_free(pool: &WorkerPool) -> Selection<'_> {
    let best = pool.eligible().max_by(|a, b| {
        a.free_capacity()
            .cmp(&b.free_capacity())
            .then_with(|| b.host.cmp(&a.host))
    });

    match best {
        Some(worker) => {
            debug!(host = %worker.host, free = worker.free_capacity(), "Selected worker");
            Selection::Worker(worker)
        }
        None => {
            debug!(workers = pool.len(), "No eligible worker");
            Selection::NoEligibleWorker
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    /// Pool {A: free=0, B: free=5, C: free=3}.
    fn sample_pool() -> WorkerPool {
        WorkerPool::new(vec![
            WorkerSnapshot::new("A", 4, 4),
            WorkerSnapshot::new("B", 5, 0),
            WorkerSnapshot::new("C", 5, 2),
        ])
    }

    fn sample_strategy() -> WorkerSelectStrategy {
        WorkerSelectStrategy::fill_capacity_with_affinity(
            AffinityConfig::default()
                .with_affinity("keyX", ["A", "B"])
                .with_affinity("keyY", ["C", "B"])
                .with_affinity("keyZ", ["missing", "A"]),
        )
    }

    #[rstest]
    #[case::skips_full_preferred(Some("keyX"), "B")]
    #[case::first_listed_wins(Some("keyY"), "C")]
    #[case::unknown_key_falls_back(Some("other"), "B")]
    #[case::no_key_falls_back(None, "B")]
    #[case::absent_hosts_fall_back(Some("keyZ"), "B")]
    fn test_affinity_selection(#[case] key: Option<&str>, #[case] expected: &str) {
        let pool = sample_pool();
        let selection = sample_strategy().select(&pool, key);
        assert_eq!(selection.host(), Some(expected));
    }

    #[rstest]
    #[case(Some("keyX"))]
    #[case(Some("other"))]
    #[case(None)]
    fn test_no_capacity_yields_no_eligible_worker(#[case] key: Option<&str>) {
        let pool = WorkerPool::new(vec![
            WorkerSnapshot::new("A", 2, 2),
            WorkerSnapshot::new("B", 1, 3),
        ]);

        let selection = sample_strategy().select(&pool, key);
        assert!(selection.is_none_eligible());
        assert_eq!(selection.worker(), None);
    }

    #[test]
    fn test_empty_pool() {
        let pool = WorkerPool::default();
        assert_eq!(select_most_free(&pool), Selection::NoEligibleWorker);
    }

    #[test]
    fn test_tie_break_by_host() {
        let pool = WorkerPool::new(vec![
            WorkerSnapshot::new("zeta", 3, 0),
            WorkerSnapshot::new("alpha", 4, 1),
            WorkerSnapshot::new("mid", 5, 2),
        ]);

        assert_eq!(select_most_free(&pool).host(), Some("alpha"));
    }

    #[test]
    fn test_equal_distribution_ignores_affinity_key() {
        let pool = sample_pool();
        let selection = WorkerSelectStrategy::EqualDistribution.select(&pool, Some("keyY"));
        assert_eq!(selection.host(), Some("B"));
    }

    #[test]
    fn test_strategy_json() {
        let strategy = WorkerSelectStrategy::from_json(
            r#"{"type": "fillCapacityWithAffinity", "affinityConfig": {"affinity": {"foo": ["localhost"]}}}"#,
        )
        .unwrap();

        assert_eq!(
            strategy,
            WorkerSelectStrategy::fill_capacity_with_affinity(
                AffinityConfig::default().with_affinity("foo", ["localhost"])
            )
        );

        let encoded = serde_json::to_value(&strategy).unwrap();
        assert_eq!(encoded["type"], "fillCapacityWithAffinity");
        assert_eq!(encoded["affinityConfig"]["affinity"]["foo"][0], "localhost");

        let equal = WorkerSelectStrategy::from_json(r#"{"type": "equalDistribution"}"#).unwrap();
        assert_eq!(equal, WorkerSelectStrategy::EqualDistribution);
    }

    #[test]
    fn test_unknown_strategy_type() {
        let err = WorkerSelectStrategy::from_json(r#"{"type": "roundRobin"}"#).unwrap_err();
        assert!(matches!(err, SelectError::InvalidConfiguration(_)));
    }

    fn arb_pool() -> impl Strategy<Value = WorkerPool> {
        proptest::collection::vec(("[a-e]", 0u32..6, 0u32..8), 0..10).prop_map(|workers| {
            WorkerPool::new(
                workers
                    .into_iter()
                    .map(|(host, capacity, load)| WorkerSnapshot::new(host, capacity, load)),
            )
        })
    }

    proptest! {
        #[test]
        fn prop_fallback_picks_maximum_free(pool in arb_pool()) {
            match select_most_free(&pool) {
                Selection::Worker(chosen) => {
                    prop_assert!(chosen.has_capacity());
                    for other in pool.eligible() {
                        prop_assert!(other.free_capacity() <= chosen.free_capacity());
                        if other.free_capacity() == chosen.free_capacity() {
                            prop_assert!(chosen.host <= other.host);
                        }
                    }
                }
                Selection::NoEligibleWorker => {
                    prop_assert_eq!(pool.eligible().count(), 0);
                }
            }
        }

        #[test]
        fn prop_affinity_selection_is_eligible_and_stable(
            pool in arb_pool(),
            preferred in proptest::collection::vec("[a-e]", 0..4),
        ) {
            let affinity = AffinityConfig::default().with_affinity("k", preferred);
            let first = select_with_affinity(&pool, &affinity, Some("k"));
            let second = select_with_affinity(&pool, &affinity, Some("k"));
            prop_assert_eq!(first, second);
            if let Some(worker) = first.worker() {
                prop_assert!(worker.has_capacity());
            } else {
                prop_assert_eq!(pool.eligible().count(), 0);
            }
        }
    }
}
