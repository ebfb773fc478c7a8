//! # hoist-select
//!
//! Worker selection for pending tasks.
//!
//! ## Model
//!
//! - A [`WorkerPool`] is a point-in-time snapshot of workers and their load
//! - An [`AffinityConfig`] maps an affinity key (datasource, tenant, ...) to an
//!   ordered list of preferred worker hosts
//! - A [`WorkerSelectStrategy`] picks one worker for a task, or reports
//!   [`Selection::NoEligibleWorker`]
//!
//! ## Invariants
//!
//! - Selection is pure: the same pool and affinity snapshot always yield the
//!   same worker
//! - A selected worker always has free capacity (`current_load < capacity`)
//! - Running out of capacity is a normal outcome, not an error

mod affinity;
mod error;
mod pool;
mod strategy;

pub use affinity::AffinityConfig;
pub use error::SelectError;
pub use pool::{WorkerPool, WorkerSnapshot};
pub use strategy::{select_most_free, select_with_affinity, Selection, WorkerSelectStrategy};
