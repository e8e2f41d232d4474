//! Normalized entity store, status index, and read-only selectors.
//!
//! The store owns every task and subtask of the currently opened project and
//! keeps the per-status index exactly inverse to the records at all times.

/// Status-to-task-ids index.
pub mod index;
/// Partial-update payloads.
pub mod patch;
/// Read-only selectors.
pub mod query;
/// Normalized record shapes.
pub mod record;
/// Persisted snapshot shape.
pub mod snapshot;
/// The entity store itself.
pub mod store;

pub use index::StatusIndex;
pub use patch::{SubtaskPatch, TaskPatch};
pub use query::{TaskDetail, TextMatcher};
pub use record::{SubtaskRecord, TaskRecord};
pub use snapshot::{SnapshotError, StoreSnapshot};
pub use store::TaskStore;
