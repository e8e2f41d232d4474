//! Persisted snapshot of the store, sufficient to rehydrate without a fetch.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use taskmirror_core::{SubtaskId, TaskId};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::record::{SubtaskRecord, TaskRecord};
use crate::store::TaskStore;

/// Errors raised while restoring a persisted snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// A subtask record names an owning task the snapshot does not contain.
    #[error("subtask {subtask} references missing task {task}")]
    OrphanSubtask {
        /// The orphaned subtask id.
        subtask: SubtaskId,
        /// The missing owner id.
        task: TaskId,
    },
}

/// Durable shape of the store: record maps, project identifier, sync marker.
///
/// Derived state (the status index, UI selection, pending set) is never
/// persisted; restoring rebuilds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// All task records keyed by id.
    pub tasks: HashMap<TaskId, TaskRecord>,
    /// All subtask records keyed by id.
    pub subtasks: HashMap<SubtaskId, SubtaskRecord>,
    /// Identifier of the mirrored project, if one was recorded.
    pub project: Option<String>,
    /// When the snapshot's contents were last synced from the task file.
    #[serde(with = "time::serde::rfc3339")]
    pub last_synced: OffsetDateTime,
}

impl TaskStore {
    /// Capture the durable parts of the store.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            tasks: self.task_map().clone(),
            subtasks: self.subtask_map().clone(),
            project: self.project().map(str::to_owned),
            last_synced: self.last_synced(),
        }
    }

    /// Rehydrate from a persisted snapshot, rebuilding the status index.
    ///
    /// UI state (selection, loading, error) and the pending set start fresh.
    ///
    /// # Errors
    /// Returns [`SnapshotError::OrphanSubtask`] when a subtask's owner is
    /// missing from the snapshot; the store is left unchanged in that case.
    pub fn restore(&mut self, snapshot: StoreSnapshot) -> Result<(), SnapshotError> {
        for record in snapshot.subtasks.values() {
            if !snapshot.tasks.contains_key(&record.parent) {
                return Err(SnapshotError::OrphanSubtask {
                    subtask: record.id.clone(),
                    task: record.parent.clone(),
                });
            }
        }

        let count = snapshot.tasks.len();
        self.replace_contents(
            snapshot.tasks,
            snapshot.subtasks,
            snapshot.project,
            snapshot.last_synced,
        );
        debug!(count, "restored store from snapshot");
        Ok(())
    }
}
