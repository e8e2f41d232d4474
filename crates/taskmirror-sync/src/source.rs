//! External task-file collaborator seam.

use std::path::Path;

use anyhow::Error;
use taskmirror_core::Task;
use tokio::sync::mpsc;

/// Change notification delivered by an active watch.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
    /// The task file changed and was re-read successfully.
    Updated(Vec<Task>),
    /// The task file changed but could not be read or parsed.
    Failed(String),
}

/// Access to a project's externally maintained task file.
///
/// Implementations wrap the file-system/process layer that actually reads,
/// watches, and writes the file; the controller only sees typed snapshots.
#[allow(async_fn_in_trait)]
pub trait SnapshotSource: Send + Sync {
    /// Error type bubbled up from the collaborator.
    type Error: Into<Error> + Send;

    /// Read the current task list for the project.
    ///
    /// # Errors
    /// Returns a collaborator-specific error when the file is unreachable or
    /// malformed.
    async fn fetch_tasks(&self, project: &Path) -> Result<Vec<Task>, Self::Error>;

    /// Begin watching the project and return the change-event channel.
    ///
    /// The channel closes when the watch ends on the collaborator side.
    ///
    /// # Errors
    /// Returns a collaborator-specific error when the watch cannot be
    /// established.
    async fn watch(&self, project: &Path) -> Result<mpsc::Receiver<SnapshotEvent>, Self::Error>;

    /// Stop watching the project. Must be safe to call when no watch is
    /// active.
    ///
    /// # Errors
    /// Returns a collaborator-specific error when teardown fails.
    async fn unwatch(&self, project: &Path) -> Result<(), Self::Error>;

    /// Write one task (subtasks embedded) back to the project's task file.
    ///
    /// # Errors
    /// Returns a collaborator-specific error when the write fails.
    async fn push_task(&self, project: &Path, task: Task) -> Result<(), Self::Error>;
}
