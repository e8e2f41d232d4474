//! Reconciles the entity store with the external task file.

use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use taskmirror_core::{ProgressEstimate, SuggestedAction, TaskId, TaskStatus};
use taskmirror_correlate::ProgressSink;
use taskmirror_store::{TaskPatch, TaskStore};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::source::{SnapshotEvent, SnapshotSource};

/// Store handle shared between the UI thread and the watch task.
pub type SharedTaskStore = Arc<Mutex<TaskStore>>;

/// Lock the shared store, recovering from a poisoned lock.
pub fn lock_store(store: &SharedTaskStore) -> MutexGuard<'_, TaskStore> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

struct ActiveWatch {
    project: PathBuf,
    handle: JoinHandle<()>,
}

/// Pull-based and push-based synchronization between the store and the
/// external task file.
///
/// Both entry points are fire-and-forget from the UI's perspective:
/// collaborator failures land in the store's `error` field, never in a
/// return value, and a failed sync leaves previously loaded data untouched.
pub struct SyncController<S> {
    store: SharedTaskStore,
    source: S,
    watch: Mutex<Option<ActiveWatch>>,
}

impl<S: SnapshotSource> SyncController<S> {
    /// Wrap a shared store and its collaborator.
    pub const fn new(store: SharedTaskStore, source: S) -> Self {
        Self {
            store,
            source,
            watch: Mutex::new(None),
        }
    }

    /// Handle to the shared store.
    #[must_use]
    pub const fn store(&self) -> &SharedTaskStore {
        &self.store
    }

    /// One-shot refresh from the project's task file.
    ///
    /// Sets `loading` for the duration of the fetch. On success the snapshot
    /// replaces the store contents; on failure the error is recorded and the
    /// existing contents survive.
    pub async fn sync_with_file_system(&self, project: &Path) {
        {
            let mut store = lock_store(&self.store);
            store.set_loading(true);
            store.set_error(None);
        }

        let outcome = self.source.fetch_tasks(project).await;

        let mut store = lock_store(&self.store);
        match outcome {
            Ok(tasks) => {
                store.set_tasks(tasks);
                store.set_project(Some(project.display().to_string()));
            }
            Err(err) => {
                let err: anyhow::Error = err.into();
                warn!(project = %project.display(), error = %err, "task file sync failed");
                store.set_error(Some(format!("failed to load tasks: {err}")));
            }
        }
        store.set_loading(false);
    }

    /// Watch the project's task file and apply every delivered snapshot.
    ///
    /// Idempotent per project: re-invoking while a watch for the same path
    /// is live is a no-op. Starting a watch for a different path replaces
    /// the previous one.
    pub async fn start_realtime_sync(&self, project: &Path) {
        {
            let guard = self.watch.lock().unwrap_or_else(PoisonError::into_inner);
            if guard
                .as_ref()
                .is_some_and(|active| active.project == project && !active.handle.is_finished())
            {
                return;
            }
        }
        self.stop_realtime_sync().await;

        match self.source.watch(project).await {
            Ok(mut events) => {
                let store = Arc::clone(&self.store);
                let handle = tokio::spawn(async move {
                    while let Some(event) = events.recv().await {
                        let mut store = lock_store(&store);
                        match event {
                            SnapshotEvent::Updated(tasks) => store.set_tasks(tasks),
                            SnapshotEvent::Failed(message) => store.set_error(Some(message)),
                        }
                    }
                    debug!("watch channel closed");
                });
                let mut guard = self.watch.lock().unwrap_or_else(PoisonError::into_inner);
                *guard = Some(ActiveWatch {
                    project: project.to_path_buf(),
                    handle,
                });
                debug!(project = %project.display(), "realtime sync started");
            }
            Err(err) => {
                let err: anyhow::Error = err.into();
                warn!(project = %project.display(), error = %err, "failed to start watch");
                lock_store(&self.store).set_error(Some(format!("failed to watch project: {err}")));
            }
        }
    }

    /// Stop the active watch, if any. No further change events are applied
    /// once this returns; safe to call when nothing is being watched.
    pub async fn stop_realtime_sync(&self) {
        let active = {
            let mut guard = self.watch.lock().unwrap_or_else(PoisonError::into_inner);
            guard.take()
        };
        let Some(active) = active else {
            return;
        };
        active.handle.abort();
        if let Err(err) = self.source.unwatch(&active.project).await {
            let err: anyhow::Error = err.into();
            warn!(project = %active.project.display(), error = %err, "failed to stop watcher");
        }
        debug!(project = %active.project.display(), "realtime sync stopped");
    }

    /// Push every task owing an external sync back to the task file.
    ///
    /// The pending set is cleared only when every push succeeds; on any
    /// failure the set survives so a later flush can retry. Returns the
    /// number of tasks pushed.
    pub async fn flush_pending(&self, project: &Path) -> usize {
        let pending = {
            let store = lock_store(&self.store);
            store
                .pending_updates()
                .iter()
                .filter_map(|id| store.task_with_subtasks(id))
                .collect::<Vec<_>>()
        };
        if pending.is_empty() {
            return 0;
        }

        let mut pushed = 0;
        let mut failed = false;
        for detail in pending {
            let id = detail.task.id.clone();
            if let Err(err) = self.source.push_task(project, detail.into_task()).await {
                let err: anyhow::Error = err.into();
                warn!(task = %id, error = %err, "failed to push task update");
                lock_store(&self.store).set_error(Some(format!("failed to push task {id}: {err}")));
                failed = true;
            } else {
                pushed += 1;
            }
        }
        if !failed {
            lock_store(&self.store).end_batch();
        }
        pushed
    }
}

/// Correlation results drive store mutations through the controller: a
/// confident completion moves the task, anything actionable records a sync
/// obligation for the next flush.
impl<S: SnapshotSource> ProgressSink for SyncController<S> {
    type Error = Infallible;

    fn apply(
        &self,
        task: &TaskId,
        action: SuggestedAction,
        progress: ProgressEstimate,
    ) -> Result<(), Self::Error> {
        let mut store = lock_store(&self.store);
        match action {
            SuggestedAction::UpdateStatus => {
                let status = match progress {
                    ProgressEstimate::Completed => TaskStatus::Done,
                    ProgressEstimate::Started | ProgressEstimate::InProgress => {
                        TaskStatus::InProgress
                    }
                    ProgressEstimate::Unknown => return Ok(()),
                };
                store.move_task(task, status);
            }
            // An empty patch still records the pending-sync obligation.
            SuggestedAction::AddProgress => store.update_task(task, TaskPatch::default()),
            SuggestedAction::CreateTask | SuggestedAction::None => {}
        }
        Ok(())
    }
}
