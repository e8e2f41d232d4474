//! Normalized entity store for the currently opened project.

use std::collections::{BTreeSet, HashMap};

use taskmirror_core::{Subtask, SubtaskId, Task, TaskId, TaskStatus};
use time::OffsetDateTime;
use tracing::debug;

use crate::index::StatusIndex;
use crate::patch::{SubtaskPatch, TaskPatch};
use crate::record::{SubtaskRecord, TaskRecord};

/// In-memory store of the tasks and subtasks of one project.
///
/// Single-writer and synchronous: every mutation updates record maps and the
/// status index before returning, so readers between mutations always observe
/// a consistent pair. Operations addressed to unknown ids are no-ops — stale
/// UI events must not corrupt state.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskStore {
    tasks: HashMap<TaskId, TaskRecord>,
    subtasks: HashMap<SubtaskId, SubtaskRecord>,
    index: StatusIndex,
    selected: Option<TaskId>,
    loading: bool,
    error: Option<String>,
    pending: BTreeSet<TaskId>,
    batching: bool,
    project: Option<String>,
    last_synced: OffsetDateTime,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Empty store with every status bucket pre-created and the sync marker
    /// at the epoch (first comparison always treats the file as newer).
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: HashMap::new(),
            subtasks: HashMap::new(),
            index: StatusIndex::new(),
            selected: None,
            loading: false,
            error: None,
            pending: BTreeSet::new(),
            batching: false,
            project: None,
            last_synced: OffsetDateTime::UNIX_EPOCH,
        }
    }

    /// Replace the entire store contents with a fresh snapshot.
    ///
    /// Duplicate ids in the input resolve last-write-wins. Resets the
    /// pending-update set, clears any recorded error, stamps the sync marker,
    /// and drops the selection if the selected task no longer exists.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks.clear();
        self.subtasks.clear();
        self.index = StatusIndex::new();

        let count = tasks.len();
        for task in tasks {
            self.insert_normalized(task);
        }

        if self
            .selected
            .as_ref()
            .is_some_and(|id| !self.tasks.contains_key(id))
        {
            self.selected = None;
        }
        self.pending.clear();
        self.error = None;
        self.last_synced = OffsetDateTime::now_utc();
        debug!(count, "applied task snapshot");
    }

    /// Insert one task without disturbing existing entries.
    ///
    /// Silent no-op when the id already exists; use [`Self::update_task`] to
    /// modify.
    pub fn add_task(&mut self, task: Task) {
        if self.tasks.contains_key(&task.id) {
            return;
        }
        self.insert_normalized(task);
    }

    /// Shallow-merge `patch` into the task. No-op when the id is absent.
    ///
    /// A status change moves the id between index buckets exactly once.
    /// Outside batch mode the id is recorded as owing an external sync.
    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) {
        let Some(record) = self.tasks.get_mut(id) else {
            return;
        };

        if let Some(status) = patch.status
            && status != record.status
        {
            self.index.transfer(id, record.status, status);
            record.status = status;
        }
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(description) = patch.description {
            record.description = description;
        }
        if let Some(priority) = patch.priority {
            record.priority = priority;
        }
        if let Some(dependencies) = patch.dependencies {
            record.dependencies = dependencies;
        }
        if let Some(complexity) = patch.complexity {
            record.complexity = Some(complexity);
        }
        if let Some(hours) = patch.estimated_hours {
            record.estimated_hours = Some(hours);
        }

        if !self.batching {
            self.pending.insert(id.clone());
        }
    }

    /// Move a task to `status`. Same bucket-membership guarantee as
    /// [`Self::update_task`]; exists as a focused operation for drag-and-drop
    /// transitions.
    pub fn move_task(&mut self, id: &TaskId, status: TaskStatus) {
        self.update_task(id, TaskPatch::status(status));
    }

    /// Delete a task, its owned subtasks, and its index entry. Clears the
    /// selection when the deleted task was selected. No-op when absent.
    pub fn delete_task(&mut self, id: &TaskId) {
        let Some(record) = self.tasks.remove(id) else {
            return;
        };
        self.index.remove(record.status, id);
        for subtask_id in &record.subtask_ids {
            self.subtasks.remove(subtask_id);
        }
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.pending.remove(id);
    }

    /// Attach a subtask to an existing task. No-op when the parent is absent
    /// or a subtask with the same id already exists.
    pub fn add_subtask(&mut self, parent: &TaskId, subtask: Subtask) {
        if self.subtasks.contains_key(&subtask.id) {
            return;
        }
        let Some(record) = self.tasks.get_mut(parent) else {
            return;
        };
        let child = SubtaskRecord::adopt(parent.clone(), subtask);
        record.subtask_ids.push(child.id.clone());
        self.subtasks.insert(child.id.clone(), child);
    }

    /// Shallow-merge `patch` into the subtask. No-op when the id is absent.
    pub fn update_subtask(&mut self, id: &SubtaskId, patch: SubtaskPatch) {
        let Some(record) = self.subtasks.get_mut(id) else {
            return;
        };
        if let Some(title) = patch.title {
            record.title = title;
        }
        if let Some(description) = patch.description {
            record.description = description;
        }
        if let Some(status) = patch.status {
            record.status = status;
        }
        if let Some(dependencies) = patch.dependencies {
            record.dependencies = dependencies;
        }
        if let Some(details) = patch.details {
            record.details = Some(details);
        }
    }

    /// Delete a subtask and unlink it from its owning task. No-op when
    /// absent.
    pub fn delete_subtask(&mut self, id: &SubtaskId) {
        let Some(record) = self.subtasks.remove(id) else {
            return;
        };
        if let Some(parent) = self.tasks.get_mut(&record.parent) {
            parent.subtask_ids.retain(|member| member != id);
        }
    }

    /// Set or clear the UI selection. Last write wins.
    pub fn select_task(&mut self, id: Option<TaskId>) {
        self.selected = id;
    }

    /// Set the loading flag. Last write wins.
    pub const fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Set or clear the error message. Last write wins.
    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Suppress pending-sync bookkeeping until [`Self::end_batch`].
    pub const fn begin_batch(&mut self) {
        self.batching = true;
    }

    /// End suppression and clear the accumulated pending-update set.
    ///
    /// Callers that flush the set externally must read it before calling
    /// this.
    pub fn end_batch(&mut self) {
        self.batching = false;
        self.pending.clear();
    }

    /// Force the next sync check to treat the external snapshot as newer by
    /// resetting the sync marker to the epoch.
    pub const fn invalidate_cache(&mut self) {
        self.last_synced = OffsetDateTime::UNIX_EPOCH;
    }

    /// Record which project this store mirrors.
    pub fn set_project(&mut self, project: Option<String>) {
        self.project = project;
    }

    /// Look up a task record.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&TaskRecord> {
        self.tasks.get(id)
    }

    /// Look up a subtask record.
    #[must_use]
    pub fn subtask(&self, id: &SubtaskId) -> Option<&SubtaskRecord> {
        self.subtasks.get(id)
    }

    /// Currently selected task, if any.
    #[must_use]
    pub const fn selected_task(&self) -> Option<&TaskId> {
        self.selected.as_ref()
    }

    /// Whether a sync fetch is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// Most recent sync error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Task ids owing an external sync, in id order.
    #[must_use]
    pub fn pending_updates(&self) -> Vec<TaskId> {
        self.pending.iter().cloned().collect()
    }

    /// When the store last applied a snapshot.
    #[must_use]
    pub const fn last_synced(&self) -> OffsetDateTime {
        self.last_synced
    }

    /// Identifier of the mirrored project, if one was recorded.
    #[must_use]
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Number of tasks currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) const fn status_index(&self) -> &StatusIndex {
        &self.index
    }

    pub(crate) const fn task_map(&self) -> &HashMap<TaskId, TaskRecord> {
        &self.tasks
    }

    pub(crate) const fn subtask_map(&self) -> &HashMap<SubtaskId, SubtaskRecord> {
        &self.subtasks
    }

    pub(crate) fn replace_contents(
        &mut self,
        tasks: HashMap<TaskId, TaskRecord>,
        subtasks: HashMap<SubtaskId, SubtaskRecord>,
        project: Option<String>,
        last_synced: OffsetDateTime,
    ) {
        self.index.rebuild(Self::in_id_order(&tasks));
        self.tasks = tasks;
        self.subtasks = subtasks;
        self.project = project;
        self.last_synced = last_synced;
        self.selected = None;
        self.pending.clear();
        self.error = None;
    }

    fn in_id_order(tasks: &HashMap<TaskId, TaskRecord>) -> impl Iterator<Item = &TaskRecord> {
        let mut records: Vec<&TaskRecord> = tasks.values().collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        records.into_iter()
    }

    /// Normalize and insert, reconciling duplicate task and subtask ids so
    /// record maps, subtask-id lists, and the index stay mutually consistent.
    fn insert_normalized(&mut self, task: Task) {
        if let Some(previous) = self.tasks.remove(&task.id) {
            self.index.remove(previous.status, &previous.id);
            for subtask_id in &previous.subtask_ids {
                self.subtasks.remove(subtask_id);
            }
        }

        let (record, children) = TaskRecord::normalize(task);
        for child in children {
            if let Some(stolen) = self.subtasks.insert(child.id.clone(), child) {
                // Ownership is exclusive: unlink the id from its old parent.
                if let Some(old_parent) = self.tasks.get_mut(&stolen.parent) {
                    old_parent.subtask_ids.retain(|member| member != &stolen.id);
                }
            }
        }
        self.index.append(record.status, record.id.clone());
        self.tasks.insert(record.id.clone(), record);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use std::str::FromStr;
    use taskmirror_core::Priority;

    fn tid(raw: &str) -> TaskId {
        TaskId::from_str(raw).expect("task id")
    }

    fn sid(raw: &str) -> SubtaskId {
        SubtaskId::from_str(raw).expect("subtask id")
    }

    fn subtask(id: &str) -> Subtask {
        Subtask {
            id: sid(id),
            title: format!("subtask {id}"),
            description: String::new(),
            status: TaskStatus::Pending,
            dependencies: Vec::new(),
            details: None,
        }
    }

    fn task(id: &str, status: TaskStatus, subtasks: Vec<Subtask>) -> Task {
        Task {
            id: tid(id),
            title: format!("task {id}"),
            description: String::new(),
            status,
            priority: Priority::Medium,
            dependencies: Vec::new(),
            complexity: None,
            estimated_hours: None,
            created_at: None,
            updated_at: None,
            subtasks,
        }
    }

    /// Every bucket must hold exactly the ids of tasks with that status, with
    /// no duplicates anywhere.
    fn assert_index_consistent(store: &TaskStore) {
        for status in TaskStatus::ALL {
            let bucket = store.status_index().ids(status);
            let mut seen = BTreeSet::new();
            for id in bucket {
                assert!(seen.insert(id.clone()), "duplicate {id} in {status} bucket");
                assert_eq!(
                    store.task(id).map(|record| record.status),
                    Some(status),
                    "bucket {status} holds {id} whose record disagrees"
                );
            }
            let holders = store
                .task_map()
                .values()
                .filter(|record| record.status == status)
                .count();
            assert_eq!(bucket.len(), holders, "bucket {status} size mismatch");
        }
    }

    #[test]
    fn set_tasks_normalizes_and_indexes() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![
            task("1", TaskStatus::Pending, vec![subtask("1.1"), subtask("1.2")]),
            task("2", TaskStatus::Done, Vec::new()),
        ]);

        let record = store.task(&tid("1")).expect("task 1");
        assert_eq!(record.subtask_ids, vec![sid("1.1"), sid("1.2")]);
        assert_eq!(store.subtask(&sid("1.1")).expect("subtask").parent, tid("1"));
        assert_eq!(store.status_index().ids(TaskStatus::Done), &[tid("2")]);
        assert!(store.error().is_none());
        assert!(store.pending_updates().is_empty());
        assert!(store.last_synced() > OffsetDateTime::UNIX_EPOCH);
        assert_index_consistent(&store);
    }

    #[test]
    fn set_tasks_resolves_duplicate_ids_last_write_wins() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![
            task("1", TaskStatus::Pending, vec![subtask("1.1")]),
            task("1", TaskStatus::Review, Vec::new()),
        ]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.task(&tid("1")).expect("task").status, TaskStatus::Review);
        assert!(store.status_index().ids(TaskStatus::Pending).is_empty());
        assert!(store.subtask(&sid("1.1")).is_none());
        assert_index_consistent(&store);
    }

    #[test]
    fn set_tasks_drops_selection_of_vanished_task() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![task("1", TaskStatus::Pending, Vec::new())]);
        store.select_task(Some(tid("1")));

        store.set_tasks(vec![task("2", TaskStatus::Pending, Vec::new())]);
        assert!(store.selected_task().is_none());

        store.select_task(Some(tid("2")));
        store.set_tasks(vec![task("2", TaskStatus::Done, Vec::new())]);
        assert_eq!(store.selected_task(), Some(&tid("2")));
    }

    #[test]
    fn add_task_is_silent_on_existing_id() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![task("1", TaskStatus::Pending, Vec::new())]);
        let before = store.clone();

        store.add_task(task("1", TaskStatus::Done, Vec::new()));
        assert_eq!(store, before);
    }

    #[test]
    fn update_task_moves_bucket_membership_exactly_once() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![
            task("1", TaskStatus::Pending, Vec::new()),
            task("2", TaskStatus::Pending, Vec::new()),
        ]);

        store.update_task(&tid("1"), TaskPatch::status(TaskStatus::InProgress));
        assert_eq!(store.status_index().ids(TaskStatus::Pending), &[tid("2")]);
        assert_eq!(store.status_index().ids(TaskStatus::InProgress), &[tid("1")]);
        assert_index_consistent(&store);

        // Same status again must not duplicate the entry.
        store.update_task(&tid("1"), TaskPatch::status(TaskStatus::InProgress));
        assert_eq!(store.status_index().ids(TaskStatus::InProgress), &[tid("1")]);
        assert_index_consistent(&store);
    }

    #[test]
    fn update_task_shallow_merges_remaining_fields() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![task("1", TaskStatus::Pending, Vec::new())]);

        store.update_task(
            &tid("1"),
            TaskPatch {
                title: Some("renamed".into()),
                complexity: Some(7.5),
                ..TaskPatch::default()
            },
        );

        let record = store.task(&tid("1")).expect("task");
        assert_eq!(record.title, "renamed");
        assert_eq!(record.complexity, Some(7.5));
        assert_eq!(record.status, TaskStatus::Pending);
        assert_eq!(record.description, "");
    }

    #[test]
    fn mutations_on_missing_entities_are_no_ops() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![task("1", TaskStatus::Pending, vec![subtask("1.1")])]);
        let before = store.clone();

        store.update_task(&tid("404"), TaskPatch::status(TaskStatus::Done));
        store.move_task(&tid("404"), TaskStatus::Done);
        store.delete_task(&tid("404"));
        store.update_subtask(&sid("404.1"), SubtaskPatch::default());
        store.delete_subtask(&sid("404.1"));
        store.add_subtask(&tid("404"), subtask("404.1"));

        assert_eq!(store, before);
    }

    #[test]
    fn delete_task_cascades_to_subtasks_and_selection() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![
            task("1", TaskStatus::InProgress, vec![subtask("1.1"), subtask("1.2")]),
            task("2", TaskStatus::InProgress, Vec::new()),
        ]);
        store.select_task(Some(tid("1")));

        store.delete_task(&tid("1"));

        assert!(store.task(&tid("1")).is_none());
        assert!(store.subtask(&sid("1.1")).is_none());
        assert!(store.subtask(&sid("1.2")).is_none());
        assert_eq!(store.status_index().ids(TaskStatus::InProgress), &[tid("2")]);
        assert!(store.selected_task().is_none());
        assert_index_consistent(&store);
    }

    #[test]
    fn subtask_lifecycle_keeps_parent_list_exact() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![task("1", TaskStatus::Pending, Vec::new())]);

        store.add_subtask(&tid("1"), subtask("1.1"));
        store.add_subtask(&tid("1"), subtask("1.2"));
        // Duplicate id: silent no-op.
        store.add_subtask(&tid("1"), subtask("1.1"));

        let record = store.task(&tid("1")).expect("task");
        assert_eq!(record.subtask_ids, vec![sid("1.1"), sid("1.2")]);

        store.update_subtask(
            &sid("1.1"),
            SubtaskPatch {
                status: Some(TaskStatus::Done),
                details: Some("notes".into()),
                ..SubtaskPatch::default()
            },
        );
        let child = store.subtask(&sid("1.1")).expect("subtask");
        assert_eq!(child.status, TaskStatus::Done);
        assert_eq!(child.details.as_deref(), Some("notes"));

        store.delete_subtask(&sid("1.1"));
        assert!(store.subtask(&sid("1.1")).is_none());
        let record = store.task(&tid("1")).expect("task");
        assert_eq!(record.subtask_ids, vec![sid("1.2")]);
    }

    #[test]
    fn batch_mode_suppresses_pending_bookkeeping() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![
            task("1", TaskStatus::Pending, Vec::new()),
            task("2", TaskStatus::Pending, Vec::new()),
        ]);

        store.update_task(&tid("1"), TaskPatch::status(TaskStatus::Done));
        assert_eq!(store.pending_updates(), vec![tid("1")]);

        store.begin_batch();
        store.update_task(&tid("2"), TaskPatch::status(TaskStatus::Done));
        assert_eq!(store.pending_updates(), vec![tid("1")]);

        store.end_batch();
        assert!(store.pending_updates().is_empty());

        store.update_task(&tid("2"), TaskPatch::status(TaskStatus::Review));
        assert_eq!(store.pending_updates(), vec![tid("2")]);
    }

    #[test]
    fn invalidate_cache_resets_the_sync_marker() {
        let mut store = TaskStore::new();
        store.set_tasks(Vec::new());
        assert!(store.last_synced() > OffsetDateTime::UNIX_EPOCH);

        store.invalidate_cache();
        assert_eq!(store.last_synced(), OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn randomized_mutation_sequence_preserves_index_consistency() {
        let mut store = TaskStore::new();
        store.set_tasks(vec![
            task("1", TaskStatus::Pending, vec![subtask("1.1")]),
            task("2", TaskStatus::InProgress, Vec::new()),
            task("3", TaskStatus::Review, Vec::new()),
        ]);

        let moves = [
            (tid("1"), TaskStatus::Done),
            (tid("2"), TaskStatus::Blocked),
            (tid("3"), TaskStatus::Pending),
            (tid("1"), TaskStatus::Cancelled),
            (tid("2"), TaskStatus::Deferred),
        ];
        for (id, status) in moves {
            store.move_task(&id, status);
            assert_index_consistent(&store);
        }

        store.delete_task(&tid("2"));
        assert_index_consistent(&store);
        store.add_task(task("4", TaskStatus::Review, Vec::new()));
        assert_index_consistent(&store);
    }
}
