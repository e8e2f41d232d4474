//! Read-only derived views over the store.
//!
//! Selectors never mutate and are safe to call at any time, including while a
//! batch update is open.

use std::collections::BTreeMap;

use taskmirror_core::{TaskId, TaskStatus};

use crate::record::{SubtaskRecord, TaskRecord};
use crate::store::TaskStore;

/// A task joined with its resolved subtask records, in owned-id order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDetail {
    /// The task itself.
    pub task: TaskRecord,
    /// Its subtasks, resolved from the subtask map.
    pub subtasks: Vec<SubtaskRecord>,
}

impl TaskDetail {
    /// Denormalize back into the input shape with subtasks embedded, as
    /// expected when pushing a task to the external file.
    #[must_use]
    pub fn into_task(self) -> taskmirror_core::Task {
        let Self { task, subtasks } = self;
        taskmirror_core::Task {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            dependencies: task.dependencies,
            complexity: task.complexity,
            estimated_hours: task.estimated_hours,
            created_at: task.created_at,
            updated_at: task.updated_at,
            subtasks: subtasks
                .into_iter()
                .map(|subtask| taskmirror_core::Subtask {
                    id: subtask.id,
                    title: subtask.title,
                    description: subtask.description,
                    status: subtask.status,
                    dependencies: subtask.dependencies,
                    details: subtask.details,
                })
                .collect(),
        }
    }
}

impl TaskStore {
    /// Tasks currently holding `status`, in bucket order.
    ///
    /// Ids the index references but the record map no longer holds are
    /// silently skipped; the index may transiently point at an id being
    /// deleted and callers must tolerate the gap.
    #[must_use]
    pub fn tasks_with_status(&self, status: TaskStatus) -> Vec<&TaskRecord> {
        self.status_index()
            .ids(status)
            .iter()
            .filter_map(|id| self.task(id))
            .collect()
    }

    /// One task joined with its resolved subtasks, or `None` when absent.
    #[must_use]
    pub fn task_with_subtasks(&self, id: &TaskId) -> Option<TaskDetail> {
        let task = self.task(id)?.clone();
        let subtasks = task
            .subtask_ids
            .iter()
            .filter_map(|subtask_id| self.subtask(subtask_id))
            .cloned()
            .collect();
        Some(TaskDetail { task, subtasks })
    }

    /// Number of tasks per status, covering every bucket.
    #[must_use]
    pub fn status_counts(&self) -> BTreeMap<TaskStatus, usize> {
        self.status_index().counts()
    }

    /// Tasks matching an arbitrary predicate, in id order.
    #[must_use]
    pub fn filter_tasks<P>(&self, predicate: P) -> Vec<&TaskRecord>
    where
        P: Fn(&TaskRecord) -> bool,
    {
        let mut matches: Vec<&TaskRecord> = self
            .task_map()
            .values()
            .filter(|record| predicate(record))
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        matches
    }
}

/// Case-insensitive substring matcher over task text fields.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank
    /// inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_ascii_lowercase(),
        })
    }

    /// Whether any textual field on the record contains the query.
    #[must_use]
    pub fn matches(&self, record: &TaskRecord) -> bool {
        self.matches_field(&record.title)
            || self.matches_field(&record.description)
            || self.matches_field(record.status.as_str())
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_ascii_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use std::str::FromStr;
    use taskmirror_core::{Priority, Subtask, SubtaskId, Task};

    fn tid(raw: &str) -> TaskId {
        TaskId::from_str(raw).expect("task id")
    }

    fn store_with_sample() -> TaskStore {
        let mut store = TaskStore::new();
        store.set_tasks(vec![
            Task {
                id: tid("1"),
                title: "Build parser".into(),
                description: "tokenizer first".into(),
                status: TaskStatus::InProgress,
                priority: Priority::High,
                dependencies: Vec::new(),
                complexity: None,
                estimated_hours: None,
                created_at: None,
                updated_at: None,
                subtasks: vec![Subtask {
                    id: SubtaskId::from_str("1.1").expect("subtask id"),
                    title: "Lexer".into(),
                    description: String::new(),
                    status: TaskStatus::Done,
                    dependencies: Vec::new(),
                    details: None,
                }],
            },
            Task {
                id: tid("2"),
                title: "Write docs".into(),
                description: String::new(),
                status: TaskStatus::Pending,
                priority: Priority::Low,
                dependencies: Vec::new(),
                complexity: None,
                estimated_hours: None,
                created_at: None,
                updated_at: None,
                subtasks: Vec::new(),
            },
        ]);
        store
    }

    #[test]
    fn tasks_with_status_resolves_bucket_order() {
        let store = store_with_sample();
        let in_progress = store.tasks_with_status(TaskStatus::InProgress);
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, tid("1"));
        assert!(store.tasks_with_status(TaskStatus::Done).is_empty());
    }

    #[test]
    fn task_with_subtasks_joins_records() {
        let store = store_with_sample();
        let detail = store.task_with_subtasks(&tid("1")).expect("detail");
        assert_eq!(detail.subtasks.len(), 1);
        assert_eq!(detail.subtasks[0].title, "Lexer");

        assert!(store.task_with_subtasks(&tid("404")).is_none());
    }

    #[test]
    fn status_counts_cover_every_bucket() {
        let store = store_with_sample();
        let counts = store.status_counts();
        assert_eq!(counts.len(), TaskStatus::ALL.len());
        assert_eq!(counts[&TaskStatus::InProgress], 1);
        assert_eq!(counts[&TaskStatus::Pending], 1);
        assert_eq!(counts[&TaskStatus::Done], 0);
    }

    #[test]
    fn filter_tasks_applies_predicate_in_id_order() {
        let store = store_with_sample();
        let all = store.filter_tasks(|_| true);
        let ids: Vec<&TaskId> = all.iter().map(|record| &record.id).collect();
        assert_eq!(ids, vec![&tid("1"), &tid("2")]);

        let high = store.filter_tasks(|record| record.priority == Priority::High);
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].id, tid("1"));
    }

    #[test]
    fn text_matcher_searches_title_description_and_status() {
        let store = store_with_sample();

        let matcher = TextMatcher::new("PARSER").expect("matcher");
        assert_eq!(store.filter_tasks(|record| matcher.matches(record)).len(), 1);

        let matcher = TextMatcher::new("tokenizer").expect("matcher");
        assert_eq!(store.filter_tasks(|record| matcher.matches(record)).len(), 1);

        let matcher = TextMatcher::new("in-progress").expect("matcher");
        assert_eq!(store.filter_tasks(|record| matcher.matches(record)).len(), 1);

        assert!(TextMatcher::new("   ").is_none());
    }
}
