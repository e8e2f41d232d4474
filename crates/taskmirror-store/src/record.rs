//! Normalized task and subtask records.

use serde::{Deserialize, Serialize};
use taskmirror_core::{Priority, Subtask, SubtaskId, Task, TaskId, TaskStatus};
use time::OffsetDateTime;

/// Task record with subtasks factored out into their own map.
///
/// Identical to [`Task`] except the embedded subtask array is replaced by an
/// ordered list of subtask ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Identifier, unique within the project.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Current workflow status.
    pub status: TaskStatus,
    /// Scheduling priority.
    pub priority: Priority,
    /// Ids of tasks this one depends on.
    pub dependencies: Vec<TaskId>,
    /// Optional complexity score.
    pub complexity: Option<f64>,
    /// Optional effort estimate in hours.
    pub estimated_hours: Option<f64>,
    /// Creation timestamp, when known.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Last-update timestamp, when known.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Ordered ids of the subtasks owned by this task.
    pub subtask_ids: Vec<SubtaskId>,
}

/// Subtask record annotated with its owning task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtaskRecord {
    /// Identifier of the owning task. Ownership is exclusive.
    pub parent: TaskId,
    /// Identifier of the subtask itself.
    pub id: SubtaskId,
    /// Human-readable title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Current workflow status.
    pub status: TaskStatus,
    /// Ids of subtasks this one depends on.
    pub dependencies: Vec<SubtaskId>,
    /// Optional free-form implementation notes.
    pub details: Option<String>,
}

impl TaskRecord {
    /// Decompose an input task into its record and owned subtask records.
    #[must_use]
    pub fn normalize(task: Task) -> (Self, Vec<SubtaskRecord>) {
        let Task {
            id,
            title,
            description,
            status,
            priority,
            dependencies,
            complexity,
            estimated_hours,
            created_at,
            updated_at,
            subtasks,
        } = task;

        let children: Vec<SubtaskRecord> = subtasks
            .into_iter()
            .map(|subtask| SubtaskRecord::adopt(id.clone(), subtask))
            .collect();
        let subtask_ids = children.iter().map(|child| child.id.clone()).collect();

        let record = Self {
            id,
            title,
            description,
            status,
            priority,
            dependencies,
            complexity,
            estimated_hours,
            created_at,
            updated_at,
            subtask_ids,
        };
        (record, children)
    }
}

impl SubtaskRecord {
    /// Attach a subtask to its owning task.
    #[must_use]
    pub fn adopt(parent: TaskId, subtask: Subtask) -> Self {
        let Subtask {
            id,
            title,
            description,
            status,
            dependencies,
            details,
        } = subtask;
        Self {
            parent,
            id,
            title,
            description,
            status,
            dependencies,
            details,
        }
    }
}
