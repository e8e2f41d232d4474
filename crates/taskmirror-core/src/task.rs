use crate::id::{SubtaskId, TaskId};
use crate::status::TaskStatus;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Priority of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal scheduling.
    #[default]
    Medium,
    /// Should be picked up next.
    High,
}

/// Task as delivered by the external task file, subtasks embedded.
///
/// This is the input-snapshot shape of the sync boundary; the store
/// normalizes it into separate task and subtask records on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within the project.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Longer description, empty when the file carries none.
    #[serde(default)]
    pub description: String,
    /// Current workflow status.
    pub status: TaskStatus,
    /// Scheduling priority.
    #[serde(default)]
    pub priority: Priority,
    /// Ids of tasks this one depends on.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    /// Optional complexity score assigned by the analysis tool.
    #[serde(default)]
    pub complexity: Option<f64>,
    /// Optional effort estimate in hours.
    #[serde(default)]
    pub estimated_hours: Option<f64>,
    /// Creation timestamp, when the file records one.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Last-update timestamp, when the file records one.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Embedded subtasks; consumed during normalization.
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

/// Child unit of work belonging to exactly one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtask {
    /// Identifier, task-scoped or dotted-global.
    pub id: SubtaskId,
    /// Human-readable title.
    pub title: String,
    /// Longer description, empty when the file carries none.
    #[serde(default)]
    pub description: String,
    /// Current workflow status.
    pub status: TaskStatus,
    /// Ids of subtasks this one depends on.
    #[serde(default)]
    pub dependencies: Vec<SubtaskId>,
    /// Optional free-form implementation notes.
    #[serde(default)]
    pub details: Option<String>,
}
