//! Partial-update payloads for tasks and subtasks.

use taskmirror_core::{Priority, SubtaskId, TaskId, TaskStatus};

/// Shallow-merge update for one task. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// Overwrite the title.
    pub title: Option<String>,
    /// Overwrite the description.
    pub description: Option<String>,
    /// Move to a new status.
    pub status: Option<TaskStatus>,
    /// Overwrite the priority.
    pub priority: Option<Priority>,
    /// Replace the dependency list.
    pub dependencies: Option<Vec<TaskId>>,
    /// Overwrite the complexity score.
    pub complexity: Option<f64>,
    /// Overwrite the hour estimate.
    pub estimated_hours: Option<f64>,
}

impl TaskPatch {
    /// Patch that only moves the task to `status`.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns true when applying the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.dependencies.is_none()
            && self.complexity.is_none()
            && self.estimated_hours.is_none()
    }
}

/// Shallow-merge update for one subtask.
#[derive(Debug, Clone, Default)]
pub struct SubtaskPatch {
    /// Overwrite the title.
    pub title: Option<String>,
    /// Overwrite the description.
    pub description: Option<String>,
    /// Move to a new status.
    pub status: Option<TaskStatus>,
    /// Replace the dependency list.
    pub dependencies: Option<Vec<SubtaskId>>,
    /// Overwrite the implementation notes.
    pub details: Option<String>,
}

impl SubtaskPatch {
    /// Returns true when applying the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.dependencies.is_none()
            && self.details.is_none()
    }
}
