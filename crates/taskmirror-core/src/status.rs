use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Workflow status of a task or subtask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet.
    Pending,
    /// Actively being worked on.
    InProgress,
    /// Awaiting review.
    Review,
    /// Completed.
    Done,
    /// Cannot proceed until something else changes.
    Blocked,
    /// Abandoned.
    Cancelled,
    /// Postponed.
    Deferred,
}

/// Error raised when a status string matches no known value.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct StatusParseError(pub String);

impl TaskStatus {
    /// Every status value, in canonical display order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::InProgress,
        Self::Review,
        Self::Done,
        Self::Blocked,
        Self::Cancelled,
        Self::Deferred,
    ];

    /// String representation used on the wire and in the task file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Done => "done",
            Self::Blocked => "blocked",
            Self::Cancelled => "cancelled",
            Self::Deferred => "deferred",
        }
    }

    /// Whether work under this status is finished for good.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| StatusParseError(s.to_owned()))
    }
}
