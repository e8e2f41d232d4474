use crate::commit::CommitHash;
use crate::id::TaskId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// How a correlation result was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Deterministic pattern rules over the commit message.
    Regex,
    /// Semantic analysis of message and changed files.
    Semantic,
    /// Supplied by a human.
    Manual,
    /// Produced by an external model.
    Ai,
}

/// Rough estimate of how far a commit advances its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressEstimate {
    /// Work has just begun.
    Started,
    /// Work continues.
    InProgress,
    /// Work appears finished.
    Completed,
    /// No signal either way.
    Unknown,
}

/// Action a consumer should take in response to a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestedAction {
    /// Move the task to a new status.
    UpdateStatus,
    /// Append a progress note to the task.
    AddProgress,
    /// No matching task exists; one could be created.
    CreateTask,
    /// Do nothing.
    None,
}

/// Outcome of correlating one commit against the known tasks.
///
/// A transient value object: the engine produces it, consumers decide whether
/// to persist or act on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Commit the analysis ran over.
    pub commit: CommitHash,
    /// Best-guess task the commit advances, if any.
    pub task_id: Option<TaskId>,
    /// Trust in the guess, in `[0.0, 1.0]`.
    pub confidence: f64,
    /// How the guess was made.
    pub method: CorrelationMethod,
    /// Human-readable explanation of the match.
    pub reasoning: String,
    /// Estimated progress the commit represents.
    pub progress: ProgressEstimate,
    /// What the consumer should do about it.
    pub action: SuggestedAction,
    /// When the analysis ran.
    #[serde(with = "time::serde::rfc3339")]
    pub analyzed_at: OffsetDateTime,
}

impl CorrelationResult {
    /// Zero-confidence result for a commit that matched nothing.
    #[must_use]
    pub fn unmatched(commit: CommitHash, method: CorrelationMethod, reasoning: String) -> Self {
        Self {
            commit,
            task_id: None,
            confidence: 0.0,
            method,
            reasoning,
            progress: ProgressEstimate::Unknown,
            action: SuggestedAction::None,
            analyzed_at: OffsetDateTime::now_utc(),
        }
    }
}
