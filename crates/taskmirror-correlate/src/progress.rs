//! Integration seam between correlation output and task mutation.

use taskmirror_core::{CorrelationResult, ProgressEstimate, SuggestedAction, TaskId};
use tracing::warn;

/// Minimum confidence required before a correlation may drive a mutation.
pub const ACTION_CONFIDENCE_FLOOR: f64 = 0.5;

/// External collaborator that applies progress updates to the task file.
pub trait ProgressSink {
    /// Error type surfaced by the collaborator.
    type Error: std::fmt::Display;

    /// Apply the suggested action and progress to the given task.
    ///
    /// # Errors
    /// Returns a collaborator-specific error when the update cannot be
    /// delivered.
    fn apply(
        &self,
        task: &TaskId,
        action: SuggestedAction,
        progress: ProgressEstimate,
    ) -> Result<(), Self::Error>;
}

/// Forward a correlation to the task-mutation collaborator.
///
/// Declines (returns `false`) when the correlation names no task or its
/// confidence is below [`ACTION_CONFIDENCE_FLOOR`]; that is a normal, silent
/// outcome, not a failure. A sink error is logged and also reported as
/// `false` so callers can retry or ignore.
pub fn update_task_progress<S: ProgressSink>(sink: &S, correlation: &CorrelationResult) -> bool {
    let Some(task_id) = correlation.task_id.as_ref() else {
        return false;
    };
    if correlation.confidence < ACTION_CONFIDENCE_FLOOR {
        return false;
    }
    match sink.apply(task_id, correlation.action, correlation.progress) {
        Ok(()) => true,
        Err(err) => {
            warn!(task = %task_id, %err, "progress sink rejected update");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use std::cell::RefCell;
    use std::str::FromStr;
    use taskmirror_core::{CommitHash, CorrelationMethod};
    use time::macros::datetime;

    #[derive(Default)]
    struct RecordingSink {
        applied: RefCell<Vec<(TaskId, SuggestedAction, ProgressEstimate)>>,
        fail: bool,
    }

    impl ProgressSink for RecordingSink {
        type Error = String;

        fn apply(
            &self,
            task: &TaskId,
            action: SuggestedAction,
            progress: ProgressEstimate,
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err("task CLI unreachable".to_owned());
            }
            self.applied.borrow_mut().push((task.clone(), action, progress));
            Ok(())
        }
    }

    fn correlation(task_id: Option<&str>, confidence: f64) -> CorrelationResult {
        CorrelationResult {
            commit: CommitHash::from_str("abc123").expect("hash"),
            task_id: task_id.map(|id| TaskId::from_str(id).expect("id")),
            confidence,
            method: CorrelationMethod::Regex,
            reasoning: "test".into(),
            progress: ProgressEstimate::Completed,
            action: SuggestedAction::UpdateStatus,
            analyzed_at: datetime!(2025-06-01 12:00 UTC),
        }
    }

    #[test]
    fn confident_correlation_reaches_the_sink() {
        let sink = RecordingSink::default();
        assert!(update_task_progress(&sink, &correlation(Some("27.6"), 0.9)));

        let applied = sink.applied.borrow();
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].0.as_str(), "27.6");
        assert_eq!(applied[0].1, SuggestedAction::UpdateStatus);
    }

    #[test]
    fn declines_without_task_or_confidence() {
        let sink = RecordingSink::default();
        assert!(!update_task_progress(&sink, &correlation(None, 0.9)));
        assert!(!update_task_progress(&sink, &correlation(Some("3"), 0.4)));
        assert!(sink.applied.borrow().is_empty());
    }

    #[test]
    fn sink_failure_reports_false() {
        let sink = RecordingSink {
            fail: true,
            ..RecordingSink::default()
        };
        assert!(!update_task_progress(&sink, &correlation(Some("3"), 0.8)));
    }
}
