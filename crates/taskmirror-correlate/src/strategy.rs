//! Pluggable fallback for commits that carry no explicit task reference.

use taskmirror_core::{CommitRecord, CorrelationMethod, CorrelationResult, SuggestedAction, Task};
use time::OffsetDateTime;

use crate::engine::estimate_progress;

/// Fallback correlation strategy consulted when pattern extraction finds
/// nothing. Implementations may call out to an external model; the result's
/// `method` should say which kind of analysis produced it.
pub trait SemanticCorrelator {
    /// Attempt a correlation. `None` means no candidate emerged.
    fn correlate(&self, commit: &CommitRecord, available_tasks: &[Task])
    -> Option<CorrelationResult>;
}

/// Confidence assigned to heuristic matches; deliberately below the action
/// threshold so consumers treat these as hints.
const HEURISTIC_CONFIDENCE: f64 = 0.35;

/// Minimum title-token length considered distinctive enough to match on.
const MIN_TOKEN_LEN: usize = 4;

/// Placeholder semantic strategy: a task is a candidate when one of its
/// distinctive title words appears in the commit message or in a changed
/// file path. The first candidate in task order wins.
///
/// An extension seam, not a classifier; real semantic correlation plugs in
/// behind the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathKeywordHeuristic;

impl SemanticCorrelator for PathKeywordHeuristic {
    fn correlate(
        &self,
        commit: &CommitRecord,
        available_tasks: &[Task],
    ) -> Option<CorrelationResult> {
        let message = commit.message.to_lowercase();
        let paths: Vec<String> = commit.files.iter().map(|path| path.to_lowercase()).collect();

        for task in available_tasks {
            let matched = title_tokens(&task.title).find(|token| {
                message.contains(token.as_str()) || paths.iter().any(|path| path.contains(token.as_str()))
            });
            if let Some(token) = matched {
                return Some(CorrelationResult {
                    commit: commit.hash.clone(),
                    task_id: Some(task.id.clone()),
                    confidence: HEURISTIC_CONFIDENCE,
                    method: CorrelationMethod::Ai,
                    reasoning: format!(
                        "task title word \"{token}\" appears in the commit message or changed paths"
                    ),
                    progress: estimate_progress(&message),
                    action: SuggestedAction::None,
                    analyzed_at: OffsetDateTime::now_utc(),
                });
            }
        }
        None
    }
}

fn title_tokens(title: &str) -> impl Iterator<Item = String> + '_ {
    title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
}
