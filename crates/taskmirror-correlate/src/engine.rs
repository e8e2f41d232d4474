//! Deterministic commit-to-task scoring.

use taskmirror_core::{
    CommitRecord, CorrelationMethod, CorrelationResult, ProgressEstimate, SuggestedAction, Task,
};
use time::OffsetDateTime;

use crate::references::task_references;
use crate::strategy::SemanticCorrelator;

/// Keywords implying the referenced work is finished.
const COMPLETION_KEYWORDS: [&str; 7] =
    ["fix", "complete", "finish", "done", "resolve", "close", "final"];
/// Keywords implying the referenced work just began.
const START_KEYWORDS: [&str; 7] =
    ["start", "begin", "initial", "setup", "create", "add", "implement"];
/// Keywords implying the referenced work continues.
const PROGRESS_KEYWORDS: [&str; 7] =
    ["update", "modify", "change", "improve", "refactor", "enhance", "work"];

/// Options for one analysis run.
#[derive(Default)]
pub struct CorrelationOptions<'a> {
    /// Fallback strategy consulted only when pattern extraction finds no
    /// references. `None` keeps the analysis purely deterministic.
    pub semantic: Option<&'a dyn SemanticCorrelator>,
}

/// Estimate which task a commit advances and how confidently.
///
/// The primary reference is the first one in rule order; additional
/// references only raise confidence. `available_tasks` is consulted by the
/// semantic fallback alone — the pattern path trusts the message.
#[must_use]
pub fn analyze_commit(
    commit: &CommitRecord,
    available_tasks: &[Task],
    options: &CorrelationOptions<'_>,
) -> CorrelationResult {
    let references = task_references(&commit.message);

    let Some(primary) = references.first() else {
        if let Some(strategy) = options.semantic
            && let Some(result) = strategy.correlate(commit, available_tasks)
        {
            return result;
        }
        return CorrelationResult::unmatched(
            commit.hash.clone(),
            CorrelationMethod::Regex,
            "no task references found in commit message".to_owned(),
        );
    };

    let message = commit.message.to_lowercase();
    let confidence = score_confidence(&message, &references, primary, commit);
    let progress = estimate_progress(&message);
    let action = suggest_action(confidence, progress);

    CorrelationResult {
        commit: commit.hash.clone(),
        task_id: primary.parse().ok(),
        confidence,
        method: CorrelationMethod::Regex,
        reasoning: format!("commit message references task {primary}"),
        progress,
        action,
        analyzed_at: OffsetDateTime::now_utc(),
    }
}

/// Additive confidence score, base 0.5, capped at 1.0.
fn score_confidence(
    message: &str,
    references: &[String],
    primary: &str,
    commit: &CommitRecord,
) -> f64 {
    let mut score: f64 = 0.5;
    if message.contains("task") {
        score += 0.2;
    }
    if message.contains("fix") {
        score += 0.1;
    }
    if message.contains("complete") {
        score += 0.2;
    }
    if references.len() > 1 {
        score += 0.1;
    }
    // A dotted reference targets a subtask: more specific, more trustworthy.
    if primary.contains('.') {
        score += 0.1;
    }
    if !commit.files.is_empty() {
        score += 0.05;
    }
    score.min(1.0)
}

/// Strict-priority keyword scan: completion beats start beats progress.
///
/// Matches are case-insensitive substrings, so "prefix" counts as "fix"; the
/// noise is reflected in confidence, not filtered here.
pub(crate) fn estimate_progress(message: &str) -> ProgressEstimate {
    if COMPLETION_KEYWORDS.iter().any(|kw| message.contains(kw)) {
        ProgressEstimate::Completed
    } else if START_KEYWORDS.iter().any(|kw| message.contains(kw)) {
        ProgressEstimate::Started
    } else if PROGRESS_KEYWORDS.iter().any(|kw| message.contains(kw)) {
        ProgressEstimate::InProgress
    } else {
        ProgressEstimate::Unknown
    }
}

const fn suggest_action(confidence: f64, progress: ProgressEstimate) -> SuggestedAction {
    if confidence < 0.5 {
        return SuggestedAction::None;
    }
    match progress {
        ProgressEstimate::Completed => {
            if confidence > 0.7 {
                SuggestedAction::UpdateStatus
            } else {
                SuggestedAction::AddProgress
            }
        }
        ProgressEstimate::Started | ProgressEstimate::InProgress => SuggestedAction::AddProgress,
        ProgressEstimate::Unknown => SuggestedAction::None,
    }
}
