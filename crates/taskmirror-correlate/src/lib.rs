//! Commit-to-task correlation engine.
//!
//! Pure scoring over commit records: extract task references from the
//! message, estimate progress, suggest an action. The semantic fallback and
//! the mutation sink are trait seams; nothing here touches the store.

/// Scoring pipeline.
pub mod engine;
/// Progress-sink seam.
pub mod progress;
/// Reference extraction rules.
pub mod references;
/// Semantic fallback seam.
pub mod strategy;

pub use engine::{CorrelationOptions, analyze_commit};
pub use progress::{ACTION_CONFIDENCE_FLOOR, ProgressSink, update_task_progress};
pub use references::task_references;
pub use strategy::{PathKeywordHeuristic, SemanticCorrelator};
