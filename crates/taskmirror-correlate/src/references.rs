//! Task-reference extraction from commit messages.

use regex::Regex;
use std::sync::LazyLock;

/// Extraction rules, in priority order for picking the primary reference.
///
/// All rules run over the whole message; their captures merge into one
/// first-seen-order set. A reference is a numeric id, optionally dotted
/// (`27.6`) for subtask-level references.
static REFERENCE_RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Work-verb references: "fix #27", "task 12", "working on 12".
        rule(r"(?i)\b(?:(?:task|fix|close|resolve|complete|implement)s?|work(?:ing|s)?\s+on)\s*[:#]?\s*(\d+(?:\.\d+)?)"),
        // Hash references: "#27", "#27.6".
        rule(r"#(\d+(?:\.\d+)?)"),
        // Subtask-prefixed references: "subtask 27.6", "sub: 27.6".
        rule(r"(?i)\b(?:subtask|sub)s?\s*[:#]?\s*(\d+\.\d+)"),
        // Bare dotted identifiers anywhere in the text.
        rule(r"\b(\d+\.\d+)\b"),
        // Closing-verb references: "fixes 27", "closes: #12".
        rule(r"(?i)\b(?:fixes|closes|resolves|addresses)\s*[:#]?\s*(\d+(?:\.\d+)?)"),
    ]
});

fn rule(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| unreachable!("built-in pattern must compile: {err}"))
}

/// Extract the unique task references from a commit message.
///
/// Returns ids in first-seen order: rule priority first, match position
/// within each rule second, duplicates dropped.
#[must_use]
pub fn task_references(message: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for rule in &*REFERENCE_RULES {
        for capture in rule.captures_iter(message) {
            if let Some(id) = capture.get(1) {
                let id = id.as_str();
                if !seen.iter().any(|existing| existing.as_str() == id) {
                    seen.push(id.to_owned());
                }
            }
        }
    }
    seen
}
