//! Naive text-to-task extraction.
//!
//! Placeholder for real natural-language extraction: splits the input
//! on newlines and commas and turns each non-empty phrase into a draft.
//! No dates, no priorities, no deduplication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A candidate task extracted from free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Proposed title.
    pub title: String,
    /// Proposed due timestamp. Always `None` for now.
    pub due: Option<DateTime<Utc>>,
}

/// Splits `text` into task drafts.
#[must_use]
pub fn extract_tasks(text: &str) -> Vec<TaskDraft> {
    text.replace('\n', ",")
        .split(',')
        .map(str::trim)
        .filter(|phrase| !phrase.is_empty())
        .map(|phrase| TaskDraft {
            title: phrase.to_string(),
            due: None,
        })
        .collect()
}
