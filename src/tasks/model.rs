//! Task wire types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Everyday work.
    #[default]
    Normal,
    /// Needs attention first.
    High,
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: u64,
    /// Short task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Optional due timestamp.
    pub due_at: Option<DateTime<Utc>>,
    /// Priority, defaulting to normal.
    pub priority: Priority,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Completion flag.
    pub done: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreate {
    /// Short task title. The only required field.
    pub title: String,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional due timestamp.
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// Priority, defaulting to normal.
    #[serde(default)]
    pub priority: Priority,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Completion flag, defaulting to false.
    #[serde(default)]
    pub done: bool,
}

/// Partial update payload; omitted fields keep their stored values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskUpdate {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New due timestamp.
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    /// New priority.
    #[serde(default)]
    pub priority: Option<Priority>,
    /// Replacement tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New completion flag.
    #[serde(default)]
    pub done: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::from_str::<Priority>("\"low\"").unwrap(),
            Priority::Low
        );
    }

    #[test]
    fn create_defaults_apply() {
        let create: TaskCreate = serde_json::from_str("{\"title\": \"write tests\"}").unwrap();
        assert_eq!(create.title, "write tests");
        assert_eq!(create.priority, Priority::Normal);
        assert!(create.tags.is_empty());
        assert!(!create.done);
        assert!(create.due_at.is_none());
    }

    #[test]
    fn update_rejects_unknown_fields() {
        let result = serde_json::from_str::<TaskUpdate>("{\"finished\": true}");
        assert!(result.is_err());
    }

    #[test]
    fn update_deserializes_partial() {
        let update: TaskUpdate = serde_json::from_str("{\"done\": true}").unwrap();
        assert_eq!(update.done, Some(true));
        assert!(update.title.is_none());
    }
}
