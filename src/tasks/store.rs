//! Task storage.
//!
//! [`TaskStore`] is the seam between the HTTP layer and whatever holds
//! the tasks; [`MemoryStore`] is the in-process implementation backed by
//! a concurrent map. Filtering is a linear scan; the store is a plain
//! keyed map, not a query engine.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Deserialize;

use super::model::{Task, TaskCreate, TaskUpdate};

/// Filter parameters for listing tasks.
///
/// Deserializes directly from the `/tasks` query string; `from`/`to`
/// bound the due timestamp inclusively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    /// Case-insensitive substring match over title and description.
    #[serde(default)]
    pub q: Option<String>,
    /// Exact tag membership.
    #[serde(default)]
    pub tag: Option<String>,
    /// Completion flag.
    #[serde(default)]
    pub done: Option<bool>,
    /// Lower bound on `due_at`.
    #[serde(default, rename = "from")]
    pub due_from: Option<DateTime<Utc>>,
    /// Upper bound on `due_at`.
    #[serde(default, rename = "to")]
    pub due_to: Option<DateTime<Utc>>,
}

impl TaskFilter {
    /// Whether `task` passes every provided criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(q) = &self.q {
            let needle = q.to_lowercase();
            let in_title = task.title.to_lowercase().contains(&needle);
            let in_description = task
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }
        if let Some(tag) = &self.tag {
            if !task.tags.iter().any(|t| t == tag) {
                return false;
            }
        }
        if let Some(done) = self.done {
            if task.done != done {
                return false;
            }
        }
        if let Some(from) = self.due_from {
            if task.due_at.is_none_or(|due| due < from) {
                return false;
            }
        }
        if let Some(to) = self.due_to {
            if task.due_at.is_none_or(|due| due > to) {
                return false;
            }
        }
        true
    }
}

/// Storage seam for tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task and returns it with an assigned id.
    async fn create(&self, payload: TaskCreate) -> Task;

    /// Lists tasks passing `filter`, ordered by id.
    async fn list(&self, filter: &TaskFilter) -> Vec<Task>;

    /// Fetches a task by id.
    async fn get(&self, id: u64) -> Option<Task>;

    /// Applies a partial update; `None` if the id is unknown.
    async fn update(&self, id: u64, patch: TaskUpdate) -> Option<Task>;

    /// Deletes a task; `false` if the id is unknown.
    async fn delete(&self, id: u64) -> bool;
}

/// In-memory task store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: DashMap<u64, Task>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store; ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn create(&self, payload: TaskCreate) -> Task {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let task = Task {
            id,
            title: payload.title,
            description: payload.description,
            due_at: payload.due_at,
            priority: payload.priority,
            tags: payload.tags,
            done: payload.done,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(id, task.clone());
        task
    }

    async fn list(&self, filter: &TaskFilter) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }

    async fn get(&self, id: u64) -> Option<Task> {
        self.tasks.get(&id).map(|entry| entry.value().clone())
    }

    async fn update(&self, id: u64, patch: TaskUpdate) -> Option<Task> {
        let mut entry = self.tasks.get_mut(&id)?;
        let task = entry.value_mut();
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(due_at) = patch.due_at {
            task.due_at = Some(due_at);
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(tags) = patch.tags {
            task.tags = tags;
        }
        if let Some(done) = patch.done {
            task.done = done;
        }
        task.updated_at = Utc::now();
        Some(task.clone())
    }

    async fn delete(&self, id: u64) -> bool {
        self.tasks.remove(&id).is_some()
    }
}
