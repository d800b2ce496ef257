//! TODO task management: wire types, the in-memory store, and the
//! text-splitting task extractor stub.

pub mod extract;
pub mod model;
pub mod store;

pub use extract::{TaskDraft, extract_tasks};
pub use model::{Priority, Task, TaskCreate, TaskUpdate};
pub use store::{MemoryStore, TaskFilter, TaskStore};
