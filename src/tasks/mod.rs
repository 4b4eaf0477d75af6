//! Task domain models and business logic
//!
//! This module contains the core task data structures and their operations.
//! It is split into submodules for better organization:
//! - `task`: A single task in one of three variants (todo, deadline, event)
//! - `task_list`: The ordered task container with positional operations
//! - `error`: Domain error taxonomy

mod error;
mod task;
mod task_list;

// Re-export all public types
pub use error::TaskError;
pub use task::{Task, TaskKind};
pub use task_list::{SortKey, TaskList};
