//! Formatting helpers for the todo MCP server
//!
//! This module turns tasks and task collections into the display strings
//! returned by the tools.

use crate::tasks::{Task, TaskList};

/// Format the whole list as a numbered display, 1-based to match the task
/// numbers accepted by `complete` and `delete`.
pub fn format_numbered(list: &TaskList) -> String {
    if list.is_empty() {
        return "No tasks in the list".to_string();
    }

    let mut result = format!("You have {} task(s):\n\n", list.count());
    for (i, task) in list.tasks().iter().enumerate() {
        result.push_str(&format!("{}. {}\n", i + 1, task));
    }
    result
}

/// Format a query result as an unnumbered bullet list. Only list positions
/// are valid task numbers, so query results carry no numbering.
pub fn format_matches(tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return "No matching tasks found".to_string();
    }

    let mut result = format!("Found {} task(s):\n\n", tasks.len());
    for task in tasks {
        result.push_str(&format!("- {}\n", task));
    }
    result
}
