//! Todo MCP Server Library
//!
//! This library provides a Model Context Protocol (MCP) server for personal
//! task tracking: plain todos, deadline-bound tasks, and dated events in a
//! single ordered list.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **MCP Layer**: `TodoServerHandler` - Handles MCP protocol communication
//! - **Domain Layer**: `tasks` module - Task entities and the ordered list
//! - **Persistence Layer**: `storage` module - File-based TOML storage with Git sync
//!
//! # Example
//!
//! ```no_run
//! use todo_mcp::TodoServerHandler;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let handler = TodoServerHandler::new("tasks.toml", false)?;
//!     // Use handler with MCP server...
//!     Ok(())
//! }
//! ```

mod formatting;
mod git_ops;
pub mod storage;
pub mod tasks;
pub mod validation;

use anyhow::Result;
use mcp_attr::server::{McpServer, mcp_server};
use mcp_attr::{Result as McpResult, bail};
use std::sync::Mutex;

// Re-export commonly used types
pub use storage::Storage;
pub use tasks::{SortKey, Task, TaskError, TaskKind, TaskList};

/// MCP Server handler for personal task tracking
///
/// Provides an MCP interface over a single user's task list. All changes
/// are persisted to a TOML file and optionally synchronized with Git.
pub struct TodoServerHandler {
    pub(crate) data: Mutex<TaskList>,
    pub(crate) storage: Storage,
}

impl TodoServerHandler {
    /// Create a new todo server handler
    ///
    /// # Arguments
    /// * `storage_path` - Path to the task data file (TOML format)
    /// * `sync_git` - Enable automatic Git synchronization
    ///
    /// # Example
    /// ```no_run
    /// # use todo_mcp::TodoServerHandler;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let handler = TodoServerHandler::new("tasks.toml", false)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(storage_path: &str, sync_git: bool) -> Result<Self> {
        let storage = Storage::new(storage_path, sync_git);
        let data = Mutex::new(storage.load()?);
        Ok(Self { data, storage })
    }

    /// Save the task list with a commit message describing the operation
    fn save_data_with_message(&self, message: &str) -> Result<()> {
        let data = self.data.lock().unwrap();
        self.storage.save_with_message(&data, message)?;
        Ok(())
    }
}

impl Drop for TodoServerHandler {
    fn drop(&mut self) {
        // Push to git on shutdown if sync is enabled
        if let Err(e) = self.storage.shutdown() {
            eprintln!("Warning: Shutdown git sync failed: {}", e);
        }
    }
}

/// Personal task tracker holding one ordered list of tasks.
///
/// Three task variants exist: plain todos, deadlines (due on a date), and
/// events (occurring on a date). Tasks are addressed by their 1-based
/// position in the list, which is also the order `list` displays.
///
/// Rendering legend: `[T|D|E]` variant tag, `[X]` complete / `[ ]` open,
/// then the name and, for dated tasks, the date label.
///
/// Typical flow: add tasks → `list` to see their numbers → `complete` /
/// `delete` by number → `find` / `schedule` to query → `sort` to reorder.
#[mcp_server]
impl McpServer for TodoServerHandler {
    /// Add a plain todo task with no date attached.
    #[tool]
    pub async fn add_todo(
        &self,
        /// Task name (must not be blank)
        name: String,
    ) -> McpResult<String> {
        let mut data = self.data.lock().unwrap();
        let rendered = match data.add_todo(&name) {
            Ok(task) => task.to_string(),
            Err(e) => {
                drop(data);
                bail!("{}", e);
            }
        };
        let count = data.count();
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Add todo: {}", name)) {
            bail!("Failed to save: {}", e);
        }

        Ok(format!(
            "Added: {}\nYou now have {} task(s) in the list",
            rendered, count
        ))
    }

    /// Add a task that is due on a specific date.
    #[tool]
    pub async fn add_deadline(
        &self,
        /// Task name (must not be blank)
        name: String,
        /// Due date: YYYY-MM-DD (e.g., "2024-05-01")
        due_date: String,
    ) -> McpResult<String> {
        let due = validation::parse_date(&due_date)?;

        let mut data = self.data.lock().unwrap();
        let rendered = match data.add_deadline(&name, due) {
            Ok(task) => task.to_string(),
            Err(e) => {
                drop(data);
                bail!("{}", e);
            }
        };
        let count = data.count();
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Add deadline: {}", name)) {
            bail!("Failed to save: {}", e);
        }

        Ok(format!(
            "Added: {}\nYou now have {} task(s) in the list",
            rendered, count
        ))
    }

    /// Add a task for an event occurring on a specific date.
    #[tool]
    pub async fn add_event(
        &self,
        /// Task name (must not be blank)
        name: String,
        /// Event date: YYYY-MM-DD (e.g., "2024-05-01")
        event_date: String,
    ) -> McpResult<String> {
        let on = validation::parse_date(&event_date)?;

        let mut data = self.data.lock().unwrap();
        let rendered = match data.add_event(&name, on) {
            Ok(task) => task.to_string(),
            Err(e) => {
                drop(data);
                bail!("{}", e);
            }
        };
        let count = data.count();
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Add event: {}", name)) {
            bail!("Failed to save: {}", e);
        }

        Ok(format!(
            "Added: {}\nYou now have {} task(s) in the list",
            rendered, count
        ))
    }

    /// Show every task with its number. Task numbers are what `complete`
    /// and `delete` expect.
    #[tool]
    pub async fn list(&self) -> McpResult<String> {
        let data = self.data.lock().unwrap();
        let result = formatting::format_numbered(&data);
        drop(data);
        Ok(result)
    }

    /// Mark a task as done by its number. Completion is permanent.
    #[tool]
    pub async fn complete(
        &self,
        /// Task number: 1-based position shown by `list`
        number: u32,
    ) -> McpResult<String> {
        let mut data = self.data.lock().unwrap();
        let rendered = match data.complete(number as usize) {
            Ok(task) => task.to_string(),
            Err(e) => {
                drop(data);
                bail!("{}", e);
            }
        };
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Complete task {}", number)) {
            bail!("Failed to save: {}", e);
        }

        Ok(format!("Marked as done: {}", rendered))
    }

    /// Delete a task by its number. Later tasks shift down by one.
    #[tool]
    pub async fn delete(
        &self,
        /// Task number: 1-based position shown by `list`
        number: u32,
    ) -> McpResult<String> {
        let mut data = self.data.lock().unwrap();
        let removed = match data.delete(number as usize) {
            Ok(task) => task,
            Err(e) => {
                drop(data);
                bail!("{}", e);
            }
        };
        let count = data.count();
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Delete task {}", number)) {
            bail!("Failed to save: {}", e);
        }

        Ok(format!(
            "Deleted: {}\nYou now have {} task(s) in the list",
            removed, count
        ))
    }

    /// Find tasks whose name contains a keyword (case-sensitive substring).
    #[tool]
    pub async fn find(
        &self,
        /// Keyword to search for in task names (must not be blank)
        keyword: String,
    ) -> McpResult<String> {
        let data = self.data.lock().unwrap();
        let result = match data.tasks_matching(&keyword) {
            Ok(matches) => formatting::format_matches(&matches),
            Err(e) => {
                drop(data);
                bail!("{}", e);
            }
        };
        drop(data);
        Ok(result)
    }

    /// Show every deadline or event falling on a date. Plain todos have no
    /// date and never appear here.
    #[tool]
    pub async fn schedule(
        &self,
        /// Date to look up: YYYY-MM-DD (e.g., "2024-05-01")
        date: String,
    ) -> McpResult<String> {
        let date = validation::parse_date(&date)?;

        let data = self.data.lock().unwrap();
        let result = formatting::format_matches(&data.tasks_on(date));
        drop(data);
        Ok(result)
    }

    /// Reorder the list in place. Task numbers change to match the new
    /// order.
    #[tool]
    pub async fn sort(
        &self,
        /// Sort key: "date" (dated tasks first), "name", or "done" (open tasks first)
        by: String,
    ) -> McpResult<String> {
        let key = validation::parse_sort_key(&by)?;

        let mut data = self.data.lock().unwrap();
        data.sort_by(|a, b| key.compare(a, b));
        let result = formatting::format_numbered(&data);
        drop(data);

        if let Err(e) = self.save_data_with_message(&format!("Sort tasks by {}", by)) {
            bail!("Failed to save: {}", e);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn get_test_handler() -> (TodoServerHandler, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let handler = TodoServerHandler::new(temp_file.path().to_str().unwrap(), false).unwrap();
        (handler, temp_file)
    }

    #[tokio::test]
    async fn test_add_todo_appears_in_list() {
        let (handler, _temp_file) = get_test_handler();

        let result = handler.add_todo("read book".to_string()).await.unwrap();
        assert!(result.contains("[T][ ] read book"));
        assert!(result.contains("1 task(s)"));

        let listing = handler.list().await.unwrap();
        assert!(listing.contains("1. [T][ ] read book"));
    }

    #[tokio::test]
    async fn test_add_todo_blank_name_is_an_error() {
        let (handler, _temp_file) = get_test_handler();

        let result = handler.add_todo("   ".to_string()).await;
        assert!(result.is_err());

        let listing = handler.list().await.unwrap();
        assert_eq!(listing, "No tasks in the list");
    }

    #[tokio::test]
    async fn test_add_deadline_renders_date_label() {
        let (handler, _temp_file) = get_test_handler();

        let result = handler
            .add_deadline("submit report".to_string(), "2024-05-01".to_string())
            .await
            .unwrap();
        assert!(result.contains("[D][ ] submit report (by: May 1 2024)"));
    }

    #[tokio::test]
    async fn test_add_deadline_rejects_malformed_date() {
        let (handler, _temp_file) = get_test_handler();

        let result = handler
            .add_deadline("submit report".to_string(), "01/05/2024".to_string())
            .await;
        assert!(result.is_err());

        let data = handler.data.lock().unwrap();
        assert_eq!(data.count(), 0);
    }

    #[tokio::test]
    async fn test_add_event() {
        let (handler, _temp_file) = get_test_handler();

        let result = handler
            .add_event("team meeting".to_string(), "2024-05-01".to_string())
            .await
            .unwrap();
        assert!(result.contains("[E][ ] team meeting (on: May 1 2024)"));
    }

    #[tokio::test]
    async fn test_complete_marks_task_done() {
        let (handler, _temp_file) = get_test_handler();

        handler.add_todo("read book".to_string()).await.unwrap();
        let result = handler.complete(1).await.unwrap();
        assert!(result.contains("[T][X] read book"));

        let data = handler.data.lock().unwrap();
        assert!(data.tasks()[0].is_done());
        assert_eq!(data.count(), 1);
    }

    #[tokio::test]
    async fn test_complete_out_of_range() {
        let (handler, _temp_file) = get_test_handler();

        handler.add_todo("read book".to_string()).await.unwrap();

        assert!(handler.complete(0).await.is_err());
        assert!(handler.complete(2).await.is_err());

        let data = handler.data.lock().unwrap();
        assert!(!data.tasks()[0].is_done());
    }

    #[tokio::test]
    async fn test_delete_renumbers_later_tasks() {
        let (handler, _temp_file) = get_test_handler();

        handler.add_todo("first".to_string()).await.unwrap();
        handler.add_todo("second".to_string()).await.unwrap();
        handler.add_todo("third".to_string()).await.unwrap();

        let result = handler.delete(2).await.unwrap();
        assert!(result.contains("Deleted: [T][ ] second"));
        assert!(result.contains("2 task(s)"));

        let listing = handler.list().await.unwrap();
        assert!(listing.contains("1. [T][ ] first"));
        assert!(listing.contains("2. [T][ ] third"));
    }

    #[tokio::test]
    async fn test_delete_out_of_range() {
        let (handler, _temp_file) = get_test_handler();

        let result = handler.delete(1).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_find_is_case_sensitive() {
        let (handler, _temp_file) = get_test_handler();

        handler.add_todo("read Book".to_string()).await.unwrap();
        handler.add_todo("book flight".to_string()).await.unwrap();

        let result = handler.find("book".to_string()).await.unwrap();
        assert!(result.contains("Found 1 task(s)"));
        assert!(result.contains("book flight"));
        assert!(!result.contains("read Book"));
    }

    #[tokio::test]
    async fn test_find_blank_keyword_is_an_error() {
        let (handler, _temp_file) = get_test_handler();

        handler.add_todo("read book".to_string()).await.unwrap();
        assert!(handler.find("  ".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_schedule_excludes_plain_todos() {
        let (handler, _temp_file) = get_test_handler();

        handler.add_todo("read book".to_string()).await.unwrap();
        handler
            .add_deadline("submit report".to_string(), "2024-05-01".to_string())
            .await
            .unwrap();
        handler
            .add_event("team meeting".to_string(), "2024-05-01".to_string())
            .await
            .unwrap();
        handler
            .add_deadline("pay rent".to_string(), "2024-06-01".to_string())
            .await
            .unwrap();

        let result = handler.schedule("2024-05-01".to_string()).await.unwrap();
        assert!(result.contains("Found 2 task(s)"));
        assert!(result.contains("submit report"));
        assert!(result.contains("team meeting"));
        assert!(!result.contains("read book"));
        assert!(!result.contains("pay rent"));
    }

    #[tokio::test]
    async fn test_schedule_with_no_matches() {
        let (handler, _temp_file) = get_test_handler();

        handler.add_todo("read book".to_string()).await.unwrap();
        let result = handler.schedule("2024-05-01".to_string()).await.unwrap();
        assert_eq!(result, "No matching tasks found");
    }

    #[tokio::test]
    async fn test_sort_by_date_reorders_in_place() {
        let (handler, _temp_file) = get_test_handler();

        handler
            .add_deadline("later".to_string(), "2024-06-01".to_string())
            .await
            .unwrap();
        handler.add_todo("undated".to_string()).await.unwrap();
        handler
            .add_event("sooner".to_string(), "2024-05-01".to_string())
            .await
            .unwrap();

        let result = handler.sort("date".to_string()).await.unwrap();
        let sooner = result.find("sooner").unwrap();
        let later = result.find("later").unwrap();
        let undated = result.find("undated").unwrap();
        assert!(sooner < later && later < undated);
    }

    #[tokio::test]
    async fn test_sort_rejects_unknown_key() {
        let (handler, _temp_file) = get_test_handler();
        assert!(handler.sort("priority".to_string()).await.is_err());
    }

    #[tokio::test]
    async fn test_state_survives_a_restart() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap().to_string();

        {
            let handler = TodoServerHandler::new(&path, false).unwrap();
            handler.add_todo("read book".to_string()).await.unwrap();
            handler
                .add_deadline("submit report".to_string(), "2024-05-01".to_string())
                .await
                .unwrap();
            handler.complete(1).await.unwrap();
        }

        let handler = TodoServerHandler::new(&path, false).unwrap();
        let listing = handler.list().await.unwrap();
        assert!(listing.contains("1. [T][X] read book"));
        assert!(listing.contains("2. [D][ ] submit report (by: May 1 2024)"));
    }
}
