//! File persistence for the task list
//!
//! The on-disk format is TOML: a format-version field plus an array of task
//! records. Records are a storage schema of their own, decoupled from the
//! domain types, so decoding can validate the kind/date pairing before any
//! `Task` exists.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::git_ops::GitOps;
use crate::tasks::{Task, TaskKind, TaskList};

const FORMAT_VERSION: u32 = 1;

/// Loads and saves the task list, optionally committing each save to git.
pub struct Storage {
    file_path: PathBuf,
    git_ops: GitOps,
    sync_git: bool,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>, sync_git: bool) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let git_ops = GitOps::new(&file_path);
        Self {
            file_path,
            git_ops,
            sync_git,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Load the task list from disk. A missing file is an empty list.
    ///
    /// With git sync enabled, attempts a pull first so a freshly started
    /// server sees the latest pushed state; a failed pull only warns, the
    /// local file still loads.
    pub fn load(&self) -> Result<TaskList> {
        if self.sync_git
            && let Err(e) = self.git_ops.pull()
        {
            eprintln!("Warning: git pull failed: {:#}", e);
        }

        if !self.file_path.exists() {
            return Ok(TaskList::new());
        }

        let content = fs::read_to_string(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let file: TaskFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.file_path.display()))?;

        let mut tasks = Vec::with_capacity(file.tasks.len());
        for record in file.tasks {
            tasks.push(record.into_task()?);
        }
        Ok(TaskList::from_tasks(tasks))
    }

    /// Save with a generic commit message
    pub fn save(&self, list: &TaskList) -> Result<()> {
        self.save_with_message(list, "Update task list")
    }

    /// Write the whole list to disk and, with git sync enabled, commit the
    /// file with `message`.
    pub fn save_with_message(&self, list: &TaskList, message: &str) -> Result<()> {
        let file = TaskFile {
            format_version: FORMAT_VERSION,
            tasks: list.tasks().iter().map(TaskRecord::from_task).collect(),
        };
        let content = toml::to_string_pretty(&file)?;
        fs::write(&self.file_path, content)
            .with_context(|| format!("Failed to write {}", self.file_path.display()))?;

        if self.sync_git {
            self.git_ops.commit(&self.file_path, message)?;
        }
        Ok(())
    }

    /// Push pending commits on shutdown when git sync is enabled.
    pub fn shutdown(&self) -> Result<()> {
        if self.sync_git && self.git_ops.is_git_managed() {
            self.git_ops.push()?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskFile {
    #[serde(default)]
    format_version: u32,
    #[serde(default)]
    tasks: Vec<TaskRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum RecordKind {
    Todo,
    Deadline,
    Event,
}

/// One task as stored on disk.
///
/// `date` is optional at this level because TOML cannot make it conditional
/// on `kind`; `into_task` enforces the pairing.
#[derive(Debug, Serialize, Deserialize)]
struct TaskRecord {
    kind: RecordKind,
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<NaiveDate>,
}

impl TaskRecord {
    fn from_task(task: &Task) -> Self {
        let kind = match task.kind() {
            TaskKind::Todo => RecordKind::Todo,
            TaskKind::Deadline(_) => RecordKind::Deadline,
            TaskKind::Event(_) => RecordKind::Event,
        };
        Self {
            kind,
            name: task.name().to_string(),
            done: task.is_done(),
            date: task.date(),
        }
    }

    fn into_task(self) -> Result<Task> {
        let kind = match (self.kind, self.date) {
            (RecordKind::Todo, None) => TaskKind::Todo,
            (RecordKind::Todo, Some(_)) => {
                bail!("todo record '{}' must not carry a date", self.name)
            }
            (RecordKind::Deadline, Some(date)) => TaskKind::Deadline(date),
            (RecordKind::Deadline, None) => {
                bail!("deadline record '{}' is missing its date", self.name)
            }
            (RecordKind::Event, Some(date)) => TaskKind::Event(date),
            (RecordKind::Event, None) => {
                bail!("event record '{}' is missing its date", self.name)
            }
        };
        Ok(Task::new(self.name, self.done, kind)?)
    }
}
