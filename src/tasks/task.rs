use chrono::NaiveDate;
use std::fmt;

use super::error::TaskError;

/// Display format for the date label in task details (e.g. "May 1 2024")
const DETAILS_DATE_FORMAT: &str = "%b %-d %Y";

/// The variant of a task
///
/// Dated variants carry their date inside the variant, so a deadline or
/// event without a date (or a todo with one) cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Plain task with no date attached
    Todo,
    /// Task due on a specific date
    Deadline(NaiveDate),
    /// Task occurring on a specific date
    Event(NaiveDate),
}

impl TaskKind {
    /// One-letter tag used in the rendered form
    pub fn tag(&self) -> char {
        match self {
            TaskKind::Todo => 'T',
            TaskKind::Deadline(_) => 'D',
            TaskKind::Event(_) => 'E',
        }
    }

    /// Lowercase variant name (e.g. for persistence layers and messages)
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Todo => "todo",
            TaskKind::Deadline(_) => "deadline",
            TaskKind::Event(_) => "event",
        }
    }

    /// The variant's date, if it has one
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            TaskKind::Todo => None,
            TaskKind::Deadline(date) | TaskKind::Event(date) => Some(*date),
        }
    }
}

/// A single trackable unit of work
///
/// A task is a non-blank name, a one-way completion flag, and a
/// [`TaskKind`] fixed at construction. Completion never reverts: once a
/// task is done it stays done, and there is no "mark incomplete".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    name: String,
    done: bool,
    kind: TaskKind,
}

impl Task {
    /// Construct a task with an explicit completion state.
    ///
    /// Fails with [`TaskError::InvalidArgument`] if `name` is blank. Used by
    /// the persistence layer to restore completed tasks; callers creating
    /// new tasks usually want [`Task::todo`], [`Task::deadline`], or
    /// [`Task::event`].
    pub fn new(name: impl Into<String>, done: bool, kind: TaskKind) -> Result<Self, TaskError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TaskError::InvalidArgument(
                "task name must not be blank".to_string(),
            ));
        }
        Ok(Self { name, done, kind })
    }

    /// Construct a new incomplete plain task
    pub fn todo(name: impl Into<String>) -> Result<Self, TaskError> {
        Self::new(name, false, TaskKind::Todo)
    }

    /// Construct a new incomplete deadline task due on `due`
    pub fn deadline(name: impl Into<String>, due: NaiveDate) -> Result<Self, TaskError> {
        Self::new(name, false, TaskKind::Deadline(due))
    }

    /// Construct a new incomplete event task occurring on `on`
    pub fn event(name: impl Into<String>, on: NaiveDate) -> Result<Self, TaskError> {
        Self::new(name, false, TaskKind::Event(on))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    /// The task's date, or `None` for a plain todo
    pub fn date(&self) -> Option<NaiveDate> {
        self.kind.date()
    }

    /// Mark the task complete. Idempotent; completion is terminal.
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Variant-specific extra text: empty for a todo, a formatted date
    /// label for the dated variants.
    pub fn details(&self) -> String {
        match &self.kind {
            TaskKind::Todo => String::new(),
            TaskKind::Deadline(due) => format!("(by: {})", due.format(DETAILS_DATE_FORMAT)),
            TaskKind::Event(on) => format!("(on: {})", on.format(DETAILS_DATE_FORMAT)),
        }
    }
}

impl fmt::Display for Task {
    /// Renders `[<tag>][<X or space>] <name>[ <details>]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.done { 'X' } else { ' ' };
        write!(f, "[{}][{}] {}", self.kind.tag(), marker, self.name)?;
        let details = self.details();
        if !details.is_empty() {
            write!(f, " {}", details)?;
        }
        Ok(())
    }
}
