use chrono::NaiveDate;
use std::cmp::Ordering;
use std::str::FromStr;

use super::error::TaskError;
use super::task::Task;

/// The ordered list of tasks the user has.
///
/// Vec is used as the backing store:
/// 1. Insertion order defines the 1-based task numbers users see
/// 2. Iteration order is predictable for display and queries
/// 3. Serialized output is stable, which keeps file diffs readable
#[derive(Debug)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl Default for TaskList {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskList {
    /// Create an empty task list
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Create a task list from an already-decoded snapshot.
    ///
    /// This is the persistence layer's entry point: decoding and validating
    /// individual tasks is its job, ordering and numbering are ours.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Read-only view of the tasks in list order.
    ///
    /// All mutation goes through the list's own methods.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks in the list
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Reorder the list in place with a caller-supplied ordering rule.
    ///
    /// The sort is stable: tasks that compare equal keep their relative
    /// insertion order.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Task, &Task) -> Ordering,
    {
        self.tasks.sort_by(compare);
    }

    /// Mark the task at a 1-based position as done and return it.
    pub fn complete(&mut self, index: usize) -> Result<&Task, TaskError> {
        let slot = self.slot(index)?;
        self.tasks[slot].mark_done();
        Ok(&self.tasks[slot])
    }

    /// Remove the task at a 1-based position and return it.
    ///
    /// Every later task shifts down by one position.
    pub fn delete(&mut self, index: usize) -> Result<Task, TaskError> {
        let slot = self.slot(index)?;
        Ok(self.tasks.remove(slot))
    }

    /// Append a new plain task and return it.
    pub fn add_todo(&mut self, name: &str) -> Result<&Task, TaskError> {
        let task = Task::todo(name)?;
        Ok(self.push(task))
    }

    /// Append a new deadline task due on `due` and return it.
    pub fn add_deadline(&mut self, name: &str, due: NaiveDate) -> Result<&Task, TaskError> {
        let task = Task::deadline(name, due)?;
        Ok(self.push(task))
    }

    /// Append a new event task occurring on `on` and return it.
    pub fn add_event(&mut self, name: &str, on: NaiveDate) -> Result<&Task, TaskError> {
        let task = Task::event(name, on)?;
        Ok(self.push(task))
    }

    /// Every dated task whose date equals `date` exactly, in list order.
    ///
    /// Plain todos never match: they have no date to compare.
    pub fn tasks_on(&self, date: NaiveDate) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.date() == Some(date))
            .collect()
    }

    /// Every task whose name contains `keyword` as a case-sensitive
    /// substring, in list order.
    pub fn tasks_matching(&self, keyword: &str) -> Result<Vec<&Task>, TaskError> {
        if keyword.trim().is_empty() {
            return Err(TaskError::InvalidArgument(
                "search keyword must not be blank".to_string(),
            ));
        }
        Ok(self
            .tasks
            .iter()
            .filter(|task| task.name().contains(keyword))
            .collect())
    }

    fn push(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    /// Map a 1-based task number onto a Vec slot, rejecting anything
    /// outside `[1, count]`.
    fn slot(&self, index: usize) -> Result<usize, TaskError> {
        if index == 0 || index > self.tasks.len() {
            return Err(TaskError::IndexOutOfRange {
                index,
                count: self.tasks.len(),
            });
        }
        Ok(index - 1)
    }
}

/// Named orderings for [`TaskList::sort_by`], parsed from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// By date, dated tasks before undated ones
    Date,
    /// By name, lexicographic
    Name,
    /// By completion state, incomplete tasks first
    Done,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "name" => Ok(SortKey::Name),
            "done" => Ok(SortKey::Done),
            _ => Err(format!(
                "Invalid sort key '{}'. Valid options are: date, name, done",
                s
            )),
        }
    }
}

impl SortKey {
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::Date => match (a.date(), b.date()) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Name => a.name().cmp(b.name()),
            SortKey::Done => a.is_done().cmp(&b.is_done()),
        }
    }
}
