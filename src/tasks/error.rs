use thiserror::Error;

/// Errors produced by task construction and task list operations.
///
/// Every failure is reported at the call site and leaves the list untouched:
/// an operation either fully applies or fully rejects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Blank name or keyword, or a storage record whose fields contradict
    /// its declared kind.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A 1-based position outside `[1, count]` passed to complete or delete.
    #[error("task number {index} is out of range (the list has {count} task(s))")]
    IndexOutOfRange { index: usize, count: usize },
}
