//! Error types for the task graph.

/// Errors raised while declaring tasks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DagError {
    /// A task with this name was already declared.
    #[error("duplicate task: {0}")]
    DuplicateTask(String),

    /// A dependency names a task that has not been declared yet.
    #[error("task {task} depends on unknown task {dependency}")]
    UnknownDependency {
        /// The task being declared.
        task: String,
        /// The missing dependency.
        dependency: String,
    },
}

/// Convenience alias for graph results.
pub type DagResult<T> = Result<T, DagError>;

/// Errors raised while running a graph.
///
/// `E` is the error type task bodies return.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError<E> {
    /// A task body returned an error. When several tasks of one wave fail,
    /// this is the one declared first.
    #[error("task {task} failed: {error}")]
    Task { task: String, error: E },

    /// A task body panicked.
    #[error("task {task} panicked")]
    Panicked { task: String },

    /// The worker pool shut down before every task was dispatched.
    #[error("worker pool closed")]
    PoolClosed,
}
