//! Error types for the merge planner.

use std::path::PathBuf;

use pom_catalog::CodecError;
use pom_dag::{DagError, ScheduleError};
use pom_diff::DiffError;

/// Why a merge aborted.
///
/// An unresolved conflict is not an error; it is reported as
/// [`MergeOutcome::Failed`](crate::MergeOutcome::Failed). Every message is a
/// single line.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Bad invocation or configuration.
    #[error("{0}")]
    Argument(String),

    /// The codec or the worker pool could not do its job.
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// An input is not a well-formed catalog.
    #[error("{}: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    /// Reading an input or writing the output failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two classification sets claimed the same key.
    #[error("classification overlap: {0}")]
    Overlap(#[from] DiffError),

    /// A planner invariant did not hold.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MergeError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl From<DagError> for MergeError {
    fn from(e: DagError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<ScheduleError<MergeError>> for MergeError {
    fn from(e: ScheduleError<MergeError>) -> Self {
        match e {
            ScheduleError::Task { error, .. } => error,
            ScheduleError::Panicked { task } => {
                Self::CollaboratorUnavailable(format!("task {task} panicked"))
            }
            ScheduleError::PoolClosed => {
                Self::CollaboratorUnavailable("worker pool closed".to_string())
            }
        }
    }
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_errors_unwrap_to_the_task_error() {
        let e: MergeError = ScheduleError::Task {
            task: "read(local)".into(),
            error: MergeError::internal("boom"),
        }
        .into();
        assert_eq!(e.to_string(), "internal error: boom");
    }

    #[test]
    fn panics_map_to_collaborator_unavailable() {
        let e: MergeError = ScheduleError::<MergeError>::Panicked {
            task: "merged".into(),
        }
        .into();
        assert!(matches!(e, MergeError::CollaboratorUnavailable(_)));
        assert_eq!(e.to_string(), "collaborator unavailable: task merged panicked");
    }

    #[test]
    fn format_error_names_the_file() {
        let e = MergeError::Format {
            path: PathBuf::from("de.po"),
            source: CodecError::syntax(3, "unknown keyword \"msgfoo\""),
        };
        assert_eq!(e.to_string(), "de.po: line 3: unknown keyword \"msgfoo\"");
    }
}
