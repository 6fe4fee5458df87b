use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

/// How a completed merge ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOutcome {
    /// No conflict markers in the output.
    Succeeded,
    /// The output was written but still carries conflict markers.
    Failed,
}

impl MergeOutcome {
    /// Process exit status for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            MergeOutcome::Succeeded => 0,
            MergeOutcome::Failed => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == MergeOutcome::Succeeded
    }
}

/// Summary of a completed merge.
#[derive(Clone, Debug, Serialize)]
pub struct MergeReport {
    pub outcome: MergeOutcome,
    /// Where the merged catalog was written.
    pub output: PathBuf,
    /// Keys identical on every side that still has them.
    pub unchanged: usize,
    /// Keys changed differently on both sides.
    pub conflicts: usize,
    /// Keys changed by local only (or identically by both).
    pub local_only: usize,
    /// Keys changed by other only.
    pub other_only: usize,
    /// Base keys that neither local nor other still has.
    pub pruned: usize,
    /// Display form of every conflicting key.
    pub conflicting_keys: Vec<String>,
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}
