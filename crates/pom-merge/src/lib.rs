//! Three-way merge of gettext PO catalogs.
//!
//! [`merge`] reads `local`, `base` and `other`, classifies every entry as
//! unchanged, changed on one side, or conflicting, and writes the merged
//! catalog to the output location. The pipeline is a fixed
//! [`TaskGraph`](pom_dag::TaskGraph) of named stages (see [`Slot`]) run by
//! the bounded [`Scheduler`](pom_dag::Scheduler).
//!
//! ```text
//! wave 0  read(local)  read(base)  read(other)
//! wave 1  header  canon(local)  canon(base)  canon(other)
//! wave 2  local-changes  other-changes  unchanged  template
//! wave 3  conflicts
//! wave 4  local-only  other-only
//! wave 5  merged
//! wave 6  reshaped
//! wave 7  final
//! wave 8  render
//! wave 9  commit
//! ```
//!
//! # Key Types
//!
//! - [`MergeContext`] -- configuration, codec and status reporter for a run
//! - [`MergeRequest`] -- input and output paths
//! - [`MergeReport`] / [`MergeOutcome`] -- what a completed merge produced
//! - [`MergeError`] -- why a merge aborted

pub mod config;
pub mod error;
pub mod output;
pub mod plan;
pub mod planner;
pub mod report;
pub mod status;

pub use config::MergeConfig;
pub use error::{MergeError, MergeResult};
pub use output::{commit_atomically, detect_conflicts};
pub use plan::{Artifact, Side, Slot};
pub use planner::{merge, MergeContext, MergeRequest};
pub use report::{MergeOutcome, MergeReport};
pub use status::{reporter_for, Console, Recording, Silent, StatusReporter};
