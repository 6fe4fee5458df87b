//! Task graph and scheduler for pomerge.
//!
//! A [`TaskGraph`] holds named tasks with declared dependencies. Because a
//! dependency must exist before a task naming it can be added, the graph is
//! acyclic by construction. The [`Scheduler`] runs the graph wave by wave on
//! a bounded pool of blocking workers.
//!
//! # Key Types
//!
//! - [`TaskGraph`] / [`Inputs`] -- task declaration and dependency access
//! - [`Scheduler`] / [`Outputs`] -- execution and collected results
//! - [`DagError`] / [`ScheduleError`] -- construction and execution failures

pub mod error;
pub mod graph;
pub mod scheduler;

pub use error::{DagError, DagResult, ScheduleError};
pub use graph::{Inputs, TaskFn, TaskGraph, TaskKey};
pub use scheduler::{Outputs, Scheduler};
