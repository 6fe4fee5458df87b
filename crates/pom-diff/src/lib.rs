//! Catalog algebra and change detection for pomerge.
//!
//! Every function here is pure: it takes catalogs by reference and returns
//! a new [`Catalog`](pom_catalog::Catalog).
//!
//! # Key Functions
//!
//! - [`deduplicate`], [`conflict_union`], [`concat_union`] -- combining catalogs
//! - [`filter`], [`reject`], [`keyed_unique`] -- selecting entries
//! - [`reshape`], [`replace_header`] -- final shaping of a merge result
//! - [`compute_changes`], [`compute_unchanged`] -- the diff against a base

pub mod algebra;
pub mod changes;
pub mod error;

pub use algebra::{
    concat_union, conflict_union, deduplicate, filter, keyed_unique, reject, replace_header,
    reshape,
};
pub use changes::{compute_changes, compute_unchanged};
pub use error::{DiffError, DiffResult};
