//! Error types for the algebra crate.

use pom_catalog::EntryKey;

/// Errors raised by catalog algebra.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiffError {
    /// A concatenating union met the same key with two different
    /// translations.
    #[error("key {key} carries different translations in '{first}' and '{second}'")]
    Overlap {
        key: EntryKey,
        first: String,
        second: String,
    },
}

/// Convenience alias for algebra results.
pub type DiffResult<T> = Result<T, DiffError>;
