//! Change detection against a common ancestor.

use pom_catalog::{Catalog, Entry};
use tracing::debug;

use crate::algebra::{conflict_union, filter, reject, reshape};

/// Entries of `input` that differ from `base`.
///
/// A key is changed when `input` and `base` carry different translations
/// for it, or when `input` adds it. The values come from `input`, and
/// obsolete entries are left out. Keys deleted by `input` are not changes.
///
/// A key that `input` itself carries with several translations is reported
/// as a conflict between them, labelled with `input`'s label.
pub fn compute_changes(input: &Catalog, base: &Catalog) -> Catalog {
    let union = conflict_union(&[input, base]);
    let base_keys = base.key_set();
    let changed = filter(&union, |e| e.is_conflict() || !base_keys.contains(&e.key));
    let own = conflict_union(&[input]);
    let changes = reject(&reshape(&own, &changed), Entry::is_obsolete);

    debug!(
        input = input.label(),
        changed = changes.len(),
        "computed changes"
    );
    changes
}

/// Entries carried identically by every input that still has them.
///
/// Restricted to keys `base` knows and at least one of `local`/`other`
/// still carries, so additions and double deletions are not reported.
pub fn compute_unchanged(base: &Catalog, local: &Catalog, other: &Catalog) -> Catalog {
    let union = conflict_union(&[base, local, other]);
    let base_keys = base.key_set();
    let local_keys = local.key_set();
    let other_keys = other.key_set();

    let unchanged = filter(&union, |e| {
        !e.is_conflict()
            && base_keys.contains(&e.key)
            && (local_keys.contains(&e.key) || other_keys.contains(&e.key))
    });

    debug!(unchanged = unchanged.len(), "computed unchanged entries");
    unchanged
}
