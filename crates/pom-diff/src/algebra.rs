//! Catalog algebra: the set-like operations the merge is composed of.
//!
//! Entries are grouped by [`EntryKey`]. Two occurrences of a key agree when
//! they carry the same translation ([`Entry::same_translation`]); comments
//! and references never make them disagree.

use std::collections::{HashMap, HashSet};

use pom_catalog::{Alternative, Catalog, Entry, EntryKey, EntryValue, Header, FUZZY_FLAG};
use tracing::debug;

use crate::error::{DiffError, DiffResult};

/// Collapse exact duplicates (same key, same translation) to their first
/// occurrence.
///
/// Entries whose key repeats with a *different* translation are kept so a
/// later union can surface them. Idempotent.
pub fn deduplicate(catalog: &Catalog) -> Catalog {
    let mut kept: Vec<Entry> = Vec::with_capacity(catalog.len());
    let mut by_key: HashMap<&EntryKey, Vec<usize>> = HashMap::new();

    for entry in catalog {
        let slots = by_key.entry(&entry.key).or_default();
        if slots.iter().any(|&i| kept[i].same_translation(entry)) {
            continue;
        }
        slots.push(kept.len());
        kept.push(entry.clone());
    }

    if kept.len() != catalog.len() {
        debug!(
            label = catalog.label(),
            removed = catalog.len() - kept.len(),
            "dropped duplicate entries"
        );
    }
    Catalog::from_parts(catalog.label(), catalog.header().clone(), kept)
}

/// Merge catalogs key by key, turning disagreements into conflicts.
///
/// Keys appear in first-seen order across the inputs. A key whose
/// occurrences all agree maps to its first occurrence, with references
/// merged. Otherwise it maps to an entry whose value is
/// [`EntryValue::Conflict`], listing each distinct translation once under
/// the label of the first catalog that carried it.
///
/// The result takes its label and header from the first input.
pub fn conflict_union(catalogs: &[&Catalog]) -> Catalog {
    let groups = group_by_key(catalogs);
    let entries = groups
        .into_iter()
        .map(|group| match group.distinct() {
            Distinct::Agree(entry) => entry,
            Distinct::Diverge(alternatives) => group.conflict(alternatives),
        })
        .collect();
    assemble(catalogs, entries)
}

/// Concatenate catalogs whose keys are expected to be disjoint.
///
/// Repeated keys that agree are collapsed as in [`conflict_union`]. A key
/// that carries different translations in two inputs is an
/// [`DiffError::Overlap`].
pub fn concat_union(catalogs: &[&Catalog]) -> DiffResult<Catalog> {
    let groups = group_by_key(catalogs);
    let mut entries = Vec::with_capacity(groups.len());
    for group in groups {
        match group.distinct() {
            Distinct::Agree(entry) => entries.push(entry),
            Distinct::Diverge(alternatives) => {
                let first = alternatives[0].label.clone();
                let second = alternatives[1].label.clone();
                return Err(DiffError::Overlap {
                    key: group.key.clone(),
                    first,
                    second,
                });
            }
        }
    }
    Ok(assemble(catalogs, entries))
}

/// Entries matching `predicate`.
pub fn filter(catalog: &Catalog, predicate: impl Fn(&Entry) -> bool) -> Catalog {
    let entries = catalog.iter().filter(|&e| predicate(e)).cloned().collect();
    Catalog::from_parts(catalog.label(), catalog.header().clone(), entries)
}

/// Entries not matching `predicate`.
pub fn reject(catalog: &Catalog, predicate: impl Fn(&Entry) -> bool) -> Catalog {
    filter(catalog, |e| !predicate(e))
}

/// Entries of `catalog` whose key does not occur in `exclude`.
pub fn keyed_unique(catalog: &Catalog, exclude: &Catalog) -> Catalog {
    let excluded = exclude.key_set();
    filter(catalog, |e| !excluded.contains(&e.key))
}

/// Restrict and reorder `catalog` to the keys of `template`.
///
/// The translation side of each entry (plural id, forms, fuzzy flag,
/// translator comments, previous lines) comes from `catalog`; the source
/// side (extracted comments, references, other flags, obsolete marker)
/// comes from the template. Template keys missing from `catalog` stay
/// missing.
pub fn reshape(catalog: &Catalog, template: &Catalog) -> Catalog {
    let mut sources: HashMap<&EntryKey, &Entry> = HashMap::with_capacity(catalog.len());
    for entry in catalog {
        sources.entry(&entry.key).or_insert(entry);
    }

    let mut seen: HashSet<&EntryKey> = HashSet::with_capacity(template.len());
    let mut entries = Vec::with_capacity(template.len());

    for shape in template {
        if !seen.insert(&shape.key) {
            continue;
        }
        let Some(&source) = sources.get(&shape.key) else {
            continue;
        };

        let mut entry = source.clone();
        entry.extracted_comments = shape.extracted_comments.clone();
        entry.references = shape.references.clone();
        entry.flags = shape
            .flags
            .iter()
            .filter(|f| *f != FUZZY_FLAG)
            .cloned()
            .collect();
        entry.set_fuzzy(source.is_fuzzy());
        entry.obsolete = shape.obsolete;
        entries.push(entry);
    }

    debug!(
        label = catalog.label(),
        before = catalog.len(),
        after = entries.len(),
        "reshaped catalog"
    );
    Catalog::from_parts(catalog.label(), catalog.header().clone(), entries)
}

/// Substitute the header and sort entries by key, obsolete entries last.
pub fn replace_header(catalog: &Catalog, header: &Header) -> Catalog {
    let mut entries = catalog.entries().to_vec();
    entries.sort_by(|a, b| (a.obsolete, &a.key).cmp(&(b.obsolete, &b.key)));
    Catalog::from_parts(catalog.label(), header.clone(), entries)
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Every occurrence of one key, in input order.
struct KeyGroup<'a> {
    key: &'a EntryKey,
    occurrences: Vec<(&'a str, &'a Entry)>,
}

enum Distinct {
    Agree(Entry),
    Diverge(Vec<Alternative>),
}

impl KeyGroup<'_> {
    fn distinct(&self) -> Distinct {
        let mut translations: Vec<(&str, &Entry)> = Vec::new();
        for &(label, entry) in &self.occurrences {
            if !translations.iter().any(|(_, seen)| seen.same_translation(entry)) {
                translations.push((label, entry));
            }
        }

        if translations.len() == 1 {
            let mut entry = self.occurrences[0].1.clone();
            entry.references = self.merged_references();
            return Distinct::Agree(entry);
        }

        Distinct::Diverge(
            translations
                .into_iter()
                .map(|(label, entry)| Alternative {
                    label: label.to_string(),
                    forms: entry.forms(),
                })
                .collect(),
        )
    }

    fn conflict(&self, alternatives: Vec<Alternative>) -> Entry {
        let mut entry = self.occurrences[0].1.clone();
        entry.references = self.merged_references();
        entry.value = EntryValue::Conflict(alternatives);
        entry.set_fuzzy(false);
        entry
    }

    fn merged_references(&self) -> Vec<String> {
        let mut references: Vec<String> = Vec::new();
        for (_, entry) in &self.occurrences {
            for reference in &entry.references {
                if !references.contains(reference) {
                    references.push(reference.clone());
                }
            }
        }
        references
    }
}

fn group_by_key<'a>(catalogs: &[&'a Catalog]) -> Vec<KeyGroup<'a>> {
    let mut groups: Vec<KeyGroup<'a>> = Vec::new();
    let mut index: HashMap<&'a EntryKey, usize> = HashMap::new();

    for &catalog in catalogs {
        let label = catalog.label();
        for entry in catalog.iter() {
            let slot = *index.entry(&entry.key).or_insert_with(|| {
                groups.push(KeyGroup {
                    key: &entry.key,
                    occurrences: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].occurrences.push((label, entry));
        }
    }

    groups
}

fn assemble(catalogs: &[&Catalog], entries: Vec<Entry>) -> Catalog {
    match catalogs.first() {
        Some(first) => Catalog::from_parts(first.label(), first.header().clone(), entries),
        None => Catalog::from_entries("", entries),
    }
}
