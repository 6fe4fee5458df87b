//! The [`Catalog`] value.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::entry::{Entry, EntryKey};
use crate::header::Header;

/// An immutable, labelled sequence of entries with exactly one header.
///
/// Entry order is first-seen order. Duplicate keys are tolerated so that a
/// hand-edited input can still be loaded; the algebra collapses or surfaces
/// them. Every transformation produces a new `Catalog`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    label: String,
    header: Header,
    entries: Vec<Entry>,
}

impl Catalog {
    /// An empty catalog with an empty header.
    pub fn new(label: impl Into<String>) -> Self {
        Self::from_parts(label, Header::empty(), Vec::new())
    }

    /// Assemble a catalog from its parts.
    pub fn from_parts(label: impl Into<String>, header: Header, entries: Vec<Entry>) -> Self {
        Self {
            label: label.into(),
            header,
            entries,
        }
    }

    /// Convenience constructor with an empty header.
    pub fn from_entries(label: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self::from_parts(label, Header::empty(), entries)
    }

    /// The source label conflict alternatives are tagged with.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with the given key.
    pub fn get(&self, key: &EntryKey) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.key == key)
    }

    pub fn contains_key(&self, key: &EntryKey) -> bool {
        self.get(key).is_some()
    }

    /// Keys in entry order (duplicates included).
    pub fn keys(&self) -> impl Iterator<Item = &EntryKey> {
        self.entries.iter().map(|e| &e.key)
    }

    /// The distinct keys of the catalog.
    pub fn key_set(&self) -> HashSet<&EntryKey> {
        self.keys().collect()
    }

    /// Whether any entry is an unresolved conflict.
    pub fn has_conflicts(&self) -> bool {
        self.entries.iter().any(Entry::is_conflict)
    }

    /// Whether two entries share a key.
    pub fn has_duplicate_keys(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.entries.len());
        self.keys().any(|key| !seen.insert(key))
    }

    /// The same catalog under a different label.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..self
        }
    }

    /// The same catalog with a different header.
    pub fn with_header(self, header: Header) -> Self {
        Self { header, ..self }
    }

    /// Decompose into `(label, header, entries)`.
    pub fn into_parts(self) -> (String, Header, Vec<Entry>) {
        (self.label, self.header, self.entries)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
