//! The catalog header entry.

use serde::{Deserialize, Serialize};

/// Catalog-level metadata carried by the entry with an empty msgid.
///
/// The header is never compared for divergence; a merge always takes it
/// verbatim from one side.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub translator_comments: Vec<String>,
    /// `#.` lines.
    pub extracted_comments: Vec<String>,
    /// `#:` lines.
    pub references: Vec<String>,
    pub flags: Vec<String>,
    /// `#|` lines.
    pub previous: Vec<String>,
    /// Raw `Name: value\n` lines.
    pub msgstr: String,
}

impl Header {
    /// A header with no metadata at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a header from `(name, value)` pairs.
    pub fn from_fields<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let msgstr = fields
            .into_iter()
            .map(|(name, value)| format!("{name}: {value}\n"))
            .collect();
        Self {
            msgstr,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.translator_comments.is_empty()
            && self.extracted_comments.is_empty()
            && self.references.is_empty()
            && self.flags.is_empty()
            && self.previous.is_empty()
            && self.msgstr.is_empty()
    }

    /// Iterate over the `Name: value` fields in order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.msgstr.lines().filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            Some((name.trim(), value.trim()))
        })
    }

    /// Look up a field by name (case-sensitive).
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}
