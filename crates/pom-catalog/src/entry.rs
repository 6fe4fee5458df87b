//! Catalog entry types.
//!
//! An [`Entry`] is one translation unit keyed by [`EntryKey`]. Its value is
//! either the translated forms or, after a conflicting union, the list of
//! labelled [`Alternative`]s that a human has to choose between.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal separating conflict alternatives in rendered catalog text.
///
/// A translation that legitimately contains this literal is indistinguishable
/// from an unresolved conflict once written out.
pub const CONFLICT_DELIMITER: &str = "#-#-#-#-#";

/// The flag gettext tools use to mark a translation as needing review.
pub const FUZZY_FLAG: &str = "fuzzy";

/// Identity of an entry within a catalog.
///
/// Keys sort by msgid, then by context with the context-less key first,
/// the order `msgcat --sort-output` writes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    /// Disambiguating `msgctxt`, if any.
    pub context: Option<String>,
    /// The source string.
    pub msgid: String,
}

impl EntryKey {
    /// Key without a context.
    pub fn new(msgid: impl Into<String>) -> Self {
        Self {
            context: None,
            msgid: msgid.into(),
        }
    }

    /// Key with a `msgctxt`.
    pub fn with_context(context: impl Into<String>, msgid: impl Into<String>) -> Self {
        Self {
            context: Some(context.into()),
            msgid: msgid.into(),
        }
    }
}

impl Ord for EntryKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.msgid
            .cmp(&other.msgid)
            .then_with(|| self.context.cmp(&other.context))
    }
}

impl PartialOrd for EntryKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{ctx:?}/{:?}", self.msgid),
            None => write!(f, "{:?}", self.msgid),
        }
    }
}

/// One side of an unresolved conflict.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    /// Label of the catalog this value came from (`local`, `other`, ...).
    pub label: String,
    /// The translated forms that catalog carried.
    pub forms: Vec<String>,
}

/// The value carried by an entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryValue {
    /// `msgstr`, or `msgstr[0..n]` for plural entries.
    Translated(Vec<String>),
    /// Distinct alternatives in first-seen order.
    Conflict(Vec<Alternative>),
}

/// A single translation unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: EntryKey,
    pub msgid_plural: Option<String>,
    pub value: EntryValue,
    /// `# ` lines.
    pub translator_comments: Vec<String>,
    /// `#.` lines.
    pub extracted_comments: Vec<String>,
    /// `#:` source locations.
    pub references: Vec<String>,
    /// `#,` flags such as `fuzzy` or `c-format`.
    pub flags: Vec<String>,
    /// `#|` previous-msgid lines, kept verbatim.
    pub previous: Vec<String>,
    /// Whether the entry is commented out with `#~`.
    pub obsolete: bool,
}

impl Entry {
    /// Create a singular entry with one translated string.
    pub fn new(msgid: impl Into<String>, msgstr: impl Into<String>) -> Self {
        Self::keyed(EntryKey::new(msgid), vec![msgstr.into()])
    }

    /// Create an entry from a key and its translated forms.
    pub fn keyed(key: EntryKey, forms: Vec<String>) -> Self {
        Self {
            key,
            msgid_plural: None,
            value: EntryValue::Translated(forms),
            translator_comments: Vec::new(),
            extracted_comments: Vec::new(),
            references: Vec::new(),
            flags: Vec::new(),
            previous: Vec::new(),
            obsolete: false,
        }
    }

    /// Create a plural entry.
    pub fn plural(
        msgid: impl Into<String>,
        msgid_plural: impl Into<String>,
        forms: Vec<String>,
    ) -> Self {
        let mut entry = Self::keyed(EntryKey::new(msgid), forms);
        entry.msgid_plural = Some(msgid_plural.into());
        entry
    }

    /// Builder: set the `msgctxt`.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.key.context = Some(context.into());
        self
    }

    /// Builder: add a flag.
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        let flag = flag.into();
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    /// Builder: add a source reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.references.push(reference.into());
        self
    }

    /// Builder: add a translator comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.translator_comments.push(comment.into());
        self
    }

    /// Builder: mark the entry obsolete.
    pub fn into_obsolete(mut self) -> Self {
        self.obsolete = true;
        self
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self.value, EntryValue::Conflict(_))
    }

    pub fn is_fuzzy(&self) -> bool {
        self.flags.iter().any(|f| f == FUZZY_FLAG)
    }

    pub fn is_obsolete(&self) -> bool {
        self.obsolete
    }

    /// Add or remove the `fuzzy` flag.
    pub fn set_fuzzy(&mut self, fuzzy: bool) {
        if fuzzy {
            if !self.is_fuzzy() {
                self.flags.push(FUZZY_FLAG.to_string());
            }
        } else {
            self.flags.retain(|f| f != FUZZY_FLAG);
        }
    }

    /// The translated forms as they appear in catalog text.
    ///
    /// Conflict alternatives are flattened into delimiter-separated strings,
    /// one per plural form.
    pub fn forms(&self) -> Vec<String> {
        match &self.value {
            EntryValue::Translated(forms) => forms.clone(),
            EntryValue::Conflict(alternatives) => render_alternatives(alternatives),
        }
    }

    /// Whether two entries carry the same translation.
    ///
    /// Compares the plural id, the rendered forms and the fuzzy flag. Keys,
    /// comments and references are not part of the comparison.
    pub fn same_translation(&self, other: &Entry) -> bool {
        self.msgid_plural == other.msgid_plural
            && self.is_fuzzy() == other.is_fuzzy()
            && match (&self.value, &other.value) {
                (EntryValue::Translated(a), EntryValue::Translated(b)) => a == b,
                _ => self.forms() == other.forms(),
            }
    }

    /// Whether this entry is an exact duplicate of another: same key and
    /// same translation.
    pub fn is_duplicate_of(&self, other: &Entry) -> bool {
        self.key == other.key && self.same_translation(other)
    }
}

/// Render alternatives the way gettext's `msgcat` does: each value is
/// preceded by a delimiter line naming its source.
fn render_alternatives(alternatives: &[Alternative]) -> Vec<String> {
    let width = alternatives
        .iter()
        .map(|alt| alt.forms.len())
        .max()
        .unwrap_or(0)
        .max(1);

    (0..width)
        .map(|index| {
            let mut rendered = String::new();
            for alt in alternatives {
                let form = alt.forms.get(index).map(String::as_str).unwrap_or("");
                rendered.push_str(CONFLICT_DELIMITER);
                rendered.push_str("  ");
                rendered.push_str(&alt.label);
                rendered.push_str("  ");
                rendered.push_str(CONFLICT_DELIMITER);
                rendered.push('\n');
                rendered.push_str(form);
                if !form.ends_with('\n') {
                    rendered.push('\n');
                }
            }
            rendered
        })
        .collect()
}
