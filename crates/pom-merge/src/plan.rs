//! Pipeline slot names and the values they hold.

use std::fmt;
use std::path::PathBuf;

use pom_catalog::{Catalog, Header};
use serde::Serialize;

/// One of the three merge inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Local,
    Base,
    Other,
}

impl Side {
    pub const ALL: [Side; 3] = [Side::Local, Side::Base, Side::Other];

    /// The source label catalogs read from this side carry.
    pub fn label(self) -> &'static str {
        match self {
            Side::Local => "local",
            Side::Base => "base",
            Side::Other => "other",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named pipeline stage. Each task writes exactly one slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Read(Side),
    Header,
    Canon(Side),
    LocalChanges,
    OtherChanges,
    Unchanged,
    Template,
    Conflicts,
    LocalOnly,
    OtherOnly,
    Merged,
    Reshaped,
    Final,
    Render,
    Commit,
}

impl Slot {
    /// Narration printed when the stage starts, for stages that have one.
    ///
    /// Slots sharing a message are reported once per wave.
    pub fn status_message(self) -> Option<&'static str> {
        match self {
            Slot::Read(_) => Some("reading input files ..."),
            Slot::Header => Some("extracting header ..."),
            Slot::Canon(_) => Some("canonicalizing input files ..."),
            Slot::LocalChanges | Slot::OtherChanges | Slot::Unchanged => {
                Some("computing local-changes, other-changes and unchanged ...")
            }
            Slot::Template => Some("computing template ..."),
            Slot::Conflicts => Some("computing conflicts ..."),
            Slot::LocalOnly | Slot::OtherOnly => {
                Some("computing local-only and other-only changes ...")
            }
            Slot::Merged => Some("computing initial merge without template ..."),
            Slot::Reshaped => Some("applying template to merge result ..."),
            Slot::Final => Some("fixing the header after merge ..."),
            Slot::Render => None,
            Slot::Commit => Some("saving output ..."),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Read(side) => write!(f, "read({side})"),
            Slot::Header => f.write_str("header"),
            Slot::Canon(side) => write!(f, "canon({side})"),
            Slot::LocalChanges => f.write_str("local-changes"),
            Slot::OtherChanges => f.write_str("other-changes"),
            Slot::Unchanged => f.write_str("unchanged"),
            Slot::Template => f.write_str("template"),
            Slot::Conflicts => f.write_str("conflicts"),
            Slot::LocalOnly => f.write_str("local-only"),
            Slot::OtherOnly => f.write_str("other-only"),
            Slot::Merged => f.write_str("merged"),
            Slot::Reshaped => f.write_str("reshaped"),
            Slot::Final => f.write_str("final"),
            Slot::Render => f.write_str("render"),
            Slot::Commit => f.write_str("commit"),
        }
    }
}

/// The value a slot holds once its task finished.
#[derive(Clone, Debug)]
pub enum Artifact {
    Catalog(Catalog),
    Header(Header),
    Text(String),
    Committed(PathBuf),
}

impl Artifact {
    pub fn as_catalog(&self) -> Option<&Catalog> {
        match self {
            Artifact::Catalog(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn as_header(&self) -> Option<&Header> {
        match self {
            Artifact::Header(header) => Some(header),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Artifact::Text(text) => Some(text),
            _ => None,
        }
    }
}
