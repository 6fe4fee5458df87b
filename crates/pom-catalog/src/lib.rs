//! Translation catalog model for pomerge.
//!
//! A [`Catalog`] is an immutable, ordered collection of [`Entry`] values plus
//! exactly one [`Header`]. Catalogs are read from and written to gettext PO
//! text through a [`CatalogCodec`]; the merge pipeline only ever sees the
//! in-memory model.
//!
//! # Key Types
//!
//! - [`EntryKey`] -- `(msgctxt, msgid)` identity of a translation unit
//! - [`Entry`] / [`EntryValue`] / [`Alternative`] -- a unit and its translated
//!   forms, or the labelled alternatives of an unresolved conflict
//! - [`Header`] -- the catalog metadata entry (empty msgid)
//! - [`Catalog`] -- a labelled sequence of entries
//! - [`CatalogCodec`] / [`PoCodec`] -- text <-> model conversion

pub mod catalog;
pub mod codec;
pub mod entry;
pub mod error;
pub mod header;

pub use catalog::Catalog;
pub use codec::{CatalogCodec, PoCodec};
pub use entry::{Alternative, Entry, EntryKey, EntryValue, CONFLICT_DELIMITER, FUZZY_FLAG};
pub use error::{CodecError, CodecResult};
pub use header::Header;
