//! Extraction and reinsertion of translatable content for structured CMS
//! entry graphs.
//!
//! The crate walks a content graph (flat fields, repeating components,
//! nested rich-text documents), packages every piece of translatable text
//! into addressable segments for an external translation step, and later
//! splices translated text back into the exact structural position it came
//! from, preserving markup, embedded references and container structure.
//!
//! Fetching entries from a content platform and writing results back are
//! deliberately out of scope: the core consumes already-resolved data and
//! exposes three operations to whatever orchestrates the I/O:
//!
//! - [`list_translatable_resources`] - walk root entries, filter and
//!   deduplicate, produce one resource record per translatable entry
//! - [`extract_segments`] - produce an entry's `{ segments: [...] }`
//!   payload, or `None` when there is nothing to translate
//! - [`reinsert_translations`] - splice translated segments into a copy of
//!   the entry's fields and report whether a write-back is needed

pub mod document;
pub mod ingest;
pub mod l10n;
pub mod model;

pub use document::{DocumentNode, Mark, NodeKind};
pub use l10n::{
    DocumentParser, DocumentRenderer, HtmlParser, HtmlRenderer, L10nContext, L10nError,
    L10nResult, ReinsertOutcome, WalkOutcome, extract_segments, list_translatable_resources,
    needs_write_back, normalize_locale, reinsert_translations, segment_document, validate_locale,
};
pub use model::{
    ArrayItem, Component, Entry, FieldMap, FieldValue, Fragment, LocalizedField, RESOURCE_FORMAT,
    ResourceRecord, Segment, SegmentFormat, SegmentPayload, TranslationUnit,
};
