//! Localization core
//!
//! This module implements the bidirectional transformation between a content
//! graph and its translatable segments:
//!
//! 1. **Entry Graph Walker** - discovers and deduplicates translatable
//!    entries across nested references, arrays and embedded document nodes
//! 2. **Document Segmenter** - emits ordered segments for renderable block
//!    leaves with one running index per field
//! 3. **Field-to-Segment Extractor** - produces an entry's full segment list
//!    or the "nothing to translate" sentinel
//! 4. **Reinsertion Engine** - replays the extraction traversal over a copy
//!    and splices translated content back in
//! 5. **Change Detector** - deep structural comparison gating write-back
//!
//! Extraction and reinsertion replay the identical traversal and filtering
//! rules, so segment ids are reproducible byte-for-byte across passes. The
//! whole core is synchronous and free of I/O; renderers and parsers are
//! injected through [`context::L10nContext`].
//!
//! # Example
//!
//! ```ignore
//! use contentful_l10n::{L10nContext, extract_segments, reinsert_translations};
//!
//! let ctx = L10nContext::new().with_localized_fields("page", &["title"]);
//! let payload = extract_segments(&entry, &ctx);
//! // ... external translation produces units keyed by sid ...
//! let outcome = reinsert_translations(&entry, "fr", &units, &ctx)?;
//! if outcome.needs_write_back {
//!     // push outcome.fields back to the platform
//! }
//! ```
pub mod context;
pub mod error;
pub mod extractor;
pub mod locale;
pub mod reinsert;
pub mod render;
pub mod segmenter;
pub mod walker;

mod integration_tests;

pub use context::L10nContext;
pub use error::{L10nError, L10nResult};
pub use extractor::extract_segments;
pub use locale::{normalize_locale, validate_locale};
pub use reinsert::{ReinsertOutcome, needs_write_back, reinsert_translations};
pub use render::{DocumentParser, DocumentRenderer, HtmlParser, HtmlRenderer};
pub use segmenter::segment_document;
pub use walker::{WalkOutcome, list_translatable_resources};
