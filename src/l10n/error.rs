//! Error types for the localization core.
//!
//! Expected edge cases (an empty segment list, a missing translation, an
//! unrecognized field shape) are not errors: they are signalled via sentinel
//! results or absorbed locally with a diagnostic. Errors are reserved for
//! malformed input that cannot be ingested and for invalid caller arguments.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum L10nError {
    /// A language tag that does not parse as a locale.
    #[error("invalid locale: {0}")]
    InvalidLocale(String),

    /// An entry value missing its identity envelope.
    #[error("malformed entry: {0}")]
    MalformedEntry(String),

    /// A rich-text node missing its discriminator.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// Translated markup that cannot be parsed back into a document node.
    #[error("markup parse error: {0}")]
    MarkupParse(String),
}

/// Result type for localization operations.
pub type L10nResult<T> = Result<T, L10nError>;
