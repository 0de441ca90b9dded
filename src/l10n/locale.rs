//! Locale tag helpers.

use crate::l10n::error::{L10nError, L10nResult};
use icu_locale::Locale;

/// Normalize a locale code by stripping region/script information:
/// `en-US` → `en`, `zh-Hans` → `zh`, `fr` → `fr`.
pub fn normalize_locale(locale: &str) -> String {
    locale.split('-').next().unwrap_or(locale).to_lowercase()
}

/// Validate that a language tag is a well-formed BCP 47 locale.
pub fn validate_locale(locale: &str) -> L10nResult<()> {
    if locale.is_empty() {
        return Err(L10nError::InvalidLocale("empty locale".to_string()));
    }
    locale
        .parse::<Locale>()
        .map_err(|_| L10nError::InvalidLocale(locale.to_string()))?;
    Ok(())
}
