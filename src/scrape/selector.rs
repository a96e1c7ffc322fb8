//! CSS selector parsing.

use std::sync::LazyLock;

use scraper::Selector;

use crate::error_handling::ValidationError;

pub(crate) static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("title", "page title"));

/// Parses a caller-supplied CSS selector.
///
/// # Errors
///
/// Returns a [`ValidationError`] on field `selector` if the selector does not parse.
pub fn parse_selector(selector_str: &str) -> Result<Selector, ValidationError> {
    Selector::parse(selector_str).map_err(|e| {
        log::debug!("Rejected CSS selector '{}': {}", selector_str, e);
        ValidationError::new("selector", format!("invalid CSS selector '{selector_str}': {e}"))
    })
}

/// Parses a CSS selector that must succeed (for static selectors).
///
/// # Panics
///
/// Panics if the selector cannot be parsed (indicates a programming error).
pub(crate) fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}
