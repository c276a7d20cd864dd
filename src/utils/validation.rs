//! Input validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for validating organization slugs
static SLUG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap());

/// Regex for validating hex colors (#rgb or #rrggbb)
static COLOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// Validate an organization slug
pub fn validate_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= 60 && SLUG_REGEX.is_match(slug)
}

/// Validate a hex color value
pub fn validate_color(color: &str) -> bool {
    COLOR_REGEX.is_match(color)
}
