//! Deterministic filename slugs from street addresses.

use homestage_core::defaults::FALLBACK_SLUG;

/// Slugify a street address for use in a generated filename.
///
/// Lower-cases the input, collapses any run of non-alphanumeric characters
/// to a single hyphen, and trims leading/trailing hyphens. An absent or
/// unusable address yields the literal `property` token.
pub fn slug_or_default(street: Option<&str>) -> String {
    let slug = street.map(slugify).unwrap_or_default();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_hyphen = false;
    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !out.is_empty() {
                out.push('-');
            }
            pending_hyphen = false;
            out.extend(c.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    out
}
