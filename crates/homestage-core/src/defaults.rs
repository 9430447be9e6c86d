//! Centralized default constants for the homestage system.
//!
//! **This module is the single source of truth** for all shared default
//! values. Crates reference these constants instead of defining their own
//! magic numbers.

// =============================================================================
// SEARCH
// =============================================================================

/// Maximum rows returned by one search invocation.
pub const SEARCH_RESULT_CAP: i64 = 30;

/// Rows fetched per search query: cap plus one to detect truncation.
pub const SEARCH_FETCH_LIMIT: i64 = SEARCH_RESULT_CAP + 1;

// =============================================================================
// IMAGE PIPELINE
// =============================================================================

/// Neither output dimension may exceed this after compression.
pub const MAX_IMAGE_DIMENSION_PX: u32 = 768;

/// JPEG quality factor for the compression stage.
pub const COMPRESS_JPEG_QUALITY: u8 = 60;

/// JPEG quality factor for the watermark re-encode.
pub const WATERMARK_JPEG_QUALITY: u8 = 95;

/// Byte budget for the compressed image.
pub const MAX_UPLOAD_BYTES: usize = 1_048_576;

/// Random bytes appended to the generated filename (hex-encoded).
pub const FILENAME_RANDOM_BYTES: usize = 6;

/// Slug used when a property has no street address.
pub const FALLBACK_SLUG: &str = "property";

/// Content type of every pipeline output.
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_limit_is_cap_plus_one() {
        assert_eq!(SEARCH_FETCH_LIMIT, SEARCH_RESULT_CAP + 1);
    }

    #[test]
    fn test_upload_budget_is_one_mebibyte() {
        assert_eq!(MAX_UPLOAD_BYTES, 1024 * 1024);
    }
}
