//! Core data models for homestage.
//!
//! These types are shared across all homestage crates and represent
//! the canonical domain entities: scraped property records, their
//! image-reference collections, and the transient ingestion outcome.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// PROPERTY TYPES
// =============================================================================

/// A scraped property/listing record.
///
/// The identifier is assigned by the store on creation and never reused.
/// Every field scraped from the third-party payload is optional; only the
/// operator-maintained fields (`contacted`, `notes`) and timestamps are
/// guaranteed present.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertyRecord {
    pub id: i64,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub building_id: Option<String>,
    pub listing_status: Option<String>,
    pub price: Option<BigDecimal>,
    pub days_on_market: Option<i32>,
    pub agent_name: Option<String>,
    pub agent_business_name: Option<String>,
    pub agent_phone: Option<String>,
    pub agent_badge_type: Option<String>,
    pub agent_photo_url: Option<String>,
    pub agent_profile_url: Option<String>,
    /// Operator flag, false for every newly ingested record.
    pub contacted: bool,
    /// Operator free-text notes.
    pub notes: Option<String>,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

/// Draft of a property record produced by the ingestion normalizer.
///
/// Identifier, operator fields, and timestamps are assigned at persist time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProperty {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub building_id: Option<String>,
    pub listing_status: Option<String>,
    pub price: Option<BigDecimal>,
    pub days_on_market: Option<i32>,
    pub agent_name: Option<String>,
    pub agent_business_name: Option<String>,
    pub agent_phone: Option<String>,
    pub agent_badge_type: Option<String>,
    pub agent_photo_url: Option<String>,
    pub agent_profile_url: Option<String>,
}

/// Summary projection of a property for list rendering and search results.
///
/// Never carries the full record; the detail view fetches that separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PropertySummary {
    pub id: i64,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub agent_name: Option<String>,
    pub agent_phone: Option<String>,
    pub contacted: bool,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: DateTime<Utc>,
}

// =============================================================================
// IMAGE REFERENCE TYPES
// =============================================================================

/// The three image-reference collections a property owns.
///
/// `Other` and `Unstaged` hold ready-to-use URLs scraped with the listing.
/// `Generated` holds an object-storage key resolved against the public base
/// URL at display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageVariant {
    Other,
    Unstaged,
    Generated,
}

impl ImageVariant {
    /// Database table backing this variant.
    pub fn table(&self) -> &'static str {
        match self {
            ImageVariant::Other => "property_image_other",
            ImageVariant::Unstaged => "property_image_unstaged",
            ImageVariant::Generated => "property_image_generated",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageVariant::Other => "other",
            ImageVariant::Unstaged => "unstaged",
            ImageVariant::Generated => "generated",
        }
    }
}

impl std::fmt::Display for ImageVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One image reference owned by exactly one property.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ImageReference {
    pub id: i64,
    pub property_id: i64,
    /// Full URL for scraped variants, object-storage key for generated.
    pub url: String,
    pub created_at_utc: DateTime<Utc>,
}

/// A property together with all three image-reference collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyFull {
    pub property: PropertyRecord,
    pub other_images: Vec<ImageReference>,
    pub unstaged_images: Vec<ImageReference>,
    pub generated_images: Vec<ImageReference>,
}

// =============================================================================
// INGESTION OUTCOME
// =============================================================================

/// Accounting for one ingestion run. Transient, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestOutcome {
    /// Records accepted and persisted.
    pub published: u32,
    /// Records skipped (gating rule or per-item persistence failure).
    pub skipped: u32,
    /// Set only when the whole run aborted on a structural error;
    /// counts are zero in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl IngestOutcome {
    /// Outcome for a run aborted before any item was examined.
    pub fn aborted(message: impl Into<String>) -> Self {
        Self {
            published: 0,
            skipped: 0,
            error: Some(message.into()),
        }
    }
}
