//! Core traits for homestage abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// PROPERTY REPOSITORY TRAITS
// =============================================================================

/// Repository for property CRUD operations.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Insert a new property record, returning its store-assigned id.
    async fn insert(&self, draft: NewProperty) -> Result<i64>;

    /// Fetch a property with all three image-reference collections.
    async fn fetch(&self, id: i64) -> Result<PropertyFull>;

    /// List property summaries, newest update first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<PropertySummary>>;

    /// Set the operator "contacted" flag. Bumps the update timestamp.
    async fn set_contacted(&self, id: i64, contacted: bool) -> Result<()>;

    /// Replace the operator notes. Bumps the update timestamp.
    async fn update_notes(&self, id: i64, notes: &str) -> Result<()>;

    /// Delete a property and all of its image references atomically.
    async fn delete(&self, id: i64) -> Result<()>;

    /// Check whether a property exists.
    async fn exists(&self, id: i64) -> Result<bool>;
}

/// Repository for the three image-reference collections.
#[async_trait]
pub trait PropertyImageRepository: Send + Sync {
    /// Append one image reference to a property, returning its id.
    async fn insert(&self, variant: ImageVariant, property_id: i64, url: &str) -> Result<i64>;

    /// List one variant's references for a property, oldest first.
    async fn list(&self, variant: ImageVariant, property_id: i64) -> Result<Vec<ImageReference>>;
}

// =============================================================================
// INGESTION SINK
// =============================================================================

/// Write seam used by the ingestion batch runner.
///
/// Persisting an accepted item writes the property row and both scraped
/// image collections in one transaction; a failure leaves nothing behind
/// and the runner counts the item as skipped.
#[async_trait]
pub trait IngestSink: Send + Sync {
    /// Persist one accepted listing with its scraped image URLs.
    async fn persist_listing(
        &self,
        draft: NewProperty,
        other_urls: &[String],
        unstaged_urls: &[String],
    ) -> Result<i64>;
}

// =============================================================================
// SEARCH STORE
// =============================================================================

/// Read seam used by the search engine.
///
/// Both search queries compare street address, agent name, and agent phone
/// case-insensitively, union matches with OR, and order by the update
/// timestamp descending. The limit is always the display cap plus one so
/// the engine can detect truncation.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Exact identifier lookup.
    async fn find_summary_by_id(&self, id: i64) -> Result<Option<PropertySummary>>;

    /// Case-insensitive full-equality match across the three candidate fields.
    async fn search_exact(&self, term: &str, limit: i64) -> Result<Vec<PropertySummary>>;

    /// Case-insensitive substring match across the three candidate fields.
    async fn search_fuzzy(&self, term: &str, limit: i64) -> Result<Vec<PropertySummary>>;
}
