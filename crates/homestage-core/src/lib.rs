//! # homestage-core
//!
//! Core types, traits, and abstractions for the homestage lead-management
//! system.
//!
//! This crate provides:
//! - Domain models (property records, image references, ingestion outcomes)
//! - The shared `Error`/`Result` types
//! - Repository traits implemented by the database layer
//! - Process-wide default constants and logging field names

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

pub use error::{Error, Result};
pub use models::{
    ImageReference, ImageVariant, IngestOutcome, NewProperty, PropertyFull, PropertyRecord,
    PropertySummary,
};
pub use traits::{IngestSink, PropertyImageRepository, PropertyRepository, SearchStore};
