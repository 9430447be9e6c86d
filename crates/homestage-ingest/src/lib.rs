//! # homestage-ingest
//!
//! Property ingestion for homestage: maps third-party scraped JSON payloads
//! into normalized property records with validation and skip/publish
//! accounting.
//!
//! This crate provides:
//! - A pure normalizer tolerating two undiscriminated payload schema
//!   generations via ordered field-path fallback chains
//! - A batch runner with per-item failure isolation
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use homestage_ingest::IngestRunner;
//!
//! let runner = IngestRunner::new(Arc::new(db.properties));
//! let outcome = runner.run(&payload).await;
//! println!("published {} skipped {}", outcome.published, outcome.skipped);
//! ```

pub mod normalize;
pub mod runner;

// Re-export core types
pub use homestage_core::IngestOutcome;

pub use normalize::{normalize_item, ItemOutcome, NormalizedListing};
pub use runner::{IngestRunner, SEARCH_RESULTS_KEY};
