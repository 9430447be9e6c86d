//! # homestage-search
//!
//! Multi-tier search engine for homestage property records.
//!
//! This crate provides:
//! - Query classification (empty / numeric / quoted-exact / fuzzy)
//! - ID-only mode for unambiguous identifier lookups
//! - Exact-id prepending with dedup in normal mode
//! - A 30-row display cap with an out-of-band overflow signal
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use homestage_search::SearchEngine;
//!
//! let engine = SearchEngine::new(Arc::new(db.properties));
//! let response = engine.search("\"123 Main St\"", false).await?;
//! if response.has_more {
//!     println!("more than {} matches", response.results.len());
//! }
//! ```

pub mod classify;
pub mod engine;

// Re-export core types
pub use homestage_core::{PropertySummary, SearchStore};

pub use classify::{classify, QueryKind};
pub use engine::{SearchEngine, SearchResponse};
