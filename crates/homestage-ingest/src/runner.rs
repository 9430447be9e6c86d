//! Ingestion batch runner: payload validation, per-item accounting, and
//! failure isolation.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{info, warn};

use homestage_core::{IngestOutcome, IngestSink};

use crate::normalize::{normalize_item, ItemOutcome};

/// Top-level payload key holding the scraped search-result items.
pub const SEARCH_RESULTS_KEY: &str = "searchResults";

/// Runs one operator-triggered ingestion batch against a write sink.
///
/// Items are processed sequentially in input order. After the structural
/// check passes, no single item can abort the run: a skip or a persistence
/// failure increments the skip counter and the batch continues.
pub struct IngestRunner {
    sink: Arc<dyn IngestSink>,
}

impl IngestRunner {
    /// Create a runner writing through the given sink.
    pub fn new(sink: Arc<dyn IngestSink>) -> Self {
        Self { sink }
    }

    /// Ingest one payload, returning publish/skip accounting.
    ///
    /// A payload without a list-typed `searchResults` field aborts the whole
    /// run with a structural error and zero counts.
    pub async fn run(&self, payload: &Value) -> IngestOutcome {
        let start = Instant::now();

        let items = match payload.get(SEARCH_RESULTS_KEY).and_then(Value::as_array) {
            Some(items) => items,
            None => {
                warn!(
                    subsystem = "ingest",
                    component = "runner",
                    op = "run",
                    "Payload has no list-typed searchResults field"
                );
                return IngestOutcome::aborted(format!(
                    "payload is missing a list-typed '{}' field",
                    SEARCH_RESULTS_KEY
                ));
            }
        };

        let mut outcome = IngestOutcome::default();
        for item in items {
            match normalize_item(item) {
                ItemOutcome::Skipped { reason } => {
                    outcome.skipped += 1;
                    warn!(
                        subsystem = "ingest",
                        component = "runner",
                        op = "skip",
                        reason = %reason,
                        "Skipped search result"
                    );
                }
                ItemOutcome::Accepted(listing) => {
                    match self
                        .sink
                        .persist_listing(
                            listing.draft,
                            &listing.other_images,
                            &listing.unstaged_images,
                        )
                        .await
                    {
                        Ok(id) => {
                            outcome.published += 1;
                            info!(
                                subsystem = "ingest",
                                component = "runner",
                                op = "publish",
                                property_id = id,
                                "Published property"
                            );
                        }
                        Err(e) => {
                            // Failure isolation is per item, never global.
                            outcome.skipped += 1;
                            warn!(
                                subsystem = "ingest",
                                component = "runner",
                                op = "persist",
                                error = %e,
                                "Persisting search result failed; counted as skip"
                            );
                        }
                    }
                }
            }
        }

        info!(
            subsystem = "ingest",
            component = "runner",
            op = "run",
            published = outcome.published,
            skipped = outcome.skipped,
            duration_ms = start.elapsed().as_millis() as u64,
            "Ingestion run complete"
        );
        outcome
    }
}
