//! The search engine: precedence, dedup, and result capping.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use homestage_core::defaults::{SEARCH_FETCH_LIMIT, SEARCH_RESULT_CAP};
use homestage_core::{PropertySummary, Result, SearchStore};

use crate::classify::{classify, QueryKind};

/// One search invocation's answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// At most [`SEARCH_RESULT_CAP`] summaries.
    pub results: Vec<PropertySummary>,
    /// True when more matches exist beyond the cap.
    pub has_more: bool,
}

/// Trim a candidate list to the display cap, flagging overflow.
///
/// An exact-id hit, when present and not already among the candidates,
/// ranks first; it is deduplicated by identifier, never duplicated.
fn merge_and_cap(
    exact_id_hit: Option<PropertySummary>,
    mut candidates: Vec<PropertySummary>,
    cap: usize,
) -> (Vec<PropertySummary>, bool) {
    if let Some(hit) = exact_id_hit {
        if !candidates.iter().any(|c| c.id == hit.id) {
            candidates.insert(0, hit);
        }
    }
    let has_more = candidates.len() > cap;
    candidates.truncate(cap);
    (candidates, has_more)
}

/// Answers operator queries against the property store.
///
/// Read-only and idempotent: identical query + mode against an unchanged
/// store yields identical output. At most two store reads per invocation.
pub struct SearchEngine {
    store: Arc<dyn SearchStore>,
}

impl SearchEngine {
    /// Create an engine reading from the given store.
    pub fn new(store: Arc<dyn SearchStore>) -> Self {
        Self { store }
    }

    /// Run one search.
    ///
    /// `id_only` restricts the query to an exact identifier lookup;
    /// non-numeric input then yields an empty response without touching
    /// the store.
    pub async fn search(&self, query: &str, id_only: bool) -> Result<SearchResponse> {
        let start = Instant::now();
        let kind = classify(query);
        debug!(
            subsystem = "search",
            component = "engine",
            op = "classify",
            query = query,
            id_only = id_only,
            kind = ?kind,
            "Classified query"
        );

        let response = if id_only {
            match kind {
                QueryKind::Numeric { id, .. } => {
                    let results = self.store.find_summary_by_id(id).await?.into_iter().collect();
                    SearchResponse {
                        results,
                        has_more: false,
                    }
                }
                _ => SearchResponse::default(),
            }
        } else {
            match kind {
                QueryKind::Empty => SearchResponse::default(),
                QueryKind::Numeric { id, literal } => {
                    // Exact-id lookup plus an independent fuzzy match on the
                    // literal digits as typed; the id hit always ranks first.
                    let fuzzy = self.store.search_fuzzy(&literal, SEARCH_FETCH_LIMIT).await?;
                    let exact = self.store.find_summary_by_id(id).await?;
                    let (results, has_more) =
                        merge_and_cap(exact, fuzzy, SEARCH_RESULT_CAP as usize);
                    SearchResponse { results, has_more }
                }
                QueryKind::Quoted(term) => {
                    let hits = self.store.search_exact(&term, SEARCH_FETCH_LIMIT).await?;
                    let (results, has_more) =
                        merge_and_cap(None, hits, SEARCH_RESULT_CAP as usize);
                    SearchResponse { results, has_more }
                }
                QueryKind::Fuzzy(term) => {
                    let hits = self.store.search_fuzzy(&term, SEARCH_FETCH_LIMIT).await?;
                    let (results, has_more) =
                        merge_and_cap(None, hits, SEARCH_RESULT_CAP as usize);
                    SearchResponse { results, has_more }
                }
            }
        };

        info!(
            subsystem = "search",
            component = "engine",
            op = "search",
            result_count = response.results.len(),
            has_more = response.has_more,
            duration_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn summary(id: i64) -> PropertySummary {
        let now = Utc::now();
        PropertySummary {
            id,
            street: Some(format!("{} Main St", id)),
            city: Some("Austin".to_string()),
            state: Some("TX".to_string()),
            agent_name: None,
            agent_phone: None,
            contacted: false,
            created_at_utc: now - Duration::days(id),
            updated_at_utc: now - Duration::days(id),
        }
    }

    #[test]
    fn test_merge_prepends_exact_hit() {
        let (merged, more) = merge_and_cap(Some(summary(7)), vec![summary(1), summary(2)], 30);
        assert_eq!(merged.iter().map(|s| s.id).collect::<Vec<_>>(), vec![7, 1, 2]);
        assert!(!more);
    }

    #[test]
    fn test_merge_never_duplicates_exact_hit() {
        let (merged, _) = merge_and_cap(Some(summary(2)), vec![summary(1), summary(2)], 30);
        assert_eq!(merged.iter().filter(|s| s.id == 2).count(), 1);
        // Dedup keeps the fuzzy ordering, it does not promote the hit.
        assert_eq!(merged[0].id, 1);
    }

    #[test]
    fn test_cap_truncates_and_flags_overflow() {
        let candidates: Vec<_> = (1..=31).map(summary).collect();
        let (merged, more) = merge_and_cap(None, candidates, 30);
        assert_eq!(merged.len(), 30);
        assert!(more);
    }

    #[test]
    fn test_exact_cap_is_not_overflow() {
        let candidates: Vec<_> = (1..=30).map(summary).collect();
        let (merged, more) = merge_and_cap(None, candidates, 30);
        assert_eq!(merged.len(), 30);
        assert!(!more);
    }

    #[test]
    fn test_prepend_past_cap_flags_overflow() {
        let candidates: Vec<_> = (1..=30).map(summary).collect();
        let (merged, more) = merge_and_cap(Some(summary(99)), candidates, 30);
        assert_eq!(merged.len(), 30);
        assert_eq!(merged[0].id, 99);
        assert!(more);
    }
}
