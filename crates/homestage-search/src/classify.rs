//! Query classification for the multi-tier search precedence.

/// How a raw operator query should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryKind {
    /// Empty or whitespace-only; never touches the store.
    Empty,
    /// Purely numeric after trimming; eligible for exact-id lookup. The
    /// literal text is kept alongside the parsed id so substring matching
    /// sees exactly what the operator typed (leading zeros included).
    Numeric { id: i64, literal: String },
    /// Wrapped in a matching pair of double quotes; inner term gets
    /// full-equality matching.
    Quoted(String),
    /// Everything else; substring matching.
    Fuzzy(String),
}

/// Classify a raw query string.
///
/// Digit runs too large for an identifier fall through to fuzzy matching
/// rather than erroring.
pub fn classify(query: &str) -> QueryKind {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return QueryKind::Empty;
    }

    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(id) = trimmed.parse::<i64>() {
            return QueryKind::Numeric {
                id,
                literal: trimmed.to_string(),
            };
        }
        return QueryKind::Fuzzy(trimmed.to_string());
    }

    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        let inner = trimmed[1..trimmed.len() - 1].to_string();
        if inner.trim().is_empty() {
            return QueryKind::Empty;
        }
        return QueryKind::Quoted(inner);
    }

    QueryKind::Fuzzy(trimmed.to_string())
}
