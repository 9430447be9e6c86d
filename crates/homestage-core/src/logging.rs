//! Structured logging field name constants for homestage.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, counted and continued |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values |
//! | TRACE | Per-item iteration |

/// Subsystem originating the log event.
/// Values: "ingest", "search", "db", "media"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "runner", "normalizer", "pool", "pipeline"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "run", "search", "process", "delete"
pub const OPERATION: &str = "op";

/// Property id being operated on.
pub const PROPERTY_ID: &str = "property_id";

/// Search query text.
pub const QUERY: &str = "query";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";

/// Records published by an ingestion run.
pub const PUBLISHED: &str = "published";

/// Records skipped by an ingestion run.
pub const SKIPPED: &str = "skipped";

/// Pipeline stage name.
pub const STAGE: &str = "stage";

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
