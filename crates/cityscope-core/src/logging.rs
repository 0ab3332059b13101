//! Structured logging field name constants for cityscope.
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
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, refreshes, operation completions |
//! | DEBUG | Decision points (cache hit/stale), config choices |
//! | TRACE | Per-item iteration (normalized records) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "api", "cache", "db", "upstream"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "resolver", "freshness", "pool", "geocode"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "resolve", "get", "replace", "fetch"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Location id being operated on.
pub const LOCATION_ID: &str = "location_id";

/// Data category ("weather", "events", "movies").
pub const CATEGORY: &str = "category";

/// Free-text search query being resolved.
pub const SEARCH_QUERY: &str = "search_query";

// ─── Cache fields ──────────────────────────────────────────────────────────

/// Freshness decision for a category lookup.
/// Values: "hit", "refreshed", "populated"
pub const CACHE_OUTCOME: &str = "cache_outcome";

/// Age of the stored generation in milliseconds.
pub const AGE_MS: &str = "age_ms";

/// TTL applied to the category, milliseconds.
pub const TTL_MS: &str = "ttl_ms";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned or persisted.
pub const RESULT_COUNT: &str = "result_count";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
