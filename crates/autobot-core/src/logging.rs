//! Structured logging field name constants for autobot.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration (individual keyword scores) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "keywords", "content", "database", "blogger", "crypto", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "orchestrator", "scoring", "pool", "oauth", "token_manager"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "recommend", "upsert", "mark_used", "refresh"
pub const OPERATION: &str = "op";

/// Authenticated user the operation runs for.
pub const USER_ID: &str = "user_id";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Keyword text being scored or persisted.
pub const KEYWORD: &str = "keyword";

/// Free-text recommendation query.
pub const QUERY: &str = "query";

/// Blogger blog identifier.
pub const BLOG_ID: &str = "blog_id";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by an operation.
pub const RESULT_COUNT: &str = "result_count";

/// Number of candidate keywords before scoring.
pub const CANDIDATE_COUNT: &str = "candidate_count";

/// Final keyword score.
pub const FINAL_SCORE: &str = "final_score";

/// HTTP status code returned by an upstream service.
pub const HTTP_STATUS: &str = "http_status";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table affected.
pub const DB_TABLE: &str = "db_table";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
