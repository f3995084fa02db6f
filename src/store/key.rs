//! Sortable Record-Key Codec
//!
//! Encodes (error_count, elapsed_ms, created_at) into a single string whose
//! plain lexicographic order equals the leaderboard order: error count
//! ascending, then elapsed milliseconds ascending, then creation time. Both
//! numeric fields are fixed-width and zero-padded so string comparison never
//! diverges from numeric comparison.

use chrono::{DateTime, Utc};

/// Widest encodable error count; larger values clamp to keep the field width
/// (and with it the lexicographic invariant) intact.
pub const MAX_ERROR_COUNT: u32 = 999;

/// Widest encodable elapsed time in milliseconds (~16.7 minutes; a round is
/// bounded by the 60 s timeout long before this).
pub const MAX_ELAPSED_MS: u64 = 999_999;

/// Creation timestamp layout. Field order runs from year down to
/// microseconds, so later timestamps sort after earlier ones; microseconds
/// make same-score keys unique in arrival order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M%S%.6f";

/// Encode one record key, e.g. `e003_001333ms_2026-08-07_141530.482916`.
pub fn record_key(error_count: u32, elapsed_ms: u64, created_at: DateTime<Utc>) -> String {
    let errors = error_count.min(MAX_ERROR_COUNT);
    let millis = elapsed_ms.min(MAX_ELAPSED_MS);
    format!(
        "e{errors:03}_{millis:06}ms_{}",
        created_at.format(TIMESTAMP_FORMAT)
    )
}
