//! Seoul-timezone date keys and ISO timestamps
//!
//! "Today" is always resolved under a fixed +09:00 offset so the record key
//! does not shift with device locale. Store operations take the date key as
//! a parameter; only the edges (CLI, API) consult the clock.

use chrono::{DateTime, FixedOffset, Utc};

/// Seconds east of UTC for Asia/Seoul (no DST)
const SEOUL_OFFSET_SECS: i32 = 9 * 3600;

/// Today's Seoul date key, YYYY-MM-DD
pub fn today_seoul_key() -> String {
    seoul_date_key(Utc::now())
}

/// Seoul date key for an arbitrary instant
pub fn seoul_date_key(instant: DateTime<Utc>) -> String {
    let offset = FixedOffset::east_opt(SEOUL_OFFSET_SECS).unwrap();
    instant.with_timezone(&offset).format("%Y-%m-%d").to_string()
}

/// Current ISO-8601 timestamp for created_at/updated_at fields
pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_seoul_key_shifts_across_midnight() {
        // 16:00 UTC = 01:00 next day in Seoul
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 16, 0, 0).unwrap();
        assert_eq!(seoul_date_key(instant), "2025-03-02");

        // 14:00 UTC = 23:00 same day in Seoul
        let instant = Utc.with_ymd_and_hms(2025, 3, 1, 14, 0, 0).unwrap();
        assert_eq!(seoul_date_key(instant), "2025-03-01");
    }

    #[test]
    fn test_key_shape() {
        let key = today_seoul_key();
        assert_eq!(key.len(), 10);
        assert_eq!(key.as_bytes()[4], b'-');
        assert_eq!(key.as_bytes()[7], b'-');
    }
}
