//! Cache expiration policy.

use chrono::{DateTime, Duration, Utc};

/// Number of days a cached catalog stays valid.
pub const MAX_CACHE_AGE_DAYS: i64 = 7;

/// Fixed seven-day validity horizon for a cached catalog.
pub struct CachePolicy;

impl CachePolicy {
    /// Maximum age of a valid cache entry.
    pub fn max_age() -> Duration {
        Duration::days(MAX_CACHE_AGE_DAYS)
    }

    /// Whether a catalog cached at `timestamp` is still valid at `now`.
    pub fn is_valid(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match timestamp.checked_add_signed(Self::max_age()) {
            Some(expires_at) => now < expires_at,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 12, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_fresh_timestamp_is_valid() {
        assert!(CachePolicy::is_valid(now(), now()));
        assert!(CachePolicy::is_valid(now() - Duration::days(1), now()));
    }

    #[test]
    fn test_one_second_before_expiry_is_valid() {
        let timestamp = now() - Duration::days(7) + Duration::seconds(1);
        assert!(CachePolicy::is_valid(timestamp, now()));
    }

    #[test]
    fn test_exactly_seven_days_is_expired() {
        let timestamp = now() - Duration::days(7);
        assert!(!CachePolicy::is_valid(timestamp, now()));
    }

    #[test]
    fn test_older_than_seven_days_is_expired() {
        let timestamp = now() - Duration::days(7) - Duration::seconds(1);
        assert!(!CachePolicy::is_valid(timestamp, now()));
    }

    #[test]
    fn test_future_timestamp_is_valid() {
        assert!(CachePolicy::is_valid(now() + Duration::hours(1), now()));
    }

    #[test]
    fn test_overflowing_timestamp_is_expired() {
        assert!(!CachePolicy::is_valid(DateTime::<Utc>::MAX_UTC, now()));
    }
}
