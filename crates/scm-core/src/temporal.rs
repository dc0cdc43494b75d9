//! # Temporal Types: Ledger Time and Certificate Expiry
//!
//! Ledger time is integer seconds since the Unix epoch. The registry never
//! reads the system clock directly; it asks an injected [`Clock`], so tests
//! can pin "now" to a known instant.
//!
//! ## Expiry
//!
//! A certificate created at `T` with a duration of `d` days expires at
//! `T + d * 86400`. [`expires_at()`] computes this with checked arithmetic:
//! overflow is reported, never wrapped.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::error::ExpiryError;

/// Seconds since the Unix epoch, as recorded on the ledger.
pub type UnixTimestamp = i64;

/// Number of seconds in one certificate day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Compute the expiry of a certificate.
///
/// # Errors
///
/// - [`ExpiryError::InvalidDuration`] if `duration_in_days <= 0`.
/// - [`ExpiryError::DurationOverflow`] if the result does not fit in an `i64`.
pub fn expires_at(
    created_at: UnixTimestamp,
    duration_in_days: i64,
) -> Result<UnixTimestamp, ExpiryError> {
    if duration_in_days <= 0 {
        return Err(ExpiryError::InvalidDuration(duration_in_days));
    }
    duration_in_days
        .checked_mul(SECONDS_PER_DAY)
        .and_then(|secs| created_at.checked_add(secs))
        .ok_or(ExpiryError::DurationOverflow {
            created_at,
            duration_in_days,
        })
}

/// Render a Unix timestamp as ISO8601 with Z suffix, if it is representable.
pub fn to_iso8601(ts: UnixTimestamp) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Source of the current ledger time.
pub trait Clock: Send + Sync {
    /// Current time in Unix seconds.
    fn now(&self) -> UnixTimestamp;
}

/// Wall-clock time from the host, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> UnixTimestamp {
        Utc::now().timestamp()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicI64);

impl FixedClock {
    /// Create a clock pinned at `now`.
    pub fn new(now: UnixTimestamp) -> Self {
        Self(AtomicI64::new(now))
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: UnixTimestamp) {
        self.0.store(now, Ordering::SeqCst);
    }

    /// Advance the clock by `secs` seconds.
    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> UnixTimestamp {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_five_days() {
        assert_eq!(expires_at(1_700_000_000, 5), Ok(1_700_000_000 + 432_000));
    }

    #[test]
    fn test_zero_and_negative_durations_rejected() {
        assert_eq!(expires_at(0, 0), Err(ExpiryError::InvalidDuration(0)));
        assert_eq!(expires_at(0, -3), Err(ExpiryError::InvalidDuration(-3)));
    }

    #[test]
    fn test_multiply_overflow() {
        assert!(matches!(
            expires_at(0, i64::MAX),
            Err(ExpiryError::DurationOverflow { .. })
        ));
    }

    #[test]
    fn test_add_overflow() {
        assert_eq!(
            expires_at(i64::MAX - 10, 1),
            Err(ExpiryError::DurationOverflow {
                created_at: i64::MAX - 10,
                duration_in_days: 1,
            })
        );
    }

    #[test]
    fn test_iso8601_rendering() {
        assert_eq!(to_iso8601(0).as_deref(), Some("1970-01-01T00:00:00Z"));
        assert_eq!(to_iso8601(i64::MAX), None);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(100);
        assert_eq!(clock.now(), 100);
        clock.advance(SECONDS_PER_DAY);
        assert_eq!(clock.now(), 100 + SECONDS_PER_DAY);
        clock.set(5);
        assert_eq!(clock.now(), 5);
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }

    proptest! {
        /// In range, expiry is exactly created_at plus whole days.
        #[test]
        fn expiry_matches_formula(created_at in 0i64..4_102_444_800, days in 1i64..36_500) {
            let expiry = expires_at(created_at, days).unwrap();
            prop_assert_eq!(expiry - created_at, days * SECONDS_PER_DAY);
        }

        /// Expiry never wraps: it either errors or is later than creation.
        #[test]
        fn expiry_never_wraps(created_at in any::<i64>(), days in 1i64..=i64::MAX) {
            if let Ok(expiry) = expires_at(created_at, days) {
                prop_assert!(expiry > created_at);
            }
        }
    }
}
