//! Rate limit snapshot attached to rate-limit failures.
//!
//! When GitHub rejects a request for exceeding the quota, the gateway asks
//! the `/rate_limit` endpoint for the current window so the error can tell
//! the user when retrying makes sense. No backoff is performed.

use chrono::{DateTime, Utc};

/// Rate limit window reported by the GitHub API.
///
/// # Example
///
/// ```
/// use prtool::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 0, 1_700_000_000);
/// assert!(info.is_exhausted());
/// assert_eq!(
///     info.reset_time().map(|time| time.to_rfc3339()).as_deref(),
///     Some("2023-11-14T22:13:20+00:00")
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit snapshot.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix timestamp when the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true if no requests remain in the window.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Reset instant as a UTC timestamp, if representable.
    #[must_use]
    pub fn reset_time(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.reset_at).ok()?;
        DateTime::from_timestamp(seconds, 0)
    }

    /// Seconds from `now` until the window resets; zero once it has passed.
    #[must_use]
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> u64 {
        let now_seconds = u64::try_from(now.timestamp()).unwrap_or(0);
        self.reset_at.saturating_sub(now_seconds)
    }
}
