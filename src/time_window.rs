//! Relative time window parsing.
//!
//! Expressions such as `-7d`, `-2weeks`, or `-1yr` describe how far back to
//! look for merged pull requests. [`resolve`] turns an expression into an
//! absolute [`Cutoff`] relative to an explicit `now`, so the result is
//! deterministic for a given input pair.
//!
//! Day, week, month, and year offsets use calendar arithmetic: subtracting a
//! month from March 31 lands on the last day of February rather than a fixed
//! thirty days earlier. Hour, minute, and second offsets are fixed durations.

use std::fmt;

use chrono::{DateTime, Days, Months, TimeDelta, Utc};
use thiserror::Error;

/// Default window applied when no `since` expression is configured.
pub const DEFAULT_SINCE: &str = "-7d";

/// Errors raised while parsing a relative time expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeWindowError {
    /// The expression was empty.
    #[error("time window expression cannot be empty")]
    EmptyInput,

    /// The expression did not match `-<positive integer><unit>`.
    #[error("invalid time window '{input}': {reason}")]
    InvalidFormat {
        /// The rejected expression.
        input: String,
        /// Why the expression was rejected.
        reason: String,
    },
}

/// Absolute instant below which merged pull requests are excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cutoff(DateTime<Utc>);

impl Cutoff {
    /// Wraps an absolute instant.
    #[must_use]
    pub const fn new(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }

    /// The cutoff instant.
    #[must_use]
    pub const fn instant(&self) -> DateTime<Utc> {
        self.0
    }

    /// Returns true when `timestamp` falls strictly after the cutoff.
    #[must_use]
    pub fn admits(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp > self.0
    }
}

impl fmt::Display for Cutoff {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0.to_rfc3339())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl Unit {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "s" | "sec" | "second" | "seconds" => Some(Self::Seconds),
            "min" | "minute" | "minutes" => Some(Self::Minutes),
            "h" | "hour" | "hours" => Some(Self::Hours),
            "d" | "day" | "days" => Some(Self::Days),
            "w" | "week" | "weeks" => Some(Self::Weeks),
            "m" | "month" | "months" => Some(Self::Months),
            "y" | "yr" | "year" | "years" => Some(Self::Years),
            _ => None,
        }
    }

    fn subtract(self, now: DateTime<Utc>, magnitude: u32) -> Option<DateTime<Utc>> {
        let amount = i64::from(magnitude);
        match self {
            Self::Seconds => now.checked_sub_signed(TimeDelta::try_seconds(amount)?),
            Self::Minutes => now.checked_sub_signed(TimeDelta::try_minutes(amount)?),
            Self::Hours => now.checked_sub_signed(TimeDelta::try_hours(amount)?),
            Self::Days => now.checked_sub_days(Days::new(u64::from(magnitude))),
            Self::Weeks => {
                let days = u64::from(magnitude).checked_mul(7)?;
                now.checked_sub_days(Days::new(days))
            }
            Self::Months => now.checked_sub_months(Months::new(magnitude)),
            Self::Years => now.checked_sub_months(Months::new(magnitude.checked_mul(12)?)),
        }
    }
}

/// Resolves a relative expression such as `-7d` into an absolute cutoff.
///
/// # Errors
///
/// Returns [`TimeWindowError::EmptyInput`] for an empty expression and
/// [`TimeWindowError::InvalidFormat`] when the sign, magnitude, or unit is
/// missing or unsupported, or when the result falls outside the calendar.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use prtool::time_window::resolve;
///
/// let now = Utc.with_ymd_and_hms(2024, 7, 8, 12, 0, 0).unwrap();
/// let cutoff = resolve("-7d", now).expect("valid expression");
/// assert_eq!(cutoff.instant(), Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap());
/// ```
pub fn resolve(expression: &str, now: DateTime<Utc>) -> Result<Cutoff, TimeWindowError> {
    if expression.is_empty() {
        return Err(TimeWindowError::EmptyInput);
    }

    let invalid = |reason: &str| TimeWindowError::InvalidFormat {
        input: expression.to_owned(),
        reason: reason.to_owned(),
    };

    let body = expression
        .strip_prefix('-')
        .ok_or_else(|| invalid("must start with '-' (only past windows are supported)"))?;

    let digits_end = body
        .find(|character: char| !character.is_ascii_digit())
        .unwrap_or(body.len());
    let (digits, unit_text) = body.split_at(digits_end);

    if digits.is_empty() {
        return Err(invalid("expected a number after '-'"));
    }
    if unit_text.is_empty() || !unit_text.chars().all(|character| character.is_ascii_alphabetic())
    {
        return Err(invalid("expected -<number><unit>, e.g. -7d"));
    }

    let magnitude: u32 = digits
        .parse()
        .map_err(|_| invalid("number is out of range"))?;
    if magnitude == 0 {
        return Err(invalid("number must be greater than zero"));
    }

    let unit = Unit::parse(unit_text).ok_or_else(|| {
        invalid("unsupported unit (use s, min, h, d, w, m, or y)")
    })?;

    unit.subtract(now, magnitude)
        .map(Cutoff::new)
        .ok_or_else(|| invalid("window reaches outside the supported calendar range"))
}
