//! Clock abstraction used to drive the periodic ticks.
//!
//! The firmware supplies its own instant and duration types (e.g.
//! `embassy_time::Instant`); the controller only needs millisecond
//! arithmetic on them.

/// Source of the current time.
pub trait TimeSource<I: TimeInstant> {
    /// Returns the current time instant.
    fn now(&self) -> I;
}

/// Duration type with millisecond conversion.
pub trait TimeDuration: Copy + PartialEq {
    /// Zero duration constant.
    const ZERO: Self;

    /// Converts duration to milliseconds.
    fn as_millis(&self) -> u64;

    /// Creates duration from milliseconds.
    fn from_millis(millis: u64) -> Self;

    /// Saturating subtraction (returns ZERO on underflow).
    fn saturating_sub(self, other: Self) -> Self;
}

/// Monotonic instant type.
pub trait TimeInstant: Copy {
    /// Duration type for this instant.
    type Duration: TimeDuration;

    /// Time elapsed since an earlier instant.
    fn duration_since(&self, earlier: Self) -> Self::Duration;
}
