//! Periodic tick scheduling.
//!
//! Components that animate over time implement [`Periodic`]. The
//! [`Controller`](crate::controller::Controller) owns one [`Ticker`] per
//! component and invokes [`Periodic::advance_tick`] whenever the component's
//! interval has elapsed. Changing an interval raises a reschedule request
//! which re-arms the ticker from the current instant.

use crate::time::{TimeDuration, TimeInstant};

/// A strictly positive tick interval in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interval(u32);

impl Interval {
    /// Shortest representable interval.
    pub const MIN: Interval = Interval(1);

    /// Creates an interval, mapping zero to one millisecond.
    pub const fn from_millis(millis: u32) -> Self {
        if millis == 0 {
            Self::MIN
        } else {
            Interval(millis)
        }
    }

    /// Interval length in milliseconds. Never zero.
    pub const fn millis(self) -> u32 {
        self.0
    }

    /// Half this interval, saturating at `floor`.
    pub fn halved(self, floor: Interval) -> Self {
        Interval(self.0 / 2).max(floor).max(Self::MIN)
    }

    /// Twice this interval, saturating at `ceiling`.
    pub fn doubled(self, ceiling: Interval) -> Self {
        Interval(self.0.saturating_mul(2)).min(ceiling).max(Self::MIN)
    }

    /// Restricts the interval to `[min, max]`.
    pub fn clamped(self, min: Interval, max: Interval) -> Self {
        self.max(min).min(max)
    }

    /// Converts to the platform duration type.
    pub fn as_duration<D: TimeDuration>(self) -> D {
        D::from_millis(u64::from(self.0))
    }
}

/// Something advanced by a periodic tick.
pub trait Periodic {
    /// Current tick interval.
    fn interval(&self) -> Interval;

    /// Runs one tick. Called once per elapsed interval.
    fn advance_tick(&mut self);

    /// Returns `true` once after the interval changed or the timing was
    /// restarted, so the scheduler can re-arm from the current instant.
    fn take_reschedule(&mut self) -> bool;
}

/// Tracks when a periodic task last fired.
#[derive(Debug, Clone, Copy)]
pub struct Ticker<I: TimeInstant> {
    interval: Interval,
    last_fire: Option<I>,
}

impl<I: TimeInstant> Ticker<I> {
    /// Creates a disarmed ticker.
    pub const fn new(interval: Interval) -> Self {
        Self {
            interval,
            last_fire: None,
        }
    }

    /// (Re-)arms the ticker so the next tick is due one `interval` after `now`.
    pub fn arm(&mut self, now: I, interval: Interval) {
        self.interval = interval;
        self.last_fire = Some(now);
    }

    /// Stops the ticker. [`poll`](Self::poll) returns `false` until re-armed.
    pub fn disarm(&mut self) {
        self.last_fire = None;
    }

    /// Returns true if the ticker has been armed.
    pub fn is_armed(&self) -> bool {
        self.last_fire.is_some()
    }

    /// Interval the ticker is armed with.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Returns true and records the fire time if a tick is due at `now`.
    pub fn poll(&mut self, now: I) -> bool {
        let Some(last) = self.last_fire else {
            return false;
        };

        if now.duration_since(last).as_millis() >= u64::from(self.interval.millis()) {
            self.last_fire = Some(now);
            true
        } else {
            false
        }
    }

    /// Time left until the next tick, `None` while disarmed.
    pub fn remaining(&self, now: I) -> Option<I::Duration> {
        let last = self.last_fire?;
        let elapsed = now.duration_since(last);
        Some(self.interval.as_duration::<I::Duration>().saturating_sub(elapsed))
    }
}
