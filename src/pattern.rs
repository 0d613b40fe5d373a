//! LED pattern renderers.
//!
//! Each renderer is a pure function from a [`PatternPhase`] to a [`Frame`] of
//! symbolic [`Level`]s plus the phase for the next tick. Converting levels to
//! PWM duty values is left to [`DutyLevels`], so renderers never deal with the
//! inverted duty polarity of the hardware.

use crate::layout::{ChannelLayout, MAX_CHANNELS, OperatingMode};
use heapless::Vec;

/// Symbolic brightness of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    On,
    Dim,
    Off,
}

/// The sliding spot: dim, full, dim.
pub const SPOT: [Level; 3] = [Level::Dim, Level::On, Level::Dim];

/// One rendered value per logical channel.
pub type Frame = Vec<Level, MAX_CHANNELS>;

/// Duty cycle values for each [`Level`].
///
/// Outputs are active low: `0` drives an LED fully on, the largest value
/// turns it fully off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DutyLevels {
    pub on: u16,
    pub dim: u16,
    pub off: u16,
}

impl DutyLevels {
    pub const DEFAULT: DutyLevels = DutyLevels {
        on: 0,
        dim: 220,
        off: 256,
    };

    /// Duty value for a level.
    #[inline]
    pub fn duty(&self, level: Level) -> u16 {
        match level {
            Level::On => self.on,
            Level::Dim => self.dim,
            Level::Off => self.off,
        }
    }
}

impl Default for DutyLevels {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Which way the spot moves on the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sweep {
    /// Towards higher channel numbers.
    Forward,
    /// Towards lower channel numbers.
    Backward,
}

/// Animation cursor of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatternPhase {
    /// Offset of the spot's first element relative to channel 0.
    pub shift: i16,
    /// Direction of the next step.
    pub sweep: Sweep,
}

impl PatternPhase {
    /// The phase a mode starts from whenever it becomes active.
    pub fn initial(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::Larson => PatternPhase {
                shift: -1,
                sweep: Sweep::Forward,
            },
            OperatingMode::SpinRight | OperatingMode::ArrowUp | OperatingMode::AllOnOff => {
                PatternPhase {
                    shift: 0,
                    sweep: Sweep::Forward,
                }
            }
            OperatingMode::SpinLeft => PatternPhase {
                shift: 0,
                sweep: Sweep::Backward,
            },
            // Spot on the topmost tiers, mirroring the arrow up start.
            OperatingMode::ArrowDown => PatternPhase {
                shift: (ChannelLayout::Ladder.channel_count() - SPOT.len()) as i16,
                sweep: Sweep::Backward,
            },
        }
    }
}

fn place(pattern: &[Level], index: i32) -> Level {
    usize::try_from(index)
        .ok()
        .and_then(|i| pattern.get(i).copied())
        .unwrap_or(Level::Off)
}

/// Larson scanner: bounces `pattern` between the ends of `channels`.
///
/// The shift runs over `-1..=channels + 1 - pattern.len()`, so the spot's
/// bright center reaches both end channels, and the direction flips at each
/// bound.
pub fn scan(pattern: &[Level], channels: usize, phase: PatternPhase) -> (Frame, PatternPhase) {
    let channels = channels.min(MAX_CHANNELS);
    let shift = i32::from(phase.shift);

    let mut frame = Frame::new();
    for i in 0..channels {
        let _ = frame.push(place(pattern, i as i32 - shift));
    }

    let lowest = -1;
    let highest = (channels as i32 + 1 - pattern.len() as i32).max(lowest);
    let (shift, sweep) = match phase.sweep {
        Sweep::Forward if shift < highest => (shift + 1, Sweep::Forward),
        Sweep::Forward => (shift - 1, Sweep::Backward),
        Sweep::Backward if shift > lowest => (shift - 1, Sweep::Backward),
        Sweep::Backward => (shift + 1, Sweep::Forward),
    };

    let next = PatternPhase {
        shift: shift.clamp(lowest, highest) as i16,
        sweep,
    };
    (frame, next)
}

/// Rotates `pattern` over `channels` positions modulo `wrap_length`.
///
/// With `wrap_length == channels` the spot circles continuously. A longer
/// wrap lets it leave the visible channels completely before re-entering,
/// which gives the arrow its gap.
pub fn rotate(
    pattern: &[Level],
    channels: usize,
    wrap_length: usize,
    phase: PatternPhase,
) -> (Frame, PatternPhase) {
    let channels = channels.min(MAX_CHANNELS);
    let wrap = wrap_length.max(channels).max(1) as i32;
    let shift = i32::from(phase.shift).rem_euclid(wrap);

    let mut frame = Frame::new();
    for i in 0..channels as i32 {
        let _ = frame.push(place(pattern, (i - shift + wrap) % wrap));
    }

    let shift = match phase.sweep {
        Sweep::Forward => (shift + 1) % wrap,
        Sweep::Backward => (shift - 1).rem_euclid(wrap),
    };

    let next = PatternPhase {
        shift: shift as i16,
        sweep: phase.sweep,
    };
    (frame, next)
}

/// Single broadcast channel, fully on or fully off.
pub fn solid(on: bool) -> Frame {
    let mut frame = Frame::new();
    let _ = frame.push(if on { Level::On } else { Level::Off });
    frame
}

/// Renders one tick of `mode`.
///
/// `all_on` only matters for [`OperatingMode::AllOnOff`], which has no phase
/// to advance.
pub fn render(mode: OperatingMode, phase: PatternPhase, all_on: bool) -> (Frame, PatternPhase) {
    let layout = mode.layout();
    match mode {
        OperatingMode::Larson => scan(&SPOT, layout.channel_count(), phase),
        OperatingMode::SpinRight | OperatingMode::SpinLeft => {
            let ring = ChannelLayout::Ring.channel_count();
            rotate(&SPOT, ring, ring, phase)
        }
        OperatingMode::ArrowUp | OperatingMode::ArrowDown => {
            let tiers = layout.channel_count();
            rotate(&SPOT, tiers, tiers + SPOT.len(), phase)
        }
        OperatingMode::AllOnOff => (solid(all_on), phase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Level::{Dim, Off, On};

    #[test]
    fn scan_starts_with_center_on_first_channel() {
        let (frame, _) = scan(&SPOT, 7, PatternPhase::initial(OperatingMode::Larson));
        assert_eq!(frame.as_slice(), &[On, Dim, Off, Off, Off, Off, Off]);
    }

    #[test]
    fn scan_ends_with_center_on_last_channel() {
        let phase = PatternPhase {
            shift: 5,
            sweep: Sweep::Forward,
        };
        let (frame, next) = scan(&SPOT, 7, phase);
        assert_eq!(frame.as_slice(), &[Off, Off, Off, Off, Off, Dim, On]);
        assert_eq!(next.shift, 4);
        assert_eq!(next.sweep, Sweep::Backward);
    }

    #[test]
    fn rotate_wraps_around_the_ring() {
        let phase = PatternPhase {
            shift: 11,
            sweep: Sweep::Forward,
        };
        let (frame, next) = rotate(&SPOT, 12, 12, phase);
        assert_eq!(frame[11], Dim);
        assert_eq!(frame[0], On);
        assert_eq!(frame[1], Dim);
        assert_eq!(next.shift, 0);
    }

    #[test]
    fn rotate_normalises_out_of_range_shift() {
        let phase = PatternPhase {
            shift: -25,
            sweep: Sweep::Backward,
        };
        let (frame, next) = rotate(&SPOT, 12, 12, phase);
        // -25 mod 12 == 11
        assert_eq!(frame[11], Dim);
        assert_eq!(next.shift, 10);
    }

    #[test]
    fn arrow_gap_leaves_all_tiers_dark() {
        let phase = PatternPhase {
            shift: 7,
            sweep: Sweep::Forward,
        };
        let (frame, _) = rotate(&SPOT, 7, 10, phase);
        assert!(frame.iter().all(|l| *l == Off));
    }

    #[test]
    fn arrows_enter_at_opposite_ends() {
        let (up, _) = render(
            OperatingMode::ArrowUp,
            PatternPhase::initial(OperatingMode::ArrowUp),
            false,
        );
        assert_eq!(up.as_slice(), &[Dim, On, Dim, Off, Off, Off, Off]);

        let (down, next) = render(
            OperatingMode::ArrowDown,
            PatternPhase::initial(OperatingMode::ArrowDown),
            false,
        );
        assert_eq!(down.as_slice(), &[Off, Off, Off, Off, Dim, On, Dim]);
        assert_eq!(next.shift, 3);
    }

    #[test]
    fn duty_levels_are_active_low() {
        let levels = DutyLevels::DEFAULT;
        assert!(levels.duty(On) < levels.duty(Dim));
        assert!(levels.duty(Dim) < levels.duty(Off));
    }
}
