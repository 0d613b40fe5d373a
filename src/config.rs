//! Device configuration.
//!
//! Every struct has a `DEFAULT` constant matching the stock tree so firmware
//! can start from it and override single fields.

use crate::layout::OperatingMode;
use crate::melody::NoteLength;
use crate::pattern::DutyLevels;
use crate::schedule::Interval;

/// LED pattern settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightConfig {
    pub initial_mode: OperatingMode,
    /// Time between pattern ticks.
    pub pattern_interval: Interval,
    /// Fastest pattern interval reachable by speeding up.
    pub min_interval: Interval,
    /// Slowest pattern interval reachable by slowing down.
    pub max_interval: Interval,
    pub pwm_frequency_hz: u32,
    pub pwm_resolution_bits: u8,
    pub levels: DutyLevels,
}

impl LightConfig {
    pub const DEFAULT: LightConfig = LightConfig {
        initial_mode: OperatingMode::Larson,
        pattern_interval: Interval::from_millis(100),
        min_interval: Interval::from_millis(2),
        max_interval: Interval::from_millis(4096),
        pwm_frequency_hz: 1000,
        pwm_resolution_bits: 8,
        levels: DutyLevels::DEFAULT,
    };
}

impl Default for LightConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Melody player settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MelodyConfig {
    /// Duration of one player tick, i.e. of a sixteenth note.
    pub base_tempo: Interval,
    pub min_tempo: Interval,
    pub max_tempo: Interval,
    /// Octave each melody starts in.
    pub start_octave: u8,
    /// Length of notes without a length prefix.
    pub default_length: NoteLength,
    /// Restart the tone for a repeated identical note instead of holding it.
    pub retrigger_repeats: bool,
}

impl MelodyConfig {
    pub const DEFAULT: MelodyConfig = MelodyConfig {
        base_tempo: Interval::from_millis(128),
        min_tempo: Interval::from_millis(64),
        max_tempo: Interval::from_millis(2048),
        start_octave: 4,
        default_length: NoteLength::Sixteenth,
        retrigger_repeats: true,
    };
}

impl Default for MelodyConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Touch button settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchConfig {
    /// Wait after power-up before reading calibration baselines.
    pub settle_time: Interval,
    /// Time between touch evaluations.
    pub dispatch_interval: Interval,
    /// A pad counts as touched below this share of its baseline.
    pub threshold_percent: u8,
}

impl TouchConfig {
    pub const DEFAULT: TouchConfig = TouchConfig {
        settle_time: Interval::from_millis(1000),
        dispatch_interval: Interval::from_millis(100),
        threshold_percent: 94,
    };
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete device configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceConfig {
    pub light: LightConfig,
    pub melody: MelodyConfig,
    pub touch: TouchConfig,
}

impl DeviceConfig {
    pub const DEFAULT: DeviceConfig = DeviceConfig {
        light: LightConfig::DEFAULT,
        melody: MelodyConfig::DEFAULT,
        touch: TouchConfig::DEFAULT,
    };
}
