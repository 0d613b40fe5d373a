//! Operating mode state machine for the LED outputs.
//!
//! Provides [`LightShow`], which owns the PWM outputs, keeps the active
//! [`OperatingMode`] with its [`PatternPhase`], and renders one pattern frame
//! per tick. Also defines the [`PwmOutputs`] trait for hardware abstraction.

use crate::config::LightConfig;
use crate::layout::{ArrowDirection, ChannelLayout, MAX_CHANNELS, OperatingMode, Pin, PwmChannel, SpinDirection};
use crate::pattern::{self, Frame, Level, PatternPhase};
use crate::schedule::{Interval, Periodic};

/// Trait for abstracting the LED PWM peripheral.
///
/// Duty values are written exactly as given; with the tree's active-low
/// wiring `0` means fully on.
pub trait PwmOutputs {
    /// Sets up a PWM unit. Called once per channel at construction.
    fn configure_channel(&mut self, channel: PwmChannel, frequency_hz: u32, resolution_bits: u8);

    /// Routes `pin` to `channel`, replacing any previous routing of the pin.
    fn attach(&mut self, pin: Pin, channel: PwmChannel);

    /// Disconnects `pin` from its PWM unit.
    fn detach(&mut self, pin: Pin);

    /// Sets the duty cycle of `channel`.
    fn write_duty(&mut self, channel: PwmChannel, duty: u16);
}

/// Drives the tree's LEDs through the operating modes.
///
/// Switching modes rebinds pins to channels and restarts the new mode's
/// animation from its initial phase before any further tick renders.
pub struct LightShow<P: PwmOutputs> {
    outputs: P,
    config: LightConfig,
    mode: OperatingMode,
    layout: ChannelLayout,
    phase: PatternPhase,
    all_on: bool,
    interval: Interval,
    reschedule: bool,
    frame: Frame,
}

impl<P: PwmOutputs> LightShow<P> {
    /// Configures the PWM units and enters `config.initial_mode`.
    pub fn new(mut outputs: P, config: LightConfig) -> Self {
        for channel in 0..MAX_CHANNELS as u8 {
            outputs.configure_channel(
                PwmChannel(channel),
                config.pwm_frequency_hz,
                config.pwm_resolution_bits,
            );
        }

        let mode = config.initial_mode;
        let mut show = Self {
            outputs,
            config,
            mode,
            layout: mode.layout(),
            phase: PatternPhase::initial(mode),
            all_on: false,
            interval: config
                .pattern_interval
                .clamped(config.min_interval, config.max_interval),
            reschedule: true,
            frame: Frame::new(),
        };

        show.set_mode(mode);
        if mode == OperatingMode::AllOnOff {
            show.render_in_place();
        }
        show
    }

    /// Activates `mode`, rebinding the outputs and resetting its phase.
    pub fn set_mode(&mut self, mode: OperatingMode) {
        self.rebind(mode.layout());
        self.phase = PatternPhase::initial(mode);
        self.mode = mode;
        info!("mode {:?}", mode);
    }

    /// Activates the Larson scanner.
    pub fn set_mode_larson(&mut self) {
        self.set_mode(OperatingMode::Larson);
    }

    /// Activates a spin mode.
    pub fn set_mode_spinning(&mut self, direction: SpinDirection) {
        self.set_mode(OperatingMode::spin(direction));
    }

    /// Activates an arrow mode.
    pub fn set_mode_arrow(&mut self, direction: ArrowDirection) {
        self.set_mode(OperatingMode::arrow(direction));
    }

    /// Activates all-on/off without changing the on/off state.
    pub fn set_mode_all_on_off(&mut self) {
        self.set_mode(OperatingMode::AllOnOff);
    }

    /// Activates the mode after the current one.
    pub fn set_next_mode(&mut self) {
        self.set_mode(self.mode.next());
    }

    /// Switches to all-on/off, flips the on/off state and shows it at once.
    ///
    /// Returns the new state, `true` meaning all LEDs on.
    pub fn toggle_on_off(&mut self) -> bool {
        self.set_mode(OperatingMode::AllOnOff);
        self.all_on = !self.all_on;
        self.render_in_place();
        info!("all leds {}", if self.all_on { "on" } else { "off" });
        self.all_on
    }

    /// Halves the pattern interval down to the configured minimum.
    pub fn increase_speed(&mut self) {
        self.set_interval(self.interval.halved(self.config.min_interval));
    }

    /// Doubles the pattern interval up to the configured maximum.
    pub fn decrease_speed(&mut self) {
        self.set_interval(self.interval.doubled(self.config.max_interval));
    }

    fn set_interval(&mut self, interval: Interval) {
        self.interval = interval;
        self.reschedule = true;
        debug!("pattern interval {} ms", interval.millis());
    }

    /// Renders the active mode at its current phase and advances the phase.
    pub fn advance_tick(&mut self) {
        let (frame, next) = pattern::render(self.mode, self.phase, self.all_on);
        self.apply(frame);
        self.phase = next;
    }

    fn render_in_place(&mut self) {
        let (frame, _) = pattern::render(self.mode, self.phase, self.all_on);
        self.apply(frame);
    }

    fn rebind(&mut self, layout: ChannelLayout) {
        let bindings = layout.bindings();
        for previous in self.layout.bindings() {
            if !bindings.iter().any(|b| b.pin == previous.pin) {
                self.outputs.detach(previous.pin);
            }
        }
        for binding in bindings {
            self.outputs.attach(binding.pin, binding.channel);
        }
        self.layout = layout;
    }

    fn apply(&mut self, frame: Frame) {
        for (channel, level) in frame.iter().enumerate() {
            self.outputs
                .write_duty(PwmChannel(channel as u8), self.config.levels.duty(*level));
        }
        self.frame = frame;
    }

    /// Returns the active mode.
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Returns the phase the next tick renders.
    pub fn phase(&self) -> PatternPhase {
        self.phase
    }

    /// Returns the all-on/off state.
    pub fn is_all_on(&self) -> bool {
        self.all_on
    }

    /// Returns the pattern interval.
    pub fn interval(&self) -> Interval {
        self.interval
    }

    /// Levels written by the most recent render.
    pub fn frame(&self) -> &[Level] {
        &self.frame
    }

    /// Returns a reference to the PWM outputs.
    pub fn outputs(&self) -> &P {
        &self.outputs
    }
}

impl<P: PwmOutputs> Periodic for LightShow<P> {
    fn interval(&self) -> Interval {
        self.interval
    }

    fn advance_tick(&mut self) {
        LightShow::advance_tick(self);
    }

    fn take_reschedule(&mut self) -> bool {
        core::mem::take(&mut self.reschedule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Sweep;

    struct NullOutputs;

    impl PwmOutputs for NullOutputs {
        fn configure_channel(&mut self, _: PwmChannel, _: u32, _: u8) {}
        fn attach(&mut self, _: Pin, _: PwmChannel) {}
        fn detach(&mut self, _: Pin) {}
        fn write_duty(&mut self, _: PwmChannel, _: u16) {}
    }

    #[test]
    fn set_mode_resets_phase() {
        let mut show = LightShow::new(NullOutputs, LightConfig::DEFAULT);
        for _ in 0..4 {
            show.advance_tick();
        }
        assert_eq!(show.phase().shift, 3);

        show.set_mode_spinning(SpinDirection::Left);
        show.set_mode_larson();
        assert_eq!(
            show.phase(),
            PatternPhase {
                shift: -1,
                sweep: Sweep::Forward
            }
        );
    }

    #[test]
    fn all_on_off_tick_keeps_state() {
        let mut show = LightShow::new(NullOutputs, LightConfig::DEFAULT);
        assert!(show.toggle_on_off());
        show.advance_tick();
        assert_eq!(show.frame(), &[Level::On]);
        assert!(show.is_all_on());
    }

    #[test]
    fn initial_all_on_off_renders_immediately() {
        let config = LightConfig {
            initial_mode: OperatingMode::AllOnOff,
            ..LightConfig::DEFAULT
        };
        let show = LightShow::new(NullOutputs, config);
        assert_eq!(show.frame(), &[Level::Off]);
    }
}
