//! Cooperative scheduler tying the tree to a clock, the touch pads and the
//! remote command transport.
//!
//! The firmware main loop calls [`Controller::service`] and sleeps for the
//! returned delay; request handlers call [`Controller::handle_request`]. Each
//! tick and command runs to completion before the next one starts.

use core::fmt;

use crate::config::TouchConfig;
use crate::device::{Commands, MELODY_CAPACITY, Tannenbaum};
use crate::lights::PwmOutputs;
use crate::melody::{Melody, NoteLength, Pitch};
use crate::player::ToneOutput;
use crate::router::RouterError;
use crate::schedule::{Interval, Periodic, Ticker};
use crate::template::TemplateSink;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::touch::{ButtonId, Pad, TouchButtons, TouchError, TouchSensor};

/// Number of touch buttons on the tree.
pub const BUTTON_COUNT: usize = 3;

/// Left button, cycles modes.
pub const LEFT_BUTTON: (ButtonId, Pad) = (ButtonId(0), Pad(4));
/// Middle button, toggles all LEDs.
pub const MIDDLE_BUTTON: (ButtonId, Pad) = (ButtonId(1), Pad(5));
/// Right button, plays the first tune.
pub const RIGHT_BUTTON: (ButtonId, Pad) = (ButtonId(2), Pad(3));

/// Errors that can occur while wiring up the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SetupError {
    Router(RouterError),
    Touch(TouchError),
}

impl From<RouterError> for SetupError {
    fn from(err: RouterError) -> Self {
        SetupError::Router(err)
    }
}

impl From<TouchError> for SetupError {
    fn from(err: TouchError) -> Self {
        SetupError::Touch(err)
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::Router(err) => write!(f, "command setup failed: {}", err),
            SetupError::Touch(err) => write!(f, "touch setup failed: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SetupError {}

/// Runs the tree.
///
/// # Type Parameters
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `P` - LED PWM implementation type
/// * `B` - Buzzer implementation type
/// * `S` - Template sink implementation type
/// * `TS` - Touch sensor implementation type
pub struct Controller<'t, I, T, P, B, S, TS>
where
    I: TimeInstant,
    T: TimeSource<I>,
    P: PwmOutputs,
    B: ToneOutput,
    S: TemplateSink,
    TS: TouchSensor,
{
    device: Tannenbaum<P, B, S>,
    commands: Commands<P, B, S>,
    buttons: TouchButtons<Tannenbaum<P, B, S>, BUTTON_COUNT>,
    sensor: TS,
    time_source: &'t T,
    config: TouchConfig,
    started: I,
    pattern: Ticker<I>,
    melody: Ticker<I>,
    touch: Ticker<I>,
}

impl<'t, I, T, P, B, S, TS> Controller<'t, I, T, P, B, S, TS>
where
    I: TimeInstant,
    T: TimeSource<I>,
    P: PwmOutputs,
    B: ToneOutput,
    S: TemplateSink,
    TS: TouchSensor,
{
    /// Registers the commands, binds the touch buttons and starts the
    /// pattern and melody ticks.
    ///
    /// Touch settings come from the device's configuration. Buttons stay
    /// inert until the settle time has passed and their thresholds are
    /// calibrated.
    ///
    /// # Errors
    /// * `Router` - the command table is too small
    /// * `Touch` - a button slot is out of range
    pub fn new(
        device: Tannenbaum<P, B, S>,
        sensor: TS,
        time_source: &'t T,
    ) -> Result<Self, SetupError> {
        let config = device.touch_config();
        let commands = Tannenbaum::<P, B, S>::command_table()?;

        let mut buttons: TouchButtons<Tannenbaum<P, B, S>, BUTTON_COUNT> = TouchButtons::new();
        let percent = config.threshold_percent;
        buttons.configure_input(LEFT_BUTTON.0, LEFT_BUTTON.1, percent, Tannenbaum::next)?;
        buttons.configure_input(MIDDLE_BUTTON.0, MIDDLE_BUTTON.1, percent, Tannenbaum::on_off)?;
        buttons.configure_input(RIGHT_BUTTON.0, RIGHT_BUTTON.1, percent, |tree: &mut Tannenbaum<P, B, S>| {
            tree.play(0)
        })?;

        let now = time_source.now();
        let mut controller = Self {
            device,
            commands,
            buttons,
            sensor,
            time_source,
            config,
            started: now,
            pattern: Ticker::new(Interval::MIN),
            melody: Ticker::new(Interval::MIN),
            touch: Ticker::new(config.dispatch_interval),
        };
        controller.sync_schedules(now);
        info!("controller started, {} commands", controller.commands.len());
        Ok(controller)
    }

    /// Runs everything that is due and returns the time until the next
    /// deadline.
    pub fn service(&mut self) -> I::Duration {
        let now = self.time_source.now();
        self.sync_schedules(now);

        let settled = self
            .settle_remaining(now)
            .is_some_and(|remaining| remaining == I::Duration::ZERO);
        if settled {
            self.buttons.calibrate_thresholds(&mut self.sensor);
            self.touch.arm(now, self.config.dispatch_interval);
            info!("touch buttons calibrated");
        }

        if self.pattern.poll(now) {
            self.device.lights_mut().advance_tick();
        }
        if self.melody.poll(now) {
            self.device.player_mut().advance_tick();
        }
        if self.touch.poll(now) {
            self.buttons.dispatch(&mut self.sensor, &mut self.device);
        }

        self.sync_schedules(now);
        self.next_delay(now)
    }

    /// Runs a single remote command.
    ///
    /// # Errors
    /// * `UnknownCommand` - `name` is not registered; nothing changes
    pub fn handle_command(&mut self, name: &str, value: &str) -> Result<(), RouterError> {
        let result = self.commands.dispatch(&mut self.device, name, value);
        self.sync_schedules(self.time_source.now());
        result
    }

    /// Runs every `(name, value)` parameter of a request in order.
    ///
    /// Returns the number of unrecognized names, which were skipped.
    pub fn handle_request<'a, It>(&mut self, params: It) -> usize
    where
        It: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let unrecognized = self.commands.dispatch_all(&mut self.device, params);
        self.sync_schedules(self.time_source.now());
        unrecognized
    }

    /// Plays `melody`, optionally at its own tempo until it ends.
    pub fn play(&mut self, melody: Melody<MELODY_CAPACITY>, tempo: Option<Interval>) {
        self.device.player_mut().play(melody, tempo);
        self.sync_schedules(self.time_source.now());
    }

    /// Plays a single note.
    pub fn play_note(&mut self, pitch: Pitch, length: NoteLength, octave: u8) {
        self.device.player_mut().play_note(pitch, length, octave);
        self.sync_schedules(self.time_source.now());
    }

    /// Stops the melody.
    pub fn stop(&mut self) {
        self.device.player_mut().stop();
        self.sync_schedules(self.time_source.now());
    }

    fn sync_schedules(&mut self, now: I) {
        sync(&mut self.pattern, self.device.lights_mut(), now);
        sync(&mut self.melody, self.device.player_mut(), now);
    }

    fn settle_remaining(&self, now: I) -> Option<I::Duration> {
        if self.buttons.is_calibrated() {
            return None;
        }
        let elapsed = now.duration_since(self.started);
        Some(self.config.settle_time.as_duration::<I::Duration>().saturating_sub(elapsed))
    }

    fn next_delay(&self, now: I) -> I::Duration {
        let candidates = [
            self.pattern.remaining(now),
            self.melody.remaining(now),
            self.touch.remaining(now),
            self.settle_remaining(now),
        ];

        let mut delay: Option<I::Duration> = None;
        for remaining in candidates.into_iter().flatten() {
            if delay.is_none_or(|d| remaining.as_millis() < d.as_millis()) {
                delay = Some(remaining);
            }
        }
        delay.unwrap_or(I::Duration::ZERO)
    }

    /// Returns the device.
    pub fn device(&self) -> &Tannenbaum<P, B, S> {
        &self.device
    }

    /// Returns the command table.
    pub fn commands(&self) -> &Commands<P, B, S> {
        &self.commands
    }

    /// Returns true once the touch thresholds are calibrated.
    pub fn is_calibrated(&self) -> bool {
        self.buttons.is_calibrated()
    }

    /// Calibrated threshold of a touch button.
    pub fn button_threshold(&self, id: ButtonId) -> Option<u16> {
        self.buttons.threshold(id)
    }

    /// Returns the touch sensor mutably.
    pub fn sensor_mut(&mut self) -> &mut TS {
        &mut self.sensor
    }
}

fn sync<I: TimeInstant, C: Periodic>(ticker: &mut Ticker<I>, component: &mut C, now: I) {
    if component.take_reschedule() {
        ticker.arm(now, component.interval());
    }
}
