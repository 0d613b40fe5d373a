//! The complete tree: LEDs, buzzer and the on/off button template.
//!
//! [`Tannenbaum`] is the context every command and touch action runs on. Its
//! methods are the named actions of the command table built by
//! [`Tannenbaum::command_table`].

use crate::config::{DeviceConfig, TouchConfig};
use crate::layout::{ArrowDirection, SpinDirection};
use crate::lights::{LightShow, PwmOutputs};
use crate::melody::Melody;
use crate::player::{MelodyPlayer, ToneOutput};
use crate::router::{CommandTable, RouterError};
use crate::template::{BTN_OFF, BTN_ON, ON_OFF_BTN_STATE, TemplateSink};
use crate::tunes;

/// Maximum number of tokens in a queued melody.
pub const MELODY_CAPACITY: usize = 64;

/// Capacity of the command table. Must be a power of two.
pub const COMMAND_CAPACITY: usize = 16;

/// Command table type for a [`Tannenbaum`].
pub type Commands<P, B, S> = CommandTable<Tannenbaum<P, B, S>, COMMAND_CAPACITY>;

/// The tree's light show and melody player behind one set of actions.
///
/// # Type Parameters
/// * `P` - LED PWM implementation type
/// * `B` - Buzzer implementation type
/// * `S` - Template sink receiving the on/off button state
pub struct Tannenbaum<P: PwmOutputs, B: ToneOutput, S: TemplateSink> {
    lights: LightShow<P>,
    player: MelodyPlayer<B, MELODY_CAPACITY>,
    templates: S,
    touch: TouchConfig,
}

impl<P: PwmOutputs, B: ToneOutput, S: TemplateSink> Tannenbaum<P, B, S> {
    /// Brings up the outputs and publishes the initial button state.
    pub fn new(outputs: P, buzzer: B, mut templates: S, config: DeviceConfig) -> Self {
        let lights = LightShow::new(outputs, config.light);
        templates.set_template(ON_OFF_BTN_STATE, button_state(lights.is_all_on()));

        Self {
            lights,
            player: MelodyPlayer::new(buzzer, config.melody),
            templates,
            touch: config.touch,
        }
    }

    /// Builds the table of every remote command.
    ///
    /// | name | action |
    /// |------|--------|
    /// | `larson` | Larson scanner |
    /// | `spin_right`, `spin_left` | spin modes |
    /// | `arrow_up`, `arrow_down` | arrow modes |
    /// | `on_off` | toggle all LEDs |
    /// | `next` | cycle to the next mode |
    /// | `plus`, `minus` | pattern speed |
    /// | `faster`, `slower` | melody tempo |
    /// | `tempo=<ms>` | set melody tempo |
    /// | `play=<index>` | play a built-in tune |
    /// | `stop` | stop the melody |
    ///
    /// # Errors
    /// * `TableFull` - more commands than [`COMMAND_CAPACITY`]
    pub fn command_table() -> Result<Commands<P, B, S>, RouterError> {
        let mut table = CommandTable::new();
        table.register_trigger("larson", Self::larson)?;
        table.register_trigger("spin_right", Self::spin_right)?;
        table.register_trigger("spin_left", Self::spin_left)?;
        table.register_trigger("arrow_up", Self::arrow_up)?;
        table.register_trigger("arrow_down", Self::arrow_down)?;
        table.register_trigger("on_off", Self::on_off)?;
        table.register_trigger("next", Self::next)?;
        table.register_trigger("plus", Self::plus)?;
        table.register_trigger("minus", Self::minus)?;
        table.register_trigger("faster", Self::faster)?;
        table.register_trigger("slower", Self::slower)?;
        table.register_integer("tempo", Self::tempo)?;
        table.register_integer("play", Self::play)?;
        table.register_trigger("stop", Self::stop)?;
        Ok(table)
    }

    /// Switches to the Larson scanner.
    pub fn larson(&mut self) {
        self.lights.set_mode_larson();
    }

    /// Spins the spot clockwise.
    pub fn spin_right(&mut self) {
        self.lights.set_mode_spinning(SpinDirection::Right);
    }

    /// Spins the spot counter-clockwise.
    pub fn spin_left(&mut self) {
        self.lights.set_mode_spinning(SpinDirection::Left);
    }

    /// Sends arrows up the tree.
    pub fn arrow_up(&mut self) {
        self.lights.set_mode_arrow(ArrowDirection::Up);
    }

    /// Sends arrows down the tree.
    pub fn arrow_down(&mut self) {
        self.lights.set_mode_arrow(ArrowDirection::Down);
    }

    /// Toggles all LEDs and mirrors the state into the button template.
    pub fn on_off(&mut self) {
        let on = self.lights.toggle_on_off();
        self.templates.set_template(ON_OFF_BTN_STATE, button_state(on));
    }

    /// Cycles to the next mode.
    pub fn next(&mut self) {
        self.lights.set_next_mode();
    }

    /// Speeds the pattern up.
    pub fn plus(&mut self) {
        self.lights.increase_speed();
    }

    /// Slows the pattern down.
    pub fn minus(&mut self) {
        self.lights.decrease_speed();
    }

    /// Speeds the melody up.
    pub fn faster(&mut self) {
        self.player.increase_tempo();
    }

    /// Slows the melody down.
    pub fn slower(&mut self) {
        self.player.decrease_tempo();
    }

    /// Sets the melody tempo in milliseconds. Negative values count as zero
    /// and end up at the fastest tempo.
    pub fn tempo(&mut self, millis: i32) {
        self.player.set_tempo(u32::try_from(millis).unwrap_or(0));
    }

    /// Plays built-in tune `index`. Negative values select the first tune.
    pub fn play(&mut self, index: i32) {
        let index = usize::try_from(index).unwrap_or(0);
        let Some(tokens) = tunes::tune(index) else {
            warn!("no tune {}", index);
            return;
        };

        match Melody::from_tokens(tokens) {
            Ok(melody) => self.player.play(melody, None),
            Err(_) => error!("tune {} exceeds the melody queue", index),
        }
    }

    /// Stops the melody.
    pub fn stop(&mut self) {
        self.player.stop();
    }

    /// Returns the light show.
    pub fn lights(&self) -> &LightShow<P> {
        &self.lights
    }

    /// Returns the light show mutably.
    pub fn lights_mut(&mut self) -> &mut LightShow<P> {
        &mut self.lights
    }

    /// Returns the melody player.
    pub fn player(&self) -> &MelodyPlayer<B, MELODY_CAPACITY> {
        &self.player
    }

    /// Returns the melody player mutably.
    pub fn player_mut(&mut self) -> &mut MelodyPlayer<B, MELODY_CAPACITY> {
        &mut self.player
    }

    /// Touch button settings the device was configured with.
    pub fn touch_config(&self) -> TouchConfig {
        self.touch
    }

    /// Returns the template sink.
    pub fn templates(&self) -> &S {
        &self.templates
    }
}

fn button_state(on: bool) -> &'static str {
    if on { BTN_ON } else { BTN_OFF }
}
