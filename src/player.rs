//! Monophonic melody sequencer.
//!
//! Provides [`MelodyPlayer`], which consumes a [`Melody`] one token per tick
//! and drives a buzzer through the [`ToneOutput`] trait.

use crate::config::MelodyConfig;
use crate::melody::{MAX_OCTAVE, Melody, NoteLength, Pitch, Token};
use crate::schedule::{Interval, Periodic};

/// Trait for abstracting the buzzer hardware.
///
/// Implementations typically drive a PWM unit at the requested frequency and
/// attach or detach the buzzer pin. Neither method can fail.
pub trait ToneOutput {
    /// Starts (or restarts) a square wave at `frequency_hz`.
    fn start_tone(&mut self, frequency_hz: u32);

    /// Silences the output.
    fn stop_tone(&mut self);
}

/// A pitch in a specific octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Note {
    pub pitch: Pitch,
    pub octave: u8,
}

impl Note {
    /// Frequency of the note in Hz.
    pub fn frequency_hz(self) -> u32 {
        self.pitch.frequency_hz(self.octave)
    }
}

/// The current state of a melody player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayerState {
    /// Nothing queued. The buzzer is silent.
    Idle,
    /// A melody is being played.
    Playing,
}

/// Plays melodies on a buzzer, one token per tick.
///
/// The tick length is the base tempo unless a melody was started with its own
/// tempo, which lasts until that melody ends. Length prefixes hold a note for
/// additional ticks; octave shifts persist until the next `play`.
///
/// # Type Parameters
/// * `B` - Buzzer implementation type
/// * `N` - Maximum number of tokens in a melody
pub struct MelodyPlayer<B: ToneOutput, const N: usize> {
    buzzer: B,
    config: MelodyConfig,
    queue: Melody<N>,
    state: PlayerState,
    hold: u8,
    octave: u8,
    base_tempo: Interval,
    tempo_override: Option<Interval>,
    current_note: Option<Note>,
    reschedule: bool,
}

impl<B: ToneOutput, const N: usize> MelodyPlayer<B, N> {
    /// Creates an idle player with the buzzer silenced.
    pub fn new(mut buzzer: B, config: MelodyConfig) -> Self {
        buzzer.stop_tone();

        Self {
            buzzer,
            base_tempo: config
                .base_tempo
                .clamped(config.min_tempo, config.max_tempo),
            octave: config.start_octave.min(MAX_OCTAVE),
            config,
            queue: Melody::new(),
            state: PlayerState::Idle,
            hold: 0,
            tempo_override: None,
            current_note: None,
            reschedule: true,
        }
    }

    /// Replaces whatever is playing with `melody`.
    ///
    /// With `tempo` set, the melody plays at that tick length and the base
    /// tempo is restored when it ends. Octave and hold state start fresh.
    /// An empty melody leaves the player idle.
    pub fn play(&mut self, melody: Melody<N>, tempo: Option<Interval>) {
        self.start(melody, tempo, self.config.start_octave);
    }

    /// Plays a single note of the given length.
    pub fn play_note(&mut self, pitch: Pitch, length: NoteLength, octave: u8) {
        let mut melody = Melody::new();
        if melody.push(Token::Length(length)).is_err() || melody.push(Token::Note(pitch)).is_err() {
            warn!("melody queue too small for a single note");
        }
        self.start(melody, None, octave);
    }

    fn start(&mut self, melody: Melody<N>, tempo: Option<Interval>, octave: u8) {
        self.silence();
        self.queue = melody;
        self.hold = 0;
        self.octave = octave.min(MAX_OCTAVE);
        self.tempo_override = tempo;
        self.reschedule = true;

        if self.queue.is_empty() {
            self.finish();
            return;
        }

        debug!("playing {} melody tokens", self.queue.len());
        self.state = PlayerState::Playing;
    }

    /// Stops playback, drops the queue and silences the buzzer.
    pub fn stop(&mut self) {
        self.queue.clear();
        self.hold = 0;
        self.finish();
    }

    /// Halves the base tempo down to the configured minimum.
    ///
    /// Cancels a per-melody tempo so the change is audible immediately.
    pub fn increase_tempo(&mut self) {
        self.set_base_tempo(self.base_tempo.halved(self.config.min_tempo));
    }

    /// Doubles the base tempo up to the configured maximum.
    ///
    /// Cancels a per-melody tempo so the change is audible immediately.
    pub fn decrease_tempo(&mut self) {
        self.set_base_tempo(self.base_tempo.doubled(self.config.max_tempo));
    }

    /// Sets the base tempo in milliseconds, clamped to the configured range.
    pub fn set_tempo(&mut self, millis: u32) {
        self.set_base_tempo(
            Interval::from_millis(millis).clamped(self.config.min_tempo, self.config.max_tempo),
        );
    }

    fn set_base_tempo(&mut self, tempo: Interval) {
        self.base_tempo = tempo;
        self.tempo_override = None;
        self.reschedule = true;
        debug!("melody tempo {} ms", tempo.millis());
    }

    /// Advances playback by one tick.
    ///
    /// Holds the current note while its length lasts, then consumes control
    /// tokens up to the next note or rest and sounds it. Running out of
    /// tokens silences the buzzer and returns to `Idle`.
    ///
    /// The last note keeps sounding for its full length, so the player only
    /// goes idle on the tick after it: `[C, D, E]` sounds on ticks one to
    /// three, is silenced on the fourth, and later ticks do nothing.
    pub fn advance_tick(&mut self) {
        if self.state == PlayerState::Idle {
            return;
        }

        if self.hold > 0 {
            self.hold -= 1;
            return;
        }

        let mut length = self.config.default_length;
        loop {
            let Some(token) = self.queue.pop() else {
                self.finish();
                return;
            };

            match token {
                Token::OctaveUp => self.octave = (self.octave + 1).min(MAX_OCTAVE),
                Token::OctaveDown => self.octave = self.octave.saturating_sub(1),
                Token::Length(next) => length = next,
                Token::Rest => {
                    self.hold = length.hold_ticks();
                    self.silence();
                    return;
                }
                Token::Note(pitch) => {
                    self.hold = length.hold_ticks();
                    self.sound(Note {
                        pitch,
                        octave: self.octave,
                    });
                    return;
                }
            }
        }
    }

    fn sound(&mut self, note: Note) {
        if self.current_note == Some(note) && !self.config.retrigger_repeats {
            return;
        }
        trace!("tone {} Hz", note.frequency_hz());
        self.buzzer.start_tone(note.frequency_hz());
        self.current_note = Some(note);
    }

    fn silence(&mut self) {
        if self.current_note.take().is_some() {
            self.buzzer.stop_tone();
        }
    }

    fn finish(&mut self) {
        self.silence();
        if self.state == PlayerState::Playing {
            debug!("melody finished");
        }
        self.state = PlayerState::Idle;
        if self.tempo_override.take().is_some() {
            self.reschedule = true;
        }
    }

    /// Returns the current state of the player.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Returns true while a melody is playing.
    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// The note currently sounding, if any.
    pub fn current_note(&self) -> Option<Note> {
        self.current_note
    }

    /// Current octave.
    pub fn octave(&self) -> u8 {
        self.octave
    }

    /// Base tick length.
    pub fn tempo(&self) -> Interval {
        self.base_tempo
    }

    /// Tick length for the melody playing right now.
    pub fn effective_tempo(&self) -> Interval {
        self.tempo_override.unwrap_or(self.base_tempo)
    }

    /// Number of tokens left in the queue.
    pub fn remaining_tokens(&self) -> usize {
        self.queue.len()
    }

    /// Returns a reference to the buzzer.
    pub fn buzzer(&self) -> &B {
        &self.buzzer
    }
}

impl<B: ToneOutput, const N: usize> Periodic for MelodyPlayer<B, N> {
    fn interval(&self) -> Interval {
        self.effective_tempo()
    }

    fn advance_tick(&mut self) {
        MelodyPlayer::advance_tick(self);
    }

    fn take_reschedule(&mut self) -> bool {
        core::mem::take(&mut self.reschedule)
    }
}
