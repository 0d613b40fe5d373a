#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`OperatingMode`**: The active animation (`Larson`, spin, arrow or all-on/off)
//! - **`LightShow`**: Renders the active mode onto the LED PWM channels, one frame per tick
//! - **`PwmOutputs`**: Trait to implement for your LED PWM hardware
//! - **`Melody`** / **`Token`**: A queue of notes, rests, octave shifts and length prefixes
//! - **`MelodyPlayer`**: Plays a melody on a buzzer, one token per tick
//! - **`ToneOutput`**: Trait to implement for your buzzer
//! - **`CommandTable`**: Maps remote command names to actions
//! - **`TouchButtons`** / **`TouchSensor`**: Capacitive buttons bound to actions
//! - **`Tannenbaum`**: The whole tree, the context every command runs on
//! - **`Controller`**: Drives the tree from a `TimeSource`, touch pads and requests
//!
//! Duty levels are written as raw PWM values; the stock tree is wired
//! active-low, so `0` is fully on.

#[macro_use]
mod fmt;

pub mod config;
pub mod controller;
pub mod device;
pub mod layout;
pub mod lights;
pub mod melody;
pub mod pattern;
pub mod player;
pub mod router;
pub mod schedule;
pub mod template;
pub mod time;
pub mod touch;
pub mod tunes;

pub use config::{DeviceConfig, LightConfig, MelodyConfig, TouchConfig};
pub use controller::{Controller, SetupError};
pub use device::{Commands, MELODY_CAPACITY, Tannenbaum};
pub use layout::{ArrowDirection, ChannelLayout, OperatingMode, Pin, PwmChannel, SpinDirection};
pub use lights::{LightShow, PwmOutputs};
pub use melody::{Melody, MelodyError, NoteLength, Pitch, Token};
pub use pattern::{DutyLevels, Level, PatternPhase, Sweep};
pub use player::{MelodyPlayer, Note, PlayerState, ToneOutput};
pub use router::{CommandTable, Handler, RouterError};
pub use schedule::{Interval, Periodic, Ticker};
pub use template::{TemplateMap, TemplateSink};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use touch::{ButtonId, Pad, TouchButtons, TouchError, TouchSensor};
