//! Operating modes and their physical channel layouts.
//!
//! The tree carries twelve LEDs: five on each flank (bottom to top), a
//! square one at the top and the round crown. Depending on the mode, pins
//! are grouped onto logical PWM channels differently:
//!
//! - [`ChannelLayout::Ladder`]: seven tiers bottom to top, flank pairs share a channel.
//! - [`ChannelLayout::Ring`]: twelve channels around the outline, left flank up, right flank down.
//! - [`ChannelLayout::Single`]: every pin on channel 0.

/// A GPIO pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pin(pub u8);

/// A PWM unit driving one logical channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmChannel(pub u8);

impl From<PwmChannel> for usize {
    fn from(channel: PwmChannel) -> Self {
        channel.0 as usize
    }
}

/// Attachment of one pin to one PWM channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Binding {
    pub pin: Pin,
    pub channel: PwmChannel,
}

const fn bind(pin: u8, channel: u8) -> Binding {
    Binding {
        pin: Pin(pin),
        channel: PwmChannel(channel),
    }
}

/// Number of LED PWM channels the tree uses at most.
pub const MAX_CHANNELS: usize = 12;

/// Every LED pin on the tree.
pub const LED_PINS: [Pin; MAX_CHANNELS] = [
    Pin(32),
    Pin(33),
    Pin(25),
    Pin(26),
    Pin(27),
    Pin(4),
    Pin(14),
    Pin(16),
    Pin(17),
    Pin(18),
    Pin(19),
    Pin(21),
];

const LADDER: [Binding; MAX_CHANNELS] = [
    bind(32, 0), // left, bottom
    bind(21, 0), // right, bottom
    bind(33, 1),
    bind(19, 1),
    bind(25, 2),
    bind(18, 2),
    bind(26, 3),
    bind(17, 3),
    bind(27, 4), // left, topmost
    bind(16, 4), // right, topmost
    bind(4, 5),  // square top
    bind(14, 6), // crown
];

const RING: [Binding; MAX_CHANNELS] = [
    bind(32, 0),
    bind(33, 1),
    bind(25, 2),
    bind(26, 3),
    bind(27, 4),
    bind(4, 5),
    bind(14, 6),
    bind(16, 7),
    bind(17, 8),
    bind(18, 9),
    bind(19, 10),
    bind(21, 11),
];

const SINGLE: [Binding; MAX_CHANNELS] = [
    bind(32, 0),
    bind(21, 0),
    bind(33, 0),
    bind(19, 0),
    bind(25, 0),
    bind(18, 0),
    bind(26, 0),
    bind(17, 0),
    bind(27, 0),
    bind(16, 0),
    bind(4, 0),
    bind(14, 0),
];

/// How pins are grouped onto logical channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelLayout {
    /// Seven tiers from bottom to crown.
    Ladder,
    /// Twelve positions around the outline.
    Ring,
    /// One channel for everything.
    Single,
}

impl ChannelLayout {
    /// Pin to channel bindings for this layout.
    pub fn bindings(self) -> &'static [Binding] {
        match self {
            ChannelLayout::Ladder => &LADDER,
            ChannelLayout::Ring => &RING,
            ChannelLayout::Single => &SINGLE,
        }
    }

    /// Number of logical channels.
    pub fn channel_count(self) -> usize {
        match self {
            ChannelLayout::Ladder => 7,
            ChannelLayout::Ring => MAX_CHANNELS,
            ChannelLayout::Single => 1,
        }
    }
}

/// Rotation direction for the spin modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpinDirection {
    /// Up the left flank, down the right one.
    Right,
    /// Up the right flank, down the left one.
    Left,
}

/// Travel direction for the arrow modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ArrowDirection {
    /// Bottom to crown.
    Up,
    /// Crown to bottom.
    Down,
}

/// The active animation of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// A dim-bright-dim spot bouncing between bottom and crown.
    #[default]
    Larson,
    /// The spot circling the outline clockwise.
    SpinRight,
    /// The spot circling the outline counter-clockwise.
    SpinLeft,
    /// The spot rising through the tiers, leaving at the crown.
    ArrowUp,
    /// The spot falling through the tiers, leaving at the bottom.
    ArrowDown,
    /// Every LED on or off together.
    AllOnOff,
}

impl OperatingMode {
    /// All modes in cycling order.
    pub const ALL: [OperatingMode; 6] = [
        OperatingMode::Larson,
        OperatingMode::SpinRight,
        OperatingMode::SpinLeft,
        OperatingMode::ArrowUp,
        OperatingMode::ArrowDown,
        OperatingMode::AllOnOff,
    ];

    /// Spin mode for a direction.
    pub fn spin(direction: SpinDirection) -> Self {
        match direction {
            SpinDirection::Right => OperatingMode::SpinRight,
            SpinDirection::Left => OperatingMode::SpinLeft,
        }
    }

    /// Arrow mode for a direction.
    pub fn arrow(direction: ArrowDirection) -> Self {
        match direction {
            ArrowDirection::Up => OperatingMode::ArrowUp,
            ArrowDirection::Down => OperatingMode::ArrowDown,
        }
    }

    /// The mode following this one in [`ALL`](Self::ALL), wrapping around.
    pub fn next(self) -> Self {
        match self {
            OperatingMode::Larson => OperatingMode::SpinRight,
            OperatingMode::SpinRight => OperatingMode::SpinLeft,
            OperatingMode::SpinLeft => OperatingMode::ArrowUp,
            OperatingMode::ArrowUp => OperatingMode::ArrowDown,
            OperatingMode::ArrowDown => OperatingMode::AllOnOff,
            OperatingMode::AllOnOff => OperatingMode::Larson,
        }
    }

    /// Channel layout the mode renders onto.
    pub fn layout(self) -> ChannelLayout {
        match self {
            OperatingMode::Larson | OperatingMode::ArrowUp | OperatingMode::ArrowDown => {
                ChannelLayout::Ladder
            }
            OperatingMode::SpinRight | OperatingMode::SpinLeft => ChannelLayout::Ring,
            OperatingMode::AllOnOff => ChannelLayout::Single,
        }
    }
}
