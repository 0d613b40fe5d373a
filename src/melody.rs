//! Melody notation.
//!
//! A [`Melody`] is a queue of [`Token`]s consumed from the front by the
//! [`MelodyPlayer`](crate::player::MelodyPlayer). Besides sounding notes and
//! rests it contains control tokens: octave shifts, which persist, and length
//! prefixes, which apply to the next note or rest only.
//!
//! The [`notation`] module has short constants for writing melodies inline.

use core::fmt;
use heapless::Deque;

/// One of the twelve chromatic pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pitch {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

/// Equal-tempered frequencies of octave 8, C8 to B8, in Hz.
const OCTAVE_8_HZ: [u32; 12] = [
    4186, 4435, 4699, 4978, 5274, 5588, 5920, 6272, 6645, 7040, 7459, 7902,
];

/// Highest octave with an exact table entry.
pub const MAX_OCTAVE: u8 = 8;

impl Pitch {
    pub const DB: Pitch = Pitch::Cs;
    pub const EB: Pitch = Pitch::Ds;
    pub const GB: Pitch = Pitch::Fs;
    pub const AB: Pitch = Pitch::Gs;
    pub const BB: Pitch = Pitch::As;

    /// Semitone index above C.
    pub fn semitone(self) -> u8 {
        self as u8
    }

    /// Frequency in Hz at `octave` (scientific pitch notation, A4 = 440 Hz).
    ///
    /// Octaves above [`MAX_OCTAVE`] are treated as [`MAX_OCTAVE`].
    pub fn frequency_hz(self, octave: u8) -> u32 {
        let octave = octave.min(MAX_OCTAVE);
        OCTAVE_8_HZ[self as usize] >> (MAX_OCTAVE - octave)
    }
}

/// Relative length of a note or rest.
///
/// Lengths are counted in player ticks: a sixteenth lasts one tick, every
/// longer length doubles the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NoteLength {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
}

impl NoteLength {
    /// Number of ticks a note of this length sounds.
    pub fn ticks(self) -> u8 {
        match self {
            NoteLength::Whole => 16,
            NoteLength::Half => 8,
            NoteLength::Quarter => 4,
            NoteLength::Eighth => 2,
            NoteLength::Sixteenth => 1,
        }
    }

    /// Ticks the note is held after the tick that starts it.
    pub fn hold_ticks(self) -> u8 {
        self.ticks() - 1
    }
}

/// A single melody symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Token {
    /// Sound a pitch in the current octave.
    Note(Pitch),
    /// Silence.
    Rest,
    /// Raise the octave for all following notes.
    OctaveUp,
    /// Lower the octave for all following notes.
    OctaveDown,
    /// Length of the next note or rest.
    Length(NoteLength),
}

impl Token {
    /// Returns true for tokens that produce sound or silence.
    pub fn is_sounding(self) -> bool {
        matches!(self, Token::Note(_) | Token::Rest)
    }
}

/// Melody construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MelodyError {
    /// More tokens than the queue can hold.
    CapacityExceeded,
}

impl fmt::Display for MelodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MelodyError::CapacityExceeded => write!(f, "melody capacity exceeded"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MelodyError {}

/// A finite queue of melody tokens holding at most `N` entries.
#[derive(Debug, Clone)]
pub struct Melody<const N: usize> {
    tokens: Deque<Token, N>,
}

impl<const N: usize> Melody<N> {
    /// Creates an empty melody.
    pub fn new() -> Self {
        Self {
            tokens: Deque::new(),
        }
    }

    /// Copies `tokens` into a new melody.
    ///
    /// # Errors
    /// * `CapacityExceeded` - more than `N` tokens
    pub fn from_tokens(tokens: &[Token]) -> Result<Self, MelodyError> {
        let mut melody = Self::new();
        for &token in tokens {
            melody.push(token)?;
        }
        Ok(melody)
    }

    /// Appends a token.
    ///
    /// # Errors
    /// * `CapacityExceeded` - the melody is full
    pub fn push(&mut self, token: Token) -> Result<(), MelodyError> {
        self.tokens
            .push_back(token)
            .map_err(|_| MelodyError::CapacityExceeded)
    }

    /// Removes and returns the first token.
    pub fn pop(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// Drops every token.
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Number of remaining tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no tokens remain.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterates over the remaining tokens front to back.
    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }
}

impl<const N: usize> Default for Melody<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Short names for writing melodies as token slices.
///
/// ```
/// use tannenbaum::melody::notation::*;
/// use tannenbaum::melody::Token;
///
/// let scale: &[Token] = &[L8, C, D, E, F, G, A, B, O_UP, L4, C];
/// assert_eq!(scale.len(), 11);
/// ```
pub mod notation {
    use super::{NoteLength, Pitch, Token};

    pub const C: Token = Token::Note(Pitch::C);
    pub const CS: Token = Token::Note(Pitch::Cs);
    pub const DB: Token = Token::Note(Pitch::DB);
    pub const D: Token = Token::Note(Pitch::D);
    pub const DS: Token = Token::Note(Pitch::Ds);
    pub const EB: Token = Token::Note(Pitch::EB);
    pub const E: Token = Token::Note(Pitch::E);
    pub const F: Token = Token::Note(Pitch::F);
    pub const FS: Token = Token::Note(Pitch::Fs);
    pub const GB: Token = Token::Note(Pitch::GB);
    pub const G: Token = Token::Note(Pitch::G);
    pub const GS: Token = Token::Note(Pitch::Gs);
    pub const AB: Token = Token::Note(Pitch::AB);
    pub const A: Token = Token::Note(Pitch::A);
    pub const AS: Token = Token::Note(Pitch::As);
    pub const BB: Token = Token::Note(Pitch::BB);
    pub const B: Token = Token::Note(Pitch::B);

    /// Rest.
    pub const P: Token = Token::Rest;

    pub const O_UP: Token = Token::OctaveUp;
    pub const O_DOWN: Token = Token::OctaveDown;

    pub const L1: Token = Token::Length(NoteLength::Whole);
    pub const L2: Token = Token::Length(NoteLength::Half);
    pub const L4: Token = Token::Length(NoteLength::Quarter);
    pub const L8: Token = Token::Length(NoteLength::Eighth);
    pub const L16: Token = Token::Length(NoteLength::Sixteenth);
}

#[cfg(test)]
mod tests {
    use super::notation::*;
    use super::*;

    #[test]
    fn concert_pitch_is_440_hz() {
        assert_eq!(Pitch::A.frequency_hz(4), 440);
        assert_eq!(Pitch::A.frequency_hz(5), 880);
        assert_eq!(Pitch::C.frequency_hz(4), 261);
    }

    #[test]
    fn octaves_above_table_saturate() {
        assert_eq!(Pitch::B.frequency_hz(12), Pitch::B.frequency_hz(MAX_OCTAVE));
    }

    #[test]
    fn lengths_keep_doubling_ratio() {
        let lengths = [
            NoteLength::Sixteenth,
            NoteLength::Eighth,
            NoteLength::Quarter,
            NoteLength::Half,
            NoteLength::Whole,
        ];
        for pair in lengths.windows(2) {
            assert_eq!(pair[1].ticks(), pair[0].ticks() * 2);
        }
        assert_eq!(NoteLength::Sixteenth.hold_ticks(), 0);
        assert_eq!(NoteLength::Whole.hold_ticks(), 15);
    }

    #[test]
    fn from_tokens_rejects_overflow() {
        let result = Melody::<2>::from_tokens(&[C, D, E]);
        assert_eq!(result.unwrap_err(), MelodyError::CapacityExceeded);
    }

    #[test]
    fn tokens_pop_in_order() {
        let mut melody = Melody::<4>::from_tokens(&[L4, C, P]).unwrap();
        assert_eq!(melody.len(), 3);
        assert_eq!(melody.pop(), Some(L4));
        assert_eq!(melody.pop(), Some(C));
        assert_eq!(melody.pop(), Some(P));
        assert!(melody.is_empty());
        assert_eq!(melody.pop(), None);
    }
}
