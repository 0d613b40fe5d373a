//! Built-in melodies.

use crate::melody::Token;
use crate::melody::notation::*;

/// "O Tannenbaum", first phrase.
pub const O_TANNENBAUM: &[Token] = &[
    L4, C, L4, F, L8, F, L8, F, L4, G, //
    L4, A, L8, A, L8, A, L4, A, //
    L4, G, L4, A, L4, BB, //
    L4, E, L4, G, L2, F, //
    L4, P,
];

/// "Jingle Bells", refrain.
pub const JINGLE_BELLS: &[Token] = &[
    L4, E, L4, E, L2, E, //
    L4, E, L4, E, L2, E, //
    L4, E, L4, G, L4, C, L4, D, //
    L1, E, //
    L4, F, L4, F, L4, F, L4, F, //
    L4, F, L4, E, L4, E, L4, E, //
    L4, E, L4, D, L4, D, L4, E, //
    L2, D, L2, G, //
    L4, P,
];

/// A rising C major scale, handy for checking the buzzer.
pub const SCALE: &[Token] = &[L8, C, L8, D, L8, E, L8, F, L8, G, L8, A, L8, B, O_UP, L4, C];

/// All built-in tunes, selectable by index.
pub const TUNES: [&[Token]; 3] = [O_TANNENBAUM, JINGLE_BELLS, SCALE];

/// Returns tune `index`, if it exists.
pub fn tune(index: usize) -> Option<&'static [Token]> {
    TUNES.get(index).copied()
}
