//! Quarter-turn rotation of piece masks.

use cartography_core::PieceMask;

/// Normalizes an arbitrary turn count into `0..4` clockwise quarter turns.
#[must_use]
pub const fn normalize_turns(times: i32) -> u8 {
    times.rem_euclid(4) as u8
}

/// Rotates the mask clockwise by `times` quarter turns.
///
/// Negative counts rotate counter-clockwise; `-1` is equivalent to `3`.
/// Odd counts swap the mask's rows and columns.
#[must_use]
pub fn rotate(mask: &PieceMask, times: i32) -> PieceMask {
    let mut rotated = mask.clone();
    for _ in 0..normalize_turns(times) {
        rotated = rotated.quarter_turn();
    }
    rotated
}
