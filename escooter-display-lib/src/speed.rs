//! Speed to sequence transform.
//!
//! The display does not take a speed. It takes a 16-bit "sequence" value and renders
//! `2236 / sequence`, truncated past the first decimal. The transform below picks the
//! sequence whose rendering lands on the requested tenth as often as possible.
//!
//! The mapping is lossy and gets worse towards higher speeds: neighbouring tenths share a
//! sequence, so the display skips values. Nothing between 0 and 1 can be shown, and 97.2
//! is the highest reading reachable through the formula.

use crate::constants::{SPEED_EPSILON, SPEED_NUMERATOR, SPEED_STEP};

/// Sequence values below 12 do not follow `2236 / sequence`. The display was observed
/// to render these readings for them instead.
pub const EXTRA_SEQUENCES: [(u16, f64); 8] = [
    (2, 94.1),
    (3, 73.4),
    (4, 47.0),
    (5, 31.2),
    (7, 63.4),
    (9, 88.4),
    (10, 63.6),
    (11, 43.3),
];

/// Convert a speed in display units to the transmitted sequence value.
///
/// The speed is quantized to the nearest tenth, biased by [`SPEED_EPSILON`], and the
/// rounded quotient `2236 / q` is truncated to 16 bits. Negative or huge inputs are not
/// rejected; they wrap like the integer casts they pass through.
pub fn speed_to_sequence(speed: f64) -> u16 {
    let tenths = (speed / SPEED_STEP + 0.5) as i32;
    let quantized = f64::from(tenths) * SPEED_STEP + SPEED_EPSILON;
    let sequence = (SPEED_NUMERATOR / quantized + 0.5) as i32;
    sequence as u16
}

/// The reading the display shows for a sequence value, or `None` for 0.
///
/// Models the device's float arithmetic only: see [`EXTRA_SEQUENCES`] for the small
/// sequences where the hardware disagrees.
pub fn displayed_speed(sequence: u16) -> Option<f64> {
    if sequence == 0 {
        return None;
    }
    let raw = SPEED_NUMERATOR / f64::from(sequence);
    Some((raw * 10.0).floor() / 10.0)
}

/// Observed reading for one of the irregular small sequences.
pub fn observed_speed(sequence: u16) -> Option<f64> {
    EXTRA_SEQUENCES
        .iter()
        .find(|(seq, _)| *seq == sequence)
        .map(|(_, speed)| *speed)
}

/// What the hardware actually shows: the observed reading where one is known, the
/// formula otherwise.
pub fn rendered_speed(sequence: u16) -> Option<f64> {
    observed_speed(sequence).or_else(|| displayed_speed(sequence))
}
