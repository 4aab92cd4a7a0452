//! Pitch helpers for note entry

use std::cmp::Reverse;

/// Pitch classes of the natural notes C D E F G A B
const NATURALS: [u8; 7] = [0, 2, 4, 5, 7, 9, 11];

/// Diatonic degrees (0 = C) in the order sharps are added: F C G D A E B
const SHARP_ORDER: [u8; 7] = [3, 0, 4, 1, 5, 2, 6];

/// Diatonic degrees in the order flats are added: B E A D G C F
const FLAT_ORDER: [u8; 7] = [6, 2, 5, 1, 4, 0, 3];

/// Pitch class (0-11) of diatonic degree `diatonic` (0 = C .. 6 = B) in a key
/// with `key` sharps (positive) or flats (negative).
pub fn chromatic_from_diatonic_in_key(diatonic: u8, key: i8) -> u8 {
    let degree = diatonic % 7;
    let natural = NATURALS[degree as usize] as i16;
    let accidentals = key.unsigned_abs().min(7) as usize;

    let shift = if key > 0 && SHARP_ORDER[..accidentals].contains(&degree) {
        1
    } else if key < 0 && FLAT_ORDER[..accidentals].contains(&degree) {
        -1
    } else {
        0
    };

    (natural + shift).rem_euclid(12) as u8
}

/// Replace the pitch class of `note`, keeping its octave. Above the MIDI
/// range the note drops an octave instead.
pub fn set_note_chromatic(note: u8, chromatic: u8) -> u8 {
    let candidate = (note / 12) as u16 * 12 + (chromatic % 12) as u16;
    if candidate > 127 { (candidate - 12) as u8 } else { candidate as u8 }
}

/// Move `note` by whole octaves to the position closest to `reference`,
/// preferring the higher octave on a tie
pub fn match_note_octave(note: u8, reference: u8) -> u8 {
    (note % 12..=127)
        .step_by(12)
        .min_by_key(|&candidate| ((candidate as i16 - reference as i16).abs(), Reverse(candidate)))
        .unwrap_or(note)
}
