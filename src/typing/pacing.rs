//! Pacing rules for simulated typing.
//!
//! Pure functions of the current character and the live speed; nothing here
//! holds state between characters.

use std::time::Duration;

use rand::Rng;

use crate::config::sanitize_speed;

/// Smallest forced-chunk threshold, in characters.
pub const MIN_CHUNK_SIZE: usize = 2;

/// Largest forced-chunk threshold, in characters.
pub const MAX_CHUNK_SIZE: usize = 5;

/// Numerator of the chunk-size formula `round(150 / speed)`.
const CHUNK_SIZE_SCALE: f64 = 150.0;

/// Floor applied to every per-character delay, in milliseconds.
pub const MIN_CHAR_DELAY_MS: f64 = 20.0;

/// Jitter samples fall in `[-JITTER_MS, JITTER_MS)`.
pub const JITTER_MS: i32 = 15;

/// Whitespace or sentence/clause punctuation.
pub fn is_natural_break(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?' | ';' | ':' | '(' | ')')
}

/// Word-buffer length that forces a render, for a speed in ms per character.
///
/// `clamp(round(150 / speed), 2, 5)`: slower typing (more ms) renders in
/// smaller chunks.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn chunk_size(speed_ms: f64) -> usize {
    let raw = (CHUNK_SIZE_SCALE / sanitize_speed(speed_ms)).round();
    raw.clamp(MIN_CHUNK_SIZE as f64, MAX_CHUNK_SIZE as f64) as usize
}

/// Extra pause after a character, in milliseconds.
pub fn pause_bonus_ms(c: char) -> f64 {
    match c {
        '.' | '!' | '?' => 200.0,
        ',' => 100.0,
        '\n' => 150.0,
        _ => 0.0,
    }
}

/// Delay to wait after typing `c`, at microsecond precision.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn char_delay(c: char, speed_ms: f64, jitter_ms: i32) -> Duration {
    let millis = (sanitize_speed(speed_ms) + pause_bonus_ms(c) + f64::from(jitter_ms))
        .max(MIN_CHAR_DELAY_MS);
    Duration::from_micros((millis * 1000.0).round() as u64)
}

/// Source of per-character delay jitter.
pub trait Jitter: Send + Sync {
    /// A jitter offset in whole milliseconds.
    fn sample(&self) -> i32;
}

/// Uniform jitter in `[-JITTER_MS, JITTER_MS)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl Jitter for RandomJitter {
    fn sample(&self) -> i32 {
        rand::thread_rng().gen_range(-JITTER_MS..JITTER_MS)
    }
}

/// Constant jitter, for reproducible pacing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub i32);

impl Jitter for FixedJitter {
    fn sample(&self) -> i32 {
        self.0
    }
}
