//! Live typing speed control.
//!
//! A [`TypingSpeed`] is a cloneable handle over one shared value. Every clone
//! observes [`TypingSpeed::set`] immediately, so a renderer that re-reads the
//! handle per character picks up speed changes mid-stream.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{ConfigurationError, TypewriterError};

/// Default base delay per character, in milliseconds.
pub const DEFAULT_TYPING_SPEED_MS: f64 = 70.0;

/// Discrete speed presets offered to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SpeedPreset {
    /// 70ms per character.
    #[default]
    Expert,
    /// 30ms per character.
    Senior,
    /// 1ms per character.
    Master,
}

impl SpeedPreset {
    /// All presets, slowest first.
    pub const ALL: [SpeedPreset; 3] = [SpeedPreset::Expert, SpeedPreset::Senior, SpeedPreset::Master];

    /// Base delay for this preset in milliseconds.
    pub fn millis(self) -> f64 {
        match self {
            SpeedPreset::Expert => 70.0,
            SpeedPreset::Senior => 30.0,
            SpeedPreset::Master => 1.0,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            SpeedPreset::Expert => "Expert",
            SpeedPreset::Senior => "Senior",
            SpeedPreset::Master => "Master",
        }
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpeedPreset {
    type Err = TypewriterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SpeedPreset::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ConfigurationError::InvalidConfiguration {
                    message: format!("unknown speed preset: {s}"),
                }
                .into()
            })
    }
}

/// Returns `millis` if it is a usable speed, the default otherwise.
///
/// Zero, negative, NaN and infinite values all fall back silently.
pub fn sanitize_speed(millis: f64) -> f64 {
    if millis.is_finite() && millis > 0.0 {
        millis
    } else {
        DEFAULT_TYPING_SPEED_MS
    }
}

/// Shared, live typing speed in milliseconds per character.
#[derive(Clone)]
pub struct TypingSpeed {
    bits: Arc<AtomicU64>,
}

impl TypingSpeed {
    /// Create a new handle. Invalid values fall back to the default.
    pub fn new(millis: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(sanitize_speed(millis).to_bits())),
        }
    }

    /// Create a handle from a preset.
    pub fn from_preset(preset: SpeedPreset) -> Self {
        Self::new(preset.millis())
    }

    /// Current speed in milliseconds per character.
    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Update the speed for every clone of this handle.
    pub fn set(&self, millis: f64) {
        self.bits.store(sanitize_speed(millis).to_bits(), Ordering::Relaxed);
    }

    /// Update the speed from user input; anything non-numeric resets to the default.
    pub fn set_str(&self, raw: &str) {
        self.set(raw.trim().parse().unwrap_or(DEFAULT_TYPING_SPEED_MS));
    }

    /// Update the speed from a preset.
    pub fn set_preset(&self, preset: SpeedPreset) {
        self.set(preset.millis());
    }
}

impl Default for TypingSpeed {
    fn default() -> Self {
        Self::new(DEFAULT_TYPING_SPEED_MS)
    }
}

impl fmt::Debug for TypingSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypingSpeed").field(&self.get()).finish()
    }
}
