//! Per-generation typing state.

use std::time::Duration;

use super::pacing::{char_delay, chunk_size, is_natural_break};

/// Result of typing one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    /// Whether the render buffer should be formatted and emitted now.
    pub render: bool,
    /// Whether the character was a natural break.
    pub natural_break: bool,
    /// Time to wait before the next character.
    pub delay: Duration,
}

/// Render and word buffers for a single generation.
///
/// The render buffer only ever grows. The word buffer collects characters
/// since the last natural break and is cleared only when a natural break
/// renders; a forced chunk render leaves it intact, so once a long word
/// crosses the threshold every following character of that word renders too.
#[derive(Debug, Default, Clone)]
pub struct TypingSession {
    render_buffer: String,
    word_buffer: String,
    word_chars: usize,
    typed: usize,
    renders: usize,
}

impl TypingSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Types one character at the given speed and jitter.
    pub fn type_char(&mut self, c: char, speed_ms: f64, jitter_ms: i32) -> Keystroke {
        self.render_buffer.push(c);
        self.word_buffer.push(c);
        self.word_chars += 1;
        self.typed += 1;

        let natural_break = is_natural_break(c);
        let render = natural_break || self.word_chars >= chunk_size(speed_ms);

        if render {
            self.renders += 1;
            if natural_break {
                self.word_buffer.clear();
                self.word_chars = 0;
            }
        }

        Keystroke {
            render,
            natural_break,
            delay: char_delay(c, speed_ms, jitter_ms),
        }
    }

    /// Everything typed so far.
    pub fn text(&self) -> &str {
        &self.render_buffer
    }

    /// Characters typed since the last natural break.
    pub fn word(&self) -> &str {
        &self.word_buffer
    }

    /// Number of characters typed.
    pub fn typed(&self) -> usize {
        self.typed
    }

    /// Number of keystrokes that triggered a render.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Consumes the session, returning the render buffer.
    pub fn into_text(self) -> String {
        self.render_buffer
    }
}
