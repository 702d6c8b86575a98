//! Typing simulation.
//!
//! - [`pacing`]: chunk threshold, natural breaks and per-character delay.
//! - [`TypingSession`]: render and word buffers of one generation.
//! - [`TypingRenderer`]: drives a [`crate::source::TextSource`] through a
//!   session, yielding formatted [`RenderSnapshot`]s.

pub mod pacing;
mod renderer;
mod session;

pub use pacing::{FixedJitter, Jitter, RandomJitter};
pub use renderer::{RenderOutcome, RenderSnapshot, RenderState, RenderStream, TypingRenderer};
pub use session::{Keystroke, TypingSession};
