//! Logging for the typewriter.
//!
//! Components log through the [`Logger`] trait; the renderer additionally
//! opens a `tracing` span per generation carrying a generation id.

pub mod logging;

pub use logging::{LogFormat, Logger, LoggingConfig, NoopLogger, StructuredLogger};
