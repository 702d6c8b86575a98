//! # Typewriter
//!
//! Human-paced streaming article renderer on top of the Google Gemini API.
//!
//! Text fragments streamed from a generative model are typed out one
//! character at a time with a live-adjustable speed, and the growing
//! document is re-rendered from markdown to HTML at natural breaks and
//! word-chunk boundaries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use integrations_typewriter::prompt::ArticlePrompt;
//! use integrations_typewriter::{RenderState, TypewriterConfig, TypingRenderer};
//! use secrecy::SecretString;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TypewriterConfig::builder()
//!         .api_key(SecretString::new("your-api-key".into()))
//!         .typing_speed_ms(30.0)
//!         .build()?;
//!     let renderer = TypingRenderer::from_config(config)?;
//!
//!     let prompt = ArticlePrompt::new("Why cats knock things over")?;
//!     let mut snapshots = renderer.stream(prompt.into_prompt(), CancellationToken::new());
//!     while let Some(snapshot) = snapshots.next().await {
//!         if let RenderState::Failed(error) = &snapshot.state {
//!             eprintln!("generation failed: {error}");
//!         }
//!         println!("{}", snapshot.markup);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `typing` - pacing rules, typing session and the renderer
//! - `source` - text sources (`TextSource`, `GeminiTextSource`)
//! - `format` - markdown formatting (`MarkdownFormatter`, `PulldownFormatter`)
//! - `prompt` - article prompt composition
//! - `config` - client configuration and typing speed
//! - `auth`, `transport`, `streaming`, `types` - Gemini REST plumbing
//! - `error` - error types and HTTP status mapping
//! - `observability` - logging

pub mod auth;
pub mod config;
pub mod error;
pub mod format;
pub mod observability;
pub mod prompt;
pub mod source;
pub mod streaming;
pub mod transport;
pub mod types;
pub mod typing;

// Test doubles, always available for integration tests
pub mod mocks;

pub use config::{
    AuthMethod, LogLevel, SpeedPreset, TypewriterConfig, TypewriterConfigBuilder, TypingSpeed,
    DEFAULT_API_VERSION, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TYPING_SPEED_MS,
};
pub use error::{TypewriterError, TypewriterResult};
pub use format::{FormatError, MarkdownFormatter, PulldownFormatter};
pub use prompt::{ArticlePrompt, ArticleStyle};
pub use source::{GeminiTextSource, Prompt, TextSource};
pub use typing::{RenderOutcome, RenderSnapshot, RenderState, RenderStream, TypingRenderer};
