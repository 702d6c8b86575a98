//! Wire types for the Gemini content generation API.
//!
//! Only the subset needed to send a text (or inline-data) prompt and read
//! text back is modeled; unknown part kinds are preserved as raw JSON.

pub mod content;
pub mod generation;

pub use content::{Blob, Content, Part, Role};
pub use generation::{
    BlockReason, Candidate, FinishReason, GenerateContentRequest, GenerateContentResponse,
    GenerationConfig, PromptFeedback, UsageMetadata,
};
