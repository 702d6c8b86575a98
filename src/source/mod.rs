//! Text sources feeding the typing renderer.
//!
//! A [`TextSource`] produces either a lazy fragment stream or one complete
//! text for a [`Prompt`]. [`GeminiTextSource`] is the HTTP-backed
//! implementation; tests substitute [`crate::mocks::ScriptedTextSource`].

mod gemini;

use async_trait::async_trait;

use crate::error::{RequestError, TypewriterResult, ValidationDetail};
use crate::streaming::FragmentStream;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, Part};

pub use gemini::GeminiTextSource;

/// Producer of generated text.
#[async_trait]
pub trait TextSource: Send + Sync {
    /// Opens a fragment stream for `prompt`.
    ///
    /// Errors returned here mean the stream never opened; failures after
    /// that arrive as `Err` items on the stream.
    async fn stream_text(&self, prompt: &Prompt) -> TypewriterResult<FragmentStream>;

    /// Generates the whole text for `prompt` in one response.
    async fn complete_text(&self, prompt: &Prompt) -> TypewriterResult<String>;
}

/// A single-turn prompt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Prompt {
    parts: Vec<Part>,
    system_instruction: Option<String>,
    generation_config: Option<GenerationConfig>,
}

impl Prompt {
    /// A prompt holding one text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
            ..Self::default()
        }
    }

    /// A prompt from explicit parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    /// Appends a part.
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Sets a system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Sets sampling parameters.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    /// The prompt parts.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// The system instruction, if any.
    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    /// Concatenated text of all text parts.
    pub fn joined_text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// Checks the prompt carries something to send.
    ///
    /// A prompt needs at least one part, and text parts must not be blank.
    pub fn validate(&self) -> TypewriterResult<()> {
        let mut details = Vec::new();

        if self.parts.is_empty() {
            details.push(ValidationDetail {
                field: "parts".to_string(),
                description: "Prompt must have at least one part".to_string(),
            });
        }

        for (idx, part) in self.parts.iter().enumerate() {
            if let Some(text) = part.as_text() {
                if text.trim().is_empty() {
                    details.push(ValidationDetail {
                        field: format!("parts[{idx}]"),
                        description: "Text part cannot be blank".to_string(),
                    });
                }
            }
        }

        if details.is_empty() {
            Ok(())
        } else {
            Err(RequestError::ValidationError {
                message: "Invalid prompt".to_string(),
                details,
            }
            .into())
        }
    }

    /// Builds the wire request for this prompt.
    pub fn to_request(&self) -> GenerateContentRequest {
        let mut request = GenerateContentRequest::from_parts(self.parts.clone());
        request.system_instruction = self
            .system_instruction
            .as_ref()
            .map(|s| Content {
                role: None,
                parts: vec![Part::text(s.clone())],
            });
        request.generation_config.clone_from(&self.generation_config);
        request
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::text(text)
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TypewriterError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_text_prompt_request_body() {
        let request = Prompt::text("Write about owls").to_request();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Write about owls"}]}]
            })
        );
    }

    #[test]
    fn test_prompt_with_config_and_instruction() {
        let request = Prompt::text("hi")
            .with_system_instruction("Be brief")
            .with_generation_config(GenerationConfig {
                temperature: Some(0.5),
                ..GenerationConfig::default()
            })
            .to_request();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn test_validate_rejects_empty() {
        let err = Prompt::default().validate().unwrap_err();
        match err {
            TypewriterError::Request(RequestError::ValidationError { details, .. }) => {
                assert_eq!(details[0].field, "parts");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_blank_text() {
        let err = Prompt::text("   ").validate().unwrap_err();
        assert!(matches!(
            err,
            TypewriterError::Request(RequestError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_validate_accepts_inline_data() {
        let prompt = Prompt::text("Describe this")
            .with_part(Part::inline_data("image/png", &[0x89, 0x50]).unwrap());
        assert!(prompt.validate().is_ok());
        assert_eq!(prompt.parts().len(), 2);
        assert_eq!(prompt.joined_text(), "Describe this");
    }
}
