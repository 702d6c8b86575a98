//! Endpoint path builders for the Gemini content API.

/// Base path for models endpoints.
pub const MODELS: &str = "/models";

/// Constructs a path for the generateContent endpoint.
///
/// # Example
///
/// ```
/// use integrations_typewriter::transport::endpoints;
///
/// let path = endpoints::generate_content("gemini-2.5-flash-lite");
/// assert_eq!(path, "/models/gemini-2.5-flash-lite:generateContent");
/// ```
pub fn generate_content(model: &str) -> String {
    format!("{}/{}:generateContent", MODELS, model.trim_start_matches("models/"))
}

/// Constructs a path for the streamGenerateContent endpoint.
///
/// The response is a JSON array delivered incrementally; see
/// [`GeminiChunkParser`](crate::streaming::GeminiChunkParser).
pub fn stream_generate_content(model: &str) -> String {
    format!("{}/{}:streamGenerateContent", MODELS, model.trim_start_matches("models/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_generate_content() {
        assert_eq!(
            stream_generate_content("gemini-pro"),
            "/models/gemini-pro:streamGenerateContent"
        );
    }

    #[test]
    fn test_model_prefix_is_not_doubled() {
        assert_eq!(
            generate_content("models/gemini-pro"),
            "/models/gemini-pro:generateContent"
        );
    }
}
