//! Gemini-backed text source.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::json;

use super::{Prompt, TextSource};
use crate::auth::ApiKeyAuthManager;
use crate::config::TypewriterConfig;
use crate::error::{TypewriterError, TypewriterResult};
use crate::observability::{Logger, StructuredLogger};
use crate::streaming::{read_ahead, text_fragments, FragmentStream, GeminiChunkParser};
use crate::transport::{
    endpoints, HttpMethod, HttpTransport, RequestBuilder, ReqwestTransport, ResponseParser,
};
use crate::types::GenerateContentResponse;

/// Text source speaking the Gemini `generateContent` REST endpoints.
pub struct GeminiTextSource {
    config: Arc<TypewriterConfig>,
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    logger: Box<dyn Logger>,
}

impl GeminiTextSource {
    /// Creates a source with a reqwest transport built from `config`.
    pub fn new(config: TypewriterConfig) -> TypewriterResult<Self> {
        let transport = ReqwestTransport::new(config.timeout, config.connect_timeout)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a source from environment configuration.
    pub fn from_env() -> TypewriterResult<Self> {
        Self::new(TypewriterConfig::from_env()?)
    }

    /// Creates a source over a caller-supplied transport.
    pub fn with_transport(config: TypewriterConfig, transport: Arc<dyn HttpTransport>) -> Self {
        let request_builder = RequestBuilder::new(
            config.base_url.clone(),
            config.api_version.clone(),
            Box::new(ApiKeyAuthManager::from_config(&config)),
        );
        let logger = StructuredLogger::new("typewriter.source").with_level(config.log_level);

        Self {
            config: Arc::new(config),
            transport,
            request_builder,
            logger: Box::new(logger),
        }
    }

    /// Replaces the logger.
    pub fn with_logger(mut self, logger: Box<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// The model requests are sent to.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// The configuration this source was built from.
    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    fn log_failure(&self, message: &str, error: &TypewriterError) {
        self.logger.warn(message, json!({
            "model": self.model(),
            "error": error.to_string(),
            "retryable": error.is_retryable(),
        }));
    }
}

#[async_trait]
impl TextSource for GeminiTextSource {
    async fn stream_text(&self, prompt: &Prompt) -> TypewriterResult<FragmentStream> {
        prompt.validate()?;
        let request = prompt.to_request();

        self.logger.debug("Opening content stream", json!({
            "model": self.model(),
            "parts": prompt.parts().len(),
            "has_generation_config": request.generation_config.is_some(),
        }));

        let path = endpoints::stream_generate_content(self.model());
        let http_request = self.request_builder.build_streaming_request(&path, &request)?;

        let bytes = match self.transport.send_streaming(http_request).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let error = TypewriterError::from(e);
                self.log_failure("Failed to open content stream", &error);
                return Err(error);
            }
        };

        Ok(read_ahead(text_fragments(GeminiChunkParser::new(bytes))))
    }

    async fn complete_text(&self, prompt: &Prompt) -> TypewriterResult<String> {
        prompt.validate()?;
        let request = prompt.to_request();
        let start = Instant::now();

        self.logger.debug("Starting content generation", json!({
            "model": self.model(),
            "parts": prompt.parts().len(),
        }));

        let path = endpoints::generate_content(self.model());
        let http_request = self
            .request_builder
            .build_request(HttpMethod::Post, &path, Some(&request))?;

        let result = async {
            let http_response = self.transport.send(http_request).await?;
            let response: GenerateContentResponse = ResponseParser::parse_response(http_response)?;
            response.check_blocked()?;
            Ok::<_, TypewriterError>(response)
        }
        .await;

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                self.log_failure("Content generation failed", &error);
                return Err(error);
            }
        };

        let text = response.text();
        self.logger.info("Content generation completed", json!({
            "model": self.model(),
            "duration_ms": u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            "chars": text.chars().count(),
            "total_tokens": response.usage_metadata.as_ref().map(|u| u.total_token_count),
            "finish_reason": response.finish_reason().map(|r| format!("{r:?}")),
        }));

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{
        AuthenticationError, ContentError, NetworkError, RateLimitError, RequestError, StreamError,
    };
    use crate::mocks::MockHttpTransport;
    use crate::observability::NoopLogger;
    use crate::transport::TransportError;
    use crate::typing::{RenderState, TypingRenderer};
    use futures::StreamExt;
    use secrecy::SecretString;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn source(transport: Arc<MockHttpTransport>) -> GeminiTextSource {
        let config = TypewriterConfig::builder()
            .api_key(SecretString::new("test-key".into()))
            .model("gemini-test")
            .build()
            .unwrap();
        GeminiTextSource::with_transport(config, transport).with_logger(Box::new(NoopLogger))
    }

    #[tokio::test]
    async fn test_complete_text() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(
            200,
            &json!({
                "candidates": [{"content": {"role": "model", "parts": [{"text": "# Owls\n"}, {"text": "Hoot."}]}}],
                "usageMetadata": {"promptTokenCount": 4, "totalTokenCount": 9}
            }),
        );

        let text = source(transport.clone())
            .complete_text(&Prompt::text("owls"))
            .await
            .unwrap();
        assert_eq!(text, "# Owls\nHoot.");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/v1beta/models/gemini-test:generateContent"));
        assert_eq!(requests[0].headers.get("x-goog-api-key").map(String::as_str), Some("test-key"));
    }

    #[tokio::test]
    async fn test_complete_text_maps_status() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(
            401,
            &json!({"error": {"code": 401, "message": "API key not valid", "status": "UNAUTHENTICATED"}}),
        );

        let err = source(transport).complete_text(&Prompt::text("owls")).await.unwrap_err();
        assert!(matches!(
            err,
            TypewriterError::Authentication(AuthenticationError::InvalidApiKey)
        ));
    }

    #[tokio::test]
    async fn test_complete_text_blocked_prompt() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_json_response(200, &json!({"promptFeedback": {"blockReason": "SAFETY"}}));

        let err = source(transport).complete_text(&Prompt::text("owls")).await.unwrap_err();
        assert!(matches!(err, TypewriterError::Content(ContentError::SafetyBlocked { .. })));
    }

    #[tokio::test]
    async fn test_invalid_prompt_sends_nothing() {
        let transport = Arc::new(MockHttpTransport::new());
        let err = source(transport.clone()).stream_text(&Prompt::text("")).await.err().unwrap();
        assert!(matches!(err, TypewriterError::Request(RequestError::ValidationError { .. })));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_stream_text_fragments() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_streaming_response(vec![
            Ok(br#"[{"candidates":[{"content":{"parts":[{"text":"Hel"}]}}]}"#.to_vec()),
            Ok(br#",{"candidates":[{"content":{"parts":[{"text":"lo"}]}}]}]"#.to_vec()),
        ]);

        let stream = source(transport.clone())
            .stream_text(&Prompt::text("greet"))
            .await
            .unwrap();
        let fragments: Vec<String> = stream.map(|f| f.unwrap()).collect().await;
        assert_eq!(fragments, vec!["Hel".to_string(), "lo".to_string()]);
        assert!(transport.requests()[0]
            .url
            .ends_with("/v1beta/models/gemini-test:streamGenerateContent"));
    }

    #[tokio::test]
    async fn test_stream_text_truncated() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_streaming_response(vec![Ok(
            br#"[{"candidates":[{"content":{"parts":[{"text":"Hi"}]}}]},{"candi"#.to_vec(),
        )]);

        let stream = source(transport).stream_text(&Prompt::text("greet")).await.unwrap();
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "Hi");
        assert!(matches!(
            items[1],
            Err(TypewriterError::Stream(StreamError::Truncated))
        ));
    }

    #[tokio::test]
    async fn test_complete_text_transport_timeout() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_error(TransportError::Timeout);

        let err = source(transport).complete_text(&Prompt::text("owls")).await.unwrap_err();
        assert!(matches!(err, TypewriterError::Network(NetworkError::Timeout)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_stream_open_rate_limit_keeps_retry_after() {
        let transport = Arc::new(MockHttpTransport::new());
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), "60".to_string());
        transport.enqueue_streaming_error(TransportError::Status {
            status: 429,
            headers,
            body: bytes::Bytes::from_static(
                br#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#,
            ),
        });

        let err = source(transport).stream_text(&Prompt::text("owls")).await.err().unwrap();
        assert!(matches!(err, TypewriterError::RateLimit(RateLimitError::TooManyRequests { .. })));
        assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_stream_open_timeout_fails_render() {
        let transport = Arc::new(MockHttpTransport::new());
        transport.enqueue_streaming_error(TransportError::Timeout);
        let renderer = TypingRenderer::new(Arc::new(source(transport.clone())));

        let mut snapshots = Vec::new();
        let outcome = renderer
            .generate(Prompt::text("owls"), CancellationToken::new(), |s| snapshots.push(s.clone()))
            .await;

        assert_eq!(snapshots.len(), 1);
        assert_eq!(outcome.markup(), "");
        assert!(matches!(
            outcome.state(),
            RenderState::Failed(TypewriterError::Network(NetworkError::Timeout))
        ));
        transport.verify_request_count(1);
    }
}
