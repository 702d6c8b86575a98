//! Test doubles for the transport, auth, source and formatter seams.
//!
//! Always compiled so integration tests and downstream crates can use them.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;

use crate::auth::AuthManager;
use crate::error::{TypewriterError, TypewriterResult};
use crate::format::{FormatError, MarkdownFormatter};
use crate::source::{Prompt, TextSource};
use crate::streaming::FragmentStream;
use crate::transport::{ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type StreamScript = Result<Vec<Result<Bytes, TransportError>>, TransportError>;

/// HTTP transport returning queued responses and recording requests.
///
/// ```
/// use integrations_typewriter::mocks::MockHttpTransport;
/// use integrations_typewriter::transport::{HttpMethod, HttpRequest, HttpTransport};
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// # async fn example() {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, &json!({"ok": true}));
///
/// let request = HttpRequest {
///     method: HttpMethod::Get,
///     url: "https://example.com".to_string(),
///     headers: HashMap::new(),
///     body: None,
/// };
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # }
/// ```
#[derive(Default)]
pub struct MockHttpTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    streaming_responses: Mutex<VecDeque<StreamScript>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    /// Creates a transport with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result of the next `send`.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Queues a JSON response.
    pub fn enqueue_json_response(&self, status: u16, body: &serde_json::Value) {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        self.enqueue_response(Ok(HttpResponse {
            status,
            headers,
            body: Bytes::from(body.to_string()),
        }));
    }

    /// Queues a transport failure for the next `send`.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Queues the body chunks of the next `send_streaming`.
    ///
    /// An `Err` chunk fails the stream at that point.
    pub fn enqueue_streaming_response(&self, chunks: Vec<Result<Vec<u8>, TransportError>>) {
        let chunks = chunks.into_iter().map(|c| c.map(Bytes::from)).collect();
        lock(&self.streaming_responses).push_back(Ok(chunks));
    }

    /// Makes the next `send_streaming` fail before any chunk.
    pub fn enqueue_streaming_error(&self, error: TransportError) {
        lock(&self.streaming_responses).push_back(Err(error));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Asserts the number of requests received.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = lock(&self.requests).len();
        assert_eq!(actual, expected, "Expected {expected} requests, got {actual}");
    }

    /// Asserts the method and a URL fragment of request `index`.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = lock(&self.requests);
        let request = requests.get(index);
        assert!(request.is_some(), "No request at index {index}");
        if let Some(request) = request {
            assert_eq!(request.method, method);
            assert!(
                request.url.contains(url_contains),
                "Expected URL to contain '{url_contains}', got '{}'",
                request.url
            );
        }
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);
        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No response configured in MockHttpTransport".to_string(),
            ))
        })
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<ChunkedStream, TransportError> {
        lock(&self.requests).push(request);
        let chunks = lock(&self.streaming_responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No streaming response configured in MockHttpTransport".to_string(),
            ))
        })?;
        Ok(Box::pin(stream::iter(chunks)))
    }
}

/// Auth manager with a fixed key.
#[derive(Debug, Clone)]
pub struct MockAuthManager {
    api_key: String,
    use_header: bool,
}

impl MockAuthManager {
    /// Authenticates with the `x-goog-api-key` header.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            use_header: true,
        }
    }

    /// Authenticates with the `key` query parameter.
    pub fn with_query_param(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            use_header: false,
        }
    }
}

impl AuthManager for MockAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        self.use_header
            .then(|| ("x-goog-api-key".to_string(), self.api_key.clone()))
    }

    fn get_auth_query_param(&self) -> Option<(String, String)> {
        (!self.use_header).then(|| ("key".to_string(), self.api_key.clone()))
    }

    fn clone_box(&self) -> Box<dyn AuthManager> {
        Box::new(self.clone())
    }
}

/// One step of a [`ScriptedTextSource`] stream.
#[derive(Debug, Clone)]
pub enum ScriptStep {
    /// Yield a fragment.
    Fragment(String),
    /// Sleep before the next step.
    Pause(Duration),
    /// Yield an error and end.
    Fail(TypewriterError),
}

/// Text source replaying a fixed script.
///
/// Every `stream_text` call replays the script from the start.
/// `complete_text` returns the concatenated fragments, or the first failure.
#[derive(Debug, Default)]
pub struct ScriptedTextSource {
    steps: Vec<ScriptStep>,
    open_error: Option<TypewriterError>,
    prompts: Mutex<Vec<Prompt>>,
    fragments_yielded: Arc<AtomicUsize>,
}

impl ScriptedTextSource {
    /// A source yielding `fragments` in order.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            steps: fragments.into_iter().map(|f| ScriptStep::Fragment(f.into())).collect(),
            ..Self::default()
        }
    }

    /// A source whose streams fail to open.
    pub fn failing_to_open(error: TypewriterError) -> Self {
        Self {
            open_error: Some(error),
            ..Self::default()
        }
    }

    /// Appends a fragment.
    pub fn then_fragment(mut self, fragment: impl Into<String>) -> Self {
        self.steps.push(ScriptStep::Fragment(fragment.into()));
        self
    }

    /// Appends a pause.
    pub fn then_pause(mut self, duration: Duration) -> Self {
        self.steps.push(ScriptStep::Pause(duration));
        self
    }

    /// Appends a failure.
    pub fn then_fail(mut self, error: TypewriterError) -> Self {
        self.steps.push(ScriptStep::Fail(error));
        self
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<Prompt> {
        lock(&self.prompts).clone()
    }

    /// Fragments handed out across all streams.
    pub fn fragments_yielded(&self) -> usize {
        self.fragments_yielded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextSource for ScriptedTextSource {
    async fn stream_text(&self, prompt: &Prompt) -> TypewriterResult<FragmentStream> {
        lock(&self.prompts).push(prompt.clone());
        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }

        let steps: VecDeque<ScriptStep> = self.steps.iter().cloned().collect();
        let yielded = Arc::clone(&self.fragments_yielded);

        Ok(Box::pin(stream::unfold(steps, move |mut steps| {
            let yielded = Arc::clone(&yielded);
            async move {
                loop {
                    match steps.pop_front()? {
                        ScriptStep::Pause(duration) => tokio::time::sleep(duration).await,
                        ScriptStep::Fragment(text) => {
                            yielded.fetch_add(1, Ordering::SeqCst);
                            return Some((Ok(text), steps));
                        }
                        ScriptStep::Fail(error) => {
                            steps.clear();
                            return Some((Err(error), steps));
                        }
                    }
                }
            }
        })))
    }

    async fn complete_text(&self, prompt: &Prompt) -> TypewriterResult<String> {
        lock(&self.prompts).push(prompt.clone());
        if let Some(error) = &self.open_error {
            return Err(error.clone());
        }

        let mut text = String::new();
        for step in &self.steps {
            match step {
                ScriptStep::Fragment(fragment) => text.push_str(fragment),
                ScriptStep::Pause(_) => {}
                ScriptStep::Fail(error) => return Err(error.clone()),
            }
        }
        Ok(text)
    }
}

/// Formatter that rejects every input.
#[derive(Debug, Default)]
pub struct FailingFormatter {
    calls: AtomicUsize,
}

impl FailingFormatter {
    /// Creates the formatter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `format` calls.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MarkdownFormatter for FailingFormatter {
    fn format(&self, _markdown: &str) -> Result<String, FormatError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FormatError::Rejected {
            message: "formatter unavailable".to_string(),
        })
    }
}
