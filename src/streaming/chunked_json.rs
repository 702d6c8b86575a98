//! Chunked JSON streaming support.
//!
//! `streamGenerateContent` answers with a single JSON array whose elements
//! arrive incrementally, split at arbitrary byte positions:
//! ```json
//! [{"candidates":[...],"usageMetadata":...},
//! {"candidates":[...],"usageMetadata":...}]
//! ```

use crate::error::{ResponseError, StreamError, TypewriterError};
use crate::transport::ChunkedStream;
use crate::types::GenerateContentResponse;
use futures::stream::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Parser states for tracking JSON structure during chunked parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Nothing seen yet.
    ExpectingStart,
    /// Inside the top-level array.
    InArray,
    /// Closing bracket seen.
    Completed,
}

/// Parser for Gemini's chunked JSON streaming format.
///
/// Handles objects split across chunks, multi-byte UTF-8 sequences split
/// across chunks, braces and escapes inside strings, and reports a stream
/// that ends inside an object as [`StreamError::Truncated`]. After the first
/// error the parser yields nothing further.
pub struct GeminiChunkParser {
    inner: ChunkedStream,
    /// Decoded text not yet consumed as a complete object.
    buffer: String,
    /// Trailing bytes of an incomplete UTF-8 sequence.
    pending_bytes: Vec<u8>,
    state: ParserState,
    finished: bool,
    failed: bool,
}

impl GeminiChunkParser {
    /// Create a new chunk parser from a byte stream.
    pub fn new(inner: ChunkedStream) -> Self {
        Self {
            inner,
            buffer: String::new(),
            pending_bytes: Vec::new(),
            state: ParserState::ExpectingStart,
            finished: false,
            failed: false,
        }
    }

    /// Feed raw bytes and extract every complete object now available.
    ///
    /// Used by the `Stream` implementation; also handy for driving the parser
    /// by hand.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Result<GenerateContentResponse, TypewriterError>> {
        let mut results = Vec::new();

        if let Err(e) = self.decode(data) {
            self.failed = true;
            results.push(Err(e));
            return results;
        }

        while let Some(result) = self.try_extract_object() {
            let failed = result.is_err();
            results.push(result);
            if failed {
                self.failed = true;
                break;
            }
        }

        results
    }

    /// Append `data` to the text buffer, holding back an incomplete trailing
    /// UTF-8 sequence until the next chunk.
    fn decode(&mut self, data: &[u8]) -> Result<(), TypewriterError> {
        self.pending_bytes.extend_from_slice(data);

        match std::str::from_utf8(&self.pending_bytes) {
            Ok(text) => {
                self.buffer.push_str(text);
                self.pending_bytes.clear();
                Ok(())
            }
            Err(e) if e.error_len().is_none() => {
                let valid = e.valid_up_to();
                // valid_up_to marks a char boundary, so this cannot fail
                let text = std::str::from_utf8(&self.pending_bytes[..valid]).unwrap_or_default();
                self.buffer.push_str(text);
                self.pending_bytes.drain(..valid);
                Ok(())
            }
            Err(_) => Err(ResponseError::MalformedChunk {
                message: "Invalid UTF-8 in stream".to_string(),
                body: String::from_utf8_lossy(&self.pending_bytes).into_owned(),
            }
            .into()),
        }
    }

    /// Try to extract a complete JSON object from the buffer.
    ///
    /// Returns None if there's no complete object yet.
    fn try_extract_object(&mut self) -> Option<Result<GenerateContentResponse, TypewriterError>> {
        loop {
            self.skip_whitespace_and_delimiters();

            if self.buffer.starts_with('[') && self.state == ParserState::ExpectingStart {
                self.buffer.remove(0);
                self.state = ParserState::InArray;
                continue;
            }

            if self.buffer.starts_with(']') {
                self.buffer.remove(0);
                self.state = ParserState::Completed;
                continue;
            }

            break;
        }

        let (json_str, remaining) = extract_json_object(&self.buffer)?;
        let parsed = serde_json::from_str::<GenerateContentResponse>(json_str).map_err(|e| {
            TypewriterError::Response(ResponseError::MalformedChunk {
                message: format!("Failed to parse chunk: {e}"),
                body: json_str.to_string(),
            })
        });
        self.buffer = remaining.to_string();

        Some(parsed)
    }

    fn skip_whitespace_and_delimiters(&mut self) {
        let trimmed = self
            .buffer
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',');
        if trimmed.len() != self.buffer.len() {
            self.buffer = trimmed.to_string();
        }
    }

    /// Final check once the byte stream has ended.
    fn finish(&mut self) -> Option<Result<GenerateContentResponse, TypewriterError>> {
        self.skip_whitespace_and_delimiters();

        if self.buffer.is_empty() && self.pending_bytes.is_empty() {
            return None;
        }

        self.failed = true;
        tracing::warn!(
            buffered = self.buffer.len(),
            state = ?self.state,
            "Stream ended inside an incomplete chunk"
        );
        Some(Err(StreamError::Truncated.into()))
    }
}

/// Extract a complete JSON object from the beginning of the string.
///
/// Tracks brace/bracket depth, string boundaries and escapes, and returns
/// `(object, rest)` or `None` if the object is incomplete.
fn extract_json_object(input: &str) -> Option<(&str, &str)> {
    if !input.starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, byte) in input.bytes().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' | b'[' if !in_string => depth += 1,
            b'}' | b']' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some((&input[..=i], &input[i + 1..]));
                }
            }
            _ => {}
        }
    }

    None
}

impl Stream for GeminiChunkParser {
    type Item = Result<GenerateContentResponse, TypewriterError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        if this.failed {
            return Poll::Ready(None);
        }

        loop {
            if let Some(result) = this.try_extract_object() {
                if result.is_err() {
                    this.failed = true;
                }
                return Poll::Ready(Some(result));
            }

            if this.finished {
                return Poll::Ready(this.finish());
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    if let Err(e) = this.decode(&bytes) {
                        this.failed = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    this.failed = true;
                    return Poll::Ready(Some(Err(e.into())));
                }
                Poll::Ready(None) => this.finished = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
