//! Streaming support for generative-text responses.
//!
//! - [`GeminiChunkParser`] turns the raw byte stream of `streamGenerateContent`
//!   into typed response chunks.
//! - [`text_fragments`] reduces those chunks to the plain text fragments the
//!   typing renderer consumes.
//! - [`read_ahead`] drains a fragment stream on its own task so the response
//!   body is read at network speed, however slowly the consumer pulls.
//!
//! ## Example
//!
//! ```rust,no_run
//! use integrations_typewriter::streaming::{text_fragments, GeminiChunkParser};
//! use integrations_typewriter::transport::ChunkedStream;
//! use futures::StreamExt;
//!
//! async fn print_fragments(bytes: ChunkedStream) {
//!     let mut fragments = text_fragments(GeminiChunkParser::new(bytes));
//!     while let Some(fragment) = fragments.next().await {
//!         match fragment {
//!             Ok(text) => print!("{text}"),
//!             Err(e) => eprintln!("stream failed: {e}"),
//!         }
//!     }
//! }
//! ```

mod chunked_json;

use std::pin::Pin;

use futures::{stream, Stream, StreamExt};
use tokio::sync::mpsc;

use crate::error::TypewriterError;

pub use chunked_json::GeminiChunkParser;

/// A lazy, finite, non-restartable sequence of text fragments.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, TypewriterError>> + Send>>;

/// Maps parsed response chunks to their text.
///
/// A chunk reporting a blocked prompt or candidate becomes an error item.
pub fn text_fragments(parser: GeminiChunkParser) -> FragmentStream {
    Box::pin(parser.map(|chunk| {
        let chunk = chunk?;
        chunk.check_blocked()?;
        Ok(chunk.text())
    }))
}

/// Moves consumption of `fragments` onto a spawned task.
///
/// Items are buffered and replayed in order. The task ends after the first
/// error, at end of stream, or as soon as the returned stream is dropped,
/// which also drops the underlying response body. Must be called inside a
/// tokio runtime.
pub fn read_ahead(mut fragments: FragmentStream) -> FragmentStream {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            let item = tokio::select! {
                biased;
                () = tx.closed() => break,
                item = fragments.next() => item,
            };
            let Some(item) = item else { break };
            let failed = item.is_err();
            if tx.send(item).is_err() || failed {
                break;
            }
        }
    });

    Box::pin(stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use crate::error::ContentError;
    use crate::transport::TransportError;

    #[tokio::test]
    async fn test_text_fragments_in_order() {
        let chunks: Vec<Result<Bytes, TransportError>> = vec![
            Ok(Bytes::from_static(br#"[{"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"}}]},"#)),
            Ok(Bytes::from_static(br#"{"candidates":[{"content":{"parts":[{"text":", world"}],"role":"model"},"finishReason":"STOP"}]}]"#)),
        ];
        let parser = GeminiChunkParser::new(Box::pin(futures::stream::iter(chunks)));

        let fragments: Vec<_> = text_fragments(parser).collect().await;
        let texts: Vec<String> = fragments.into_iter().map(Result::unwrap).collect();

        assert_eq!(texts, vec!["Hello".to_string(), ", world".to_string()]);
    }

    #[tokio::test]
    async fn test_read_ahead_drains_without_a_reader() {
        let chunks: Vec<Result<Bytes, TransportError>> = vec![
            Ok(Bytes::from_static(br#"[{"candidates":[{"content":{"parts":[{"text":"one"}]}}]},"#)),
            Ok(Bytes::from_static(br#"{"candidates":[{"content":{"parts":[{"text":"two"}]}}]}]"#)),
        ];
        let pulled = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = std::sync::Arc::clone(&pulled);
        let bytes = futures::stream::iter(chunks).inspect(move |_| {
            counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        });

        let mut fragments = read_ahead(text_fragments(GeminiChunkParser::new(Box::pin(bytes))));
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(pulled.load(std::sync::atomic::Ordering::SeqCst), 2);

        assert_eq!(fragments.next().await.unwrap().unwrap(), "one");
        assert_eq!(fragments.next().await.unwrap().unwrap(), "two");
        assert!(fragments.next().await.is_none());
    }

    #[tokio::test]
    async fn test_read_ahead_stops_after_error() {
        let items: Vec<Result<String, TypewriterError>> = vec![
            Ok("kept".to_string()),
            Err(TransportError::Timeout.into()),
            Ok("dropped".to_string()),
        ];

        let collected: Vec<_> = read_ahead(Box::pin(futures::stream::iter(items))).collect().await;

        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].as_ref().unwrap(), "kept");
        assert!(collected[1].is_err());
    }

    #[tokio::test]
    async fn test_blocked_chunk_becomes_error() {
        let chunks: Vec<Result<Bytes, TransportError>> = vec![Ok(Bytes::from_static(
            br#"[{"promptFeedback":{"blockReason":"PROHIBITED_CONTENT"}}]"#,
        ))];
        let parser = GeminiChunkParser::new(Box::pin(futures::stream::iter(chunks)));

        let mut fragments = text_fragments(parser);
        assert!(matches!(
            fragments.next().await,
            Some(Err(TypewriterError::Content(ContentError::ProhibitedContent)))
        ));
    }
}
