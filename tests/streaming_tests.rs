//! Integration tests for the chunked JSON stream parser and text fragments.

use bytes::Bytes;
use futures::stream;
use futures::StreamExt;
use integrations_typewriter::error::{ContentError, ResponseError, StreamError, TypewriterError};
use integrations_typewriter::streaming::{text_fragments, GeminiChunkParser};
use integrations_typewriter::transport::TransportError;
use integrations_typewriter::types::{FinishReason, GenerateContentResponse};

fn parser(chunks: Vec<&str>) -> GeminiChunkParser {
    let chunks: Vec<Result<Bytes, TransportError>> = chunks
        .into_iter()
        .map(|c| Ok(Bytes::from(c.to_string())))
        .collect();
    GeminiChunkParser::new(Box::pin(stream::iter(chunks)))
}

async fn parse_all(chunks: Vec<&str>) -> Vec<GenerateContentResponse> {
    parser(chunks).map(|r| r.unwrap()).collect().await
}

#[tokio::test]
async fn test_parse_single_complete_chunk() {
    let responses = parse_all(vec![
        r#"[{"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"}}],"usageMetadata":{"promptTokenCount":5,"candidatesTokenCount":1,"totalTokenCount":6}}]"#,
    ])
    .await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].text(), "Hello");
    assert_eq!(responses[0].usage_metadata.as_ref().unwrap().total_token_count, 6);
}

#[tokio::test]
async fn test_parse_object_split_across_chunks() {
    let responses = parse_all(vec![
        r#"[{"candidates":[{"content":{"parts":[{"text":"Hel"#,
        r#"lo"}],"role":"model"}}]}]"#,
    ])
    .await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].text(), "Hello");
}

#[tokio::test]
async fn test_parse_tiny_incremental_chunks() {
    let responses = parse_all(vec![
        "[{",
        r#""candidates""#,
        r#":[{"content":"#,
        r#"{"parts":[{"text":"Hello"}],"role":"model"}}]}]"#,
    ])
    .await;

    assert_eq!(responses.len(), 1);
}

#[tokio::test]
async fn test_parse_braces_and_escapes_in_text() {
    let responses = parse_all(vec![
        r#"[{"candidates":[{"content":{"parts":[{"text":"a {b} [c] \"d\" \\"}],"role":"model"}}]}]"#,
    ])
    .await;

    assert_eq!(responses[0].text(), r#"a {b} [c] "d" \"#);
}

#[tokio::test]
async fn test_parse_whitespace_between_elements() {
    let responses = parse_all(vec![
        "  [  ",
        r#"{"candidates":[{"content":{"parts":[{"text":"One"}]}}]}"#,
        " ,\n  ",
        r#"{"candidates":[{"content":{"parts":[{"text":"Two"}]}}]}"#,
        "\n]  ",
    ])
    .await;

    let texts: Vec<String> = responses.iter().map(GenerateContentResponse::text).collect();
    assert_eq!(texts, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_parse_empty_stream() {
    assert!(parse_all(vec![]).await.is_empty());
    assert!(parse_all(vec!["[]"]).await.is_empty());
}

#[tokio::test]
async fn test_parse_malformed_object() {
    let results: Vec<_> = parser(vec![r#"[{"candidates": nope}, {"candidates": []}]"#])
        .collect()
        .await;

    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(TypewriterError::Response(ResponseError::MalformedChunk { .. }))
    ));
}

#[tokio::test]
async fn test_parse_utf8_content() {
    let responses = parse_all(vec![
        r#"[{"candidates":[{"content":{"parts":[{"text":"Hello 世界 🌍"}],"role":"model"}}]}]"#,
    ])
    .await;

    assert_eq!(responses[0].text(), "Hello 世界 🌍");
}

#[tokio::test]
async fn test_parse_transport_error_mid_stream() {
    let chunks: Vec<Result<Bytes, TransportError>> = vec![
        Ok(Bytes::from_static(
            br#"[{"candidates":[{"content":{"parts":[{"text":"Start"}],"role":"model"}}]},"#,
        )),
        Err(TransportError::Request("connection lost".to_string())),
        Ok(Bytes::from_static(br#"{"candidates":[]}]"#)),
    ];
    let results: Vec<_> = GeminiChunkParser::new(Box::pin(stream::iter(chunks)))
        .collect()
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap().text(), "Start");
    assert!(matches!(
        results[1],
        Err(TypewriterError::Stream(StreamError::Interrupted { .. }))
    ));
}

#[tokio::test]
async fn test_parse_real_world_streaming_pattern() {
    let responses = parse_all(vec![
        r#"[{"candidates":[{"content":{"parts":[{"text":"The"}],"role":"model"}}],"usageMetadata":{"promptTokenCount":10,"candidatesTokenCount":1,"totalTokenCount":11}},"#,
        r#"{"candidates":[{"content":{"parts":[{"text":" capital"}],"role":"model"}}]},"#,
        "\r\n",
        r#"{"candidates":[{"content":{"parts":[{"text":" of France"}],"role":"model"}}]},"#,
        r#"{"candidates":[{"content":{"parts":[{"text":" is Paris."}],"role":"model"},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":10,"candidatesTokenCount":9,"totalTokenCount":19}}]"#,
    ])
    .await;

    assert_eq!(responses.len(), 4);
    let text: String = responses.iter().map(GenerateContentResponse::text).collect();
    assert_eq!(text, "The capital of France is Paris.");
    assert_eq!(responses[3].finish_reason(), Some(FinishReason::Stop));
}

#[tokio::test]
async fn test_text_fragments_stop_at_blocked_candidate() {
    let fragments: Vec<_> = text_fragments(parser(vec![
        r#"[{"candidates":[{"content":{"parts":[{"text":"Fine so far"}]}}]},"#,
        r#"{"candidates":[{"finishReason":"SAFETY"}]}]"#,
    ]))
    .collect()
    .await;

    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].as_ref().unwrap(), "Fine so far");
    assert!(matches!(
        fragments[1],
        Err(TypewriterError::Content(ContentError::SafetyBlocked { .. }))
    ));
}
