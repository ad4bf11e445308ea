//! Minimal SSE (Server-Sent Events) decoder for streamed API responses.
//!
//! Converts a `reqwest::Response` body into a stream of event payloads. Only
//! `data:` fields carry anything on the endpoints we talk to; comments and
//! the `event:`/`id:`/`retry:` fields are skipped per the SSE spec. Multiple
//! `data:` lines in one event are joined with newlines before dispatch.

use futures::Stream;
use tokio_stream::StreamExt;

/// Decode an HTTP response body as SSE, yielding one `String` per event.
pub fn sse_data_stream(
    response: reqwest::Response,
) -> impl Stream<Item = anyhow::Result<String>> + Send {
    decode(Box::pin(response.bytes_stream()))
}

struct DecodeState<S> {
    source: S,
    buffer: String,
    data: Vec<String>,
}

/// Decode any byte stream as SSE. Split out from [`sse_data_stream`] so the
/// parser can be exercised without a network.
pub(crate) fn decode<S, E>(source: S) -> impl Stream<Item = anyhow::Result<String>> + Send
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Send + Unpin + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state = DecodeState {
        source,
        buffer: String::new(),
        data: Vec::new(),
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            // Drain complete lines from the buffer.
            while let Some(pos) = state.buffer.find('\n') {
                let line: String = state.buffer.drain(..=pos).collect();
                let line = line.trim_end_matches(['\n', '\r']);

                if line.is_empty() {
                    // Blank line = event boundary.
                    if !state.data.is_empty() {
                        let event = state.data.join("\n");
                        state.data.clear();
                        return Some((Ok(event), state));
                    }
                    continue;
                }

                if let Some(value) = line.strip_prefix("data:") {
                    state.data.push(value.trim_start().to_string());
                }
            }

            match state.source.next().await {
                Some(Ok(chunk)) => {
                    state.buffer.push_str(&String::from_utf8_lossy(&chunk));
                }
                Some(Err(e)) => {
                    return Some((Err(anyhow::anyhow!("SSE stream error: {e}")), state));
                }
                None => {
                    // Stream ended; flush any event that never saw its
                    // terminating blank line.
                    if !state.data.is_empty() {
                        let event = state.data.join("\n");
                        state.data.clear();
                        return Some((Ok(event), state));
                    }
                    return None;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byte_chunks(parts: &[&str]) -> impl Stream<Item = Result<bytes::Bytes, std::io::Error>> + Unpin + use<> {
        let owned: Vec<Result<bytes::Bytes, std::io::Error>> = parts
            .iter()
            .map(|p| Ok(bytes::Bytes::copy_from_slice(p.as_bytes())))
            .collect();
        futures::stream::iter(owned)
    }

    async fn collect_events(parts: &[&str]) -> Vec<String> {
        let mut stream = std::pin::pin!(decode(byte_chunks(parts)));
        let mut events = Vec::new();
        while let Some(item) = stream.next().await {
            events.push(item.expect("unexpected decode error"));
        }
        events
    }

    #[tokio::test]
    async fn test_single_event() {
        let events = collect_events(&["data: {\"a\":1}\n\n"]).await;
        assert_eq!(events, vec![r#"{"a":1}"#]);
    }

    #[tokio::test]
    async fn test_event_split_across_chunks() {
        let events = collect_events(&["data: hel", "lo wor", "ld\n", "\n"]).await;
        assert_eq!(events, vec!["hello world"]);
    }

    #[tokio::test]
    async fn test_multiple_data_lines_joined() {
        let events = collect_events(&["data: first\ndata: second\n\n"]).await;
        assert_eq!(events, vec!["first\nsecond"]);
    }

    #[tokio::test]
    async fn test_crlf_line_endings() {
        let events = collect_events(&["data: one\r\n\r\ndata: two\r\n\r\n"]).await;
        assert_eq!(events, vec!["one", "two"]);
    }

    #[tokio::test]
    async fn test_comments_and_other_fields_skipped() {
        let events =
            collect_events(&[": keepalive\nevent: message\nid: 7\ndata: payload\n\n"]).await;
        assert_eq!(events, vec!["payload"]);
    }

    #[tokio::test]
    async fn test_final_event_flushed_without_blank_line() {
        let events = collect_events(&["data: tail\n"]).await;
        assert_eq!(events, vec!["tail"]);
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let events = collect_events(&[]).await;
        assert!(events.is_empty());
    }
}
