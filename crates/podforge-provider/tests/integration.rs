//! Provider integration tests — real API calls.
//!
//! These tests are skipped when GEMINI_API_KEY is not set.
//! Run with: `cargo test -p podforge-provider --test integration`

use podforge_provider::gemini::GeminiTtsProvider;
use podforge_provider::{SpeechProvider, SpeechRequest};
use tokio_stream::StreamExt;

fn gemini_key() -> Option<String> {
    std::env::var("GEMINI_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

#[tokio::test]
async fn test_gemini_tts_streaming() {
    let Some(api_key) = gemini_key() else {
        eprintln!("Skipping: GEMINI_API_KEY not set");
        return;
    };

    let provider = GeminiTtsProvider::new(None);
    let request = SpeechRequest {
        transcript: "Speaker 1: Hello there.\nSpeaker 2: Hi! Great to meet you.".into(),
        style_instructions: "Read aloud in a warm, welcoming tone".into(),
        model: "gemini-2.5-flash-preview-tts".into(),
        speaker_1_voice: "Zephyr".into(),
        speaker_2_voice: "Puck".into(),
        temperature: Some(1.0),
    };

    let stream = provider.stream(&request, &api_key).await;
    assert!(stream.is_ok(), "Stream creation failed: {:?}", stream.err());

    let mut stream = stream.unwrap();
    let mut total_bytes = 0usize;
    let mut got_chunks = false;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.expect("Stream chunk error");
        assert!(!chunk.mime_type.is_empty());
        total_bytes += chunk.data.len();
        got_chunks = true;
    }

    assert!(got_chunks, "No audio chunks received");
    assert!(total_bytes > 0, "Empty audio payload");
}
