//! Google Gemini TTS provider.
//!
//! Implements streaming speech generation via the `streamGenerateContent`
//! endpoint with SSE. Auth is via API key in query parameter. Each SSE event
//! carries a JSON chunk whose `inlineData` parts hold base64 audio tagged
//! with a MIME type; decoding happens here so consumers only see raw bytes.

use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_stream::StreamExt;
use tracing::{debug, trace, warn};

use podforge_core::transcript::Speaker;

use crate::sse::sse_data_stream;
use crate::{AudioChunk, AudioChunkStream, SpeechProvider, SpeechRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TEMPERATURE: f64 = 1.0;

pub struct GeminiTtsProvider {
    pub base_url: String,
    client: reqwest::Client,
}

impl GeminiTtsProvider {
    pub fn new(base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            client: reqwest::Client::new(),
        }
    }
}

// --- Gemini request/response types ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<serde_json::Value>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    response_modalities: Vec<String>,
    speech_config: SpeechConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    multi_speaker_voice_config: MultiSpeakerVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MultiSpeakerVoiceConfig {
    speaker_voice_configs: Vec<SpeakerVoiceConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeakerVoiceConfig {
    speaker: String,
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiStreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// The user-facing text sent to the model: style guidance first, then the
/// speaker-tagged dialogue.
fn content_text(request: &SpeechRequest) -> String {
    if request.style_instructions.is_empty() {
        request.transcript.clone()
    } else {
        format!("{}\n\n{}", request.style_instructions, request.transcript)
    }
}

fn voice_config(speaker: Speaker, voice_name: &str) -> SpeakerVoiceConfig {
    SpeakerVoiceConfig {
        speaker: speaker.label().to_string(),
        voice_config: VoiceConfig {
            prebuilt_voice_config: PrebuiltVoiceConfig {
                voice_name: voice_name.to_string(),
            },
        },
    }
}

fn request_body(request: &SpeechRequest) -> GeminiRequest {
    GeminiRequest {
        contents: vec![json!({
            "role": "user",
            "parts": [{ "text": content_text(request) }],
        })],
        generation_config: GenerationConfig {
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            response_modalities: vec!["audio".into()],
            speech_config: SpeechConfig {
                multi_speaker_voice_config: MultiSpeakerVoiceConfig {
                    speaker_voice_configs: vec![
                        voice_config(Speaker::One, &request.speaker_1_voice),
                        voice_config(Speaker::Two, &request.speaker_2_voice),
                    ],
                },
            },
        },
    }
}

#[async_trait]
impl SpeechProvider for GeminiTtsProvider {
    fn id(&self) -> &str {
        "gemini"
    }

    async fn stream(
        &self,
        request: &SpeechRequest,
        api_key: &str,
    ) -> anyhow::Result<AudioChunkStream> {
        let body = request_body(request);

        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, request.model, api_key
        );

        debug!(model = %request.model, "Streaming Gemini TTS API");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {status}: {body}");
        }

        let events = Box::pin(sse_data_stream(response));

        let chunk_stream = futures::stream::unfold(events, |mut events| async move {
            loop {
                match events.next().await {
                    Some(Ok(data)) => {
                        let chunk: GeminiStreamChunk = match serde_json::from_str(data.trim()) {
                            Ok(c) => c,
                            Err(e) => {
                                trace!(%e, "Failed to parse Gemini chunk");
                                continue;
                            }
                        };

                        let candidate = match chunk.candidates.into_iter().next() {
                            Some(c) => c,
                            None => continue,
                        };

                        if let Some(content) = candidate.content {
                            for part in content.parts {
                                if let Some(inline) = part.inline_data {
                                    let decoded = base64::engine::general_purpose::STANDARD
                                        .decode(&inline.data);
                                    let item = match decoded {
                                        Ok(bytes) => Ok(AudioChunk {
                                            mime_type: inline.mime_type,
                                            data: bytes,
                                        }),
                                        Err(e) => Err(anyhow::anyhow!(
                                            "Invalid audio payload encoding: {e}"
                                        )),
                                    };
                                    return Some((item, events));
                                }

                                if let Some(text) = part.text {
                                    // Audio modality should not produce text.
                                    let preview: String = text.chars().take(80).collect();
                                    warn!(text = %preview, "Unexpected text chunk from TTS stream");
                                }
                            }
                        }

                        if let Some(reason) = candidate.finish_reason {
                            if reason != "STOP" {
                                trace!(reason, "Gemini finish reason");
                            }
                        }

                        continue;
                    }
                    Some(Err(e)) => {
                        return Some((Err(e), events));
                    }
                    None => {
                        return None;
                    }
                }
            }
        });

        Ok(Box::pin(chunk_stream))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> SpeechRequest {
        SpeechRequest {
            transcript: "Speaker 1: Hello\nSpeaker 2: Hi".into(),
            style_instructions: "Be cheerful".into(),
            model: "gemini-2.5-flash-preview-tts".into(),
            speaker_1_voice: "Zephyr".into(),
            speaker_2_voice: "Puck".into(),
            temperature: None,
        }
    }

    #[test]
    fn test_provider_creation() {
        let provider = GeminiTtsProvider::new(None);
        assert_eq!(provider.id(), "gemini");
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);

        let provider = GeminiTtsProvider::new(Some("http://localhost:9999/"));
        assert_eq!(provider.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_content_text_prepends_style() {
        let request = sample_request();
        let text = content_text(&request);
        assert!(text.starts_with("Be cheerful\n\nSpeaker 1:"));

        let request = SpeechRequest {
            style_instructions: String::new(),
            ..sample_request()
        };
        assert_eq!(content_text(&request), request.transcript);
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(request_body(&sample_request())).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert!(
            body["contents"][0]["parts"][0]["text"]
                .as_str()
                .unwrap()
                .contains("Speaker 2: Hi")
        );

        let config = &body["generationConfig"];
        assert_eq!(config["temperature"], 1.0);
        assert_eq!(config["responseModalities"][0], "audio");

        let speakers =
            &config["speechConfig"]["multiSpeakerVoiceConfig"]["speakerVoiceConfigs"];
        assert_eq!(speakers[0]["speaker"], "Speaker 1");
        assert_eq!(
            speakers[0]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Zephyr"
        );
        assert_eq!(speakers[1]["speaker"], "Speaker 2");
        assert_eq!(
            speakers[1]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Puck"
        );
    }

    #[test]
    fn test_request_body_temperature_override() {
        let request = SpeechRequest {
            temperature: Some(0.4),
            ..sample_request()
        };
        let body = serde_json::to_value(request_body(&request)).unwrap();
        assert_eq!(body["generationConfig"]["temperature"], 0.4);
    }

    #[test]
    fn test_chunk_deserialization_with_inline_data() {
        let json = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"audio/L16;rate=24000","data":"AAEC"}}]},"finishReason":"STOP"}]}"#;
        let chunk: GeminiStreamChunk = serde_json::from_str(json).unwrap();
        let inline = chunk.candidates[0]
            .content
            .as_ref()
            .unwrap()
            .parts[0]
            .inline_data
            .as_ref()
            .unwrap();
        assert_eq!(inline.mime_type, "audio/L16;rate=24000");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&inline.data)
            .unwrap();
        assert_eq!(bytes, vec![0u8, 1, 2]);
    }

    #[test]
    fn test_chunk_deserialization_text_part() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"oops"}]}}]}"#;
        let chunk: GeminiStreamChunk = serde_json::from_str(json).unwrap();
        let part = &chunk.candidates[0].content.as_ref().unwrap().parts[0];
        assert_eq!(part.text.as_deref(), Some("oops"));
        assert!(part.inline_data.is_none());
    }

    #[test]
    fn test_chunk_deserialization_empty() {
        let chunk: GeminiStreamChunk = serde_json::from_str("{}").unwrap();
        assert!(chunk.candidates.is_empty());
    }
}
