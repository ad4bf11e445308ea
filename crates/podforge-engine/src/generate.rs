//! The podcast generation pipeline.
//!
//! One invocation = one flow: validate the transcript, stream audio from the
//! provider, persist each chunk as it arrives (WAV-wrapping raw PCM), then
//! persist the transcript and emit citations. Chunks are consumed strictly
//! in arrival order and saved before the next is requested, so backpressure
//! is inherent to the loop. A mid-stream failure leaves already-saved files
//! in place; there is no rollback.

use std::sync::Arc;

use tokio_stream::StreamExt;
use tracing::debug;

use podforge_core::config::{Config, TtsConfig};
use podforge_core::transcript::{ValidationReport, validate_transcript};
use podforge_core::wav::pcm_to_wav;
use podforge_provider::{SpeechProvider, SpeechRequest};
use podforge_store::{FileKind, FileStore, NewFile, StoredFile};

use crate::events::{CitationMetadata, EventSink, GenerationEvent, NotificationLevel};
use crate::player::audio_player_html;

/// Max length of a provider/storage failure message shown to the user.
const ERROR_PREVIEW_LEN: usize = 47;

pub struct PodcastGenerator {
    provider: Arc<dyn SpeechProvider>,
    store: Arc<dyn FileStore>,
    events: Arc<dyn EventSink>,
    config: Arc<Config>,
}

impl PodcastGenerator {
    pub fn new(
        provider: Arc<dyn SpeechProvider>,
        store: Arc<dyn FileStore>,
        events: Arc<dyn EventSink>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            provider,
            store,
            events,
            config,
        }
    }

    /// Run the full pipeline for one transcript.
    ///
    /// Returns the stored file ids in citation order (transcript first when
    /// persisted, then audio chunks in generation order).
    pub async fn run(
        &self,
        transcript: &str,
        user_id: &str,
        podcast_name: &str,
    ) -> anyhow::Result<Vec<String>> {
        let tts = self.config.tts();

        let Some(api_key) = tts.resolve_api_key() else {
            self.notify(
                NotificationLevel::Error,
                "No TTS API key configured. Set tts.api_key in config or the GEMINI_API_KEY environment variable",
            )
            .await;
            anyhow::bail!("no TTS API key configured");
        };

        let report = validate_transcript(transcript, &tts.style_instructions);

        if !report.valid {
            let error = report
                .error
                .as_deref()
                .unwrap_or("unknown validation failure");
            self.notify(
                NotificationLevel::Error,
                &format!(
                    "Invalid transcript format: {error}\n\n\
                     Expected format:\n\
                     {{Style instructions}} (optional)\n\
                     Speaker 1: dialogue\n\
                     Speaker 2: dialogue\n\
                     ..."
                ),
            )
            .await;
            anyhow::bail!("invalid transcript: {error}");
        }

        // Warnings never block generation.
        if let Some(warning) = &report.warning {
            self.notify(NotificationLevel::Warning, warning).await;
        }

        self.status(&format!(
            "Transcript validated: Speaker 1 has {} {}",
            report.speaker_1_count,
            plural(report.speaker_1_count)
        ))
        .await;
        self.status(&format!(
            "Speaker 2 has {} {}",
            report.speaker_2_count,
            plural(report.speaker_2_count)
        ))
        .await;

        self.status("Generating podcast...").await;
        self.notify(
            NotificationLevel::Info,
            "Podcast generation started. Sit tight, this might take awhile...",
        )
        .await;

        match self
            .generate(transcript, &report, user_id, podcast_name, &tts, &api_key)
            .await
        {
            Ok(files) => {
                self.status("Podcast generation complete!").await;
                self.notify(NotificationLevel::Info, "Podcast generation complete!")
                    .await;

                for file in &files {
                    self.cite(file, transcript).await;
                }

                Ok(files.into_iter().map(|f| f.id).collect())
            }
            Err(e) => {
                let preview: String = e.to_string().chars().take(ERROR_PREVIEW_LEN).collect();
                let content = format!("Podcast generation failed with error: {preview}...");
                self.status(&content).await;
                self.notify(NotificationLevel::Error, &content).await;
                Err(e)
            }
        }
    }

    /// Stream audio and persist every chunk, then the transcript.
    async fn generate(
        &self,
        transcript: &str,
        report: &ValidationReport,
        user_id: &str,
        podcast_name: &str,
        tts: &TtsConfig,
        api_key: &str,
    ) -> anyhow::Result<Vec<StoredFile>> {
        let dialogue: String = report
            .turns
            .iter()
            .map(|t| format!("{}: {}", t.speaker.label(), t.text))
            .collect::<Vec<_>>()
            .join("\n");

        let request = SpeechRequest {
            transcript: dialogue,
            style_instructions: report.style.clone(),
            model: tts.model.clone(),
            speaker_1_voice: tts.speaker_1_voice.clone(),
            speaker_2_voice: tts.speaker_2_voice.clone(),
            temperature: tts.temperature,
        };

        let mut stream = self.provider.stream(&request, api_key).await?;

        let mut saved: Vec<StoredFile> = Vec::new();
        let mut file_index = 0usize;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;

            // A MIME type with a known extension is already a complete
            // container; anything else is raw PCM needing a WAV wrapper.
            let bytes = if is_known_container(&chunk.mime_type) {
                chunk.data
            } else {
                pcm_to_wav(&chunk.data, &chunk.mime_type)
            };

            let chunk_name = if file_index > 0 {
                format!("{podcast_name}_{file_index}")
            } else {
                podcast_name.to_string()
            };

            let stored = self
                .store
                .save(NewFile {
                    bytes,
                    filename: format!("Podcast_{chunk_name}.wav"),
                    content_type: "audio/wav".into(),
                    user_id: user_id.into(),
                    kind: FileKind::PodcastAudio,
                })
                .await?;

            debug!(id = %stored.id, size = stored.size, "Saved audio chunk");
            saved.push(stored);
            file_index += 1;
        }

        // Persist the transcript only after audio exists, so a failed or
        // empty generation never leaves an orphaned transcript.
        if tts.save_transcript && !saved.is_empty() {
            let stored = self
                .store
                .save(NewFile {
                    bytes: transcript.as_bytes().to_vec(),
                    filename: format!("Podcast_Transcript_{podcast_name}.txt"),
                    content_type: "text/plain".into(),
                    user_id: user_id.into(),
                    kind: FileKind::PodcastTranscript,
                })
                .await?;
            saved.insert(0, stored);
        }

        Ok(saved)
    }

    async fn cite(&self, file: &StoredFile, transcript: &str) {
        let event = if file.content_type.starts_with("text/") {
            GenerationEvent::Citation {
                source_name: "Podcast Transcript".into(),
                document: format!("Download: {}\n\n{transcript}", file.content_url),
                metadata: CitationMetadata {
                    source: file.filename.clone(),
                    html: false,
                },
            }
        } else if file.content_type.starts_with("audio/") {
            GenerationEvent::Citation {
                source_name: "Podcast Audio".into(),
                document: audio_player_html(&file.content_url, &file.filename),
                metadata: CitationMetadata {
                    source: file.filename.clone(),
                    html: true,
                },
            }
        } else {
            GenerationEvent::Citation {
                source_name: "Generated File".into(),
                document: file.content_url.clone(),
                metadata: CitationMetadata {
                    source: file.filename.clone(),
                    html: false,
                },
            }
        };

        self.events.emit(event).await;
    }

    async fn status(&self, description: &str) {
        self.events
            .emit(GenerationEvent::Status {
                description: description.into(),
            })
            .await;
    }

    async fn notify(&self, level: NotificationLevel, content: &str) {
        self.events
            .emit(GenerationEvent::Notification {
                level,
                content: content.into(),
            })
            .await;
    }
}

/// Whether a chunk's MIME type names a complete audio container.
fn is_known_container(mime_type: &str) -> bool {
    mime_guess::get_mime_extensions_str(mime_type)
        .map(|exts| !exts.is_empty())
        .unwrap_or(false)
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "line" } else { "lines" }
}
