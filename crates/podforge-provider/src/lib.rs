//! Speech provider abstraction.
//!
//! Each provider implements the [`SpeechProvider`] trait to stream
//! multi-speaker audio chunks from a text-to-speech API.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};

pub mod gemini;
pub mod sse;

/// A request for multi-speaker speech generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechRequest {
    /// Speaker-tagged dialogue lines, one turn per line.
    pub transcript: String,
    /// Style/tone guidance applied to the whole generation.
    pub style_instructions: String,
    pub model: String,
    /// Prebuilt voice for "Speaker 1".
    pub speaker_1_voice: String,
    /// Prebuilt voice for "Speaker 2".
    pub speaker_2_voice: String,
    /// Sampling temperature; providers pick their own default when unset.
    pub temperature: Option<f64>,
}

/// One unit of streamed audio data returned by a provider.
///
/// The MIME type decides downstream whether the payload is a complete audio
/// container or raw PCM that still needs WAV wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub mime_type: String,
    pub data: Vec<u8>,
}

pub type AudioChunkStream = Pin<Box<dyn Stream<Item = anyhow::Result<AudioChunk>> + Send>>;

/// The core speech provider trait.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    /// Provider identifier (e.g., "gemini").
    fn id(&self) -> &str;

    /// Stream audio chunks for a speech request.
    async fn stream(
        &self,
        request: &SpeechRequest,
        api_key: &str,
    ) -> anyhow::Result<AudioChunkStream>;
}
