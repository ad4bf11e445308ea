//! Generation events for the hosting surface.
//!
//! The engine reports progress through an [`EventSink`] rather than a
//! concrete UI: status lines, info/warning/error notifications, and
//! "citations" referencing the stored result files. Hosts render these as
//! they see fit; the CLI maps them onto the log stream.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// An event emitted during podcast generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GenerationEvent {
    /// Progress update.
    Status { description: String },
    /// User-facing message. Errors block progress; warnings do not.
    Notification {
        level: NotificationLevel,
        content: String,
    },
    /// A generated result with a renderable preview.
    Citation {
        source_name: String,
        /// Renderable body: player HTML for audio, full text for transcripts.
        document: String,
        metadata: CitationMetadata,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationMetadata {
    /// Source filename.
    pub source: String,
    /// Whether `document` is an HTML fragment to embed rather than plain text.
    #[serde(default)]
    pub html: bool,
}

/// Sink for generation events.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: GenerationEvent);
}

/// Sink that maps events onto the `tracing` log stream (the CLI default).
#[derive(Debug, Default)]
pub struct TracingEventSink;

#[async_trait]
impl EventSink for TracingEventSink {
    async fn emit(&self, event: GenerationEvent) {
        match event {
            GenerationEvent::Status { description } => {
                info!(%description, "status");
            }
            GenerationEvent::Notification { level, content } => match level {
                NotificationLevel::Info => info!(%content, "notification"),
                NotificationLevel::Warning => warn!(%content, "notification"),
                NotificationLevel::Error => error!(%content, "notification"),
            },
            GenerationEvent::Citation {
                source_name,
                metadata,
                ..
            } => {
                info!(source = %source_name, file = %metadata.source, "citation");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tags() {
        let event = GenerationEvent::Notification {
            level: NotificationLevel::Warning,
            content: "heads up".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "notification");
        assert_eq!(json["level"], "warning");
        assert_eq!(json["content"], "heads up");
    }

    #[test]
    fn test_citation_metadata_html_defaults_false() {
        let meta: CitationMetadata =
            serde_json::from_str(r#"{"source": "Podcast_audio.wav"}"#).unwrap();
        assert!(!meta.html);
    }
}
