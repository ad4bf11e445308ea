//! Podcast generation engine.
//!
//! Drives the single logical flow per invocation: validate → generate →
//! persist → notify. The pure core (transcript validation, WAV synthesis)
//! lives in `podforge-core`; network and storage sit behind the
//! `SpeechProvider`, `FileStore`, and `EventSink` seams.

pub mod events;
pub mod generate;
pub mod player;

pub use generate::PodcastGenerator;
