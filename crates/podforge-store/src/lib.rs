//! File storage for generated podcast artifacts.
//!
//! The [`FileStore`] trait isolates persistence behind a narrow seam so the
//! generation engine can be tested with no disk or network. The built-in
//! backend is [`local::LocalFileStore`]: payload files on disk plus a JSON
//! record index carrying per-user access control.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use podforge_core::error::Result;

pub mod local;

/// Classification tag recorded with each stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    PodcastAudio,
    PodcastTranscript,
}

/// A file to be stored.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
    /// Owning user; read access is restricted to them.
    pub user_id: String,
    pub kind: FileKind,
}

/// Access control for a stored file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControl {
    pub read_user_ids: Vec<String>,
}

/// Durable record for a stored file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub filename: String,
    pub path: String,
    pub content_type: String,
    pub size: usize,
    pub user_id: String,
    pub kind: FileKind,
    pub access_control: AccessControl,
    pub created_at: DateTime<Utc>,
}

/// Handle returned after a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
    pub filename: String,
    pub content_type: String,
    pub size: usize,
    /// Retrievable content URL for players and download links.
    pub content_url: String,
}

/// The storage trait. One save = one durable record; saves are individually
/// atomic and there is no cross-file transaction.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn save(&self, file: NewFile) -> Result<StoredFile>;

    async fn get(&self, id: &str) -> Result<Option<FileRecord>>;
}
