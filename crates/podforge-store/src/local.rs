//! Local-disk file store with a JSON record index.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;

use podforge_core::error::{PodforgeError, Result};

use crate::{AccessControl, FileKind, FileRecord, FileStore, NewFile, StoredFile};

/// File-based store.
///
/// Layout:
/// - `<base>/files.json` — array of [`FileRecord`]
/// - `<base>/objects/<id>_<filename>` — payloads
pub struct LocalFileStore {
    base: PathBuf,
    public_base_url: String,
}

impl LocalFileStore {
    pub fn new(base: PathBuf, public_base_url: Option<String>) -> Self {
        Self {
            base,
            public_base_url: public_base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_default(),
        }
    }

    /// Default store location: `~/.podforge/files/`
    pub fn default_path() -> PathBuf {
        podforge_core::config::data_dir().join("files")
    }

    fn index_path(&self) -> PathBuf {
        self.base.join("files.json")
    }

    fn objects_dir(&self) -> PathBuf {
        self.base.join("objects")
    }

    fn content_url(&self, id: &str) -> String {
        format!("{}/api/v1/files/{id}/content", self.public_base_url)
    }

    async fn ensure_dirs(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.base).await?;
        tokio::fs::create_dir_all(self.objects_dir()).await?;
        Ok(())
    }

    async fn load_index(&self) -> Result<Vec<FileRecord>> {
        let path = self.index_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data = tokio::fs::read_to_string(&path).await?;
        let records: Vec<FileRecord> = serde_json::from_str(&data)
            .map_err(|e| PodforgeError::Storage(format!("corrupt file index: {e}")))?;
        Ok(records)
    }

    async fn save_index(&self, records: &[FileRecord]) -> Result<()> {
        let data = serde_json::to_string_pretty(records)?;
        let path = self.index_path();
        // Atomic write: write to temp then rename
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, data.as_bytes()).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, file: NewFile) -> Result<StoredFile> {
        self.ensure_dirs().await?;

        let id = uuid::Uuid::new_v4().to_string();
        let storage_name = format!("{id}_{}", file.filename);
        let path = self.objects_dir().join(&storage_name);

        tokio::fs::write(&path, &file.bytes).await?;

        let record = FileRecord {
            id: id.clone(),
            filename: file.filename.clone(),
            path: path.to_string_lossy().into_owned(),
            content_type: file.content_type.clone(),
            size: file.bytes.len(),
            user_id: file.user_id.clone(),
            kind: file.kind,
            access_control: AccessControl {
                read_user_ids: vec![file.user_id],
            },
            created_at: Utc::now(),
        };

        let mut records = self.load_index().await?;
        records.push(record);
        self.save_index(&records).await?;

        debug!(
            id = %id,
            filename = %file.filename,
            size = file.bytes.len(),
            "Stored file"
        );

        Ok(StoredFile {
            content_url: self.content_url(&id),
            id,
            filename: file.filename,
            content_type: file.content_type,
            size: file.bytes.len(),
        })
    }

    async fn get(&self, id: &str) -> Result<Option<FileRecord>> {
        let records = self.load_index().await?;
        Ok(records.into_iter().find(|r| r.id == id))
    }
}
