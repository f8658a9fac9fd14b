use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UploadRepository;
use crate::core::error::Result;
use crate::features::uploads::models::{CreateUpload, Upload};

/// In-process upload store. Records are lost when the process exits.
#[derive(Default)]
pub struct MemoryUploadRepository {
    rows: RwLock<Vec<CreateUpload>>,
}

impl MemoryUploadRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored payload for an upload, if present
    #[cfg(test)]
    pub async fn payload(&self, id: uuid::Uuid) -> Option<Vec<u8>> {
        self.rows
            .read()
            .await
            .iter()
            .find(|row| row.id == id)
            .map(|row| row.data.clone())
    }
}

#[async_trait]
impl UploadRepository for MemoryUploadRepository {
    async fn insert_all(&self, uploads: Vec<CreateUpload>) -> Result<Vec<Upload>> {
        let saved = uploads.iter().map(CreateUpload::to_upload).collect();
        // Single write guard so a batch never shows up half-inserted
        self.rows.write().await.extend(uploads);
        Ok(saved)
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<Upload>> {
        let rows = self.rows.read().await;
        let mut uploads: Vec<Upload> = rows.iter().map(CreateUpload::to_upload).collect();
        uploads.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        if let Some(limit) = limit {
            uploads.truncate(limit.max(0) as usize);
        }

        Ok(uploads)
    }
}
