//! Persistence for upload records.
//!
//! `PgUploadRepository` is the durable store; `MemoryUploadRepository`
//! keeps records in process for local runs and tests.

mod memory_upload_repository;
mod pg_upload_repository;

pub use memory_upload_repository::MemoryUploadRepository;
pub use pg_upload_repository::PgUploadRepository;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::uploads::models::{CreateUpload, Upload};

#[async_trait]
pub trait UploadRepository: Send + Sync {
    /// Store every record of a submission atomically: either all rows
    /// become listable or none do.
    async fn insert_all(&self, uploads: Vec<CreateUpload>) -> Result<Vec<Upload>>;

    /// Newest first (`created_at DESC, id DESC`), at most `limit` rows when given.
    async fn list(&self, limit: Option<i64>) -> Result<Vec<Upload>>;
}
