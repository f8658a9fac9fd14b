use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;

use super::UploadRepository;
use crate::core::error::Result;
use crate::features::uploads::models::{CreateUpload, Upload};

const UPLOAD_COLUMNS: &str = r#"
    id, filename, content_type, file_size, sha256,
    profile_url, notes, profile_bio, conversation_text,
    risk_score, confidence, signals, advice, created_at
"#;

pub struct PgUploadRepository {
    pool: PgPool,
}

impl PgUploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UploadRepository for PgUploadRepository {
    async fn insert_all(&self, uploads: Vec<CreateUpload>) -> Result<Vec<Upload>> {
        let insert = format!(
            r#"
            INSERT INTO uploads (
                id, filename, content_type, file_size, sha256, data,
                profile_url, notes, profile_bio, conversation_text,
                risk_score, confidence, signals, advice, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {}
            "#,
            UPLOAD_COLUMNS
        );

        // Dropping the transaction without commit rolls back every row
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(uploads.len());

        for upload in uploads {
            let row: Upload = sqlx::query_as(&insert)
                .bind(upload.id)
                .bind(&upload.filename)
                .bind(&upload.content_type)
                .bind(upload.file_size())
                .bind(&upload.sha256)
                .bind(&upload.data)
                .bind(&upload.profile_url)
                .bind(&upload.notes)
                .bind(&upload.profile_bio)
                .bind(&upload.conversation_text)
                .bind(upload.risk_score)
                .bind(upload.confidence)
                .bind(Json(&upload.signals))
                .bind(Json(&upload.advice))
                .bind(upload.created_at)
                .fetch_one(&mut *tx)
                .await?;

            debug!("Upload row inserted: id={}, filename={}", row.id, row.filename);
            saved.push(row);
        }

        tx.commit().await?;

        Ok(saved)
    }

    async fn list(&self, limit: Option<i64>) -> Result<Vec<Upload>> {
        // LIMIT NULL is no limit in Postgres
        let query = format!(
            r#"
            SELECT {}
            FROM uploads
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
            UPLOAD_COLUMNS
        );

        let uploads: Vec<Upload> = sqlx::query_as(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(uploads)
    }
}
