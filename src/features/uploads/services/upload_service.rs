use chrono::{SubsecRound, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::uploads::dtos::{
    is_mime_type_allowed, resolve_content_type, UploadFilePart, UploadMetadataDto,
    UploadResponseDto, ALLOWED_MIME_TYPES, MAX_FILES_PER_SUBMISSION, MAX_FILE_SIZE,
};
use crate::features::uploads::models::CreateUpload;
use crate::features::uploads::repositories::UploadRepository;
use crate::features::uploads::services::scorer::{UploadCandidate, UploadScorer};

/// Service for accepting and listing submissions
pub struct UploadService {
    repository: Arc<dyn UploadRepository>,
    scorer: Arc<dyn UploadScorer>,
}

impl UploadService {
    pub fn new(repository: Arc<dyn UploadRepository>, scorer: Arc<dyn UploadScorer>) -> Self {
        Self { repository, scorer }
    }

    /// Accept a submission of 1..=5 image files sharing one set of text
    /// metadata. Each file becomes its own upload record; all records are
    /// stored together or not at all.
    pub async fn create_submission(
        &self,
        files: Vec<UploadFilePart>,
        metadata: UploadMetadataDto,
    ) -> Result<Vec<UploadResponseDto>> {
        // Parts without a filename come from file inputs left empty
        let files: Vec<UploadFilePart> = files
            .into_iter()
            .filter(|file| !base_filename(&file.filename).is_empty())
            .collect();

        if files.is_empty() {
            return Err(AppError::BadRequest(
                "At least one image is required".to_string(),
            ));
        }
        if files.len() > MAX_FILES_PER_SUBMISSION {
            return Err(AppError::BadRequest(format!(
                "Too many files. At most {} images can be submitted at once",
                MAX_FILES_PER_SUBMISSION
            )));
        }

        metadata
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let mut records = Vec::with_capacity(files.len());
        for file in files {
            records.push(self.prepare_record(file, &metadata)?);
        }

        let count = records.len();
        let saved = self.repository.insert_all(records).await?;

        info!(
            "Submission stored: files={}, ids=[{}]",
            count,
            saved
                .iter()
                .map(|u| u.id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(saved.into_iter().map(UploadResponseDto::from).collect())
    }

    /// Every stored upload, newest first, capped at `limit` when given
    pub async fn list_submissions(&self, limit: Option<i64>) -> Result<Vec<UploadResponseDto>> {
        let uploads = self.repository.list(limit).await?;
        debug!("Listed {} uploads (limit={:?})", uploads.len(), limit);
        Ok(uploads.into_iter().map(UploadResponseDto::from).collect())
    }

    /// Validate one file part and turn it into an insertable record
    fn prepare_record(
        &self,
        file: UploadFilePart,
        metadata: &UploadMetadataDto,
    ) -> Result<CreateUpload> {
        let filename = base_filename(&file.filename);

        if file.data.is_empty() {
            return Err(AppError::BadRequest(format!("File '{}' is empty", filename)));
        }

        if file.data.len() > MAX_FILE_SIZE {
            return Err(AppError::PayloadTooLarge(format!(
                "File '{}' is too large. Maximum size is {} bytes ({} MB)",
                filename,
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        let content_type = resolve_content_type(file.content_type.as_deref(), &filename);
        if !is_mime_type_allowed(&content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_MIME_TYPES.join(", ")
            )));
        }

        let sha256 = hex::encode(Sha256::digest(&file.data));

        let assessment = self
            .scorer
            .score(&UploadCandidate {
                filename: &filename,
                content_type: &content_type,
                data: &file.data,
                sha256: &sha256,
                metadata,
            })
            .clamped();

        Ok(CreateUpload {
            id: Uuid::now_v7(),
            filename,
            content_type,
            data: file.data,
            sha256,
            profile_url: metadata.profile_url.clone(),
            notes: metadata.notes.clone(),
            profile_bio: metadata.profile_bio.clone(),
            conversation_text: metadata.conversation_text.clone(),
            risk_score: assessment.risk_score,
            confidence: assessment.confidence,
            signals: assessment.signals,
            advice: assessment.advice,
            // Postgres keeps microseconds; match it so returned and listed values agree
            created_at: Utc::now().trunc_subsecs(6),
        })
    }
}

/// Last path segment of a client-supplied filename, trimmed
fn base_filename(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}
