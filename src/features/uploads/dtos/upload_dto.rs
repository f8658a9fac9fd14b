use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::uploads::models::{Signal, Upload};

/// Maximum number of file parts accepted in one submission
pub const MAX_FILES_PER_SUBMISSION: usize = 5;

/// Maximum file size in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Allowed MIME types for submitted images
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/heic",
    "image/heif",
    "image/bmp",
];

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Check if a MIME type is allowed
pub fn is_mime_type_allowed(content_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&content_type)
}

/// Pick the content type for a file part.
///
/// A declared type wins unless it is missing or the generic octet-stream,
/// in which case the type is guessed from the filename extension.
pub fn resolve_content_type(declared: Option<&str>, filename: &str) -> String {
    let declared = declared
        .map(|ct| ct.split(';').next().unwrap_or("").trim().to_lowercase())
        .filter(|ct| !ct.is_empty() && ct != FALLBACK_CONTENT_TYPE);

    declared.unwrap_or_else(|| {
        mime_guess::from_path(filename)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| FALLBACK_CONTENT_TYPE.to_string())
    })
}

/// Create uploads request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateUploadsDto {
    /// One to five image files, repeated under the same field name
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub files: Vec<String>,
    /// Link to the profile being checked
    #[schema(example = "https://example.com/@alice")]
    pub profile_url: Option<String>,
    /// Free-form notes from the submitter
    pub notes: Option<String>,
    /// Bio text copied from the profile
    pub profile_bio: Option<String>,
    /// Excerpt of the conversation with the profile owner
    pub conversation_text: Option<String>,
}

/// Text metadata shared by every file of a submission.
/// Absent fields are kept as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct UploadMetadataDto {
    #[validate(length(max = 2048, message = "profile_url must be at most 2048 characters"))]
    pub profile_url: String,
    #[validate(length(max = 20000, message = "notes must be at most 20000 characters"))]
    pub notes: String,
    #[validate(length(max = 20000, message = "profile_bio must be at most 20000 characters"))]
    pub profile_bio: String,
    #[validate(length(
        max = 20000,
        message = "conversation_text must be at most 20000 characters"
    ))]
    pub conversation_text: String,
}

/// One file part read from the multipart body
#[derive(Debug, Clone)]
pub struct UploadFilePart {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Signal as exposed over the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SignalDto {
    /// Signal kind
    #[serde(rename = "type")]
    #[schema(example = "exif_missing")]
    pub signal_type: String,
    /// Severity label
    #[schema(example = "med")]
    pub severity: String,
}

impl From<Signal> for SignalDto {
    fn from(signal: Signal) -> Self {
        Self {
            signal_type: signal.signal_type,
            severity: signal.severity,
        }
    }
}

/// Response DTO for one stored upload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponseDto {
    /// Unique identifier for the upload
    pub id: Uuid,
    /// Original filename as uploaded
    pub filename: String,
    /// MIME type of the file
    pub content_type: String,
    /// Size of the file in bytes
    pub file_size: i64,
    /// Hex SHA-256 digest of the file content
    pub sha256: String,
    /// Timestamp when the upload was stored
    pub created_at: DateTime<Utc>,
    /// Risk score from 0 to 100
    pub risk_score: i32,
    /// Confidence of the risk score from 0 to 1
    pub confidence: f64,
    pub signals: Vec<SignalDto>,
    pub advice: Vec<String>,
    pub profile_url: String,
    pub notes: String,
    pub profile_bio: String,
    pub conversation_text: String,
}

impl From<Upload> for UploadResponseDto {
    fn from(upload: Upload) -> Self {
        Self {
            id: upload.id,
            filename: upload.filename,
            content_type: upload.content_type,
            file_size: upload.file_size,
            sha256: upload.sha256,
            created_at: upload.created_at,
            risk_score: upload.risk_score,
            confidence: upload.confidence,
            signals: upload.signals.0.into_iter().map(SignalDto::from).collect(),
            advice: upload.advice.0,
            profile_url: upload.profile_url,
            notes: upload.notes,
            profile_bio: upload.profile_bio,
            conversation_text: upload.conversation_text,
        }
    }
}

/// Response DTO for a created submission, one entry per stored file
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUploadsResponseDto {
    pub uploads: Vec<UploadResponseDto>,
}
