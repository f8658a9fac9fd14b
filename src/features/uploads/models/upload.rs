use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Classification tag attached to an upload by a scorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    #[serde(rename = "type")]
    pub signal_type: String,
    pub severity: String,
}

/// Database model for uploads (payload bytes excluded)
#[derive(Debug, Clone, FromRow)]
pub struct Upload {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub sha256: String,
    pub profile_url: String,
    pub notes: String,
    pub profile_bio: String,
    pub conversation_text: String,
    pub risk_score: i32,
    pub confidence: f64,
    pub signals: Json<Vec<Signal>>,
    pub advice: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

/// Everything needed to insert one upload row
#[derive(Debug, Clone)]
pub struct CreateUpload {
    pub id: Uuid,
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub sha256: String,
    pub profile_url: String,
    pub notes: String,
    pub profile_bio: String,
    pub conversation_text: String,
    pub risk_score: i32,
    pub confidence: f64,
    pub signals: Vec<Signal>,
    pub advice: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CreateUpload {
    pub fn file_size(&self) -> i64 {
        self.data.len() as i64
    }

    /// The row as it reads back from storage
    pub fn to_upload(&self) -> Upload {
        Upload {
            id: self.id,
            filename: self.filename.clone(),
            content_type: self.content_type.clone(),
            file_size: self.file_size(),
            sha256: self.sha256.clone(),
            profile_url: self.profile_url.clone(),
            notes: self.notes.clone(),
            profile_bio: self.profile_bio.clone(),
            conversation_text: self.conversation_text.clone(),
            risk_score: self.risk_score,
            confidence: self.confidence,
            signals: Json(self.signals.clone()),
            advice: Json(self.advice.clone()),
            created_at: self.created_at,
        }
    }
}
