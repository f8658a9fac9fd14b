//! Scoring hook for uploads.
//!
//! A scorer looks at one file of a submission together with the shared text
//! metadata and produces the risk fields stored on the record. Only the
//! neutral scorer ships; real detection plugs in behind `UploadScorer`.

use crate::features::uploads::dtos::UploadMetadataDto;
use crate::features::uploads::models::Signal;

/// One file of a submission, as seen by a scorer
#[derive(Debug, Clone, Copy)]
pub struct UploadCandidate<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
    pub sha256: &'a str,
    pub metadata: &'a UploadMetadataDto,
}

/// Risk fields produced for one upload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessment {
    /// 0 to 100
    pub risk_score: i32,
    /// 0 to 1
    pub confidence: f64,
    pub signals: Vec<Signal>,
    pub advice: Vec<String>,
}

impl Assessment {
    /// Keep scores inside their documented ranges
    pub fn clamped(self) -> Self {
        Self {
            risk_score: self.risk_score.clamp(0, 100),
            confidence: if self.confidence.is_finite() {
                self.confidence.clamp(0.0, 1.0)
            } else {
                0.0
            },
            ..self
        }
    }
}

pub trait UploadScorer: Send + Sync {
    fn score(&self, candidate: &UploadCandidate<'_>) -> Assessment;
}

/// Scores every upload as zero risk with no signals or advice
#[derive(Debug, Clone, Copy, Default)]
pub struct NeutralScorer;

impl UploadScorer for NeutralScorer {
    fn score(&self, _candidate: &UploadCandidate<'_>) -> Assessment {
        Assessment::default()
    }
}
