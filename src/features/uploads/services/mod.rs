mod scorer;
mod upload_service;

pub use scorer::{Assessment, NeutralScorer, UploadCandidate, UploadScorer};
pub use upload_service::UploadService;
