use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::uploads::handlers::{create_uploads, list_uploads};
use crate::features::uploads::services::UploadService;

/// Create routes for the uploads feature.
///
/// `max_body_size` caps the whole multipart body of a submission.
pub fn routes(upload_service: Arc<UploadService>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/uploads",
            get(list_uploads)
                .post(create_uploads)
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .with_state(upload_service)
}
