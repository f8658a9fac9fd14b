use utoipa::{Modify, OpenApi};

use crate::app;
use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::shared::types::Meta;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        app::health_check,
        // Uploads
        uploads_handlers::list_uploads,
        uploads_handlers::create_uploads,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Health
            app::HealthResponseDto,
            // Uploads
            uploads_dtos::CreateUploadsDto,
            uploads_dtos::SignalDto,
            uploads_dtos::UploadResponseDto,
            uploads_dtos::CreateUploadsResponseDto,
        )
    ),
    tags(
        (name = "health", description = "Service liveness"),
        (name = "uploads", description = "Submit profile images with context and list past submissions"),
    ),
    info(
        title = "Catfish Check API",
        version = "0.1.0",
        description = "Upload profile images and context for review",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
