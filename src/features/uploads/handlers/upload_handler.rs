use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, Query, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::uploads::dtos::{
    CreateUploadsDto, CreateUploadsResponseDto, UploadFilePart, UploadMetadataDto,
    UploadResponseDto, MAX_FILES_PER_SUBMISSION,
};
use crate::features::uploads::services::UploadService;
use crate::shared::types::LimitQuery;

/// List uploads
///
/// Returns every stored upload, newest first. Pass `limit` to cap the result.
#[utoipa::path(
    get,
    path = "/api/uploads",
    tag = "uploads",
    params(LimitQuery),
    responses(
        (status = 200, description = "Uploads, newest first", body = Vec<UploadResponseDto>),
        (status = 500, description = "Storage unavailable")
    )
)]
pub async fn list_uploads(
    State(service): State<Arc<UploadService>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<UploadResponseDto>>, AppError> {
    let uploads = service.list_submissions(query.limit()).await?;
    Ok(Json(uploads))
}

/// Create uploads
///
/// Accepts multipart/form-data with:
/// - `files`: one to five images (required, repeat the field per file)
/// - `profile_url`, `notes`, `profile_bio`, `conversation_text`: optional text
///
/// Each file is stored as its own upload carrying the shared text fields.
#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "uploads",
    request_body(
        content = CreateUploadsDto,
        content_type = "multipart/form-data",
        description = "Images plus optional profile context",
    ),
    responses(
        (status = 201, description = "Uploads stored", body = CreateUploadsResponseDto),
        (status = 400, description = "Missing files, malformed body or validation error"),
        (status = 413, description = "File too large"),
        (status = 500, description = "Storage unavailable")
    )
)]
pub async fn create_uploads(
    State(service): State<Arc<UploadService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreateUploadsResponseDto>), AppError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Multipart rejected: {}", e);
        AppError::BadRequest(format!("Expected multipart/form-data body: {}", e.body_text()))
    })?;

    let mut files: Vec<UploadFilePart> = Vec::new();
    let mut metadata = UploadMetadataDto::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        multipart_error("Failed to read multipart data", e)
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "files" => {
                // An empty file input still sends a part, with no filename
                if field.file_name().map(str::trim).unwrap_or("").is_empty() {
                    debug!("Skipping file part without a filename");
                    continue;
                }
                if files.len() == MAX_FILES_PER_SUBMISSION {
                    return Err(AppError::BadRequest(format!(
                        "Too many files. At most {} images can be submitted at once",
                        MAX_FILES_PER_SUBMISSION
                    )));
                }
                files.push(read_file(field).await?);
            }
            "profile_url" => metadata.profile_url = read_text(field, "profile_url").await?,
            "notes" => metadata.notes = read_text(field, "notes").await?,
            "profile_bio" => metadata.profile_bio = read_text(field, "profile_bio").await?,
            "conversation_text" => {
                metadata.conversation_text = read_text(field, "conversation_text").await?
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let uploads = service.create_submission(files, metadata).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateUploadsResponseDto { uploads }),
    ))
}

async fn read_file(field: Field<'_>) -> Result<UploadFilePart, AppError> {
    let filename = field.file_name().unwrap_or("").to_string();
    let content_type = field.content_type().map(|s| s.to_string());

    let data = field.bytes().await.map_err(|e| {
        debug!("Failed to read file bytes: {}", e);
        multipart_error("Failed to read file data", e)
    })?;

    Ok(UploadFilePart {
        filename,
        content_type,
        data: data.to_vec(),
    })
}

/// Field text as sent; whitespace-only values count as absent
async fn read_text(field: Field<'_>, name: &str) -> Result<String, AppError> {
    let text = field
        .text()
        .await
        .map_err(|e| multipart_error(&format!("Failed to read {} field", name), e))?;
    if text.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(text)
}

fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: request body too large", context))
    } else {
        AppError::BadRequest(format!("{}: {}", context, e.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::error::{AppError, Result};
    use crate::features::uploads::dtos::{CreateUploadsResponseDto, UploadResponseDto};
    use crate::features::uploads::models::{CreateUpload, Upload};
    use crate::features::uploads::{
        routes, MemoryUploadRepository, NeutralScorer, UploadRepository, UploadService,
    };
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use std::sync::Arc;

    const BODY_LIMIT: usize = 2 * 1024 * 1024;

    /// Fails every call the way a dropped connection pool does
    struct UnavailableRepository;

    #[async_trait]
    impl UploadRepository for UnavailableRepository {
        async fn insert_all(&self, _uploads: Vec<CreateUpload>) -> Result<Vec<Upload>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }

        async fn list(&self, _limit: Option<i64>) -> Result<Vec<Upload>> {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn server_with(repository: Arc<dyn UploadRepository>) -> TestServer {
        let service = Arc::new(UploadService::new(repository, Arc::new(NeutralScorer)));
        TestServer::new(routes(service, BODY_LIMIT)).unwrap()
    }

    fn test_server() -> TestServer {
        server_with(Arc::new(MemoryUploadRepository::new()))
    }

    fn image_part(name: &str) -> Part {
        Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3])
            .file_name(name)
            .mime_type("image/jpeg")
    }

    #[tokio::test]
    async fn test_create_then_list_two_files() {
        let server = test_server();
        let form = MultipartForm::new()
            .add_part("files", image_part("first.jpg"))
            .add_part("files", image_part("second.jpg"))
            .add_text("profile_url", "https://example.com/@alice");

        let response = server.post("/api/uploads").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let created: CreateUploadsResponseDto = response.json();
        assert_eq!(created.uploads.len(), 2);

        let listed: Vec<UploadResponseDto> = server.get("/api/uploads").await.json();
        assert_eq!(listed.len(), 2);
        let mut names: Vec<&str> = listed.iter().map(|u| u.filename.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["first.jpg", "second.jpg"]);
        for upload in &listed {
            assert_eq!(upload.profile_url, "https://example.com/@alice");
            assert_eq!(upload.profile_bio, "");
            assert_eq!(upload.conversation_text, "");
            assert_eq!(upload.notes, "");
            assert_eq!(upload.risk_score, 0);
            assert!(upload.signals.is_empty());
            assert!(upload.advice.is_empty());
        }
    }

    #[tokio::test]
    async fn test_list_json_has_placeholder_fields() {
        let server = test_server();
        server
            .post("/api/uploads")
            .multipart(MultipartForm::new().add_part("files", image_part("a.jpg")))
            .await
            .assert_status(StatusCode::CREATED);

        let listed: serde_json::Value = server.get("/api/uploads").await.json();

        let first = &listed[0];
        assert!(first["id"].is_string());
        assert!(first["created_at"].is_string());
        assert_eq!(first["risk_score"], 0);
        assert_eq!(first["signals"], serde_json::json!([]));
        assert_eq!(first["advice"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_without_files_is_rejected() {
        let server = test_server();
        let form = MultipartForm::new().add_text("notes", "no pictures here");

        let response = server.post("/api/uploads").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "At least one image is required");

        let listed: Vec<UploadResponseDto> = server.get("/api/uploads").await.json();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_six_files_is_rejected() {
        let server = test_server();
        let form = (0..6).fold(MultipartForm::new(), |form, i| {
            form.add_part("files", image_part(&format!("{}.jpg", i)))
        });

        let response = server.post("/api/uploads").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let listed: Vec<UploadResponseDto> = server.get("/api/uploads").await.json();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_rejected() {
        let server = test_server();

        let response = server
            .post("/api/uploads")
            .json(&serde_json::json!({ "files": [] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected() {
        let server = test_server();
        let form = MultipartForm::new().add_part(
            "files",
            Part::text("plain text").file_name("notes.txt").mime_type("text/plain"),
        );

        let response = server.post("/api/uploads").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_body_over_limit_is_rejected() {
        let server = test_server();
        let form = MultipartForm::new().add_part(
            "files",
            Part::bytes(vec![0u8; BODY_LIMIT + 1])
                .file_name("big.png")
                .mime_type("image/png"),
        );

        let response = server.post("/api/uploads").multipart(form).await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_list_limit_query() {
        let server = test_server();
        let form = (0..3).fold(MultipartForm::new(), |form, i| {
            form.add_part("files", image_part(&format!("{}.jpg", i)))
        });
        server
            .post("/api/uploads")
            .multipart(form)
            .await
            .assert_status(StatusCode::CREATED);

        let listed: Vec<UploadResponseDto> = server
            .get("/api/uploads")
            .add_query_param("limit", 2)
            .await
            .json();

        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_across_submissions() {
        let server = test_server();
        for name in ["older.jpg", "newer.jpg"] {
            server
                .post("/api/uploads")
                .multipart(MultipartForm::new().add_part("files", image_part(name)))
                .await
                .assert_status(StatusCode::CREATED);
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let listed: Vec<UploadResponseDto> = server.get("/api/uploads").await.json();

        assert_eq!(listed[0].filename, "newer.jpg");
        assert_eq!(listed[1].filename, "older.jpg");
        assert!(listed[0].created_at >= listed[1].created_at);
    }

    #[tokio::test]
    async fn test_text_fields_are_stored_as_sent() {
        let server = test_server();
        let conversation = "  them: hi\n  me: hey\n";
        let form = MultipartForm::new()
            .add_part("files", image_part("chat.jpg"))
            .add_text("conversation_text", conversation)
            .add_text("profile_bio", "\tLoves hiking ")
            .add_text("notes", "   \n");

        server
            .post("/api/uploads")
            .multipart(form)
            .await
            .assert_status(StatusCode::CREATED);

        let listed: Vec<UploadResponseDto> = server.get("/api/uploads").await.json();
        assert_eq!(listed[0].conversation_text, conversation);
        assert_eq!(listed[0].profile_bio, "\tLoves hiking ");
        assert_eq!(listed[0].notes, "");
    }

    #[tokio::test]
    async fn test_file_parts_without_filename_are_skipped() {
        let server = test_server();
        let empty_input = Part::bytes(Vec::<u8>::new())
            .file_name("")
            .mime_type("application/octet-stream");
        let form = (0..5)
            .fold(MultipartForm::new(), |form, i| {
                form.add_part("files", image_part(&format!("{}.jpg", i)))
            })
            .add_part("files", empty_input);

        let response = server.post("/api/uploads").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let created: CreateUploadsResponseDto = response.json();
        assert_eq!(created.uploads.len(), 5);
    }

    #[tokio::test]
    async fn test_only_blank_file_parts_count_as_no_files() {
        let server = test_server();
        let form = MultipartForm::new().add_part(
            "files",
            Part::bytes(Vec::<u8>::new())
                .file_name("")
                .mime_type("application/octet-stream"),
        );

        let response = server.post("/api/uploads").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "At least one image is required");
    }

    #[tokio::test]
    async fn test_storage_failure_returns_generic_500() {
        let server = server_with(Arc::new(UnavailableRepository));

        let response = server.get("/api/uploads").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Database error occurred");

        let response = server
            .post("/api/uploads")
            .multipart(MultipartForm::new().add_part("files", image_part("a.jpg")))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert_eq!(body["message"], "Database error occurred");
        assert!(!body.to_string().contains("pool timed out"));
    }
}
