use axum::{http::StatusCode, routing::get, Json, Router};
use catfish_check::app::build_router;
use catfish_check::client::api::GENERIC_LIST_ERROR;
use catfish_check::client::{
    BlobUrlFactory, ClientConfig, ClientError, FormField, HttpUploadsApi, SelectedFile,
    SubmissionClient, Tab, UploadsApi,
};
use catfish_check::core::config::AppConfig;
use catfish_check::features::uploads::{MemoryUploadRepository, NeutralScorer, UploadService};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_api() -> SocketAddr {
    let service = Arc::new(UploadService::new(
        Arc::new(MemoryUploadRepository::new()),
        Arc::new(NeutralScorer),
    ));
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["http://localhost:5173".to_string()],
        max_request_body_size: AppConfig::DEFAULT_MAX_REQUEST_BODY_SIZE,
    };
    spawn(build_router(service, &config)).await
}

fn client_for(addr: SocketAddr) -> HttpUploadsApi {
    HttpUploadsApi::new(ClientConfig::new(format!("http://{}/", addr)))
}

#[tokio::test]
async fn test_submit_two_images_then_list() {
    let addr = spawn_api().await;
    let previews = BlobUrlFactory::new();
    let mut client = SubmissionClient::new(client_for(addr), previews.clone());

    client.select_files(vec![
        SelectedFile::new("a.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0]),
        SelectedFile::new("b.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47]),
    ]);
    client.set_field(FormField::ProfileUrl, "https://example.com/@alice");
    assert_eq!(previews.live_count(), 2);

    client.submit().await.unwrap();

    let state = client.state();
    assert_eq!(state.error, None);
    assert_eq!(state.active_tab, Tab::Uploads);
    assert!(state.selected_files.is_empty());
    assert_eq!(previews.live_count(), 0);
    assert_eq!(state.uploads.len(), 2);

    let mut filenames: Vec<&str> = state.uploads.iter().map(|u| u.filename.as_str()).collect();
    filenames.sort();
    assert_eq!(filenames, vec!["a.jpg", "b.png"]);

    for upload in &state.uploads {
        assert_eq!(upload.profile_url, "https://example.com/@alice");
        assert_eq!(upload.notes, "");
        assert_eq!(upload.profile_bio, "");
        assert_eq!(upload.conversation_text, "");
        assert_eq!(upload.risk_score, 0);
        assert_eq!(upload.confidence, 0.0);
        assert!(upload.signals.is_empty());
        assert!(upload.advice.is_empty());
    }
}

#[tokio::test]
async fn test_server_rejection_message_reaches_state() {
    let addr = spawn_api().await;
    let mut client = SubmissionClient::new(client_for(addr), BlobUrlFactory::new());

    client.select_files(vec![SelectedFile::new(
        "notes.txt",
        "text/plain",
        b"not an image".to_vec(),
    )]);

    let err = client.submit().await.unwrap_err();

    let ClientError::Request(message) = err else {
        panic!("expected a request error, got {:?}", err);
    };
    assert!(message.contains("text/plain"), "unexpected message: {}", message);
    assert_eq!(client.state().error.as_deref(), Some(message.as_str()));
    assert_eq!(client.state().selected_files.len(), 1);
    assert_eq!(client.state().active_tab, Tab::Submit);
}

#[tokio::test]
async fn test_failure_body_message_is_shown() {
    let app = Router::new().route(
        "/api/uploads",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Database error occurred" })),
            )
        })
        .post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Database error occurred" })),
            )
        }),
    );
    let addr = spawn(app).await;
    let mut client = SubmissionClient::new(client_for(addr), BlobUrlFactory::new());
    client.select_files(vec![SelectedFile::new("a.jpg", "image/jpeg", vec![1, 2, 3])]);

    let err = client.submit().await.unwrap_err();

    assert_eq!(err, ClientError::Request("Database error occurred".to_string()));
    assert_eq!(
        client.state().error.as_deref(),
        Some("Database error occurred")
    );
    assert_eq!(client.state().selected_files.len(), 1);
}

#[tokio::test]
async fn test_unreachable_api_uses_generic_message() {
    // Bind then drop to get a port with nothing listening
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client_for(addr);

    let err = api.list_uploads().await.unwrap_err();

    assert_eq!(err, ClientError::Request(GENERIC_LIST_ERROR.to_string()));
}
