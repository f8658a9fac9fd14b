use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::config::ClientConfig;
use crate::client::error::ClientError;
use crate::client::models::{FormFields, SelectedFile, Upload};

/// Shown when a failed submission carries no readable error text
pub const GENERIC_SUBMIT_ERROR: &str = "Upload failed. Please try again.";

/// Shown when loading uploads fails without readable error text
pub const GENERIC_LIST_ERROR: &str = "Unable to load uploads.";

/// Network operations the submission client needs
#[async_trait]
pub trait UploadsApi: Send + Sync {
    async fn list_uploads(&self) -> Result<Vec<Upload>, ClientError>;

    async fn create_submission(
        &self,
        files: &[SelectedFile],
        fields: &FormFields,
    ) -> Result<Vec<Upload>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct CreateUploadsResponse {
    #[serde(default)]
    uploads: Vec<Upload>,
}

/// `UploadsApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpUploadsApi {
    http: Client,
    config: ClientConfig,
}

impl HttpUploadsApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    fn build_form(files: &[SelectedFile], fields: &FormFields) -> Result<Form, ClientError> {
        let mut form = Form::new();

        for file in files {
            let part = Part::bytes(file.data.clone())
                .file_name(file.name.clone())
                .mime_str(&file.content_type)
                .map_err(|e| {
                    ClientError::Validation(format!(
                        "File '{}' has an invalid type '{}': {}",
                        file.name, file.content_type, e
                    ))
                })?;
            form = form.part("files", part);
        }

        for (field, value) in fields.filled() {
            form = form.text(field.as_str(), value.to_string());
        }

        Ok(form)
    }
}

#[async_trait]
impl UploadsApi for HttpUploadsApi {
    async fn list_uploads(&self) -> Result<Vec<Upload>, ClientError> {
        let response = self
            .http
            .get(self.config.uploads_url())
            .send()
            .await
            .map_err(|e| {
                warn!("Listing uploads failed: {}", e);
                ClientError::Request(GENERIC_LIST_ERROR.to_string())
            })?;

        let response = ensure_success(response, GENERIC_LIST_ERROR).await?;

        response.json::<Vec<Upload>>().await.map_err(|e| {
            warn!("Invalid uploads list body: {}", e);
            ClientError::Request(GENERIC_LIST_ERROR.to_string())
        })
    }

    async fn create_submission(
        &self,
        files: &[SelectedFile],
        fields: &FormFields,
    ) -> Result<Vec<Upload>, ClientError> {
        let form = Self::build_form(files, fields)?;
        debug!("Submitting {} files to {}", files.len(), self.config.uploads_url());

        let response = self
            .http
            .post(self.config.uploads_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Submitting uploads failed: {}", e);
                ClientError::Request(GENERIC_SUBMIT_ERROR.to_string())
            })?;

        let response = ensure_success(response, GENERIC_SUBMIT_ERROR).await?;

        let body = response.json::<CreateUploadsResponse>().await.map_err(|e| {
            warn!("Invalid create uploads body: {}", e);
            ClientError::Request(GENERIC_SUBMIT_ERROR.to_string())
        })?;

        Ok(body.uploads)
    }
}

/// Pass 2xx responses through; turn anything else into a `Request` error
/// carrying the server's message.
async fn ensure_success(response: Response, fallback: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!("Request failed with status {}: {}", status, body);
    Err(ClientError::Request(error_message_from_body(&body, fallback)))
}

/// Error text to show for a failed response body.
///
/// JSON bodies contribute their `message`, `detail` or `error` string;
/// other non-empty bodies are shown verbatim; anything else gets `fallback`.
pub fn error_message_from_body(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["message", "detail", "error"]
            .iter()
            .find_map(|key| value.get(key).and_then(|v| v.as_str()))
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string()),
        Err(_) => trimmed.to_string(),
    }
}
