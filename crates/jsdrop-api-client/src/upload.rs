//! Upload client: one selected file, one POST, one interpreted outcome.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use jsdrop_core::{ErrorPayload, ErrorReply, UploadResponse, LIMIT_FILE_SIZE};
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::alerts::{Alert, AlertId, AlertPresenter, Severity};

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_UPLOAD_PATH: &str = "/api/bundle/js-upload";
const DEFAULT_FIELD_NAME: &str = "JSUpload";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 20_000_000;

/// A file the user picked, held in memory until sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Read a file from disk; the media type is guessed from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .with_context(|| format!("Not a file path: {}", path.display()))?;

        let content_type = guess_content_type(&name).to_string();
        Ok(Self {
            name,
            content_type,
            data,
        })
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// `text/javascript` for script extensions, `application/octet-stream` otherwise.
pub fn guess_content_type(file_name: &str) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match extension.as_deref() {
        Some("js") | Some("jsx") | Some("mjs") => "text/javascript",
        _ => "application/octet-stream",
    }
}

/// How one upload attempt ended, from the client's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOutcome {
    Uploaded { key: String, location: String },
    Rejected { code: Option<String>, message: String },
    NoFileSelected,
    TransportFailed(String),
}

impl ClientOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, ClientOutcome::Uploaded { .. })
    }
}

impl From<UploadResponse> for ClientOutcome {
    fn from(response: UploadResponse) -> Self {
        match response {
            UploadResponse::Stored(stored) => ClientOutcome::Uploaded {
                key: stored.image,
                location: stored.location,
            },
            UploadResponse::Error(ErrorReply {
                error: ErrorPayload::Message(message),
            }) => ClientOutcome::Rejected {
                code: None,
                message,
            },
            UploadResponse::Error(ErrorReply {
                error: ErrorPayload::Coded(error),
            }) => ClientOutcome::Rejected {
                code: Some(error.code),
                message: error.message,
            },
            UploadResponse::Bare(message) => ClientOutcome::Rejected {
                code: None,
                message,
            },
        }
    }
}

/// HTTP client for the bundle upload endpoint.
#[derive(Clone, Debug)]
pub struct UploadClient {
    client: Client,
    base_url: String,
    upload_path: String,
    field_name: String,
    max_upload_bytes: u64,
}

impl UploadClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            upload_path: DEFAULT_UPLOAD_PATH.to_string(),
            field_name: DEFAULT_FIELD_NAME.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        })
    }

    /// Create client from environment: JSDROP_API_URL, JSDROP_UPLOAD_PATH,
    /// JSDROP_FIELD_NAME, JSDROP_MAX_UPLOAD_SIZE_BYTES.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("JSDROP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut client = Self::new(base_url)?;

        if let Ok(path) = std::env::var("JSDROP_UPLOAD_PATH") {
            client = client.with_upload_path(path);
        }
        if let Ok(field) = std::env::var("JSDROP_FIELD_NAME") {
            client = client.with_field_name(field);
        }
        if let Ok(max) = std::env::var("JSDROP_MAX_UPLOAD_SIZE_BYTES") {
            let max = max
                .parse()
                .context("JSDROP_MAX_UPLOAD_SIZE_BYTES must be a number")?;
            client = client.with_max_upload_bytes(max);
        }

        Ok(client)
    }

    pub fn with_upload_path(mut self, path: impl Into<String>) -> Self {
        self.upload_path = path.into();
        self
    }

    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: u64) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, self.upload_path)
    }

    /// Send the selected file, if any, and interpret the answer.
    ///
    /// Nothing selected means no request at all. Exactly one attempt is made.
    pub async fn request_upload(&self, file: Option<&SelectedFile>) -> ClientOutcome {
        let Some(file) = file else {
            tracing::debug!("No file selected, nothing sent");
            return ClientOutcome::NoFileSelected;
        };

        match self.post_file(file).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(error = %e, file = %file.name, "Upload request failed");
                ClientOutcome::TransportFailed(format!("{:#}", e))
            }
        }
    }

    async fn post_file(&self, file: &SelectedFile) -> Result<ClientOutcome> {
        let part = Part::bytes(file.data.clone())
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .with_context(|| format!("Invalid media type: {}", file.content_type))?;
        let form = Form::new().part(self.field_name.clone(), part);

        let url = self.upload_url();
        tracing::info!(
            url = %url,
            file = %file.name,
            size_bytes = file.data.len() as u64,
            "Uploading file"
        );

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                body
            ));
        }

        let parsed: UploadResponse = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse response as JSON: {}", body))?;

        Ok(parsed.into())
    }

    /// The notification for an outcome.
    pub fn alert_for(&self, outcome: &ClientOutcome) -> Alert {
        match outcome {
            ClientOutcome::Uploaded { location, .. } => {
                Alert::new(format!("File Uploaded: {}", location), Severity::Success)
            }
            ClientOutcome::Rejected {
                code: Some(code), ..
            } if code == LIMIT_FILE_SIZE => Alert::new(
                format!("Max size: {}MB", self.max_upload_bytes / 1_000_000),
                Severity::Error,
            ),
            ClientOutcome::Rejected { message, .. } => Alert::new(message.clone(), Severity::Error),
            ClientOutcome::NoFileSelected => Alert::new("Please upload file", Severity::Error),
            ClientOutcome::TransportFailed(raw) => Alert::new(raw.clone(), Severity::Error),
        }
    }

    /// Upload and show exactly one alert for the result.
    pub async fn submit(
        &self,
        file: Option<&SelectedFile>,
        presenter: &AlertPresenter,
    ) -> (ClientOutcome, AlertId) {
        let outcome = self.request_upload(file).await;
        let id = presenter.show_alert(&self.alert_for(&outcome));
        (outcome, id)
    }
}
