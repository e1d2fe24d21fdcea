//! Configuration module
//!
//! This module provides the configuration for the upload server: listener and
//! CORS settings, the upload gate (size limit and type allow-list), and the
//! storage backend selection with its credentials. Everything is read from the
//! process environment (optionally seeded from a `.env` file) at startup.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 5000;
const UPLOAD_ROUTE_BASE: &str = "/api/bundle";
const UPLOAD_FIELD_NAME: &str = "JSUpload";
const MAX_UPLOAD_SIZE_BYTES: u64 = 20_000_000;
const MAX_REQUEST_BODY_BYTES: u64 = 100_000_000;
const ALLOWED_EXTENSIONS: &str = "js,jsx";
const ALLOWED_CONTENT_TYPES: &str = "text/javascript";
const TYPE_REJECTED_MESSAGE: &str = "Error: JS Only!";

/// Listener and HTTP-level settings
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Transport-level cap on the whole request body
    pub max_request_body_bytes: u64,
}

/// Upload gate settings
#[derive(Clone, Debug)]
pub struct UploadConfig {
    /// Mount point of the upload router, e.g. `/api/bundle`
    pub route_base: String,
    /// Multipart field that carries the file
    pub field_name: String,
    pub max_file_size_bytes: u64,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub type_rejected_message: String,
}

/// Storage backend settings. Credentials are never compiled in.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    // Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub s3_endpoint: Option<String>,
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub storage: StorageConfig,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server = ServerConfig {
            port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            max_request_body_bytes: var("MAX_REQUEST_BODY_BYTES")
                .map(|s| {
                    s.parse()
                        .map_err(|_| anyhow::anyhow!("MAX_REQUEST_BODY_BYTES must be a number"))
                })
                .transpose()?
                .unwrap_or(MAX_REQUEST_BODY_BYTES),
        };

        let upload = UploadConfig {
            route_base: var("UPLOAD_ROUTE_BASE")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| UPLOAD_ROUTE_BASE.to_string()),
            field_name: var("UPLOAD_FIELD_NAME")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| UPLOAD_FIELD_NAME.to_string()),
            max_file_size_bytes: var("MAX_UPLOAD_SIZE_BYTES")
                .map(|s| {
                    s.parse()
                        .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_SIZE_BYTES must be a number"))
                })
                .transpose()?
                .unwrap_or(MAX_UPLOAD_SIZE_BYTES),
            allowed_extensions: split_list(
                &var("ALLOWED_EXTENSIONS").unwrap_or_else(|| ALLOWED_EXTENSIONS.to_string()),
            )
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_string())
            .collect(),
            allowed_content_types: split_list(
                &var("ALLOWED_CONTENT_TYPES").unwrap_or_else(|| ALLOWED_CONTENT_TYPES.to_string()),
            ),
            type_rejected_message: var("TYPE_REJECTED_MESSAGE")
                .unwrap_or_else(|| TYPE_REJECTED_MESSAGE.to_string()),
        };

        let backend = match var("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::S3,
        };

        let storage = StorageConfig {
            backend,
            s3_bucket: var("S3_BUCKET").filter(|s| !s.is_empty()),
            s3_region: var("S3_REGION").filter(|s| !s.is_empty()),
            s3_endpoint: var("S3_ENDPOINT").filter(|s| !s.is_empty()),
            aws_region: var("AWS_REGION").filter(|s| !s.is_empty()),
            aws_access_key_id: var("AWS_ACCESS_KEY_ID").filter(|s| !s.is_empty()),
            aws_secret_access_key: var("AWS_SECRET_ACCESS_KEY").filter(|s| !s.is_empty()),
            local_storage_path: var("LOCAL_STORAGE_PATH").filter(|s| !s.is_empty()),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL").filter(|s| !s.is_empty()),
        };

        let config = Config {
            server,
            upload,
            storage,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.server.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.server.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        // Empty means mounted at the root ("/" trims to "")
        if !self.upload.route_base.is_empty() && !self.upload.route_base.starts_with('/') {
            return Err(anyhow::anyhow!("UPLOAD_ROUTE_BASE must start with '/'"));
        }

        if self.upload.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_BYTES must be greater than 0"));
        }

        if self.server.max_request_body_bytes < self.upload.max_file_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_BODY_BYTES must be at least MAX_UPLOAD_SIZE_BYTES"
            ));
        }

        if self.upload.allowed_extensions.is_empty() || self.upload.allowed_content_types.is_empty()
        {
            return Err(anyhow::anyhow!(
                "ALLOWED_EXTENSIONS and ALLOWED_CONTENT_TYPES must not be empty"
            ));
        }

        // Validate storage backend configuration
        match self.storage.backend {
            StorageBackend::S3 => {
                if self.storage.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.storage.s3_region.is_none() && self.storage.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
                if self.storage.aws_access_key_id.is_some()
                    != self.storage.aws_secret_access_key.is_some()
                {
                    return Err(anyhow::anyhow!(
                        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.storage.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.storage.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.server.port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.server.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.server.environment
    }

    pub fn max_request_body_bytes(&self) -> u64 {
        self.server.max_request_body_bytes
    }

    /// Full path of the upload endpoint, e.g. `/api/bundle/js-upload`
    pub fn upload_path(&self) -> String {
        format!("{}/js-upload", self.upload.route_base)
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage.backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.storage.s3_bucket.as_deref()
    }

    /// `S3_REGION`, falling back to `AWS_REGION`
    pub fn s3_region(&self) -> Option<&str> {
        self.storage
            .s3_region
            .as_deref()
            .or(self.storage.aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.storage.s3_endpoint.as_deref()
    }

    pub fn aws_credentials(&self) -> Option<(&str, &str)> {
        match (
            self.storage.aws_access_key_id.as_deref(),
            self.storage.aws_secret_access_key.as_deref(),
        ) {
            (Some(id), Some(secret)) => Some((id, secret)),
            _ => None,
        }
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.storage.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.storage.local_storage_base_url.as_deref()
    }
}
