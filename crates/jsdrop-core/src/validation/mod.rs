//! Upload gate: size limit and type allow-list.
//!
//! The size check runs while the file is being received; the type check runs
//! once the whole file is in hand. A file passes the type check only when both
//! its extension and its declared media type are allowed.

use std::path::Path;

use crate::config::UploadConfig;

/// Reasons a received file is turned away
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {limit} bytes)")]
    SizeExceeded { size: u64, limit: u64 },

    #[error("File type rejected: extension {extension:?}, content type {content_type:?}")]
    TypeRejected {
        extension: String,
        content_type: String,
    },
}

/// Extension + media type allow-list with a size limit.
#[derive(Debug, Clone)]
pub struct TypeValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

/// Lower-cased extension without the dot; empty when the name has none.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default()
}

/// Normalize MIME type by stripping parameters (e.g. "text/javascript; charset=utf-8" -> "text/javascript").
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

impl TypeValidator {
    pub fn new(
        max_file_size: u64,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
            allowed_content_types: allowed_content_types
                .iter()
                .map(|ct| normalize_mime_type(ct))
                .collect(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(
            config.max_file_size_bytes,
            config.allowed_extensions.clone(),
            config.allowed_content_types.clone(),
        )
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Check a byte count against the limit. Called with the running total while
    /// a file streams in, so an oversized file is caught before it is complete.
    pub fn check_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::SizeExceeded {
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Accept only if extension AND media type are both on the allow-list.
    pub fn check_type(&self, filename: &str, content_type: &str) -> Result<(), ValidationError> {
        let extension = file_extension(filename);
        let normalized = normalize_mime_type(content_type);

        let extension_ok = self.allowed_extensions.contains(&extension);
        let content_type_ok = self.allowed_content_types.contains(&normalized);

        if extension_ok && content_type_ok {
            return Ok(());
        }

        tracing::debug!(
            filename = %filename,
            extension = %extension,
            content_type = %content_type,
            extension_ok,
            content_type_ok,
            "File type rejected"
        );

        Err(ValidationError::TypeRejected {
            extension,
            content_type: content_type.to_string(),
        })
    }
}
