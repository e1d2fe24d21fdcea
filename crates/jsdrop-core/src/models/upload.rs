use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable code for an oversized file.
pub const LIMIT_FILE_SIZE: &str = "LIMIT_FILE_SIZE";
/// Machine-readable code for a file part outside the single accepted field.
pub const LIMIT_UNEXPECTED_FILE: &str = "LIMIT_UNEXPECTED_FILE";
/// Machine-readable code for an allow-list rejection.
pub const TYPE_REJECTED: &str = "TYPE_REJECTED";

/// A file received in a multipart request. Dropped when the request completes.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl IncomingFile {
    pub fn size_bytes(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Identifier under which an accepted upload is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Self {
        StorageKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// An object persisted by the storage backend: its key and public location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: StorageKey,
    pub location: String,
}

/// Why an upload was turned away before reaching storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadFailure {
    /// File exceeded the configured maximum while being received.
    SizeExceeded { field: String, limit: u64 },
    /// Extension or media type (or both) are outside the allow-list.
    TypeRejected { message: String },
    /// A file arrived under a field other than the upload field, or more than
    /// one file arrived under it.
    UnexpectedFile { field: String },
}

impl UploadFailure {
    pub fn code(&self) -> &'static str {
        match self {
            UploadFailure::SizeExceeded { .. } => LIMIT_FILE_SIZE,
            UploadFailure::TypeRejected { .. } => TYPE_REJECTED,
            UploadFailure::UnexpectedFile { .. } => LIMIT_UNEXPECTED_FILE,
        }
    }

    pub fn message(&self) -> String {
        match self {
            UploadFailure::SizeExceeded { .. } => "File too large".to_string(),
            UploadFailure::TypeRejected { message } => message.clone(),
            UploadFailure::UnexpectedFile { .. } => "Unexpected field".to_string(),
        }
    }
}

/// Result of handling one upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Success(StoredObject),
    Failure(UploadFailure),
    NoFileSelected,
}

impl UploadOutcome {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            UploadOutcome::Success(_) => "success",
            UploadOutcome::Failure(failure) => failure.code(),
            UploadOutcome::NoFileSelected => "no_file_selected",
        }
    }
}
