//! jsdrop Core Library
//!
//! This crate provides the domain models, error types, configuration and upload
//! validation shared by the jsdrop server, storage backends and client.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{Config, ServerConfig, StorageConfig, UploadConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    ErrorObject, ErrorPayload, ErrorReply, IncomingFile, StorageKey, StoredObject,
    StoredResponse, UploadFailure, UploadOutcome, UploadResponse, LIMIT_FILE_SIZE,
    LIMIT_UNEXPECTED_FILE, NO_FILE_SELECTED_MESSAGE, TYPE_REJECTED,
};
pub use storage_types::StorageBackend;
pub use validation::{TypeValidator, ValidationError};
