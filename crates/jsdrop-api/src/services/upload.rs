//! Bundle upload pipeline: reception, size check, type check, key, storage.

use std::time::Instant;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use chrono::Utc;
use jsdrop_core::{AppError, IncomingFile, TypeValidator, UploadFailure, UploadOutcome};
use jsdrop_storage::generate_storage_key;

use crate::error::storage_app_error;
use crate::state::AppState;

/// What reception produced for one request.
#[derive(Debug)]
pub enum Reception {
    File(IncomingFile),
    Rejected(UploadFailure),
    NoFile,
}

/// Run one request through the pipeline and decide its outcome.
///
/// Validation failures and the no-file case are outcomes, not errors; only
/// malformed bodies and storage failures come back as `Err`.
pub async fn process_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<UploadOutcome, AppError> {
    let upload_config = &state.config.upload;

    let file = match receive_file(&mut multipart, &upload_config.field_name, &state.validator)
        .await?
    {
        Reception::File(file) => file,
        Reception::Rejected(failure) => {
            tracing::info!(code = failure.code(), "Upload rejected during reception");
            return Ok(UploadOutcome::Failure(failure));
        }
        Reception::NoFile => {
            tracing::debug!(field = %upload_config.field_name, "No file selected");
            return Ok(UploadOutcome::NoFileSelected);
        }
    };

    if let Err(e) = state
        .validator
        .check_type(&file.original_filename, &file.content_type)
    {
        tracing::info!(
            error = %e,
            original_filename = %file.original_filename,
            content_type = %file.content_type,
            "Upload rejected by type check"
        );
        return Ok(UploadOutcome::Failure(UploadFailure::TypeRejected {
            message: upload_config.type_rejected_message.clone(),
        }));
    }

    let key = generate_storage_key(&file.original_filename, Utc::now());
    let size = file.size_bytes();
    let start = Instant::now();

    tracing::info!(
        key = %key,
        original_filename = %file.original_filename,
        size_bytes = size,
        "Processing upload"
    );

    let stored = state
        .storage
        .put(&key, &file.content_type, Bytes::from(file.data))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to upload to storage");
            storage_app_error(e)
        })?;

    tracing::info!(
        key = %stored.key,
        location = %stored.location,
        size_bytes = size,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Upload to storage successful"
    );

    Ok(UploadOutcome::Success(stored))
}

/// Read the multipart body, keeping at most one file from `field_name`.
///
/// The file is read chunk by chunk and abandoned as soon as the running total
/// passes the limit. Plain text fields and blank file inputs are skipped; a file
/// under any other field, or a second file, is an unexpected file. Once a rejection is decided the rest
/// of the body is drained so the client receives the answer.
pub async fn receive_file(
    multipart: &mut Multipart,
    field_name: &str,
    validator: &TypeValidator,
) -> Result<Reception, AppError> {
    let mut received: Option<IncomingFile> = None;

    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return reception_error(e, field_name, validator),
        };

        // No filename means a plain text field
        let Some(original_filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        // Browsers send an empty part for any file input left blank
        if original_filename.is_empty() {
            continue;
        }

        let name = field.name().unwrap_or_default().to_string();

        if name != field_name || received.is_some() {
            tracing::debug!(field = %name, "Unexpected file field");
            drop(field);
            drain(multipart).await;
            return Ok(Reception::Rejected(UploadFailure::UnexpectedFile {
                field: name,
            }));
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let data = match read_limited(&mut field, validator).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::debug!(
                    field = %name,
                    original_filename = %original_filename,
                    limit = validator.max_file_size(),
                    "File exceeded size limit while receiving"
                );
                drop(field);
                drain(multipart).await;
                return Ok(Reception::Rejected(size_exceeded(field_name, validator)));
            }
            Err(e) => return reception_error(e, field_name, validator),
        };

        received = Some(IncomingFile {
            original_filename,
            content_type,
            data,
        });
    }

    Ok(received.map_or(Reception::NoFile, Reception::File))
}

/// Collect a field's bytes; `None` once the running total passes the limit.
async fn read_limited(
    field: &mut Field<'_>,
    validator: &TypeValidator,
) -> Result<Option<Vec<u8>>, MultipartError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        let total = (data.len() + chunk.len()) as u64;
        if validator.check_size(total).is_err() {
            return Ok(None);
        }
        data.extend_from_slice(&chunk);
    }
    Ok(Some(data))
}

/// Consume what is left of the body. Errors end the drain.
async fn drain(multipart: &mut Multipart) {
    while let Ok(Some(mut field)) = multipart.next_field().await {
        while let Ok(Some(_)) = field.chunk().await {}
    }
}

fn size_exceeded(field_name: &str, validator: &TypeValidator) -> UploadFailure {
    UploadFailure::SizeExceeded {
        field: field_name.to_string(),
        limit: validator.max_file_size(),
    }
}

/// A body cap tripping mid-read is a size failure; anything else is malformed input.
fn reception_error(
    err: MultipartError,
    field_name: &str,
    validator: &TypeValidator,
) -> Result<Reception, AppError> {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::debug!(error = %err, "Request body limit reached while receiving");
        return Ok(Reception::Rejected(size_exceeded(field_name, validator)));
    }
    Err(AppError::BadRequest(format!(
        "Failed to read multipart body: {}",
        err.body_text()
    )))
}
