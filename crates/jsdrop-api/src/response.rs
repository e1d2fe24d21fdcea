//! Maps upload outcomes to response bodies.
//!
//! Exactly one body per request, always sent with status 200. The shape of the
//! body tells the outcomes apart:
//!
//! - stored: `{"image": key, "location": url}`
//! - type rejected: `{"error": "<fixed message>"}`
//! - size / unexpected field: `{"error": {"code", "message", "field"}}`
//! - no file: the bare string `"Error: No File Selected"`

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsdrop_core::{
    ErrorObject, ErrorPayload, ErrorReply, StoredResponse, UploadFailure, UploadOutcome,
    UploadResponse, NO_FILE_SELECTED_MESSAGE,
};

pub fn upload_response(outcome: &UploadOutcome) -> UploadResponse {
    match outcome {
        UploadOutcome::Success(stored) => UploadResponse::Stored(StoredResponse {
            image: stored.key.to_string(),
            location: stored.location.clone(),
        }),
        UploadOutcome::Failure(failure) => UploadResponse::Error(ErrorReply {
            error: failure_payload(failure),
        }),
        UploadOutcome::NoFileSelected => UploadResponse::Bare(NO_FILE_SELECTED_MESSAGE.to_string()),
    }
}

/// Answers the request body cap's 413 with the size-failure body, status 200.
pub async fn body_cap_as_size_failure(
    State(outcome): State<UploadOutcome>,
    response: Response,
) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }

    tracing::debug!(outcome = outcome.label(), "Request body over the cap");
    Json(upload_response(&outcome)).into_response()
}

fn failure_payload(failure: &UploadFailure) -> ErrorPayload {
    match failure {
        UploadFailure::TypeRejected { message } => ErrorPayload::Message(message.clone()),
        UploadFailure::SizeExceeded { field, .. } | UploadFailure::UnexpectedFile { field } => {
            ErrorPayload::Coded(ErrorObject {
                code: failure.code().to_string(),
                message: failure.message(),
                field: Some(field.clone()),
            })
        }
    }
}
