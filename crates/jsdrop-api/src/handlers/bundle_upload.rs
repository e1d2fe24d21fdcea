use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use jsdrop_core::{StoredResponse, UploadResponse};

use crate::error::{ErrorResponse, HttpAppError};
use crate::response::upload_response;
use crate::services::upload::process_upload;
use crate::state::AppState;

/// Upload a JavaScript bundle
///
/// Accepts a single file under the configured multipart field (`JSUpload` by
/// default). Every decided outcome is answered with status 200; see
/// `crate::response` for the body shapes.
///
/// # Errors
/// - `AppError::BadRequest` - Body is not readable multipart
/// - `AppError::Storage` - Storage backend refused or failed the write
#[utoipa::path(
    post,
    path = "/api/bundle/js-upload",
    tag = "bundles",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Bundle stored, or a rejection / no-file body", body = StoredResponse),
        (status = 400, description = "Malformed multipart body", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_bundle"))]
pub async fn upload_bundle(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let multipart = multipart?;
    let outcome = process_upload(&state, multipart).await?;

    tracing::debug!(outcome = outcome.label(), "Upload request finished");

    Ok(Json(upload_response(&outcome)))
}
