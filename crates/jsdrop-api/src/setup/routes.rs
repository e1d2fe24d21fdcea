//! Route configuration and setup

use crate::api_doc::get_openapi_spec;
use crate::error::{hide_error_details, HttpAppError};
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::response::body_cap_as_size_failure;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use jsdrop_core::{AppError, Config, UploadFailure, UploadOutcome};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let upload_path = config.upload_path();
    let body_limit = usize::try_from(config.max_request_body_bytes())
        .map_err(|_| anyhow::anyhow!("MAX_REQUEST_BODY_BYTES does not fit in memory"))?;

    tracing::info!(
        upload_path = %upload_path,
        field = %config.upload.field_name,
        max_upload_bytes = config.upload.max_file_size_bytes,
        max_request_body_bytes = body_limit,
        "Upload route configured"
    );

    let openapi = get_openapi_spec(&upload_path);

    let size_exceeded = UploadOutcome::Failure(UploadFailure::SizeExceeded {
        field: config.upload.field_name.clone(),
        limit: config.upload.max_file_size_bytes,
    });

    // The per-file limit is enforced while reading; the extractor default would cut in first.
    // A declared length over the cap never reaches the handler and is answered outside it.
    let upload_routes = Router::new()
        .route(&upload_path, post(handlers::bundle_upload::upload_bundle))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(axum::middleware::map_response_with_state(
            size_exceeded,
            body_cap_as_size_failure,
        ));

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(move || async move { Json(openapi) }),
        )
        .merge(upload_routes)
        .fallback(not_found)
        .with_state(state)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"));

    if config.is_production() {
        app = app.layer(axum::middleware::map_response(hide_error_details));
    }

    let app = app
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware));

    Ok(app)
}

async fn not_found(OriginalUri(uri): OriginalUri) -> HttpAppError {
    HttpAppError(AppError::NotFound(format!("No route for {}", uri.path())))
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
