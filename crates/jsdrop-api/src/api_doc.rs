//! OpenAPI documentation.
//! Handler annotations use the default upload path; it is rewritten at runtime
//! when `UPLOAD_ROUTE_BASE` mounts the router elsewhere.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use jsdrop_core::models;

/// Upload path used in handler annotations (utoipa requires compile-time literals).
const OPENAPI_UPLOAD_PATH: &str = "/api/bundle/js-upload";

fn transform_upload_path(spec: &mut utoipa::openapi::OpenApi, upload_path: &str) {
    if OPENAPI_UPLOAD_PATH == upload_path {
        return;
    }
    if let Some(item) = spec.paths.paths.remove(OPENAPI_UPLOAD_PATH) {
        spec.paths.paths.insert(upload_path.to_string(), item);
    }
}

/// Returns the OpenAPI spec with the upload path as actually mounted.
pub fn get_openapi_spec(upload_path: &str) -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_upload_path(&mut spec, upload_path);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "jsdrop API",
        version = "0.1.0",
        description = "Single-file JavaScript bundle upload service"
    ),
    paths(
        handlers::bundle_upload::upload_bundle,
        handlers::health::health_check,
    ),
    components(schemas(
        models::StoredResponse,
        models::ErrorObject,
        error::ErrorResponse,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "bundles", description = "Bundle upload"),
        (name = "health", description = "Health checks")
    )
)]
pub struct ApiDoc;
