//! Route handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::AppState;
use crate::error::ApiError;
use crate::service::ExtractionTicket;
use crate::types::{ElementType, OsmId};

/// GET /osm/:id/:type - Request or poll extraction of one feature
///
/// Returns 200 with a success status when the artifact is already stored,
/// 202 with the current job snapshot when a job is registered (freshly
/// launched, still processing, or settled either way), 400 for a malformed
/// id or element type, and 500 when the existence probe cannot determine
/// presence.
#[utoipa::path(
    get,
    path = "/osm/{id}/{type}",
    tag = "extraction",
    params(
        ("id" = String, Path, description = "Numeric OSM feature id"),
        ("type" = String, Path, description = "Element type: node, way, or relation")
    ),
    responses(
        (status = 200, description = "Artifact already stored; status carries its URL", body = crate::types::JobStatus),
        (status = 202, description = "Job registered; current snapshot returned", body = crate::types::JobStatus),
        (status = 400, description = "Invalid feature id or element type", body = crate::error::ApiError),
        (status = 500, description = "Existence probe failed", body = crate::error::ApiError)
    )
)]
pub async fn get_extraction(
    State(state): State<AppState>,
    Path((id, element_type)): Path<(String, String)>,
) -> Response {
    let id: OsmId = match id.parse() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiError::validation(format!("invalid feature id: {id}"))),
            )
                .into_response();
        }
    };

    let element_type: ElementType = match element_type.parse() {
        Ok(element_type) => element_type,
        Err(err) => return err.into_response(),
    };

    match state.service.request_extraction(id, element_type).await {
        Ok(ExtractionTicket::Stored(status)) => (StatusCode::OK, Json(status)).into_response(),
        Ok(ExtractionTicket::Accepted(status)) => {
            (StatusCode::ACCEPTED, Json(status)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

/// GET /health - Health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up")
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /openapi.json - OpenAPI specification
pub async fn openapi_spec() -> impl IntoResponse {
    use utoipa::OpenApi;
    Json(crate::api::ApiDoc::openapi())
}
