//! OpenAPI documentation aggregate

use utoipa::OpenApi;

/// OpenAPI documentation for the extraction API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "road-extract API",
        description = "Road-network extraction for OpenStreetMap features: \
                       request an extraction, poll its status, and receive a \
                       content-delivery URL for the stored NDJSON artifact.",
        license(name = "MIT OR Apache-2.0")
    ),
    paths(
        crate::api::routes::get_extraction,
        crate::api::routes::health_check,
    ),
    components(schemas(
        crate::types::OsmId,
        crate::types::ElementType,
        crate::types::JobState,
        crate::types::JobStatus,
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "extraction", description = "Feature extraction and status polling"),
        (name = "system", description = "Health and introspection")
    )
)]
pub struct ApiDoc;
