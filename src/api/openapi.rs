//! OpenAPI schema aggregation.
//!
//! # Purpose
//! Collects all routes and schema types into a single document served at
//! `/v1/openapi.json` and rendered by the Swagger UI.
use crate::api::types::{AccessResponse, ErrorResponse, FeatureListResponse, HealthStatus};
use crate::api::{access, features, system};
use crate::model::{AccessRequest, FeatureFlag};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "flagd",
        version = "v1",
        description = "Feature-flag management HTTP API"
    ),
    paths(
        system::system_health,
        features::list_features,
        features::create_feature,
        features::get_feature,
        features::patch_feature,
        features::delete_feature,
        access::feature_access,
        access::features_access
    ),
    components(schemas(
        FeatureFlag,
        AccessRequest,
        AccessResponse,
        FeatureListResponse,
        HealthStatus,
        ErrorResponse
    )),
    tags(
        (name = "system", description = "Health and service metadata"),
        (name = "features", description = "Feature-flag management"),
        (name = "access", description = "Access evaluation")
    )
)]
pub struct ApiDoc;
