//! Access-check handlers.
//!
//! # Purpose
//! Answers "does this requester get this feature" for a single flag, and
//! filters the full flag set down to what a requester can access. The
//! decision itself lives on the model; these handlers only fetch, decode,
//! and count.
use crate::api::error::{api_internal, api_invalid_json, api_not_found, ApiError};
use crate::api::types::{AccessResponse, FeatureListResponse};
use crate::app::AppState;
use crate::model::AccessRequest;
use crate::service::ServiceError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;

#[utoipa::path(
    post,
    path = "/v1/features/{feature_key}/access",
    tag = "access",
    params(
        ("feature_key" = String, Path, description = "Feature key")
    ),
    request_body = AccessRequest,
    responses(
        (status = 200, description = "Access decision", body = AccessResponse),
        (status = 404, description = "Feature not found", body = crate::api::types::ErrorResponse),
        (status = 422, description = "Malformed payload", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn feature_access(
    Path(feature_key): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<AccessRequest>, JsonRejection>,
) -> Result<Json<AccessResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| api_invalid_json())?;
    let flag = match state.features.get_feature(&feature_key).await {
        Ok(flag) => flag,
        Err(ServiceError::NotFound(_)) => return Err(api_not_found("feature not found")),
        Err(err) => return Err(api_internal("failed to fetch feature", &err)),
    };
    let access = flag.grants_access(&request);
    let decision = if access { "grant" } else { "deny" };
    metrics::counter!("flagd_access_checks_total", "decision" => decision).increment(1);
    Ok(Json(AccessResponse {
        key: feature_key,
        access,
    }))
}

#[utoipa::path(
    post,
    path = "/v1/features/access",
    tag = "access",
    request_body = AccessRequest,
    responses(
        (status = 200, description = "Flags the requester can access", body = FeatureListResponse),
        (status = 422, description = "Malformed payload", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn features_access(
    State(state): State<AppState>,
    payload: Result<Json<AccessRequest>, JsonRejection>,
) -> Result<Json<FeatureListResponse>, ApiError> {
    let Json(request) = payload.map_err(|_| api_invalid_json())?;
    let flags = state
        .features
        .get_features()
        .await
        .map_err(|err| api_internal("failed to list features", &err))?;
    let items = flags
        .into_iter()
        .filter(|flag| flag.grants_access(&request))
        .collect();
    Ok(Json(FeatureListResponse { items }))
}
