//! Feature-flag CRUD handlers.
//!
//! # Purpose
//! Implements list, create, fetch, patch-with-merge, and delete endpoints
//! with consistent error mapping for duplicate keys, validation failures,
//! and missing flags.
use crate::api::error::{
    api_already_exists, api_internal, api_invalid_json, api_not_found, api_validation_error,
    ApiError,
};
use crate::api::types::FeatureListResponse;
use crate::app::AppState;
use crate::model::FeatureFlag;
use crate::service::ServiceError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/v1/features",
    tag = "features",
    responses(
        (status = 200, description = "List feature flags", body = FeatureListResponse)
    )
)]
pub(crate) async fn list_features(
    State(state): State<AppState>,
) -> Result<Json<FeatureListResponse>, ApiError> {
    let items = state
        .features
        .get_features()
        .await
        .map_err(|err| api_internal("failed to list features", &err))?;
    Ok(Json(FeatureListResponse { items }))
}

#[utoipa::path(
    post,
    path = "/v1/features",
    tag = "features",
    request_body = FeatureFlag,
    responses(
        (status = 201, description = "Feature created", body = FeatureFlag),
        (status = 400, description = "Invalid flag or duplicate key", body = crate::api::types::ErrorResponse),
        (status = 422, description = "Malformed payload", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_feature(
    State(state): State<AppState>,
    payload: Result<Json<FeatureFlag>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(flag) = payload.map_err(|_| api_invalid_json())?;
    match state.features.add_feature(flag).await {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(ServiceError::AlreadyExists(_)) => Err(api_already_exists("feature already exists")),
        Err(ServiceError::Invalid(err)) => Err(api_validation_error(&err.to_string())),
        Err(err) => Err(api_internal("failed to create feature", &err)),
    }
}

#[utoipa::path(
    get,
    path = "/v1/features/{feature_key}",
    tag = "features",
    params(
        ("feature_key" = String, Path, description = "Feature key")
    ),
    responses(
        (status = 200, description = "Fetch feature", body = FeatureFlag),
        (status = 404, description = "Feature not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_feature(
    Path(feature_key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<FeatureFlag>, ApiError> {
    match state.features.get_feature(&feature_key).await {
        Ok(flag) => Ok(Json(flag)),
        Err(ServiceError::NotFound(_)) => Err(api_not_found("feature not found")),
        Err(err) => Err(api_internal("failed to fetch feature", &err)),
    }
}

#[utoipa::path(
    patch,
    path = "/v1/features/{feature_key}",
    tag = "features",
    params(
        ("feature_key" = String, Path, description = "Feature key")
    ),
    request_body = FeatureFlag,
    responses(
        (status = 200, description = "Merged feature", body = FeatureFlag),
        (status = 400, description = "Invalid overlay", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Feature not found", body = crate::api::types::ErrorResponse),
        (status = 422, description = "Malformed payload", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn patch_feature(
    Path(feature_key): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<FeatureFlag>, JsonRejection>,
) -> Result<Json<FeatureFlag>, ApiError> {
    let Json(overlay) = payload.map_err(|_| api_invalid_json())?;
    match state.features.update_feature(&feature_key, overlay).await {
        Ok(merged) => Ok(Json(merged)),
        Err(ServiceError::NotFound(_)) => Err(api_not_found("feature not found")),
        Err(ServiceError::Invalid(err)) => Err(api_validation_error(&err.to_string())),
        Err(err) => Err(api_internal("failed to update feature", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/v1/features/{feature_key}",
    tag = "features",
    params(
        ("feature_key" = String, Path, description = "Feature key")
    ),
    responses(
        (status = 204, description = "Feature deleted"),
        (status = 404, description = "Feature not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn delete_feature(
    Path(feature_key): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    match state.features.remove_feature(&feature_key).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(ServiceError::NotFound(_)) => Err(api_not_found("feature not found")),
        Err(err) => Err(api_internal("failed to delete feature", &err)),
    }
}
