//! Health endpoint.
use crate::api::error::{api_internal, ApiError};
use crate::api::types::HealthStatus;
use crate::app::AppState;
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/v1/system/health",
    tag = "system",
    responses(
        (status = 200, description = "Service health", body = HealthStatus),
        (status = 500, description = "Store unavailable", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn system_health(
    State(state): State<AppState>,
) -> Result<Json<HealthStatus>, ApiError> {
    // Probe the backing store so readiness reflects dependency health.
    if let Err(err) = state.features.health_check().await {
        return Err(api_internal("storage unavailable", &err));
    }
    Ok(Json(HealthStatus {
        status: "ok".to_string(),
        api_version: state.api_version.clone(),
        backend: state.features.backend_name().to_string(),
        durable: state.features.is_durable(),
    }))
}
