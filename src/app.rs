//! HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures the request-tracing middleware, and
//! defines the shared application state injected into handlers.
//!
//! # Notes
//! Route composition lives here so `main` stays small and router-level
//! tests can drive the full API without binding a socket.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::service::FeatureService;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub features: FeatureService,
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version()
            )
        });

    Router::new()
        .route(
            "/v1/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/v1/features",
            axum::routing::get(api::features::list_features)
                .post(api::features::create_feature),
        )
        .route(
            "/v1/features/access",
            axum::routing::post(api::access::features_access),
        )
        .route(
            "/v1/features/:feature_key",
            axum::routing::get(api::features::get_feature)
                .patch(api::features::patch_feature)
                .delete(api::features::delete_feature),
        )
        .route(
            "/v1/features/:feature_key/access",
            axum::routing::post(api::access::feature_access),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/v1/openapi.json", ApiDoc::openapi()),
        )
        .layer(trace_layer)
        .with_state(state)
}
