//! API error types and helpers.
//!
//! # Purpose
//! Centralizes HTTP error response construction so every endpoint returns
//! the same `{code, message}` error shape, and maps service errors onto
//! the status contract: validation and duplicate keys are 400, missing
//! flags are 404, undecodable payloads are 422, store failures are 500
//! with details logged server-side only.
use crate::api::types::ErrorResponse;
use crate::service::ServiceError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Structured API error: an HTTP status coupled with a JSON error body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn api_not_found(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        body: ErrorResponse {
            code: "not_found".to_string(),
            message: message.to_string(),
        },
    }
}

pub fn api_already_exists(message: &str) -> ApiError {
    // The contract maps duplicate creates to 400, not 409.
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "already_exists".to_string(),
            message: message.to_string(),
        },
    }
}

pub fn api_validation_error(message: &str) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            code: "validation_error".to_string(),
            message: message.to_string(),
        },
    }
}

/// 422 for payloads that do not decode as the expected JSON shape.
pub fn api_invalid_json() -> ApiError {
    ApiError {
        status: StatusCode::UNPROCESSABLE_ENTITY,
        body: ErrorResponse {
            code: "invalid_json".to_string(),
            message: "cannot decode the given JSON payload".to_string(),
        },
    }
}

pub fn api_internal(message: &str, err: &ServiceError) -> ApiError {
    // Log internal details server-side; return a generic message.
    tracing::error!(error = ?err, "flagd storage error");
    ApiError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorResponse {
            code: "internal".to_string(),
            message: message.to_string(),
        },
    }
}
