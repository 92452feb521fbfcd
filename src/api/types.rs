//! HTTP API request/response types.
//!
//! # Purpose
//! Defines shared payload shapes for the flag REST API and OpenAPI schema
//! generation. Flag bodies reuse the model types directly since the wire
//! shape and the stored shape are identical.
use crate::model::FeatureFlag;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct FeatureListResponse {
    pub items: Vec<FeatureFlag>,
}

/// Access decision for a single flag.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct AccessResponse {
    pub key: String,
    pub access: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
    pub api_version: String,
    pub backend: String,
    pub durable: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}
