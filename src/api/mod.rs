//! HTTP API module.
//!
//! # Purpose
//! Exposes the route handler modules and the shared error/response types.
pub mod access;
pub mod error;
pub mod features;
pub mod openapi;
pub mod system;
pub mod types;
