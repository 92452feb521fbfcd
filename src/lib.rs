//! Feature-flag service library crate.
//!
//! # Purpose
//! Exposes the flag model, access evaluation, service operations, storage
//! backends, and HTTP surface for use by the binary and tests.
pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod observability;
pub mod service;
pub mod store;
