//! Feature-flag data model module.
//!
//! # Purpose
//! Re-exports the flag record, the requester descriptor used by access
//! checks, and the validation error type shared by the service and API
//! layers.
mod feature;

pub use feature::{AccessRequest, FeatureFlag, ValidationError};
