//! # API Shared
//!
//! Shared definitions for the CRMS APIs.
//!
//! Contains:
//! - JSON request/response types with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the page it serves.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
