//! Video Mapper HTTP Server Library
//!
//! Exposes the synchronous mapping endpoint and the health/readiness probes
//! for the video mapper service.

pub mod health;
pub mod routes;

// Re-export for convenience
pub use routes::{create_routes, AppState};
