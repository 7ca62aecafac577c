//! HTTP API server for Locker.
//!
//! This crate provides the HTTP surface over `locker-metadata`:
//! - Registration and login
//! - Session authentication via the `X-Session` header
//! - Per-owner file upload, download, listing and deletion
//! - Health and Prometheus metrics endpoints

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use auth::{AuthenticatedUser, TraceId};
pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
