//! # HTTP Server Module
//!
//! axum API for the form service.
//!
//! # Endpoints
//!
//! - `/`, `/health`, `/metrics` - liveness and counters
//! - `/api/form-schema` - the active schema and its default values
//! - `/api/submissions` - validated submission CRUD with pagination

pub mod config;
pub mod form_routes;
pub mod observability_routes;
pub mod server;
pub mod submission_routes;

pub use config::HttpServerConfig;
pub use server::{AppState, HttpServer};
