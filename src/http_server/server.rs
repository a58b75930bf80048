//! # HTTP Server
//!
//! Combines the schema, submission and observability routers behind CORS,
//! with a JSON 404 for everything else.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{http::StatusCode, Json, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::HttpServerConfig;
use super::form_routes::form_routes;
use super::observability_routes::observability_routes;
use super::submission_routes::{submission_routes, ErrorResponse, SubmissionState};
use crate::observability::{Event, Logger, MetricsRegistry};
use crate::schema::FormValidator;
use crate::submissions::SubmissionRepository;

/// Everything the handlers share
#[derive(Clone)]
pub struct AppState {
    pub validator: FormValidator,
    pub repository: Arc<dyn SubmissionRepository>,
    pub metrics: Arc<MetricsRegistry>,
}

impl AppState {
    pub fn new(validator: FormValidator, repository: Arc<dyn SubmissionRepository>) -> Self {
        Self {
            validator,
            repository,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }
}

/// HTTP server for form submissions
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: AppState) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        let submission_state = Arc::new(SubmissionState {
            validator: state.validator.clone(),
            repository: state.repository,
            metrics: Arc::clone(&state.metrics),
            max_page_limit: config.max_page_limit,
        });

        Router::new()
            .merge(observability_routes(state.metrics))
            .nest(
                "/api",
                form_routes(state.validator.shared_schema()).merge(submission_routes(submission_state)),
            )
            .fallback(not_found_handler)
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        Logger::event(Event::ServerReady)
            .field("addr", listener.local_addr()?)
            .emit();

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Logger::event(Event::ServerStopped).emit();
        Ok(())
    }
}

async fn shutdown_signal() {
    // If the handler cannot be installed, run until killed.
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}
