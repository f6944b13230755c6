//! Server initialization and routing
//!
//! Axum server setup: router configuration, middleware stack (CORS, timeout,
//! panic boundary, request logging), and graceful shutdown handling.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, StatusCode};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::middleware::{log_requests, rate_limit, request_id};
use crate::routes::{health, not_found, service_info, submit};
use crate::state::ServerState;

/// Build the Axum router with all routes and middleware
///
/// The submission routes get a body-size cap and per-IP rate limiting on top
/// of the global stack. `/api/submit-form` is the path the original site's
/// forms post to; `/api/v1/submit` is the canonical name.
///
/// Global middleware (applied in reverse order):
/// 1. Request ID tracking
/// 2. Request logging
/// 3. Timeout handling
/// 4. CORS (permissive; the form posts from the public website)
/// 5. Panic boundary
pub fn build_router(state: Arc<ServerState>) -> Router {
    // CORS layer
    let cors = if state.config.enable_cors {
        CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin)
    } else {
        CorsLayer::new()
    };

    let panic_responder = PanicResponder {
        message: state.config.generic_failure_message(),
    };

    // Public routes
    let public_routes = Router::new()
        .route("/", get(service_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/api/v1/form-config", get(submit::form_config));

    // Submission routes: body cap + per-IP rate limit
    let submit_routes = Router::new()
        .route("/api/v1/submit", post(submit::submit_form))
        .route("/api/submit-form", post(submit::submit_form))
        .layer(DefaultBodyLimit::max(state.config.max_body_size()))
        .layer(from_fn_with_state(state.clone(), rate_limit));

    // Combine routes
    Router::new()
        .merge(public_routes)
        .merge(submit_routes)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(state.config.timeout_secs),
        ))
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_responder))
        .layer(from_fn(request_id))
        .layer(from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the leadgate HTTP server
///
/// Initializes structured logging, builds the shared state (verifier and
/// dispatcher constructed once here), binds the listener with peer-address
/// tracking, and serves until SIGTERM or Ctrl+C.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .with_target(false)
        .json()
        .init();

    // Create server state
    let state = Arc::new(ServerState::new(config.clone()));

    // Build router
    let app = build_router(state);

    // Parse bind address
    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!(
        "Starting leadgate server on {} ({:?} environment)",
        addr,
        config.environment
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}KB, Rate limit: {}/hour per IP",
        config.timeout_secs,
        config.max_body_size_kb,
        config.rate_limit_per_hour
    );

    // Start server; connect info feeds the per-request client IP
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// The outer panic boundary: anything that escapes a handler becomes the
/// generic failure message; the panic payload goes to the log only.
#[derive(Clone)]
struct PanicResponder {
    message: String,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> axum::http::Response<Self::ResponseBody> {
        let detail = err
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| err.downcast_ref::<&str>().copied())
            .unwrap_or("non-string panic payload");
        tracing::error!(panic = %detail, "request handler panicked");

        let body = serde_json::json!({
            "success": false,
            "message": self.message,
        });
        axum::http::Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("static response builds")
    }
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
