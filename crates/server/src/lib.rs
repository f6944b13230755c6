//! Leadgate Server - HTTP endpoint for the lead-capture pipeline
//!
//! This crate exposes the submission pipeline over HTTP. It supports:
//!
//! - **Lead submission**: JSON form POST with validation, captcha
//!   verification, and tiered notification dispatch
//! - **Form bootstrap**: public configuration for the browser-side form
//! - **Health**: liveness/readiness probes
//!
//! # Features
//!
//! - **Middleware**: permissive CORS for the public form, request ID
//!   tracking, structured logging, per-IP rate limiting, a panic boundary
//! - **Configuration**: `.env` + environment variables + optional file
//! - **Error handling**: every failure maps to the
//!   `{success, message, errors?}` envelope
//! - **Graceful shutdown**: SIGTERM/Ctrl+C handling
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - service information
//! - `GET /health` - liveness probe
//! - `GET /ready` - readiness probe
//! - `GET /api/v1/form-config` - public form bootstrap
//! - `POST /api/v1/submit` - lead submission
//! - `POST /api/submit-form` - lead submission (legacy path)

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
