//! Leadgate Server - HTTP endpoint for the lead-capture pipeline
//!
//! This binary serves the marketing site's form submissions: validation,
//! captcha verification, and notification dispatch with tiered fallback.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load()?;

    // Start server
    server::start_server(config).await?;

    Ok(())
}
