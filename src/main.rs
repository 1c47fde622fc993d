//! # Rollplayer Chat Server
//!
//! Application entry point: initializes tracing, loads configuration, and
//! runs the HTTP/WebSocket server.

use anyhow::Result;
use tracing::info;

use rollplayer_chat::config::Settings;
use rollplayer_chat::startup::Application;

#[tokio::main]
async fn main() -> Result<()> {
    rollplayer_chat::telemetry::init_tracing();

    info!("Starting Rollplayer Chat server...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
