//! Line relay - Entry Point
//!
//! Loads configuration, binds the listener and runs the accept loop
//! until Ctrl-C.

use std::env;
use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use line_relay::{AppError, ChatServer, Config};

/// Environment variable naming an optional TOML config file
const CONFIG_ENV: &str = "LINE_RELAY_CONFIG";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=line_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("line_relay=info")),
        )
        .init();

    // Bind address from command line overrides the config file
    let config_path = env::var_os(CONFIG_ENV).map(PathBuf::from);
    let config = Config::resolve(config_path.as_deref(), env::args().nth(1))?;

    let server = ChatServer::new(config);
    let listener = server.bind().await?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    server.run(listener, shutdown).await?;
    info!("Relay stopped");

    Ok(())
}
