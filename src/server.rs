//! ChatServer accept loop
//!
//! Owns the shared registry and spawns one session task per accepted
//! connection until the shutdown signal fires.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::AppError;
use crate::handler::handle_connection;
use crate::registry::Registry;
use crate::router::Router;

/// The relay server
///
/// Cheap to construct; all per-connection state lives in the spawned
/// session tasks and the shared registry.
pub struct ChatServer {
    config: Arc<Config>,
    router: Router,
}

impl ChatServer {
    /// Create a new ChatServer with an empty registry
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            router: Router::new(Arc::new(Registry::new())),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.router.registry()
    }

    /// Bind the configured address
    pub async fn bind(&self) -> Result<TcpListener, AppError> {
        Ok(TcpListener::bind(&self.config.bind_addr).await?)
    }

    /// Accept connections until `shutdown` resolves
    ///
    /// Accept errors are logged and the loop continues. Sessions already
    /// running are left to finish on their own.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), AppError>
    where
        F: Future<Output = ()>,
    {
        info!("Relay listening on {}", listener.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        debug!("New TCP connection from {}", addr);
                        let router = self.router.clone();
                        let config = self.config.clone();

                        // Spawn handler task for each connection
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, router, &config).await {
                                debug!("Connection from {} ended with error: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                },
            }
        }

        Ok(())
    }
}
