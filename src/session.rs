//! Session lifecycle
//!
//! Drives one connection from its first line to end-of-stream. Commands
//! from a single connection run one at a time in arrival order; separate
//! connections run on separate tasks.

use futures_util::{Stream, StreamExt};
use tracing::{debug, info};

use crate::client::ClientHandle;
use crate::router::{deliver, Router};

/// Run a session until the line source ends
///
/// Every line is routed and its deliveries written before the next line
/// is read. When the source yields `None` or an error, the connection's
/// nickname is removed from the registry exactly once and the error (if
/// any) is returned. Nothing is executed for this client after cleanup.
pub async fn run_session<S, E>(router: &Router, client: ClientHandle, mut lines: S) -> Result<(), E>
where
    S: Stream<Item = Result<String, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut outcome = Ok(());

    while let Some(next) = lines.next().await {
        match next {
            Ok(line) => {
                debug!("<- {}: {}", client.id(), line);
                deliver(&client, router.route(&client, &line)).await;
            }
            Err(e) => {
                debug!("Read error for {}: {}", client.id(), e);
                outcome = Err(e);
                break;
            }
        }
    }

    match router.registry().remove(client.id()) {
        Some(name) => info!("Client {} ('{}') left", client.id(), name),
        None => debug!("Client {} left without a nickname", client.id()),
    }

    outcome
}
