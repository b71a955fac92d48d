//! TCP connection handler
//!
//! Adapts a raw `TcpStream` to the session: input is framed into lines
//! with `LinesCodec`, output lines are queued on a bounded channel and
//! written by a dedicated writer task.

use futures_util::SinkExt;
use tokio::net::TcpStream;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec};
use tracing::{debug, info, warn};

use crate::client::ClientHandle;
use crate::config::Config;
use crate::error::AppError;
use crate::router::Router;
use crate::session::run_session;

/// Handle a new TCP connection
///
/// Runs until the peer closes the stream or a read fails; the client's
/// nickname is released before this returns.
pub async fn handle_connection(
    stream: TcpStream,
    router: Router,
    config: &Config,
) -> Result<(), AppError> {
    let peer_addr = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let (read_half, write_half) = stream.into_split();
    let lines = FramedRead::new(
        read_half,
        LinesCodec::new_with_max_length(config.max_line_length),
    );
    let mut sink = FramedWrite::new(write_half, LinesCodec::new());

    let (client, mut outbound) = ClientHandle::channel(config.outbound_buffer);
    let client_id = client.id();
    info!("Client {} connected from {}", client_id, peer_addr);

    // Spawn write task (outbound lines -> socket)
    let write_task = tokio::spawn(async move {
        while let Some(line) = outbound.recv().await {
            if let Err(e) = sink.send(line).await {
                debug!("Write failed for {}: {}", client_id, e);
                break;
            }
        }
        debug!("Write task ended for {}", client_id);
    });

    // The session consumes the last sender-side handle we own; the writer
    // drains whatever is queued and stops once every clone is gone.
    let result = run_session(&router, client, lines).await;

    if let Err(e) = write_task.await {
        warn!("Write task for {} failed: {}", client_id, e);
    }
    info!("Client {} disconnected", client_id);

    result.map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    use super::*;
    use crate::registry::Registry;

    #[tokio::test]
    async fn test_connection_lifecycle() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = Router::new(Arc::new(Registry::new()));

        let server_side = {
            let router = router.clone();
            tokio::spawn(async move {
                let (stream, _) = listener.accept().await.unwrap();
                handle_connection(stream, router, &Config::default()).await
            })
        };

        let stream = TcpStream::connect(addr).await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut replies = BufReader::new(read).lines();

        write.write_all(b"/NICK alice\n").await.unwrap();
        assert_eq!(
            replies.next_line().await.unwrap().unwrap(),
            "You now have the nickname: 'alice'"
        );
        assert_eq!(router.registry().snapshot_names(), vec!["alice"]);

        // Closing our side ends the session cleanly and frees the name
        drop(write);
        assert!(replies.next_line().await.unwrap().is_none());
        server_side.await.unwrap().unwrap();
        assert!(router.registry().is_empty());
    }
}
