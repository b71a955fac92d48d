//! Connection handle definition
//!
//! An opaque, cloneable reference to one connection's outbound line sink.
//! Two handles are equal exactly when they refer to the same connection.

use std::hash::{Hash, Hasher};

use tokio::sync::mpsc;

use crate::error::SendError;
use crate::types::ConnId;

/// Handle to a connected client
///
/// Holds the connection's unique ID and the sender side of its outbound
/// line channel. The registry stores these as values; the session owns
/// the underlying socket.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ConnId,
    sender: mpsc::Sender<String>,
}

impl ClientHandle {
    /// Create a new handle with the given ID and sender channel
    pub fn new(id: ConnId, sender: mpsc::Sender<String>) -> Self {
        Self { id, sender }
    }

    /// Create a handle with a fresh ID and its paired receiver
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self::new(ConnId::new(), tx), rx)
    }

    pub fn id(&self) -> ConnId {
        self.id
    }

    /// Queue a line for this client, waiting for buffer space
    ///
    /// Returns an error if the channel is closed (client disconnected).
    pub async fn send(&self, line: String) -> Result<(), SendError> {
        self.sender
            .send(line)
            .await
            .map_err(|_| SendError::ChannelClosed)
    }

    /// Queue a line for this client without waiting
    ///
    /// Fails if the outbound buffer is full or the client has gone away.
    /// The line must not include a terminator; the writer adds it.
    pub fn try_send(&self, line: String) -> Result<(), SendError> {
        self.sender.try_send(line).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => SendError::Full,
            mpsc::error::TrySendError::Closed(_) => SendError::ChannelClosed,
        })
    }
}

impl PartialEq for ClientHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClientHandle {}

impl Hash for ClientHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
