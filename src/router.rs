//! Message router
//!
//! Implements LIST / NICK / BC / MSG against the registry. Routing only
//! computes what to send to whom; [`deliver`] performs the writes after
//! every registry lock has been released.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::client::ClientHandle;
use crate::command::Command;
use crate::error::{CommandError, Verb};
use crate::registry::{Registration, Registry};
use crate::types::is_valid_nickname;

/// One outbound line addressed to one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub to: ClientHandle,
    pub line: String,
}

impl Delivery {
    pub fn new(to: &ClientHandle, line: impl Into<String>) -> Self {
        Self {
            to: to.clone(),
            line: line.into(),
        }
    }
}

/// Routes commands from one client to the registry and other clients
///
/// Stateless between lines: all shared state lives in the registry.
#[derive(Debug, Clone)]
pub struct Router {
    registry: Arc<Registry>,
}

impl Router {
    /// Create a router over the given registry
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Parse and execute one input line from `from`
    ///
    /// Errors never escape: they become a single reply to the sender.
    pub fn route(&self, from: &ClientHandle, line: &str) -> Vec<Delivery> {
        let result = Command::parse(line).and_then(|cmd| self.execute(from, cmd));

        match result {
            Ok(deliveries) => deliveries,
            Err(e) => {
                debug!("Command from {} rejected: {}", from.id(), e);
                vec![Delivery::new(from, e.to_string())]
            }
        }
    }

    /// Execute a parsed command
    pub fn execute(
        &self,
        from: &ClientHandle,
        cmd: Command,
    ) -> Result<Vec<Delivery>, CommandError> {
        match cmd {
            Command::List => Ok(self.handle_list(from)),
            Command::Nick { args } => self.handle_nick(from, args),
            Command::Broadcast { args } => self.handle_broadcast(from, args),
            Command::Msg { args } => self.handle_msg(from, args),
            Command::Unknown { .. } => Err(CommandError::UnknownCommand),
        }
    }

    /// Handle `/LIST`
    fn handle_list(&self, from: &ClientHandle) -> Vec<Delivery> {
        let names = self.registry.snapshot_names();
        vec![Delivery::new(
            from,
            format!("List of NickNames: {}", names.join(", ")),
        )]
    }

    /// Handle `/NICK <name>`
    fn handle_nick(
        &self,
        from: &ClientHandle,
        args: Vec<String>,
    ) -> Result<Vec<Delivery>, CommandError> {
        let [name] = args.as_slice() else {
            return Err(CommandError::Usage(Verb::Nick));
        };

        if !is_valid_nickname(name) {
            return Err(CommandError::InvalidNickname);
        }

        let reply = match self.registry.register(from, name)? {
            Registration::AlreadyOwned => {
                format!("You already have the nickname: '{}'", name)
            }
            Registration::Registered { previous } => {
                match previous {
                    Some(old) => info!("Client {} renamed '{}' -> '{}'", from.id(), old, name),
                    None => info!("Client {} registered as '{}'", from.id(), name),
                }
                format!("You now have the nickname: '{}'", name)
            }
        };

        Ok(vec![Delivery::new(from, reply)])
    }

    /// Handle `/BC <words...>`
    fn handle_broadcast(
        &self,
        from: &ClientHandle,
        args: Vec<String>,
    ) -> Result<Vec<Delivery>, CommandError> {
        let (sender, peers) = self
            .registry
            .name_and_peers(from.id())
            .ok_or(CommandError::NoIdentity)?;

        let line = format!("[{}]: {}", sender, args.join(" "));
        Ok(peers
            .iter()
            .map(|peer| Delivery::new(peer, line.clone()))
            .collect())
    }

    /// Handle `/MSG <name> <words...>`
    fn handle_msg(
        &self,
        from: &ClientHandle,
        args: Vec<String>,
    ) -> Result<Vec<Delivery>, CommandError> {
        let [recipient, words @ ..] = args.as_slice() else {
            return Err(CommandError::Usage(Verb::Msg));
        };
        if words.is_empty() {
            return Err(CommandError::Usage(Verb::Msg));
        }

        let sender = self
            .registry
            .lookup_name_of(from.id())
            .ok_or(CommandError::NoIdentity)?;

        let target = self
            .registry
            .lookup_conn_of(recipient)
            .ok_or_else(|| CommandError::RecipientNotFound(recipient.clone()))?;

        Ok(vec![Delivery::new(
            &target,
            format!("[{}]: {}", sender, words.join(" ")),
        )])
    }
}

/// Write each delivery to its connection
///
/// Replies to `from` wait for buffer space, which only holds up that
/// client's own session. Lines for other clients are fire-and-forget: a
/// full or closed sink drops that one line and the rest still go out.
pub async fn deliver(from: &ClientHandle, deliveries: Vec<Delivery>) {
    for Delivery { to, line } in deliveries {
        let result = if &to == from {
            to.send(line).await
        } else {
            to.try_send(line)
        };
        if let Err(e) = result {
            warn!("Dropped line for {}: {}", to.id(), e);
        }
    }
}
