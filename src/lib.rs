//! Line-oriented multi-client text relay
//!
//! Clients connect over TCP, register a nickname and exchange broadcast
//! or direct messages through a small line protocol.
//!
//! # Commands
//! - `/LIST` - list registered nicknames
//! - `/NICK <name>` - register or change nickname
//! - `/BC <message>` - broadcast to every other registered client
//! - `/MSG <name> <message>` - direct message
//!
//! # Architecture
//! - `Registry` is the shared nickname → connection map behind one mutex
//! - `Router` turns a command into a list of deliveries without doing I/O
//! - Each connection runs its own `session` task; commands from one
//!   connection execute in order, connections run concurrently
//! - Outbound lines go through a bounded channel to a per-connection
//!   writer task, so a slow client never blocks anyone else
//!
//! # Example
//! ```ignore
//! use line_relay::{ChatServer, Config};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = ChatServer::new(Config::default());
//!     let listener = server.bind().await.unwrap();
//!     server.run(listener, std::future::pending()).await.unwrap();
//! }
//! ```

pub mod client;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod registry;
pub mod router;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use client::ClientHandle;
pub use command::Command;
pub use config::Config;
pub use error::{AppError, CommandError, ConfigError, RegistryError, SendError};
pub use handler::handle_connection;
pub use registry::{Registration, Registry};
pub use router::{deliver, Delivery, Router};
pub use server::ChatServer;
pub use session::run_session;
pub use types::{is_valid_nickname, ConnId};
