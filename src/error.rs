//! Error types for the relay
//!
//! `CommandError` covers every recoverable per-command failure; its
//! `Display` output is exactly the line sent back to the client.
//! `AppError` covers fatal conditions that end a session or the process.

use thiserror::Error;
use tokio_util::codec::LinesCodecError;

/// Known verbs that carry a usage message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Nick,
    Msg,
}

/// Recoverable command errors (reported to the sender, session continues)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Empty or whitespace-only line
    #[error("Error: No command provided")]
    NoCommand,

    /// First token is not a known verb
    #[error("Unknown command")]
    UnknownCommand,

    /// Wrong argument count for a known verb
    #[error("{}", usage_text(.0))]
    Usage(Verb),

    /// Nickname does not match the display-name pattern
    #[error("Error: Invalid nickname format.")]
    InvalidNickname,

    /// Nickname already owned by another connection
    #[error("Error: The nickname '{0}' is already taken")]
    NameTaken(String),

    /// BC/MSG before any successful NICK
    #[error("Error: You must register a nickname before broadcasting.")]
    NoIdentity,

    /// MSG target is not registered
    #[error("The name: {0} does not exist!")]
    RecipientNotFound(String),
}

fn usage_text(verb: &Verb) -> &'static str {
    match verb {
        Verb::Nick => "Error: Invalid usage of /NICK command. Usage: /NICK <nickname>",
        Verb::Msg => "Error: Invalid usage of /MSG command. Usage: /MSG <nickname> <message>",
    }
}

/// Registry mutation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Name is bound to a different connection
    #[error("Name taken: {0}")]
    NameTaken(String),
}

impl From<RegistryError> for CommandError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NameTaken(name) => CommandError::NameTaken(name),
        }
    }
}

/// Outbound line send errors
///
/// Deliveries are fire-and-forget; these are only logged.
#[derive(Debug, Error)]
pub enum SendError {
    /// The connection's outbound buffer is full (slow reader)
    #[error("Outbound buffer full")]
    Full,

    /// The receiving end of the channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Fatal application errors
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Line framing error (over-long line or read failure)
    #[error("Line codec error: {0}")]
    Codec(#[from] LinesCodecError),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
