//! Command protocol definitions
//!
//! One command per line: a case-sensitive verb followed by
//! whitespace-separated arguments. No quoting or escaping.

use crate::error::CommandError;

/// A parsed client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/LIST` - list registered nicknames (arguments ignored)
    List,
    /// `/NICK <name>` - register or change nickname
    Nick { args: Vec<String> },
    /// `/BC <words...>` - broadcast to every other registered client
    Broadcast { args: Vec<String> },
    /// `/MSG <name> <words...>` - direct message
    Msg { args: Vec<String> },
    /// Any other verb
    Unknown { verb: String },
}

impl Command {
    /// Parse a raw input line
    ///
    /// Returns `CommandError::NoCommand` for an empty or whitespace-only line.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let verb = tokens.next().ok_or(CommandError::NoCommand)?;
        let args: Vec<String> = tokens.map(str::to_string).collect();

        let cmd = match verb {
            "/LIST" => Command::List,
            "/NICK" => Command::Nick { args },
            "/BC" => Command::Broadcast { args },
            "/MSG" => Command::Msg { args },
            other => Command::Unknown {
                verb: other.to_string(),
            },
        };
        Ok(cmd)
    }
}
