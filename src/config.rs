//! Server configuration
//!
//! Built-in defaults, optionally overlaid by a TOML file, with the bind
//! address overridable from the command line.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default server address
pub const DEFAULT_ADDR: &str = "0.0.0.0:6666";

/// Default per-connection outbound line buffer
pub const DEFAULT_OUTBOUND_BUFFER: usize = 64;

/// Default maximum accepted input line length in bytes (64 KiB)
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Relay configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address to bind to (e.g., "0.0.0.0:6666")
    pub bind_addr: String,
    /// Lines queued per connection before deliveries are dropped
    pub outbound_buffer: usize,
    /// Longest input line accepted; longer lines end the session
    pub max_line_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_ADDR.to_string(),
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text; missing keys take defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Resolve the effective configuration
    ///
    /// `path` is an optional TOML file; `addr` overrides `bind_addr`.
    pub fn resolve(path: Option<&Path>, addr: Option<String>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(addr) = addr {
            config.bind_addr = addr;
        }
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.outbound_buffer == 0 {
            return Err(ConfigError::Invalid("outbound_buffer must be > 0"));
        }
        if self.max_line_length == 0 {
            return Err(ConfigError::Invalid("max_line_length must be > 0"));
        }
        Ok(())
    }
}
