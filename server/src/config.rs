//! Runtime configuration for the game server.
//!
//! The binary fills this from command-line flags and environment variables;
//! tests build it directly.

use crate::error::ServerError;
use shared::{DEFAULT_PORT, DEFAULT_SIDE, MAX_SIDE, MIN_SIDE};

/// Default number of queued outbound frames per session before sends are dropped.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind the listener to
    pub host: String,
    /// TCP port; 0 asks the OS for an ephemeral port
    pub port: u16,
    /// Side length of the square board
    pub board_side: usize,
    /// Bounded queue length of each session's writer task
    pub outbox_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            board_side: DEFAULT_SIDE,
            outbox_capacity: DEFAULT_OUTBOX_CAPACITY,
        }
    }
}

impl ServerConfig {
    /// Loopback config on an ephemeral port.
    pub fn local_ephemeral() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            ..Self::default()
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        if self.host.trim().is_empty() {
            return Err(ServerError::Config("host must not be empty".to_string()));
        }
        if !(MIN_SIDE..=MAX_SIDE).contains(&self.board_side) {
            return Err(ServerError::Config(format!(
                "board side must be between {} and {}, got {}",
                MIN_SIDE, MAX_SIDE, self.board_side
            )));
        }
        if self.outbox_capacity == 0 {
            return Err(ServerError::Config(
                "outbox capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.board_side, 5);
        assert_eq!(config.address(), "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_local_ephemeral() {
        let config = ServerConfig::local_ephemeral();
        assert_eq!(config.address(), "127.0.0.1:0");
    }

    #[test]
    fn test_rejects_bad_board_side() {
        let config = ServerConfig {
            board_side: 1,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));

        let config = ServerConfig {
            board_side: 40,
            ..ServerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ServerError::Config(_))));
    }

    #[test]
    fn test_rejects_zero_capacity_and_empty_host() {
        let config = ServerConfig {
            outbox_capacity: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ServerConfig {
            host: "  ".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
