//! Server configuration from the environment.

use std::net::SocketAddr;

/// Environment variable naming the bind address.
pub const BIND_VAR: &str = "PARTYLINE_BIND";
/// Environment variable with comma-separated demo handles to seed into the
/// in-process directory at startup.
pub const SEED_USERS_VAR: &str = "PARTYLINE_SEED_USERS";

const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The bind address did not parse as `host:port`.
    #[error("{BIND_VAR} must be a socket address, got {value:?}: {source}")]
    InvalidBindAddr {
        /// Offending value.
        value: String,
        /// Parse failure.
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,
    /// Handles seeded into the user directory at startup.
    pub seed_users: Vec<String>,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(BIND_VAR).ok(),
            std::env::var(SEED_USERS_VAR).ok(),
        )
    }

    fn from_values(bind: Option<String>, seed_users: Option<String>) -> Result<Self, ConfigError> {
        let bind = bind.unwrap_or_else(|| DEFAULT_BIND.to_owned());
        let bind_addr = bind
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                source,
            })?;

        let seed_users = seed_users
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|handle| !handle.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            bind_addr,
            seed_users,
        })
    }
}
