//! Server configuration read from the environment.

use std::net::SocketAddr;

use crate::error::AppError;

/// Settings the API server needs at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Seed for the shared RNG. Entropy-seeded when absent.
    pub board_seed: Option<u64>,
}

impl ServerConfig {
    /// Reads `HOST`, `PORT` and `BOARD_SEED` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` or `BOARD_SEED` do not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` or `BOARD_SEED` do not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        let board_seed = lookup("BOARD_SEED")
            .map(|raw| {
                raw.parse()
                    .map_err(|e| AppError::Config(format!("BOARD_SEED must be a valid u64: {e}")))
            })
            .transpose()?;

        Ok(Self {
            host,
            port,
            board_seed,
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}
