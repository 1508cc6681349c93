//! Process configuration
//!
//! Read from the environment by the composition root:
//! - `PORT` (required): TCP port to listen on
//! - `ROUTEGRAPH_HOST`: bind host, default `localhost`
//! - `GRAPH_FILE`: edge list to load, default `graph.txt`

use std::path::PathBuf;
use thiserror::Error;

pub const PORT_ENV: &str = "PORT";
pub const HOST_ENV: &str = "ROUTEGRAPH_HOST";
pub const GRAPH_FILE_ENV: &str = "GRAPH_FILE";

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_GRAPH_FILE: &str = "graph.txt";

/// Configuration errors, all fatal at startup
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("undefined PORT")]
    MissingPort,

    #[error("invalid PORT '{0}': expected a port number")]
    InvalidPort(String),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
    /// Edge list loaded at startup
    pub graph_file: PathBuf,
    /// Largest request a connection may buffer before it is dropped
    pub max_frame_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_HOST.to_string(),
            port: 6380,
            graph_file: PathBuf::from(DEFAULT_GRAPH_FILE),
            max_frame_bytes: 1024 * 1024,
        }
    }
}

impl ServerConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_port = lookup(PORT_ENV).ok_or(ConfigError::MissingPort)?;
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(raw_port.clone()))?;

        let mut config = Self {
            port,
            ..Self::default()
        };
        if let Some(host) = lookup(HOST_ENV) {
            config.address = host;
        }
        if let Some(path) = lookup(GRAPH_FILE_ENV) {
            config.graph_file = PathBuf::from(path);
        }
        Ok(config)
    }

    /// `host:port` string to bind or connect to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}
