//! Server configuration
//!
//! Defaults work out of the box; an optional `chatroom.toml` next to the
//! binary can override them. The port given on the command line always wins.

use config::{Config, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "chatroom";

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the listening socket on.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on. Overridden by the CLI argument.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum number of simultaneously registered clients.
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_clients() -> usize {
    100
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_clients: default_max_clients(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `chatroom.toml` if present, defaults
    /// otherwise.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .build()?;
        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Bind address in `host:port` form.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }
        if self.host.is_empty() {
            return Err(config::ConfigError::Message("host cannot be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.max_clients, 100);
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn validate_rejects_zero_capacity() {
        let config = ServerConfig {
            max_clients: 0,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_host() {
        let config = ServerConfig {
            host: String::new(),
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
