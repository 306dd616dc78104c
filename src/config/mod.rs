//! Configuration management
//!
//! Defaults, then an optional `ringgate.toml` (or the file given on the
//! command line), then `RINGGATE__SECTION__KEY` environment variables.

use config::{ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub log: LogConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive, `RUST_LOG` wins when set
    pub filter: String,
}

/// Seed entries for the in-memory identity directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Public id to internal uid
    #[serde(default)]
    pub entries: HashMap<String, String>,
}

impl Config {
    /// Load configuration; a missing default file is not an error, a missing explicit one is
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let defaults = Config::default();

        config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("log.filter", defaults.log.filter)?
            .add_source(File::with_name(path.unwrap_or("ringgate")).required(path.is_some()))
            .add_source(Environment::with_prefix("RINGGATE").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            log: LogConfig {
                filter: "info".to_string(),
            },
            directory: DirectoryConfig::default(),
        }
    }
}
