//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::driver::{Options, MEMORY_DRIVER};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the storage driver to select from the registry
    pub driver: String,
    /// Options handed to the driver's initializer
    pub storage: Options,
    /// HTTP bind address
    pub server_host: String,
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for writes that omit one, 0 = no expiry
    pub default_ttl: i64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `STORAGE_DRIVER` - Driver name (default: memory)
    /// - `STORAGE_PATH`, `STORAGE_HOST`, `STORAGE_PORT`, `STORAGE_USERNAME`,
    ///   `STORAGE_PASSWORD`, `STORAGE_POOL_SIZE` - Driver options
    /// - `SERVER_HOST` - HTTP bind address (default: 0.0.0.0)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            driver: env::var("STORAGE_DRIVER").unwrap_or(defaults.driver),
            storage: Options {
                path: env::var("STORAGE_PATH").unwrap_or_default(),
                host: env::var("STORAGE_HOST").unwrap_or_default(),
                port: parse_var("STORAGE_PORT").unwrap_or_default(),
                username: env::var("STORAGE_USERNAME").unwrap_or_default(),
                password: env::var("STORAGE_PASSWORD").unwrap_or_default(),
                pool_size: parse_var("STORAGE_POOL_SIZE").unwrap_or_default(),
            },
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_ttl: parse_var("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
        }
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Reads and parses an environment variable, ignoring unparseable values.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            driver: MEMORY_DRIVER.to_string(),
            storage: Options::default(),
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            default_ttl: 0,
        }
    }
}
