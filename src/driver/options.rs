//! Driver Options
//!
//! Connection settings handed to a driver's initializer.

use std::fmt;

use serde::Deserialize;

// == Options ==
/// Settings recognized by storage drivers. Each driver reads the fields it
/// needs; the in-memory driver reads none.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Options {
    /// File or socket path for file-backed drivers
    pub path: String,
    /// Host for network-backed drivers
    pub host: String,
    /// Port for network-backed drivers
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Connection pool size
    pub pool_size: usize,
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("Options")
            .field("path", &self.path)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &password)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}
