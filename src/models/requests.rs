//! Request DTOs for the HTTP surface
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::storage::Value;

/// Maximum accepted key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Request body for PUT /set
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The key to write
    pub key: String,
    /// Any JSON value
    pub value: Value,
    /// TTL in seconds; the server default applies when omitted
    #[serde(default)]
    pub ttl: Option<i64>,
    /// Write-once entry
    #[serde(default)]
    pub immutable: bool,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// Request body for POST /upgrade/:key
#[derive(Debug, Clone, Deserialize)]
pub struct UpgradeRequest {
    /// New TTL in seconds
    pub ttl: i64,
}

/// Checks a key taken from a path or body.
pub fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    if key.len() > MAX_KEY_LENGTH {
        return Some(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        ));
    }
    None
}
