//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::sieve::RawCondition;

/// Request body for PUT /cache
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds, fractions allowed (uses default if not specified)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<f64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if let Some(ttl) = self.ttl {
            if self.ttl_duration().is_none() {
                return Some(format!("TTL must be a non-negative number of seconds, got {}", ttl));
            }
        }
        None
    }

    /// The requested TTL, if present and representable.
    pub fn ttl_duration(&self) -> Option<Duration> {
        self.ttl
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

/// Request body for POST /filter
#[derive(Debug, Clone, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub conditions: Vec<RawCondition>,
    pub records: Vec<Value>,
}
