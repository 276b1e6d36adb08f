//! Token verification configuration.

use serde::{Deserialize, Serialize};

/// Credential verifier configuration.
///
/// An empty `secret_key` is a fatal configuration error surfaced when the
/// verifier is constructed, never as a per-request authentication failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key used to validate token signatures. Required.
    #[serde(default)]
    pub secret_key: String,
    /// Token signing algorithm.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            algorithm: default_algorithm(),
        }
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}
