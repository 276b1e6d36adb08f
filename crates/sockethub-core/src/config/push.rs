//! Push transport configuration.

use serde::{Deserialize, Serialize};

/// Outbound push endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Fallback push domain, used when the triggering event carries no
    /// endpoint of its own (synchronous and queued sources). Required for
    /// those sources.
    #[serde(default)]
    pub socket_domain: Option<String>,
    /// Deployment stage name appended to the fallback domain when building
    /// the push endpoint.
    #[serde(default = "default_stage")]
    pub stage: String,
    /// Per-push request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            socket_domain: None,
            stage: default_stage(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_stage() -> String {
    "latest".to_string()
}

fn default_request_timeout() -> u64 {
    10
}
