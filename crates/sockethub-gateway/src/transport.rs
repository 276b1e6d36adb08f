//! HTTP push transport.
//!
//! Delivers payloads by POSTing to the management endpoint of the upstream
//! gateway: `{endpoint}/@connections/{socket_id}`. A 410 response means
//! the channel no longer exists and maps to [`PushError::Gone`] so fanout
//! can prune it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use sockethub_core::config::push::PushConfig;
use sockethub_core::error::AppError;
use sockethub_core::result::AppResult;
use sockethub_core::traits::{PushError, PushTransport};
use sockethub_core::types::SocketId;

/// Push transport over plain HTTP.
#[derive(Debug, Clone)]
pub struct HttpPushTransport {
    client: reqwest::Client,
}

impl HttpPushTransport {
    /// Create a transport with the configured per-push timeout.
    pub fn new(config: &PushConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::transport(format!("Failed to build push client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PushTransport for HttpPushTransport {
    async fn push(
        &self,
        endpoint: &str,
        payload: &[u8],
        socket_id: &SocketId,
    ) -> Result<(), PushError> {
        let url = format!(
            "{}/@connections/{}",
            endpoint.trim_end_matches('/'),
            socket_id
        );
        debug!(url = %url, "Posting to connection");

        let response = self
            .client
            .post(&url)
            .body(payload.to_vec())
            .send()
            .await
            .map_err(|e| PushError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::GONE => Err(PushError::Gone),
            status if status.is_success() => Ok(()),
            status => Err(PushError::Transport(format!(
                "push returned status {status}"
            ))),
        }
    }
}
