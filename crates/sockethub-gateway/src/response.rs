//! Caller-visible response type.

use serde::{Deserialize, Serialize};

use sockethub_core::error::AppError;

/// The response returned for every handled event.
///
/// Only a status code and an optional error body cross the handler
/// boundary; raw storage or transport errors never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    /// HTTP-equivalent status code.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Optional error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl GatewayResponse {
    /// A 200 response.
    pub fn ok() -> Self {
        Self::status(200)
    }

    /// A bare response with the given status code.
    pub fn status(status_code: u16) -> Self {
        Self {
            status_code,
            body: None,
        }
    }

    /// A response with a status code and an error body.
    pub fn with_body(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: Some(body.into()),
        }
    }
}

impl From<&AppError> for GatewayResponse {
    fn from(err: &AppError) -> Self {
        Self::with_body(err.status_code(), err.message.clone())
    }
}
