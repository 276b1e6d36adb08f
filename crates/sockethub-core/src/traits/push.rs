//! Outbound push transport contract.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::SocketId;

/// Failure modes of a single push attempt.
///
/// `Gone` is distinguished so fanout can prune the channel's registry
/// record; every other failure is a generic transport error that fanout
/// logs and skips.
#[derive(Debug, Error)]
pub enum PushError {
    /// The channel no longer exists at the transport.
    #[error("channel is gone")]
    Gone,
    /// Any other transport failure.
    #[error("push transport error: {0}")]
    Transport(String),
}

/// Trait for the outbound push transport.
///
/// Implementations deliver a payload to a single channel behind a push
/// endpoint. The core performs at most one attempt per push; retry policy
/// belongs to the caller's boundary.
#[async_trait]
pub trait PushTransport: Send + Sync + std::fmt::Debug + 'static {
    /// Push a payload to one channel.
    async fn push(&self, endpoint: &str, payload: &[u8], socket_id: &SocketId)
    -> Result<(), PushError>;
}
