//! Connection registry domain types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The surrogate channel handle used for trigger sources that have no
/// persistent channel of their own (synchronous calls, queued jobs).
/// A reply for these sources travels out of band.
pub const SURROGATE_SOCKET_ID: &str = "00000";

/// Opaque identifier for a delivery channel.
///
/// For realtime connections this is the transport-assigned connection id;
/// for other trigger sources it holds the fixed surrogate value. Using a
/// newtype prevents mixing channel handles with participant ids, which are
/// also strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocketId(pub String);

impl SocketId {
    /// Create a socket id from an existing handle string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The surrogate handle for non-persistent trigger sources.
    pub fn surrogate() -> Self {
        Self(SURROGATE_SOCKET_ID.to_string())
    }

    /// Whether this handle is the non-persistent surrogate.
    pub fn is_surrogate(&self) -> bool {
        self.0 == SURROGATE_SOCKET_ID
    }

    /// Return the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for SocketId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SocketId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A live connection tracked by the registry.
///
/// Records are only ever created (on connect) or deleted (on disconnect or
/// lazy pruning during fanout) — there is no update operation. `socket_id`
/// is unique among live records; one participant may hold any number of
/// records across spaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// The participant that owns this channel.
    pub participant_id: String,
    /// The transport-assigned channel handle.
    pub socket_id: SocketId,
    /// The space (room/namespace) this connection belongs to.
    pub space: String,
    /// When the connection was registered.
    pub connected_at: DateTime<Utc>,
}

/// A resolved delivery destination produced by the registry query used
/// during fanout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryTarget {
    /// The participant that owns the channel.
    pub participant_id: String,
    /// The channel to push to.
    pub socket_id: SocketId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surrogate_socket_id() {
        let surrogate = SocketId::surrogate();
        assert_eq!(surrogate.as_str(), "00000");
        assert!(surrogate.is_surrogate());
        assert!(!SocketId::new("gAbc123=").is_surrogate());
    }

    #[test]
    fn test_socket_id_serde_transparent() {
        let id = SocketId::new("conn-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"conn-1\"");
    }
}
