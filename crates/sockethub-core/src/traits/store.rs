//! Connection registry contract.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::{ConnectionRecord, DeliveryTarget, SocketId};

/// Trait for connection registry backends (Postgres or in-memory).
///
/// The registry tracks which channel belongs to which participant and
/// space. Records follow create/delete-only semantics — there is no update
/// operation. Every method is atomic at single-record granularity; no
/// cross-record transactional guarantees are made. Backend failures
/// surface as storage-kind errors.
#[async_trait]
pub trait ConnectionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create one connection record.
    async fn insert(&self, participant_id: &str, socket_id: &SocketId, space: &str)
    -> AppResult<()>;

    /// Delete the record for a socket, if present. Returns the number of
    /// records deleted (0 or 1); deleting an absent socket is not an error.
    async fn delete_by_socket(&self, socket_id: &SocketId) -> AppResult<u64>;

    /// Delete all records for a participant within a space. Used when a
    /// logout closes every channel at once. Returns the number deleted.
    async fn delete_by_participant(&self, participant_id: &str, space: &str) -> AppResult<u64>;

    /// Resolve the live delivery targets for a participant within a space.
    /// Order is unspecified.
    async fn select_by_participant(
        &self,
        participant_id: &str,
        space: &str,
    ) -> AppResult<Vec<DeliveryTarget>>;

    /// List every live record in a space.
    async fn select_by_space(&self, space: &str) -> AppResult<Vec<ConnectionRecord>>;

    /// Look up the record for a socket. Returns `None` when the socket is
    /// not registered.
    async fn select_by_socket(&self, socket_id: &SocketId) -> AppResult<Option<ConnectionRecord>>;
}
