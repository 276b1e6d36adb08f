//! In-memory connection store for tests and single-node runs.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use sockethub_core::error::AppError;
use sockethub_core::result::AppResult;
use sockethub_core::traits::ConnectionStore;
use sockethub_core::types::{ConnectionRecord, DeliveryTarget, SocketId};

/// Connection registry held entirely in process memory, keyed by socket id.
///
/// Mirrors the Postgres store's semantics, including the unique-socket
/// constraint on insert.
#[derive(Debug, Default)]
pub struct MemoryConnectionStore {
    records: DashMap<String, ConnectionRecord>,
}

impl MemoryConnectionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ConnectionStore for MemoryConnectionStore {
    async fn insert(
        &self,
        participant_id: &str,
        socket_id: &SocketId,
        space: &str,
    ) -> AppResult<()> {
        let record = ConnectionRecord {
            participant_id: participant_id.to_string(),
            socket_id: socket_id.clone(),
            space: space.to_string(),
            connected_at: Utc::now(),
        };

        match self.records.entry(socket_id.as_str().to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::storage(format!(
                "Duplicate socket id '{socket_id}'"
            ))),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    async fn delete_by_socket(&self, socket_id: &SocketId) -> AppResult<u64> {
        Ok(self.records.remove(socket_id.as_str()).map_or(0, |_| 1))
    }

    async fn delete_by_participant(&self, participant_id: &str, space: &str) -> AppResult<u64> {
        // Count inside the retain closure: the map length can move under
        // concurrent inserts, so differencing len() is not reliable.
        let deleted = AtomicU64::new(0);
        self.records.retain(|_, record| {
            if record.participant_id == participant_id && record.space == space {
                deleted.fetch_add(1, Ordering::Relaxed);
                false
            } else {
                true
            }
        });
        Ok(deleted.into_inner())
    }

    async fn select_by_participant(
        &self,
        participant_id: &str,
        space: &str,
    ) -> AppResult<Vec<DeliveryTarget>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| {
                entry.participant_id == participant_id && entry.space == space
            })
            .map(|entry| DeliveryTarget {
                participant_id: entry.participant_id.clone(),
                socket_id: entry.socket_id.clone(),
            })
            .collect())
    }

    async fn select_by_space(&self, space: &str) -> AppResult<Vec<ConnectionRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|entry| entry.space == space)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn select_by_socket(&self, socket_id: &SocketId) -> AppResult<Option<ConnectionRecord>> {
        Ok(self
            .records
            .get(socket_id.as_str())
            .map(|entry| entry.value().clone()))
    }
}
