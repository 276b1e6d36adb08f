//! Delivery fanout with lazy pruning.
//!
//! Disconnect notifications are not reliably delivered by every transport,
//! so the registry may lag actual channel liveness. Fanout therefore prunes
//! opportunistically: a push that reports the channel gone removes its
//! registry record, and delivery continues with the remaining targets.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use sockethub_core::result::AppResult;
use sockethub_core::traits::{ConnectionStore, PushError, PushTransport};
use sockethub_core::types::{DeliveryTarget, SocketId};

/// Pushes a payload to every resolved channel of a target participant.
#[derive(Debug)]
pub struct DeliveryFanout {
    /// Registry, for pruning gone channels.
    store: Arc<dyn ConnectionStore>,
    /// Abstract push transport.
    transport: Arc<dyn PushTransport>,
}

impl DeliveryFanout {
    /// Create a new fanout over a store and a transport.
    pub fn new(store: Arc<dyn ConnectionStore>, transport: Arc<dyn PushTransport>) -> Self {
        Self { store, transport }
    }

    /// Deliver a payload to each target sequentially.
    ///
    /// Per-target failures never abort the remaining deliveries and never
    /// surface to the caller beyond logging: a gone channel is pruned, any
    /// other transport error is logged and skipped. Returns 200 once the
    /// loop completes.
    pub async fn fanout(&self, endpoint: &str, targets: &[DeliveryTarget], payload: &[u8]) -> u16 {
        for target in targets {
            self.push_one(endpoint, &target.socket_id, payload).await;
        }
        200
    }

    /// Deliver `"{from}: {msg}"` to every live channel in a space.
    pub async fn broadcast(
        &self,
        endpoint: &str,
        space: &str,
        from: &str,
        msg: &str,
    ) -> AppResult<u16> {
        let records = self.store.select_by_space(space).await?;
        info!(space, count = records.len(), "Broadcasting to space");

        let payload = format!("{from}: {msg}");
        for record in &records {
            self.push_one(endpoint, &record.socket_id, payload.as_bytes())
                .await;
        }
        Ok(200)
    }

    /// One push attempt with local failure recovery.
    async fn push_one(&self, endpoint: &str, socket_id: &SocketId, payload: &[u8]) {
        match self.transport.push(endpoint, payload, socket_id).await {
            Ok(()) => {
                debug!(socket_id = %socket_id, "Posted message to connection");
            }
            Err(PushError::Gone) => {
                info!(socket_id = %socket_id, "Connection is gone, removing");
                if let Err(e) = self.store.delete_by_socket(socket_id).await {
                    error!(socket_id = %socket_id, error = %e, "Couldn't remove gone connection");
                }
            }
            Err(PushError::Transport(message)) => {
                warn!(socket_id = %socket_id, error = %message, "Couldn't post to connection");
            }
        }
    }
}
