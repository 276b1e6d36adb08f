//! Route dispatch.
//!
//! Each inbound event is processed to completion independently; the
//! dispatcher holds no state across invocations. Handlers catch the error
//! kinds they can originate and translate them to a status code, so no raw
//! storage or transport error crosses this boundary.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use sockethub_auth::CredentialVerifier;
use sockethub_core::config::push::PushConfig;
use sockethub_core::traits::{ConnectionStore, PushTransport};

use crate::event::{self, NormalizedEvent, TriggerSource};
use crate::fanout::DeliveryFanout;
use crate::response::GatewayResponse;

/// Route key for new connections.
const ROUTE_CONNECT: &str = "$connect";
/// Route key for closed connections.
const ROUTE_DISCONNECT: &str = "$disconnect";

/// Maps a normalized event's route key to its handler.
#[derive(Debug)]
pub struct RoutingDispatcher {
    /// Credential verifier for connect requests.
    verifier: CredentialVerifier,
    /// Connection registry.
    store: Arc<dyn ConnectionStore>,
    /// Fanout delivery.
    fanout: DeliveryFanout,
    /// Push endpoint configuration.
    push_config: PushConfig,
}

impl RoutingDispatcher {
    /// Create a dispatcher over its collaborators.
    pub fn new(
        verifier: CredentialVerifier,
        store: Arc<dyn ConnectionStore>,
        transport: Arc<dyn PushTransport>,
        push_config: PushConfig,
    ) -> Self {
        let fanout = DeliveryFanout::new(store.clone(), transport);
        Self {
            verifier,
            store,
            fanout,
            push_config,
        }
    }

    /// Normalize and route one raw inbound event.
    ///
    /// Handles three routes: `$connect`, `$disconnect`, and `sendmessage`.
    /// Any other route results in a 404.
    pub async fn dispatch(&self, raw: &Value) -> GatewayResponse {
        let event = match event::normalize(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Rejecting unclassifiable event");
                return GatewayResponse::from(&e);
            }
        };

        debug!(route_key = %event.route_key, source = ?event.source, "Dispatching event");

        if event.route_key.is_empty() || event.channel_handle.as_str().is_empty() {
            return GatewayResponse::with_body(400, "Missing route key or channel handle");
        }

        match event.route_key.as_str() {
            ROUTE_CONNECT => self.handle_connect(&event).await,
            ROUTE_DISCONNECT => self.handle_disconnect(&event).await,
            event::SENDMESSAGE_ROUTE => self.handle_send_message(&event).await,
            other => {
                warn!(route_key = other, "Unknown route");
                GatewayResponse::status(404)
            }
        }
    }

    /// Authenticate the connect token and register the channel.
    async fn handle_connect(&self, event: &NormalizedEvent) -> GatewayResponse {
        let participant_id = match self.verifier.verify(&event.connect_token) {
            Ok(participant_id) => participant_id,
            Err(e) => {
                warn!(error = %e, "Couldn't authenticate connection");
                return GatewayResponse::from(&e);
            }
        };

        match self
            .store
            .insert(&participant_id, &event.channel_handle, &event.space)
            .await
        {
            Ok(()) => {
                info!(
                    socket_id = %event.channel_handle,
                    participant_id = %participant_id,
                    space = %event.space,
                    "Added connection"
                );
                GatewayResponse::ok()
            }
            Err(e) => {
                warn!(socket_id = %event.channel_handle, error = %e, "Couldn't add connection");
                GatewayResponse::from(&e)
            }
        }
    }

    /// Remove the channel's record. Idempotent: deleting an absent channel
    /// deletes zero records and still succeeds.
    async fn handle_disconnect(&self, event: &NormalizedEvent) -> GatewayResponse {
        match self.store.delete_by_socket(&event.channel_handle).await {
            Ok(deleted) => {
                debug!(socket_id = %event.channel_handle, deleted, "Disconnected connection");
                GatewayResponse::ok()
            }
            Err(e) => {
                warn!(socket_id = %event.channel_handle, error = %e, "Couldn't disconnect connection");
                GatewayResponse::from(&e)
            }
        }
    }

    /// Resolve the target's live channels and fan the message out.
    async fn handle_send_message(&self, event: &NormalizedEvent) -> GatewayResponse {
        let Some(participant_id) = event.body.get("participant_id").and_then(Value::as_str)
        else {
            return GatewayResponse::with_body(400, "Missing participant_id in message body");
        };
        let Some(space) = event.body.get("space").and_then(Value::as_str) else {
            return GatewayResponse::with_body(400, "Missing space in message body");
        };
        let Some(msg) = event.body.get("msg") else {
            return GatewayResponse::with_body(400, "Missing msg in message body");
        };

        let endpoint = match self.resolve_endpoint(event) {
            Ok(endpoint) => endpoint,
            Err(response) => return response,
        };

        let targets = match self.store.select_by_participant(participant_id, space).await {
            Ok(targets) => targets,
            Err(e) => {
                warn!(participant_id, error = %e, "Couldn't resolve participant connections");
                return GatewayResponse::from(&e);
            }
        };

        if targets.is_empty() {
            info!(participant_id, space, "No live channels for participant");
            return GatewayResponse::status(404);
        }

        let payload = serde_json::json!({
            "participant_id": participant_id,
            "message": msg,
        });
        let payload = payload.to_string();

        let status = self
            .fanout
            .fanout(&endpoint, &targets, payload.as_bytes())
            .await;
        GatewayResponse::status(status)
    }

    /// Pick the push endpoint for this event.
    ///
    /// Realtime events carry their own domain and stage; the other sources
    /// build the endpoint from the configured socket domain and stage. An
    /// absent socket domain is a fatal configuration error.
    fn resolve_endpoint(&self, event: &NormalizedEvent) -> Result<String, GatewayResponse> {
        if event.source == TriggerSource::Realtime {
            match (&event.domain_name, &event.stage) {
                (Some(domain), Some(stage)) => Ok(format!("https://{domain}/{stage}")),
                (domain, stage) => {
                    warn!(
                        domain = domain.as_deref().unwrap_or(""),
                        stage = stage.as_deref().unwrap_or(""),
                        "Couldn't send message: bad endpoint in request"
                    );
                    Err(GatewayResponse::status(400))
                }
            }
        } else {
            match &self.push_config.socket_domain {
                Some(domain) => Ok(format!(
                    "{}/{}",
                    domain.trim_end_matches('/'),
                    self.push_config.stage
                )),
                None => Err(GatewayResponse::with_body(
                    500,
                    "socket_domain must be set in configuration",
                )),
            }
        }
    }
}
