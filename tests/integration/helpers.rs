//! Shared test helpers for integration tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use sockethub_auth::{Claims, CredentialVerifier};
use sockethub_core::config::auth::AuthConfig;
use sockethub_core::config::push::PushConfig;
use sockethub_core::traits::{PushError, PushTransport};
use sockethub_core::types::SocketId;
use sockethub_gateway::{GatewayResponse, RoutingDispatcher};
use sockethub_registry::MemoryConnectionStore;

/// Signing secret shared by the test verifier and minted tokens.
pub const TEST_SECRET: &str = "integration-secret";

/// Fallback push domain configured for non-realtime sources.
pub const TEST_DOMAIN: &str = "https://push.test";

/// Endpoint the gateway builds from the fallback domain and default stage.
pub const TEST_ENDPOINT: &str = "https://push.test/latest";

/// A recorded push attempt.
#[derive(Debug, Clone)]
pub struct RecordedPush {
    pub endpoint: String,
    pub socket_id: String,
    pub payload: String,
}

/// Push transport double that records deliveries and can report sockets
/// as gone.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pushes: Mutex<Vec<RecordedPush>>,
    gone: Mutex<HashSet<String>>,
}

impl RecordingTransport {
    /// Report this socket as gone on future pushes.
    pub fn mark_gone(&self, socket_id: &str) {
        self.gone.lock().unwrap().insert(socket_id.to_string());
    }

    /// Every successful push so far.
    pub fn pushes(&self) -> Vec<RecordedPush> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn push(
        &self,
        endpoint: &str,
        payload: &[u8],
        socket_id: &SocketId,
    ) -> Result<(), PushError> {
        if self.gone.lock().unwrap().contains(socket_id.as_str()) {
            return Err(PushError::Gone);
        }
        self.pushes.lock().unwrap().push(RecordedPush {
            endpoint: endpoint.to_string(),
            socket_id: socket_id.as_str().to_string(),
            payload: String::from_utf8_lossy(payload).into_owned(),
        });
        Ok(())
    }
}

/// Gateway test context over the in-memory store and recording transport.
pub struct TestGateway {
    pub dispatcher: RoutingDispatcher,
    pub store: Arc<MemoryConnectionStore>,
    pub transport: Arc<RecordingTransport>,
}

impl TestGateway {
    /// Build a gateway with the test secret and fallback push domain.
    pub fn new() -> Self {
        let verifier = CredentialVerifier::new(&AuthConfig {
            secret_key: TEST_SECRET.to_string(),
            algorithm: "HS256".to_string(),
        })
        .expect("Failed to build verifier");

        let store = Arc::new(MemoryConnectionStore::new());
        let transport = Arc::new(RecordingTransport::default());
        let push_config = PushConfig {
            socket_domain: Some(TEST_DOMAIN.to_string()),
            ..PushConfig::default()
        };

        let dispatcher =
            RoutingDispatcher::new(verifier, store.clone(), transport.clone(), push_config);

        Self {
            dispatcher,
            store,
            transport,
        }
    }

    /// Dispatch a raw event.
    pub async fn dispatch(&self, raw: &Value) -> GatewayResponse {
        self.dispatcher.dispatch(raw).await
    }

    /// Connect a participant over a realtime channel.
    pub async fn connect(&self, token: &str, socket: &str, space: &str) -> GatewayResponse {
        self.dispatch(&json!({
            "requestContext": { "routeKey": "$connect", "connectionId": socket },
            "queryStringParameters": { "participant_id": token, "space": space }
        }))
        .await
    }

    /// Disconnect a realtime channel.
    pub async fn disconnect(&self, socket: &str) -> GatewayResponse {
        self.dispatch(&json!({
            "requestContext": { "routeKey": "$disconnect", "connectionId": socket }
        }))
        .await
    }

    /// Send a message through the synchronous trigger source.
    pub async fn send_message(
        &self,
        participant_id: &str,
        space: &str,
        msg: &str,
    ) -> GatewayResponse {
        let body = json!({
            "participant_id": participant_id,
            "space": space,
            "action": "sendmessage",
            "msg": msg,
        });
        self.dispatch(&json!({
            "requestContext": { "resourcePath": "/{participant_id+}" },
            "body": body.to_string(),
        }))
        .await
    }
}

/// Mint a signed token for a participant with the given expiry offset.
pub fn mint_token(id_user: &str, exp_offset_secs: i64) -> String {
    let claims = Claims {
        id_user: id_user.to_string(),
        exp: chrono::Utc::now().timestamp() + exp_offset_secs,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("Failed to mint token")
}
