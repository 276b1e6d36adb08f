//! Integration tests for the full connect / send / disconnect flow.

mod helpers;

use serde_json::json;

use helpers::{TestGateway, mint_token};
use sockethub_core::traits::ConnectionStore;
use sockethub_core::types::SocketId;

#[tokio::test]
async fn test_connect_registers_live_channel() {
    let gateway = TestGateway::new();
    let token = mint_token("u1", 3600);

    let response = gateway.connect(&token, "c1", "TEST").await;
    assert_eq!(response.status_code, 200);

    let targets = gateway
        .store
        .select_by_participant("u1", "TEST")
        .await
        .unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].socket_id.as_str(), "c1");
}

#[tokio::test]
async fn test_expired_token_is_rejected_without_record() {
    let gateway = TestGateway::new();
    let token = mint_token("u1", -3600);

    let response = gateway.connect(&token, "c1", "TEST").await;
    assert_eq!(response.status_code, 401);
    assert!(gateway.store.is_empty());
}

#[tokio::test]
async fn test_guest_default_token_is_rejected() {
    let gateway = TestGateway::new();

    // No participant_id query parameter: the "guest" default is not a
    // valid signed token, so no unauthenticated record is ever persisted.
    let response = gateway
        .dispatch(&json!({
            "requestContext": { "routeKey": "$connect", "connectionId": "c1" }
        }))
        .await;
    assert_eq!(response.status_code, 401);
    assert!(gateway.store.is_empty());
}

#[tokio::test]
async fn test_full_message_flow() {
    let gateway = TestGateway::new();
    let token = mint_token("u1", 3600);

    assert_eq!(gateway.connect(&token, "c1", "TEST").await.status_code, 200);

    let response = gateway.send_message("u1", "TEST", "hi").await;
    assert_eq!(response.status_code, 200);

    let pushes = gateway.transport.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].socket_id, "c1");
    assert_eq!(pushes[0].endpoint, helpers::TEST_ENDPOINT);
    assert!(pushes[0].payload.contains("hi"));
    assert!(pushes[0].payload.contains("u1"));

    assert_eq!(gateway.disconnect("c1").await.status_code, 200);

    // No live channels remain for the participant.
    let response = gateway.send_message("u1", "TEST", "hi again").await;
    assert_eq!(response.status_code, 404);
    assert_eq!(gateway.transport.pushes().len(), 1);
}

#[tokio::test]
async fn test_double_disconnect_is_idempotent() {
    let gateway = TestGateway::new();
    let token = mint_token("u1", 3600);
    gateway.connect(&token, "c1", "TEST").await;

    assert_eq!(gateway.disconnect("c1").await.status_code, 200);
    assert_eq!(gateway.disconnect("c1").await.status_code, 200);
}

#[tokio::test]
async fn test_fanout_prunes_gone_channel_and_delivers_rest() {
    let gateway = TestGateway::new();
    let token = mint_token("u1", 3600);
    for socket in ["c1", "c2", "c3"] {
        assert_eq!(gateway.connect(&token, socket, "TEST").await.status_code, 200);
    }
    gateway.transport.mark_gone("c2");

    let response = gateway.send_message("u1", "TEST", "hello all").await;
    assert_eq!(response.status_code, 200);

    // The two live channels received the payload.
    let pushed: Vec<_> = gateway
        .transport
        .pushes()
        .iter()
        .map(|p| p.socket_id.clone())
        .collect();
    assert_eq!(pushed.len(), 2);
    assert!(pushed.contains(&"c1".to_string()));
    assert!(pushed.contains(&"c3".to_string()));

    // Exactly the gone channel was pruned.
    assert_eq!(gateway.store.len(), 2);
    assert!(
        gateway
            .store
            .select_by_socket(&SocketId::new("c2"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_send_message_through_queued_source() {
    let gateway = TestGateway::new();
    let token = mint_token("u1", 3600);
    gateway.connect(&token, "c1", "TEST").await;

    let body = json!({
        "action": "sendmessage",
        "participant_id": "u1",
        "space": "TEST",
        "msg": "queued hello",
    });
    let response = gateway
        .dispatch(&json!({
            "Records": [{ "eventSource": "aws:sqs", "body": body.to_string() }]
        }))
        .await;

    assert_eq!(response.status_code, 200);
    let pushes = gateway.transport.pushes();
    assert_eq!(pushes.len(), 1);
    assert!(pushes[0].payload.contains("queued hello"));
}

#[tokio::test]
async fn test_connections_are_scoped_to_space() {
    let gateway = TestGateway::new();
    let token = mint_token("u1", 3600);
    gateway.connect(&token, "c1", "ROOM_A").await;
    gateway.connect(&token, "c2", "ROOM_B").await;

    let response = gateway.send_message("u1", "ROOM_A", "only a").await;
    assert_eq!(response.status_code, 200);

    let pushes = gateway.transport.pushes();
    assert_eq!(pushes.len(), 1);
    assert_eq!(pushes[0].socket_id, "c1");
}

#[tokio::test]
async fn test_unclassifiable_event_is_bad_request() {
    let gateway = TestGateway::new();
    let response = gateway.dispatch(&json!({ "unexpected": true })).await;
    assert_eq!(response.status_code, 400);
}
