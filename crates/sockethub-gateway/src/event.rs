//! Trigger normalization.
//!
//! Three physically different trigger mechanisms deliver raw events:
//! realtime socket frames, synchronous HTTP calls, and queued jobs.
//! Classification converts each into one [`NormalizedEvent`] so the
//! dispatcher and handlers never see the raw shape. Classification is
//! evaluated in strict order; the first matching rule wins.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sockethub_core::error::AppError;
use sockethub_core::result::AppResult;
use sockethub_core::types::SocketId;

/// Resource path that marks a synchronous send-message call.
pub const SENDMESSAGE_RESOURCE_PATH: &str = "/{participant_id+}";

/// Route key a synchronous or queued send is forced to.
pub const SENDMESSAGE_ROUTE: &str = "sendmessage";

/// Which trigger mechanism delivered the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    /// Persistent-channel trigger (socket frame with a route key).
    Realtime,
    /// Synchronous request/response call.
    Synchronous,
    /// Queued job record.
    Queued,
}

/// The canonical event shape consumed by the dispatcher.
///
/// Produced exactly once per invocation by [`normalize`]; downstream code
/// never touches the raw event again.
#[derive(Debug, Clone)]
pub struct NormalizedEvent {
    /// The trigger mechanism that fired.
    pub source: TriggerSource,
    /// Route key selecting the handler.
    pub route_key: String,
    /// Channel handle: the transport-assigned connection id for realtime
    /// events, the surrogate for everything else.
    pub channel_handle: SocketId,
    /// Decoded event body. Defaults to `{"msg": ""}` when absent or empty.
    pub body: Value,
    /// Connect token from the query string (`participant_id` parameter).
    pub connect_token: String,
    /// Space from the query string.
    pub space: String,
    /// Push endpoint domain carried by realtime events.
    pub domain_name: Option<String>,
    /// Deployment stage carried by realtime events.
    pub stage: Option<String>,
}

/// Classify a raw inbound event into the canonical shape.
///
/// Rules, first match wins:
/// 1. A request-context route key marks a realtime event; the channel
///    handle is the request-context connection id.
/// 2. A request-context resource path equal to `/{participant_id+}` marks a
///    synchronous call; the route key is forced to `sendmessage` and the
///    handle is the surrogate.
/// 3. Exactly one queued record whose `eventSource` names a queue marks a
///    queued job; the route key is the payload's `action` field and the
///    handle is the surrogate.
/// 4. Anything else is unclassifiable.
pub fn normalize(raw: &Value) -> AppResult<NormalizedEvent> {
    let request_context = raw.get("requestContext");
    let (connect_token, space) = query_parameters(raw);

    if let Some(route_key) = request_context
        .and_then(|ctx| ctx.get("routeKey"))
        .and_then(Value::as_str)
    {
        let connection_id = request_context
            .and_then(|ctx| ctx.get("connectionId"))
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::validation("Realtime event carries no connection id"))?;

        return Ok(NormalizedEvent {
            source: TriggerSource::Realtime,
            route_key: route_key.to_string(),
            channel_handle: SocketId::new(connection_id),
            body: decode_body(raw.get("body"))?,
            connect_token,
            space,
            domain_name: context_str(request_context, "domainName"),
            stage: context_str(request_context, "stage"),
        });
    }

    if let Some(resource_path) = request_context
        .and_then(|ctx| ctx.get("resourcePath"))
        .and_then(Value::as_str)
    {
        if resource_path == SENDMESSAGE_RESOURCE_PATH {
            return Ok(NormalizedEvent {
                source: TriggerSource::Synchronous,
                route_key: SENDMESSAGE_ROUTE.to_string(),
                channel_handle: SocketId::surrogate(),
                body: decode_body(raw.get("body"))?,
                connect_token,
                space,
                domain_name: None,
                stage: None,
            });
        }
    }

    if let Some(records) = raw.get("Records").and_then(Value::as_array) {
        // The queue is configured to deliver a single record per event.
        if records.len() == 1 {
            let record = &records[0];
            let event_source = record
                .get("eventSource")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if event_source.contains("sqs") {
                let body = decode_body(record.get("body"))?;
                let action = body
                    .get("action")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        AppError::validation("Queued record carries no action field")
                    })?
                    .to_string();

                return Ok(NormalizedEvent {
                    source: TriggerSource::Queued,
                    route_key: action,
                    channel_handle: SocketId::surrogate(),
                    body,
                    connect_token,
                    space,
                    domain_name: None,
                    stage: None,
                });
            }
        }
    }

    Err(AppError::validation("Unclassifiable inbound event"))
}

/// Decode a JSON-string body, defaulting to `{"msg": ""}` when absent or
/// empty.
fn decode_body(body: Option<&Value>) -> AppResult<Value> {
    match body.and_then(Value::as_str) {
        Some(raw) if !raw.is_empty() => Ok(serde_json::from_str(raw)?),
        _ => Ok(serde_json::json!({ "msg": "" })),
    }
}

/// Connect query parameters with their documented defaults.
fn query_parameters(raw: &Value) -> (String, String) {
    let params = raw.get("queryStringParameters");
    let token = params
        .and_then(|p| p.get("participant_id"))
        .and_then(Value::as_str)
        .unwrap_or("guest")
        .to_string();
    let space = params
        .and_then(|p| p.get("space"))
        .and_then(Value::as_str)
        .unwrap_or("public")
        .to_string();
    (token, space)
}

fn context_str(context: Option<&Value>, key: &str) -> Option<String> {
    context
        .and_then(|ctx| ctx.get(key))
        .and_then(Value::as_str)
        .map(str::to_string)
}
