//! # sockethub-gateway
//!
//! The event-normalization, routing, and fanout-delivery core.
//!
//! ## Modules
//!
//! - `event` — classification of raw trigger events into one canonical shape
//! - `dispatcher` — route-key dispatch to connect / disconnect / send-message
//! - `fanout` — best-effort delivery to every live channel with lazy pruning
//! - `transport` — HTTP push transport implementation
//! - `response` — the `{statusCode, body?}` caller-visible response

pub mod dispatcher;
pub mod event;
pub mod fanout;
pub mod response;
pub mod transport;

pub use dispatcher::RoutingDispatcher;
pub use event::{NormalizedEvent, TriggerSource, normalize};
pub use fanout::DeliveryFanout;
pub use response::GatewayResponse;
pub use transport::HttpPushTransport;
