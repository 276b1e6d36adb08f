//! Domain types shared across the Sockethub crates.

pub mod connection;

pub use connection::{ConnectionRecord, DeliveryTarget, SocketId};
