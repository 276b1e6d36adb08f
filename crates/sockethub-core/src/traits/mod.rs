//! Abstraction seams for external collaborators.

pub mod push;
pub mod store;

pub use push::{PushError, PushTransport};
pub use store::ConnectionStore;
