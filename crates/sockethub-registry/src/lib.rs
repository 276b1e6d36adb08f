//! # sockethub-registry
//!
//! Connection registry backends for Sockethub: the PostgreSQL reference
//! implementation, an in-memory implementation, and the explicit factory
//! that selects one from configuration.

pub mod factory;
pub mod memory;
pub mod migration;
pub mod postgres;

pub use factory::{StoreBackend, build_store};
pub use memory::MemoryConnectionStore;
pub use postgres::PgConnectionStore;
