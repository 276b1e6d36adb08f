//! Explicit store backend selection.
//!
//! The backend is a closed set chosen once from configuration at process
//! start and injected into the dispatcher. There is no global registry
//! state and no environment-driven class lookup.

use std::str::FromStr;
use std::sync::Arc;

use sockethub_core::config::registry::RegistryConfig;
use sockethub_core::error::AppError;
use sockethub_core::result::AppResult;
use sockethub_core::traits::ConnectionStore;

use crate::memory::MemoryConnectionStore;
use crate::migration;
use crate::postgres::PgConnectionStore;

/// The closed set of connection store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL reference implementation.
    Postgres,
    /// In-memory implementation for tests and single-node runs.
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "postgres" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::configuration(format!(
                "Unknown registry backend '{other}' (expected 'postgres' or 'memory')"
            ))),
        }
    }
}

/// Build the configured connection store.
///
/// For the postgres backend this connects the pool and ensures the schema
/// exists before handing the store out.
pub async fn build_store(config: &RegistryConfig) -> AppResult<Arc<dyn ConnectionStore>> {
    match config.backend.parse::<StoreBackend>()? {
        StoreBackend::Postgres => {
            let store = PgConnectionStore::connect(&config.database).await?;
            migration::ensure_schema(store.pool()).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryConnectionStore::new())),
    }
}
