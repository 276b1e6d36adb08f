//! Schema setup for the connection registry.

use sqlx::PgPool;
use tracing::info;

use sockethub_core::error::{AppError, ErrorKind};

/// Create the `client_connections` table if it does not exist.
///
/// `socket_id` is unique among live records; a participant may hold any
/// number of rows across spaces.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), AppError> {
    info!("Ensuring client_connections schema");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS client_connections (\
            participant_id TEXT NOT NULL, \
            socket_id TEXT NOT NULL UNIQUE, \
            space TEXT NOT NULL, \
            connected_at TIMESTAMPTZ NOT NULL DEFAULT now()\
         )",
    )
    .execute(pool)
    .await
    .map_err(|e| {
        AppError::with_source(ErrorKind::Storage, format!("Failed to ensure schema: {e}"), e)
    })?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_client_connections_participant_space \
         ON client_connections (participant_id, space)",
    )
    .execute(pool)
    .await
    .map_err(|e| {
        AppError::with_source(ErrorKind::Storage, format!("Failed to ensure index: {e}"), e)
    })?;

    info!("client_connections schema ready");
    Ok(())
}
