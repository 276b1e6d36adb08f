//! Token claims payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims payload embedded in every participant token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// The participant identity.
    pub id_user: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Checks whether this token's expiry is strictly in the past (UTC).
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }
}
