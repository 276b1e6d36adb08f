//! Token validation for connect requests.

use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use tracing::debug;

use sockethub_core::config::auth::AuthConfig;
use sockethub_core::error::AppError;
use sockethub_core::result::AppResult;

use super::claims::Claims;

/// Validates signed participant tokens.
///
/// Every decode or signature failure collapses into the authentication
/// kind, so a caller cannot distinguish a malformed token from an expired
/// one. Verification has no side effects.
#[derive(Clone)]
pub struct CredentialVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl CredentialVerifier {
    /// Creates a new verifier from auth configuration.
    ///
    /// A missing secret or an unknown algorithm is a fatal configuration
    /// error, reported here rather than on each request.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        if config.secret_key.is_empty() {
            return Err(AppError::configuration(
                "secret_key was not provided in configuration",
            ));
        }

        let algorithm = Algorithm::from_str(&config.algorithm).map_err(|e| {
            AppError::configuration(format!(
                "Unknown token signing algorithm '{}': {e}",
                config.algorithm
            ))
        })?;

        // Expiry is checked explicitly below so that an expired token and a
        // malformed one take the same error path.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(config.secret_key.as_bytes()),
            validation,
        })
    }

    /// Decodes and validates a token, returning the participant identity.
    ///
    /// Checks:
    /// 1. Signature validity
    /// 2. Presence of `id_user`
    /// 3. Expiry strictly before now (UTC) is rejected
    pub fn verify(&self, token: &str) -> AppResult<String> {
        let claims = self.decode_token(token)?;

        if claims.id_user.is_empty() {
            return Err(AppError::authentication("Token carries no participant id"));
        }

        if claims.is_expired() {
            debug!(exp = claims.exp, "Rejecting expired token");
            return Err(AppError::authentication("Token has expired"));
        }

        Ok(claims.id_user)
    }

    /// Internal decode; every failure maps to the authentication kind.
    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::authentication(format!("Token validation failed: {e}")))?;

        Ok(token_data.claims)
    }
}
