//! # sockethub-auth
//!
//! Credential verification for the Sockethub gateway: token claims and the
//! verifier that authenticates connect requests.

pub mod claims;
pub mod verifier;

pub use claims::Claims;
pub use verifier::CredentialVerifier;
