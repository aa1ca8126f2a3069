//! Token signer port.
//!
//! Issues and checks compact, symmetrically signed access tokens. The secret
//! and algorithm are fixed when the implementation is built.

use crate::domain::foundation::{AuthError, DomainError, Timestamp};
use crate::domain::session::AccessClaims;

/// Claims recovered from a token whose signature and expiry both held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub claims: AccessClaims,
    pub expires_at: Timestamp,
}

pub trait TokenSigner: Send + Sync {
    /// Signs `claims` with an expiry `ttl_secs` from now.
    fn sign(&self, claims: &AccessClaims, ttl_secs: u64) -> Result<String, DomainError>;

    /// Verifies signature and expiry.
    ///
    /// # Errors
    ///
    /// - `AuthError::TokenExpired` once the `exp` claim has lapsed
    /// - `AuthError::InvalidToken` for any format, signature or claim failure
    fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError>;

    /// Lifetime used when the caller has no reason to pick another one.
    fn default_ttl_secs(&self) -> u64;

    /// Signs `claims` with the default lifetime.
    fn sign_default(&self, claims: &AccessClaims) -> Result<String, DomainError> {
        self.sign(claims, self.default_ttl_secs())
    }
}
