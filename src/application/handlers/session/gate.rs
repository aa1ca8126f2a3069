//! AuthenticationGate - Checks a bearer token ahead of protected operations.
//!
//! The gate only reads: it consults the blacklist, then the signature and
//! expiry. A blacklisted token is rejected even while its signature holds.

use std::sync::Arc;

use crate::domain::foundation::AuthError;
use crate::ports::{TokenBlacklist, TokenSigner, VerifiedToken};

pub struct AuthenticationGate {
    blacklist: Arc<dyn TokenBlacklist>,
    signer: Arc<dyn TokenSigner>,
}

impl AuthenticationGate {
    pub fn new(blacklist: Arc<dyn TokenBlacklist>, signer: Arc<dyn TokenSigner>) -> Self {
        Self { blacklist, signer }
    }

    /// Returns the decoded claims of an acceptable token.
    ///
    /// # Errors
    ///
    /// - `MissingToken` when no token was presented
    /// - `RevokedToken` when the token is blacklisted
    /// - `TokenExpired` or `InvalidToken` from verification
    /// - `ServiceUnavailable` when the blacklist cannot be read
    pub async fn authenticate(&self, token: Option<&str>) -> Result<VerifiedToken, AuthError> {
        let token = match token.map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                tracing::info!("Rejected request without access token");
                return Err(AuthError::MissingToken);
            }
        };

        let revoked = self.blacklist.exists(token).await.map_err(|e| {
            tracing::error!(error = %e, "Blacklist lookup failed");
            AuthError::service_unavailable(e.message)
        })?;
        if revoked {
            tracing::warn!("Rejected blacklisted access token");
            return Err(AuthError::RevokedToken);
        }

        self.signer.verify(token).map_err(|e| {
            tracing::info!(reason = %e, "Rejected access token");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{signer, BrokenBlacklist, Ports};
    use crate::domain::foundation::{AccountId, PatientId};
    use crate::domain::session::AccessClaims;

    fn gate(ports: &Ports) -> AuthenticationGate {
        AuthenticationGate::new(Arc::new(ports.blacklist.clone()), ports.signer.clone())
    }

    fn claims() -> AccessClaims {
        AccessClaims::patient(AccountId::new(), "a@b.com", PatientId::new())
    }

    #[tokio::test]
    async fn accepts_valid_token() {
        let ports = Ports::new();
        let claims = claims();
        let token = ports.signer.sign_default(&claims).unwrap();

        let verified = gate(&ports).authenticate(Some(&token)).await.unwrap();

        assert_eq!(verified.claims, claims);
    }

    #[tokio::test]
    async fn missing_or_blank_token_is_rejected() {
        let ports = Ports::new();
        assert_eq!(
            gate(&ports).authenticate(None).await.unwrap_err(),
            AuthError::MissingToken
        );
        assert_eq!(
            gate(&ports).authenticate(Some("  ")).await.unwrap_err(),
            AuthError::MissingToken
        );
    }

    #[tokio::test]
    async fn blacklisted_token_is_rejected_despite_valid_signature() {
        let ports = Ports::new();
        let claims = claims();
        let token = ports.signer.sign_default(&claims).unwrap();
        ports
            .blacklist
            .put(&token, claims.account_id, 3600)
            .await
            .unwrap();

        let err = gate(&ports).authenticate(Some(&token)).await.unwrap_err();

        assert_eq!(err, AuthError::RevokedToken);
        assert!(ports.signer.verify(&token).is_ok());
    }

    #[tokio::test]
    async fn expired_token_is_distinct_from_invalid() {
        let ports = Ports::new();
        let expired = ports.signer.sign(&claims(), 0).unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

        assert_eq!(
            gate(&ports).authenticate(Some(&expired)).await.unwrap_err(),
            AuthError::TokenExpired
        );
        assert_eq!(
            gate(&ports).authenticate(Some("not.a.jwt")).await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[tokio::test]
    async fn unreadable_blacklist_is_a_service_error() {
        let gate = AuthenticationGate::new(Arc::new(BrokenBlacklist), signer());
        let token = signer().sign_default(&claims()).unwrap();

        let err = gate.authenticate(Some(&token)).await.unwrap_err();

        assert!(err.is_transient());
    }
}
