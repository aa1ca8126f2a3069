//! LogoutHandler - Command handler ending a session.
//!
//! Deletes the refresh-token record and blacklists the current access token.
//! A failed blacklist write rolls the delete back.

use std::sync::Arc;

use crate::application::unit_of_work::finish;
use crate::domain::foundation::CredentialError;
use crate::domain::session::{AccessClaims, RefreshToken};
use crate::ports::{CredentialStore, CredentialUnitOfWork, TokenBlacklist};

use super::{presented_refresh_token, FAILED_TO_BLACKLIST};

pub const ALREADY_INVALIDATED: &str = "Refresh token does not exist or is already invalidated";
pub const FAILED_TO_INVALIDATE: &str = "Failed to invalidate refresh token";
pub const LOGOUT_SUCCESSFUL: &str = "Logout successful";

/// Command to log out one session.
#[derive(Debug, Clone)]
pub struct LogoutCommand {
    pub claims: AccessClaims,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// Handler for logout.
pub struct LogoutHandler {
    store: Arc<dyn CredentialStore>,
    blacklist: Arc<dyn TokenBlacklist>,
    blacklist_ttl_secs: u64,
}

impl LogoutHandler {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        blacklist: Arc<dyn TokenBlacklist>,
        blacklist_ttl_secs: u64,
    ) -> Self {
        Self {
            store,
            blacklist,
            blacklist_ttl_secs,
        }
    }

    /// Returns the confirmation message on success.
    pub async fn handle(&self, cmd: LogoutCommand) -> Result<&'static str, CredentialError> {
        let refresh_token = presented_refresh_token(cmd.refresh_token)?;

        let mut uow = self.store.begin().await?;
        let outcome = self
            .logout(uow.as_mut(), &cmd.claims, &cmd.access_token, &refresh_token)
            .await;
        finish(uow, outcome).await?;

        tracing::info!(account_id = %cmd.claims.account_id, "Logged out");
        Ok(LOGOUT_SUCCESSFUL)
    }

    async fn logout(
        &self,
        uow: &mut dyn CredentialUnitOfWork,
        claims: &AccessClaims,
        access_token: &str,
        refresh_token: &RefreshToken,
    ) -> Result<(), CredentialError> {
        let record_id = uow
            .find_refresh_token_record(claims.account_id, refresh_token)
            .await?
            .ok_or_else(|| CredentialError::invalid_data(ALREADY_INVALIDATED))?;

        if !uow.delete_refresh_token_record(record_id).await? {
            return Err(CredentialError::server(FAILED_TO_INVALIDATE));
        }

        self.blacklist
            .put(access_token, claims.account_id, self.blacklist_ttl_secs)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Blacklist write failed");
                CredentialError::server(FAILED_TO_BLACKLIST)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::FailurePoint;
    use crate::application::handlers::test_support::{BrokenBlacklist, Ports};
    use crate::domain::foundation::{AccountId, DoctorId};
    use crate::domain::session::NewRefreshTokenRecord;

    async fn seed_record(ports: &Ports, claims: &AccessClaims) -> RefreshToken {
        let token = RefreshToken::generate();
        let mut uow = ports.store.begin().await.unwrap();
        uow.create_refresh_token_record(&NewRefreshTokenRecord {
            account_id: claims.account_id,
            token: token.clone(),
            ip_address: None,
            user_agent: None,
        })
        .await
        .unwrap();
        uow.commit().await.unwrap();
        token
    }

    fn claims() -> AccessClaims {
        AccessClaims::doctor(AccountId::new(), "d@x.com", DoctorId::new(), "MED123456")
    }

    fn command(claims: &AccessClaims, token: &RefreshToken) -> LogoutCommand {
        LogoutCommand {
            claims: claims.clone(),
            access_token: "current-access-token".to_string(),
            refresh_token: Some(token.as_str().to_string()),
        }
    }

    fn handler(ports: &Ports) -> LogoutHandler {
        LogoutHandler::new(
            Arc::new(ports.store.clone()),
            Arc::new(ports.blacklist.clone()),
            3600,
        )
    }

    #[tokio::test]
    async fn deletes_record_and_blacklists_access_token() {
        let ports = Ports::new();
        let claims = claims();
        let token = seed_record(&ports, &claims).await;

        let message = handler(&ports).handle(command(&claims, &token)).await.unwrap();

        assert_eq!(message, LOGOUT_SUCCESSFUL);
        assert!(ports.store.refresh_tokens_of(claims.account_id).await.is_empty());
        assert!(ports.blacklist.exists("current-access-token").await.unwrap());
    }

    #[tokio::test]
    async fn second_logout_fails() {
        let ports = Ports::new();
        let claims = claims();
        let token = seed_record(&ports, &claims).await;
        handler(&ports).handle(command(&claims, &token)).await.unwrap();

        let err = handler(&ports)
            .handle(command(&claims, &token))
            .await
            .unwrap_err();

        assert_eq!(err, CredentialError::invalid_data(ALREADY_INVALIDATED));
    }

    #[tokio::test]
    async fn only_the_presented_session_ends() {
        let ports = Ports::new();
        let claims = claims();
        let first = seed_record(&ports, &claims).await;
        let second = seed_record(&ports, &claims).await;

        handler(&ports).handle(command(&claims, &first)).await.unwrap();

        let rows = ports.store.refresh_tokens_of(claims.account_id).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].token, second);
    }

    #[tokio::test]
    async fn blacklist_failure_restores_the_record() {
        let ports = Ports::new();
        let claims = claims();
        let token = seed_record(&ports, &claims).await;
        let handler = LogoutHandler::new(Arc::new(ports.store.clone()), Arc::new(BrokenBlacklist), 3600);

        let err = handler.handle(command(&claims, &token)).await.unwrap_err();

        assert_eq!(err, CredentialError::server(FAILED_TO_BLACKLIST));
        assert_eq!(ports.store.refresh_tokens_of(claims.account_id).await.len(), 1);
        assert_eq!(ports.store.open_units(), 0);
    }

    #[tokio::test]
    async fn delete_reporting_nothing_removed_is_a_server_error() {
        let ports = Ports::new();
        let claims = claims();
        let token = seed_record(&ports, &claims).await;
        ports
            .store
            .fail_on(FailurePoint::DeleteRefreshTokenRecord)
            .await;

        let err = handler(&ports)
            .handle(command(&claims, &token))
            .await
            .unwrap_err();

        assert_eq!(err, CredentialError::server(FAILED_TO_INVALIDATE));
        assert!(ports.blacklist.is_empty().await);
    }
}
