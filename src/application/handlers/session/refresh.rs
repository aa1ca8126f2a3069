//! RefreshAccessTokenHandler - Command handler exchanging a refresh token for
//! a new access token.
//!
//! The refresh token itself stays valid; only logout removes it. The access
//! token that was presented alongside it is blacklisted.

use serde::Serialize;
use std::sync::Arc;

use crate::application::unit_of_work::finish;
use crate::domain::foundation::CredentialError;
use crate::domain::session::{AccessClaims, RefreshToken};
use crate::ports::{CredentialStore, CredentialUnitOfWork, TokenBlacklist, TokenSigner};

use super::{presented_refresh_token, FAILED_TO_BLACKLIST};

pub const UNKNOWN_REFRESH_TOKEN: &str = "Refresh token does not exist or is invalid";

/// Command to refresh an access token.
#[derive(Debug, Clone)]
pub struct RefreshAccessTokenCommand {
    /// Claims the gate decoded from the current access token.
    pub claims: AccessClaims,
    /// The current access token, retired on success.
    pub access_token: String,
    pub refresh_token: Option<String>,
}

/// A freshly signed access token.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshAccessTokenResult {
    pub access_token: String,
}

/// Handler for access-token refresh.
pub struct RefreshAccessTokenHandler {
    store: Arc<dyn CredentialStore>,
    signer: Arc<dyn TokenSigner>,
    blacklist: Arc<dyn TokenBlacklist>,
    blacklist_ttl_secs: u64,
}

impl RefreshAccessTokenHandler {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        signer: Arc<dyn TokenSigner>,
        blacklist: Arc<dyn TokenBlacklist>,
        blacklist_ttl_secs: u64,
    ) -> Self {
        Self {
            store,
            signer,
            blacklist,
            blacklist_ttl_secs,
        }
    }

    pub async fn handle(
        &self,
        cmd: RefreshAccessTokenCommand,
    ) -> Result<RefreshAccessTokenResult, CredentialError> {
        let refresh_token = presented_refresh_token(cmd.refresh_token)?;

        let mut uow = self.store.begin().await?;
        let outcome = self
            .refresh(uow.as_mut(), &cmd.claims, &cmd.access_token, &refresh_token)
            .await;
        let result = finish(uow, outcome).await?;

        tracing::info!(account_id = %cmd.claims.account_id, "Access token refreshed");
        Ok(result)
    }

    async fn refresh(
        &self,
        uow: &mut dyn CredentialUnitOfWork,
        claims: &AccessClaims,
        old_access_token: &str,
        refresh_token: &RefreshToken,
    ) -> Result<RefreshAccessTokenResult, CredentialError> {
        uow.find_refresh_token_record(claims.account_id, refresh_token)
            .await?
            .ok_or_else(|| CredentialError::invalid_data(UNKNOWN_REFRESH_TOKEN))?;

        let access_token = self.signer.sign_default(claims)?;

        self.blacklist
            .put(old_access_token, claims.account_id, self.blacklist_ttl_secs)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Blacklist write failed");
                CredentialError::server(FAILED_TO_BLACKLIST)
            })?;

        Ok(RefreshAccessTokenResult { access_token })
    }
}
