//! LoginHandler - Command handler for password login.

use serde::Serialize;
use std::sync::Arc;

use crate::application::unit_of_work::finish;
use crate::domain::account::Account;
use crate::domain::foundation::{CredentialError, Role};
use crate::domain::session::login::{missing_role_profile_message, INVALID_CREDENTIALS};
use crate::domain::session::{
    AccessClaims, AccountSummary, LoginCredentials, LoginRequest, NewRefreshTokenRecord,
    RefreshToken,
};
use crate::ports::{CredentialStore, CredentialUnitOfWork, PasswordHasher, TokenSigner};

pub const FAILED_TO_CREATE_LOGIN_LOG: &str = "Failed to create login log";

/// Command to log in with email, password and role.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub request: LoginRequest,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Tokens issued by a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub refresh_token: String,
    pub access_token: String,
    pub account: AccountSummary,
}

/// Handler for login.
pub struct LoginHandler {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    signer: Arc<dyn TokenSigner>,
}

impl LoginHandler {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        signer: Arc<dyn TokenSigner>,
    ) -> Self {
        Self {
            store,
            hasher,
            signer,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, CredentialError> {
        let credentials = cmd.request.validate()?;

        let mut uow = self.store.begin().await?;
        let outcome = self
            .login(uow.as_mut(), credentials, cmd.ip_address, cmd.user_agent)
            .await;
        let result = finish(uow, outcome).await?;

        tracing::info!(
            account_id = %result.account.claims.account_id,
            role = %result.account.claims.role(),
            "Login succeeded"
        );
        Ok(result)
    }

    async fn login(
        &self,
        uow: &mut dyn CredentialUnitOfWork,
        credentials: LoginCredentials,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<LoginResult, CredentialError> {
        // Unknown email and wrong password must be indistinguishable, in
        // timing as well as message: an unknown email still pays one hash.
        let Some(account) = uow.get_account_by_email(&credentials.email).await? else {
            let _ = self.hasher.hash(&credentials.password).await;
            return Err(CredentialError::invalid_data(INVALID_CREDENTIALS));
        };

        if !self
            .hasher
            .verify(&credentials.password, &account.password_hash)
            .await?
        {
            return Err(CredentialError::invalid_data(INVALID_CREDENTIALS));
        }

        let claims = role_claims(uow, &account, credentials.role).await?;

        let refresh_token = RefreshToken::generate();
        let access_token = self.signer.sign_default(&claims)?;

        let record = NewRefreshTokenRecord {
            account_id: account.id,
            token: refresh_token.clone(),
            ip_address,
            user_agent,
        };
        if !uow.create_refresh_token_record(&record).await? {
            return Err(CredentialError::server(FAILED_TO_CREATE_LOGIN_LOG));
        }

        Ok(LoginResult {
            refresh_token: refresh_token.into_inner(),
            access_token,
            account: AccountSummary {
                claims,
                profile_picture_url: account.profile_picture_url,
            },
        })
    }
}

/// Builds the claims of the profile matching `role`.
async fn role_claims(
    uow: &mut dyn CredentialUnitOfWork,
    account: &Account,
    role: Role,
) -> Result<AccessClaims, CredentialError> {
    let missing = || CredentialError::invalid_data(missing_role_profile_message(role));

    match role {
        Role::Doctor => {
            let doctor = uow
                .get_doctor_by_account(account.id)
                .await?
                .ok_or_else(missing)?;
            Ok(AccessClaims::doctor(
                account.id,
                account.email.clone(),
                doctor.id,
                doctor.medical_license_number,
            ))
        }
        Role::Patient => {
            let patient = uow
                .get_patient_by_account(account.id)
                .await?
                .ok_or_else(missing)?;
            Ok(AccessClaims::patient(account.id, account.email.clone(), patient.id))
        }
    }
}
