//! RegisterDoctorHandler - Command handler for doctor sign-up.

use std::sync::Arc;

use crate::application::unit_of_work::finish;
use crate::domain::account::{DoctorRegistration, RegisteredDoctor, ValidDoctorRegistration};
use crate::domain::foundation::CredentialError;
use crate::ports::{CredentialStore, CredentialUnitOfWork, PasswordHasher};

use super::{ensure_email_is_free, FAILED_TO_CREATE_ACCOUNT};

pub const LICENSE_EXISTS: &str = "Medical license number already exists";
pub const FAILED_TO_CREATE_DOCTOR_PROFILE: &str = "Failed to create doctor profile";

/// Command to register a doctor account.
#[derive(Debug, Clone)]
pub struct RegisterDoctorCommand {
    pub registration: DoctorRegistration,
}

/// Handler for doctor registration.
pub struct RegisterDoctorHandler {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegisterDoctorHandler {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn handle(
        &self,
        cmd: RegisterDoctorCommand,
    ) -> Result<RegisteredDoctor, CredentialError> {
        let valid = cmd.registration.validate()?;

        let mut uow = self.store.begin().await?;
        let outcome = self.register(uow.as_mut(), valid).await;
        let registered = finish(uow, outcome).await?;

        tracing::info!(
            account_id = %registered.account_id,
            doctor_id = %registered.doctor_id,
            "Doctor registered"
        );
        Ok(registered)
    }

    async fn register(
        &self,
        uow: &mut dyn CredentialUnitOfWork,
        valid: ValidDoctorRegistration,
    ) -> Result<RegisteredDoctor, CredentialError> {
        ensure_email_is_free(uow, &valid.account.email).await?;

        if uow
            .check_license_exists(&valid.profile.medical_license_number)
            .await?
        {
            return Err(CredentialError::invalid_data(LICENSE_EXISTS));
        }

        let password_hash = self.hasher.hash(&valid.password).await?;
        let new_account = valid.account.into_new_account(password_hash);

        let account_id = uow
            .create_account(&new_account)
            .await?
            .ok_or_else(|| CredentialError::server(FAILED_TO_CREATE_ACCOUNT))?;

        let doctor_id = uow
            .create_doctor_profile(account_id, &valid.profile)
            .await?
            .ok_or_else(|| CredentialError::server(FAILED_TO_CREATE_DOCTOR_PROFILE))?;

        Ok(RegisteredDoctor {
            account_id,
            doctor_id,
        })
    }
}
