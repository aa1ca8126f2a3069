//! RegisterPatientHandler - Command handler for patient sign-up.

use std::sync::Arc;

use crate::application::unit_of_work::finish;
use crate::domain::account::{PatientRegistration, RegisteredPatient, ValidPatientRegistration};
use crate::domain::foundation::CredentialError;
use crate::ports::{CredentialStore, CredentialUnitOfWork, PasswordHasher};

use super::{ensure_email_is_free, FAILED_TO_CREATE_ACCOUNT};

pub const FAILED_TO_CREATE_PATIENT_PROFILE: &str = "Failed to create patient profile";

/// Command to register a patient account.
#[derive(Debug, Clone)]
pub struct RegisterPatientCommand {
    pub registration: PatientRegistration,
}

/// Handler for patient registration.
pub struct RegisterPatientHandler {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegisterPatientHandler {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { store, hasher }
    }

    pub async fn handle(
        &self,
        cmd: RegisterPatientCommand,
    ) -> Result<RegisteredPatient, CredentialError> {
        // 1. Payload rules, before any store access
        let valid = cmd.registration.validate()?;

        // 2. Account and profile in one unit of work
        let mut uow = self.store.begin().await?;
        let outcome = self.register(uow.as_mut(), valid).await;
        let registered = finish(uow, outcome).await?;

        tracing::info!(
            account_id = %registered.account_id,
            patient_id = %registered.patient_id,
            "Patient registered"
        );
        Ok(registered)
    }

    async fn register(
        &self,
        uow: &mut dyn CredentialUnitOfWork,
        valid: ValidPatientRegistration,
    ) -> Result<RegisteredPatient, CredentialError> {
        ensure_email_is_free(uow, &valid.account.email).await?;

        let password_hash = self.hasher.hash(&valid.password).await?;
        let new_account = valid.account.into_new_account(password_hash);

        let account_id = uow
            .create_account(&new_account)
            .await?
            .ok_or_else(|| CredentialError::server(FAILED_TO_CREATE_ACCOUNT))?;

        let patient_id = uow
            .create_patient_profile(account_id)
            .await?
            .ok_or_else(|| CredentialError::server(FAILED_TO_CREATE_PATIENT_PROFILE))?;

        Ok(RegisteredPatient {
            account_id,
            patient_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{FailurePoint, InMemoryCredentialStore};
    use crate::application::handlers::test_support::{secret, FailingHasher, PlainHasher};
    use crate::domain::account::registration::{MISSING_REQUIRED_FIELDS, WEAK_PASSWORD};

    fn payload(email: &str) -> PatientRegistration {
        PatientRegistration {
            email: Some(email.to_string()),
            password: secret("Abcdef1"),
            fullname: Some("Jane Roe".to_string()),
            ..Default::default()
        }
    }

    fn handler(store: &InMemoryCredentialStore) -> RegisterPatientHandler {
        RegisterPatientHandler::new(Arc::new(store.clone()), Arc::new(PlainHasher))
    }

    fn command(email: &str) -> RegisterPatientCommand {
        RegisterPatientCommand {
            registration: payload(email),
        }
    }

    #[tokio::test]
    async fn registers_account_and_patient_profile() {
        let store = InMemoryCredentialStore::new();

        let registered = handler(&store).handle(command("a@b.com")).await.unwrap();

        assert_eq!(store.account_count().await, 1);
        assert_eq!(store.patient_count().await, 1);
        assert_eq!(store.commits(), 1);
        assert_eq!(store.open_units(), 0);

        let mut uow = store.begin().await.unwrap();
        let account = uow.get_account_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(account.id, registered.account_id);
        assert_eq!(account.password_hash, "plain:Abcdef1");
        assert!(account.profile_picture_url.ends_with("seed=Jane%20Roe"));
        let patient = uow.get_patient_by_account(account.id).await.unwrap().unwrap();
        assert_eq!(patient.id, registered.patient_id);
    }

    #[tokio::test]
    async fn invalid_payload_never_opens_a_unit_of_work() {
        let store = InMemoryCredentialStore::new();
        store.fail_on(FailurePoint::Begin).await;

        let mut cmd = command("a@b.com");
        cmd.registration.fullname = None;
        let err = handler(&store).handle(cmd).await.unwrap_err();

        assert_eq!(err, CredentialError::invalid_data(MISSING_REQUIRED_FIELDS));

        let mut cmd = command("a@b.com");
        cmd.registration.password = secret("abcdef");
        let err = handler(&store).handle(cmd).await.unwrap_err();

        assert_eq!(err, CredentialError::invalid_data(WEAK_PASSWORD));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_partial_rows() {
        let store = InMemoryCredentialStore::new();
        handler(&store).handle(command("a@b.com")).await.unwrap();

        let err = handler(&store).handle(command("a@b.com")).await.unwrap_err();

        assert_eq!(err, CredentialError::invalid_data("Email already exists"));
        assert_eq!(store.account_count().await, 1);
        assert_eq!(store.patient_count().await, 1);
        assert_eq!(store.rollbacks(), 1);
        assert_eq!(store.open_units(), 0);
    }

    #[tokio::test]
    async fn missing_profile_id_rolls_back_the_account() {
        let store = InMemoryCredentialStore::new();
        store.fail_on(FailurePoint::CreateProfile).await;

        let err = handler(&store).handle(command("a@b.com")).await.unwrap_err();

        assert_eq!(err, CredentialError::server(FAILED_TO_CREATE_PATIENT_PROFILE));
        assert_eq!(store.account_count().await, 0);
        assert_eq!(store.rollbacks(), 1);
    }

    #[tokio::test]
    async fn missing_account_id_is_a_server_error() {
        let store = InMemoryCredentialStore::new();
        store.fail_on(FailurePoint::CreateAccount).await;

        let err = handler(&store).handle(command("a@b.com")).await.unwrap_err();

        assert_eq!(err, CredentialError::server(FAILED_TO_CREATE_ACCOUNT));
        assert!(!err.is_client_error());
    }

    #[tokio::test]
    async fn hashing_failure_rolls_back() {
        let store = InMemoryCredentialStore::new();
        let handler = RegisterPatientHandler::new(Arc::new(store.clone()), Arc::new(FailingHasher));

        let err = handler.handle(command("a@b.com")).await.unwrap_err();

        assert!(matches!(err, CredentialError::Server(_)));
        assert_eq!(store.rollbacks(), 1);
        assert_eq!(store.open_units(), 0);
    }

    #[tokio::test]
    async fn unavailable_store_is_a_server_error() {
        let store = InMemoryCredentialStore::new();
        store.fail_on(FailurePoint::Begin).await;

        let err = handler(&store).handle(command("a@b.com")).await.unwrap_err();

        assert!(matches!(err, CredentialError::Server(_)));
        assert_eq!(store.open_units(), 0);
    }
}
