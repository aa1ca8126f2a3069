//! Credential store port.
//!
//! Durable, transactional access to accounts, role profiles and the
//! refresh-token ledger.
//!
//! # Design
//!
//! - **Unit of work**: every read and write goes through one
//!   [`CredentialUnitOfWork`], which owns a single pooled connection with an
//!   open transaction
//! - **Consumed on finish**: `commit` and `rollback` take the unit by value, so
//!   no statement can run after either one
//! - **Dropped units roll back**: implementations must discard uncommitted
//!   work and return the connection when a unit is dropped unfinished
//! - **Null ids**: inserts return `Ok(None)` when the store produced no id,
//!   which callers report as a server failure. Uniqueness is probed up front.
//!
//! # Example
//!
//! ```ignore
//! async fn ensure_new_email(
//!     uow: &mut dyn CredentialUnitOfWork,
//!     email: &str,
//! ) -> Result<(), CredentialError> {
//!     if uow.check_email_exists(email).await? {
//!         return Err(CredentialError::invalid_data("Email already exists"));
//!     }
//!     Ok(())
//! }
//!
//! let mut uow = store.begin().await?;
//! let outcome = ensure_new_email(uow.as_mut(), email).await;
//! finish(uow, outcome).await
//! ```

use async_trait::async_trait;

use crate::domain::account::{Account, DoctorProfile, NewAccount, NewDoctorProfile, PatientProfile};
use crate::domain::foundation::{AccountId, DoctorId, DomainError, PatientId, RefreshTokenRecordId};
use crate::domain::session::{NewRefreshTokenRecord, RefreshToken};

/// Entry point to the credential store.
///
/// Implementations hold a bounded connection pool. `begin` waits for a free
/// connection and fails with `DatabaseError` once the acquire timeout elapses.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Acquires a connection and opens a transaction on it.
    async fn begin(&self) -> Result<Box<dyn CredentialUnitOfWork>, DomainError>;

    /// Round-trips a trivial statement. Used by health checks.
    async fn ping(&self) -> Result<(), DomainError>;

    /// Closes every pooled connection.
    async fn close(&self);
}

/// One pooled connection with an open transaction.
#[async_trait]
pub trait CredentialUnitOfWork: Send {
    /// Returns true if an account already uses this email.
    async fn check_email_exists(&mut self, email: &str) -> Result<bool, DomainError>;

    /// Returns true if a doctor profile already uses this license number.
    async fn check_license_exists(&mut self, license: &str) -> Result<bool, DomainError>;

    /// Inserts an account and returns its generated id.
    async fn create_account(&mut self, account: &NewAccount)
        -> Result<Option<AccountId>, DomainError>;

    /// Inserts the doctor profile of an account.
    async fn create_doctor_profile(
        &mut self,
        account_id: AccountId,
        profile: &NewDoctorProfile,
    ) -> Result<Option<DoctorId>, DomainError>;

    /// Inserts the patient profile of an account.
    async fn create_patient_profile(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<PatientId>, DomainError>;

    async fn get_account_by_email(&mut self, email: &str) -> Result<Option<Account>, DomainError>;

    async fn get_doctor_by_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<DoctorProfile>, DomainError>;

    async fn get_patient_by_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<PatientProfile>, DomainError>;

    /// Appends a refresh-token record. Returns false if nothing was written.
    async fn create_refresh_token_record(
        &mut self,
        record: &NewRefreshTokenRecord,
    ) -> Result<bool, DomainError>;

    /// Finds the record matching both the account and the token value.
    async fn find_refresh_token_record(
        &mut self,
        account_id: AccountId,
        token: &RefreshToken,
    ) -> Result<Option<RefreshTokenRecordId>, DomainError>;

    /// Deletes a record. Returns false if no row was removed.
    async fn delete_refresh_token_record(
        &mut self,
        id: RefreshTokenRecordId,
    ) -> Result<bool, DomainError>;

    /// Commits the transaction and releases the connection.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;

    /// Rolls back the transaction and releases the connection.
    async fn rollback(self: Box<Self>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn CredentialStore) {}
    }

    #[test]
    fn unit_of_work_is_object_safe() {
        fn _accepts_box(_uow: Box<dyn CredentialUnitOfWork>) {}
    }
}
