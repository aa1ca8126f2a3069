//! In-memory credential store for testing and local development.
//!
//! A unit of work reads from a snapshot taken at `begin` and records its
//! writes in an operation log. `commit` replays the log onto the shared
//! state; `rollback` or drop discards it. Uniqueness of email and license is
//! enforced like the database constraints: at insert time against the unit's
//! own view, and again at commit against the shared state, so two overlapping
//! units cannot both register the same email or license.
//!
//! Failure points can be armed to make inserts return no id, deletes report
//! nothing removed, or `begin` fail outright.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::account::{Account, DoctorProfile, NewAccount, NewDoctorProfile, PatientProfile};
use crate::domain::foundation::{
    AccountId, DoctorId, DomainError, ErrorCode, PatientId, RefreshTokenRecordId, Timestamp,
};
use crate::domain::session::{NewRefreshTokenRecord, RefreshToken};
use crate::ports::{CredentialStore, CredentialUnitOfWork};

/// Operations that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    Begin,
    CreateAccount,
    CreateProfile,
    CreateRefreshTokenRecord,
    DeleteRefreshTokenRecord,
}

/// Stored refresh-token ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRefreshToken {
    pub id: RefreshTokenRecordId,
    pub account_id: AccountId,
    pub token: RefreshToken,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
struct State {
    accounts: Vec<Account>,
    doctors: Vec<DoctorProfile>,
    patients: Vec<PatientProfile>,
    refresh_tokens: Vec<StoredRefreshToken>,
}

impl State {
    fn apply(&mut self, op: Op) {
        match op {
            Op::InsertAccount(account) => self.accounts.push(account),
            Op::InsertDoctor(doctor) => self.doctors.push(doctor),
            Op::InsertPatient(patient) => self.patients.push(patient),
            Op::InsertRefreshToken(record) => self.refresh_tokens.push(record),
            Op::DeleteRefreshToken(id) => self.refresh_tokens.retain(|r| r.id != id),
        }
    }

    /// The unique-constraint violation `op` would cause, if any.
    fn conflict(&self, op: &Op) -> Option<DomainError> {
        match op {
            Op::InsertAccount(account)
                if self.accounts.iter().any(|a| a.email == account.email) =>
            {
                Some(DomainError::new(ErrorCode::EmailExists, "Email already exists"))
            }
            Op::InsertDoctor(doctor)
                if self
                    .doctors
                    .iter()
                    .any(|d| d.medical_license_number == doctor.medical_license_number) =>
            {
                Some(DomainError::new(
                    ErrorCode::LicenseExists,
                    "Medical license number already exists",
                ))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Op {
    InsertAccount(Account),
    InsertDoctor(DoctorProfile),
    InsertPatient(PatientProfile),
    InsertRefreshToken(StoredRefreshToken),
    DeleteRefreshToken(RefreshTokenRecordId),
}

#[derive(Debug, Default)]
struct Counters {
    open: AtomicUsize,
    commits: AtomicUsize,
    rollbacks: AtomicUsize,
}

/// In-memory credential store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    state: Arc<RwLock<State>>,
    failures: Arc<RwLock<HashSet<FailurePoint>>>,
    counters: Arc<Counters>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a failure point until [`clear_failures`](Self::clear_failures).
    pub async fn fail_on(&self, point: FailurePoint) {
        self.failures.write().await.insert(point);
    }

    pub async fn clear_failures(&self) {
        self.failures.write().await.clear();
    }

    pub async fn account_count(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    pub async fn doctor_count(&self) -> usize {
        self.state.read().await.doctors.len()
    }

    pub async fn patient_count(&self) -> usize {
        self.state.read().await.patients.len()
    }

    /// Committed refresh-token rows of an account.
    pub async fn refresh_tokens_of(&self, account_id: AccountId) -> Vec<StoredRefreshToken> {
        self.state
            .read()
            .await
            .refresh_tokens
            .iter()
            .filter(|r| r.account_id == account_id)
            .cloned()
            .collect()
    }

    /// Units of work begun but not yet committed, rolled back or dropped.
    pub fn open_units(&self) -> usize {
        self.counters.open.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.counters.commits.load(Ordering::SeqCst)
    }

    pub fn rollbacks(&self) -> usize {
        self.counters.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn begin(&self) -> Result<Box<dyn CredentialUnitOfWork>, DomainError> {
        let failures = self.failures.read().await.clone();
        if failures.contains(&FailurePoint::Begin) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Timed out acquiring a connection",
            ));
        }

        let snapshot = self.state.read().await.clone();
        self.counters.open.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(InMemoryUnitOfWork {
            shared: Arc::clone(&self.state),
            counters: Arc::clone(&self.counters),
            working: snapshot,
            ops: Vec::new(),
            failures,
            finished: false,
        }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    async fn close(&self) {}
}

/// Unit of work over the in-memory store.
pub struct InMemoryUnitOfWork {
    shared: Arc<RwLock<State>>,
    counters: Arc<Counters>,
    working: State,
    ops: Vec<Op>,
    failures: HashSet<FailurePoint>,
    finished: bool,
}

impl InMemoryUnitOfWork {
    fn record(&mut self, op: Op) {
        self.working.apply(op.clone());
        self.ops.push(op);
    }

    fn release(&mut self) {
        if !self.finished {
            self.finished = true;
            self.counters.open.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for InMemoryUnitOfWork {
    fn drop(&mut self) {
        self.release();
    }
}

#[async_trait]
impl CredentialUnitOfWork for InMemoryUnitOfWork {
    async fn check_email_exists(&mut self, email: &str) -> Result<bool, DomainError> {
        Ok(self.working.accounts.iter().any(|a| a.email == email))
    }

    async fn check_license_exists(&mut self, license: &str) -> Result<bool, DomainError> {
        Ok(self
            .working
            .doctors
            .iter()
            .any(|d| d.medical_license_number == license))
    }

    async fn create_account(
        &mut self,
        account: &NewAccount,
    ) -> Result<Option<AccountId>, DomainError> {
        if self.failures.contains(&FailurePoint::CreateAccount) {
            return Ok(None);
        }
        let id = AccountId::new();
        let op = Op::InsertAccount(Account {
            id,
            fullname: account.fullname.clone(),
            email: account.email.clone(),
            phone_number: account.phone_number.clone(),
            date_of_birth: account.date_of_birth,
            bio: None,
            profile_picture_url: account.profile_picture_url.clone(),
            password_hash: account.password_hash.clone(),
        });
        if let Some(err) = self.working.conflict(&op) {
            return Err(err);
        }
        self.record(op);
        Ok(Some(id))
    }

    async fn create_doctor_profile(
        &mut self,
        account_id: AccountId,
        profile: &NewDoctorProfile,
    ) -> Result<Option<DoctorId>, DomainError> {
        if self.failures.contains(&FailurePoint::CreateProfile) {
            return Ok(None);
        }
        let id = DoctorId::new();
        let op = Op::InsertDoctor(DoctorProfile {
            id,
            account_id,
            medical_specialty: profile.medical_specialty.clone(),
            medical_license_number: profile.medical_license_number.clone(),
            years_of_experience: profile.years_of_experience,
            medical_education: profile.medical_education.clone(),
            clinic_or_hospital_address: profile.clinic_or_hospital_address.clone(),
        });
        if let Some(err) = self.working.conflict(&op) {
            return Err(err);
        }
        self.record(op);
        Ok(Some(id))
    }

    async fn create_patient_profile(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<PatientId>, DomainError> {
        if self.failures.contains(&FailurePoint::CreateProfile) {
            return Ok(None);
        }

        let id = PatientId::new();
        self.record(Op::InsertPatient(PatientProfile { id, account_id }));
        Ok(Some(id))
    }

    async fn get_account_by_email(&mut self, email: &str) -> Result<Option<Account>, DomainError> {
        Ok(self.working.accounts.iter().find(|a| a.email == email).cloned())
    }

    async fn get_doctor_by_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<DoctorProfile>, DomainError> {
        Ok(self
            .working
            .doctors
            .iter()
            .find(|d| d.account_id == account_id)
            .cloned())
    }

    async fn get_patient_by_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<PatientProfile>, DomainError> {
        Ok(self
            .working
            .patients
            .iter()
            .find(|p| p.account_id == account_id)
            .cloned())
    }

    async fn create_refresh_token_record(
        &mut self,
        record: &NewRefreshTokenRecord,
    ) -> Result<bool, DomainError> {
        if self.failures.contains(&FailurePoint::CreateRefreshTokenRecord) {
            return Ok(false);
        }

        self.record(Op::InsertRefreshToken(StoredRefreshToken {
            id: RefreshTokenRecordId::new(),
            account_id: record.account_id,
            token: record.token.clone(),
            ip_address: record.ip_address.clone(),
            user_agent: record.user_agent.clone(),
            created_at: Timestamp::now(),
        }));
        Ok(true)
    }

    async fn find_refresh_token_record(
        &mut self,
        account_id: AccountId,
        token: &RefreshToken,
    ) -> Result<Option<RefreshTokenRecordId>, DomainError> {
        Ok(self
            .working
            .refresh_tokens
            .iter()
            .find(|r| r.account_id == account_id && &r.token == token)
            .map(|r| r.id))
    }

    async fn delete_refresh_token_record(
        &mut self,
        id: RefreshTokenRecordId,
    ) -> Result<bool, DomainError> {
        if self.failures.contains(&FailurePoint::DeleteRefreshTokenRecord) {
            return Ok(false);
        }
        if !self.working.refresh_tokens.iter().any(|r| r.id == id) {
            return Ok(false);
        }

        self.record(Op::DeleteRefreshToken(id));
        Ok(true)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let mut this = self;
        let ops = std::mem::take(&mut this.ops);
        {
            let mut shared = this.shared.write().await;
            // Validate against everything committed since `begin`, then apply
            // all or nothing.
            let mut staged = shared.clone();
            for op in ops {
                if let Some(err) = staged.conflict(&op) {
                    drop(shared);
                    this.counters.rollbacks.fetch_add(1, Ordering::SeqCst);
                    this.release();
                    return Err(err);
                }
                staged.apply(op);
            }
            *shared = staged;
        }
        this.counters.commits.fetch_add(1, Ordering::SeqCst);
        this.release();
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        let mut this = self;
        this.ops.clear();
        this.counters.rollbacks.fetch_add(1, Ordering::SeqCst);
        this.release();
        Ok(())
    }
}
