//! PostgreSQL implementation of the CredentialStore port.
//!
//! Each unit of work owns one pooled connection with an open transaction.
//! Dropping an unfinished unit rolls the transaction back and returns the
//! connection to the pool.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::account::{Account, DoctorProfile, NewAccount, NewDoctorProfile, PatientProfile};
use crate::domain::foundation::{
    AccountId, DoctorId, DomainError, ErrorCode, PatientId, RefreshTokenRecordId,
};
use crate::domain::session::{NewRefreshTokenRecord, RefreshToken};
use crate::ports::{CredentialStore, CredentialUnitOfWork};

const UNIQUE_VIOLATION: &str = "23505";

/// PostgreSQL implementation of the CredentialStore port.
#[derive(Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    /// Creates a new PostgresCredentialStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn begin(&self) -> Result<Box<dyn CredentialUnitOfWork>, DomainError> {
        let tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;
        Ok(Box::new(PostgresUnitOfWork { tx }))
    }

    async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Database ping failed: {}", e)))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// One transaction on one pooled connection.
pub struct PostgresUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

/// Database row representation of an account.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    fullname: String,
    email: String,
    phone_number: Option<String>,
    date_of_birth: Option<NaiveDate>,
    bio: Option<String>,
    password_hash: String,
    profile_picture_url: String,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: AccountId::from_uuid(row.account_id),
            fullname: row.fullname,
            email: row.email,
            phone_number: row.phone_number,
            date_of_birth: row.date_of_birth,
            bio: row.bio,
            profile_picture_url: row.profile_picture_url,
            password_hash: row.password_hash,
        }
    }
}

/// Database row representation of a doctor profile.
#[derive(Debug, sqlx::FromRow)]
struct DoctorRow {
    doctor_id: Uuid,
    account_id: Uuid,
    medical_specialty: String,
    medical_license_number: String,
    years_of_experience: Option<i32>,
    medical_education: Option<String>,
    clinic_or_hospital_address: String,
}

impl From<DoctorRow> for DoctorProfile {
    fn from(row: DoctorRow) -> Self {
        DoctorProfile {
            id: DoctorId::from_uuid(row.doctor_id),
            account_id: AccountId::from_uuid(row.account_id),
            medical_specialty: row.medical_specialty,
            medical_license_number: row.medical_license_number,
            years_of_experience: row.years_of_experience,
            medical_education: row.medical_education,
            clinic_or_hospital_address: row.clinic_or_hospital_address,
        }
    }
}

#[async_trait]
impl CredentialUnitOfWork for PostgresUnitOfWork {
    async fn check_email_exists(&mut self, email: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM accounts WHERE email = $1)")
            .bind(email)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| db_error("Failed to check email", e))
    }

    async fn check_license_exists(&mut self, license: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM doctors WHERE medical_license_number = $1)",
        )
        .bind(license)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to check license", e))
    }

    async fn create_account(
        &mut self,
        account: &NewAccount,
    ) -> Result<Option<AccountId>, DomainError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO accounts (
                fullname, email, phone_number, date_of_birth, password_hash, profile_picture_url
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING account_id
            "#,
        )
        .bind(&account.fullname)
        .bind(&account.email)
        .bind(&account.phone_number)
        .bind(account.date_of_birth)
        .bind(&account.password_hash)
        .bind(&account.profile_picture_url)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| insert_error("Failed to insert account", e))?;

        Ok(id.map(AccountId::from_uuid))
    }

    async fn create_doctor_profile(
        &mut self,
        account_id: AccountId,
        profile: &NewDoctorProfile,
    ) -> Result<Option<DoctorId>, DomainError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO doctors (
                account_id, medical_specialty, medical_license_number,
                years_of_experience, medical_education, clinic_or_hospital_address
            ) VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING doctor_id
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(&profile.medical_specialty)
        .bind(&profile.medical_license_number)
        .bind(profile.years_of_experience)
        .bind(&profile.medical_education)
        .bind(&profile.clinic_or_hospital_address)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| insert_error("Failed to insert doctor profile", e))?;

        Ok(id.map(DoctorId::from_uuid))
    }

    async fn create_patient_profile(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<PatientId>, DomainError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO patients (account_id) VALUES ($1) RETURNING patient_id",
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| insert_error("Failed to insert patient profile", e))?;

        Ok(id.map(PatientId::from_uuid))
    }

    async fn get_account_by_email(&mut self, email: &str) -> Result<Option<Account>, DomainError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r#"
            SELECT account_id, fullname, email, phone_number, date_of_birth, bio,
                   password_hash, profile_picture_url
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to fetch account", e))?;

        Ok(row.map(Account::from))
    }

    async fn get_doctor_by_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<DoctorProfile>, DomainError> {
        let row: Option<DoctorRow> = sqlx::query_as(
            r#"
            SELECT doctor_id, account_id, medical_specialty, medical_license_number,
                   years_of_experience, medical_education, clinic_or_hospital_address
            FROM doctors
            WHERE account_id = $1
            "#,
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to fetch doctor profile", e))?;

        Ok(row.map(DoctorProfile::from))
    }

    async fn get_patient_by_account(
        &mut self,
        account_id: AccountId,
    ) -> Result<Option<PatientProfile>, DomainError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT patient_id FROM patients WHERE account_id = $1",
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to fetch patient profile", e))?;

        Ok(id.map(|id| PatientProfile {
            id: PatientId::from_uuid(id),
            account_id,
        }))
    }

    async fn create_refresh_token_record(
        &mut self,
        record: &NewRefreshTokenRecord,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO login_logs (account_id, refresh_token, ip_address, user_agent)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(record.account_id.as_uuid())
        .bind(record.token.as_str())
        .bind(&record.ip_address)
        .bind(&record.user_agent)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to insert login log", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn find_refresh_token_record(
        &mut self,
        account_id: AccountId,
        token: &RefreshToken,
    ) -> Result<Option<RefreshTokenRecordId>, DomainError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT log_id FROM login_logs
            WHERE account_id = $1 AND refresh_token = $2
            LIMIT 1
            "#,
        )
        .bind(account_id.as_uuid())
        .bind(token.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error("Failed to fetch login log", e))?;

        Ok(id.map(RefreshTokenRecordId::from_uuid))
    }

    async fn delete_refresh_token_record(
        &mut self,
        id: RefreshTokenRecordId,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM login_logs WHERE log_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error("Failed to delete login log", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit transaction: {}", e))
        })
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx.rollback().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to roll back transaction: {}", e))
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════════

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("{}: {}", context, e))
}

/// Maps a unique violation that slipped past the up-front probes (a concurrent
/// registration) to the same error the probe would have produced.
fn insert_error(context: &str, e: sqlx::Error) -> DomainError {
    let constraint = e
        .as_database_error()
        .filter(|db| db.code().as_deref() == Some(UNIQUE_VIOLATION))
        .and_then(|db| db.constraint().map(str::to_string));

    match constraint.as_deref() {
        Some("accounts_email_key") => DomainError::new(ErrorCode::EmailExists, "Email already exists"),
        Some("doctors_medical_license_number_key") => {
            DomainError::new(ErrorCode::LicenseExists, "Medical license number already exists")
        }
        _ => db_error(context, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_errors_map_to_database_error() {
        let err = insert_error("Failed to insert account", sqlx::Error::RowNotFound);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.starts_with("Failed to insert account"));
    }

    // Integration tests for PostgresCredentialStore require a running database.
    // Run with: MEDIVERSE__DATABASE__URL=postgres://... cargo test -- --ignored

    #[tokio::test]
    #[ignore]
    async fn ping_round_trips_against_live_database() {
        let url = std::env::var("MEDIVERSE__DATABASE__URL").unwrap();
        let pool = PgPool::connect(&url).await.unwrap();
        let store = PostgresCredentialStore::new(pool);

        store.ping().await.unwrap();
        store.close().await;
    }
}
