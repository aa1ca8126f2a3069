//! Account and role profile entities.
//!
//! An account is the identity record shared by every role. Each account owns
//! exactly one role profile, created in the same unit of work.
//!
//! # Invariants
//!
//! - `email` is unique across accounts (case-sensitive as stored)
//! - `medical_license_number` is unique across doctor profiles
//! - Role profiles are 1:1 with their account and are never created alone

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{AccountId, DoctorId, PatientId};

/// Identity record as read back from the credential store.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub fullname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub bio: Option<String>,
    pub profile_picture_url: String,
    /// bcrypt digest. Never logged.
    pub password_hash: String,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("date_of_birth", &self.date_of_birth)
            .field("bio", &self.bio)
            .field("profile_picture_url", &self.profile_picture_url)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Doctor role profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: DoctorId,
    pub account_id: AccountId,
    pub medical_specialty: String,
    pub medical_license_number: String,
    pub years_of_experience: Option<i32>,
    pub medical_education: Option<String>,
    pub clinic_or_hospital_address: String,
}

/// Patient role profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: PatientId,
    pub account_id: AccountId,
}

/// Normalized account fields ready for insertion.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub fullname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_picture_url: String,
    pub password_hash: String,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("fullname", &self.fullname)
            .field("email", &self.email)
            .field("phone_number", &self.phone_number)
            .field("date_of_birth", &self.date_of_birth)
            .field("profile_picture_url", &self.profile_picture_url)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// Normalized doctor profile fields ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctorProfile {
    pub medical_specialty: String,
    pub medical_license_number: String,
    pub years_of_experience: Option<i32>,
    pub medical_education: Option<String>,
    pub clinic_or_hospital_address: String,
}

/// Identifiers returned by a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisteredPatient {
    pub account_id: AccountId,
    pub patient_id: PatientId,
}

/// Identifiers returned by a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisteredDoctor {
    pub account_id: AccountId,
    pub doctor_id: DoctorId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_debug_redacts_password_hash() {
        let account = Account {
            id: AccountId::new(),
            fullname: "Jane Roe".to_string(),
            email: "a@b.com".to_string(),
            phone_number: None,
            date_of_birth: None,
            bio: None,
            profile_picture_url: "https://example.com/a.svg".to_string(),
            password_hash: "$2b$12$secretdigest".to_string(),
        };

        let rendered = format!("{:?}", account);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secretdigest"));
    }

    #[test]
    fn registered_doctor_serializes_both_ids() {
        let registered = RegisteredDoctor {
            account_id: AccountId::new(),
            doctor_id: DoctorId::new(),
        };
        let json = serde_json::to_value(registered).unwrap();
        assert!(json.get("account_id").is_some());
        assert!(json.get("doctor_id").is_some());
    }
}
