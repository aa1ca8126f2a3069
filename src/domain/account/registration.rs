//! Registration payloads and their validation rules.
//!
//! Validation is fail-fast: the first rule that fails decides the error, so
//! the order of the checks below is part of the contract.
//!
//! 1. Required fields present after trimming
//! 2. Email shape
//! 3. Password strength
//! 4. Full name letters and spaces only
//! 5. Doctor: license format, then address length
//! 6. Phone number shape, if present
//! 7. Patient: date of birth `DD-MM-YYYY`, if present
//! 8. Doctor: years of experience non-negative, if present

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

use super::{NewAccount, NewDoctorProfile};
use crate::domain::foundation::ValidationError;

/// Base URL of the generated placeholder avatar.
pub const AVATAR_BASE_URL: &str = "https://api.dicebear.com/9.x/identicon/svg?seed=";

pub const MISSING_REQUIRED_FIELDS: &str = "Missing required fields";
pub const INVALID_EMAIL: &str = "Invalid email format";
pub const WEAK_PASSWORD: &str = "Password must be between 6 and 50 characters and contain at least one uppercase letter, one lowercase letter, and one digit";
pub const INVALID_FULLNAME: &str = "Full name can only contain letters and spaces";
pub const INVALID_LICENSE: &str = "Invalid medical license number format";
pub const SHORT_ADDRESS: &str = "Clinic or hospital address must be at least 10 characters long";
pub const INVALID_PHONE: &str = "Invalid phone number format";
pub const INVALID_DATE_OF_BIRTH: &str = "Invalid date of birth format. Expected format: DD-MM-YYYY";
pub const INVALID_YEARS_OF_EXPERIENCE: &str = "Years of experience must be a non-negative integer";

const PASSWORD_MIN_LEN: usize = 6;
const PASSWORD_MAX_LEN: usize = 50;
const ADDRESS_MIN_LEN: usize = 10;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));
static FULLNAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid regex"));
static LICENSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{5,20}$").expect("valid regex"));
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid regex"));
static DATE_OF_BIRTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("valid regex"));

// ════════════════════════════════════════════════════════════════════════════
// Payloads
// ════════════════════════════════════════════════════════════════════════════

/// Raw patient sign-up payload.
///
/// Every field is optional at the type level so that absent and blank values
/// are reported through the same "missing required fields" rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientRegistration {
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub fullname: Option<String>,
    pub phone_number: Option<String>,
    /// `DD-MM-YYYY`.
    pub date_of_birth: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// Raw doctor sign-up payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoctorRegistration {
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub fullname: Option<String>,
    pub phone_number: Option<String>,
    pub medical_specialty: Option<String>,
    pub medical_license_number: Option<String>,
    pub clinic_or_hospital_address: Option<String>,
    pub medical_education: Option<String>,
    /// Kept untyped so a non-integer value reports the years-of-experience rule.
    pub years_of_experience: Option<Value>,
    pub profile_picture_url: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Validated drafts
// ════════════════════════════════════════════════════════════════════════════

/// Normalized account fields still waiting for a password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountDraft {
    pub fullname: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub profile_picture_url: String,
}

impl AccountDraft {
    /// Completes the draft with the digest of the accepted password.
    pub fn into_new_account(self, password_hash: String) -> NewAccount {
        NewAccount {
            fullname: self.fullname,
            email: self.email,
            phone_number: self.phone_number,
            date_of_birth: self.date_of_birth,
            profile_picture_url: self.profile_picture_url,
            password_hash,
        }
    }
}

/// A patient payload that passed every rule.
#[derive(Debug, Clone)]
pub struct ValidPatientRegistration {
    pub account: AccountDraft,
    pub password: SecretString,
}

/// A doctor payload that passed every rule.
#[derive(Debug, Clone)]
pub struct ValidDoctorRegistration {
    pub account: AccountDraft,
    pub password: SecretString,
    pub profile: NewDoctorProfile,
}

// ════════════════════════════════════════════════════════════════════════════
// Validation
// ════════════════════════════════════════════════════════════════════════════

impl PatientRegistration {
    /// Applies the patient rules in order and returns normalized fields.
    pub fn validate(&self) -> Result<ValidPatientRegistration, ValidationError> {
        let fullname = trimmed(&self.fullname);
        let email = trimmed(&self.email);
        let password = self.password.as_ref().map(|p| p.expose_secret().as_str());

        let (fullname, email, password) = match (fullname, email, non_blank(password)) {
            (Some(f), Some(e), Some(p)) => (f, e, p),
            _ => return Err(ValidationError::missing_required(MISSING_REQUIRED_FIELDS)),
        };

        check_email(email)?;
        check_password_strength(password)?;
        check_fullname(fullname)?;

        let phone_number = trimmed(&self.phone_number);
        if let Some(phone) = phone_number {
            check_phone(phone)?;
        }

        let date_of_birth = trimmed(&self.date_of_birth)
            .map(parse_date_of_birth)
            .transpose()?;

        Ok(ValidPatientRegistration {
            account: AccountDraft {
                fullname: fullname.to_string(),
                email: email.to_string(),
                phone_number: phone_number.map(str::to_string),
                date_of_birth,
                profile_picture_url: picture_or_avatar(&self.profile_picture_url, fullname),
            },
            password: SecretString::new(password.to_string()),
        })
    }
}

impl DoctorRegistration {
    /// Applies the doctor rules in order and returns normalized fields.
    pub fn validate(&self) -> Result<ValidDoctorRegistration, ValidationError> {
        let password = self.password.as_ref().map(|p| p.expose_secret().as_str());
        let required = (
            trimmed(&self.fullname),
            trimmed(&self.email),
            non_blank(password),
            trimmed(&self.medical_specialty),
            trimmed(&self.medical_license_number),
            trimmed(&self.clinic_or_hospital_address),
        );

        let (fullname, email, password, specialty, license, address) = match required {
            (Some(f), Some(e), Some(p), Some(s), Some(l), Some(a)) => (f, e, p, s, l, a),
            _ => return Err(ValidationError::missing_required(MISSING_REQUIRED_FIELDS)),
        };

        check_email(email)?;
        check_password_strength(password)?;
        check_fullname(fullname)?;
        check_license(license)?;
        check_address(address)?;

        let phone_number = trimmed(&self.phone_number);
        if let Some(phone) = phone_number {
            check_phone(phone)?;
        }

        let years_of_experience = parse_years_of_experience(self.years_of_experience.as_ref())?;

        Ok(ValidDoctorRegistration {
            account: AccountDraft {
                fullname: fullname.to_string(),
                email: email.to_string(),
                phone_number: phone_number.map(str::to_string),
                date_of_birth: None,
                profile_picture_url: picture_or_avatar(&self.profile_picture_url, fullname),
            },
            password: SecretString::new(password.to_string()),
            profile: NewDoctorProfile {
                medical_specialty: specialty.to_string(),
                medical_license_number: license.to_string(),
                years_of_experience,
                medical_education: trimmed(&self.medical_education).map(str::to_string),
                clinic_or_hospital_address: address.to_string(),
            },
        })
    }
}

/// Returns the trimmed value, or `None` when absent or blank.
fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Passwords are checked for blankness after trimming but kept as typed.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub fn check_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_SHAPE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::invalid_format("email", INVALID_EMAIL))
    }
}

/// Length 6..=50 with at least one ASCII uppercase, lowercase and digit.
pub fn is_strong_password(password: &str) -> bool {
    let len = password.chars().count();
    (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

pub fn check_password_strength(password: &str) -> Result<(), ValidationError> {
    if is_strong_password(password) {
        Ok(())
    } else {
        Err(ValidationError::invalid_format("password", WEAK_PASSWORD))
    }
}

pub fn check_fullname(fullname: &str) -> Result<(), ValidationError> {
    if FULLNAME.is_match(fullname) {
        Ok(())
    } else {
        Err(ValidationError::invalid_format("fullname", INVALID_FULLNAME))
    }
}

pub fn check_license(license: &str) -> Result<(), ValidationError> {
    if LICENSE.is_match(license) {
        Ok(())
    } else {
        Err(ValidationError::invalid_format("medical_license_number", INVALID_LICENSE))
    }
}

pub fn check_address(address: &str) -> Result<(), ValidationError> {
    if address.chars().count() >= ADDRESS_MIN_LEN {
        Ok(())
    } else {
        Err(ValidationError::out_of_range("clinic_or_hospital_address", SHORT_ADDRESS))
    }
}

pub fn check_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::invalid_format("phone_number", INVALID_PHONE))
    }
}

/// Parses `DD-MM-YYYY`. Impossible calendar dates fail the same rule.
pub fn parse_date_of_birth(value: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::invalid_format("date_of_birth", INVALID_DATE_OF_BIRTH);
    if !DATE_OF_BIRTH.is_match(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, "%d-%m-%Y").map_err(|_| invalid())
}

fn parse_years_of_experience(value: Option<&Value>) -> Result<Option<i32>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .filter(|years| *years >= 0)
            .and_then(|years| i32::try_from(years).ok())
            .map(Some)
            .ok_or_else(invalid_years),
        Some(_) => Err(invalid_years()),
    }
}

fn invalid_years() -> ValidationError {
    ValidationError::out_of_range("years_of_experience", INVALID_YEARS_OF_EXPERIENCE)
}

fn picture_or_avatar(supplied: &Option<String>, fullname: &str) -> String {
    trimmed(supplied)
        .map(str::to_string)
        .unwrap_or_else(|| avatar_url(fullname))
}

/// Deterministic identicon URL seeded by the full name.
///
/// Whitespace in the seed is percent-encoded byte by byte.
pub fn avatar_url(fullname: &str) -> String {
    let mut url = String::with_capacity(AVATAR_BASE_URL.len() + fullname.len() * 3);
    url.push_str(AVATAR_BASE_URL);
    for c in fullname.chars() {
        if c.is_whitespace() {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).as_bytes() {
                url.push_str(&format!("%{:02X}", byte));
            }
        } else {
            url.push(c);
        }
    }
    url
}
