//! Account domain module.
//!
//! Identity records, role profiles, and the registration rules that guard
//! their creation.
//!
//! # Module Structure
//!
//! - `account` - Account and role profile entities
//! - `registration` - Sign-up payloads and fail-fast validation

mod account;
pub mod registration;

pub use account::{
    Account, DoctorProfile, NewAccount, NewDoctorProfile, PatientProfile, RegisteredDoctor,
    RegisteredPatient,
};
pub use registration::{
    avatar_url, AccountDraft, DoctorRegistration, PatientRegistration, ValidDoctorRegistration,
    ValidPatientRegistration,
};
