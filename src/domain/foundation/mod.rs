//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, time values, roles and error types
//! that form the vocabulary of the Mediverse credential domain.

mod auth;
mod credential_error;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, Role, UnknownRole};
pub use credential_error::{CredentialError, SERVER_ERROR_MESSAGE};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AccountId, DoctorId, PatientId, RefreshTokenRecordId};
pub use timestamp::Timestamp;
