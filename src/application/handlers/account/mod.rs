//! Account handlers.
//!
//! ## Commands
//! - Registering a patient account
//! - Registering a doctor account

mod register_doctor;
mod register_patient;

pub use register_doctor::{RegisterDoctorCommand, RegisterDoctorHandler};
pub use register_patient::{RegisterPatientCommand, RegisterPatientHandler};

use crate::domain::foundation::CredentialError;
use crate::ports::CredentialUnitOfWork;

pub const EMAIL_EXISTS: &str = "Email already exists";
pub const FAILED_TO_CREATE_ACCOUNT: &str = "Failed to create account";

async fn ensure_email_is_free(
    uow: &mut dyn CredentialUnitOfWork,
    email: &str,
) -> Result<(), CredentialError> {
    if uow.check_email_exists(email).await? {
        return Err(CredentialError::invalid_data(EMAIL_EXISTS));
    }
    Ok(())
}
