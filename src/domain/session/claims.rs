//! Access-token claims.
//!
//! Claims share a common base (`account_id`, `email`) and a role-specific part
//! selected by the `role` tag. On the wire the structure is flat:
//!
//! ```json
//! {"account_id": "...", "email": "...", "role": "doctor",
//!  "doctor_id": "...", "medical_license_number": "MED123456"}
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AccountId, DoctorId, PatientId, Role};

/// Role-specific identity carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleClaims {
    Doctor {
        doctor_id: DoctorId,
        medical_license_number: String,
    },
    Patient {
        patient_id: PatientId,
    },
}

impl RoleClaims {
    pub fn role(&self) -> Role {
        match self {
            RoleClaims::Doctor { .. } => Role::Doctor,
            RoleClaims::Patient { .. } => Role::Patient,
        }
    }
}

/// Identity claims of an access token, without the expiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub account_id: AccountId,
    pub email: String,
    #[serde(flatten)]
    pub role: RoleClaims,
}

impl AccessClaims {
    pub fn doctor(
        account_id: AccountId,
        email: impl Into<String>,
        doctor_id: DoctorId,
        medical_license_number: impl Into<String>,
    ) -> Self {
        Self {
            account_id,
            email: email.into(),
            role: RoleClaims::Doctor {
                doctor_id,
                medical_license_number: medical_license_number.into(),
            },
        }
    }

    pub fn patient(account_id: AccountId, email: impl Into<String>, patient_id: PatientId) -> Self {
        Self {
            account_id,
            email: email.into(),
            role: RoleClaims::Patient { patient_id },
        }
    }

    pub fn role(&self) -> Role {
        self.role.role()
    }
}

/// Account view returned by login: the claims plus the avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    #[serde(flatten)]
    pub claims: AccessClaims,
    pub profile_picture_url: String,
}
