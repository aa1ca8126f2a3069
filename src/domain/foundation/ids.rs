//! Strongly-typed identifier value objects.
//!
//! Every durable row in the credential store is keyed by a UUID generated by
//! the database. The newtypes keep an account id from being passed where a
//! doctor id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a `Uuid` newtype with the conversions every identifier needs.
macro_rules! uuid_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

uuid_identifier!(
    /// Identity record shared by every role.
    AccountId
);

uuid_identifier!(
    /// Doctor role profile, 1:1 with an account.
    DoctorId
);

uuid_identifier!(
    /// Patient role profile, 1:1 with an account.
    PatientId
);

uuid_identifier!(
    /// Row in the refresh-token ledger.
    RefreshTokenRecordId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(AccountId::new(), AccountId::new());
        assert_ne!(PatientId::new(), PatientId::new());
    }

    #[test]
    fn id_parses_from_its_display_form() {
        let id = DoctorId::new();
        let parsed: DoctorId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn id_rejects_non_uuid_strings() {
        assert!("not-a-uuid".parse::<AccountId>().is_err());
    }

    #[test]
    fn id_serializes_as_bare_string() {
        let uuid = Uuid::parse_str("6f1c1d7e-9a43-4bd4-8f0e-1f1f7a0c2d11").unwrap();
        let id = AccountId::from_uuid(uuid);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"6f1c1d7e-9a43-4bd4-8f0e-1f1f7a0c2d11\"");
    }
}
