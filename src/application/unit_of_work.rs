//! Finishing a unit of work.
//!
//! Handlers run their steps against `&mut dyn CredentialUnitOfWork` and hand
//! the outcome to [`finish`], which consumes the unit. Every exit path ends in
//! exactly one commit or rollback.

use crate::domain::foundation::CredentialError;
use crate::ports::CredentialUnitOfWork;

/// Commits on `Ok`, rolls back on `Err`.
///
/// A failed commit turns the outcome into a server error. A failed rollback is
/// logged and the original error is returned, since the transaction dies with
/// its connection anyway.
pub async fn finish<T>(
    uow: Box<dyn CredentialUnitOfWork>,
    outcome: Result<T, CredentialError>,
) -> Result<T, CredentialError> {
    match outcome {
        Ok(value) => {
            uow.commit().await.map_err(|e| {
                tracing::error!(error = %e, "Commit failed");
                CredentialError::from(e)
            })?;
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = uow.rollback().await {
                tracing::error!(error = %e, "Rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCredentialStore;
    use crate::domain::account::NewAccount;
    use crate::ports::CredentialStore;

    fn new_account() -> NewAccount {
        NewAccount {
            fullname: "Jane Roe".to_string(),
            email: "a@b.com".to_string(),
            phone_number: None,
            date_of_birth: None,
            profile_picture_url: "https://example.com/a.svg".to_string(),
            password_hash: "$2b$04$digest".to_string(),
        }
    }

    #[tokio::test]
    async fn ok_outcome_commits() {
        let store = InMemoryCredentialStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.create_account(&new_account()).await.unwrap();

        let value = finish(uow, Ok::<_, CredentialError>(7)).await.unwrap();

        assert_eq!(value, 7);
        assert_eq!(store.commits(), 1);
        assert_eq!(store.rollbacks(), 0);
        assert_eq!(store.open_units(), 0);
        assert_eq!(store.account_count().await, 1);
    }

    #[tokio::test]
    async fn err_outcome_rolls_back_and_keeps_error() {
        let store = InMemoryCredentialStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.create_account(&new_account()).await.unwrap();

        let err = finish::<()>(uow, Err(CredentialError::invalid_data("nope")))
            .await
            .unwrap_err();

        assert_eq!(err, CredentialError::invalid_data("nope"));
        assert_eq!(store.commits(), 0);
        assert_eq!(store.rollbacks(), 1);
        assert_eq!(store.open_units(), 0);
        assert_eq!(store.account_count().await, 0);
    }
}
