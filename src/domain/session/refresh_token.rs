//! Opaque refresh tokens and their ledger rows.

use rand::rngs::OsRng;
use rand::Rng;
use std::fmt;

use crate::domain::foundation::AccountId;

/// Length of a generated refresh token.
pub const REFRESH_TOKEN_LEN: usize = 64;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// High-entropy secret exchanged for new access tokens.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Draws a fresh token of lowercase letters and digits from the OS CSPRNG.
    pub fn generate() -> Self {
        let mut rng = OsRng;
        let token = (0..REFRESH_TOKEN_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        Self(token)
    }

    /// Wraps a token presented by a caller.
    pub fn from_presented(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RefreshToken([REDACTED])")
    }
}

/// Ledger row written on a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshTokenRecord {
    pub account_id: AccountId,
    pub token: RefreshToken,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_token_has_fixed_length_and_alphabet() {
        let token = RefreshToken::generate();
        assert_eq!(token.as_str().len(), REFRESH_TOKEN_LEN);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn generated_tokens_differ() {
        assert_ne!(RefreshToken::generate(), RefreshToken::generate());
    }

    #[test]
    fn debug_hides_value() {
        let token = RefreshToken::from_presented("supersecret");
        assert!(!format!("{:?}", token).contains("supersecret"));
    }
}
