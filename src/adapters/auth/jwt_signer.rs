//! JWT implementation of the TokenSigner port.
//!
//! Tokens are HMAC-signed with a process-wide secret. The payload is the flat
//! claim map plus `exp` and a random `jti`; expiry is checked with zero leeway.
//!
//! The `jti` keeps two tokens signed for the same claims within one second
//! distinct, so blacklisting one never revokes the other.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::{AuthConfig, JwtAlgorithm};
use crate::domain::foundation::{AuthError, DomainError, ErrorCode, Timestamp};
use crate::domain::session::AccessClaims;
use crate::ports::{TokenSigner, VerifiedToken};

/// Wire payload: the claims with an absolute expiry in Unix seconds.
#[derive(Debug, Serialize, Deserialize)]
struct JwtPayload {
    #[serde(flatten)]
    claims: AccessClaims,
    exp: u64,
    #[serde(default)]
    jti: String,
}

/// HMAC JWT signer.
pub struct JwtTokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    default_ttl_secs: u64,
}

impl JwtTokenSigner {
    pub fn new(secret: &SecretString, algorithm: JwtAlgorithm, default_ttl_secs: u64) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            algorithm: match algorithm {
                JwtAlgorithm::Hs256 => Algorithm::HS256,
                JwtAlgorithm::Hs384 => Algorithm::HS384,
                JwtAlgorithm::Hs512 => Algorithm::HS512,
            },
            default_ttl_secs,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            config.jwt_algorithm,
            config.access_token_ttl_secs,
        )
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, claims: &AccessClaims, ttl_secs: u64) -> Result<String, DomainError> {
        let now = Timestamp::now().as_unix_secs().max(0) as u64;
        let payload = JwtPayload {
            claims: claims.clone(),
            exp: now.saturating_add(ttl_secs),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &payload, &self.encoding_key).map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Failed to sign token: {}", e))
        })
    }

    fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        let decoded = decode::<JwtPayload>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    debug!(error = %e, "Rejected access token");
                    AuthError::InvalidToken
                }
            })?;

        let exp = i64::try_from(decoded.claims.exp).map_err(|_| AuthError::InvalidToken)?;
        Ok(VerifiedToken {
            claims: decoded.claims.claims,
            expires_at: Timestamp::from_unix_secs(exp),
        })
    }

    fn default_ttl_secs(&self) -> u64 {
        self.default_ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{AccountId, DoctorId, PatientId};
    use serde_json::json;

    const SECRET: &str = "test-secret-key-test-secret-key!";

    fn signer() -> JwtTokenSigner {
        JwtTokenSigner::new(&SecretString::new(SECRET.to_string()), JwtAlgorithm::Hs256, 3600)
    }

    fn patient_claims() -> AccessClaims {
        AccessClaims::patient(AccountId::new(), "a@b.com", PatientId::new())
    }

    #[test]
    fn verify_returns_signed_claims() {
        let claims = patient_claims();
        let token = signer().sign(&claims, 3600).unwrap();

        let verified = signer().verify(&token).unwrap();
        assert_eq!(verified.claims, claims);
    }

    #[test]
    fn doctor_claims_survive_round_trip() {
        let claims = AccessClaims::doctor(AccountId::new(), "d@x.com", DoctorId::new(), "MED123456");
        let token = signer().sign_default(&claims).unwrap();

        assert_eq!(signer().verify(&token).unwrap().claims, claims);
    }

    #[test]
    fn expiry_is_ttl_from_now() {
        let before = Timestamp::now().as_unix_secs();
        let token = signer().sign(&patient_claims(), 120).unwrap();

        let expires_at = signer().verify(&token).unwrap().expires_at.as_unix_secs();
        assert!(expires_at >= before + 120);
        assert!(expires_at <= before + 121);
    }

    #[test]
    fn lapsed_token_is_expired_not_invalid() {
        let exp = (Timestamp::now().as_unix_secs() - 10) as u64;
        let payload = JwtPayload {
            claims: patient_claims(),
            exp,
            jti: String::new(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(signer().verify(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn same_claims_in_same_second_give_distinct_tokens() {
        let claims = patient_claims();
        let first = signer().sign_default(&claims).unwrap();
        let second = signer().sign_default(&claims).unwrap();

        assert_ne!(first, second);
        assert_eq!(signer().verify(&second).unwrap().claims, claims);
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(signer().verify("invalid.token.here"), Err(AuthError::InvalidToken));
    }

    #[test]
    fn different_secret_is_invalid() {
        let token = signer().sign_default(&patient_claims()).unwrap();
        let other = JwtTokenSigner::new(
            &SecretString::new("another-secret-another-secret!!!".to_string()),
            JwtAlgorithm::Hs256,
            3600,
        );

        assert_eq!(other.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn different_algorithm_is_invalid() {
        let token = signer().sign_default(&patient_claims()).unwrap();
        let other = JwtTokenSigner::new(
            &SecretString::new(SECRET.to_string()),
            JwtAlgorithm::Hs512,
            3600,
        );

        assert_eq!(other.verify(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn token_without_account_id_is_invalid() {
        let exp = (Timestamp::now().as_unix_secs() + 600) as u64;
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"email": "a@b.com", "role": "patient", "patient_id": PatientId::new(), "exp": exp}),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_eq!(signer().verify(&token), Err(AuthError::InvalidToken));
    }
}
