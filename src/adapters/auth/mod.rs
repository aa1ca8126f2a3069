//! Authentication adapters.
//!
//! Implementations of the `PasswordHasher` and `TokenSigner` ports:
//!
//! - `bcrypt_hasher` - bcrypt digests computed off the async workers
//! - `jwt_signer` - HMAC-signed JWT access tokens

mod bcrypt_hasher;
mod jwt_signer;

pub use bcrypt_hasher::BcryptPasswordHasher;
pub use jwt_signer::JwtTokenSigner;
