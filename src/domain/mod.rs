//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, roles, errors)
//! - `account` - Accounts, role profiles and registration rules
//! - `session` - Token claims, refresh tokens and login credentials

pub mod account;
pub mod foundation;
pub mod session;
