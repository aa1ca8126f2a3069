//! Application handlers.
//!
//! Command handlers that orchestrate domain operations over the ports.

pub mod account;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use account::{
    RegisterDoctorCommand, RegisterDoctorHandler, RegisterPatientCommand, RegisterPatientHandler,
};
pub use session::{
    AuthenticationGate, LoginCommand, LoginHandler, LoginResult, LogoutCommand, LogoutHandler,
    RefreshAccessTokenCommand, RefreshAccessTokenHandler, RefreshAccessTokenResult,
};
