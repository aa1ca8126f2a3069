//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Each command handler runs inside one credential unit of work, finished by
//! [`unit_of_work::finish`].

pub mod handlers;
pub mod unit_of_work;

pub use handlers::{
    // Account handlers
    RegisterDoctorCommand, RegisterDoctorHandler, RegisterPatientCommand, RegisterPatientHandler,
    // Session handlers
    AuthenticationGate, LoginCommand, LoginHandler, LoginResult, LogoutCommand, LogoutHandler,
    RefreshAccessTokenCommand, RefreshAccessTokenHandler, RefreshAccessTokenResult,
};
