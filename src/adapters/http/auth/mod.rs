//! HTTP adapter for registration and session endpoints.
//!
//! Mounted under `/api/<version>/auth`:
//! - `POST /register/patient` - Create a patient account
//! - `POST /register/doctor` - Create a doctor account
//! - `POST /login` - Log in
//! - `POST /refresh` - Refresh the access token
//! - `POST /logout` - Log out
//! - `GET /me` - Current claims

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AuthAppState, ClientInfo};
pub use routes::auth_router;
