//! Mediverse - Credential and session lifecycle service
//!
//! Patient and doctor registration, password login, access-token refresh,
//! logout, and the authentication gate in front of protected endpoints.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
