//! REST API client module for the accounts service.
//!
//! This module provides the `ApiClient` for the five accounts endpoints
//! (register, login, logout, profile read and profile update).
//!
//! Authenticated calls carry the stored access token as a bearer token.

pub mod client;
pub mod error;

pub use client::{ApiClient, DEFAULT_API_BASE_URL};
pub use error::ApiError;
