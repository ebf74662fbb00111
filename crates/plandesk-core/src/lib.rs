//! plandesk core: client-side account management.
//!
//! - `api`: typed client for the accounts REST API
//! - `auth`: token pair persistence
//! - `session`: `SessionManager`, the owner of the logged-in state
//! - `guard`: route guards for guest-only and authenticated pages
//! - `models`: request/response and profile types
//! - `config`: on-disk configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod guard;
pub mod models;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use auth::{TokenPair, TokenStore};
pub use config::Config;
pub use guard::{GuardDecision, Route};
pub use session::{SessionError, SessionManager, SessionState};
