//! Session state management.
//!
//! `SessionManager` ties the API client to token storage and broadcasts the
//! logged-in user to subscribers through a `tokio::sync::watch` channel.

pub mod manager;

pub use manager::{SessionError, SessionManager, SessionState};
