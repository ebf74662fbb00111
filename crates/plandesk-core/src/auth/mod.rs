//! Token persistence for the logged-in session.
//!
//! This module provides:
//! - `TokenPair`: the access/refresh tokens returned by login
//! - `TokenStore`: synchronous key/value storage under two fixed keys
//! - Backends: `MemoryTokenStore`, `FileTokenStore` (JSON in the cache
//!   directory) and `KeyringTokenStore` (OS keychain)
//!
//! Tokens are stored as-is. Nothing here checks expiry.

pub mod credentials;
pub mod file_store;
pub mod tokens;

pub use credentials::KeyringTokenStore;
pub use file_store::FileTokenStore;
pub use tokens::{MemoryTokenStore, TokenPair, TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
