use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Storage key for the access token
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Storage key for the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Tokens returned by `POST /accounts/login/`.
///
/// `expires_in` is a hint in seconds; nothing on the client enforces it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Durable string storage for the token pair.
///
/// Reads are synchronous so navigation guards can consult them before any
/// network call resolves.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    fn save_pair(&self, pair: &TokenPair) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, &pair.access_token)?;
        self.set(REFRESH_TOKEN_KEY, &pair.refresh_token)?;
        Ok(())
    }

    /// Remove both tokens. Both removals are attempted even if the first fails.
    fn clear_pair(&self) -> Result<()> {
        let access = self.remove(ACCESS_TOKEN_KEY);
        let refresh = self.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }

    /// Stored access token, treating read failures as "none"
    fn access_token(&self) -> Option<String> {
        match self.get(ACCESS_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read access token");
                None
            }
        }
    }

    fn refresh_token(&self) -> Option<String> {
        match self.get(REFRESH_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read refresh token");
                None
            }
        }
    }
}

/// In-process token storage. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token pair
    pub fn with_pair(pair: &TokenPair) -> Result<Self> {
        let store = Self::new();
        store.save_pair(pair)?;
        Ok(store)
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow!("Token store lock poisoned"))?;
        values.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> TokenPair {
        TokenPair {
            access_token: "t1".to_string(),
            refresh_token: "r1".to_string(),
            expires_in: 3600,
        }
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{"access_token": "t1", "refresh_token": "r1", "expires_in": 3600}"#;
        let parsed: TokenPair = serde_json::from_str(json).expect("Failed to parse tokens");
        assert_eq!(parsed, pair());
    }

    #[test]
    fn test_save_and_clear_pair() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.access_token(), None);

        store.save_pair(&pair()).expect("save pair");
        assert_eq!(store.get(ACCESS_TOKEN_KEY).expect("get"), Some("t1".to_string()));
        assert_eq!(store.refresh_token().as_deref(), Some("r1"));

        store.clear_pair().expect("clear pair");
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);

        // Clearing twice is fine
        store.clear_pair().expect("clear pair again");
    }

    #[test]
    fn test_empty_access_token_counts_as_missing() {
        let store = MemoryTokenStore::new();
        store.set(ACCESS_TOKEN_KEY, "").expect("set");
        assert_eq!(store.access_token(), None);
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let debug = format!("{:?}", pair());
        assert!(!debug.contains("t1"));
        assert!(!debug.contains("r1"));
        assert!(debug.contains("3600"));
    }
}
