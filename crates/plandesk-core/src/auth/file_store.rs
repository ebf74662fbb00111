use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use super::tokens::TokenStore;

/// Token file name in cache directory
const TOKENS_FILE: &str = "tokens.json";

/// Token storage backed by a JSON object on disk.
///
/// The file is rewritten on every change and deleted once it holds no keys.
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(cache_dir: impl AsRef<Path>) -> Self {
        Self {
            path: cache_dir.as_ref().join(TOKENS_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .context("Failed to read token file")?;
        serde_json::from_str(&contents).context("Failed to parse token file")
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if values.is_empty() {
            if self.path.exists() {
                std::fs::remove_file(&self.path).context("Failed to remove token file")?;
                debug!(path = ?self.path, "Token file removed");
            }
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, contents).context("Failed to write token file")?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Token file lock poisoned"))?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Token file lock poisoned"))?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("Token file lock poisoned"))?;
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::tokens::{TokenPair, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
    use tempfile::tempdir;

    #[test]
    fn test_pair_persists_across_instances() {
        let dir = tempdir().expect("tempdir");
        let pair = TokenPair {
            access_token: "t1".to_string(),
            refresh_token: "r1".to_string(),
            expires_in: 3600,
        };

        FileTokenStore::new(dir.path()).save_pair(&pair).expect("save pair");

        let reopened = FileTokenStore::new(dir.path());
        assert_eq!(reopened.access_token().as_deref(), Some("t1"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY).expect("get").as_deref(), Some("r1"));
    }

    #[test]
    fn test_clear_pair_removes_file() {
        let dir = tempdir().expect("tempdir");
        let store = FileTokenStore::new(dir.path());
        store.set(ACCESS_TOKEN_KEY, "t1").expect("set access");
        store.set(REFRESH_TOKEN_KEY, "r1").expect("set refresh");
        assert!(store.path().exists());

        store.remove(ACCESS_TOKEN_KEY).expect("remove access");
        assert!(store.path().exists());
        assert_eq!(store.access_token(), None);

        store.clear_pair().expect("clear pair");
        assert!(!store.path().exists());
    }

    #[test]
    fn test_missing_dir_is_created_on_write() {
        let dir = tempdir().expect("tempdir");
        let nested = dir.path().join("plandesk").join("cache");
        let store = FileTokenStore::new(&nested);

        assert_eq!(store.get(ACCESS_TOKEN_KEY).expect("get"), None);
        store.set(ACCESS_TOKEN_KEY, "t1").expect("set");
        assert!(nested.join(TOKENS_FILE).exists());
    }

    #[test]
    fn test_corrupt_file_reports_error() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join(TOKENS_FILE), "not json").expect("write");
        let store = FileTokenStore::new(dir.path());

        assert!(store.get(ACCESS_TOKEN_KEY).is_err());
        // The best-effort read treats it as logged out
        assert_eq!(store.access_token(), None);
    }
}
