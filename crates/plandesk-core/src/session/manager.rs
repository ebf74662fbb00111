use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{TokenPair, TokenStore};
use crate::models::{
    FieldErrors, LoginRequest, LogoutResponse, ProfileUpdate, RegisterRequest, RegisterResponse,
    UserWithProfile,
};

/// Who is logged in, if anyone. `None` means logged out.
pub type SessionState = Option<UserWithProfile>;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Token storage error: {0:#}")]
    Storage(anyhow::Error),

    #[error("A login request is already in progress")]
    LoginInProgress,
}

impl SessionError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, SessionError::Api(e) if e.is_unauthorized())
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            SessionError::Api(e) => e.field_errors(),
            _ => None,
        }
    }
}

/// Owns the client-side authentication state.
///
/// The token pair lives in a `TokenStore`; the current user lives in a watch
/// channel that any number of consumers can subscribe to. Only the manager
/// writes to it.
///
/// Every login and every local cleanup starts a new session epoch. Responses
/// that were requested under an older epoch are not published, so a profile
/// arriving after logout cannot bring the user back.
pub struct SessionManager {
    api: ApiClient,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    epoch: AtomicU64,
    login_lock: Mutex<()>,
}

impl SessionManager {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let api = ApiClient::new(base_url, tokens.clone())?;
        let (state, _) = watch::channel(None);

        Ok(Self {
            api,
            tokens,
            state,
            epoch: AtomicU64::new(0),
            login_lock: Mutex::new(()),
        })
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    // =========================================================================
    // Observation
    // =========================================================================

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Snapshot of the current session state
    pub fn current_user(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Cheap best-effort check: an access token is stored.
    /// A stored but expired token still counts as logged in.
    pub fn is_logged_in(&self) -> bool {
        self.tokens.access_token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.access_token()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create an account. Does not log in and does not touch session state.
    pub async fn register(&self, request: &RegisterRequest) -> Result<RegisterResponse, SessionError> {
        let response = self.api.register(request).await?;
        info!(user_id = response.id, email = %response.email, "Registration successful");
        Ok(response)
    }

    /// Log in, persist the token pair and load the new user's profile.
    ///
    /// A failed login leaves tokens and state untouched. A second call while
    /// one is in flight fails with `LoginInProgress` without sending anything.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<TokenPair, SessionError> {
        let _guard = self.login_lock.try_lock().map_err(|_| {
            warn!(email = %credentials.email, "Login already in progress, ignoring duplicate");
            SessionError::LoginInProgress
        })?;

        let pair = self.api.login(credentials).await?;

        self.next_epoch();
        if let Err(e) = self.tokens.save_pair(&pair) {
            if let Err(clear_err) = self.tokens.clear_pair() {
                warn!(error = %clear_err, "Failed to clear partially saved tokens");
            }
            return Err(SessionError::Storage(e));
        }
        info!(email = %credentials.email, "Login successful");

        match self.reload_profile().await {
            Ok(Some(user)) => debug!(user_id = user.id(), "Session populated after login"),
            Ok(None) => warn!("Profile rejected right after login, session cleared"),
            Err(e) => warn!(error = %e, "Failed to load profile after login"),
        }

        Ok(pair)
    }

    /// Log out. Never fails: local tokens and state are cleared whatever the
    /// server says. Returns the server's reply when there was one.
    pub async fn logout(&self) -> Option<LogoutResponse> {
        let response = if self.is_logged_in() {
            match self.api.logout().await {
                Ok(response) => Some(response),
                Err(e) => {
                    warn!(error = %e, "Server logout failed, clearing local session anyway");
                    None
                }
            }
        } else {
            debug!("No stored token, skipping server logout");
            None
        };

        self.clear_local();
        info!("Logged out");
        response
    }

    /// Fetch the current user. Does not update session state.
    pub async fn get_profile(&self) -> Result<UserWithProfile, SessionError> {
        Ok(self.api.fetch_profile().await?)
    }

    /// Resolve session state from the stored token.
    ///
    /// Used at startup and after login. On success the user is published. If
    /// the server rejects the token this performs the same local cleanup as
    /// `logout` and returns `Ok(None)`. Other failures are returned and leave
    /// the tokens in place.
    pub async fn reload_profile(&self) -> Result<SessionState, SessionError> {
        if !self.is_logged_in() {
            debug!("No stored token, session stays logged out");
            self.state.send_if_modified(|state| state.take().is_some());
            return Ok(None);
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        match self.api.fetch_profile().await {
            Ok(user) => {
                if self.publish(epoch, Some(user.clone())) {
                    debug!(user_id = user.id(), "Session state updated");
                    Ok(Some(user))
                } else {
                    debug!("Discarding profile fetched for an earlier session");
                    Ok(self.current_user())
                }
            }
            Err(e) if e.is_unauthorized() => {
                if self.epoch.load(Ordering::SeqCst) == epoch {
                    warn!("Stored token rejected, clearing session");
                    self.clear_local();
                    Ok(None)
                } else {
                    Ok(self.current_user())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Send a partial update. On success the server's representation
    /// replaces session state; nothing is merged locally.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserWithProfile, SessionError> {
        let epoch = self.epoch.load(Ordering::SeqCst);
        let user = self.api.update_profile(update).await?;

        if !self.publish(epoch, Some(user.clone())) {
            debug!("Session changed during profile update, not publishing");
        }
        info!(fields = ?update.changed_fields(), "Profile updated");
        Ok(user)
    }

    // =========================================================================
    // State slot
    // =========================================================================

    /// Start a new epoch without notifying subscribers
    fn next_epoch(&self) {
        self.state.send_if_modified(|_| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            false
        });
    }

    /// Publish `value` if no login or cleanup happened since `epoch` was read.
    /// The check runs under the channel's write lock.
    fn publish(&self, epoch: u64, value: SessionState) -> bool {
        self.state.send_if_modified(|state| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            *state = value;
            true
        })
    }

    fn clear_local(&self) {
        self.state.send_modify(|state| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            *state = None;
        });
        if let Err(e) = self.tokens.clear_pair() {
            warn!(error = %e, "Failed to clear stored tokens");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    // Nothing listens on the discard port, so requests fail fast
    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn stored_pair() -> TokenPair {
        TokenPair {
            access_token: "t1".to_string(),
            refresh_token: "r1".to_string(),
            expires_in: 3600,
        }
    }

    #[test]
    fn test_token_reads_are_synchronous_storage_reads() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionManager::new(UNREACHABLE, store.clone()).expect("session");
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);

        store.save_pair(&stored_pair()).expect("save pair");
        assert!(session.is_logged_in());
        assert_eq!(session.token().as_deref(), Some("t1"));
        // Stored token alone does not populate state
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_logout_without_token_skips_server() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionManager::new(UNREACHABLE, store).expect("session");

        assert!(session.logout().await.is_none());
        assert!(!session.is_logged_in());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn test_reload_without_token_is_logged_out() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = SessionManager::new(UNREACHABLE, store).expect("session");

        let state = session.reload_profile().await.expect("reload");
        assert!(state.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_tokens_when_server_unreachable() {
        let store = Arc::new(MemoryTokenStore::with_pair(&stored_pair()).expect("store"));
        let session = SessionManager::new(UNREACHABLE, store.clone()).expect("session");
        let mut rx = session.subscribe();

        assert!(session.logout().await.is_none());
        assert!(!session.is_logged_in());
        assert_eq!(store.refresh_token(), None);
        assert!(rx.has_changed().expect("sender alive"));
        assert!(rx.borrow_and_update().is_none());
    }

    #[test]
    fn test_session_error_helpers() {
        let err = SessionError::from(ApiError::Unauthorized {
            message: "Invalid credentials".to_string(),
        });
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "Unauthorized: Invalid credentials");
        assert!(err.field_errors().is_none());

        assert!(!SessionError::LoginInProgress.is_unauthorized());
    }
}
