//! Application state for the plandesk terminal front-end.
//!
//! `App` owns the screen state and a handle to the `SessionManager`. Every
//! action awaits inline on the UI task; session changes made anywhere are
//! picked up through the watch receiver in `check_session_updates`.

use std::sync::Arc;

use anyhow::Result;
use plandesk_core::api::ApiError;
use plandesk_core::guard;
use plandesk_core::{Config, Route, SessionError, SessionManager, SessionState};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::forms::{LoginField, LoginForm, ProfileForm, RegisterForm};

/// Environment variable that prefills the login email
const EMAIL_ENV: &str = "PLANDESK_EMAIL";

const SESSION_REJECTED: &str = "The server rejected the new session. Please try again.";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state (controls overlays and quitting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    pub session: Arc<SessionManager>,
    session_rx: watch::Receiver<SessionState>,

    /// Latest value seen on the session channel
    pub user: SessionState,

    pub state: AppState,
    pub route: Route,

    pub login: LoginForm,
    pub register: RegisterForm,
    pub profile: ProfileForm,

    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let base_url = config.api_base_url();
        debug!(%base_url, backend = ?config.token_backend, "Config loaded");

        let tokens = config.token_store()?;
        let session = Arc::new(SessionManager::new(&base_url, tokens)?);
        Ok(Self::with_session(config, session))
    }

    pub fn with_session(config: Config, session: Arc<SessionManager>) -> Self {
        let session_rx = session.subscribe();

        let email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();

        Self {
            config,
            session,
            session_rx,
            user: None,
            state: AppState::Normal,
            route: Route::Login,
            login: LoginForm::new(email),
            register: RegisterForm::default(),
            profile: ProfileForm::default(),
            status_message: None,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Resolve the stored session, then open `requested` through the guards.
    ///
    /// Nothing is rendered before this returns, so guarded screens never see
    /// an unresolved session.
    pub async fn start(&mut self, requested: Route) {
        let startup_error = match self.session.reload_profile().await {
            Ok(Some(user)) => {
                info!(user_id = user.id(), "Session restored");
                None
            }
            Ok(None) => {
                debug!("No session to restore");
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to restore session");
                Some(user_message(&e, "Could not restore session"))
            }
        };
        self.sync_session();
        self.navigate(requested).await;

        if startup_error.is_some() {
            self.status_message = startup_error;
        }
    }

    /// Go to `requested`, or wherever the guards send us instead
    pub async fn navigate(&mut self, requested: Route) {
        let target = guard::resolve(requested, self.session.is_logged_in());
        if target != requested {
            debug!(from = requested.path(), to = target.path(), "Navigation redirected");
        }

        match target {
            Route::Profile => {
                self.route = Route::Profile;
                self.profile.editing = false;
                self.profile.clear_feedback();
                self.load_profile().await;
            }
            Route::Login => self.show_login(),
            Route::Register => self.route = Route::Register,
        }
    }

    /// Switch to the login screen. Callers have already ended the session.
    fn show_login(&mut self) {
        self.route = Route::Login;
        self.login.focus = if self.login.email.is_empty() {
            LoginField::Email
        } else {
            LoginField::Password
        };
    }

    /// Pick up session changes and re-check the current screen's guard
    pub async fn check_session_updates(&mut self) {
        if !self.session_rx.has_changed().unwrap_or(false) {
            return;
        }
        self.sync_session();

        if self.user.is_none() {
            let target = guard::resolve(self.route, self.session.is_logged_in());
            if target != self.route {
                info!(to = ?target, "Session ended, leaving guarded screen");
                self.navigate(target).await;
            }
        }
    }

    fn sync_session(&mut self) {
        self.user = self.session_rx.borrow_and_update().clone();
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Submit the login form
    pub async fn attempt_login(&mut self) {
        self.login.clear_feedback();

        let request = self.login.to_request();
        if let Err(errors) = request.validate() {
            self.login.field_errors = errors;
            return;
        }

        match self.session.login(&request).await {
            // Tokens were issued but the profile fetch rejected them
            Ok(_) if !self.session.is_logged_in() => {
                warn!(email = %request.email, "Session rejected right after login");
                self.login.password.clear();
                self.login.error = Some(SESSION_REJECTED.to_string());
                self.sync_session();
            }
            Ok(_) => {
                self.config.last_email = Some(request.email.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login.password.clear();
                self.status_message = None;
                self.sync_session();
                self.navigate(Route::Profile).await;
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                if let Some(details) = e.field_errors() {
                    self.login.field_errors = details.clone();
                }
                self.login.error = Some(user_message(&e, "Login failed"));
            }
        }
    }

    /// Submit the registration form
    pub async fn attempt_register(&mut self) {
        self.register.clear_feedback();

        let request = self.register.to_request();
        if let Err(errors) = request.validate() {
            self.register.field_errors = errors;
            return;
        }

        match self.session.register(&request).await {
            Ok(response) => {
                self.register = RegisterForm::default();
                self.login = LoginForm::new(response.email);
                self.login.notice = Some(format!("{} Please log in.", response.message));
                self.navigate(Route::Login).await;
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                if let Some(details) = e.field_errors() {
                    self.register.field_errors = details.clone();
                }
                self.register.error = Some(user_message(&e, "Registration failed"));
            }
        }
    }

    pub async fn logout(&mut self) {
        if let Some(response) = self.session.logout().await {
            debug!(message = %response.message, "Server acknowledged logout");
        }
        self.profile = ProfileForm::default();
        self.login.password.clear();
        self.status_message = Some("Logged out".to_string());
        self.sync_session();
        self.show_login();
    }

    /// The server rejected our token during a profile action
    async fn force_logout(&mut self) {
        warn!("Token rejected, logging out");
        self.logout().await;
        self.login.error = Some("Session expired. Please log in again.".to_string());
        self.status_message = None;
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Fetch the profile for display. This does not touch session state.
    pub async fn load_profile(&mut self) {
        match self.session.get_profile().await {
            Ok(user) => self.profile.populate(user),
            Err(e) if e.is_unauthorized() => self.force_logout().await,
            Err(e) => {
                error!(error = %e, "Failed to load profile");
                self.profile.error = Some(user_message(&e, "Failed to load profile"));
            }
        }
    }

    pub async fn save_profile(&mut self) {
        self.profile.clear_feedback();

        let Some(current) = self.profile.user.as_ref() else {
            self.profile.error = Some("Profile not loaded".to_string());
            return;
        };

        let update = match self.profile.draft.to_update(&current.profile) {
            Ok(update) => update,
            Err(errors) => {
                self.profile.field_errors = errors;
                return;
            }
        };

        if update.is_empty() {
            self.profile.success = Some("No changes to save".to_string());
            self.profile.editing = false;
            return;
        }

        match self.session.update_profile(&update).await {
            Ok(user) => {
                self.profile.populate(user);
                self.profile.editing = false;
                self.profile.success = Some("Profile updated successfully".to_string());
                self.sync_session();
            }
            Err(e) if e.is_unauthorized() => self.force_logout().await,
            Err(e) => {
                error!(error = %e, "Profile update failed");
                if let Some(details) = e.field_errors() {
                    self.profile.field_errors = details.clone();
                }
                self.profile.error = Some(user_message(&e, "Failed to update profile"));
            }
        }
    }
}

/// Message shown to the user for a failed action
pub fn user_message(err: &SessionError, fallback: &str) -> String {
    match err {
        SessionError::LoginInProgress => "Login already in progress".to_string(),
        SessionError::Storage(_) => "Could not save the session on this machine".to_string(),
        SessionError::Api(api) => match api {
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Unauthorized { message } => message.clone(),
            ApiError::Network(e) if e.is_timeout() => {
                "Connection timed out. Please try again.".to_string()
            }
            ApiError::Network(_) => {
                "Unable to connect to server. Check your network connection.".to_string()
            }
            ApiError::RateLimited => "Too many requests. Please wait and try again.".to_string(),
            ApiError::AccessDenied(message) | ApiError::NotFound(message) => {
                format!("{}: {}", fallback, message)
            }
            ApiError::ServerError(_) | ApiError::InvalidResponse(_) => fallback.to_string(),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================
