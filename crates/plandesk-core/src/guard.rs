//! Navigation guards.
//!
//! Pages are either for guests (login, register) or for logged-in users
//! (profile). Guards only look at the synchronous token check, so they can run
//! before any request resolves.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Profile,
}

impl Route {
    /// Resolve a path. The empty path and unknown paths go to login.
    pub fn from_path(path: &str) -> Self {
        match path.trim().trim_matches('/') {
            "register" => Route::Register,
            "profile" => Route::Profile,
            _ => Route::Login,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Profile => "/profile",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Profile => "Profile",
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Profile)
    }

    pub fn guest_only(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Decide whether `route` may be entered
pub fn check(route: Route, logged_in: bool) -> GuardDecision {
    if route.requires_auth() && !logged_in {
        GuardDecision::Redirect(Route::Login)
    } else if route.guest_only() && logged_in {
        GuardDecision::Redirect(Route::Profile)
    } else {
        GuardDecision::Allow
    }
}

/// The route navigation actually lands on
pub fn resolve(route: Route, logged_in: bool) -> Route {
    match check(route, logged_in) {
        GuardDecision::Allow => route,
        GuardDecision::Redirect(target) => target,
    }
}
