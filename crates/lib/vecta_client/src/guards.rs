//! Routes, navigation guards and the navigator.
//!
//! Guards are evaluated synchronously from the session store at navigation
//! time; they never re-validate the session with the backend.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::session::SessionStore;
use crate::state::Signal;

/// Every screen of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    OAuthCallback(String),
    Dashboard,
    Projects,
    CreateProject,
    ProjectDetail(String),
    ProjectUrls(String),
}

impl Route {
    /// Routes that need an authenticated session.
    pub fn requires_auth(&self) -> bool {
        !self.is_auth_only()
    }

    /// Routes only reachable while signed out.
    pub fn is_auth_only(&self) -> bool {
        matches!(
            self,
            Route::Login | Route::Register | Route::OAuthCallback(_)
        )
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/auth/login".into(),
            Route::Register => "/auth/register".into(),
            Route::OAuthCallback(provider) => format!("/auth/callback/{provider}"),
            Route::Dashboard => "/dashboard".into(),
            Route::Projects => "/dashboard/projects".into(),
            Route::CreateProject => "/dashboard/projects/create".into(),
            Route::ProjectDetail(id) => format!("/dashboard/projects/{id}"),
            Route::ProjectUrls(id) => format!("/dashboard/projects/{id}/urls"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    /// Parse a path. Empty paths and bare prefixes follow the default
    /// redirects (`""` → dashboard, `/auth` → login).
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let route = match segments.as_slice() {
            [] | ["dashboard"] => Route::Dashboard,
            ["auth"] | ["auth", "login"] => Route::Login,
            ["auth", "register"] => Route::Register,
            ["auth", "callback", provider] => Route::OAuthCallback(provider.to_string()),
            ["dashboard", "projects"] => Route::Projects,
            ["dashboard", "projects", "create"] => Route::CreateProject,
            ["dashboard", "projects", id] => Route::ProjectDetail(id.to_string()),
            ["dashboard", "projects", id, "urls"] => Route::ProjectUrls(id.to_string()),
            _ => return Err(format!("unknown route: {path}")),
        };
        Ok(route)
    }
}

/// Outcome of a guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    Redirect(Route),
}

/// Guard of protected routes: signed-out users go to the login screen.
pub fn auth_guard(session: &SessionStore) -> GuardDecision {
    if session.is_authenticated() {
        GuardDecision::Proceed
    } else {
        GuardDecision::Redirect(Route::Login)
    }
}

/// Guard of auth screens: signed-in users go to the dashboard.
pub fn no_auth_guard(session: &SessionStore) -> GuardDecision {
    if session.is_authenticated() {
        GuardDecision::Redirect(Route::Dashboard)
    } else {
        GuardDecision::Proceed
    }
}

/// Guard that applies to `route`.
pub fn check(route: &Route, session: &SessionStore) -> GuardDecision {
    if route.is_auth_only() {
        no_auth_guard(session)
    } else {
        auth_guard(session)
    }
}

/// Holds the current route and applies guards to every navigation.
#[derive(Debug)]
pub struct Navigator {
    session: Arc<SessionStore>,
    current: Signal<Route>,
}

impl Navigator {
    /// Starts at the login screen until the first navigation.
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            current: Signal::new(Route::Login),
        }
    }

    /// Navigate to `target`, following at most one guard redirect.
    /// Returns the route actually reached.
    pub fn navigate(&self, target: Route) -> Route {
        let reached = match check(&target, &self.session) {
            GuardDecision::Proceed => target,
            GuardDecision::Redirect(to) => {
                debug!(from = %target, to = %to, "navigation redirected");
                to
            }
        };
        self.current.set(reached.clone());
        reached
    }

    pub fn current(&self) -> Route {
        self.current.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}
