use std::sync::Arc;

use crate::AppContext;
use crate::guards::{Navigator, Route};
use crate::session::SessionStore;

/// Signed-in landing screen and the shared header actions.
#[derive(Debug)]
pub struct DashboardView {
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
}

impl DashboardView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            session: Arc::clone(&ctx.session),
            navigator: Arc::clone(&ctx.navigator),
        }
    }

    pub fn user_email(&self) -> Option<String> {
        self.session.user().map(|user| user.email)
    }

    pub fn open_projects(&self) -> Route {
        self.navigator.navigate(Route::Projects)
    }

    /// Sign out and return to the login screen.
    pub fn logout(&self) -> Route {
        self.session.logout();
        self.navigator.navigate(Route::Login)
    }
}
