//! Headless view models, one per screen.
//!
//! A view binds form fields and lists to the services in
//! [`AppContext`](crate::AppContext). Views never return errors: failures
//! become the view's inline `error()` message and are logged.

mod auth;
mod dashboard;
mod projects;
mod urls;

pub use auth::{LoginView, OAuthCallbackView, RegisterView};
pub use dashboard::DashboardView;
pub use projects::{CreateProjectView, ProjectDetailView, ProjectListView};
pub use urls::{STATUS_FILTERS, UrlListView, UrlManagementView, filter_label, truncate_url};

use crate::state::Signal;

/// Loading flag and inline error shared by every view.
#[derive(Debug, Default)]
pub(crate) struct ViewStatus {
    loading: Signal<bool>,
    error: Signal<Option<String>>,
}

impl ViewStatus {
    /// Enter the loading state and drop the previous error.
    pub(crate) fn start(&self) {
        self.loading.set(true);
        self.error.set(None);
    }

    pub(crate) fn finish(&self) {
        self.loading.set(false);
    }

    pub(crate) fn fail(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
        self.loading.set(false);
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub(crate) fn error(&self) -> Option<String> {
        self.error.get()
    }
}
