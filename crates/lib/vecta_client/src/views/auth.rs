//! Sign-in screens: login, registration and the OAuth redirect target.

use std::sync::Arc;

use tracing::{debug, error};
use vecta_core::validation::{self, Field, ValidationError};

use super::ViewStatus;
use crate::AppContext;
use crate::guards::{Navigator, Route};
use crate::oauth::{OAuthClient, OAuthProvider};
use crate::session::SessionStore;
use crate::state::Signal;

pub const LOGIN_FAILED_MESSAGE: &str = "Invalid email or password";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const NO_AUTH_CODE_MESSAGE: &str = "No authentication code received";
pub const UNKNOWN_PROVIDER_MESSAGE: &str = "Unknown authentication provider";

/// Inline error of `field`, shown once the field was touched.
fn touched_error(
    field: &Signal<Field>,
    check: impl FnOnce(&str) -> Result<(), ValidationError>,
) -> Option<ValidationError> {
    field.with(|f| {
        if f.is_touched() {
            check(f.value()).err()
        } else {
            None
        }
    })
}

/// Start an OAuth flow from a sign-in screen.
fn provider_url(
    oauth: &OAuthClient,
    status: &ViewStatus,
    provider: OAuthProvider,
) -> Option<url::Url> {
    match oauth.authorization_url(provider) {
        Ok(url) => Some(url),
        Err(e) => {
            error!(%provider, error = %e, "cannot start OAuth flow");
            status.fail(e.to_string());
            None
        }
    }
}

/// Email and password login.
#[derive(Debug)]
pub struct LoginView {
    session: Arc<SessionStore>,
    oauth: Arc<OAuthClient>,
    navigator: Arc<Navigator>,
    email: Signal<Field>,
    password: Signal<Field>,
    status: ViewStatus,
}

impl LoginView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            session: Arc::clone(&ctx.session),
            oauth: Arc::clone(&ctx.oauth),
            navigator: Arc::clone(&ctx.navigator),
            email: Signal::default(),
            password: Signal::default(),
            status: ViewStatus::default(),
        }
    }

    pub fn set_email(&self, value: &str) {
        self.email.update(|f| f.set(value));
    }

    pub fn set_password(&self, value: &str) {
        self.password.update(|f| f.set(value));
    }

    pub fn email_error(&self) -> Option<ValidationError> {
        touched_error(&self.email, validation::validate_email)
    }

    pub fn password_error(&self) -> Option<ValidationError> {
        touched_error(&self.password, validation::validate_password)
    }

    pub fn is_valid(&self) -> bool {
        self.email.with(|f| validation::validate_email(f.value()).is_ok())
            && self
                .password
                .with(|f| validation::validate_password(f.value()).is_ok())
    }

    /// Log in. An invalid form marks every field touched and stays offline.
    pub async fn submit(&self) -> bool {
        if !self.is_valid() {
            self.email.update(Field::touch);
            self.password.update(Field::touch);
            debug!("login form invalid, not submitting");
            return false;
        }

        self.status.start();
        let email = self.email.with(|f| f.value().trim().to_string());
        let password = self.password.with(|f| f.value().to_string());
        if self.session.login(&email, &password).await {
            self.status.finish();
            self.navigator.navigate(Route::Dashboard);
            true
        } else {
            self.status.fail(LOGIN_FAILED_MESSAGE);
            false
        }
    }

    /// Authorization URL to send the user agent to.
    pub fn social_login_url(&self, provider: OAuthProvider) -> Option<url::Url> {
        provider_url(&self.oauth, &self.status, provider)
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }
}

/// Account creation with password confirmation.
#[derive(Debug)]
pub struct RegisterView {
    session: Arc<SessionStore>,
    oauth: Arc<OAuthClient>,
    navigator: Arc<Navigator>,
    email: Signal<Field>,
    password: Signal<Field>,
    confirm_password: Signal<Field>,
    status: ViewStatus,
}

impl RegisterView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            session: Arc::clone(&ctx.session),
            oauth: Arc::clone(&ctx.oauth),
            navigator: Arc::clone(&ctx.navigator),
            email: Signal::default(),
            password: Signal::default(),
            confirm_password: Signal::default(),
            status: ViewStatus::default(),
        }
    }

    pub fn set_email(&self, value: &str) {
        self.email.update(|f| f.set(value));
    }

    pub fn set_password(&self, value: &str) {
        self.password.update(|f| f.set(value));
    }

    pub fn set_confirm_password(&self, value: &str) {
        self.confirm_password.update(|f| f.set(value));
    }

    pub fn email_error(&self) -> Option<ValidationError> {
        touched_error(&self.email, validation::validate_email)
    }

    pub fn password_error(&self) -> Option<ValidationError> {
        touched_error(&self.password, validation::validate_password)
    }

    pub fn confirm_password_error(&self) -> Option<ValidationError> {
        touched_error(&self.confirm_password, validation::validate_confirmation)
    }

    /// Whether the two password fields agree.
    pub fn passwords_match(&self) -> bool {
        let password = self.password.get();
        let confirmation = self.confirm_password.get();
        validation::passwords_match(password.value(), confirmation.value()).is_ok()
    }

    /// Cross-field mismatch, shown once either password field was touched.
    pub fn mismatch_error(&self) -> Option<ValidationError> {
        let touched =
            self.password.with(Field::is_touched) || self.confirm_password.with(Field::is_touched);
        if touched && !self.passwords_match() {
            Some(ValidationError::PasswordMismatch)
        } else {
            None
        }
    }

    pub fn is_valid(&self) -> bool {
        self.email.with(|f| validation::validate_email(f.value()).is_ok())
            && self
                .password
                .with(|f| validation::validate_password(f.value()).is_ok())
            && self
                .confirm_password
                .with(|f| validation::validate_confirmation(f.value()).is_ok())
            && self.passwords_match()
    }

    /// Register and sign in. An invalid form never reaches the backend.
    pub async fn submit(&self) -> bool {
        if !self.is_valid() {
            self.email.update(Field::touch);
            self.password.update(Field::touch);
            self.confirm_password.update(Field::touch);
            debug!("registration form invalid, not submitting");
            return false;
        }

        self.status.start();
        let email = self.email.with(|f| f.value().trim().to_string());
        let password = self.password.with(|f| f.value().to_string());
        if self.session.register(&email, &password).await {
            self.status.finish();
            self.navigator.navigate(Route::Dashboard);
            true
        } else {
            self.status.fail(REGISTRATION_FAILED_MESSAGE);
            false
        }
    }

    pub fn social_login_url(&self, provider: OAuthProvider) -> Option<url::Url> {
        provider_url(&self.oauth, &self.status, provider)
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }
}

/// Landing screen of `/auth/callback/{provider}`.
#[derive(Debug)]
pub struct OAuthCallbackView {
    oauth: Arc<OAuthClient>,
    navigator: Arc<Navigator>,
    status: ViewStatus,
}

impl OAuthCallbackView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            oauth: Arc::clone(&ctx.oauth),
            navigator: Arc::clone(&ctx.navigator),
            status: ViewStatus::default(),
        }
    }

    /// Process the redirect parameters. On success the navigator moves to
    /// the dashboard.
    pub async fn handle(
        &self,
        provider: Option<&str>,
        code: Option<&str>,
        error: Option<&str>,
    ) -> bool {
        if let Some(err) = error {
            self.status.fail(format!("Authentication error: {err}"));
            return false;
        }
        let Some(code) = code.filter(|c| !c.is_empty()) else {
            self.status.fail(NO_AUTH_CODE_MESSAGE);
            return false;
        };
        let Some(provider) = provider.filter(|p| !p.is_empty()) else {
            self.status.fail(UNKNOWN_PROVIDER_MESSAGE);
            return false;
        };

        self.status.start();
        let fragment: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("access_token", code)
            .append_pair("state", provider)
            .finish();
        if self.oauth.handle_callback(&fragment).await {
            self.status.finish();
            self.navigator.navigate(Route::Dashboard);
            true
        } else {
            self.status
                .fail(format!("Error processing {provider} login. Please try again."));
            false
        }
    }

    pub fn back_to_login(&self) -> Route {
        self.navigator.navigate(Route::Login)
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.status.error()
    }
}
