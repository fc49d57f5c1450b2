//! Session store: the authenticated identity and its persisted token.
//!
//! The store is an owned context object: build it with [`SessionStore::init`]
//! (restores the persisted token) and tear it down with
//! [`SessionStore::logout`] (clears it). Login-style operations return a
//! plain `bool`; failures are logged and never propagate.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, warn};
use vecta_core::auth::jwt;
use vecta_core::models::auth::{OAuthTokenRequest, RegisterRequest};
use vecta_core::models::{AuthToken, RegisteredUser, User};

use crate::error::GatewayResult;
use crate::gateway::Gateway;
use crate::state::Signal;
use crate::storage::{ACCESS_TOKEN_KEY, KeyValueStore};

/// Social login providers whose tokens the backend exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SocialProvider {
    Google,
    Microsoft,
}

impl SocialProvider {
    fn path(self) -> &'static str {
        match self {
            SocialProvider::Google => "auth/google",
            SocialProvider::Microsoft => "auth/microsoft",
        }
    }
}

/// Owner of the current identity.
#[derive(Debug)]
pub struct SessionStore {
    gateway: Arc<Gateway>,
    store: Arc<dyn KeyValueStore>,
    user: Signal<Option<User>>,
    authenticated: Signal<bool>,
}

impl SessionStore {
    /// Create an empty, unauthenticated store without reading storage.
    pub fn new(gateway: Arc<Gateway>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            gateway,
            store,
            user: Signal::new(None),
            authenticated: Signal::new(false),
        }
    }

    /// Create the store and restore the session from the persisted token.
    pub fn init(gateway: Arc<Gateway>, store: Arc<dyn KeyValueStore>) -> Self {
        let session = Self::new(gateway, store);
        session.check_auth_status();
        session
    }

    pub async fn login(&self, email: &str, password: &str) -> bool {
        match self.request_token(email, password).await {
            Ok(token) => self.handle_auth_success(token, Some(email)),
            Err(e) => {
                error!(error = %e, "login error");
                false
            }
        }
    }

    /// Create the account, then log in with the same credentials.
    pub async fn register(&self, email: &str, password: &str) -> bool {
        let created: GatewayResult<RegisteredUser> = self
            .gateway
            .post("users", &RegisterRequest { email, password })
            .await;
        match created {
            Ok(user) => info!(user_id = %user.user_id, "account created"),
            Err(e) => {
                error!(error = %e, "registration error");
                return false;
            }
        }
        self.login(email, password).await
    }

    pub async fn google_login(&self, token: &str) -> bool {
        self.social_login(SocialProvider::Google, token).await
    }

    pub async fn microsoft_login(&self, token: &str) -> bool {
        self.social_login(SocialProvider::Microsoft, token).await
    }

    /// Clear the persisted token and the identity. Never fails.
    pub fn logout(&self) {
        if let Err(e) = self.store.remove(ACCESS_TOKEN_KEY) {
            warn!(error = %e, "failed to remove persisted token");
        }
        self.user.set(None);
        self.authenticated.set(false);
    }

    /// Restore the session from storage, judged against the local clock.
    ///
    /// An absent, malformed or expired token clears everything, exactly as
    /// [`logout`](Self::logout) does. No backend call is made.
    pub fn check_auth_status(&self) {
        let Some(token) = self.store.get(ACCESS_TOKEN_KEY) else {
            self.logout();
            return;
        };
        match jwt::decode_unexpired(&token) {
            Ok(claims) => {
                self.user.set(Some(claims.to_user()));
                self.authenticated.set(true);
            }
            Err(e) => {
                info!(reason = %e, "discarding persisted token");
                self.logout();
            }
        }
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn user(&self) -> Option<User> {
        self.user.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.get()
    }

    pub fn subscribe_authenticated(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    /// Fetch `users/me` with the current token.
    pub async fn current_user(&self) -> GatewayResult<RegisteredUser> {
        self.gateway.get("users/me", &[]).await
    }

    async fn request_token(&self, email: &str, password: &str) -> GatewayResult<AuthToken> {
        self.gateway
            .post_form("auth/token", &[("username", email), ("password", password)])
            .await
    }

    async fn social_login(&self, provider: SocialProvider, token: &str) -> bool {
        let exchanged: GatewayResult<AuthToken> = self
            .gateway
            .post(provider.path(), &OAuthTokenRequest { token })
            .await;
        match exchanged {
            Ok(auth) => self.handle_auth_success(auth, None),
            Err(e) => {
                error!(provider = ?provider, error = %e, "social login error");
                false
            }
        }
    }

    /// Persist the token and publish the identity. Leaves prior state
    /// untouched if no identity can be derived or the token cannot be stored.
    fn handle_auth_success(&self, auth: AuthToken, submitted_email: Option<&str>) -> bool {
        let user = match auth.user {
            Some(user) => user,
            None => match jwt::decode_claims(&auth.access_token) {
                Ok(claims) => {
                    let mut user = claims.to_user();
                    if user.email.is_empty()
                        && let Some(email) = submitted_email
                    {
                        user.email = email.to_string();
                    }
                    user
                }
                Err(e) => {
                    error!(error = %e, "backend issued an undecodable token");
                    return false;
                }
            },
        };

        if let Err(e) = self.store.set(ACCESS_TOKEN_KEY, &auth.access_token) {
            error!(error = %e, "failed to persist token");
            return false;
        }
        info!(user_id = %user.id, "session established");
        self.user.set(Some(user));
        self.authenticated.set(true);
        true
    }
}
