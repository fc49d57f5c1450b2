//! OAuth implicit-grant login with Google and Microsoft.
//!
//! The client builds the provider's authorization URL with
//! `response_type=token` and `state=<provider>`. The provider redirects
//! back with a fragment carrying either `error` or `access_token` plus the
//! same `state`; the access token is exchanged with the backend for a
//! session token.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::config::OAuthSettings;
use crate::session::SessionStore;

const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const MICROSOFT_AUTHORIZATION_ENDPOINT: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";

/// OAuth flow errors.
#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("No client id configured for {0}")]
    MissingClientId(OAuthProvider),

    #[error("Invalid authorization endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Microsoft,
}

impl OAuthProvider {
    /// Value of the `state` parameter and of the callback route segment.
    pub fn as_str(self) -> &'static str {
        match self {
            OAuthProvider::Google => "google",
            OAuthProvider::Microsoft => "microsoft",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OAuthProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(OAuthProvider::Google),
            "microsoft" => Ok(OAuthProvider::Microsoft),
            other => Err(format!("unknown OAuth provider: {other}")),
        }
    }
}

/// Per-provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub authorization_endpoint: String,
}

#[derive(Debug)]
pub struct OAuthClient {
    google: ProviderConfig,
    microsoft: ProviderConfig,
    session: Arc<SessionStore>,
}

impl OAuthClient {
    pub fn new(settings: &OAuthSettings, session: Arc<SessionStore>) -> Self {
        Self {
            google: ProviderConfig {
                client_id: settings.google_client_id.clone(),
                redirect_uri: settings.redirect_uri.clone(),
                scope: "email profile".into(),
                authorization_endpoint: GOOGLE_AUTHORIZATION_ENDPOINT.into(),
            },
            microsoft: ProviderConfig {
                client_id: settings.microsoft_client_id.clone(),
                redirect_uri: settings.redirect_uri.clone(),
                scope: "openid profile email".into(),
                authorization_endpoint: MICROSOFT_AUTHORIZATION_ENDPOINT.into(),
            },
            session,
        }
    }

    pub fn provider_config(&self, provider: OAuthProvider) -> &ProviderConfig {
        match provider {
            OAuthProvider::Google => &self.google,
            OAuthProvider::Microsoft => &self.microsoft,
        }
    }

    /// URL the user agent is sent to in order to start the flow.
    pub fn authorization_url(&self, provider: OAuthProvider) -> Result<url::Url, OAuthError> {
        let config = self.provider_config(provider);
        let client_id = config
            .client_id
            .as_deref()
            .ok_or(OAuthError::MissingClientId(provider))?;

        let mut url = url::Url::parse(&config.authorization_endpoint)?;
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", &config.redirect_uri)
            .append_pair("scope", &config.scope)
            .append_pair("response_type", "token")
            .append_pair("state", provider.as_str());
        Ok(url)
    }

    /// Complete the flow from the redirect fragment. Returns whether a
    /// session was established.
    pub async fn handle_callback(&self, fragment: &str) -> bool {
        let params = CallbackParams::parse(fragment);

        if let Some(err) = params.error {
            error!(error = %err, "OAuth error");
            return false;
        }
        let Some(access_token) = params.access_token else {
            error!("no access token received");
            return false;
        };

        match params.state.as_deref().map(str::parse::<OAuthProvider>) {
            Some(Ok(OAuthProvider::Google)) => self.session.google_login(&access_token).await,
            Some(Ok(OAuthProvider::Microsoft)) => {
                self.session.microsoft_login(&access_token).await
            }
            _ => {
                error!(state = ?params.state, "unknown OAuth provider");
                false
            }
        }
    }
}

/// Parameters of the provider redirect.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub access_token: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse a URL fragment (with or without the leading `#`).
    pub fn parse(fragment: &str) -> Self {
        let mut params = CallbackParams::default();
        let raw = fragment.strip_prefix('#').unwrap_or(fragment);
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "access_token" => &mut params.access_token,
                "state" => &mut params.state,
                "error" => &mut params.error,
                _ => continue,
            };
            if !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}
