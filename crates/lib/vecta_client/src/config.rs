//! Client configuration.

use std::path::PathBuf;

use crate::storage::default_store_path;

/// Backend base URL used when `VECTA_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

/// Redirect target registered with the OAuth providers.
pub const DEFAULT_OAUTH_REDIRECT_URI: &str = "http://localhost:4200/auth/oauth-callback";

/// OAuth client settings. Client ids are provisioned outside this crate.
#[derive(Clone, Debug, Default)]
pub struct OAuthSettings {
    pub redirect_uri: String,
    pub google_client_id: Option<String>,
    pub microsoft_client_id: Option<String>,
}

/// Configuration for the client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL every resource path is appended to.
    pub api_url: String,
    /// File backing the persistent key-value store.
    pub store_path: PathBuf,
    pub oauth: OAuthSettings,
}

impl ClientConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                   | Default                                     |
    /// |----------------------------|---------------------------------------------|
    /// | `VECTA_API_URL`            | `http://localhost:8000/api/v1`              |
    /// | `VECTA_STORE_PATH`         | `<data dir>/vecta/store.json`               |
    /// | `VECTA_OAUTH_REDIRECT_URI` | `http://localhost:4200/auth/oauth-callback` |
    /// | `GOOGLE_CLIENT_ID`         | unset                                       |
    /// | `MICROSOFT_CLIENT_ID`      | unset                                       |
    pub fn from_env() -> Self {
        Self {
            api_url: non_empty_var("VECTA_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            store_path: non_empty_var("VECTA_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_store_path),
            oauth: OAuthSettings {
                redirect_uri: non_empty_var("VECTA_OAUTH_REDIRECT_URI")
                    .unwrap_or_else(|| DEFAULT_OAUTH_REDIRECT_URI.into()),
                google_client_id: non_empty_var("GOOGLE_CLIENT_ID"),
                microsoft_client_id: non_empty_var("MICROSOFT_CLIENT_ID"),
            },
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            store_path: default_store_path(),
            oauth: OAuthSettings {
                redirect_uri: DEFAULT_OAUTH_REDIRECT_URI.into(),
                ..OAuthSettings::default()
            },
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
