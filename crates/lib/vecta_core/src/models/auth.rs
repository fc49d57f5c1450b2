//! Authentication domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated identity held by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response of the token-issuing endpoints (`auth/token`, `auth/google`,
/// `auth/microsoft`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Some deployments embed the user next to the token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Response of `POST users` and `GET users/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub user_id: String,
    #[serde(deserialize_with = "super::datetime::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Credentials for `POST users`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body for the social login exchange endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct OAuthTokenRequest<'a> {
    pub token: &'a str,
}

/// JWT claims the client reads from an access token.
///
/// The backend always sets `sub`; the remaining claims are optional and
/// only used to enrich the identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: user ID.
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Expiry (unix timestamp).
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Identity reconstructed from the claims alone.
    pub fn to_user(&self) -> User {
        User {
            id: self.sub.clone(),
            email: self.email.clone().unwrap_or_default(),
            name: self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_token_defaults_token_type_and_user() {
        let token: AuthToken = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
        assert!(token.user.is_none());
    }

    #[test]
    fn claims_without_email_map_to_empty_email() {
        let claims = TokenClaims {
            sub: "u1".into(),
            email: None,
            name: Some("Ada".into()),
            exp: Some(0),
        };
        let user = claims.to_user();
        assert_eq!(user.id, "u1");
        assert_eq!(user.email, "");
        assert_eq!(user.name.as_deref(), Some("Ada"));
    }
}
