//! Client-side token handling.
//!
//! The client never holds the signing key, so tokens are only decoded,
//! never verified. Expiry is judged against the local clock.

pub mod jwt;

use thiserror::Error;

/// Token handling errors.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Token has no expiry")]
    MissingExpiry,

    #[error("Token expired at {0}")]
    Expired(i64),
}
