//! JWT claim decoding.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};

use super::AuthError;
use crate::models::auth::TokenClaims;

/// Decode the claims of a JWT without checking its signature.
///
/// The header must still be well-formed and name a known algorithm.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let header = decode_header(token).map_err(|e| AuthError::MalformedToken(e.to_string()))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::MalformedToken(e.to_string()))
}

/// Decode a token and accept it only if `exp` lies strictly in the future.
pub fn decode_unexpired(token: &str) -> Result<TokenClaims, AuthError> {
    decode_unexpired_at(token, Utc::now().timestamp())
}

/// Same as [`decode_unexpired`] with an explicit clock (unix seconds).
pub fn decode_unexpired_at(token: &str, now: i64) -> Result<TokenClaims, AuthError> {
    let claims = decode_claims(token)?;
    match claims.exp {
        None => Err(AuthError::MissingExpiry),
        Some(exp) if exp <= now => Err(AuthError::Expired(exp)),
        Some(_) => Ok(claims),
    }
}
