//! Form input validation.
//!
//! Validation runs before any network call; a value that fails here is
//! never sent to the backend.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

/// Minimum password length accepted by the login and registration forms.
pub const MIN_PASSWORD_LEN: usize = 6;

// WHATWG "valid e-mail address" production.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex is valid")
});

static HTTP_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+").expect("url regex is valid"));

/// A single field-level validation failure. `Display` is the inline message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("Please enter a valid URL starting with http:// or https://")]
    InvalidUrl,

    #[error("Please confirm your password")]
    ConfirmationRequired,

    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// A form input with its interaction state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    value: String,
    touched: bool,
}

impl Field {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            touched: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Replace the value as a user edit would; marks the field touched.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.touched = true;
    }

    pub fn touch(&mut self) {
        self.touched = true;
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Back to pristine and empty.
    pub fn reset(&mut self) {
        self.value.clear();
        self.touched = false;
    }
}

fn required(value: &str, label: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required(label))
    } else {
        Ok(())
    }
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    required(value, "Email")?;
    if EMAIL_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "Password",
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

pub fn validate_confirmation(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::ConfirmationRequired)
    } else {
        Ok(())
    }
}

/// Cross-field check of the registration form.
pub fn passwords_match(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

/// Single URL field: non-empty and `^https?://.+`.
pub fn validate_http_url(value: &str) -> Result<(), ValidationError> {
    required(value, "URL")?;
    if HTTP_URL_RE.is_match(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::InvalidUrl)
    }
}

/// Returns the trimmed project name.
pub fn validate_project_name(value: &str) -> Result<String, ValidationError> {
    required(value, "Project name")?;
    Ok(value.trim().to_string())
}

/// Split a multi-line batch input into trimmed, non-empty URLs.
pub fn parse_url_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_emails_are_rejected() {
        for bad in ["plainaddress", "@no-local.io", "a b@c.io", "trailing@", "two@@at.io"] {
            assert_eq!(validate_email(bad), Err(ValidationError::InvalidEmail), "{bad}");
        }
        assert_eq!(validate_email("  "), Err(ValidationError::Required("Email")));
        assert!(validate_email("ada@example.com").is_ok());
    }

    #[test]
    fn password_length_boundary() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
        assert_eq!(
            validate_password("").unwrap_err().to_string(),
            "Password is required"
        );
        assert_eq!(
            validate_password("abc").unwrap_err().to_string(),
            "Password must be at least 6 characters"
        );
    }

    #[test]
    fn mismatch_message() {
        assert_eq!(
            passwords_match("secret1", "secret2").unwrap_err().to_string(),
            "Passwords do not match"
        );
        assert!(passwords_match("same", "same").is_ok());
    }

    #[test]
    fn http_url_pattern() {
        assert!(validate_http_url("http://example.com").is_ok());
        assert!(validate_http_url("https://example.com/a?b").is_ok());
        assert_eq!(validate_http_url("ftp://x"), Err(ValidationError::InvalidUrl));
        assert_eq!(validate_http_url("http://"), Err(ValidationError::InvalidUrl));
        assert_eq!(validate_http_url(""), Err(ValidationError::Required("URL")));
    }

    #[test]
    fn url_lines_drop_blanks() {
        let urls = parse_url_lines("  http://a.io \n\n\thttp://b.io\r\n   \n");
        assert_eq!(urls, vec!["http://a.io", "http://b.io"]);
        assert!(parse_url_lines("\n \n").is_empty());
    }

    #[test]
    fn field_tracks_touch_state() {
        let mut field = Field::default();
        assert!(!field.is_touched());
        field.set("x");
        assert!(field.is_touched());
        field.reset();
        assert_eq!(field, Field::default());
    }
}
