//! Basic-Auth credential check guarding the mock upstream

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

use crate::config::MockApiConfig;

/// Why a request to the mock upstream was refused. The display text is the
/// message returned to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Basic Authentication required")]
    NotBasic,

    #[error("Invalid Authorization header format")]
    InvalidEncoding,

    #[error("Username and password required in Basic Auth")]
    MissingCredentials,

    #[error("Invalid username or password")]
    InvalidCredentials { username: String },
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidEncoding | AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
            AuthError::MissingHeader | AuthError::NotBasic | AuthError::InvalidCredentials { .. } => {
                StatusCode::UNAUTHORIZED
            }
        }
    }

    /// The `error` field of the response envelope
    pub fn label(&self) -> &'static str {
        if self.status() == StatusCode::BAD_REQUEST {
            "Bad Request"
        } else {
            "Unauthorized"
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::NotBasic => "not_basic",
            AuthError::InvalidEncoding => "invalid_encoding",
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidCredentials { .. } => "invalid_credentials",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Decodes an `Authorization: Basic ...` header value
pub fn parse_basic_auth(header: Option<&str>) -> Result<Credentials, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let encoded = header.strip_prefix("Basic ").ok_or(AuthError::NotBasic)?;

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::InvalidEncoding)?;

    match decoded.split_once(':') {
        Some((username, password)) if !username.is_empty() && !password.is_empty() => Ok(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        }),
        _ => Err(AuthError::MissingCredentials),
    }
}

/// Checks the header against the configured credentials, returning the
/// authenticated username
pub fn check_basic_auth(header: Option<&str>, expected: &MockApiConfig) -> Result<String, AuthError> {
    let credentials = parse_basic_auth(header)?;
    if credentials.username != expected.username || credentials.password != expected.password {
        return Err(AuthError::InvalidCredentials {
            username: credentials.username,
        });
    }
    Ok(credentials.username)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic(raw: &str) -> String {
        format!("Basic {}", STANDARD.encode(raw))
    }

    #[test]
    fn test_valid_credentials() {
        let header = basic("admin@example.com:admin123");
        let user = check_basic_auth(Some(&header), &MockApiConfig::default()).unwrap();
        assert_eq!(user, "admin@example.com");
    }

    #[test]
    fn test_missing_header() {
        let err = check_basic_auth(None, &MockApiConfig::default()).unwrap_err();
        assert_eq!(err, AuthError::MissingHeader);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Authorization header required");
    }

    #[test]
    fn test_bearer_is_not_basic() {
        let err = parse_basic_auth(Some("Bearer invalid-token")).unwrap_err();
        assert_eq!(err, AuthError::NotBasic);
        assert_eq!(err.to_string(), "Basic Authentication required");
    }

    #[test]
    fn test_bad_base64_is_bad_request() {
        let err = parse_basic_auth(Some("Basic %%%not-base64%%%")).unwrap_err();
        assert_eq!(err, AuthError::InvalidEncoding);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.label(), "Bad Request");
    }

    #[test]
    fn test_missing_password_is_bad_request() {
        for raw in ["admin@example.com", "admin@example.com:", ":admin123"] {
            let err = parse_basic_auth(Some(&basic(raw))).unwrap_err();
            assert_eq!(err, AuthError::MissingCredentials, "input {raw:?}");
        }
    }

    #[test]
    fn test_password_may_contain_colons() {
        let creds = parse_basic_auth(Some(&basic("user:pa:ss"))).unwrap();
        assert_eq!(creds.password, "pa:ss");
    }

    #[test]
    fn test_wrong_credentials() {
        let header = basic("wrong@email.com:wrongpassword");
        let err = check_basic_auth(Some(&header), &MockApiConfig::default()).unwrap_err();
        assert_eq!(
            err,
            AuthError::InvalidCredentials {
                username: "wrong@email.com".to_string()
            }
        );
        assert_eq!(err.label(), "Unauthorized");
        assert_eq!(err.to_string(), "Invalid username or password");
    }
}
