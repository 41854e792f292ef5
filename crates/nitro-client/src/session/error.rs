//! # Session Errors

use thiserror::Error;

use crate::api::ApiError;

/// Errors from an explicit login.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The service refused the username/password pair.
    #[error("bad credentials")]
    BadCredentials,

    /// Anything else that went wrong while logging in.
    #[error("login failed: {0}")]
    Unknown(#[source] ApiError),

    /// A user is already signed in; log out first.
    #[error("already authenticated")]
    AlreadyAuthenticated,

    /// Another login request is still outstanding.
    #[error("login already in progress")]
    InProgress,
}

impl AuthError {
    /// Localization key of the user-facing message.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::BadCredentials => "login-badpass",
            Self::Unknown(_) => "login-unknown",
            Self::AlreadyAuthenticated => "login-already",
            Self::InProgress => "login-busy",
        }
    }
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        if err.status() == Some(401) {
            Self::BadCredentials
        } else {
            Self::Unknown(err)
        }
    }
}

/// Errors from the silent identity check.
#[derive(Error, Debug)]
pub enum IdentityCheckError {
    /// No valid credential. Expected for signed-out users.
    #[error("not signed in")]
    Unauthorized,

    /// The check failed for another reason.
    #[error("identity check failed: {0}")]
    Unknown(#[source] ApiError),
}

impl From<ApiError> for IdentityCheckError {
    fn from(err: ApiError) -> Self {
        if err.status() == Some(401) {
            Self::Unauthorized
        } else {
            Self::Unknown(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: u16) -> ApiError {
        ApiError::Status {
            status: code,
            body: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_auth_error_classification() {
        assert!(matches!(AuthError::from(status(401)), AuthError::BadCredentials));
        assert!(matches!(AuthError::from(status(403)), AuthError::Unknown(_)));
        assert!(matches!(
            AuthError::from(ApiError::InvalidResponse("x".into())),
            AuthError::Unknown(_)
        ));
    }

    #[test]
    fn test_auth_error_keys() {
        assert_eq!(AuthError::BadCredentials.message_key(), "login-badpass");
        assert_eq!(AuthError::Unknown(status(500)).message_key(), "login-unknown");
    }

    #[test]
    fn test_identity_error_classification() {
        assert!(matches!(
            IdentityCheckError::from(status(401)),
            IdentityCheckError::Unauthorized
        ));
        assert!(matches!(
            IdentityCheckError::from(status(502)),
            IdentityCheckError::Unknown(_)
        ));
    }
}
