//! # API Errors
//!
//! Error types for HTTP adapter operations.

use thiserror::Error;

/// Errors that can occur during API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Service answered with a non-2xx status.
    #[error("service error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Parsed response body; a JSON string if it was not JSON.
        body: serde_json::Value,
    },

    /// Failed to deserialize a response.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// A configured URL could not be parsed or joined.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Failed to open a file for upload.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Returns the HTTP status code, if the service answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidResponse(_) | Self::InvalidUrl(_) | Self::Io(_) => None,
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_exposes_code() {
        let err = ApiError::Status {
            status: 401,
            body: serde_json::json!({"title": "Unauthorized"}),
        };
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().starts_with("service error: 401"));
    }

    #[test]
    fn test_invalid_response_has_no_status() {
        assert_eq!(ApiError::InvalidResponse("bad".into()).status(), None);
    }
}
