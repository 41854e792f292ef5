//! # API Types
//!
//! Types for API requests and responses.

use serde::{Deserialize, Deserializer, Serialize};

/// Login form sent to `auth/token`.
#[derive(Clone, Serialize)]
pub struct LoginForm {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `auth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// Numeric user id.
    #[serde(deserialize_with = "user_id")]
    pub user_id: u64,
    /// Opaque access token, also used as the `access_token` cookie.
    pub access_token: String,
}

/// Response of `whoami`.
#[derive(Debug, Clone, Deserialize)]
pub struct WhoAmI {
    /// Numeric user id.
    #[serde(rename = "userId", deserialize_with = "user_id")]
    pub user_id: u64,
}

/// Accepts a user id sent either as a JSON number or a numeric string.
fn user_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_numeric_id() {
        let resp: TokenResponse =
            serde_json::from_str(r#"{"user_id": 42, "access_token": "abc"}"#).unwrap();
        assert_eq!(resp.user_id, 42);
        assert_eq!(resp.access_token, "abc");
    }

    #[test]
    fn test_token_response_string_id() {
        let resp: TokenResponse =
            serde_json::from_str(r#"{"user_id": "1337", "access_token": "t"}"#).unwrap();
        assert_eq!(resp.user_id, 1337);
    }

    #[test]
    fn test_whoami_uses_camel_case() {
        let who: WhoAmI = serde_json::from_str(r#"{"userId": "42"}"#).unwrap();
        assert_eq!(who.user_id, 42);
    }

    #[test]
    fn test_whoami_rejects_non_numeric_id() {
        assert!(serde_json::from_str::<WhoAmI>(r#"{"userId": "anon"}"#).is_err());
    }

    #[test]
    fn test_login_form_debug_hides_password() {
        let form = LoginForm {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        let debug = format!("{form:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
