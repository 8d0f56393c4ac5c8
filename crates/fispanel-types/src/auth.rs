//! Operator authentication

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Body of `POST /api/auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Operator profile returned at login
///
/// Only `username` is read; every other field is kept so the profile can be
/// stored and restored unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub username: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Response of `POST /api/auth/login`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default, deserialize_with = "lenient::null_default")]
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let raw = r#"{"username":"admin","role":"owner","id":1}"#;
        let profile: UserProfile = serde_json::from_str(raw).unwrap();
        assert_eq!(profile.username, "admin");
        assert_eq!(profile.extra["role"], "owner");

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back, serde_json::from_str::<serde_json::Value>(raw).unwrap());
    }

    #[test]
    fn test_failed_login() {
        let resp: LoginResponse =
            serde_json::from_str(r#"{"success":false,"error":"Invalid credentials"}"#).unwrap();
        assert!(!resp.success);
        assert!(resp.token.is_none());
        assert_eq!(resp.error.as_deref(), Some("Invalid credentials"));
    }
}
