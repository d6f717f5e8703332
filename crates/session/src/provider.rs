//! Identity provider contract

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Authenticated user as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

impl User {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            email_verified: false,
        }
    }
}

/// Provider-issued passwordless session handle
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Passwordless (magic link) operations offered by the identity provider
///
/// Implementations wrap the provider's HTTP client; failures are reported as
/// [`AuthError::Provider`](crate::AuthError::Provider).
pub trait PasswordlessProvider {
    /// Start a magic-link session for `email`
    fn create_session(&self, email: &str) -> Result<SessionId>;

    /// Email the link for a session created by [`create_session`](Self::create_session)
    fn send_session(&self, session: &SessionId) -> Result<()>;

    /// Exchange a one-time code for the user it was issued to
    ///
    /// `Ok(None)` means the provider accepted the code but returned no user.
    fn authenticate_session(&self, code: &str) -> Result<Option<User>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_user_wire_format() {
        let user = User {
            first_name: Some("Ada".to_string()),
            email_verified: true,
            ..User::new("user_01", "ada@example.com")
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["emailVerified"], true);
        assert!(json.get("lastName").is_none());
    }

    #[test]
    fn test_user_tolerates_missing_optional_fields() {
        let user: User =
            serde_json::from_str(r#"{ "id": "user_02", "email": "bo@example.com" }"#).unwrap();
        assert_eq!(user, User::new("user_02", "bo@example.com"));
    }
}
