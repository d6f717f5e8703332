//! Magic-link callback and error page reasons

use crate::cookie::session_cookie;
use crate::{CookiePolicy, PasswordlessProvider};

/// Where a signed-in user lands
const DASHBOARD: &str = "/dashboard";

/// Reason code carried to the error page as `?message=<code>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorReason {
    AuthenticationFailed,
    NoCodeProvided,
    NoUserData,
    Unknown,
}

impl AuthErrorReason {
    pub fn code(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "Authentication_failed",
            Self::NoCodeProvided => "No_code_provided",
            Self::NoUserData => "No_user_data",
            Self::Unknown => "Unknown",
        }
    }

    /// Parse a query-string code; anything unrecognized is `Unknown`
    pub fn from_code(code: &str) -> Self {
        match code {
            "Authentication_failed" => Self::AuthenticationFailed,
            "No_code_provided" => Self::NoCodeProvided,
            "No_user_data" => Self::NoUserData,
            _ => Self::Unknown,
        }
    }

    /// Text shown on the error page
    pub fn message(self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "Authentication failed. Please try signing in again.",
            Self::NoCodeProvided => "No authentication code was provided.",
            Self::NoUserData | Self::Unknown => "An unknown error occurred.",
        }
    }

    /// Redirect target for this reason
    pub fn error_location(self) -> String {
        format!("/error?message={}", self.code())
    }
}

/// Redirect answered to the callback request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub location: String,
    /// `Set-Cookie` value, present only on success
    pub set_cookie: Option<String>,
}

impl CallbackOutcome {
    fn error(reason: AuthErrorReason) -> Self {
        Self {
            location: reason.error_location(),
            set_cookie: None,
        }
    }
}

/// Exchange the one-time `code` for a session cookie
pub fn handle_callback<P: PasswordlessProvider + ?Sized>(
    provider: &P,
    code: Option<&str>,
    policy: &CookiePolicy,
) -> CallbackOutcome {
    let Some(code) = code.filter(|code| !code.is_empty()) else {
        log::warn!("Callback without a code");
        return CallbackOutcome::error(AuthErrorReason::NoCodeProvided);
    };

    let user = match provider.authenticate_session(code) {
        Ok(Some(user)) => user,
        Ok(None) => {
            log::error!("No user data received from identity provider");
            return CallbackOutcome::error(AuthErrorReason::NoUserData);
        }
        Err(e) => {
            log::error!("Authentication error: {}", e);
            return CallbackOutcome::error(AuthErrorReason::AuthenticationFailed);
        }
    };

    match session_cookie(&user, policy) {
        Ok(cookie) => {
            log::info!("Authenticated user {}", user.id);
            CallbackOutcome {
                location: DASHBOARD.to_string(),
                set_cookie: Some(cookie),
            }
        }
        Err(e) => {
            log::error!("Could not encode session cookie: {}", e);
            CallbackOutcome::error(AuthErrorReason::AuthenticationFailed)
        }
    }
}
