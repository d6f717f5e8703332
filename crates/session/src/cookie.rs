//! The `user` session cookie

use crate::{Result, User};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Session cookie name
pub const COOKIE_NAME: &str = "user";

/// Session lifetime in seconds (7 days)
pub const COOKIE_MAX_AGE: u64 = 7 * 24 * 60 * 60;

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Read `DOCSIGN_ENV`; only `production` selects production
    pub fn from_env() -> Self {
        match std::env::var("DOCSIGN_ENV") {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::Development,
        }
    }

    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }
}

/// Attributes applied to the session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    pub secure: bool,
    pub max_age: u64,
}

impl CookiePolicy {
    /// `Secure` in production only
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            secure: environment == Environment::Production,
            max_age: COOKIE_MAX_AGE,
        }
    }
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

/// Encode a user as a cookie-safe value
pub fn encode_user(user: &User) -> Result<String> {
    let json = serde_json::to_vec(user)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

/// Decode a value produced by [`encode_user`]
pub fn decode_user(value: &str) -> Result<User> {
    let json = URL_SAFE_NO_PAD.decode(value.trim())?;
    Ok(serde_json::from_slice(&json)?)
}

/// Build the `Set-Cookie` header value for a signed-in user
pub fn session_cookie(user: &User, policy: &CookiePolicy) -> Result<String> {
    let value = encode_user(user)?;
    let secure = if policy.secure { " Secure;" } else { "" };
    Ok(format!(
        "{}={}; Path=/; HttpOnly;{} SameSite=Lax; Max-Age={}",
        COOKIE_NAME, value, secure, policy.max_age
    ))
}

/// Extract the signed-in user from a `Cookie` request header
///
/// A missing or undecodable cookie means no session.
pub fn session_from_cookie_header(header: &str) -> Option<User> {
    let value = header.split(';').find_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        (name.trim() == COOKIE_NAME).then_some(value)
    })?;

    match decode_user(value) {
        Ok(user) => Some(user),
        Err(e) => {
            log::debug!("Ignoring unreadable session cookie: {}", e);
            None
        }
    }
}
