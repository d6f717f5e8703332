//! Session - passwordless sign-in boundary
//!
//! The identity provider itself lives elsewhere; this crate holds the glue
//! around it:
//! - The [`PasswordlessProvider`] trait the provider client implements
//! - Magic-link requests and the callback that turns a code into a session
//! - The `user` session cookie and the route gate built on it
//! - Error page reasons
//!
//! # Example
//!
//! ```ignore
//! use session::{gate, handle_callback, CookiePolicy, Environment};
//!
//! let policy = CookiePolicy::for_environment(Environment::from_env());
//! let outcome = handle_callback(&provider, Some(code), &policy);
//! assert_eq!(outcome.location, "/dashboard");
//! ```

mod callback;
mod cookie;
mod gate;
mod magic_link;
mod provider;

pub use callback::{handle_callback, AuthErrorReason, CallbackOutcome};
pub use cookie::{
    decode_user, encode_user, session_cookie, session_from_cookie_header, CookiePolicy,
    Environment, COOKIE_MAX_AGE, COOKIE_NAME,
};
pub use gate::{gate, GateDecision};
pub use magic_link::{request_magic_link, MagicLinkResponse};
pub use provider::{PasswordlessProvider, SessionId, User};

use thiserror::Error;

/// Errors raised at the identity provider boundary
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email address: {0:?}")]
    InvalidEmail(String),

    #[error("Identity provider error: {0}")]
    Provider(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Base64 error: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, AuthError>;
