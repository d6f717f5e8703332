//! Magic-link request

use crate::{AuthError, PasswordlessProvider, Result};
use serde::Serialize;

const SENT_MESSAGE: &str = "Check your email for the magic link";
const FAILED_MESSAGE: &str = "Failed to send magic link";

/// JSON body and HTTP status answered to the sign-in form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagicLinkResponse {
    #[serde(skip)]
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MagicLinkResponse {
    fn sent() -> Self {
        Self {
            status: 200,
            success: true,
            message: Some(SENT_MESSAGE.to_string()),
            error: None,
        }
    }

    fn failed() -> Self {
        Self {
            status: 500,
            success: false,
            message: None,
            error: Some(FAILED_MESSAGE.to_string()),
        }
    }
}

/// Create a passwordless session for `email` and send its link
///
/// The underlying cause of a failure is logged, never returned to the client.
pub fn request_magic_link<P: PasswordlessProvider + ?Sized>(
    provider: &P,
    email: &str,
) -> MagicLinkResponse {
    match send_link(provider, email) {
        Ok(()) => MagicLinkResponse::sent(),
        Err(e) => {
            log::error!("Magic link error: {}", e);
            MagicLinkResponse::failed()
        }
    }
}

fn send_link<P: PasswordlessProvider + ?Sized>(provider: &P, email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthError::InvalidEmail(email.to_string()));
    }

    log::info!("Creating magic link session for {}", email);
    let session = provider.create_session(email)?;
    log::debug!("Session created: {}", session);

    provider.send_session(&session)?;
    log::info!("Magic link email sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_bodies() {
        assert_eq!(
            serde_json::to_string(&MagicLinkResponse::sent()).unwrap(),
            r#"{"success":true,"message":"Check your email for the magic link"}"#
        );
        assert_eq!(
            serde_json::to_string(&MagicLinkResponse::failed()).unwrap(),
            r#"{"success":false,"error":"Failed to send magic link"}"#
        );
    }
}
