use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::DecodeError;
use crate::guard::Redirect;
use crate::routes::LOGIN_PATH;
use crate::session::StorageError;
use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Malformed credential: {0}")]
    Decode(#[from] DecodeError),

    #[error("Credential has expired")]
    Expired,

    #[error("Session is no longer authorized")]
    Unauthorized,

    #[error("Page not available to this session, redirected to {}", .0.path())]
    Redirected(Redirect),

    #[error("Request failed ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// What the caller should do with an error. Nothing is fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect(&'static str),
    Notify(String),
}

impl ClientError {
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn resolution(&self) -> Resolution {
        match self {
            ClientError::Decode(_) | ClientError::Expired | ClientError::Unauthorized => {
                Resolution::Redirect(LOGIN_PATH)
            }
            ClientError::Redirected(redirect) => Resolution::Redirect(redirect.path()),
            ClientError::Api { message, .. } => Resolution::Notify(message.clone()),
            ClientError::Network(_) => {
                Resolution::Notify("Unable to reach the server. Please try again.".to_string())
            }
            other => Resolution::Notify(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_redirects_to_login() {
        let error = ClientError::Unauthorized;
        assert_eq!(error.status_code(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(error.resolution(), Resolution::Redirect(LOGIN_PATH));
    }

    #[test]
    fn test_decode_error_redirects_to_login() {
        let error = ClientError::Decode(DecodeError::MissingRole);
        assert_eq!(error.status_code(), None);
        assert_eq!(error.resolution(), Resolution::Redirect(LOGIN_PATH));
    }

    #[test]
    fn test_guard_redirect_is_followed() {
        let error = ClientError::Redirected(Redirect::Unauthorized);
        assert_eq!(error.resolution(), Resolution::Redirect("/unauthorized"));
    }

    #[test]
    fn test_api_error_notifies_with_backend_message() {
        let error = ClientError::Api {
            status: StatusCode::CONFLICT,
            message: "Email already registered".to_string(),
        };
        assert_eq!(error.status_code(), Some(StatusCode::CONFLICT));
        assert_eq!(
            error.resolution(),
            Resolution::Notify("Email already registered".to_string())
        );
    }

    #[test]
    fn test_validation_error_notifies() {
        let error = ClientError::Validation(ValidationError::new("email", "must not be empty"));
        assert_eq!(
            error.resolution(),
            Resolution::Notify("Validation error: email: must not be empty".to_string())
        );
    }
}
