//! Client error types

use portal_core::ApiError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Token missing, invalid or expired
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create error from HTTP status code and the raw response body
    ///
    /// The backend reports failures as `{ success: false, message }`; when the
    /// body has that shape only the message is kept.
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        let message = extract_message(&body).unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            }
        });

        match status.as_u16() {
            400 => Self::BadRequest(message),
            401 => Self::AuthenticationFailed(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::ServerError {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the stored token should be discarded
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Request(err) if err.is_decode() => Self::Decode(err.to_string()),
            ClientError::Request(err) => Self::Network(err.to_string()),
            ClientError::ServerError { status, message } => Self::Rejected {
                status: Some(status),
                message,
            },
            ClientError::AuthenticationFailed(message) => Self::Unauthorized(message),
            ClientError::NotFound(message) => Self::Rejected {
                status: Some(404),
                message,
            },
            ClientError::BadRequest(message) => Self::Rejected {
                status: Some(400),
                message,
            },
            ClientError::Forbidden(message) => Self::Rejected {
                status: Some(403),
                message,
            },
            ClientError::Serialization(err) => Self::Decode(err.to_string()),
            ClientError::Configuration(message) => Self::Configuration(message),
        }
    }
}
