//! Error types for the rental API client

use serde::Deserialize;
use thiserror::Error;

/// Message shown whenever the server cannot be reached at all
pub const UNREACHABLE_MESSAGE: &str =
    "Unable to reach the server. Please check your connection and try again.";

/// Errors that can occur when talking to the rental API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server could not be reached (no HTTP status, reported as status 0)
    #[error("Unable to reach the server. Please check your connection and try again.")]
    Unreachable,

    /// The server answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message reported by the server, arrays already comma-joined
        message: String,
    },

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// The request could not be built
    #[error("Request failed: {0}")]
    Request(String),

    /// A freshly created identity could not be stripped of its secret fields
    #[error("Sanitization failed: {0}")]
    Sanitization(String),
}

impl ApiError {
    /// Build an error from a status code and raw response body
    ///
    /// Status 0 always maps to [`ApiError::Unreachable`], whatever the body
    /// contains.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 0 {
            return Self::Unreachable;
        }

        let message = serde_json::from_str::<ServerErrorBody>(body)
            .ok()
            .and_then(ServerErrorBody::into_message)
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| format!("Request failed with status {status}"));

        Self::Server { status, message }
    }

    /// Message suitable for display next to the action that failed
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreachable => UNREACHABLE_MESSAGE.to_string(),
            Self::Server { message, .. } => message.clone(),
            Self::Decode(_) => "The server sent an unexpected response.".to_string(),
            Self::Request(detail) | Self::Sanitization(detail) => detail.clone(),
        }
    }

    /// HTTP status of the failure, 0 when the server was unreachable
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Unreachable => Some(0),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Structured error body returned by the API
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerErrorBody {
    /// Single message or list of validation messages
    #[serde(default)]
    pub message: Option<ErrorMessage>,
    /// Short error label (e.g. "Bad Request")
    #[serde(default)]
    pub error: Option<String>,
}

impl ServerErrorBody {
    /// Flatten the body into one display message
    #[must_use]
    pub fn into_message(self) -> Option<String> {
        match self.message {
            Some(ErrorMessage::One(message)) => Some(message),
            Some(ErrorMessage::Many(messages)) => Some(messages.join(", ")),
            None => self.error,
        }
    }
}

/// The `message` field of a server error body
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ErrorMessage {
    /// A single message
    One(String),
    /// Validation messages
    Many(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_zero_ignores_body() {
        let error = ApiError::from_status(0, r#"{"message":"something else"}"#);
        assert_eq!(error, ApiError::Unreachable);
        assert_eq!(error.user_message(), UNREACHABLE_MESSAGE);
    }

    #[test]
    fn message_array_is_comma_joined() {
        let error = ApiError::from_status(
            400,
            r#"{"statusCode":400,"message":["email must be an email","password is too short"],"error":"Bad Request"}"#,
        );
        assert_eq!(error.user_message(), "email must be an email, password is too short");
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn single_message_is_used_verbatim() {
        let error = ApiError::from_status(401, r#"{"message":"Invalid credentials"}"#);
        assert_eq!(error.user_message(), "Invalid credentials");
    }

    #[test]
    fn falls_back_to_error_label_then_body_then_status() {
        assert_eq!(
            ApiError::from_status(404, r#"{"error":"Not Found"}"#).user_message(),
            "Not Found"
        );
        assert_eq!(ApiError::from_status(502, "Bad gateway").user_message(), "Bad gateway");
        assert_eq!(
            ApiError::from_status(500, "").user_message(),
            "Request failed with status 500"
        );
    }
}
