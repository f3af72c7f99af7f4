//! Client error types
//!
//! These errors are transport-agnostic. None of them is fatal: each one maps
//! to a panel, a field annotation or a notice.

use std::fmt;

use crate::validation::FieldErrors;

/// Shown when a request never produced a usable response
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

#[derive(Debug)]
pub enum ClientError {
    /// Request could not be sent or its body could not be read
    Network(String),
    /// Backend answered with a non-success status; message is the backend's own
    Server { status: u16, message: String },
    /// Client-side form validation failed, nothing was sent
    Validation(FieldErrors),
    /// A precondition blocked the action before any request was made
    Guard(String),
    /// Response body did not have the expected shape
    Decode(String),
    /// Local preference store could not be read or written
    Storage(String),
}

impl ClientError {
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Decode(_))
    }

    /// Text to surface next to the form or control that triggered the request
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Network(_) | ClientError::Decode(_) => NETWORK_ERROR_MESSAGE.to_string(),
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Validation(errors) => errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "Please check the form".to_string()),
            ClientError::Guard(msg) => msg.clone(),
            ClientError::Storage(_) => "Could not save your preferences".to_string(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Server { status, message } => {
                write!(f, "Server rejected request ({}): {}", status, message)
            }
            ClientError::Validation(errors) => write!(f, "Validation error: {}", errors),
            ClientError::Guard(msg) => write!(f, "Not allowed: {}", msg),
            ClientError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            ClientError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self {
        ClientError::Storage(e.to_string())
    }
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        ClientError::Validation(errors)
    }
}
