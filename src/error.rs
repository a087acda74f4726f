//! Error types and handling for the tour guide

use thiserror::Error;

/// Message shown wherever an AI feature is unavailable for lack of a credential.
pub const API_KEY_ERROR_MESSAGE: &str =
    "API key not configured. Please set the API_KEY environment variable.";

/// Main error type for the tour guide
#[derive(Error, Debug)]
pub enum GuideError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// AI collaborator communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input and catalog validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GuideError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GuideError::Config { .. } => API_KEY_ERROR_MESSAGE.to_string(),
            GuideError::Api { message } => message.clone(),
            GuideError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            GuideError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
