//! Error Types

use thiserror::Error;

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, ShowError>;

/// Errors raised by the backend seam, the query layer and local validation
#[derive(Error, Debug)]
pub enum ShowError {
    /// Backend connection not established yet
    #[error("Backend connection not ready")]
    NotConnected,

    /// Transport or backend failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Backend refused the operation (e.g. caller is not an admin)
    #[error("Rejected by backend: {0}")]
    Rejected(String),

    /// Login attempted while a session is still active
    #[error("User is already authenticated")]
    AlreadyAuthenticated,

    /// Login or logout failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Form input failed validation
    #[error("Invalid input: {0}")]
    Validation(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShowError {
    /// Whether the UI should render this as a loading state instead of an error
    pub fn is_pending(&self) -> bool {
        matches!(self, ShowError::NotConnected)
    }

    /// Convert to a message suitable for inline display next to a form
    pub fn user_message(&self) -> String {
        match self {
            ShowError::NotConnected => "Still connecting. Please wait a moment.".into(),
            ShowError::Backend(_) => "The server could not complete the request. Please try again.".into(),
            ShowError::Rejected(msg) => format!("Request rejected: {}", msg),
            ShowError::AlreadyAuthenticated => "You are already logged in.".into(),
            ShowError::Auth(_) => "Login failed. Please try again.".into(),
            ShowError::Validation(msg) => msg.clone(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_connected_is_pending() {
        assert!(ShowError::NotConnected.is_pending());
        assert!(!ShowError::Backend("boom".into()).is_pending());
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = ShowError::Validation("Price must be a number".into());
        assert_eq!(err.user_message(), "Price must be a number");
    }
}
