//! Payment Error Types

use show_core::ShowError;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Checkout errors
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Session creation or status lookup failed at the backend
    #[error(transparent)]
    Backend(#[from] ShowError),

    /// Backend replied but the session descriptor is unusable
    #[error("Malformed checkout session: {0}")]
    MalformedSession(String),

    /// Redirect to the hosted page could not be performed
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            PaymentError::Backend(ShowError::NotConnected) => {
                "The store is still connecting. Please try again in a moment."
            }
            PaymentError::Config(_) => "Payments are not configured yet.",
            _ => "Failed to create checkout session. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let err = PaymentError::MalformedSession("missing url".into());
        assert_eq!(err.user_message(), "Failed to create checkout session. Please try again.");

        let err: PaymentError = ShowError::NotConnected.into();
        assert!(err.user_message().contains("connecting"));
    }
}
