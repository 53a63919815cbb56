//! HTTP Wire Types
//!
//! Request and response bodies shared by the HTTP backend client and the
//! reference server.

use serde::{Deserialize, Serialize};

use crate::model::{BlobRef, ShoppingItem, UserRole};

/// Error body returned with every non-2xx status
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Machine-readable error codes
pub mod codes {
    pub const ALREADY_AUTHENTICATED: &str = "ALREADY_AUTHENTICATED";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const STRIPE_NOT_CONFIGURED: &str = "STRIPE_NOT_CONFIGURED";
    pub const STRIPE_ERROR: &str = "STRIPE_ERROR";
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: UserRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleResponse {
    pub role: UserRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripeConfiguredResponse {
    pub configured: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddVideoRequest {
    pub id: String,
    pub blob: BlobRef,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub items: Vec<ShoppingItem>,
    pub success_url: String,
    pub cancel_url: String,
}

/// Parse `Bearer <token>`
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Bearer  "), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_checkout_request_wire_names() {
        let json = serde_json::to_value(CheckoutRequest {
            items: Vec::new(),
            success_url: "a".into(),
            cancel_url: "b".into(),
        })
        .unwrap();
        assert_eq!(json["successUrl"], "a");
        assert_eq!(json["cancelUrl"], "b");
    }
}
