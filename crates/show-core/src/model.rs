//! Domain Models
//!
//! Entities owned by the backend and the wire forms exchanged with it.
//! Prices travel as integer cents and are only turned into `Decimal` for
//! display and totals.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Opaque handle to stored media, resolvable to a downloadable/streamable URL
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobRef(String);

impl BlobRef {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// URL the browser can load directly (img src, video src)
    pub fn direct_url(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlobRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A merchandise product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,

    /// Price in minor currency units
    #[serde(rename = "priceInCents")]
    pub price_cents: u64,

    pub image: BlobRef,
}

impl Product {
    /// Unit price in dollars
    pub fn price(&self) -> Decimal {
        cents_to_dollars(self.price_cents)
    }
}

/// A podcast episode
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
}

/// A gallery video
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub blob: BlobRef,
}

/// Caller profile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
}

/// Caller role as reported by the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
    #[default]
    Guest,
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
            UserRole::Guest => "guest",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// Flattened cart line sent to the backend at checkout time
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    pub product_name: String,
    pub product_description: String,
    pub currency: String,
    pub quantity: u64,
    pub price_in_cents: u64,
}

/// Payment provider credentials configured by an admin
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StripeConfiguration {
    pub secret_key: String,
    pub allowed_countries: Vec<String>,
}

/// Outcome of a checkout session as reported by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum StripeSessionStatus {
    Completed {
        #[serde(default)]
        user_principal: Option<String>,
        response: String,
    },
    Failed {
        error: String,
    },
}

impl StripeSessionStatus {
    pub fn is_completed(&self) -> bool {
        matches!(self, StripeSessionStatus::Completed { .. })
    }
}

/// Convert integer cents into a dollar amount
pub fn cents_to_dollars(cents: u64) -> Decimal {
    Decimal::from(cents) / dec!(100)
}

/// Render a dollar amount the way the store displays prices (`$19.99`)
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_wire_names() {
        let json = r#"{
            "id": "p1",
            "name": "Mug",
            "description": "Coffee mug",
            "priceInCents": 1999,
            "image": "https://cdn.example.com/mug.png"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price_cents, 1999);
        assert_eq!(product.image.direct_url(), "https://cdn.example.com/mug.png");
        assert_eq!(product.price(), dec!(19.99));
    }

    #[test]
    fn test_session_status_tagging() {
        let status: StripeSessionStatus =
            serde_json::from_str(r#"{"kind":"failed","error":"card declined"}"#).unwrap();
        assert!(!status.is_completed());

        let status: StripeSessionStatus =
            serde_json::from_str(r#"{"kind":"completed","response":"paid","userPrincipal":"abc"}"#)
                .unwrap();
        assert_eq!(
            status,
            StripeSessionStatus::Completed {
                user_principal: Some("abc".into()),
                response: "paid".into(),
            }
        );
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(cents_to_dollars(3998)), "$39.98");
        assert_eq!(format_usd(cents_to_dollars(500)), "$5.00");
    }

    #[test]
    fn test_role_serde() {
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
        assert_eq!(UserRole::default(), UserRole::Guest);
    }
}
