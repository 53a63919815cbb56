//! Admin Form Drafts
//!
//! Validation for the content management forms before anything is sent to
//! the backend.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::error::{Result, ShowError};
use crate::model::{BlobRef, Episode, Product, StripeConfiguration};

/// Countries offered when the Stripe form is first shown
pub const DEFAULT_ALLOWED_COUNTRIES: &str = "US,CA,GB";

/// Parse a dollar amount typed by an admin into cents
///
/// `"19.99"` becomes `1999`; fractions of a cent round half away from zero.
pub fn parse_price_cents(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ShowError::Validation("Price is required".into()));
    }
    let dollars: Decimal = trimmed
        .parse()
        .map_err(|_| ShowError::Validation(format!("'{trimmed}' is not a valid price")))?;
    if dollars.is_sign_negative() {
        return Err(ShowError::Validation("Price cannot be negative".into()));
    }
    dollars
        .checked_mul(dec!(100))
        .and_then(|cents| cents.round().to_u64())
        .ok_or_else(|| ShowError::Validation("Price is too large".into()))
}

/// Inverse of [`parse_price_cents`] for pre-filling the edit form
pub fn price_input(cents: u64) -> String {
    crate::model::cents_to_dollars(cents).normalize().to_string()
}

/// Id for a newly created entity (`product-1700000000000`)
pub fn new_id(prefix: &str, now_millis: u128) -> String {
    format!("{prefix}-{now_millis}")
}

/// Split a comma-separated country list, dropping blanks
pub fn parse_countries(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Product form contents
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: Option<BlobRef>,
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: price_input(product.price_cents),
            image: Some(product.image.clone()),
        }
    }

    /// Submit button enabled
    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && !self.price.trim().is_empty() && self.image.is_some()
    }

    /// Build the product, reusing `id` when editing
    pub fn into_product(self, id: String) -> Result<Product> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ShowError::Validation("Product name is required".into()));
        }
        let price_cents = parse_price_cents(&self.price)?;
        let image = self
            .image
            .ok_or_else(|| ShowError::Validation("Product image is required".into()))?;
        Ok(Product {
            id,
            name,
            description: self.description.trim().to_string(),
            price_cents,
            image,
        })
    }
}

/// Episode form contents
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpisodeDraft {
    pub title: String,
    pub description: String,
    pub url: String,
}

impl EpisodeDraft {
    pub fn from_episode(episode: &Episode) -> Self {
        Self {
            title: episode.title.clone(),
            description: episode.description.clone(),
            url: episode.url.clone(),
        }
    }

    pub fn is_submittable(&self) -> bool {
        !self.title.trim().is_empty() && !self.url.trim().is_empty()
    }

    pub fn into_episode(self, id: String) -> Result<Episode> {
        if !self.is_submittable() {
            return Err(ShowError::Validation("Episode title and audio URL are required".into()));
        }
        Ok(Episode {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            url: self.url.trim().to_string(),
        })
    }
}

/// Stripe form contents
pub fn stripe_configuration(secret_key: &str, countries: &str) -> Result<StripeConfiguration> {
    let secret_key = secret_key.trim();
    if secret_key.is_empty() {
        return Err(ShowError::Validation("Stripe secret key is required".into()));
    }
    Ok(StripeConfiguration {
        secret_key: secret_key.to_string(),
        allowed_countries: parse_countries(countries),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_cents() {
        assert_eq!(parse_price_cents("19.99").unwrap(), 1999);
        assert_eq!(parse_price_cents(" 5 ").unwrap(), 500);
        assert_eq!(parse_price_cents("0.005").unwrap(), 1);
        assert!(parse_price_cents("").is_err());
        assert!(parse_price_cents("abc").is_err());
        assert!(parse_price_cents("-1").is_err());
    }

    #[test]
    fn test_huge_price_is_rejected() {
        let result = parse_price_cents("79228162514264337593543950335");
        assert!(matches!(result, Err(ShowError::Validation(msg)) if msg == "Price is too large"));
        assert!(parse_price_cents("184467440737095516.16").is_err());
    }

    #[test]
    fn test_price_input_round_trips() {
        assert_eq!(price_input(1999), "19.99");
        assert_eq!(price_input(500), "5");
        assert_eq!(parse_price_cents(&price_input(1250)).unwrap(), 1250);
    }

    #[test]
    fn test_product_draft_requires_image() {
        let draft = ProductDraft {
            name: "Mug".into(),
            description: String::new(),
            price: "12".into(),
            image: None,
        };
        assert!(!draft.is_submittable());
        assert!(draft.into_product("product-1".into()).is_err());
    }

    #[test]
    fn test_product_draft_trims_fields() {
        let draft = ProductDraft {
            name: "  Tote  ".into(),
            description: " canvas ".into(),
            price: "24.50".into(),
            image: Some(BlobRef::from_url("https://cdn.example.com/tote.png")),
        };
        let product = draft.into_product(new_id("product", 42)).unwrap();
        assert_eq!(product.id, "product-42");
        assert_eq!(product.name, "Tote");
        assert_eq!(product.description, "canvas");
        assert_eq!(product.price_cents, 2450);
    }

    #[test]
    fn test_episode_draft_requires_title_and_url() {
        let draft = EpisodeDraft { title: "Pilot".into(), description: String::new(), url: "  ".into() };
        assert!(!draft.is_submittable());
    }

    #[test]
    fn test_parse_countries() {
        assert_eq!(parse_countries(DEFAULT_ALLOWED_COUNTRIES), vec!["US", "CA", "GB"]);
        assert_eq!(parse_countries(" us, ,de ,"), vec!["US", "DE"]);
        assert!(stripe_configuration("  ", "US").is_err());
    }
}
