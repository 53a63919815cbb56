//! Stripe Checkout Integration
//!
//! Hosted checkout sessions in `payment` mode. Admins may replace the
//! credentials at runtime, so the active gateway sits behind a lock.

use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use show_core::{ShoppingItem, StripeConfiguration, StripeSessionStatus};
use stripe::{
    CheckoutSession, CheckoutSessionId, CheckoutSessionMode, CheckoutSessionPaymentStatus,
    Client, CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionLineItemsPriceData, CreateCheckoutSessionLineItemsPriceDataProductData,
    CreateCheckoutSessionShippingAddressCollection,
    CreateCheckoutSessionShippingAddressCollectionAllowedCountries, Currency,
};
use thiserror::Error;

/// Placeholder Stripe substitutes with the real session id on redirect
const SESSION_ID_TEMPLATE: &str = "session_id={CHECKOUT_SESSION_ID}";

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Stripe is not configured")]
    NotConfigured,

    #[error("Stripe error: {0}")]
    Stripe(String),

    #[error("Invalid checkout request: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// Session descriptor handed back to the browser
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub id: String,
    pub url: String,
}

/// Checkout request after validation
#[derive(Clone, Debug)]
pub struct CheckoutParams<'a> {
    pub items: &'a [ShoppingItem],
    pub success_url: &'a str,
    pub cancel_url: &'a str,
    /// Principal of the logged-in caller, if any
    pub client_reference: Option<&'a str>,
}

/// Payment gateway trait (Strategy pattern)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_session(&self, params: CheckoutParams<'_>) -> Result<SessionDescriptor>;

    async fn session_status(&self, session_id: &str) -> Result<StripeSessionStatus>;
}

/// Stripe client wrapper
pub struct StripeGateway {
    client: Client,
    allowed_countries: Vec<CreateCheckoutSessionShippingAddressCollectionAllowedCountries>,
}

impl StripeGateway {
    pub fn new(config: &StripeConfiguration) -> Self {
        let allowed_countries = config
            .allowed_countries
            .iter()
            .filter_map(|code| {
                let parsed = parse_stripe_enum(&code.to_uppercase());
                if parsed.is_none() {
                    tracing::warn!(country = %code, "Ignoring unsupported shipping country");
                }
                parsed
            })
            .collect();

        Self {
            client: Client::new(config.secret_key.clone()),
            allowed_countries,
        }
    }
}

/// Stripe's generated enums deserialize from their wire strings
fn parse_stripe_enum<T: serde::de::DeserializeOwned>(value: &str) -> Option<T> {
    serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
}

/// Append the session id placeholder so the success page can look the session up
pub fn success_url_with_session(success_url: &str) -> String {
    let separator = if success_url.contains('?') { '&' } else { '?' };
    format!("{success_url}{separator}{SESSION_ID_TEMPLATE}")
}

fn line_item(item: &ShoppingItem) -> Result<CreateCheckoutSessionLineItems> {
    let currency: Currency = parse_stripe_enum(&item.currency.to_lowercase())
        .ok_or_else(|| GatewayError::Invalid(format!("unsupported currency {}", item.currency)))?;
    let unit_amount = i64::try_from(item.price_in_cents)
        .map_err(|_| GatewayError::Invalid(format!("price too large for {}", item.product_name)))?;

    Ok(CreateCheckoutSessionLineItems {
        quantity: Some(item.quantity),
        price_data: Some(CreateCheckoutSessionLineItemsPriceData {
            currency,
            unit_amount: Some(unit_amount),
            product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                name: item.product_name.clone(),
                description: Some(item.product_description.clone()).filter(|d| !d.is_empty()),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    })
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_session(&self, params: CheckoutParams<'_>) -> Result<SessionDescriptor> {
        let line_items = params.items.iter().map(line_item).collect::<Result<Vec<_>>>()?;
        let success_url = success_url_with_session(params.success_url);

        let mut request = CreateCheckoutSession::new();
        request.mode = Some(CheckoutSessionMode::Payment);
        request.success_url = Some(&success_url);
        request.cancel_url = Some(params.cancel_url);
        request.client_reference_id = params.client_reference;
        request.line_items = Some(line_items);
        if !self.allowed_countries.is_empty() {
            request.shipping_address_collection = Some(CreateCheckoutSessionShippingAddressCollection {
                allowed_countries: self.allowed_countries.clone(),
            });
        }

        let session = CheckoutSession::create(&self.client, request)
            .await
            .map_err(|e| GatewayError::Stripe(e.to_string()))?;
        let url = session
            .url
            .ok_or_else(|| GatewayError::Stripe("No checkout URL returned".into()))?;

        tracing::info!(session_id = %session.id, "Created checkout session");
        Ok(SessionDescriptor { id: session.id.to_string(), url })
    }

    async fn session_status(&self, session_id: &str) -> Result<StripeSessionStatus> {
        let id = CheckoutSessionId::from_str(session_id)
            .map_err(|e| GatewayError::Invalid(e.to_string()))?;
        let session = CheckoutSession::retrieve(&self.client, &id, &[])
            .await
            .map_err(|e| GatewayError::Stripe(e.to_string()))?;

        Ok(match session.payment_status {
            CheckoutSessionPaymentStatus::Paid | CheckoutSessionPaymentStatus::NoPaymentRequired => {
                StripeSessionStatus::Completed {
                    user_principal: session.client_reference_id.clone(),
                    response: serde_json::to_string(&session).unwrap_or_default(),
                }
            }
            other => StripeSessionStatus::Failed {
                error: format!("Payment status: {}", other.as_str()),
            },
        })
    }
}

/// Builds a gateway from admin-supplied credentials
pub type Connector = Arc<dyn Fn(&StripeConfiguration) -> Arc<dyn PaymentGateway> + Send + Sync>;

/// Currently active gateway
pub struct Payments {
    gateway: RwLock<Option<Arc<dyn PaymentGateway>>>,
    connector: Connector,
}

impl Default for Payments {
    fn default() -> Self {
        Self::new()
    }
}

impl Payments {
    pub fn new() -> Self {
        let connector: Connector = Arc::new(|config: &StripeConfiguration| -> Arc<dyn PaymentGateway> {
            Arc::new(StripeGateway::new(config))
        });
        Self::with_connector(connector)
    }

    pub fn with_connector(connector: Connector) -> Self {
        Self {
            gateway: RwLock::new(None),
            connector,
        }
    }

    /// Replace the gateway with one using `config`
    pub fn configure(&self, config: &StripeConfiguration) {
        let gateway = (self.connector)(config);
        *self.gateway.write().unwrap_or_else(PoisonError::into_inner) = Some(gateway);
        tracing::info!(countries = config.allowed_countries.len(), "Stripe configured");
    }

    pub fn is_configured(&self) -> bool {
        self.gateway.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    pub fn gateway(&self) -> Result<Arc<dyn PaymentGateway>> {
        self.gateway
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(GatewayError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_url_with_session() {
        assert_eq!(
            success_url_with_session("https://show.test/payment-success"),
            "https://show.test/payment-success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(
            success_url_with_session("https://show.test/done?x=1"),
            "https://show.test/done?x=1&session_id={CHECKOUT_SESSION_ID}"
        );
    }

    #[test]
    fn test_line_item_from_shopping_item() {
        let item = ShoppingItem {
            product_name: "Mug".into(),
            product_description: String::new(),
            currency: "usd".into(),
            quantity: 2,
            price_in_cents: 1999,
        };
        let line = line_item(&item).unwrap();
        assert_eq!(line.quantity, Some(2));
        let price = line.price_data.unwrap();
        assert_eq!(price.currency, Currency::USD);
        assert_eq!(price.unit_amount, Some(1999));
        assert_eq!(price.product_data.unwrap().description, None);
    }

    #[test]
    fn test_unknown_currency_is_rejected() {
        let item = ShoppingItem {
            product_name: "Mug".into(),
            product_description: String::new(),
            currency: "zzz".into(),
            quantity: 1,
            price_in_cents: 100,
        };
        assert!(matches!(line_item(&item), Err(GatewayError::Invalid(_))));
    }

    #[test]
    fn test_payments_start_unconfigured() {
        let payments = Payments::new();
        assert!(!payments.is_configured());
        assert!(matches!(payments.gateway(), Err(GatewayError::NotConfigured)));
    }
}
