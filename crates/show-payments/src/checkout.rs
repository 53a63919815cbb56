//! Stripe Checkout Orchestration
//!
//! Turns the cart into a hosted checkout session and redirects the browser.
//! The cart is never modified here.

use serde::{Deserialize, Serialize};
use show_core::{Cart, CartItem, QueryClient, ShoppingItem};

use crate::error::{PaymentError, Result};

/// ISO currency code sent with every line item
pub const DEFAULT_CURRENCY: &str = "usd";

/// Where the hosted page sends the customer afterwards
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutConfig {
    /// Terminal pages on the site's own origin (`https://host`)
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            currency: DEFAULT_CURRENCY.into(),
            success_url: format!("{origin}/payment-success"),
            cancel_url: format!("{origin}/payment-failure"),
        }
    }
}

/// Session descriptor returned by the backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

impl CheckoutSession {
    /// Deserialize and validate the raw payload
    pub fn parse(payload: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            id: String,
            #[serde(default)]
            url: Option<String>,
        }

        let raw: Raw = serde_json::from_str(payload)
            .map_err(|e| PaymentError::MalformedSession(format!("undecodable payload: {e}")))?;
        let url = raw
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| PaymentError::MalformedSession("Stripe session missing url".into()))?;
        Ok(Self { id: raw.id, url })
    }
}

/// Browser seam for leaving the site and blocking notifications
pub trait Navigator {
    /// One-way full page navigation
    fn redirect(&self, url: &str) -> Result<()>;

    fn alert(&self, message: &str);
}

/// What a checkout attempt did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Nothing in the cart; no request was made
    EmptyCart,
    /// Browser handed off to the hosted checkout page
    Redirected(CheckoutSession),
}

/// Checkout orchestrator
pub struct CheckoutOrchestrator<'a> {
    queries: &'a QueryClient,
    config: CheckoutConfig,
}

impl<'a> CheckoutOrchestrator<'a> {
    pub fn new(queries: &'a QueryClient, config: CheckoutConfig) -> Self {
        Self { queries, config }
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Flatten cart lines into the backend's item shape
    pub fn shopping_items(&self, cart: &Cart) -> Vec<ShoppingItem> {
        cart.items().iter().map(|item| self.shopping_item(item)).collect()
    }

    fn shopping_item(&self, item: &CartItem) -> ShoppingItem {
        let product = item.product();
        ShoppingItem {
            product_name: product.name.clone(),
            product_description: product.description.clone(),
            currency: self.config.currency.clone(),
            quantity: u64::from(item.quantity()),
            price_in_cents: product.price_cents,
        }
    }

    /// Run one checkout attempt
    ///
    /// Failures are reported to the user through [`Navigator::alert`] and then
    /// returned; the caller only needs to reset its busy indicator.
    pub async fn checkout(&self, cart: &Cart, navigator: &dyn Navigator) -> Result<CheckoutOutcome> {
        if cart.is_empty() {
            tracing::debug!("Checkout skipped for empty cart");
            return Ok(CheckoutOutcome::EmptyCart);
        }

        match self.start_session(cart, navigator).await {
            Ok(session) => Ok(CheckoutOutcome::Redirected(session)),
            Err(e) => {
                tracing::error!(error = %e, "Checkout failed");
                navigator.alert(e.user_message());
                Err(e)
            }
        }
    }

    async fn start_session(&self, cart: &Cart, navigator: &dyn Navigator) -> Result<CheckoutSession> {
        let items = self.shopping_items(cart);
        tracing::info!(lines = items.len(), units = cart.item_count(), "Creating checkout session");

        let payload = self
            .queries
            .create_checkout_session(&items, &self.config.success_url, &self.config.cancel_url)
            .await?;
        let session = CheckoutSession::parse(&payload)?;

        navigator.redirect(&session.url)?;
        tracing::info!(session_id = %session.id, "Redirected to hosted checkout");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::Arc;

    use rust_decimal_macros::dec;
    use show_core::{BlobRef, MemoryBackend, Product};

    #[derive(Default)]
    struct RecordingNavigator {
        redirects: RefCell<Vec<String>>,
        alerts: RefCell<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&self, url: &str) -> Result<()> {
            self.redirects.borrow_mut().push(url.to_string());
            Ok(())
        }

        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }
    }

    fn product(id: &str, price_cents: u64) -> Product {
        Product {
            id: id.into(),
            name: format!("Item {id}"),
            description: "merch".into(),
            price_cents,
            image: BlobRef::from_url(format!("https://cdn.example.com/{id}.png")),
        }
    }

    fn setup() -> (Arc<MemoryBackend>, QueryClient) {
        let backend = Arc::new(MemoryBackend::new());
        let queries = QueryClient::connected(backend.clone());
        (backend, queries)
    }

    #[tokio::test]
    async fn test_empty_cart_never_reaches_backend() {
        let (backend, queries) = setup();
        let orchestrator = CheckoutOrchestrator::new(&queries, CheckoutConfig::for_origin("https://show.test"));
        let navigator = RecordingNavigator::default();

        let outcome = orchestrator.checkout(&Cart::new(), &navigator).await.unwrap();

        assert_eq!(outcome, CheckoutOutcome::EmptyCart);
        assert!(backend.checkouts().is_empty());
        assert!(navigator.redirects.borrow().is_empty());
        assert!(navigator.alerts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_sends_items_and_redirects() {
        let (backend, queries) = setup();
        let orchestrator = CheckoutOrchestrator::new(&queries, CheckoutConfig::for_origin("https://show.test/"));
        let navigator = RecordingNavigator::default();

        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1999));
        cart.add_item(&product("p1", 1999));
        cart.add_item(&product("p2", 500));

        let outcome = orchestrator.checkout(&cart, &navigator).await.unwrap();
        let CheckoutOutcome::Redirected(session) = outcome else {
            panic!("expected redirect");
        };

        let checkouts = backend.checkouts();
        assert_eq!(checkouts.len(), 1);
        let sent = &checkouts[0];
        assert_eq!(sent.success_url, "https://show.test/payment-success");
        assert_eq!(sent.cancel_url, "https://show.test/payment-failure");
        assert_eq!(sent.items.len(), 2);
        assert_eq!(sent.items[0].quantity, 2);
        assert_eq!(sent.items[0].price_in_cents, 1999);
        assert_eq!(sent.items[0].currency, "usd");

        assert_eq!(*navigator.redirects.borrow(), vec![session.url]);
        // cart is left alone
        assert_eq!(cart.total_price(), dec!(44.98));
    }

    #[tokio::test]
    async fn test_missing_url_alerts_without_navigation() {
        let (backend, queries) = setup();
        backend.set_checkout_reply(r#"{"id":"cs_test_1"}"#);
        let orchestrator = CheckoutOrchestrator::new(&queries, CheckoutConfig::for_origin("https://show.test"));
        let navigator = RecordingNavigator::default();

        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1999));
        let result = orchestrator.checkout(&cart, &navigator).await;

        assert!(matches!(result, Err(PaymentError::MalformedSession(_))));
        assert!(navigator.redirects.borrow().is_empty());
        assert_eq!(
            *navigator.alerts.borrow(),
            vec!["Failed to create checkout session. Please try again.".to_string()]
        );
        assert_eq!(cart.len(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_alerts() {
        let (backend, queries) = setup();
        backend.set_unavailable(true);
        let orchestrator = CheckoutOrchestrator::new(&queries, CheckoutConfig::for_origin("https://show.test"));
        let navigator = RecordingNavigator::default();

        let mut cart = Cart::new();
        cart.add_item(&product("p1", 1999));

        assert!(matches!(
            orchestrator.checkout(&cart, &navigator).await,
            Err(PaymentError::Backend(_))
        ));
        assert_eq!(navigator.alerts.borrow().len(), 1);
        assert!(navigator.redirects.borrow().is_empty());
    }

    #[test]
    fn test_session_parse() {
        assert!(CheckoutSession::parse("not json").is_err());
        assert!(CheckoutSession::parse(r#"{"id":"x","url":"  "}"#).is_err());
        let session = CheckoutSession::parse(r#"{"id":"x","url":"https://pay.test/x"}"#).unwrap();
        assert_eq!(session.url, "https://pay.test/x");
    }
}
