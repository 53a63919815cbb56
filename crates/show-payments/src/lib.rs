//! # show-payments
//!
//! Checkout for the merch store, using the hosted Stripe Checkout flow.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────────┐     ┌──────────────────┐
//! │    Cart     │────▶│  Stripe Hosted  │────▶│ /payment-success │
//! │  (store)    │     │  Checkout Page  │     │ /payment-failure │
//! └─────────────┘     └─────────────────┘     └──────────────────┘
//! ```
//!
//! The site never sees card data. The orchestrator turns the cart into line
//! items, asks the backend for a session and hands the redirect URL to a
//! [`Navigator`]. The terminal pages read the session status back through
//! [`status::resolve`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use show_payments::{CheckoutConfig, CheckoutOrchestrator};
//!
//! let orchestrator = CheckoutOrchestrator::new(&queries, CheckoutConfig::for_origin(&origin));
//! orchestrator.checkout(&cart, &navigator).await?;
//! ```

mod checkout;
mod error;
pub mod status;

pub use checkout::{
    CheckoutConfig, CheckoutOrchestrator, CheckoutOutcome, CheckoutSession, Navigator,
    DEFAULT_CURRENCY,
};
pub use error::{PaymentError, Result};
pub use status::PaymentView;
