//! Application State

use std::sync::Arc;

use crate::store::ContentStore;
use crate::payments::Payments;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Catalog, sessions and profiles
    pub store: Arc<ContentStore>,

    /// Active Stripe gateway (unset until credentials arrive)
    pub payments: Arc<Payments>,
}

impl AppState {
    pub fn new(store: ContentStore, payments: Payments) -> Self {
        Self {
            store: Arc::new(store),
            payments: Arc::new(payments),
        }
    }
}
