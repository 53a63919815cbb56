//! Payment Result Pages
//!
//! Stripe appends `session_id` to the success URL. When present, the page
//! asks the backend how the session ended.

use show_core::{QueryClient, QueryState, StripeSessionStatus};

/// Query parameter carrying the checkout session id
pub const SESSION_ID_PARAM: &str = "session_id";

/// What the terminal page should say
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentView {
    Confirmed,
    Declined { reason: String },
    /// No session id in the URL; show the generic copy
    MissingSession,
    /// Status could not be fetched
    Unavailable,
}

impl PaymentView {
    pub fn is_success(&self) -> bool {
        matches!(self, PaymentView::Confirmed)
    }
}

/// Extract `session_id` from a location search string (`?a=b&session_id=..`)
pub fn session_id_from_query(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == SESSION_ID_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Look up the session named in `search`
pub async fn resolve(queries: &QueryClient, search: &str) -> PaymentView {
    let Some(session_id) = session_id_from_query(search) else {
        return PaymentView::MissingSession;
    };

    match queries.stripe_session_status(&session_id).await {
        QueryState::Ready(StripeSessionStatus::Completed { .. }) => PaymentView::Confirmed,
        QueryState::Ready(StripeSessionStatus::Failed { error }) => PaymentView::Declined { reason: error },
        QueryState::Loading | QueryState::Failed(_) => PaymentView::Unavailable,
    }
}
