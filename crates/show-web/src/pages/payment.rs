//! Payment Result Pages
//!
//! Stripe sends the customer back to one of these after the hosted checkout.

use leptos::prelude::*;
use leptos::task::spawn_local;
use show_payments::PaymentView;
use show_payments::status;

use crate::browser;
use crate::state::AppContext;

#[component]
pub fn PaymentSuccessPage() -> impl IntoView {
    let queries = AppContext::expect().queries;
    let (outcome, set_outcome) = signal(None::<PaymentView>);

    spawn_local(async move {
        let view = status::resolve(&queries, &browser::search()).await;
        set_outcome.set(Some(view));
    });

    view! {
        <div class="page payment-result">
            {move || match outcome.get() {
                Some(PaymentView::Declined { reason }) => {
                    view! {
                        <h1>"Payment Not Completed"</h1>
                        <p>{reason}</p>
                        <div class="actions">
                            <a href="/store" class="btn btn-primary">"Try Again"</a>
                            <a href="/" class="btn btn-outline">"Back to Home"</a>
                        </div>
                    }
                        .into_any()
                }
                other => {
                    let unverified = other == Some(PaymentView::Unavailable);
                    view! {
                        <h1>"Payment Successful!"</h1>
                        <p>
                            "Thank you for your purchase! Your order has been confirmed and will be processed shortly."
                        </p>
                        {unverified
                            .then(|| view! { <p class="note">"We couldn't check the payment status just now."</p> })}
                        <div class="actions">
                            <a href="/store" class="btn btn-primary">"Continue Shopping"</a>
                            <a href="/" class="btn btn-outline">"Back to Home"</a>
                        </div>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}

const FAILURE_COPY: &str =
    "We couldn't process your payment. Please try again or contact support if the problem persists.";

/// Heading and detail for the cancel page once the session was looked up
fn failure_message(view: Option<&PaymentView>) -> (&'static str, String) {
    match view {
        Some(PaymentView::Confirmed) => (
            "Payment Received",
            "This checkout was completed after all. Your order will be processed shortly.".into(),
        ),
        Some(PaymentView::Declined { reason }) => ("Payment Failed", reason.clone()),
        _ => ("Payment Failed", FAILURE_COPY.into()),
    }
}

/// Stripe only fills `{CHECKOUT_SESSION_ID}` on the success URL, so a plain
/// cancel arrives without a session and shows the generic copy.
#[component]
pub fn PaymentFailurePage() -> impl IntoView {
    let queries = AppContext::expect().queries;
    let (outcome, set_outcome) = signal(None::<PaymentView>);

    spawn_local(async move {
        let view = status::resolve(&queries, &browser::search()).await;
        set_outcome.set(Some(view));
    });

    view! {
        <div class="page payment-result">
            {move || {
                let (heading, detail) = outcome.with(|view| failure_message(view.as_ref()));
                view! {
                    <h1>{heading}</h1>
                    <p>{detail}</p>
                }
            }}
            <div class="actions">
                <a href="/store" class="btn btn-primary">"Try Again"</a>
                <a href="/" class="btn btn-outline">"Back to Home"</a>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_uses_session_outcome() {
        assert_eq!(failure_message(None), ("Payment Failed", FAILURE_COPY.to_string()));
        assert_eq!(
            failure_message(Some(&PaymentView::MissingSession)),
            ("Payment Failed", FAILURE_COPY.to_string())
        );
        let declined = PaymentView::Declined { reason: "card declined".into() };
        assert_eq!(failure_message(Some(&declined)), ("Payment Failed", "card declined".to_string()));
        assert_eq!(failure_message(Some(&PaymentView::Confirmed)).0, "Payment Received");
    }
}
