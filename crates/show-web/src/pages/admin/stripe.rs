//! Stripe Setup

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use show_core::QueryState;
use show_core::draft::{DEFAULT_ALLOWED_COUNTRIES, stripe_configuration};

use crate::state::{AppContext, use_query};

#[component]
pub fn StripeSetup() -> impl IntoView {
    let configured = use_query(|queries| async move { queries.stripe_configured().await });

    view! {
        <section class="card">
            <h2>"Stripe Configuration"</h2>
            <p class="subtitle">
                "Configure Stripe to enable payment processing for your merchandise store"
            </p>
            {move || match configured.get() {
                QueryState::Loading => view! { <p class="loading">"Loading..."</p> }.into_any(),
                QueryState::Ready(true) => {
                    view! {
                        <p class="alert success">"Stripe is configured and ready to process payments!"</p>
                    }
                        .into_any()
                }
                _ => view! { <StripeForm /> }.into_any(),
            }}
        </section>
    }
}

#[component]
fn StripeForm() -> impl IntoView {
    let ctx = AppContext::expect();
    let secret_key = RwSignal::new(String::new());
    let countries = RwSignal::new(DEFAULT_ALLOWED_COUNTRIES.to_string());
    let pending = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get() {
            return;
        }
        let config = match stripe_configuration(&secret_key.get(), &countries.get()) {
            Ok(config) => config,
            Err(e) => {
                error.set(Some(e.user_message()));
                return;
            }
        };

        pending.set(true);
        error.set(None);
        ctx.mutate(
            move |queries| async move { queries.set_stripe_configuration(&config).await },
            move |result| {
                pending.set(false);
                match result {
                    Ok(()) => secret_key.set(String::new()),
                    Err(e) => error.set(Some(e.user_message())),
                }
            },
        );
    };

    view! {
        <form on:submit=submit>
            <label for="stripe-key">"Stripe Secret Key"</label>
            <input
                id="stripe-key"
                type="password"
                placeholder="sk_test_..."
                prop:value=move || secret_key.get()
                on:input=move |ev| secret_key.set(event_target_value(&ev))
                disabled=move || pending.get()
            />
            <p class="hint">"Get your secret key from the Stripe Dashboard"</p>
            <label for="stripe-countries">"Allowed Countries (comma-separated)"</label>
            <input
                id="stripe-countries"
                placeholder=DEFAULT_ALLOWED_COUNTRIES
                prop:value=move || countries.get()
                on:input=move |ev| countries.set(event_target_value(&ev))
                disabled=move || pending.get()
            />
            <p class="hint">"Use ISO 3166-1 alpha-2 country codes (e.g., US, CA, GB)"</p>
            {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
            <button
                type="submit"
                class="btn btn-primary"
                disabled=move || secret_key.with(|key| key.trim().is_empty()) || pending.get()
            >
                "Configure Stripe"
            </button>
        </form>
    }
}
