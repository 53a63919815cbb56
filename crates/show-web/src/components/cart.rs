//! Shopping Cart Panel

use leptos::prelude::*;
use leptos::task::spawn_local;
use show_core::model::format_usd;
use show_core::{Cart, CartItem};
use show_payments::{CheckoutConfig, CheckoutOrchestrator};

use crate::browser::{self, BrowserNavigator};
use crate::state::AppContext;

#[component]
pub fn ShoppingCart() -> impl IntoView {
    let cart = AppContext::expect().cart;

    view! {
        <aside class="cart">
            <h2>"Shopping Cart"</h2>
            <Show
                when=move || !cart.with(Cart::is_empty)
                fallback=|| view! { <p class="cart-empty">"Your cart is empty"</p> }
            >
                <CartContents />
            </Show>
        </aside>
    }
}

#[component]
fn CartContents() -> impl IntoView {
    let ctx = AppContext::expect();
    let cart = ctx.cart;
    let queries = ctx.queries;
    let (pending, set_pending) = signal(false);

    let checkout = move |_| {
        if pending.get_untracked() {
            return;
        }
        set_pending.set(true);

        let queries = queries.clone();
        let snapshot = cart.get_untracked();
        spawn_local(async move {
            let config = CheckoutConfig::for_origin(&browser::origin());
            let orchestrator = CheckoutOrchestrator::new(&queries, config);
            // failures were already shown through the navigator
            if let Err(e) = orchestrator.checkout(&snapshot, &BrowserNavigator).await {
                leptos::logging::warn!("checkout failed: {e}");
            }
            set_pending.set(false);
        });
    };

    view! {
        <ul class="cart-items">
            <For
                each=move || cart.with(|cart| cart.items().to_vec())
                key=|item| (item.product().id.clone(), item.quantity())
                children=move |item| view! { <CartLine item /> }
            />
        </ul>
        <div class="cart-total">
            <span>"Total:"</span>
            <span class="price">{move || format_usd(cart.with(Cart::total_price))}</span>
        </div>
        <button class="btn btn-primary btn-checkout" on:click=checkout disabled=move || pending.get()>
            {move || if pending.get() { "Processing..." } else { "Checkout" }}
        </button>
    }
}

#[component]
fn CartLine(item: CartItem) -> impl IntoView {
    let cart = AppContext::expect().cart;
    let product = item.product().clone();
    let quantity = item.quantity();

    let id = product.id.clone();
    let (less, more) = (id.clone(), id.clone());

    view! {
        <li class="cart-item">
            <img src=product.image.direct_url().to_string() alt=product.name.clone() />
            <div class="cart-item-info">
                <h4>{product.name.clone()}</h4>
                <p class="price">{format_usd(product.price())}</p>
            </div>
            <div class="quantity">
                <button on:click=move |_| cart.update(|cart| cart.decrement(&less))>"-"</button>
                <span>{quantity}</span>
                <button on:click=move |_| cart.update(|cart| cart.increment(&more))>"+"</button>
            </div>
            <button
                class="btn-remove"
                aria-label="Remove"
                on:click=move |_| cart.update(|cart| cart.remove_item(&id))
            >
                "×"
            </button>
        </li>
    }
}
