use leptos::prelude::*;
use show_core::Product;
use show_core::model::format_usd;

use crate::state::AppContext;

/// Store grid tile
#[component]
pub fn ProductCard(product: Product) -> impl IntoView {
    let cart = AppContext::expect().cart;
    let image = product.image.direct_url().to_string();
    let name = product.name.clone();
    let description = product.description.clone();
    let price = format_usd(product.price());

    let add = move |_| cart.update(|cart| cart.add_item(&product));

    view! {
        <div class="product-card">
            <img src=image alt=name.clone() class="product-image" />
            <div class="product-body">
                <h3>{name}</h3>
                <p class="description">{description}</p>
                <div class="product-footer">
                    <span class="price">{price}</span>
                    <button class="btn btn-primary" on:click=add>"Add to Cart"</button>
                </div>
            </div>
        </div>
    }
}
