//! Store Page

use leptos::prelude::*;

use super::list_view;
use crate::components::{ProductCard, ShoppingCart};
use crate::state::use_query;

#[component]
pub fn StorePage() -> impl IntoView {
    let products = use_query(|queries| async move { queries.products().await });

    view! {
        <div class="page store">
            <div class="page-header">
                <h1>"Official Merchandise"</h1>
                <p class="subtitle">"Show your support with exclusive Sittin with Shireen merch"</p>
            </div>
            <div class="store-layout">
                <section class="product-grid">
                    {move || {
                        list_view(
                            products.get(),
                            "No products available yet. Check back soon!",
                            |product| view! { <ProductCard product /> },
                        )
                    }}
                </section>
                <ShoppingCart />
            </div>
        </div>
    }
}
