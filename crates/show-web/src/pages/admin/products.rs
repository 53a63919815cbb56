//! Product Manager

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use show_core::draft::{ProductDraft, new_id};
use show_core::model::format_usd;
use show_core::Product;

use super::media_ref;
use crate::browser;
use crate::pages::list_view;
use crate::state::{AppContext, use_query};

#[component]
pub fn ProductManager() -> impl IntoView {
    let ctx = AppContext::expect();
    let products = use_query(|queries| async move { queries.products().await });

    let editing = RwSignal::new(None::<String>);
    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let price = RwSignal::new(String::new());
    let image = RwSignal::new(String::new());
    let pending = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let draft = move || ProductDraft {
        name: name.get(),
        description: description.get(),
        price: price.get(),
        image: media_ref(&image.get()),
    };

    let reset = move || {
        editing.set(None);
        name.set(String::new());
        description.set(String::new());
        price.set(String::new());
        image.set(String::new());
        error.set(None);
    };

    let edit = move |product: &Product| {
        let draft = ProductDraft::from_product(product);
        editing.set(Some(product.id.clone()));
        name.set(draft.name);
        description.set(draft.description);
        price.set(draft.price);
        image.set(draft.image.map(|blob| blob.direct_url().to_string()).unwrap_or_default());
        error.set(None);
    };

    let submit = {
        let ctx = ctx.clone();
        move |ev: SubmitEvent| {
            ev.prevent_default();
            if pending.get() {
                return;
            }
            let existing = editing.get();
            let id = existing.clone().unwrap_or_else(|| new_id("product", browser::now_millis()));
            let product = match draft().into_product(id) {
                Ok(product) => product,
                Err(e) => {
                    error.set(Some(e.user_message()));
                    return;
                }
            };

            pending.set(true);
            ctx.mutate(
                move |queries| async move {
                    if existing.is_some() {
                        queries.update_product(&product).await
                    } else {
                        queries.add_product(&product).await
                    }
                },
                move |result| {
                    pending.set(false);
                    match result {
                        Ok(()) => reset(),
                        Err(e) => error.set(Some(e.user_message())),
                    }
                },
            );
        }
    };

    let delete = move |id: String| {
        if !browser::confirm("Are you sure you want to delete this product?") {
            return;
        }
        ctx.mutate(
            move |queries| async move { queries.delete_product(&id).await },
            move |result| {
                if let Err(e) = result {
                    error.set(Some(e.user_message()));
                }
            },
        );
    };

    view! {
        <div class="manager">
            <section class="card">
                <h2>{move || if editing.get().is_some() { "Edit Product" } else { "Add Product" }}</h2>
                <form on:submit=submit>
                    <label for="product-name">"Product Name"</label>
                    <input
                        id="product-name"
                        placeholder="Enter product name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                    <label for="product-description">"Description"</label>
                    <textarea
                        id="product-description"
                        placeholder="Enter product description"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                    <label for="product-price">"Price (USD)"</label>
                    <input
                        id="product-price"
                        type="number"
                        step="0.01"
                        placeholder="0.00"
                        prop:value=move || price.get()
                        on:input=move |ev| price.set(event_target_value(&ev))
                    />
                    <label for="product-image">"Product Image URL"</label>
                    <input
                        id="product-image"
                        type="url"
                        placeholder="https://..."
                        prop:value=move || image.get()
                        on:input=move |ev| image.set(event_target_value(&ev))
                    />
                    {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                    <div class="form-actions">
                        <button
                            type="submit"
                            class="btn btn-primary"
                            disabled=move || !draft().is_submittable() || pending.get()
                        >
                            {move || if editing.get().is_some() { "Update Product" } else { "Add Product" }}
                        </button>
                        <Show when=move || editing.get().is_some()>
                            <button type="button" class="btn btn-outline" on:click=move |_| reset()>
                                "Cancel"
                            </button>
                        </Show>
                    </div>
                </form>
            </section>

            <section class="card">
                <h2>"Existing Products"</h2>
                {move || {
                    let delete = delete.clone();
                    list_view(
                        products.get(),
                        "No products yet",
                        move |product| {
                            let delete = delete.clone();
                            let id = product.id.clone();
                            let src = product.image.direct_url().to_string();
                            let title = product.name.clone();
                            let blurb = product.description.clone();
                            let cost = format_usd(product.price());
                            view! {
                                <div class="manager-row">
                                    <img src=src alt=title.clone() />
                                    <div class="manager-row-info">
                                        <h4>{title}</h4>
                                        <p>{blurb}</p>
                                        <p class="price">{cost}</p>
                                    </div>
                                    <button class="btn btn-outline" on:click=move |_| edit(&product)>
                                        "Edit"
                                    </button>
                                    <button
                                        class="btn btn-danger"
                                        on:click=move |_| delete(id.clone())
                                    >
                                        "Delete"
                                    </button>
                                </div>
                            }
                        },
                    )
                }}
            </section>
        </div>
    }
}
