//! First-Login Profile Prompt

use leptos::prelude::*;
use show_core::{QueryState, UserProfile};

use crate::state::{AppContext, use_query};

/// Modal asking a signed-in caller without a profile for their name
#[component]
pub fn ProfileSetup() -> impl IntoView {
    let authenticated = AppContext::expect().authenticated;
    let profile = use_query(|queries| async move { queries.caller_profile().await });

    let missing = move || {
        authenticated.get() && profile.with(|state| matches!(state, QueryState::Ready(None)))
    };

    view! {
        <Show when=missing>
            <ProfileDialog />
        </Show>
    }
}

#[component]
fn ProfileDialog() -> impl IntoView {
    let ctx = AppContext::expect();
    let name = RwSignal::new(String::new());
    let pending = RwSignal::new(false);

    let save = move |_| {
        let trimmed = name.get().trim().to_string();
        if trimmed.is_empty() || pending.get() {
            return;
        }
        pending.set(true);
        let profile = UserProfile { name: trimmed };
        ctx.mutate(
            move |queries| async move { queries.save_caller_profile(&profile).await },
            move |_| pending.set(false),
        );
    };

    view! {
        <div class="dialog-backdrop">
            <div class="dialog" role="dialog">
                <h2>"Welcome to Sittin with Shireen!"</h2>
                <p>"Please tell us your name to get started."</p>
                <label for="profile-name">"Your Name"</label>
                <input
                    id="profile-name"
                    type="text"
                    placeholder="Enter your name"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                    disabled=move || pending.get()
                />
                <button
                    class="btn btn-primary"
                    on:click=save
                    disabled=move || name.with(|n| n.trim().is_empty()) || pending.get()
                >
                    "Continue"
                </button>
            </div>
        </div>
    }
}
