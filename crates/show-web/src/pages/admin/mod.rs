//! Admin Dashboard
//!
//! Content management for admins. Everyone else is sent back to the home
//! page as soon as the role read settles.

mod episodes;
mod products;
mod stripe;
mod videos;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use show_core::{BlobRef, QueryState};

use self::episodes::EpisodeManager;
use self::products::ProductManager;
use self::stripe::StripeSetup;
use self::videos::VideoUpload;
use crate::state::use_query;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum AdminTab {
    #[default]
    Videos,
    Products,
    Podcast,
    Stripe,
}

impl AdminTab {
    const ALL: [Self; 4] = [Self::Videos, Self::Products, Self::Podcast, Self::Stripe];

    fn label(self) -> &'static str {
        match self {
            Self::Videos => "Videos",
            Self::Products => "Products",
            Self::Podcast => "Podcast",
            Self::Stripe => "Stripe",
        }
    }
}

/// The role read has settled on something other than admin
fn should_leave(is_admin: &QueryState<bool>) -> bool {
    matches!(is_admin, QueryState::Ready(false) | QueryState::Failed(_))
}

/// Media fields take a URL; blank means no media chosen yet
fn media_ref(input: &str) -> Option<BlobRef> {
    let url = input.trim();
    (!url.is_empty()).then(|| BlobRef::from_url(url))
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let is_admin = use_query(|queries| async move { queries.is_caller_admin().await });
    let navigate = use_navigate();

    Effect::new(move |_| {
        if is_admin.with(should_leave) {
            navigate("/", NavigateOptions::default());
        }
    });

    view! {
        <Show
            when=move || is_admin.with(|state| state.ready() == Some(&true))
            fallback=|| view! { <div class="page loading">"Loading..."</div> }
        >
            <Dashboard />
        </Show>
    }
}

#[component]
fn Dashboard() -> impl IntoView {
    let tab = RwSignal::new(AdminTab::default());

    view! {
        <div class="page admin">
            <div class="page-header">
                <h1>"Admin Dashboard"</h1>
                <p class="subtitle">"Manage your content and settings"</p>
            </div>
            <div class="tabs" role="tablist">
                {AdminTab::ALL
                    .into_iter()
                    .map(|t| {
                        view! {
                            <button
                                role="tab"
                                class=move || if tab.get() == t { "tab active" } else { "tab" }
                                on:click=move |_| tab.set(t)
                            >
                                {t.label()}
                            </button>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="tab-panel">
                {move || match tab.get() {
                    AdminTab::Videos => view! { <VideoUpload /> }.into_any(),
                    AdminTab::Products => view! { <ProductManager /> }.into_any(),
                    AdminTab::Podcast => view! { <EpisodeManager /> }.into_any(),
                    AdminTab::Stripe => view! { <StripeSetup /> }.into_any(),
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_waits_for_role() {
        assert!(!should_leave(&QueryState::Loading));
        assert!(!should_leave(&QueryState::Ready(true)));
        assert!(should_leave(&QueryState::Ready(false)));
        assert!(should_leave(&QueryState::Failed("Backend error".into())));
    }

    #[test]
    fn test_media_ref() {
        assert_eq!(media_ref("   "), None);
        assert_eq!(
            media_ref(" https://cdn.example.com/a.mp4 "),
            Some(BlobRef::from_url("https://cdn.example.com/a.mp4"))
        );
    }
}
