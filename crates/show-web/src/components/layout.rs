//! Site Chrome
//!
//! Header with the login button, the navigation bar and the footer.

use chrono::Datelike;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_location;
use show_core::auth::toggle_session;
use show_core::{IdentityProvider, LoginStatus};

use crate::state::{AppContext, use_query};

const LINKS: [(&str, &str); 4] = [
    ("/", "Home"),
    ("/videos", "Videos"),
    ("/store", "Store"),
    ("/podcast", "Podcast"),
];

fn link_class(current: &str, path: &str) -> &'static str {
    if current == path { "nav-link active" } else { "nav-link" }
}

#[component]
pub fn Header() -> impl IntoView {
    let ctx = AppContext::expect();
    let authenticated = ctx.authenticated;
    let (status, set_status) = signal(LoginStatus::Idle);

    let toggle = move |_| {
        if status.get_untracked().is_busy() {
            return;
        }
        if !authenticated.get_untracked() {
            set_status.set(LoginStatus::LoggingIn);
        }

        let ctx = ctx.clone();
        spawn_local(async move {
            let next = toggle_session(ctx.identity.as_ref(), &ctx.queries)
                .await
                .unwrap_or(LoginStatus::Failed);
            set_status.set(next);
            ctx.authenticated.set(ctx.identity.is_authenticated());
            ctx.refresh();
        });
    };

    view! {
        <header class="site-header">
            <a href="/" class="logo">
                <img src="/assets/SwS Green Vector v1.png" alt="Sittin with Shireen" />
            </a>
            <button
                class="btn btn-login"
                on:click=toggle
                disabled=move || status.get().is_busy()
            >
                {move || status.get().button_label(authenticated.get())}
            </button>
        </header>
    }
}

#[component]
pub fn Navigation() -> impl IntoView {
    let pathname = use_location().pathname;
    let is_admin = use_query(|queries| async move { queries.is_caller_admin().await });

    view! {
        <nav class="site-nav">
            {LINKS
                .into_iter()
                .map(|(path, label)| {
                    view! {
                        <a href=path class=move || link_class(&pathname.get(), path)>
                            {label}
                        </a>
                    }
                })
                .collect_view()}
            <Show when=move || is_admin.with(|state| state.ready() == Some(&true))>
                <a href="/admin" class=move || link_class(&pathname.get(), "/admin")>
                    "Admin"
                </a>
            </Show>
        </nav>
    }
}

#[component]
pub fn Footer() -> impl IntoView {
    let year = chrono::Utc::now().year();

    view! {
        <footer class="site-footer">
            <div class="footer-grid">
                <div>
                    <h3>"About Sittin with Shireen"</h3>
                    <p>
                        "Your favorite talk show bringing you real conversations, inspiring stories, and unforgettable moments."
                    </p>
                </div>
                <div>
                    <h3>"Quick Links"</h3>
                    <ul>
                        {LINKS
                            .into_iter()
                            .map(|(path, label)| view! { <li><a href=path>{label}</a></li> })
                            .collect_view()}
                    </ul>
                </div>
                <div>
                    <h3>"Connect With Us"</h3>
                    <div class="social">
                        <a href="#" aria-label="Facebook">"Facebook"</a>
                        <a href="#" aria-label="X (Twitter)">"X"</a>
                        <a href="#" aria-label="Instagram">"Instagram"</a>
                        <a href="#" aria-label="YouTube">"YouTube"</a>
                    </div>
                </div>
            </div>
            <p class="copyright">{format!("© {year} Sittin with Shireen. All rights reserved.")}</p>
        </footer>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_path_is_active() {
        assert_eq!(link_class("/store", "/store"), "nav-link active");
        assert_eq!(link_class("/store", "/"), "nav-link");
        assert_eq!(link_class("/", "/"), "nav-link active");
    }
}
