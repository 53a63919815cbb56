//! Main App Component

use leptos::prelude::*;
use leptos_router::{components::*, path};

use crate::components::{BackgroundMusicPlayer, Footer, Header, Navigation, ProfileSetup};
use crate::pages::{
    AdminPage, HomePage, PaymentFailurePage, PaymentSuccessPage, PodcastPage, StorePage,
    VideosPage,
};
use crate::state::AppContext;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    AppContext::provide();

    view! {
        <Router>
            <div class="app">
                <Header />
                <Navigation />
                <main class="content">
                    <Routes fallback=|| view! { <p class="not-found">"Page not found"</p> }>
                        <Route path=path!("/") view=HomePage />
                        <Route path=path!("/videos") view=VideosPage />
                        <Route path=path!("/store") view=StorePage />
                        <Route path=path!("/podcast") view=PodcastPage />
                        <Route path=path!("/admin") view=AdminPage />
                        <Route path=path!("/payment-success") view=PaymentSuccessPage />
                        <Route path=path!("/payment-failure") view=PaymentFailurePage />
                    </Routes>
                </main>
                <Footer />
                <ProfileSetup />
                <BackgroundMusicPlayer />
            </div>
        </Router>
    }
}
