//! Page Components

mod admin;
mod home;
mod payment;
mod podcast;
mod store;
mod videos;

pub use admin::AdminPage;
pub use home::HomePage;
pub use payment::{PaymentFailurePage, PaymentSuccessPage};
pub use podcast::PodcastPage;
pub use store::StorePage;
pub use videos::VideosPage;

use leptos::prelude::*;
use show_core::QueryState;

/// Render a list read: loading, failure, empty message or one view per item
fn list_view<T, V>(state: QueryState<Vec<T>>, empty: &'static str, item: impl FnMut(T) -> V) -> AnyView
where
    V: IntoView + Send + 'static,
{
    match state {
        QueryState::Loading => view! { <p class="loading">"Loading..."</p> }.into_any(),
        QueryState::Failed(message) => view! { <p class="error">{message}</p> }.into_any(),
        QueryState::Ready(items) if items.is_empty() => view! { <p class="empty">{empty}</p> }.into_any(),
        QueryState::Ready(items) => items.into_iter().map(item).collect_view().into_any(),
    }
}
