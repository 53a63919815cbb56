//! Videos Page

use leptos::prelude::*;
use show_core::Video;

use super::list_view;
use crate::components::{VideoCard, VideoPlayer};
use crate::state::use_query;

#[component]
pub fn VideosPage() -> impl IntoView {
    let videos = use_query(|queries| async move { queries.videos().await });
    let selected = RwSignal::new(None::<Video>);

    view! {
        <div class="page videos">
            <div class="page-header">
                <h1>"Episodes"</h1>
                <p class="subtitle">"Watch full episodes and highlights from Sittin with Shireen"</p>
            </div>
            <section class="video-grid">
                {move || {
                    list_view(
                        videos.get(),
                        "No videos yet. Check back soon!",
                        |video| view! { <VideoCard video selected /> },
                    )
                }}
            </section>
            {move || selected.get().map(|video| view! { <VideoPlayer video selected /> })}
        </div>
    }
}
