//! Video Upload

use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use super::media_ref;
use crate::state::AppContext;

#[component]
pub fn VideoUpload() -> impl IntoView {
    let ctx = AppContext::expect();
    let id = RwSignal::new(String::new());
    let url = RwSignal::new(String::new());
    let pending = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let ready = move || !id.with(|id| id.trim().is_empty()) && url.with(|url| media_ref(url).is_some());

    let submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get() {
            return;
        }
        let video_id = id.get().trim().to_string();
        let Some(blob) = media_ref(&url.get()).filter(|_| !video_id.is_empty()) else {
            return;
        };

        pending.set(true);
        error.set(None);
        ctx.mutate(
            move |queries| async move { queries.add_video(&video_id, &blob).await },
            move |result| {
                pending.set(false);
                match result {
                    Ok(()) => {
                        id.set(String::new());
                        url.set(String::new());
                    }
                    Err(e) => error.set(Some(e.user_message())),
                }
            },
        );
    };

    view! {
        <section class="card">
            <h2>"Upload Video"</h2>
            <form on:submit=submit>
                <label for="video-id">"Video ID"</label>
                <input
                    id="video-id"
                    placeholder="Enter video ID"
                    prop:value=move || id.get()
                    on:input=move |ev| id.set(event_target_value(&ev))
                    disabled=move || pending.get()
                />
                <label for="video-url">"Video File URL"</label>
                <input
                    id="video-url"
                    type="url"
                    placeholder="https://..."
                    prop:value=move || url.get()
                    on:input=move |ev| url.set(event_target_value(&ev))
                    disabled=move || pending.get()
                />
                {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                <button type="submit" class="btn btn-primary" disabled=move || !ready() || pending.get()>
                    "Upload Video"
                </button>
            </form>
        </section>
    }
}
