//! Episode Manager

use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use show_core::Episode;
use show_core::draft::{EpisodeDraft, new_id};

use crate::browser;
use crate::pages::list_view;
use crate::state::{AppContext, use_query};

#[component]
pub fn EpisodeManager() -> impl IntoView {
    let ctx = AppContext::expect();
    let episodes = use_query(|queries| async move { queries.episodes().await });

    let editing = RwSignal::new(None::<String>);
    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let url = RwSignal::new(String::new());
    let pending = RwSignal::new(false);
    let error = RwSignal::new(None::<String>);

    let draft = move || EpisodeDraft {
        title: title.get(),
        description: description.get(),
        url: url.get(),
    };

    let reset = move || {
        editing.set(None);
        title.set(String::new());
        description.set(String::new());
        url.set(String::new());
        error.set(None);
    };

    let edit = move |episode: &Episode| {
        let draft = EpisodeDraft::from_episode(episode);
        editing.set(Some(episode.id.clone()));
        title.set(draft.title);
        description.set(draft.description);
        url.set(draft.url);
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
            let id = existing.clone().unwrap_or_else(|| new_id("episode", browser::now_millis()));
            let episode = match draft().into_episode(id) {
                Ok(episode) => episode,
                Err(e) => {
                    error.set(Some(e.user_message()));
                    return;
                }
            };

            pending.set(true);
            ctx.mutate(
                move |queries| async move {
                    if existing.is_some() {
                        queries.update_episode(&episode).await
                    } else {
                        queries.add_episode(&episode).await
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
        if !browser::confirm("Are you sure you want to delete this episode?") {
            return;
        }
        ctx.mutate(
            move |queries| async move { queries.delete_episode(&id).await },
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
                <h2>{move || if editing.get().is_some() { "Edit Episode" } else { "Add Episode" }}</h2>
                <form on:submit=submit>
                    <label for="episode-title">"Episode Title"</label>
                    <input
                        id="episode-title"
                        placeholder="Enter episode title"
                        prop:value=move || title.get()
                        on:input=move |ev| title.set(event_target_value(&ev))
                    />
                    <label for="episode-description">"Description"</label>
                    <textarea
                        id="episode-description"
                        placeholder="Enter episode description"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                    <label for="episode-url">"Audio URL"</label>
                    <input
                        id="episode-url"
                        type="url"
                        placeholder="https://example.com/audio.mp3"
                        prop:value=move || url.get()
                        on:input=move |ev| url.set(event_target_value(&ev))
                    />
                    {move || error.get().map(|message| view! { <p class="error">{message}</p> })}
                    <div class="form-actions">
                        <button
                            type="submit"
                            class="btn btn-primary"
                            disabled=move || !draft().is_submittable() || pending.get()
                        >
                            {move || if editing.get().is_some() { "Update Episode" } else { "Add Episode" }}
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
                <h2>"Existing Episodes"</h2>
                {move || {
                    let delete = delete.clone();
                    list_view(
                        episodes.get(),
                        "No episodes yet",
                        move |episode| {
                            let delete = delete.clone();
                            let id = episode.id.clone();
                            let heading = episode.title.clone();
                            let blurb = episode.description.clone();
                            view! {
                                <div class="manager-row">
                                    <div class="manager-row-info">
                                        <h4>{heading}</h4>
                                        <p>{blurb}</p>
                                    </div>
                                    <button class="btn btn-outline" on:click=move |_| edit(&episode)>
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
