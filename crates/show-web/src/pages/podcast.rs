//! Podcast Page

use leptos::callback::Callback;
use leptos::prelude::*;
use show_core::{Episode, EpisodePlayer};

use super::list_view;
use crate::components::{AudioPlayer, EpisodeCard};
use crate::state::use_query;

/// Clicking the playing episode toggles it; any other episode replaces it
fn select_episode(selected: RwSignal<Option<Episode>>, player: RwSignal<EpisodePlayer>, episode: Episode) {
    let current = selected.with_untracked(|s| s.as_ref().is_some_and(|e| e.id == episode.id));
    if current {
        player.update(EpisodePlayer::toggle_play);
    } else {
        player.set(EpisodePlayer::open(episode.id.clone()));
        selected.set(Some(episode));
    }
}

#[component]
pub fn PodcastPage() -> impl IntoView {
    let episodes = use_query(|queries| async move { queries.episodes().await });
    let selected = RwSignal::new(None::<Episode>);
    let player = RwSignal::new(EpisodePlayer::open(String::new()));

    let on_close = Callback::new(move |()| {
        player.update(|p| p.playing = false);
        selected.set(None);
    });

    let card = move |episode: Episode| {
        let id = episode.id.clone();
        let playing = Signal::derive(move || player.with(|p| p.playing && p.episode_id == id));
        let clicked = episode.clone();
        let on_play = Callback::new(move |()| select_episode(selected, player, clicked.clone()));
        view! { <EpisodeCard episode playing on_play /> }
    };

    view! {
        <div class="page podcast">
            <div class="page-header">
                <h1>"Podcast Episodes"</h1>
                <p class="subtitle">"Listen to extended conversations and exclusive content"</p>
            </div>
            <section class="episode-list">
                {move || list_view(episodes.get(), "No episodes yet. Check back soon!", card)}
            </section>
            {move || {
                selected.get().map(|episode| view! { <AudioPlayer episode player on_close /> })
            }}
        </div>
    }
}
