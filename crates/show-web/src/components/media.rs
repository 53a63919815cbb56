//! Video and Podcast Players
//!
//! The podcast player mirrors an [`EpisodePlayer`] onto an `<audio>` element:
//! effects push play state and volume into the element, media events push
//! time and duration back.

use leptos::callback::{Callable, Callback};
use leptos::ev;
use leptos::html::Audio;
use leptos::prelude::*;
use leptos::task::spawn_local;
use show_core::playback::format_time;
use show_core::{Episode, EpisodePlayer, Video};
use wasm_bindgen_futures::JsFuture;

#[component]
pub fn VideoCard(video: Video, selected: RwSignal<Option<Video>>) -> impl IntoView {
    let title = format!("Video {}", video.id);
    let src = video.blob.direct_url().to_string();

    view! {
        <div class="video-card">
            <div class="video-thumb" on:click=move |_| selected.set(Some(video.clone()))>
                <video src=src preload="metadata"></video>
                <div class="play-overlay">"▶"</div>
            </div>
            <h3>{title}</h3>
        </div>
    }
}

/// Full-screen modal; closes on Escape, backdrop click or the close button
#[component]
pub fn VideoPlayer(video: Video, selected: RwSignal<Option<Video>>) -> impl IntoView {
    let close = move || selected.set(None);

    let escape = window_event_listener(ev::keydown, move |ev| {
        if ev.key() == "Escape" {
            selected.set(None);
        }
    });
    on_cleanup(move || escape.remove());

    view! {
        <div class="modal-backdrop" on:click=move |_| close()>
            <div class="modal" on:click=|ev| ev.stop_propagation()>
                <button class="modal-close" aria-label="Close video" on:click=move |_| close()>
                    "×"
                </button>
                <video
                    class="video-full"
                    src=video.blob.direct_url().to_string()
                    controls=true
                    autoplay=true
                ></video>
            </div>
        </div>
    }
}

#[component]
pub fn EpisodeCard(
    episode: Episode,
    #[prop(into)] playing: Signal<bool>,
    on_play: Callback<()>,
) -> impl IntoView {
    view! {
        <div class="episode-card">
            <button
                class="btn-play"
                aria-label=move || if playing.get() { "Pause" } else { "Play" }
                on:click=move |_| on_play.run(())
            >
                {move || if playing.get() { "⏸" } else { "▶" }}
            </button>
            <div class="episode-info">
                <h3>{episode.title}</h3>
                <p>{episode.description}</p>
            </div>
        </div>
    }
}

/// Bottom bar for the selected podcast episode
#[component]
pub fn AudioPlayer(
    episode: Episode,
    player: RwSignal<EpisodePlayer>,
    on_close: Callback<()>,
) -> impl IntoView {
    let audio_ref = NodeRef::<Audio>::new();

    Effect::new(move |_| {
        let playing = player.with(|p| p.playing);
        let Some(audio) = audio_ref.get() else { return };
        if !playing {
            let _ = audio.pause();
            return;
        }
        if let Ok(promise) = audio.play() {
            spawn_local(async move {
                if JsFuture::from(promise).await.is_err() {
                    player.update(|p| p.playing = false);
                }
            });
        }
    });

    Effect::new(move |_| {
        let volume = player.with(EpisodePlayer::effective_volume);
        if let Some(audio) = audio_ref.get() {
            audio.set_volume(volume);
        }
    });

    let seek = move |ev: ev::Event| {
        let Ok(time) = event_target_value(&ev).parse::<f64>() else { return };
        let Some(time) = player.try_update(|p| p.seek(time)) else { return };
        if let Some(audio) = audio_ref.get_untracked() {
            audio.set_current_time(time);
        }
    };

    let set_volume = move |ev: ev::Event| {
        if let Ok(volume) = event_target_value(&ev).parse::<f64>() {
            player.update(|p| p.set_volume(volume));
        }
    };

    view! {
        <div class="audio-player">
            <audio
                node_ref=audio_ref
                src=episode.url.clone()
                on:timeupdate=move |_| {
                    if let Some(audio) = audio_ref.get_untracked() {
                        player.update(|p| p.set_time(audio.current_time()));
                    }
                }
                on:loadedmetadata=move |_| {
                    if let Some(audio) = audio_ref.get_untracked() {
                        player.update(|p| p.set_duration(audio.duration()));
                    }
                }
                on:ended=move |_| player.update(|p| p.playing = false)
            ></audio>

            <button
                class="btn-play"
                aria-label=move || if player.with(|p| p.playing) { "Pause" } else { "Play" }
                on:click=move |_| player.update(EpisodePlayer::toggle_play)
            >
                {move || if player.with(|p| p.playing) { "⏸" } else { "▶" }}
            </button>

            <div class="audio-main">
                <h4 class="audio-title">{episode.title}</h4>
                <div class="audio-seek">
                    <span>{move || format_time(player.with(|p| p.current_time))}</span>
                    <input
                        type="range"
                        min="0"
                        step="1"
                        max=move || player.with(EpisodePlayer::seek_max).to_string()
                        prop:value=move || player.with(|p| p.current_time).to_string()
                        on:input=seek
                    />
                    <span>{move || format_time(player.with(|p| p.duration))}</span>
                </div>
            </div>

            <div class="audio-volume">
                <button
                    aria-label=move || if player.with(|p| p.muted) { "Unmute" } else { "Mute" }
                    on:click=move |_| player.update(EpisodePlayer::toggle_mute)
                >
                    {move || if player.with(|p| p.muted) { "🔇" } else { "🔊" }}
                </button>
                <input
                    type="range"
                    min="0"
                    max="1"
                    step="0.01"
                    prop:value=move || player.with(EpisodePlayer::effective_volume).to_string()
                    on:input=set_volume
                />
            </div>

            <button class="btn-close" aria-label="Close player" on:click=move |_| on_close.run(())>
                "×"
            </button>
        </div>
    }
}
