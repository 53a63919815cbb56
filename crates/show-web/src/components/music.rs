//! Background Music

use leptos::html::Audio;
use leptos::prelude::*;
use leptos::task::spawn_local;
use show_core::BackgroundMusic;
use wasm_bindgen_futures::JsFuture;

use crate::browser::LocalStorage;
use crate::state::AppContext;

const TRACK_URL: &str = "https://www.bensound.com/bensound-music/bensound-ukulele.mp3";

/// Floating control in the bottom-right corner
#[component]
pub fn BackgroundMusicPlayer() -> impl IntoView {
    let music = AppContext::expect().music;
    let audio_ref = NodeRef::<Audio>::new();

    Effect::new(move |_| {
        let playing = music.with(|m| m.playing);
        let Some(audio) = audio_ref.get() else { return };
        audio.set_loop(true);
        if !playing {
            let _ = audio.pause();
            return;
        }
        if let Ok(promise) = audio.play() {
            spawn_local(async move {
                // browsers refuse autoplay until the first interaction
                if JsFuture::from(promise).await.is_err() {
                    music.update(BackgroundMusic::autoplay_blocked);
                }
            });
        }
    });

    Effect::new(move |_| {
        let volume = music.with(BackgroundMusic::effective_volume);
        if let Some(audio) = audio_ref.get() {
            audio.set_volume(volume);
        }
    });

    let set_volume = move |ev: leptos::ev::Event| {
        if let Ok(volume) = event_target_value(&ev).parse::<f64>() {
            music.update(|m| m.set_volume(volume, &LocalStorage));
        }
    };

    view! {
        <div class="music-player">
            <audio node_ref=audio_ref src=TRACK_URL></audio>
            <button
                aria-label=move || if music.with(|m| m.playing) { "Pause music" } else { "Play music" }
                on:click=move |_| music.update(|m| m.toggle_play(&LocalStorage))
            >
                {move || if music.with(|m| m.playing) { "⏸" } else { "♪" }}
            </button>
            <button
                aria-label=move || if music.with(|m| m.muted) { "Unmute music" } else { "Mute music" }
                on:click=move |_| music.update(|m| m.toggle_mute(&LocalStorage))
            >
                {move || if music.with(|m| m.muted) { "🔇" } else { "🔊" }}
            </button>
            <input
                type="range"
                min="0"
                max="1"
                step="0.01"
                prop:value=move || music.with(BackgroundMusic::effective_volume).to_string()
                on:input=set_volume
            />
        </div>
    }
}
