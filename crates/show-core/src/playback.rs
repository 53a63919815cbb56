//! Playback State
//!
//! Background music and the podcast episode player. Both are plain state
//! machines; the web layer mirrors them onto `<audio>` elements.

use serde::{Deserialize, Serialize};

/// Key/value persistence for user preferences (localStorage in the browser)
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

pub const VOLUME_KEY: &str = "bgMusicVolume";
pub const MUTED_KEY: &str = "bgMusicMuted";
pub const PLAYING_KEY: &str = "bgMusicPlaying";

const DEFAULT_MUSIC_VOLUME: f64 = 0.3;
const UNMUTE_FALLBACK_VOLUME: f64 = 0.5;

/// Site-wide background music
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackgroundMusic {
    pub playing: bool,
    pub volume: f64,
    pub muted: bool,
}

impl Default for BackgroundMusic {
    fn default() -> Self {
        Self {
            playing: true,
            volume: DEFAULT_MUSIC_VOLUME,
            muted: false,
        }
    }
}

impl BackgroundMusic {
    /// Restore saved preferences; anything missing or unparsable keeps its default
    pub fn load(store: &dyn PreferenceStore) -> Self {
        let mut music = Self::default();
        if let Some(volume) = store.get(VOLUME_KEY).and_then(|v| v.parse::<f64>().ok()) {
            music.volume = volume.clamp(0.0, 1.0);
        }
        music.muted = store.get(MUTED_KEY).as_deref() == Some("true");
        music.playing = store.get(PLAYING_KEY).as_deref() != Some("false");
        music
    }

    /// Volume to apply to the audio element
    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    pub fn toggle_play(&mut self, store: &dyn PreferenceStore) {
        self.playing = !self.playing;
        store.set(PLAYING_KEY, bool_str(self.playing));
    }

    /// Autoplay was refused by the browser
    pub fn autoplay_blocked(&mut self) {
        self.playing = false;
    }

    pub fn set_volume(&mut self, volume: f64, store: &dyn PreferenceStore) {
        self.volume = volume.clamp(0.0, 1.0);
        store.set(VOLUME_KEY, &self.volume.to_string());
    }

    pub fn toggle_mute(&mut self, store: &dyn PreferenceStore) {
        self.muted = !self.muted;
        store.set(MUTED_KEY, bool_str(self.muted));
    }
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// Podcast player for the selected episode
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodePlayer {
    pub episode_id: String,
    pub playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
}

impl EpisodePlayer {
    /// Opening an episode starts playback at full volume
    pub fn open(episode_id: impl Into<String>) -> Self {
        Self {
            episode_id: episode_id.into(),
            playing: true,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
        }
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    /// Metadata loaded
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    }

    /// `timeupdate` from the element
    pub fn set_time(&mut self, time: f64) {
        self.current_time = time.max(0.0);
    }

    /// Seek, clamped to the known duration
    pub fn seek(&mut self, time: f64) -> f64 {
        let upper = if self.duration > 0.0 { self.duration } else { f64::MAX };
        self.current_time = time.clamp(0.0, upper);
        self.current_time
    }

    /// Slider upper bound; 100 until metadata arrives
    pub fn seek_max(&self) -> f64 {
        if self.duration > 0.0 { self.duration } else { 100.0 }
    }

    /// Volume slider; dragging to zero counts as muting
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = self.volume == 0.0;
    }

    pub fn toggle_mute(&mut self) {
        if self.muted {
            if self.volume == 0.0 {
                self.volume = UNMUTE_FALLBACK_VOLUME;
            }
            self.muted = false;
        } else {
            self.muted = true;
        }
    }

    pub fn effective_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }
}

/// `m:ss` as shown under the seek bar
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".into();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStore(RefCell<HashMap<String, String>>);

    impl PreferenceStore for MapStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) {
            self.0.borrow_mut().insert(key.into(), value.into());
        }
    }

    #[test]
    fn test_music_defaults_without_saved_state() {
        let music = BackgroundMusic::load(&MapStore::default());
        assert!(music.playing);
        assert!(!music.muted);
        assert!((music.volume - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_music_preferences_round_trip_through_store() {
        let store = MapStore::default();
        let mut music = BackgroundMusic::load(&store);
        music.set_volume(0.8, &store);
        music.toggle_mute(&store);
        music.toggle_play(&store);

        let restored = BackgroundMusic::load(&store);
        assert_eq!(restored, music);
        assert!(restored.effective_volume().abs() < f64::EPSILON);
    }

    #[test]
    fn test_unmute_restores_volume() {
        let store = MapStore::default();
        let mut music = BackgroundMusic::load(&store);
        music.set_volume(0.6, &store);
        music.toggle_mute(&store);
        music.toggle_mute(&store);
        assert!((music.effective_volume() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn test_player_seek_is_clamped() {
        let mut player = EpisodePlayer::open("e1");
        player.set_duration(120.0);
        assert!((player.seek(500.0) - 120.0).abs() < f64::EPSILON);
        assert!(player.seek(-3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_player_zero_volume_mutes_and_unmute_falls_back() {
        let mut player = EpisodePlayer::open("e1");
        player.set_volume(0.0);
        assert!(player.muted);

        player.toggle_mute();
        assert!(!player.muted);
        assert!((player.effective_volume() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }
}
