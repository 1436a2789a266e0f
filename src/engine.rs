//! Contract with the player engine
//!
//! The skin engine never decodes or schedules audio. It reads state through
//! [`PlayerEngine`] snapshots, issues commands through the same trait, and
//! listens to the engine's event bus.

use tokio::sync::broadcast;

use crate::model::{AudioStatus, Track, WidgetInstance};

/// Events published on the player engine's bus.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerEvent {
    LoadedMetadata,
    TimeUpdate,
    LoadingProgress,
    VolumeChange,
    TrackInfoReady { track: Track },
    PlaylistLoaded,
    PlaylistReordered,
    TrackSwitched,
}

impl PlayerEvent {
    /// Event name as the engine publishes it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadedMetadata => "loadedmetadata",
            Self::TimeUpdate => "timeupdate",
            Self::LoadingProgress => "loadingProgress",
            Self::VolumeChange => "volumechange",
            Self::TrackInfoReady { .. } => "trackInfoReady",
            Self::PlaylistLoaded => "playlistLoaded",
            Self::PlaylistReordered => "playlistReordered",
            Self::TrackSwitched => "trackSwitched",
        }
    }
}

pub type PlayerEventChannel = broadcast::Receiver<PlayerEvent>;

pub trait PlayerEngine: Send + Sync {
    /// Fresh snapshot of the widget instance this engine drives.
    fn instance(&self) -> WidgetInstance;

    /// `None` while no audio element is attached.
    fn audio(&self) -> Option<AudioStatus>;

    fn subscribe(&self) -> PlayerEventChannel;

    fn play_from_start(&self);
    fn play(&self);
    fn pause(&self);
    fn stop(&self);
    fn next_track(&self);
    fn prev_track(&self);
    fn toggle_loop(&self);
    fn toggle_shuffle(&self);
    fn seek_to(&self, seconds: f64);
    /// `volume` is already normalized to `0.0..=1.0`.
    fn change_volume(&self, volume: f64);
    fn change_playback_rate(&self, rate: f64);
    /// `index` is a position in the playback order.
    fn switch_track(&self, index: usize, user_initiated: bool);
    fn switch_playlist(&self, index: usize);
}
