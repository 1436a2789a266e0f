//! Widget instance snapshot and audio status

use serde::{Deserialize, Serialize};

use super::track::Track;

/// Player options the skin reflects.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetOptions {
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    pub shuffle: bool,
    /// Shown by `track-info--albumCover` when a track carries no art.
    #[serde(rename = "defaultAlbumCover")]
    pub default_album_cover: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    #[serde(default)]
    pub list: Vec<Track>,
}

/// The player-side state of one widget on the page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WidgetInstance {
    /// Unique per page; becomes the mount element's id.
    pub id: String,
    pub options: WidgetOptions,
    pub playlists: Vec<Playlist>,
    pub current_playlist_index: Option<usize>,
    /// Position in `playback_order`, not a storage index.
    pub current_track_index: usize,
    /// Storage indices into the current playlist, in display order.
    pub playback_order: Vec<usize>,
}

impl WidgetInstance {
    pub fn current_playlist(&self) -> Option<&Playlist> {
        self.playlists.get(self.current_playlist_index?)
    }

    pub fn current_track(&self) -> Option<&Track> {
        let storage_index = *self.playback_order.get(self.current_track_index)?;
        self.current_playlist()?.list.get(storage_index)
    }

    /// Tracks of the current playlist in playback order, paired with their
    /// position in that order. Order entries pointing past the list are skipped.
    pub fn ordered_tracks(&self) -> Vec<(usize, &Track)> {
        let Some(playlist) = self.current_playlist() else {
            return Vec::new();
        };
        self.playback_order
            .iter()
            .filter_map(|index| playlist.list.get(*index))
            .enumerate()
            .collect()
    }
}

/// Live state of the audio element, when one is attached.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioStatus {
    /// Seconds; `0.0` until metadata is known.
    pub duration: f64,
    pub current_time: f64,
    /// `0.0..=1.0`
    pub volume: f64,
    pub loaded_percent: f64,
}
