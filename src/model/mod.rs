//! Model module - state the skin reads back from the player engine
//!
//! None of this is owned by the skin engine: the player engine hands out
//! snapshots on demand and every UI mutation re-reads them.
//!
//! - `track`: tracks and their free-form info fields
//! - `instance`: the widget instance (playlists, ordering, options) and audio status

mod instance;
mod track;

pub use instance::{AudioStatus, Playlist, WidgetInstance, WidgetOptions};
pub use track::{
    display_value, is_present, Track, TrackInfo, ALBUM_COVER_FIELD, DURATION_FIELD, NAME_FIELD,
};
