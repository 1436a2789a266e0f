//! View module - skin rendering
//!
//! Every routine here is a pure function of the snapshot it is handed: the
//! view keeps no copy of player state, so re-applying the same snapshot
//! always yields the same tree.
//!
//! - `time`: clock formatting
//! - `binder`: lookups scoped to one widget
//! - `playlist`: template-driven playlist rendering and the playlist selector
//! - `progress`: time displays and slider fills
//! - `track_info`: current-track details
//! - `controls`: checkbox state and content slots

mod binder;
mod controls;
mod playlist;
mod progress;
mod time;
mod track_info;

use anyhow::Result;
use indextree::NodeId;

use crate::dom::Document;
use crate::model::{AudioStatus, WidgetInstance};

pub use binder::ElementBinder;
pub use controls::{SLOT_CLASS, TOGGLE_LOOP_CLASS, TOGGLE_SHUFFLE_CLASS};
pub use playlist::{
    ACTIVE_CLASS, INDEX_ATTR, ITEM_CLASS, LIST_ITEM_CLASS, PLAYLIST_CLASS, PLAYLIST_SELECT_CLASS,
    TEMPLATE_CLASS,
};
pub use progress::{fill_dimension, PLAYBACK_BAR_CLASS, SLIDER_CLASS, SLIDER_VERTICAL_CLASS, VOLUME_BAR_CLASS};
pub use time::format_time;
pub use track_info::TRACK_INFO_CLASS;

/// Renders one widget instance into its mounted skin.
#[derive(Clone, Debug)]
pub struct SkinView {
    binder: ElementBinder,
    default_album_cover: String,
}

impl SkinView {
    pub fn new(binder: ElementBinder, default_album_cover: impl Into<String>) -> Self {
        Self {
            binder,
            default_album_cover: default_album_cover.into(),
        }
    }

    pub fn binder(&self) -> &ElementBinder {
        &self.binder
    }

    /// One-time setup right after the graft: slots, checkboxes, the playlist
    /// selector, the playlist itself and the current track's details.
    pub fn set_ui_elements(&self, doc: &mut Document, instance: &WidgetInstance, content: NodeId) -> Result<()> {
        controls::fill_slots(doc, &self.binder, content)?;
        controls::update_checkboxes(doc, &self.binder, &instance.options);
        self.update_playlist_list(doc, instance)?;
        self.update_playlist(doc, instance)?;
        self.update_track_info(doc, instance)
    }

    pub fn update_checkboxes(&self, doc: &mut Document, instance: &WidgetInstance) {
        controls::update_checkboxes(doc, &self.binder, &instance.options);
    }

    pub fn update_playlist_list(&self, doc: &mut Document, instance: &WidgetInstance) -> Result<()> {
        playlist::update_playlist_list(doc, &self.binder, instance)
    }

    pub fn update_playlist(&self, doc: &mut Document, instance: &WidgetInstance) -> Result<()> {
        playlist::update_playlist(doc, &self.binder, instance)
    }

    pub fn update_active_track(&self, doc: &mut Document, instance: &WidgetInstance) {
        playlist::update_active_track(doc, &self.binder, instance);
    }

    /// No-op while there is no current track.
    pub fn update_track_info(&self, doc: &mut Document, instance: &WidgetInstance) -> Result<()> {
        let Some(track) = instance.current_track() else {
            tracing::trace!(instance = %self.binder.id(), "No current track, track info skipped");
            return Ok(());
        };
        let cover = if instance.options.default_album_cover.is_empty() {
            self.default_album_cover.as_str()
        } else {
            instance.options.default_album_cover.as_str()
        };
        track_info::update_track_info(doc, &self.binder, track, cover)
    }

    pub fn update_duration(&self, doc: &mut Document, audio: &AudioStatus) -> Result<()> {
        progress::update_playback_duration(doc, &self.binder, audio.duration)
    }

    /// Elapsed time, time left and the progress fill.
    pub fn update_time(&self, doc: &mut Document, audio: &AudioStatus) -> Result<()> {
        progress::update_playback_time(doc, &self.binder, audio.current_time)?;
        progress::update_playback_time_left(doc, &self.binder, audio.current_time, audio.duration)?;
        progress::update_playback_progress(doc, &self.binder, audio);
        Ok(())
    }

    pub fn update_loading(&self, doc: &mut Document, audio: &AudioStatus) {
        progress::update_loading_progress(doc, &self.binder, audio.loaded_percent);
    }

    pub fn update_volume(&self, doc: &mut Document, audio: &AudioStatus) {
        progress::update_volume(doc, &self.binder, audio.volume);
    }
}
