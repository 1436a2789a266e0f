//! Player event listener keeping the skin in step with the engine

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::engine::{PlayerEngine, PlayerEvent, PlayerEventChannel};
use crate::page::SharedPage;
use crate::view::SkinView;

/// Maps engine events onto view updates. State is re-read from the engine
/// for every event, so duplicated or reordered delivery settles on the same
/// tree.
pub struct StateSync {
    engine: Arc<dyn PlayerEngine>,
    page: SharedPage,
    view: SkinView,
}

impl StateSync {
    pub fn new(engine: Arc<dyn PlayerEngine>, page: SharedPage, view: SkinView) -> Self {
        Self { engine, page, view }
    }

    pub async fn apply(&self, event: &PlayerEvent) -> Result<()> {
        tracing::trace!(instance = %self.view.binder().id(), event = event.name(), "Syncing skin");

        let instance = self.engine.instance();
        let audio = self.engine.audio();
        let mut page = self.page.lock().await;
        let doc = page.document_mut();

        match event {
            PlayerEvent::LoadedMetadata => {
                if let Some(audio) = &audio {
                    self.view.update_duration(doc, audio)?;
                }
                self.view.update_playlist(doc, &instance)?;
            }
            PlayerEvent::TimeUpdate => {
                if let Some(audio) = &audio {
                    self.view.update_time(doc, audio)?;
                }
            }
            PlayerEvent::LoadingProgress => {
                if let Some(audio) = &audio {
                    self.view.update_loading(doc, audio);
                }
            }
            PlayerEvent::VolumeChange => {
                if let Some(audio) = &audio {
                    self.view.update_volume(doc, audio);
                }
            }
            PlayerEvent::TrackInfoReady { track } => {
                if instance
                    .current_track()
                    .is_some_and(|current| current.source == track.source)
                {
                    self.view.update_track_info(doc, &instance)?;
                }
                self.view.update_playlist(doc, &instance)?;
            }
            PlayerEvent::PlaylistLoaded | PlayerEvent::PlaylistReordered => {
                self.view.update_playlist(doc, &instance)?;
            }
            PlayerEvent::TrackSwitched => {
                self.view.update_track_info(doc, &instance)?;
                self.view.update_active_track(doc, &instance);
            }
        }
        Ok(())
    }

    /// Applies events until the engine drops its sender.
    pub async fn run(self, mut event_channel: PlayerEventChannel) {
        loop {
            match event_channel.recv().await {
                Ok(event) => {
                    if let Err(e) = self.apply(&event).await {
                        tracing::error!(event = event.name(), error = %e, "Failed to sync skin");
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Every update re-reads full state, so the next event catches up
                    tracing::warn!(skipped, "Player event listener lagged");
                }
                Err(RecvError::Closed) => {
                    tracing::debug!(instance = %self.view.binder().id(), "Player event bus closed");
                    break;
                }
            }
        }
    }

    pub fn spawn(self, event_channel: PlayerEventChannel) -> JoinHandle<()> {
        tracing::info!(instance = %self.view.binder().id(), "Starting player event listener");
        tokio::spawn(self.run(event_channel))
    }
}
