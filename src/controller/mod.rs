//! Controller module - skin lifecycle and event handling
//!
//! The controller grafts a skin into the page, wires host input to engine
//! commands, and keeps the skin synchronized with engine events.
//! It is organized into submodules by responsibility:
//!
//! - `input`: pointer/touch/form input routing and drag sessions
//! - `player_events`: engine event listener

mod input;
mod player_events;

use std::sync::Arc;

use anyhow::{bail, Result};
use indextree::NodeId;
use tokio::task::JoinHandle;

use crate::config::SkinConfig;
use crate::engine::PlayerEngine;
use crate::page::SharedPage;
use crate::skin::{SkinBundle, SkinFetcher, SkinLoader};
use crate::view::{ElementBinder, SkinView};

pub use input::{
    clamp_position, control_of, resolve_control, slider_command, slider_position, Command, Control,
    ControlEventRouter, DragSession, InputEvent, InputOutcome, CONTROL_TABLE, PLAYBACK_RATE_CLASS,
};
pub use player_events::StateSync;

/// Owns one widget instance's skin binding.
pub struct SkinController {
    engine: Arc<dyn PlayerEngine>,
    page: SharedPage,
    loader: SkinLoader,
    bundle: SkinBundle,
    default_album_cover: String,
    mount: Option<NodeId>,
    router: Option<ControlEventRouter>,
    event_listener: Option<JoinHandle<()>>,
}

impl SkinController {
    pub fn new(
        engine: Arc<dyn PlayerEngine>,
        page: SharedPage,
        fetcher: Arc<dyn SkinFetcher>,
        skin_path: impl Into<String>,
        config: &SkinConfig,
    ) -> Self {
        Self {
            engine,
            page,
            loader: SkinLoader::new(fetcher, config.mount_class.clone()),
            bundle: SkinBundle::new(skin_path),
            default_album_cover: config.default_album_cover.clone(),
            mount: None,
            router: None,
            event_listener: None,
        }
    }

    /// Loads the skin in place of `placeholder`, renders the initial state,
    /// then starts routing input and listening for engine events.
    ///
    /// Fails with [`crate::SkinError`] when the skin cannot be fetched or
    /// grafted; the page is left untouched apart from the style asset.
    pub async fn init(&mut self, placeholder: NodeId) -> Result<()> {
        if self.mount.is_some() {
            bail!("Skin controller for {} is already initialized", self.bundle.path);
        }

        let instance = self.engine.instance();
        let loaded = self
            .loader
            .load(&self.page, &mut self.bundle, placeholder, &instance.id)
            .await?;

        let binder = ElementBinder::new(instance.id.clone(), loaded.mount);
        let view = SkinView::new(binder.clone(), self.default_album_cover.clone());
        // Subscribe before the first render so nothing published meanwhile is lost
        let event_channel = self.engine.subscribe();
        {
            let mut page = self.page.lock().await;
            let doc = page.document_mut();
            view.set_ui_elements(doc, &instance, loaded.content)?;
            doc.remove_node(loaded.content);
        }

        self.router = Some(ControlEventRouter::new(
            self.engine.clone(),
            self.page.clone(),
            binder,
        ));
        let sync = StateSync::new(self.engine.clone(), self.page.clone(), view);
        self.event_listener = Some(sync.spawn(event_channel));
        self.mount = Some(loaded.mount);

        tracing::info!(instance = %instance.id, path = %self.bundle.path, "Skin controller ready");
        Ok(())
    }

    pub fn bundle(&self) -> &SkinBundle {
        &self.bundle
    }

    /// The mount element, once initialized.
    pub fn mount(&self) -> Option<NodeId> {
        self.mount
    }

    pub fn router(&self) -> Option<&ControlEventRouter> {
        self.router.as_ref()
    }

    pub async fn handle_input(&self, event: InputEvent) -> Result<InputOutcome> {
        let Some(router) = &self.router else {
            bail!("Skin controller for {} is not initialized", self.bundle.path);
        };
        router.handle(event).await
    }

    /// Stops the event listener. The mounted markup and injected assets stay
    /// on the page.
    pub fn shutdown(&mut self) {
        if let Some(listener) = self.event_listener.take() {
            listener.abort();
            tracing::debug!(path = %self.bundle.path, "Player event listener stopped");
        }
    }
}
