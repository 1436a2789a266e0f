#![allow(dead_code)]
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use indextree::NodeId;
use player_skin::config::SkinConfig;
use player_skin::dom::{Document, Selector};
use player_skin::model::{AudioStatus, Playlist, Track, WidgetInstance, WidgetOptions};
use player_skin::skin::MemoryFetcher;
use player_skin::{Command, Page, PlayerEngine, PlayerEvent, PlayerEventChannel, SharedPage, SkinController};
use tokio::sync::broadcast;

pub const SKIN_PATH: &str = "/skins/basic";

/// Every control, display and template the engine knows about.
pub const SKIN_MARKUP: &str = "
<div class=\"player\">
    <div class=\"slot--content\"></div>
    <button class=\"control-play\">Play</button>
    <button class=\"control-resume\"><span class=\"icon\">Resume</span></button>
    <button class=\"control-pause\">Pause</button>
    <button class=\"control-stop\">Stop</button>
    <button class=\"control-next-track\">Next</button>
    <button class=\"control-prev-track\">Prev</button>
    <label class=\"control-toggle-loop\"><span class=\"caption\">Loop</span></label>
    <input type=\"checkbox\" class=\"control-toggle-shuffle\">
    <div class=\"slider playback-bar\"><div class=\"playback-load\"></div><div class=\"playback-progress\"></div></div>
    <span class=\"playback-time\"></span>
    <span class=\"playback-time-left\"></span>
    <span class=\"playback-duration\"></span>
    <div class=\"slider slider-vertical volume-bar\"><div class=\"volume-value\"></div></div>
    <select class=\"playback-rate\"><option value=\"1\">1x</option><option value=\"1.5\">1.5x</option></select>
    <select class=\"playlists\"></select>
    <span class=\"track-info track-info--name\"></span>
    <img class=\"track-info track-info--albumCover\">
    <div class=\"playlist\"><div class=\"playlist-item template\"><span class=\"playlist-item--name\"></span><span class=\"playlist-item--duration\"></span></div></div>
    <table class=\"playlist\"><thead><tr><th class=\"name\">Name</th><th class=\"duration\">Time</th></tr></thead></table>
</div>
";

pub const HOST_PAGE: &str = "<!DOCTYPE html><html><head><title>Host</title></head><body>\
    <div id=\"player-one\"><em>On air</em></div>\
    <div id=\"player-two\"></div>\
    </body></html>";

pub fn fetcher() -> Arc<MemoryFetcher> {
    Arc::new(MemoryFetcher::new().with_file(format!("{}/skin.html", SKIN_PATH), SKIN_MARKUP))
}

pub fn shared_page() -> Result<SharedPage> {
    Ok(Page::from_html(HOST_PAGE)?.shared())
}

pub fn skin_config() -> SkinConfig {
    SkinConfig {
        default_album_cover: "/img/default-cover.png".to_string(),
        ..SkinConfig::default()
    }
}

pub fn instance(id: &str) -> WidgetInstance {
    let track = |source: &str, name: &str, duration: f64| {
        Track::new(source)
            .with_info("name", name)
            .with_info("duration", duration)
    };
    WidgetInstance {
        id: id.to_string(),
        options: WidgetOptions::default(),
        playlists: vec![
            Playlist {
                name: "Morning".to_string(),
                list: vec![
                    track("a.mp3", "Alpha", 61.0),
                    track("b.mp3", "Bravo", 125.0),
                    track("c.mp3", "Charlie", 3661.0),
                ],
            },
            Playlist {
                name: "Evening".to_string(),
                list: vec![],
            },
        ],
        current_playlist_index: Some(0),
        current_track_index: 0,
        playback_order: vec![0, 1, 2],
    }
}

/// Records every command and applies the few that change what the skin
/// shows.
pub struct FakeEngine {
    instance: Mutex<WidgetInstance>,
    audio: Mutex<Option<AudioStatus>>,
    commands: Mutex<Vec<Command>>,
    events: broadcast::Sender<PlayerEvent>,
}

impl FakeEngine {
    pub fn new(instance: WidgetInstance) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            instance: Mutex::new(instance),
            audio: Mutex::new(Some(AudioStatus {
                duration: 200.0,
                current_time: 0.0,
                volume: 1.0,
                loaded_percent: 0.0,
            })),
            commands: Mutex::new(Vec::new()),
            events,
        })
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.lock().unwrap().clone()
    }

    pub fn snapshot(&self) -> WidgetInstance {
        self.instance.lock().unwrap().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut WidgetInstance)) {
        let mut instance = self.instance.lock().unwrap();
        f(&mut *instance);
    }

    pub fn set_audio(&self, audio: Option<AudioStatus>) {
        *self.audio.lock().unwrap() = audio;
    }

    pub fn publish(&self, event: PlayerEvent) {
        let _ = self.events.send(event);
    }

    fn record(&self, command: Command) {
        self.commands.lock().unwrap().push(command);
    }
}

impl PlayerEngine for FakeEngine {
    fn instance(&self) -> WidgetInstance {
        self.snapshot()
    }

    fn audio(&self) -> Option<AudioStatus> {
        *self.audio.lock().unwrap()
    }

    fn subscribe(&self) -> PlayerEventChannel {
        self.events.subscribe()
    }

    fn play_from_start(&self) {
        self.record(Command::PlayFromStart);
    }

    fn play(&self) {
        self.record(Command::Play);
    }

    fn pause(&self) {
        self.record(Command::Pause);
    }

    fn stop(&self) {
        self.record(Command::Stop);
    }

    fn next_track(&self) {
        self.record(Command::NextTrack);
    }

    fn prev_track(&self) {
        self.record(Command::PrevTrack);
    }

    fn toggle_loop(&self) {
        self.record(Command::ToggleLoop);
        self.update(|instance| instance.options.loop_playback = !instance.options.loop_playback);
    }

    fn toggle_shuffle(&self) {
        self.record(Command::ToggleShuffle);
        self.update(|instance| instance.options.shuffle = !instance.options.shuffle);
    }

    fn seek_to(&self, seconds: f64) {
        self.record(Command::SeekTo(seconds));
    }

    fn change_volume(&self, volume: f64) {
        self.record(Command::ChangeVolume(volume));
    }

    fn change_playback_rate(&self, rate: f64) {
        self.record(Command::ChangePlaybackRate(rate));
    }

    fn switch_track(&self, index: usize, user_initiated: bool) {
        self.record(Command::SwitchTrack { index, user_initiated });
        self.update(|instance| instance.current_track_index = index);
    }

    fn switch_playlist(&self, index: usize) {
        self.record(Command::SwitchPlaylist(index));
    }
}

pub async fn placeholder(page: &SharedPage, id: &str) -> Result<NodeId> {
    page.lock()
        .await
        .document()
        .element_by_id(id)
        .ok_or_else(|| anyhow!("no element with id {}", id))
}

/// A controller for `engine`, initialized against the shared fixture page.
pub async fn mounted(engine: Arc<FakeEngine>, page: &SharedPage, placeholder_id: &str) -> Result<SkinController> {
    let mut controller = SkinController::new(engine, page.clone(), fetcher(), SKIN_PATH, &skin_config());
    controller.init(placeholder(page, placeholder_id).await?).await?;
    Ok(controller)
}

pub fn select(doc: &Document, scope: NodeId, selector: &str) -> Vec<NodeId> {
    match Selector::parse(selector) {
        Ok(selector) => doc.select_all(scope, &selector),
        Err(e) => panic!("bad selector {}: {}", selector, e),
    }
}

pub fn first(doc: &Document, scope: NodeId, selector: &str) -> NodeId {
    select(doc, scope, selector)
        .first()
        .copied()
        .unwrap_or_else(|| panic!("nothing matches {}", selector))
}
