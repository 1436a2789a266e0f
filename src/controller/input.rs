//! Pointer, touch and form input routed to player commands

use std::sync::Arc;

use anyhow::Result;
use indextree::NodeId;
use tokio::sync::Mutex;

use crate::dom::{Document, Point, Rect, Selector};
use crate::engine::PlayerEngine;
use crate::model::AudioStatus;
use crate::page::SharedPage;
use crate::view::{
    ElementBinder, INDEX_ATTR, ITEM_CLASS, LIST_ITEM_CLASS, PLAYBACK_BAR_CLASS, PLAYLIST_SELECT_CLASS,
    SLIDER_CLASS, SLIDER_VERTICAL_CLASS, VOLUME_BAR_CLASS,
};

pub const PLAYBACK_RATE_CLASS: &str = "playback-rate";

/// A command for the player engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    PlayFromStart,
    Play,
    Pause,
    Stop,
    NextTrack,
    PrevTrack,
    ToggleLoop,
    ToggleShuffle,
    SeekTo(f64),
    ChangeVolume(f64),
    ChangePlaybackRate(f64),
    SwitchTrack { index: usize, user_initiated: bool },
    SwitchPlaylist(usize),
}

impl Command {
    pub fn apply(self, engine: &dyn PlayerEngine) {
        match self {
            Self::PlayFromStart => engine.play_from_start(),
            Self::Play => engine.play(),
            Self::Pause => engine.pause(),
            Self::Stop => engine.stop(),
            Self::NextTrack => engine.next_track(),
            Self::PrevTrack => engine.prev_track(),
            Self::ToggleLoop => engine.toggle_loop(),
            Self::ToggleShuffle => engine.toggle_shuffle(),
            Self::SeekTo(seconds) => engine.seek_to(seconds),
            Self::ChangeVolume(volume) => engine.change_volume(volume),
            Self::ChangePlaybackRate(rate) => engine.change_playback_rate(rate),
            Self::SwitchTrack { index, user_initiated } => engine.switch_track(index, user_initiated),
            Self::SwitchPlaylist(index) => engine.switch_playlist(index),
        }
    }
}

/// Click targets, checked in this order on the resolved element.
pub const CONTROL_TABLE: [(&str, Command); 8] = [
    ("control-play", Command::PlayFromStart),
    ("control-resume", Command::Play),
    ("control-pause", Command::Pause),
    ("control-stop", Command::Stop),
    ("control-next-track", Command::NextTrack),
    ("control-prev-track", Command::PrevTrack),
    ("control-toggle-loop", Command::ToggleLoop),
    ("control-toggle-shuffle", Command::ToggleShuffle),
];

/// What a click resolved to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Control {
    Command(Command),
    Slider(NodeId),
}

/// Control bound to `el` itself, if any.
pub fn control_of(doc: &Document, el: NodeId) -> Option<Control> {
    CONTROL_TABLE
        .iter()
        .find(|(class, _)| doc.has_class(el, class))
        .map(|(_, command)| Control::Command(*command))
        .or_else(|| doc.has_class(el, SLIDER_CLASS).then_some(Control::Slider(el)))
}

/// Nearest control from `target` (inclusive) up to `scope`.
pub fn resolve_control(doc: &Document, target: NodeId, scope: Option<NodeId>) -> Option<Control> {
    let el = doc.closest_where(target, scope, |id| control_of(doc, id).is_some())?;
    control_of(doc, el)
}

/// Normalized position of `point` along a slider: left to right for
/// horizontal sliders, bottom to top for vertical ones. `None` when the
/// slider has no extent to measure against.
pub fn slider_position(bounds: Rect, vertical: bool, point: Point) -> Option<f64> {
    let position = if vertical {
        if bounds.height <= 0.0 {
            return None;
        }
        1.0 - (point.y - bounds.y) / bounds.height
    } else {
        if bounds.width <= 0.0 {
            return None;
        }
        (point.x - bounds.x) / bounds.width
    };
    position.is_finite().then_some(position)
}

pub fn clamp_position(position: f64) -> f64 {
    position.clamp(0.0, 1.0)
}

/// Command for a position on `slider`, by the bar kind it carries.
pub fn slider_command(doc: &Document, slider: NodeId, position: f64, audio: &AudioStatus) -> Option<Command> {
    if doc.has_class(slider, PLAYBACK_BAR_CLASS) {
        Some(Command::SeekTo(position * audio.duration))
    } else if doc.has_class(slider, VOLUME_BAR_CLASS) {
        Some(Command::ChangeVolume(position))
    } else {
        None
    }
}

fn is_checkbox(doc: &Document, el: NodeId) -> bool {
    doc.tag(el) == Some("input") && doc.attr(el, "type").is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
}

/// Current value of a form control. A `select` reports its `selected`
/// option, or the first one when none is marked; an option without a
/// `value` attribute reports its text.
fn control_value(doc: &Document, el: NodeId) -> Option<String> {
    if doc.tag(el) != Some("select") {
        return doc.attr(el, "value").map(str::to_string);
    }
    let options = doc.select_all(el, &Selector::tag("option"));
    let option = options
        .iter()
        .copied()
        .find(|option| doc.has_attr(*option, "selected"))
        .or_else(|| options.first().copied())?;
    Some(match doc.attr(option, "value") {
        Some(value) => value.to_string(),
        None => doc.text_content(option),
    })
}

/// Position of `point` on `slider`, measured against its host-supplied bounds.
fn position_on(doc: &Document, slider: NodeId, point: Point) -> Option<f64> {
    let Some(bounds) = doc.bounds(slider) else {
        tracing::trace!("Slider has no layout bounds, position skipped");
        return None;
    };
    slider_position(bounds, doc.has_class(slider, SLIDER_VERTICAL_CLASS), point)
}

/// The element a press started on. Moves are measured against its slider
/// until the press is released, wherever the pointer goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragSession {
    pub target: NodeId,
}

/// Raw input as the host delivers it.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { target: NodeId },
    TouchStart { target: NodeId },
    /// Page-wide: releases outside the widget still end the drag.
    PointerUp,
    TouchEnd,
    PointerMove { client: Point },
    TouchMove { touches: Vec<Point> },
    Click { target: NodeId, client: Point },
    DoubleClick { target: NodeId },
    Change { target: NodeId },
}

/// What the host should do with the event after routing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputOutcome {
    /// Suppress the element's default activation.
    pub prevent_default: bool,
    /// Command already applied to the engine, if any.
    pub command: Option<Command>,
}

impl InputOutcome {
    fn with_command(mut self, command: Option<Command>) -> Self {
        self.command = command;
        self
    }
}

pub struct ControlEventRouter {
    engine: Arc<dyn PlayerEngine>,
    page: SharedPage,
    binder: ElementBinder,
    drag: Mutex<Option<DragSession>>,
}

impl ControlEventRouter {
    pub fn new(engine: Arc<dyn PlayerEngine>, page: SharedPage, binder: ElementBinder) -> Self {
        Self {
            engine,
            page,
            binder,
            drag: Mutex::new(None),
        }
    }

    pub async fn drag_session(&self) -> Option<DragSession> {
        *self.drag.lock().await
    }

    pub async fn handle(&self, event: InputEvent) -> Result<InputOutcome> {
        let outcome = match event {
            InputEvent::PointerDown { target } | InputEvent::TouchStart { target } => {
                self.press(target).await;
                InputOutcome::default()
            }
            InputEvent::PointerUp | InputEvent::TouchEnd => {
                *self.drag.lock().await = None;
                InputOutcome::default()
            }
            InputEvent::PointerMove { client } => InputOutcome::default().with_command(self.drag_to(client).await),
            InputEvent::TouchMove { touches } => {
                let command = match touches.first() {
                    Some(touch) => self.drag_to(*touch).await,
                    None => None,
                };
                InputOutcome::default().with_command(command)
            }
            InputEvent::Click { target, client } => self.click(target, client).await,
            InputEvent::DoubleClick { target } => InputOutcome::default().with_command(self.double_click(target).await),
            InputEvent::Change { target } => InputOutcome::default().with_command(self.change(target).await),
        };

        if let Some(command) = outcome.command {
            tracing::debug!(instance = %self.binder.id(), command = ?command, "Dispatching command");
            command.apply(&*self.engine);
        }
        Ok(outcome)
    }

    async fn press(&self, target: NodeId) {
        let inside = {
            let page = self.page.lock().await;
            self.binder.contains(page.document(), target)
        };
        if inside {
            // A new press replaces any session a lost release left behind
            *self.drag.lock().await = Some(DragSession { target });
        }
    }

    async fn drag_to(&self, point: Point) -> Option<Command> {
        let session = (*self.drag.lock().await)?;
        let audio = self.engine.audio()?;

        let page = self.page.lock().await;
        let doc = page.document();
        let slider = self.binder.closest(doc, session.target, SLIDER_CLASS)?;
        let position = clamp_position(position_on(doc, slider, point)?);
        slider_command(doc, slider, position, &audio)
    }

    async fn click(&self, target: NodeId, client: Point) -> InputOutcome {
        let page = self.page.lock().await;
        let doc = page.document();
        if !self.binder.contains(doc, target) {
            return InputOutcome::default();
        }

        let outcome = InputOutcome {
            prevent_default: !is_checkbox(doc, target),
            command: None,
        };
        let Some(audio) = self.engine.audio() else {
            tracing::trace!(instance = %self.binder.id(), "No audio attached, click ignored");
            return outcome;
        };

        let command = match resolve_control(doc, target, self.binder.scope(doc)) {
            Some(Control::Command(command)) => Some(command),
            Some(Control::Slider(slider)) => position_on(doc, slider, client)
                .and_then(|position| slider_command(doc, slider, position, &audio)),
            None => None,
        };
        outcome.with_command(command)
    }

    async fn double_click(&self, target: NodeId) -> Option<Command> {
        let page = self.page.lock().await;
        let doc = page.document();
        if !self.binder.contains(doc, target) {
            return None;
        }
        let row = doc.closest_where(target, self.binder.scope(doc), |id| {
            doc.has_class(id, LIST_ITEM_CLASS) || (doc.tag(id) == Some("tr") && doc.has_class(id, ITEM_CLASS))
        })?;
        let index = doc.attr(row, INDEX_ATTR)?.parse().ok()?;
        Some(Command::SwitchTrack {
            index,
            user_initiated: true,
        })
    }

    async fn change(&self, target: NodeId) -> Option<Command> {
        let page = self.page.lock().await;
        let doc = page.document();
        if !self.binder.contains(doc, target) {
            return None;
        }

        let value = control_value(doc, target)?;
        if doc.has_class(target, PLAYBACK_RATE_CLASS) {
            self.engine.audio()?;
            let rate = value.trim().parse().ok()?;
            Some(Command::ChangePlaybackRate(rate))
        } else if doc.has_class(target, PLAYLIST_SELECT_CLASS) {
            let index = value.trim().parse().ok()?;
            Some(Command::SwitchPlaylist(index))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_position_runs_left_to_right() {
        let bounds = Rect::new(100.0, 0.0, 200.0, 10.0);
        assert_eq!(slider_position(bounds, false, Point::new(150.0, 5.0)), Some(0.25));
        assert_eq!(slider_position(bounds, false, Point::new(50.0, 5.0)), Some(-0.25));
    }

    #[test]
    fn vertical_position_runs_bottom_to_top() {
        let bounds = Rect::new(0.0, 100.0, 10.0, 200.0);
        assert_eq!(slider_position(bounds, true, Point::new(5.0, 250.0)), Some(0.25));
        assert_eq!(slider_position(bounds, true, Point::new(5.0, 100.0)), Some(1.0));
    }

    #[test]
    fn zero_extent_yields_nothing() {
        let bounds = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(slider_position(bounds, false, Point::new(1.0, 1.0)), None);
        assert_eq!(slider_position(bounds, true, Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn clamping_bounds_both_ends() {
        assert_eq!(clamp_position(-3.0), 0.0);
        assert_eq!(clamp_position(0.4), 0.4);
        assert_eq!(clamp_position(7.5), 1.0);
    }

    #[test]
    fn resolution_walks_up_to_the_nearest_control() {
        let mut doc = Document::new();
        let root = doc.root();
        let nodes = doc
            .parse_fragment(
                "<div id=\"w\"><button class=\"control-pause\"><i>||</i></button>\
                 <div class=\"slider volume-bar\"><div class=\"volume-value\"></div></div>\
                 <span class=\"label\"></span></div>",
            )
            .unwrap();
        doc.append_child(root, nodes[0]).unwrap();
        let scope = Some(nodes[0]);

        let icon = doc.first_by_tag(nodes[0], "i").unwrap();
        assert_eq!(resolve_control(&doc, icon, scope), Some(Control::Command(Command::Pause)));

        let slider = doc.element_children(nodes[0])[1];
        let fill = doc.first_child(slider).unwrap();
        assert_eq!(resolve_control(&doc, fill, scope), Some(Control::Slider(slider)));

        let label = doc.element_children(nodes[0])[2];
        assert_eq!(resolve_control(&doc, label, scope), None);
    }

    #[test]
    fn control_classes_win_over_slider_on_the_same_element() {
        let mut doc = Document::new();
        let el = doc.create_element("div");
        doc.add_class(el, "slider");
        doc.add_class(el, "control-toggle-shuffle");
        assert_eq!(control_of(&doc, el), Some(Control::Command(Command::ToggleShuffle)));
    }

    #[test]
    fn slider_kind_picks_the_command() {
        let mut doc = Document::new();
        let bar = doc.create_element("div");
        doc.add_class(bar, PLAYBACK_BAR_CLASS);
        let volume = doc.create_element("div");
        doc.add_class(volume, VOLUME_BAR_CLASS);
        let other = doc.create_element("div");
        let audio = AudioStatus {
            duration: 200.0,
            ..Default::default()
        };

        assert_eq!(slider_command(&doc, bar, 0.5, &audio), Some(Command::SeekTo(100.0)));
        assert_eq!(slider_command(&doc, volume, 0.5, &audio), Some(Command::ChangeVolume(0.5)));
        assert_eq!(slider_command(&doc, other, 0.5, &audio), None);
    }

    #[test]
    fn select_value_comes_from_its_selected_option() {
        let mut doc = Document::new();
        let select = doc.create_element("select");
        let options: Vec<NodeId> = ["0.5", "1", "2"]
            .iter()
            .map(|value| {
                let option = doc.create_element("option");
                doc.set_attr(option, "value", value);
                doc.append_child(select, option).unwrap();
                option
            })
            .collect();

        assert_eq!(control_value(&doc, select).as_deref(), Some("0.5"));
        doc.set_attr(options[2], "selected", "");
        assert_eq!(control_value(&doc, select).as_deref(), Some("2"));

        let bare = doc.create_element("option");
        doc.set_text(bare, "1.25").unwrap();
        let other = doc.create_element("select");
        doc.append_child(other, bare).unwrap();
        assert_eq!(control_value(&doc, other).as_deref(), Some("1.25"));

        let input = doc.create_element("input");
        doc.set_attr(input, "value", "0.75");
        assert_eq!(control_value(&doc, input).as_deref(), Some("0.75"));
        let empty = doc.create_element("select");
        assert_eq!(control_value(&doc, empty), None);
    }
}
