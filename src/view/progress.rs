//! Time displays and slider fills

use anyhow::Result;
use indextree::NodeId;

use super::binder::ElementBinder;
use super::time::format_time;
use crate::dom::Document;
use crate::model::AudioStatus;

pub const SLIDER_CLASS: &str = "slider";
pub const SLIDER_VERTICAL_CLASS: &str = "slider-vertical";
pub const PLAYBACK_BAR_CLASS: &str = "playback-bar";
pub const VOLUME_BAR_CLASS: &str = "volume-bar";

/// `height` for vertical sliders, `width` otherwise.
pub fn fill_dimension(doc: &Document, slider: NodeId) -> &'static str {
    if doc.has_class(slider, SLIDER_VERTICAL_CLASS) {
        "height"
    } else {
        "width"
    }
}

fn percent(value: f64) -> String {
    format!("{}%", value)
}

/// Sets the fill of every `class` element sitting inside a slider; elements
/// outside any slider are left alone.
fn fill_sliders(doc: &mut Document, binder: &ElementBinder, class: &str, value: f64) {
    for el in binder.all_by_class(doc, class) {
        let Some(slider) = binder.closest(doc, el, SLIDER_CLASS) else {
            tracing::trace!(class, "Fill element outside a slider, skipped");
            continue;
        };
        let dimension = fill_dimension(doc, slider);
        doc.set_style(el, dimension, &percent(value));
    }
}

fn set_texts(doc: &mut Document, binder: &ElementBinder, class: &str, text: &str) -> Result<()> {
    for el in binder.all_by_class(doc, class) {
        doc.set_text(el, text)?;
    }
    Ok(())
}

pub fn update_playback_duration(doc: &mut Document, binder: &ElementBinder, duration: f64) -> Result<()> {
    set_texts(doc, binder, "playback-duration", &format_time(duration))
}

pub fn update_playback_time(doc: &mut Document, binder: &ElementBinder, current_time: f64) -> Result<()> {
    set_texts(doc, binder, "playback-time", &format_time(current_time))
}

pub fn update_playback_time_left(
    doc: &mut Document,
    binder: &ElementBinder,
    current_time: f64,
    duration: f64,
) -> Result<()> {
    let time_left = duration - current_time.floor();
    set_texts(doc, binder, "playback-time-left", &format!("-{}", format_time(time_left)))
}

/// Progress fill plus the `elapsed / duration` tooltip on playback bars.
/// The fill is left untouched until the duration is known.
pub fn update_playback_progress(doc: &mut Document, binder: &ElementBinder, audio: &AudioStatus) {
    let progress = (audio.current_time / audio.duration) * 100.0;
    if audio.duration > 0.0 && progress.is_finite() {
        fill_sliders(doc, binder, "playback-progress", progress);
    }

    let title = format!(
        "{} / {}",
        format_time(audio.current_time),
        format_time(audio.duration)
    );
    for bar in binder.all_by_class(doc, PLAYBACK_BAR_CLASS) {
        doc.set_attr(bar, "title", &title);
    }
}

pub fn update_loading_progress(doc: &mut Document, binder: &ElementBinder, loaded_percent: f64) {
    for el in binder.all_by_class(doc, "playback-load") {
        doc.set_style(el, "width", &percent(loaded_percent));
    }
}

pub fn update_volume(doc: &mut Document, binder: &ElementBinder, volume: f64) {
    fill_sliders(doc, binder, "volume-value", volume * 100.0);
}
