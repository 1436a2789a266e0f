//! Playlist rendering from skin templates
//!
//! Every call rebuilds the repeated region from scratch. Rows are laid out in
//! playback order and carry their position in that order as `data-index`;
//! double-click dispatch and active-item refresh both rely on it.

use anyhow::Result;
use indextree::NodeId;
use serde_json::Value;

use super::binder::ElementBinder;
use super::time::format_time;
use crate::dom::{Document, Selector};
use crate::model::{display_value, is_present, WidgetInstance, ALBUM_COVER_FIELD, DURATION_FIELD};

pub const PLAYLIST_CLASS: &str = "playlist";
pub const PLAYLIST_SELECT_CLASS: &str = "playlists";
pub const ITEM_CLASS: &str = "playlist-item";
pub const LIST_ITEM_CLASS: &str = "playlist-item-li";
pub const TEMPLATE_CLASS: &str = "template";
pub const ACTIVE_CLASS: &str = "active";
pub const FIELD_CLASS_PREFIX: &str = "playlist-item--";
pub const INDEX_ATTR: &str = "data-index";

fn field_class(key: &str) -> String {
    format!("{}{}", FIELD_CLASS_PREFIX, key)
}

fn rendered_items() -> Selector {
    Selector::class(ITEM_CLASS).excluding(TEMPLATE_CLASS)
}

/// Re-renders every `.playlist` container in the widget.
pub fn update_playlist(doc: &mut Document, binder: &ElementBinder, instance: &WidgetInstance) -> Result<()> {
    if instance.current_playlist().is_none() {
        return Ok(());
    }

    for container in binder.all_by_class(doc, PLAYLIST_CLASS) {
        if doc.tag(container) == Some("table") {
            render_table(doc, container, instance)?;
        } else {
            render_list(doc, container, instance)?;
        }
    }
    tracing::debug!(instance = %binder.id(), tracks = instance.playback_order.len(), "Playlist rendered");
    Ok(())
}

/// Sets display text and tooltip for one info field. Album art is not
/// rendered inside playlist rows.
fn render_field(doc: &mut Document, el: NodeId, key: &str, value: &Value) -> Result<()> {
    let text = match key {
        ALBUM_COVER_FIELD => return Ok(()),
        DURATION_FIELD => format_time(value.as_f64().unwrap_or(0.0)),
        _ => display_value(value),
    };
    doc.set_text(el, &text)?;
    doc.set_attr(el, "title", &text);
    Ok(())
}

pub fn render_list(doc: &mut Document, container: NodeId, instance: &WidgetInstance) -> Result<()> {
    let template_selector = Selector::classes(&[ITEM_CLASS, TEMPLATE_CLASS]);

    // Lists rendered earlier; a list holding the template belongs to the skin
    for list in doc.element_children(container) {
        if doc.tag(list) == Some("ul") && doc.select_first(list, &template_selector).is_none() {
            doc.remove_node(list);
        }
    }

    let prototype = doc.select_first(container, &template_selector).map(|template| {
        let prototype = doc.deep_clone(template);
        doc.remove_class(prototype, TEMPLATE_CLASS);
        prototype
    });

    let ul = doc.create_element("ul");
    for (position, track) in instance.ordered_tracks() {
        let li = doc.create_element("li");
        let is_current = position == instance.current_track_index;

        match prototype {
            Some(prototype) => {
                let item = doc.deep_clone(prototype);
                for (key, value) in &track.info {
                    if let Some(el) = doc.select_first(item, &Selector::class(&field_class(key))) {
                        render_field(doc, el, key, value)?;
                    }
                }
                if is_current {
                    doc.add_class(item, ACTIVE_CLASS);
                }
                doc.append_child(li, item)?;
            }
            None => {
                let name = track.name();
                doc.set_text(li, &name)?;
                doc.set_attr(li, "title", &name);
                doc.add_class(li, ITEM_CLASS);
                if is_current {
                    doc.add_class(li, ACTIVE_CLASS);
                }
            }
        }

        doc.add_class(li, LIST_ITEM_CLASS);
        doc.set_attr(li, INDEX_ATTR, &position.to_string());
        doc.append_child(ul, li)?;
    }

    if let Some(prototype) = prototype {
        doc.remove_node(prototype);
    }
    doc.append_child(container, ul)
}

pub fn render_table(doc: &mut Document, table: NodeId, instance: &WidgetInstance) -> Result<()> {
    for body in doc.element_children(table) {
        if doc.tag(body) == Some("tbody") {
            doc.remove_node(body);
        }
    }

    let columns: Vec<Option<String>> = doc
        .select_all(table, &Selector::tag("th"))
        .into_iter()
        .map(|th| doc.first_class(th).map(str::to_string))
        .collect();

    let tbody = doc.create_element("tbody");
    for (position, track) in instance.ordered_tracks() {
        let tr = doc.create_element("tr");
        doc.add_class(tr, ITEM_CLASS);

        for key in &columns {
            let td = doc.create_element("td");
            if let Some(key) = key {
                doc.add_class(td, &field_class(key));
                if let Some(value) = track.info.get(key).filter(|value| is_present(value)) {
                    render_field(doc, td, key, value)?;
                }
            }
            doc.append_child(tr, td)?;
        }

        if position == instance.current_track_index {
            doc.add_class(tr, ACTIVE_CLASS);
        }
        doc.set_attr(tr, INDEX_ATTR, &position.to_string());
        doc.append_child(tbody, tr)?;
    }

    doc.append_child(table, tbody)
}

/// Moves the active marker to the current track's row without re-rendering.
/// Rows are indexed per playlist container, in rendered order.
pub fn update_active_track(doc: &mut Document, binder: &ElementBinder, instance: &WidgetInstance) {
    let active = Selector::classes(&[ITEM_CLASS, ACTIVE_CLASS]);
    let items = rendered_items();

    for container in binder.all_by_class(doc, PLAYLIST_CLASS) {
        for el in doc.select_all(container, &active) {
            doc.remove_class(el, ACTIVE_CLASS);
        }
        if let Some(item) = doc.select_all(container, &items).get(instance.current_track_index) {
            doc.add_class(*item, ACTIVE_CLASS);
        }
    }
}

/// Fills the first `.playlists` selector with one option per playlist.
pub fn update_playlist_list(doc: &mut Document, binder: &ElementBinder, instance: &WidgetInstance) -> Result<()> {
    let Some(select) = binder.first_by_class(doc, PLAYLIST_SELECT_CLASS) else {
        return Ok(());
    };

    doc.clear_children(select);
    for (index, playlist) in instance.playlists.iter().enumerate() {
        let option = doc.create_element("option");
        doc.set_attr(option, "value", &index.to_string());
        doc.set_text(option, &playlist.name)?;
        doc.append_child(select, option)?;
    }
    Ok(())
}
