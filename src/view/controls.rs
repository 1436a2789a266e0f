//! Checkbox state and host content slots

use anyhow::Result;
use indextree::NodeId;

use super::binder::ElementBinder;
use crate::dom::Document;
use crate::model::WidgetOptions;

pub const SLOT_CLASS: &str = "slot--content";
pub const TOGGLE_LOOP_CLASS: &str = "control-toggle-loop";
pub const TOGGLE_SHUFFLE_CLASS: &str = "control-toggle-shuffle";

fn set_checked(doc: &mut Document, binder: &ElementBinder, class: &str, checked: bool) {
    for el in binder.all_by_class(doc, class) {
        if checked {
            doc.set_attr(el, "checked", "");
        } else {
            doc.remove_attr(el, "checked");
        }
    }
}

pub fn update_checkboxes(doc: &mut Document, binder: &ElementBinder, options: &WidgetOptions) {
    set_checked(doc, binder, TOGGLE_LOOP_CLASS, options.loop_playback);
    set_checked(doc, binder, TOGGLE_SHUFFLE_CLASS, options.shuffle);
}

/// Replaces the children of every slot with a copy of `content`'s children.
pub fn fill_slots(doc: &mut Document, binder: &ElementBinder, content: NodeId) -> Result<()> {
    let slots = binder.all_by_class(doc, SLOT_CLASS);
    if slots.is_empty() {
        tracing::trace!(instance = %binder.id(), "No content slots");
        return Ok(());
    }

    let originals = doc.children(content);
    for slot in slots {
        doc.clear_children(slot);
        for &child in &originals {
            let copy = doc.deep_clone(child);
            doc.append_child(slot, copy)?;
        }
    }
    Ok(())
}
