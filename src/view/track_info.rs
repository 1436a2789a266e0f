//! Current-track details bound to `track-info--<field>` elements

use anyhow::Result;

use super::binder::ElementBinder;
use crate::dom::Document;
use crate::model::{display_value, is_present, Track, ALBUM_COVER_FIELD};

pub const TRACK_INFO_CLASS: &str = "track-info";
const FIELD_PREFIX: &str = "track-info--";

/// Renders `track` into every `.track-info` element. Text fields fall back to
/// a non-breaking space so the element keeps its line height.
pub fn update_track_info(
    doc: &mut Document,
    binder: &ElementBinder,
    track: &Track,
    default_album_cover: &str,
) -> Result<()> {
    for el in binder.all_by_class(doc, TRACK_INFO_CLASS) {
        let Some(key) = doc
            .classes(el)
            .iter()
            .find_map(|class| class.strip_prefix(FIELD_PREFIX))
            .map(str::to_string)
        else {
            continue;
        };

        if key == ALBUM_COVER_FIELD {
            let cover = track
                .album_cover()
                .filter(|cover| !cover.is_empty())
                .unwrap_or(default_album_cover);
            if doc.tag(el) == Some("img") {
                doc.set_attr(el, "src", cover);
            } else {
                doc.set_style(el, "background-image", &format!("url('{}')", cover));
            }
            continue;
        }

        match track.info.get(&key).filter(|value| is_present(value)) {
            Some(value) => {
                let text = display_value(value);
                doc.set_text(el, &text)?;
                doc.set_attr(el, "title", &text);
            }
            None => {
                doc.set_text(el, "\u{a0}")?;
                doc.set_attr(el, "title", "");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mount(markup: &str) -> (Document, ElementBinder) {
        let mut doc = Document::new();
        let root = doc.root();
        let nodes = doc.parse_fragment(markup).unwrap();
        doc.set_attr(nodes[0], "id", "w");
        doc.append_child(root, nodes[0]).unwrap();
        (doc, ElementBinder::new("w", nodes[0]))
    }

    #[test]
    fn text_fields_and_missing_values() {
        let (mut doc, binder) = mount(
            "<div><span class=\"track-info track-info--name\"></span>\
             <span class=\"track-info track-info--artist\">old</span></div>",
        );
        let track = Track::new("a.mp3").with_info("name", "Alpha").with_info("artist", "");
        update_track_info(&mut doc, &binder, &track, "").unwrap();

        let spans = binder.all_by_class(&doc, TRACK_INFO_CLASS);
        assert_eq!(doc.outer_html(spans[0]), "<span title=\"Alpha\" class=\"track-info track-info--name\">Alpha</span>");
        assert_eq!(doc.text_content(spans[1]), "\u{a0}");
        assert_eq!(doc.attr(spans[1], "title"), Some(""));
    }

    #[test]
    fn album_cover_uses_src_or_background() {
        let (mut doc, binder) = mount(
            "<div><img class=\"track-info track-info--albumCover\">\
             <div class=\"track-info track-info--albumCover\"></div></div>",
        );
        let track = Track::new("a.mp3").with_info("albumCover", json!({ "base64": "data:image/png;base64,AAA" }));
        update_track_info(&mut doc, &binder, &track, "cover.png").unwrap();

        let els = binder.all_by_class(&doc, TRACK_INFO_CLASS);
        assert_eq!(doc.attr(els[0], "src"), Some("data:image/png;base64,AAA"));
        assert_eq!(
            doc.style_value(els[1], "background-image"),
            Some("url('data:image/png;base64,AAA')")
        );

        update_track_info(&mut doc, &binder, &Track::new("b.mp3"), "cover.png").unwrap();
        assert_eq!(doc.attr(els[0], "src"), Some("cover.png"));
        assert_eq!(doc.style_value(els[1], "background-image"), Some("url('cover.png')"));
    }
}
