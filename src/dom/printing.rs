use indextree::NodeId;

use super::{Document, NodeKind};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

impl Document {
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        let Some(data) = self.node(node) else {
            return;
        };
        match &data.kind {
            NodeKind::Document => {
                for child in self.children(node) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Text { text } => escape_text(text, out),
            NodeKind::Comment { text } => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeKind::Element { tag } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &data.attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    escape_attr(value, out);
                    out.push('"');
                }
                if !data.classes.is_empty() {
                    out.push_str(" class=\"");
                    escape_attr(&data.classes.join(" "), out);
                    out.push('"');
                }
                if !data.style.is_empty() {
                    let style = data
                        .style
                        .iter()
                        .map(|(property, value)| format!("{}: {};", property, value))
                        .collect::<Vec<_>>()
                        .join(" ");
                    out.push_str(" style=\"");
                    escape_attr(&style, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }
                for child in self.children(node) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::Document;

    #[test]
    fn prints_attributes_classes_and_style() {
        let mut doc = Document::new();
        let nodes = doc
            .parse_fragment("<div id=\"w\" class=\"a b\"><img src=\"x.png\"><span>1 &lt; 2</span></div>")
            .unwrap();
        let div = nodes[0];
        doc.set_style(div, "width", "50%");

        assert_eq!(
            doc.outer_html(div),
            "<div id=\"w\" class=\"a b\" style=\"width: 50%;\"><img src=\"x.png\"><span>1 &lt; 2</span></div>"
        );
    }
}
