//! Minimal selector language used for scoped lookups
//!
//! Supported: `tag`, `.class`, `:not(.class)`, `[attr="value"]`, compounds of
//! those (`tr.playlist-item:not(.template)`) and the descendant combinator.

use anyhow::{bail, Result};
use indextree::NodeId;

use super::Document;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    pub tag: Option<String>,
    pub classes: Vec<String>,
    pub excluded_classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
}

impl Compound {
    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        let Some(tag) = doc.tag(node) else {
            return false;
        };
        if self.tag.as_deref().is_some_and(|wanted| wanted != tag) {
            return false;
        }
        self.classes.iter().all(|class| doc.has_class(node, class))
            && !self.excluded_classes.iter().any(|class| doc.has_class(node, class))
            && self
                .attrs
                .iter()
                .all(|(name, value)| doc.attr(node, name) == Some(value.as_str()))
    }

    fn parse(input: &str) -> Result<Self> {
        let mut compound = Compound::default();
        let mut rest = input;

        let tag_len = rest
            .find(|c: char| c == '.' || c == ':' || c == '[')
            .unwrap_or(rest.len());
        if tag_len > 0 {
            let tag = &rest[..tag_len];
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                bail!("unsupported selector syntax '{}'", input);
            }
            compound.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_len..];

        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix(":not(.") {
                let Some(end) = after.find(')') else {
                    bail!("unterminated :not() in selector '{}'", input);
                };
                compound.excluded_classes.push(after[..end].to_string());
                rest = &after[end + 1..];
            } else if let Some(after) = rest.strip_prefix('.') {
                let end = after
                    .find(|c: char| c == '.' || c == ':' || c == '[')
                    .unwrap_or(after.len());
                if end == 0 {
                    bail!("empty class name in selector '{}'", input);
                }
                compound.classes.push(after[..end].to_string());
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let Some(end) = after.find(']') else {
                    bail!("unterminated attribute in selector '{}'", input);
                };
                let Some((name, value)) = after[..end].split_once('=') else {
                    bail!("attribute presence tests are not supported: '{}'", input);
                };
                let value = value.trim_matches(|c| c == '"' || c == '\'');
                compound.attrs.push((name.trim().to_string(), value.to_string()));
                rest = &after[end + 1..];
            } else {
                bail!("unsupported selector syntax '{}'", input);
            }
        }

        Ok(compound)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    /// Outermost ancestor first; the last entry matches the element itself.
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let parts = input
            .split_whitespace()
            .map(Compound::parse)
            .collect::<Result<Vec<_>>>()?;
        if parts.is_empty() {
            bail!("empty selector");
        }
        Ok(Self { parts })
    }

    pub fn class(name: &str) -> Self {
        Self::classes(&[name])
    }

    pub fn classes(names: &[&str]) -> Self {
        Self {
            parts: vec![Compound {
                classes: names.iter().map(|name| name.to_string()).collect(),
                ..Default::default()
            }],
        }
    }

    pub fn tag(name: &str) -> Self {
        Self {
            parts: vec![Compound {
                tag: Some(name.to_ascii_lowercase()),
                ..Default::default()
            }],
        }
    }

    /// Adds a `:not(.class)` to the element's own compound.
    pub fn excluding(mut self, class: &str) -> Self {
        if let Some(last) = self.parts.last_mut() {
            last.excluded_classes.push(class.to_string());
        }
        self
    }

    /// `node` must match the last compound; earlier compounds must match
    /// ancestors strictly between `node` and `scope`, in order.
    pub fn matches(&self, doc: &Document, node: NodeId, scope: NodeId) -> bool {
        let Some((last, ancestors)) = self.parts.split_last() else {
            return false;
        };
        if !last.matches(doc, node) {
            return false;
        }

        let mut remaining = ancestors.iter().rev().peekable();
        let mut current = doc.parent(node);
        while let Some(wanted) = remaining.peek() {
            let Some(id) = current else {
                return false;
            };
            if id == scope {
                return false;
            }
            if wanted.matches(doc, id) {
                remaining.next();
            }
            current = doc.parent(id);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compounds() {
        let selector = Selector::parse("tr.playlist-item:not(.template)").unwrap();
        assert_eq!(
            selector.parts,
            vec![Compound {
                tag: Some("tr".to_string()),
                classes: vec!["playlist-item".to_string()],
                excluded_classes: vec!["template".to_string()],
                attrs: vec![],
            }]
        );

        let selector = Selector::parse(r#"link[href="/a/skin.css"]"#).unwrap();
        assert_eq!(
            selector.parts[0].attrs,
            vec![("href".to_string(), "/a/skin.css".to_string())]
        );
    }

    #[test]
    fn rejects_what_it_cannot_match() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse("div > p").is_err());
        assert!(Selector::parse("input[checked]").is_err());
    }

    #[test]
    fn descendant_parts_stay_inside_the_scope() {
        let mut doc = Document::new();
        let scope = doc.create_element("div");
        doc.add_class(scope, "playlist");
        let list = doc.create_element("ul");
        let item = doc.create_element("li");
        doc.add_class(item, "playlist-item");
        let root = doc.root();
        doc.append_child(root, scope).unwrap();
        doc.append_child(scope, list).unwrap();
        doc.append_child(list, item).unwrap();

        let nested = Selector::parse("ul .playlist-item").unwrap();
        assert_eq!(doc.select_all(scope, &nested), vec![item]);

        let through_scope = Selector::parse(".playlist .playlist-item").unwrap();
        assert!(doc.select_all(scope, &through_scope).is_empty());
        assert_eq!(doc.select_all(root, &through_scope), vec![item]);
    }
}
