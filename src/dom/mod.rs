//! UI tree the skin markup is grafted into
//!
//! Nodes live in an `indextree` arena owned by a [`Document`]. Elements keep
//! their class list and inline style apart from the other attributes so that
//! class-driven lookups (the whole skin contract is class-driven) stay cheap.
//!
//! - `parser`: html5ever-backed parsing of documents and fragments
//! - `selector`: the small selector language the binder queries with
//! - `printing`: serialization back to markup

mod parser;
mod printing;
mod selector;

use anyhow::{anyhow, Result};
use indextree::{Arena, NodeId};
use smallvec::SmallVec;

pub use selector::{Compound, Selector};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum NodeKind {
    #[default]
    Document,
    Element { tag: String },
    Text { text: String },
    Comment { text: String },
}

/// Host-supplied layout box, in client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// Pointer or touch position, in client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    /// Attributes other than `class` and `style`.
    pub attrs: SmallVec<[(String, String); 4]>,
    pub classes: Vec<String>,
    pub style: Vec<(String, String)>,
    pub bounds: Option<Rect>,
}

impl DomNode {
    fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element { tag: tag.to_ascii_lowercase() },
            ..Default::default()
        }
    }

    fn text(text: &str) -> Self {
        Self {
            kind: NodeKind::Text { text: text.to_string() },
            ..Default::default()
        }
    }
}

#[derive(Debug)]
pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::default());
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // ========================================================================
    // Node creation & structure
    // ========================================================================

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(DomNode::element(tag))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode::text(text))
    }

    pub(crate) fn create_node(&mut self, node: DomNode) -> NodeId {
        self.arena.new_node(node)
    }

    pub fn node(&self, node: NodeId) -> Option<&DomNode> {
        self.arena.get(node).filter(|n| !n.is_removed()).map(|n| n.get())
    }

    pub fn node_mut(&mut self, node: NodeId) -> Option<&mut DomNode> {
        self.arena
            .get_mut(node)
            .filter(|n| !n.is_removed())
            .map(|n| n.get_mut())
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.tag(node).is_some()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena).collect()
    }

    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena)
            .filter(|child| self.is_element(*child))
            .collect()
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.first_child()
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        parent
            .checked_append(child, &mut self.arena)
            .map_err(|e| anyhow!("cannot append node: {:?}", e))
    }

    pub fn insert_before(&mut self, sibling: NodeId, new: NodeId) -> Result<()> {
        sibling
            .checked_insert_before(new, &mut self.arena)
            .map_err(|e| anyhow!("cannot insert node: {:?}", e))
    }

    /// Swaps `new` into the place `old` occupies and detaches `old`.
    ///
    /// Both steps happen on the same `&mut` borrow, so no observer sees the
    /// two nodes attached at the same time.
    pub fn replace_node(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        new.detach(&mut self.arena);
        old.checked_insert_before(new, &mut self.arena)
            .map_err(|e| anyhow!("cannot replace node: {:?}", e))?;
        old.detach(&mut self.arena);
        Ok(())
    }

    pub fn detach(&mut self, node: NodeId) {
        node.detach(&mut self.arena);
    }

    /// Detaches and frees `node` together with its whole subtree.
    pub fn remove_node(&mut self, node: NodeId) {
        node.remove_subtree(&mut self.arena);
    }

    pub fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            child.remove_subtree(&mut self.arena);
        }
    }

    /// Copies `node` and everything below it into a new detached subtree.
    /// Layout bounds are not copied; they belong to the original placement.
    pub fn deep_clone(&mut self, node: NodeId) -> NodeId {
        let copy_of = |arena: &Arena<DomNode>, id: NodeId| DomNode {
            bounds: None,
            ..arena[id].get().clone()
        };

        let clone_root = self.arena.new_node(copy_of(&self.arena, node));
        let mut pending = vec![(node, clone_root)];
        while let Some((source, target)) = pending.pop() {
            let children: Vec<NodeId> = source.children(&self.arena).collect();
            for child in children {
                let copy = self.arena.new_node(copy_of(&self.arena, child));
                target.append(copy, &mut self.arena);
                pending.push((child, copy));
            }
        }
        clone_root
    }

    /// Inclusive containment check.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node.ancestors(&self.arena).any(|id| id == ancestor)
    }

    pub fn is_attached(&self, node: NodeId) -> bool {
        self.node(node).is_some() && self.contains(self.root, node)
    }

    // ========================================================================
    // Attributes, classes & style
    // ========================================================================

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.attr(node, name).is_some()
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        match name {
            "class" => {
                if let Some(data) = self.node_mut(node) {
                    data.classes = value.split_whitespace().map(str::to_string).collect();
                }
            }
            "style" => {
                if let Some(data) = self.node_mut(node) {
                    data.style = parse_inline_style(value);
                }
            }
            _ => {
                let Some(data) = self.node_mut(node) else {
                    return;
                };
                match data.attrs.iter_mut().find(|(key, _)| key == name) {
                    Some(entry) => entry.1 = value.to_string(),
                    None => data.attrs.push((name.to_string(), value.to_string())),
                }
            }
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.node_mut(node) {
            data.attrs.retain(|(key, _)| key != name);
        }
    }

    pub fn id_of(&self, node: NodeId) -> Option<&str> {
        self.attr(node, "id")
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.node(node).map(|n| n.classes.as_slice()).unwrap_or(&[])
    }

    pub fn first_class(&self, node: NodeId) -> Option<&str> {
        self.classes(node).first().map(String::as_str)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        if let Some(data) = self.node_mut(node) {
            data.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.node_mut(node) {
            data.classes.retain(|c| c != class);
        }
    }

    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(data) = self.node_mut(node) else {
            return;
        };
        match data.style.iter_mut().find(|(key, _)| key == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => data.style.push((property.to_string(), value.to_string())),
        }
    }

    pub fn style_value(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)?
            .style
            .iter()
            .find(|(key, _)| key == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_bounds(&mut self, node: NodeId, bounds: Rect) {
        if let Some(data) = self.node_mut(node) {
            data.bounds = Some(bounds);
        }
    }

    pub fn bounds(&self, node: NodeId) -> Option<Rect> {
        self.node(node)?.bounds
    }

    // ========================================================================
    // Text
    // ========================================================================

    /// Replaces every child of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.clear_children(node);
        if text.is_empty() {
            return Ok(());
        }
        let text_node = self.create_text(text);
        self.append_child(node, text_node)
    }

    pub fn text_content(&self, node: NodeId) -> String {
        node.descendants(&self.arena)
            .filter_map(|id| match &self.arena[id].get().kind {
                NodeKind::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.root
            .descendants(&self.arena)
            .find(|node| self.id_of(*node) == Some(id))
    }

    pub fn first_by_tag(&self, scope: NodeId, tag: &str) -> Option<NodeId> {
        scope
            .descendants(&self.arena)
            .skip(1)
            .find(|node| self.tag(*node) == Some(tag))
    }

    /// First element strictly below `scope` for which `matches` holds.
    pub fn find_element<F>(&self, scope: NodeId, matches: F) -> Option<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        scope
            .descendants(&self.arena)
            .skip(1)
            .find(|node| self.is_element(*node) && matches(*node))
    }

    pub fn head(&self) -> Option<NodeId> {
        self.first_by_tag(self.root, "head")
    }

    pub fn body(&self) -> Option<NodeId> {
        self.first_by_tag(self.root, "body")
    }

    /// Walks up from `node` (inclusive) to the nearest element carrying
    /// `class`. The walk stops after visiting `scope`, if one is given.
    pub fn closest(&self, node: NodeId, class: &str, scope: Option<NodeId>) -> Option<NodeId> {
        self.closest_where(node, scope, |id| self.has_class(id, class))
    }

    pub fn closest_where<F>(&self, node: NodeId, scope: Option<NodeId>, matches: F) -> Option<NodeId>
    where
        F: Fn(NodeId) -> bool,
    {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.is_element(id) && matches(id) {
                return Some(id);
            }
            if Some(id) == scope {
                return None;
            }
            current = self.parent(id);
        }
        None
    }

    /// Every element strictly below `scope` that matches, in document order.
    pub fn select_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        scope
            .descendants(&self.arena)
            .skip(1)
            .filter(|node| selector.matches(self, *node, scope))
            .collect()
    }

    pub fn select_first(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        scope
            .descendants(&self.arena)
            .skip(1)
            .find(|node| selector.matches(self, *node, scope))
    }
}

fn parse_inline_style(value: &str) -> Vec<(String, String)> {
    value
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim();
            if property.is_empty() {
                return None;
            }
            Some((property.to_string(), value.trim().to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        doc.add_class(outer, "slider");
        doc.add_class(outer, "playback-bar");
        let inner = doc.create_element("span");
        doc.add_class(inner, "playback-progress");
        let text = doc.create_text("x");
        let root = doc.root();
        doc.append_child(root, outer).unwrap();
        doc.append_child(outer, inner).unwrap();
        doc.append_child(inner, text).unwrap();
        (doc, outer, inner, text)
    }

    #[test]
    fn closest_is_inclusive_and_starts_from_text_nodes() {
        let (doc, outer, inner, text) = sample();
        assert_eq!(doc.closest(inner, "playback-progress", None), Some(inner));
        assert_eq!(doc.closest(text, "slider", None), Some(outer));
        assert_eq!(doc.closest(text, "volume-bar", None), None);
    }

    #[test]
    fn closest_stops_at_the_scope() {
        let (doc, outer, inner, _) = sample();
        assert_eq!(doc.closest(inner, "slider", Some(inner)), None);
        assert_eq!(doc.closest(inner, "slider", Some(outer)), Some(outer));
    }

    #[test]
    fn replace_swaps_in_place() {
        let mut doc = Document::new();
        let root = doc.root();
        let first = doc.create_element("p");
        let placeholder = doc.create_element("div");
        let last = doc.create_element("p");
        for node in [first, placeholder, last] {
            doc.append_child(root, node).unwrap();
        }
        let mount = doc.create_element("section");
        doc.replace_node(placeholder, mount).unwrap();

        assert_eq!(doc.children(root), vec![first, mount, last]);
        assert!(!doc.is_attached(placeholder));
    }

    #[test]
    fn deep_clone_is_detached_and_independent() {
        let (mut doc, outer, inner, _) = sample();
        doc.set_bounds(outer, Rect::new(0.0, 0.0, 10.0, 10.0));
        let copy = doc.deep_clone(outer);

        assert!(doc.parent(copy).is_none());
        assert!(doc.has_class(copy, "playback-bar"));
        assert!(doc.bounds(copy).is_none());
        assert_eq!(doc.text_content(copy), "x");

        doc.set_text(inner, "changed").unwrap();
        assert_eq!(doc.text_content(copy), "x");
    }

    #[test]
    fn class_and_style_attributes_are_split_out() {
        let mut doc = Document::new();
        let node = doc.create_element("div");
        doc.set_attr(node, "class", "slider  slider-vertical");
        doc.set_attr(node, "style", "width: 10%; color:red;");
        doc.set_attr(node, "data-index", "3");

        assert_eq!(doc.classes(node), ["slider", "slider-vertical"]);
        assert_eq!(doc.style_value(node, "width"), Some("10%"));
        assert_eq!(doc.style_value(node, "color"), Some("red"));
        assert_eq!(doc.attr(node, "data-index"), Some("3"));
        assert_eq!(doc.attr(node, "class"), None);
    }
}
