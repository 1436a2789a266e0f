//! html5ever-backed parsing into the arena
//!
//! html5ever builds an `RcDom`; the tree is then copied node by node into
//! the [`Document`] arena. Doctypes and processing instructions are dropped.

use anyhow::{Context, Result};
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_document, ParseOpts};
use indextree::NodeId;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::{Document, DomNode, NodeKind};

fn parse_rc_dom(html: &str) -> Result<RcDom> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())
        .context("failed to parse markup")
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data {
        if &*name.local == tag {
            return Some(handle.clone());
        }
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_element(child, tag))
}

impl Document {
    /// Parses a full host page.
    pub fn parse_document(html: &str) -> Result<Self> {
        let rc_dom = parse_rc_dom(html)?;
        let mut doc = Document::new();
        let root = doc.root();
        for child in rc_dom.document.children.borrow().iter() {
            if let Some(node) = doc.convert_node(child)? {
                doc.append_child(root, node)?;
            }
        }
        Ok(doc)
    }

    /// Parses `html` as body content and returns the resulting top-level
    /// nodes, detached and in source order.
    pub fn parse_fragment(&mut self, html: &str) -> Result<Vec<NodeId>> {
        let wrapped = format!("<!DOCTYPE html><html><head></head><body>{}</body></html>", html);
        let rc_dom = parse_rc_dom(&wrapped)?;
        let Some(body) = find_element(&rc_dom.document, "body") else {
            return Ok(Vec::new());
        };

        let mut nodes = Vec::new();
        for child in body.children.borrow().iter() {
            if let Some(node) = self.convert_node(child)? {
                nodes.push(node);
            }
        }
        Ok(nodes)
    }

    /// Replaces the children of `node` with the parsed `html`.
    pub fn set_inner_html(&mut self, node: NodeId, html: &str) -> Result<()> {
        let nodes = self.parse_fragment(html)?;
        self.clear_children(node);
        for child in nodes {
            self.append_child(node, child)?;
        }
        Ok(())
    }

    fn convert_node(&mut self, handle: &Handle) -> Result<Option<NodeId>> {
        let node = match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                let id = self.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    self.set_attr(id, &attr.name.local, &attr.value);
                }
                for child in handle.children.borrow().iter() {
                    if let Some(child) = self.convert_node(child)? {
                        self.append_child(id, child)?;
                    }
                }
                id
            }
            NodeData::Text { contents } => self.create_text(&contents.borrow()),
            NodeData::Comment { contents } => self.create_node(DomNode {
                kind: NodeKind::Comment { text: contents.to_string() },
                ..Default::default()
            }),
            NodeData::Document | NodeData::Doctype { .. } | NodeData::ProcessingInstruction { .. } => {
                return Ok(None);
            }
        };
        Ok(Some(node))
    }
}
