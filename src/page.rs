//! The hosting page shared by every widget instance on it

use std::sync::Arc;

use anyhow::Result;
use indextree::NodeId;
use tokio::sync::Mutex;

use crate::dom::Document;
use crate::skin::{AssetKind, AssetRegistry};

pub type SharedPage = Arc<Mutex<Page>>;

/// Document plus the page-wide record of injected skin assets.
///
/// Widgets reach the page only through [`SharedPage`], so the presence check
/// and the insert in [`Page::ensure_asset`] always run under one lock.
#[derive(Debug, Default)]
pub struct Page {
    document: Document,
    assets: AssetRegistry,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            assets: AssetRegistry::default(),
        }
    }

    pub fn from_html(html: &str) -> Result<Self> {
        Ok(Self::new(Document::parse_document(html)?))
    }

    pub fn shared(self) -> SharedPage {
        Arc::new(Mutex::new(self))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Appends the element for `path` to the page head unless this page
    /// already has it. Returns whether an element was inserted.
    pub fn ensure_asset(&mut self, kind: AssetKind, path: &str) -> Result<bool> {
        if self.assets.contains(path) {
            return Ok(false);
        }

        let doc = &self.document;
        let existing = doc.find_element(doc.root(), |node| {
            doc.tag(node) == Some(kind.tag()) && doc.attr(node, kind.locator_attr()) == Some(path)
        });
        if existing.is_some() {
            tracing::debug!(path, "Asset already present in page");
            self.assets.claim(path);
            return Ok(false);
        }

        let head = self.ensure_head()?;
        let element = self.document.create_element(kind.tag());
        for (name, value) in kind.attributes(path) {
            self.document.set_attr(element, name, &value);
        }
        self.document.append_child(head, element)?;
        self.assets.claim(path);

        tracing::debug!(path, kind = ?kind, "Injected skin asset");
        Ok(true)
    }

    fn ensure_head(&mut self) -> Result<NodeId> {
        if let Some(head) = self.document.head() {
            return Ok(head);
        }
        let root = self.document.root();
        let parent = self.document.first_by_tag(root, "html").unwrap_or(root);
        let head = self.document.create_element("head");
        match self.document.first_child(parent) {
            Some(first) => self.document.insert_before(first, head)?,
            None => self.document.append_child(parent, head)?,
        }
        Ok(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Selector;

    fn count(page: &Page, selector: &str) -> usize {
        let doc = page.document();
        doc.select_all(doc.root(), &Selector::parse(selector).unwrap()).len()
    }

    #[test]
    fn each_path_is_injected_once() {
        let mut page = Page::from_html("<html><head></head><body></body></html>").unwrap();

        assert!(page.ensure_asset(AssetKind::Style, "/s/skin.css").unwrap());
        assert!(!page.ensure_asset(AssetKind::Style, "/s/skin.css").unwrap());
        assert!(page.ensure_asset(AssetKind::Behavior, "/s/skin.js").unwrap());

        assert_eq!(count(&page, r#"head link[href="/s/skin.css"]"#), 1);
        assert_eq!(count(&page, r#"head script[src="/s/skin.js"]"#), 1);
        assert_eq!(page.assets().len(), 2);
    }

    #[test]
    fn assets_already_on_the_page_are_claimed_not_duplicated() {
        let mut page = Page::from_html(
            r#"<html><head><link rel="stylesheet" href="/s/skin.css"></head><body></body></html>"#,
        )
        .unwrap();

        assert!(!page.ensure_asset(AssetKind::Style, "/s/skin.css").unwrap());
        assert!(page.assets().contains("/s/skin.css"));
        assert_eq!(count(&page, "link"), 1);
    }

    #[test]
    fn head_is_created_ahead_of_existing_content() {
        let mut doc = Document::new();
        let root = doc.root();
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(root, html).unwrap();
        doc.append_child(html, body).unwrap();
        let mut page = Page::new(doc);

        page.ensure_asset(AssetKind::Behavior, "/s/skin.js").unwrap();

        let doc = page.document();
        let head = doc.head().unwrap();
        assert_eq!(doc.element_children(html), vec![head, body]);
        assert_eq!(doc.inner_html(head), r#"<script src="/s/skin.js" type="text/javascript"></script>"#);
    }

    #[test]
    fn paths_with_selector_punctuation_are_matched_literally() {
        let mut page = Page::from_html(
            r#"<html><head><link rel="stylesheet" href="/skins/My Skin/skin.css"></head><body></body></html>"#,
        )
        .unwrap();

        assert!(!page.ensure_asset(AssetKind::Style, "/skins/My Skin/skin.css").unwrap());
        assert!(page.ensure_asset(AssetKind::Behavior, "/skins/My Skin/skin.js").unwrap());
        assert!(page.ensure_asset(AssetKind::Style, r#"/skins/a]"b/skin.css"#).unwrap());
        assert!(!page.ensure_asset(AssetKind::Style, r#"/skins/a]"b/skin.css"#).unwrap());

        assert_eq!(count(&page, "link"), 2);
        assert_eq!(count(&page, "script"), 1);
        assert_eq!(page.assets().len(), 3);
    }
}
