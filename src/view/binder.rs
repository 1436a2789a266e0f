//! Lookups scoped to one widget instance

use indextree::NodeId;

use crate::dom::{Document, Selector};

/// Every query runs below the widget's mount element, so two widgets on the
/// same page never see each other's controls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementBinder {
    id: String,
    root: NodeId,
}

impl ElementBinder {
    pub fn new(id: impl Into<String>, root: NodeId) -> Self {
        Self { id: id.into(), root }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The mount element, falling back to an id lookup if the remembered
    /// node is no longer the one carrying this instance's id.
    pub fn scope(&self, doc: &Document) -> Option<NodeId> {
        if doc.node(self.root).is_some() && doc.id_of(self.root) == Some(self.id.as_str()) {
            return Some(self.root);
        }
        doc.element_by_id(&self.id)
    }

    pub fn all(&self, doc: &Document, selector: &Selector) -> Vec<NodeId> {
        self.scope(doc)
            .map(|scope| doc.select_all(scope, selector))
            .unwrap_or_default()
    }

    pub fn all_by_class(&self, doc: &Document, class: &str) -> Vec<NodeId> {
        self.all(doc, &Selector::class(class))
    }

    pub fn first(&self, doc: &Document, selector: &Selector) -> Option<NodeId> {
        doc.select_first(self.scope(doc)?, selector)
    }

    pub fn first_by_class(&self, doc: &Document, class: &str) -> Option<NodeId> {
        self.first(doc, &Selector::class(class))
    }

    /// Inclusive: the mount element itself is inside the scope.
    pub fn contains(&self, doc: &Document, node: NodeId) -> bool {
        self.scope(doc).is_some_and(|scope| doc.contains(scope, node))
    }

    /// Nearest element carrying `class`, from `node` up to the mount element.
    pub fn closest(&self, doc: &Document, node: NodeId, class: &str) -> Option<NodeId> {
        doc.closest(node, class, self.scope(doc))
    }
}
