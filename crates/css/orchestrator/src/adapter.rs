//! Selector matching over an `html::Document`.

use css_selectors::ElementAdapter;
use html::{Document, NodeId};

/// Borrowing adapter exposing document elements to `css_selectors`.
#[derive(Clone, Copy)]
pub struct DocumentAdapter<'doc> {
    doc: &'doc Document,
}

impl<'doc> DocumentAdapter<'doc> {
    pub const fn new(doc: &'doc Document) -> Self {
        Self { doc }
    }
}

impl ElementAdapter for DocumentAdapter<'_> {
    type Handle = NodeId;

    fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.doc.parent_element(element)
    }

    fn previous_sibling_element(&self, element: NodeId) -> Option<NodeId> {
        self.doc.previous_sibling_element(element)
    }

    fn tag_name(&self, element: NodeId) -> &str {
        self.doc.tag_name(element).unwrap_or_default()
    }

    fn element_id(&self, element: NodeId) -> Option<&str> {
        self.doc.attr(element, "id")
    }

    fn has_class(&self, element: NodeId, class: &str) -> bool {
        self.doc.has_class(element, class)
    }

    fn attr(&self, element: NodeId, name: &str) -> Option<&str> {
        self.doc.attr(element, name)
    }
}
