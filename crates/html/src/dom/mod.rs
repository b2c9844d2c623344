mod printing;
mod updating;

use indextree::{Arena, NodeId};
use smallvec::SmallVec;

/// Kind-specific node payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Document,
    Doctype { name: String },
    Element { tag: String },
    Text { text: String },
    Comment { text: String },
}

/// A node in the arena. Attributes keep their source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DOMNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
}

impl DOMNode {
    /// An element node with no attributes.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Element { tag: tag.into() },
            attrs: SmallVec::new(),
        }
    }

    /// A text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text { text: text.into() },
            attrs: SmallVec::new(),
        }
    }

    pub const fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Tag name of an element; `None` for other kinds.
    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { tag } => Some(tag),
            _ => None,
        }
    }

    /// Attribute value by exact (lowercase) name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(attr_name, _)| attr_name == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTML document: an arena of nodes under a single document root.
pub struct Document {
    pub(crate) dom: Arena<DOMNode>,
    pub(crate) root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document containing only the document node.
    pub fn new() -> Self {
        let mut dom = Arena::new();
        Self {
            root: dom.new_node(DOMNode::default()),
            dom,
        }
    }

    pub(crate) const fn from_parts(dom: Arena<DOMNode>, root: NodeId) -> Self {
        Self { dom, root }
    }

    /// The document node.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Node payload, if `id` is a live node of this document.
    pub fn node(&self, id: NodeId) -> Option<&DOMNode> {
        let node = self.dom.get(id)?;
        (!node.is_removed()).then(|| node.get())
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(DOMNode::is_element)
    }

    /// Lowercase tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(DOMNode::tag_name)
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|node| node.attr(name))
    }

    /// All attributes of a node in source order.
    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        self.node(id)
            .map(|node| node.attrs.as_slice())
            .unwrap_or_default()
    }

    /// True if the element's `class` attribute contains `class` as a token.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|token| token == class))
    }

    /// Contents of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Direct children of a node.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.dom)
    }

    /// Every element in document (pre-)order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.root
            .descendants(&self.dom)
            .filter(|&id| self.is_element(id))
            .collect()
    }

    /// Elements with the given lowercase tag name, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.root
            .descendants(&self.dom)
            .filter(|&id| self.tag_name(id) == Some(tag))
            .collect()
    }

    /// The parent node if it is an element. The document node is not an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.dom.get(id)?.parent()?;
        self.is_element(parent).then_some(parent)
    }

    /// Nearest preceding sibling that is an element.
    pub fn previous_sibling_element(&self, id: NodeId) -> Option<NodeId> {
        id.preceding_siblings(&self.dom)
            .skip(1)
            .find(|&sibling| self.is_element(sibling))
    }

    /// The first `<body>` element.
    pub fn body(&self) -> Option<NodeId> {
        self.root
            .descendants(&self.dom)
            .find(|&id| self.tag_name(id) == Some("body"))
    }

    /// Text nodes in the subtree rooted at `id`, in document order.
    pub fn text_nodes_under(&self, id: NodeId) -> Vec<NodeId> {
        id.descendants(&self.dom)
            .filter(|&node| matches!(self.kind(node), Some(NodeKind::Text { .. })))
            .collect()
    }
}
