use crate::dom::{DOMNode, Document, NodeKind};
use core::cell::RefCell;
use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, ExpandedName, LocalName, Namespace, QualName};
use indextree::{Arena, NodeId};
use log::{trace, warn};
use smallvec::SmallVec;
use std::borrow::Cow;
use std::rc::Rc;

/// Handle given to html5ever: the arena id plus the element's qualified name,
/// which `elem_name` must hand out by reference.
#[derive(Clone, Debug)]
pub struct SinkHandle {
    id: NodeId,
    name: Rc<QualName>,
}

/// Tree builder sink that writes straight into a `Document` arena.
pub struct DocumentSink {
    arena: RefCell<Arena<DOMNode>>,
    document: NodeId,
    /// Shared name for non-element handles.
    no_name: Rc<QualName>,
}

impl Default for DocumentSink {
    fn default() -> Self {
        let mut arena = Arena::new();
        let document = arena.new_node(DOMNode::default());
        Self {
            arena: RefCell::new(arena),
            document,
            no_name: Rc::new(QualName::new(None, Namespace::from(""), LocalName::from(""))),
        }
    }
}

impl DocumentSink {
    fn handle(&self, id: NodeId) -> SinkHandle {
        SinkHandle {
            id,
            name: Rc::clone(&self.no_name),
        }
    }

    fn new_node(&self, node: DOMNode) -> NodeId {
        self.arena.borrow_mut().new_node(node)
    }

    /// Append `text` to `target` if it is a text node. Returns false otherwise.
    fn merge_text(&self, target: Option<NodeId>, text: &str) -> bool {
        let Some(target) = target else {
            return false;
        };
        let mut arena = self.arena.borrow_mut();
        match arena.get_mut(target).map(|node| &mut node.get_mut().kind) {
            Some(NodeKind::Text { text: existing }) => {
                existing.push_str(text);
                true
            }
            _ => false,
        }
    }

    fn last_child(&self, parent: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(parent)?.last_child()
    }

    fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena.borrow().get(node)?.previous_sibling()
    }

    fn append_node(&self, parent: NodeId, child: NodeId) {
        let mut arena = self.arena.borrow_mut();
        child.detach(&mut arena);
        if let Err(err) = parent.checked_append(child, &mut arena) {
            warn!("Dropping node {child:?} that cannot be appended to {parent:?}: {err}");
        }
    }

    fn insert_before(&self, sibling: NodeId, new_node: NodeId) {
        let mut arena = self.arena.borrow_mut();
        new_node.detach(&mut arena);
        if let Err(err) = sibling.checked_insert_before(new_node, &mut arena) {
            warn!("Dropping node {new_node:?} that cannot be inserted before {sibling:?}: {err}");
        }
    }
}

impl TreeSink for DocumentSink {
    type Handle = SinkHandle;
    type Output = Document;
    type ElemName<'handle> = ExpandedName<'handle>;

    fn finish(self) -> Self::Output {
        Document::from_parts(self.arena.into_inner(), self.document)
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        trace!("HTML parse error: {msg}");
    }

    fn get_document(&self) -> Self::Handle {
        self.handle(self.document)
    }

    fn elem_name<'handle>(&'handle self, target: &'handle Self::Handle) -> ExpandedName<'handle> {
        target.name.expanded()
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs: SmallVec<(String, String), 4> = attrs
            .into_iter()
            .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
            .collect();
        let id = self.new_node(DOMNode {
            kind: NodeKind::Element {
                tag: name.local.to_string(),
            },
            attrs,
        });
        SinkHandle {
            id,
            name: Rc::new(name),
        }
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        let id = self.new_node(DOMNode {
            kind: NodeKind::Comment {
                text: text.to_string(),
            },
            attrs: SmallVec::new(),
        });
        self.handle(id)
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        // Processing instructions only occur in foreign content; keep them as comments.
        self.create_comment(data)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => self.append_node(parent.id, node.id),
            NodeOrText::AppendText(text) => {
                if !self.merge_text(self.last_child(parent.id), &text) {
                    let id = self.new_node(DOMNode::text(text.to_string()));
                    self.append_node(parent.id, id);
                }
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self
            .arena
            .borrow()
            .get(element.id)
            .is_some_and(|node| node.parent().is_some());
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let id = self.new_node(DOMNode {
            kind: NodeKind::Doctype {
                name: name.to_string(),
            },
            attrs: SmallVec::new(),
        });
        self.append_node(self.document, id);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents live directly under the template element.
        target.clone()
    }

    fn same_node(&self, left: &Self::Handle, right: &Self::Handle) -> bool {
        left.id == right.id
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        match new_node {
            NodeOrText::AppendNode(node) => self.insert_before(sibling.id, node.id),
            NodeOrText::AppendText(text) => {
                if !self.merge_text(self.previous_sibling(sibling.id), &text) {
                    let id = self.new_node(DOMNode::text(text.to_string()));
                    self.insert_before(sibling.id, id);
                }
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        let mut arena = self.arena.borrow_mut();
        let Some(node) = arena.get_mut(target.id) else {
            return;
        };
        let node = node.get_mut();
        for attr in attrs {
            let name = attr.name.local.to_string();
            if node.attr(&name).is_none() {
                node.attrs.push((name, attr.value.to_string()));
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        target.id.detach(&mut self.arena.borrow_mut());
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children: Vec<NodeId> = node.id.children(&self.arena.borrow()).collect();
        for child in children {
            self.append_node(new_parent.id, child);
        }
    }
}
