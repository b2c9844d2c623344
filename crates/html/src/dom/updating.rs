use super::{DOMNode, Document, NodeKind};
use anyhow::{Result, anyhow};
use indextree::{Node, NodeId};

impl Document {
    /// Set (or replace) an attribute on an element. Replacing keeps the attribute's position.
    ///
    /// # Errors
    /// Returns an error if `id` is not a live element of this document.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        let node = self
            .dom
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(Node::get_mut)
            .filter(|node| node.is_element())
            .ok_or_else(|| anyhow!("cannot set attribute `{name}` on non-element {id:?}"))?;
        let value = value.into();
        match node.attrs.iter_mut().find(|(attr_name, _)| attr_name == name) {
            Some(entry) => entry.1 = value,
            None => node.attrs.push((name.to_owned(), value)),
        }
        Ok(())
    }

    /// Replace the contents of a text node.
    ///
    /// # Errors
    /// Returns an error if `id` is not a live text node.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        match self
            .dom
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(|node| &mut node.get_mut().kind)
        {
            Some(NodeKind::Text { text: contents }) => {
                *contents = text.into();
                Ok(())
            }
            _ => Err(anyhow!("{id:?} is not a text node")),
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.dom.new_node(DOMNode::element(tag.to_ascii_lowercase()))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.dom.new_node(DOMNode::text(text))
    }

    /// Append `child` as the last child of `parent`, detaching it from its old position.
    ///
    /// # Errors
    /// Returns an error if the append would create a cycle or either node is removed.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if parent.ancestors(&self.dom).any(|ancestor| ancestor == child) {
            return Err(anyhow!("cannot append {child:?} inside itself"));
        }
        child.detach(&mut self.dom);
        parent
            .checked_append(child, &mut self.dom)
            .map_err(|err| anyhow!("cannot append {child:?} to {parent:?}: {err}"))
    }

    /// Insert `new_node` immediately before `sibling`, detaching it from its old position.
    ///
    /// # Errors
    /// Returns an error if the insert would create a cycle or either node is removed.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) -> Result<()> {
        if sibling.ancestors(&self.dom).any(|ancestor| ancestor == new_node) {
            return Err(anyhow!("cannot insert {new_node:?} inside itself"));
        }
        new_node.detach(&mut self.dom);
        sibling
            .checked_insert_before(new_node, &mut self.dom)
            .map_err(|err| anyhow!("cannot insert {new_node:?} before {sibling:?}: {err}"))
    }

    /// Detach a node and its descendants from the tree and free them.
    pub fn remove(&mut self, id: NodeId) {
        id.remove_subtree(&mut self.dom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attr_replaces_in_place() -> Result<()> {
        let mut doc = Document::parse("<p id=\"a\" style=\"color: red\" class=\"c\">x</p>");
        let para = doc.elements_by_tag("p")[0];
        doc.set_attr(para, "style", "color: blue;")?;
        doc.set_attr(para, "data-debug", "{}")?;
        let names: Vec<&str> = doc.attrs(para).iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["id", "style", "class", "data-debug"]);
        assert_eq!(doc.attr(para, "style"), Some("color: blue;"));
        Ok(())
    }

    #[test]
    fn set_attr_rejects_text_nodes() {
        let mut doc = Document::parse("<p>x</p>");
        let para = doc.elements_by_tag("p")[0];
        let text = doc.text_nodes_under(para)[0];
        let err = doc.set_attr(text, "style", "").err();
        assert!(err.is_some_and(|error| error.to_string().contains("non-element")));
    }

    #[test]
    fn insert_and_remove() -> Result<()> {
        let mut doc = Document::parse("<body><p>x</p></body>");
        let para = doc.elements_by_tag("p")[0];
        let text = doc.text_nodes_under(para)[0];

        let br = doc.create_element("BR");
        let before = doc.create_text("a");
        doc.insert_before(text, before)?;
        doc.insert_before(text, br)?;
        doc.set_text(text, "b")?;
        assert!(doc.to_html().contains("<p>a<br>b</p>"));

        doc.remove(para);
        assert!(doc.elements_by_tag("p").is_empty());
        assert_eq!(doc.node(para), None);
        Ok(())
    }

    #[test]
    fn append_rejects_cycles() -> Result<()> {
        let mut doc = Document::new();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        let root = doc.root();
        doc.append_child(root, outer)?;
        doc.append_child(outer, inner)?;
        let err = doc.append_child(inner, outer).err();
        assert!(err.is_some_and(|error| error.to_string().contains("inside itself")));
        assert_eq!(doc.elements_by_tag("span"), [inner]);
        Ok(())
    }
}
