use core::fmt;

use super::{DOMNode, Document, NodeKind};
use indextree::NodeId;

use serde_json::{Map, Value, json};

/// Elements that never have an end tag or contents.
/// Spec: <https://html.spec.whatwg.org/multipage/syntax.html#void-elements>
const VOID_ELEMENTS: [&str; 17] = [
    "area", "base", "basefont", "bgsound", "br", "col", "embed", "frame", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track",
];

/// Elements whose text children are serialized without escaping.
/// Spec: <https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments>
const RAW_TEXT_ELEMENTS: [&str; 8] = [
    "style",
    "script",
    "xmp",
    "iframe",
    "noembed",
    "noframes",
    "plaintext",
    "noscript",
];

// -----------------------
// Module-scope helpers
// -----------------------

fn flush_text(children: &mut Vec<Value>, text_buf: &mut String) {
    if !text_buf.trim().is_empty() {
        children.push(json!({ "type": "text", "text": text_buf.clone() }));
    }
    text_buf.clear();
}

fn push_non_null(children: &mut Vec<Value>, value: Value) {
    if !value.is_null() {
        children.push(value);
    }
}

fn sorted_attrs(node: &DOMNode) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = node
        .attrs
        .iter()
        .map(|(name, value)| (name.as_str(), value.as_str()))
        .collect();
    pairs.sort_by(|left, right| left.0.cmp(right.0));
    pairs
}

fn coalesce_children(doc: &Document, id: NodeId) -> Vec<Value> {
    let mut children: Vec<Value> = Vec::new();
    let mut text_buf = String::new();
    for child in id.children(&doc.dom) {
        if let Some(text) = doc.text(child) {
            text_buf.push_str(text);
            continue;
        }
        flush_text(&mut children, &mut text_buf);
        push_non_null(&mut children, node_to_json(doc, child));
    }
    flush_text(&mut children, &mut text_buf);
    children
}

fn node_to_json(doc: &Document, id: NodeId) -> Value {
    let Some(node) = doc.node(id) else {
        return Value::Null;
    };
    match &node.kind {
        NodeKind::Document => json!({ "type": "document", "children": coalesce_children(doc, id) }),
        NodeKind::Doctype { name } => json!({ "type": "doctype", "name": name }),
        NodeKind::Element { tag } => {
            let mut attrs_obj = Map::new();
            for (name, value) in sorted_attrs(node) {
                attrs_obj.insert(name.to_owned(), Value::String(value.to_owned()));
            }
            json!({
                "type": "element",
                "tag": tag,
                "attrs": Value::Object(attrs_obj),
                "children": coalesce_children(doc, id),
            })
        }
        NodeKind::Text { text } => {
            if text.trim().is_empty() {
                Value::Null
            } else {
                json!({ "type": "text", "text": text })
            }
        }
        NodeKind::Comment { .. } => Value::Null,
    }
}

fn write_indent(formatter: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        formatter.write_str("  ")?;
    }
    Ok(())
}

fn escape_debug_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(character),
        }
    }
    out
}

fn fmt_node(
    doc: &Document,
    id: NodeId,
    formatter: &mut fmt::Formatter<'_>,
    depth: usize,
) -> fmt::Result {
    let Some(node) = doc.node(id) else {
        return Ok(());
    };
    match &node.kind {
        NodeKind::Document => {
            write_indent(formatter, depth)?;
            writeln!(formatter, "#document")?;
        }
        NodeKind::Doctype { name } => {
            write_indent(formatter, depth)?;
            writeln!(formatter, "<!DOCTYPE {name}>")?;
            return Ok(());
        }
        NodeKind::Element { tag } => {
            write_indent(formatter, depth)?;
            write!(formatter, "<{tag}")?;
            for (name, value) in sorted_attrs(node) {
                write!(formatter, " {name}=\"{}\"", escape_debug_text(value))?;
            }
            writeln!(formatter, ">")?;
        }
        NodeKind::Text { text } => {
            // Skip pure-whitespace text nodes in the printer for cleaner output
            if !text.chars().all(char::is_whitespace) {
                write_indent(formatter, depth)?;
                writeln!(formatter, "\"{}\"", escape_debug_text(text))?;
            }
            return Ok(());
        }
        NodeKind::Comment { text } => {
            write_indent(formatter, depth)?;
            writeln!(formatter, "<!-- {} -->", escape_debug_text(text))?;
            return Ok(());
        }
    }
    for child in id.children(&doc.dom) {
        fmt_node(doc, child, formatter, depth.saturating_add(1))?;
    }
    if let NodeKind::Element { tag } = &node.kind {
        write_indent(formatter, depth)?;
        writeln!(formatter, "</{tag}>")?;
    }
    Ok(())
}

impl fmt::Debug for Document {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(formatter, "Document")?;
        fmt_node(self, self.root, formatter, 0)
    }
}

/// Escape text content: `&`, `<`, `>` and no-break spaces.
fn escape_text_into(out: &mut String, text: &str) {
    for character in text.chars() {
        match character {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(character),
        }
    }
}

/// Escape attribute values: `&`, `"` and no-break spaces.
fn escape_attr_into(out: &mut String, value: &str) {
    for character in value.chars() {
        match character {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(character),
        }
    }
}

fn serialize_children(doc: &Document, id: NodeId, out: &mut String) {
    let raw_text = doc
        .tag_name(id)
        .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
    for child in id.children(&doc.dom) {
        match doc.kind(child) {
            Some(NodeKind::Text { text }) if raw_text => out.push_str(text),
            Some(_) => serialize_node(doc, child, out),
            None => {}
        }
    }
}

fn serialize_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };
    match &node.kind {
        NodeKind::Document => serialize_children(doc, id, out),
        NodeKind::Doctype { name } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Text { text } => escape_text_into(out, text),
        NodeKind::Comment { text } => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element { tag } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in &node.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_attr_into(out, value);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            // The parser drops one leading newline in these elements.
            if matches!(tag.as_str(), "pre" | "textarea" | "listing")
                && id
                    .children(&doc.dom)
                    .next()
                    .and_then(|first| doc.text(first))
                    .is_some_and(|text| text.starts_with('\n'))
            {
                out.push('\n');
            }
            serialize_children(doc, id, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

impl Document {
    /// Serialize the document as HTML.
    ///
    /// Attributes are written in source order with double quotes; void elements
    /// get no end tag; text inside raw text elements (`style`, `script`, ...) is
    /// written verbatim.
    ///
    /// Spec: <https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments>
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        serialize_node(self, self.root, &mut out);
        out
    }

    /// Build a deterministic JSON representation of the document.
    /// Schema:
    /// - Document: { "type":"document", "children":[ ... ] }
    /// - Doctype: { "type":"doctype", "name":"html" }
    /// - Element: { "type":"element", "tag": "div", "attrs": {..}, "children":[ ... ] }
    /// - Text: { "type":"text", "text":"..." }
    ///
    /// Adjacent text nodes are merged, whitespace-only text and comments are skipped.
    pub fn to_json_value(&self) -> Value {
        node_to_json(self, self.root)
    }

    /// Pretty JSON string for snapshots and test comparisons.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_else(|_| String::from("{}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_void_and_raw_text_elements() {
        let doc = Document::parse(
            "<!DOCTYPE html><html><head><style>p > a { color: red }</style></head>\
             <body><p class=\"x\">a &amp; b<br>c</p><!--note--></body></html>",
        );
        assert_eq!(
            doc.to_html(),
            "<!DOCTYPE html><html><head><style>p > a { color: red }</style></head>\
             <body><p class=\"x\">a &amp; b<br>c</p><!--note--></body></html>"
        );
    }

    #[test]
    fn escapes_attribute_values() {
        let doc = Document::parse("<p title='say \"hi\" &amp; bye'>x</p>");
        assert!(
            doc.to_html()
                .contains("<p title=\"say &quot;hi&quot; &amp; bye\">x</p>")
        );
    }

    #[test]
    fn json_snapshot_merges_text_and_sorts_attributes() {
        let doc = Document::parse("<body><p id=\"b\" class=\"a\">one</p>  <!--c--></body>");
        let body = doc.to_json_value()["children"][0]["children"][1].clone();
        assert_eq!(
            body,
            json!({
                "type": "element",
                "tag": "body",
                "attrs": {},
                "children": [{
                    "type": "element",
                    "tag": "p",
                    "attrs": { "class": "a", "id": "b" },
                    "children": [{ "type": "text", "text": "one" }],
                }],
            })
        );
    }

    #[test]
    fn debug_printer_indents_tree() {
        let doc = Document::parse("<p>hi</p>");
        let printed = format!("{doc:?}");
        assert!(printed.starts_with("Document\n#document\n  <html>\n"));
        assert!(printed.contains("      <p>\n        \"hi\"\n      </p>\n"));
    }
}
