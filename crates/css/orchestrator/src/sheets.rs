//! Collection of author stylesheets from `<style>` elements.

use crate::types::Stylesheet;
use css_syntax::parse_stylesheet;
use html::{Document, NodeId};
use log::debug;

/// Text content of a `<style>` element (its text children concatenated).
fn style_text(doc: &Document, style: NodeId) -> String {
    doc.children(style)
        .filter_map(|child| doc.text(child))
        .collect()
}

/// Parse every `<style>` element of `doc`, in document order, into one author
/// stylesheet whose source order increases across sheets.
pub fn collect_document_styles(doc: &Document) -> Stylesheet {
    let mut sheet = Stylesheet::default();
    let style_elements = doc.elements_by_tag("style");
    for &style in &style_elements {
        sheet.extend_from_parsed(parse_stylesheet(&style_text(doc, style)));
    }
    debug!(
        "Collected {} rules from {} <style> elements",
        sheet.rules.len(),
        style_elements.len()
    );
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_are_numbered_in_document_order() {
        let doc = Document::parse(
            "<head><style>.a { color: red } @media print { .b { color: blue } }</style></head>\
             <body><style>.c { margin: 0 } .d { padding: 0 }</style></body>",
        );
        let sheet = collect_document_styles(&doc);
        let summary: Vec<(&str, u32)> = sheet
            .rules
            .iter()
            .map(|rule| (rule.prelude.as_str(), rule.source_order))
            .collect();
        assert_eq!(summary, [(".a", 0), (".c", 1), (".d", 2)]);
    }
}
