//! Removal of `<style>` sheets once their rules live in `style` attributes.

use html::Document;
use log::trace;

/// Remove every `<style>` element. Returns how many were removed.
pub fn remove_style_sheets(doc: &mut Document) -> usize {
    let sheets = doc.elements_by_tag("style");
    for &sheet in &sheets {
        trace!("removing <style> {sheet:?}");
        doc.remove(sheet);
    }
    sheets.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_head_and_body_sheets() {
        let mut doc = Document::parse(
            "<html><head><style>p{}</style></head><body><style>a{}</style><p>x</p></body></html>",
        );
        assert_eq!(remove_style_sheets(&mut doc), 2);
        assert!(doc.elements_by_tag("style").is_empty());
        assert_eq!(doc.elements_by_tag("p").len(), 1);
        assert_eq!(remove_style_sheets(&mut doc), 0);
    }
}
