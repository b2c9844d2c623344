#![cfg(test)]

use html::{Document, NodeKind};

const EMAIL: &str = "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
<style>.a > p { color: red; }</style></head>\
<body><table role=\"presentation\"><tr><td class=\"a\"><p style=\"margin: 0;\">Hi &lt;there&gt;</p>\
<img src=\"x.png\" alt=\"\"></td></tr></table><pre>\n\nkept</pre><script>if (a < b) {}</script></body></html>";

#[test]
fn serialization_is_stable_across_reparse() {
    let _ = env_logger::builder().is_test(true).try_init();
    let first = Document::parse(EMAIL).to_html();
    let second = Document::parse(&first).to_html();
    assert_eq!(first, second);
}

#[test]
fn serialization_keeps_markup_details() {
    let _ = env_logger::builder().is_test(true).try_init();
    let html = Document::parse(EMAIL).to_html();
    assert!(html.starts_with("<!DOCTYPE html><html><head><meta charset=\"utf-8\">"));
    assert!(html.contains("<style>.a > p { color: red; }</style>"));
    assert!(html.contains("<tbody><tr><td class=\"a\">"));
    assert!(html.contains("<p style=\"margin: 0;\">Hi &lt;there&gt;</p>"));
    assert!(html.contains("<img src=\"x.png\" alt=\"\"></td>"));
    assert!(html.contains("<pre>\n\nkept</pre>"));
    assert!(html.contains("<script>if (a < b) {}</script>"));
}

#[test]
fn json_snapshot_is_deterministic() {
    let _ = env_logger::builder().is_test(true).try_init();
    let doc = Document::parse(EMAIL);
    assert_eq!(doc.to_json_string(), Document::parse(&doc.to_html()).to_json_string());
    let style = doc.elements_by_tag("style")[0];
    let text = doc.children(style).next().and_then(|id| doc.kind(id).cloned());
    assert_eq!(
        text,
        Some(NodeKind::Text {
            text: ".a > p { color: red; }".to_owned()
        })
    );
}
