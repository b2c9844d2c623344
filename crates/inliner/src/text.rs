//! Line break normalization for email bodies.
//!
//! Mail clients collapse newlines in text, so every `\n` under `<body>` becomes
//! an explicit `<br>` element.

use anyhow::Result;
use html::{Document, NodeId};
use log::trace;

/// Elements whose text is not rendered as flowing content.
const RAW_TEXT_PARENTS: [&str; 2] = ["style", "script"];

/// Split every text node under `<body>` on `\n` and splice a `<br>` between the
/// fragments. Returns the number of `<br>` elements inserted.
///
/// Empty fragments are kept so consecutive newlines produce consecutive breaks.
///
/// # Errors
/// Returns an error if the tree refuses an insertion.
pub fn insert_line_breaks(doc: &mut Document) -> Result<usize> {
    let Some(body) = doc.body() else {
        return Ok(0);
    };
    let mut inserted = 0usize;
    for text_node in doc.text_nodes_under(body) {
        let in_raw_text = doc
            .parent_element(text_node)
            .and_then(|parent| doc.tag_name(parent))
            .is_some_and(|tag| RAW_TEXT_PARENTS.contains(&tag));
        if in_raw_text {
            continue;
        }
        let Some(fragments) = doc
            .text(text_node)
            .filter(|text| text.contains('\n'))
            .map(|text| text.split('\n').map(str::to_owned).collect::<Vec<_>>())
        else {
            continue;
        };
        inserted = inserted.saturating_add(split_text_node(doc, text_node, &fragments)?);
    }
    Ok(inserted)
}

/// Replace `text_node` with `fragments` separated by `<br>` elements.
fn split_text_node(doc: &mut Document, text_node: NodeId, fragments: &[String]) -> Result<usize> {
    let Some((last, leading)) = fragments.split_last() else {
        return Ok(0);
    };
    for fragment in leading {
        let fragment_node = doc.create_text(fragment.as_str());
        doc.insert_before(text_node, fragment_node)?;
        let line_break = doc.create_element("br");
        doc.insert_before(text_node, line_break)?;
    }
    doc.set_text(text_node, last.as_str())?;
    trace!("split {text_node:?} into {} fragments", fragments.len());
    Ok(leading.len())
}
