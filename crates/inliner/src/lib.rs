//! Static style inlining for email HTML.
//!
//! Email clients ignore `<style>` sheets and custom properties, so every element
//! gets its computed styles written into a literal `style` attribute with each
//! `var()` reference replaced by the value of the nearest ancestor that defines
//! it. Newlines in body text become `<br>` elements and, in production builds,
//! the sheets are dropped.

pub mod cleanup;
pub mod config;
pub mod inline;
pub mod oracle;
pub mod resolver;
pub mod text;

pub use config::{InlinerConfig, RenderMode};
pub use inline::{InlineReport, inline_document};
pub use oracle::{SnapshotOracle, StyleOracle};
pub use resolver::resolve_variable;

use anyhow::Result;
use css_color::{KeepVars, StandardColorParser};
use css_orchestrator::StyleComputer;
use html::Document;

/// Parse `html`, compute its styles, inline them and serialize the result.
///
/// Colors are normalized by the standard parser, except values that reference
/// a custom property, which are kept for the resolver.
///
/// # Errors
/// Returns an error if writing to the tree fails.
pub fn inline_html(html: &str, config: &InlinerConfig) -> Result<String> {
    let mut doc = Document::parse(html);
    if !config.mode.inlines() {
        return Ok(doc.to_html());
    }
    let oracle = SnapshotOracle::compute(&doc, StyleComputer::new(KeepVars::new(StandardColorParser)));
    inline_document(&mut doc, &oracle, config)?;
    Ok(doc.to_html())
}
