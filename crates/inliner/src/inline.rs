//! Inlining of computed styles into literal `style` attributes.
//!
//! Runs in two passes. The first pass only reads: it resolves every element's
//! computed style set against the oracle and buffers the serialized result. The
//! second pass writes the buffer back. Keeping the passes apart means no write
//! can be observed by a later read in the same run.

use crate::cleanup::remove_style_sheets;
use crate::config::InlinerConfig;
use crate::oracle::StyleOracle;
use crate::resolver::resolve_variable;
use crate::text::insert_line_breaks;
use anyhow::{Context as _, Result};
use css_orchestrator::ComputedStyleSet;
use css_style_attr::serialize_declarations;
use css_variables::{contains_var_reference, is_custom_property};
use html::{Document, NodeId};
use log::{debug, trace};
use serde_json::{Map, Value};

/// Attribute that asks for an element's resolved styles to be logged.
const DEBUG_ATTRIBUTE: &str = "data-debug";

/// What one inlining run changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InlineReport {
    /// Elements whose `style` attribute was written.
    pub elements_inlined: usize,
    /// Variable-bearing values still holding a reference after substitution.
    pub unresolved_values: usize,
    /// Substituted values the oracle rejected for their property.
    pub values_dropped: usize,
    /// `<br>` elements inserted by text normalization.
    pub line_breaks_inserted: usize,
    /// `<style>` elements removed.
    pub style_sheets_removed: usize,
}

/// Inline the computed styles of every element of `doc`.
///
/// Does nothing in development mode. Otherwise every element with a non-empty
/// computed style set gets a `style` attribute holding that set with `var()`
/// references resolved, newlines under `<body>` become `<br>` elements, and in
/// production mode the `<style>` elements are removed.
///
/// # Errors
/// Returns an error if writing to the tree fails.
pub fn inline_document<O>(doc: &mut Document, oracle: &O, config: &InlinerConfig) -> Result<InlineReport>
where
    O: StyleOracle + ?Sized,
{
    let mut report = InlineReport::default();
    if !config.mode.inlines() {
        debug!("{} mode: leaving document untouched", config.mode);
        return Ok(report);
    }

    let buffer = collect_inline_styles(doc, oracle, config.keep_custom_properties, &mut report);

    for (element, style) in buffer {
        doc.set_attr(element, "style", style)
            .with_context(|| format!("failed to inline styles on {element:?}"))?;
        report.elements_inlined = report.elements_inlined.saturating_add(1);
    }

    report.line_breaks_inserted =
        insert_line_breaks(doc).context("failed to normalize line breaks")?;

    if config.mode.strips_style_sheets() {
        report.style_sheets_removed = remove_style_sheets(doc);
    }

    debug!("elements inlined: {}", report.elements_inlined);
    debug!("unresolved values: {}", report.unresolved_values);
    debug!("values dropped: {}", report.values_dropped);
    debug!("line breaks inserted: {}", report.line_breaks_inserted);
    debug!("style sheets removed: {}", report.style_sheets_removed);
    Ok(report)
}

/// First pass: serialize the resolved style set of every element.
///
/// Returns the `(element, style)` buffer in document order. Substituted values
/// are normalized by the oracle, so a second run over the output reads back
/// exactly what was written.
fn collect_inline_styles<O>(
    doc: &Document,
    oracle: &O,
    keep_custom_properties: bool,
    report: &mut InlineReport,
) -> Vec<(NodeId, String)>
where
    O: StyleOracle + ?Sized,
{
    let mut buffer: Vec<(NodeId, String)> = Vec::new();
    for element in doc.elements() {
        let Some(style) = oracle.style_for(element).filter(|style| !style.is_empty())
        else {
            continue;
        };
        let mut pairs: Vec<(&str, String)> = Vec::with_capacity(style.len());
        for (name, value) in style.entries() {
            if is_custom_property(name) && !keep_custom_properties {
                continue;
            }
            if !contains_var_reference(value) {
                pairs.push((name, value.to_owned()));
                continue;
            }
            let Some(resolved) = resolve_variable(doc, oracle, value, element) else {
                trace!("{name}: {value} unresolved on {element:?}");
                report.unresolved_values = report.unresolved_values.saturating_add(1);
                pairs.push((name, value.to_owned()));
                continue;
            };
            if contains_var_reference(&resolved) {
                report.unresolved_values = report.unresolved_values.saturating_add(1);
            }
            let Some(normalized) = oracle.normalize_value(name, &resolved) else {
                debug!("dropping `{name}: {resolved}` on {element:?}: invalid after substitution");
                report.values_dropped = report.values_dropped.saturating_add(1);
                continue;
            };
            pairs.push((name, normalized));
        }
        if doc.attr(element, DEBUG_ATTRIBUTE).is_some() {
            log_debug_element(doc, element, style, &pairs);
        }
        let serialized =
            serialize_declarations(pairs.iter().map(|(name, value)| (*name, value.as_str())));
        if serialized.is_empty() {
            continue;
        }
        buffer.push((element, serialized));
    }
    buffer
}

/// Log the oracle's set and the resolved pairs of an element marked `data-debug`.
fn log_debug_element(
    doc: &Document,
    element: NodeId,
    computed: &ComputedStyleSet,
    resolved: &[(&str, String)],
) {
    let computed_json: Map<String, Value> = computed
        .entries()
        .map(|(name, value)| (name.to_owned(), Value::String(value.to_owned())))
        .collect();
    let resolved_json: Map<String, Value> = resolved
        .iter()
        .map(|(name, value)| ((*name).to_owned(), Value::String(value.clone())))
        .collect();
    debug!(
        "<{}> {element:?} computed {} resolved {}",
        doc.tag_name(element).unwrap_or("?"),
        Value::Object(computed_json),
        Value::Object(resolved_json)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderMode;
    use css_color::{ColorParser as _, StandardColorParser, is_color_property};
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapOracle {
        styles: HashMap<NodeId, ComputedStyleSet>,
    }

    impl StyleOracle for MapOracle {
        fn style_for(&self, element: NodeId) -> Option<&ComputedStyleSet> {
            self.styles.get(&element)
        }

        fn normalize_value(&self, name: &str, value: &str) -> Option<String> {
            if is_color_property(name) {
                StandardColorParser.parse_color(value)
            } else {
                Some(value.to_owned())
            }
        }
    }

    fn production() -> InlinerConfig {
        InlinerConfig::new(RenderMode::Production, false)
    }

    #[test]
    fn writes_resolved_styles_and_drops_custom_properties() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut doc = Document::parse(
            "<body><div><p style=\"margin: 9px\" data-debug>x</p><span>y</span></div></body>",
        );
        let div = doc.elements_by_tag("div")[0];
        let para = doc.elements_by_tag("p")[0];
        let mut oracle = MapOracle::default();
        oracle.styles.insert(
            div,
            [("--accent", "teal"), ("padding", "2px")].into_iter().collect(),
        );
        oracle.styles.insert(
            para,
            [("color", "var(--accent)"), ("margin", "0")].into_iter().collect(),
        );

        let report = inline_document(&mut doc, &oracle, &production())?;

        assert_eq!(doc.attr(div, "style"), Some("padding: 2px;"));
        assert_eq!(doc.attr(para, "style"), Some("color: teal; margin: 0;"));
        let span = doc.elements_by_tag("span")[0];
        assert_eq!(doc.attr(span, "style"), None);
        assert_eq!(report.elements_inlined, 2);
        assert_eq!(report.unresolved_values, 0);
        Ok(())
    }

    #[test]
    fn only_custom_properties_leave_element_untouched() -> Result<()> {
        let mut doc = Document::parse("<body><div>x</div></body>");
        let div = doc.elements_by_tag("div")[0];
        let mut oracle = MapOracle::default();
        oracle.styles.insert(div, [("--accent", "teal")].into_iter().collect());

        let report = inline_document(&mut doc, &oracle, &production())?;
        assert_eq!(doc.attr(div, "style"), None);
        assert_eq!(report.elements_inlined, 0);
        Ok(())
    }

    #[test]
    fn keeps_custom_properties_when_configured() -> Result<()> {
        let mut doc = Document::parse("<body><div>x</div></body>");
        let div = doc.elements_by_tag("div")[0];
        let mut oracle = MapOracle::default();
        oracle
            .styles
            .insert(div, [("--accent", "teal"), ("color", "var(--accent)")].into_iter().collect());

        let config = InlinerConfig::new(RenderMode::Production, true);
        inline_document(&mut doc, &oracle, &config)?;
        assert_eq!(doc.attr(div, "style"), Some("--accent: teal; color: teal;"));
        Ok(())
    }

    #[test]
    fn unresolved_values_keep_the_oracle_value() -> Result<()> {
        let mut doc = Document::parse("<body><div>x</div></body>");
        let div = doc.elements_by_tag("div")[0];
        let mut oracle = MapOracle::default();
        oracle
            .styles
            .insert(div, [("background-color", "var(--var-b)")].into_iter().collect());

        let report = inline_document(&mut doc, &oracle, &production())?;
        assert_eq!(doc.attr(div, "style"), Some("background-color: var(--var-b);"));
        assert_eq!(report.unresolved_values, 1);
        Ok(())
    }

    #[test]
    fn development_mode_is_a_no_op() -> Result<()> {
        let mut doc = Document::parse("<style>p{}</style><body><p>a\nb</p></body>");
        let para = doc.elements_by_tag("p")[0];
        let mut oracle = MapOracle::default();
        oracle.styles.insert(para, [("color", "red")].into_iter().collect());
        let before = doc.to_html();

        let config = InlinerConfig::new(RenderMode::Development, false);
        let report = inline_document(&mut doc, &oracle, &config)?;

        assert_eq!(report, InlineReport::default());
        assert_eq!(doc.to_html(), before);
        Ok(())
    }

    #[test]
    fn substituted_colors_are_normalized() -> Result<()> {
        let mut doc = Document::parse("<body><div><p>x</p></div></body>");
        let div = doc.elements_by_tag("div")[0];
        let para = doc.elements_by_tag("p")[0];
        let mut oracle = MapOracle::default();
        oracle.styles.insert(div, [("--brand", "#ff0000")].into_iter().collect());
        oracle.styles.insert(
            para,
            [
                ("color", "var(--brand)"),
                ("background-color", "var(--none, #00FF00)"),
                ("border", "1px solid var(--brand)"),
            ]
            .into_iter()
            .collect(),
        );

        inline_document(&mut doc, &oracle, &production())?;
        assert_eq!(
            doc.attr(para, "style"),
            Some("background-color: rgb(0, 255, 0); border: 1px solid #ff0000; color: rgb(255, 0, 0);")
        );
        Ok(())
    }

    #[test]
    fn substituted_values_rejected_for_the_property_are_dropped() -> Result<()> {
        let mut doc = Document::parse("<body><div><p>x</p></div></body>");
        let div = doc.elements_by_tag("div")[0];
        let para = doc.elements_by_tag("p")[0];
        let mut oracle = MapOracle::default();
        oracle.styles.insert(div, [("--brand", "hippie")].into_iter().collect());
        oracle.styles.insert(
            para,
            [("color", "var(--brand)"), ("margin", "0")].into_iter().collect(),
        );

        let report = inline_document(&mut doc, &oracle, &production())?;
        assert_eq!(doc.attr(para, "style"), Some("margin: 0;"));
        assert_eq!(report.values_dropped, 1);
        Ok(())
    }
}
