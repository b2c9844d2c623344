//! CSS cascade resolution and selector matching.
//!
//! Implements the CSS cascade algorithm for determining which declarations apply to each
//! element, considering importance, inline styles, specificity and source order.

use core::cmp::Ordering;
use std::collections::HashMap;

use crate::adapter::DocumentAdapter;
use crate::sheets::collect_document_styles;
use crate::style_model::{ComputedStyleSet, StyleSnapshot};
use crate::types;
use css_cascade::{CascadePriority, compare_priority};
use css_color::{ColorParser, is_color_property};
use css_selectors::{
    ComplexSelector, Specificity, matches_complex, parse_selector_list, specificity_of_complex,
};
use css_style_attr::parse_style_attribute;
use html::{Document, NodeId};
use log::{debug, trace};

/// Cascaded declaration augmented with metadata for conflict resolution.
#[derive(Clone, Debug)]
struct CascadedDecl {
    /// Property value as authored.
    value: String,
    /// Cascade priority of the declaration.
    priority: CascadePriority,
}

/// Insert a cascaded declaration into the property map if it wins over any existing one.
fn cascade_put(props: &mut HashMap<String, CascadedDecl>, name: &str, entry: CascadedDecl) {
    let should_insert = props.get(name).is_none_or(|previous| {
        compare_priority(&entry.priority, &previous.priority) == Ordering::Greater
    });
    if should_insert {
        props.insert(name.to_owned(), entry);
    }
}

/// A rule whose selector list has been parsed once for the whole document.
struct CompiledRule<'sheet> {
    rule: &'sheet types::Rule,
    selectors: Vec<(ComplexSelector, Specificity)>,
}

impl<'sheet> CompiledRule<'sheet> {
    fn new(rule: &'sheet types::Rule) -> Self {
        let selectors = parse_selector_list(&rule.prelude)
            .selectors
            .into_iter()
            .map(|selector| {
                let specificity = specificity_of_complex(&selector);
                (selector, specificity)
            })
            .collect::<Vec<_>>();
        if selectors.is_empty() {
            trace!("No supported selector in `{}`; rule never matches", rule.prelude);
        }
        Self { rule, selectors }
    }

    /// Highest specificity among the selectors matching `element`, if any matches.
    fn matching_specificity(
        &self,
        adapter: &DocumentAdapter<'_>,
        element: NodeId,
    ) -> Option<Specificity> {
        self.selectors
            .iter()
            .filter(|(selector, _)| matches_complex(adapter, element, selector))
            .map(|(_, specificity)| *specificity)
            .max()
    }
}

/// Computes the declared style of every element of a document.
///
/// Color-valued properties are normalized by the color parser `P`; a value the
/// parser rejects is dropped from the element's computed style set.
pub struct StyleComputer<P> {
    color_parser: P,
}

impl<P: ColorParser> StyleComputer<P> {
    /// Create a `StyleComputer` that normalizes colors with `color_parser`.
    pub const fn new(color_parser: P) -> Self {
        Self { color_parser }
    }

    /// Computed text of `value` for property `name`.
    ///
    /// Color-valued properties go through the color parser; `None` means the
    /// value is invalid for the property. Other values are returned unchanged.
    pub fn normalize_value(&self, name: &str, value: &str) -> Option<String> {
        if is_color_property(name) {
            self.color_parser.parse_color(value)
        } else {
            Some(value.to_owned())
        }
    }

    /// Compute the style snapshot of `doc` from its `<style>` elements and `style` attributes.
    pub fn compute(&self, doc: &Document) -> StyleSnapshot {
        let sheet = collect_document_styles(doc);
        let rules: Vec<CompiledRule<'_>> = sheet.rules.iter().map(CompiledRule::new).collect();
        let adapter = DocumentAdapter::new(doc);
        let mut snapshot = StyleSnapshot::new();
        for element in doc.elements() {
            let props = Self::cascade_element(doc, &adapter, &rules, element);
            snapshot.insert(element, self.finish_element(props));
        }
        debug!(
            "Computed styles for {} elements from {} rules",
            snapshot.len(),
            sheet.rules.len()
        );
        snapshot
    }

    /// Collect the winning declaration of every property declared for `element`.
    fn cascade_element(
        doc: &Document,
        adapter: &DocumentAdapter<'_>,
        rules: &[CompiledRule<'_>],
        element: NodeId,
    ) -> HashMap<String, CascadedDecl> {
        let mut props: HashMap<String, CascadedDecl> = HashMap::new();
        for compiled in rules {
            let Some(specificity) = compiled.matching_specificity(adapter, element) else {
                continue;
            };
            let rule = compiled.rule;
            for decl in &rule.declarations {
                let entry = CascadedDecl {
                    value: decl.value.clone(),
                    priority: CascadePriority::rule(
                        decl.important,
                        specificity,
                        rule.source_order,
                    ),
                };
                cascade_put(&mut props, &decl.name, entry);
            }
        }
        if let Some(style) = doc.attr(element, "style") {
            for (index, decl) in parse_style_attribute(style).into_iter().enumerate() {
                let order = u32::try_from(index).unwrap_or(u32::MAX);
                let entry = CascadedDecl {
                    priority: CascadePriority::inline(decl.important, order),
                    value: decl.value,
                };
                cascade_put(&mut props, &decl.property, entry);
            }
        }
        props
    }

    /// Turn cascaded declarations into a computed style set.
    fn finish_element(&self, props: HashMap<String, CascadedDecl>) -> ComputedStyleSet {
        let mut computed = ComputedStyleSet::new();
        for (name, entry) in props {
            match self.normalize_value(&name, &entry.value) {
                Some(value) => computed.insert(name, value),
                None => trace!("Dropping invalid color `{name}: {}`", entry.value),
            }
        }
        computed
    }
}
