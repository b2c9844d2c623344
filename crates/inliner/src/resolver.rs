//! Resolution of `var()` references against the ancestor chain.
//! Spec: <https://www.w3.org/TR/css-variables-1/#substitute-a-var>
//!
//! Computed style sets only hold what an element declares itself, so a custom
//! property used on an element is usually defined further up the tree. The
//! resolver walks from the element towards the root and takes the first
//! definition it sees.

use crate::oracle::StyleOracle;
use css_variables::{contains_var_reference, extract_references, reference_spans};
use html::{Document, NodeId};
use log::{debug, trace};

/// Resolve the custom properties referenced by `value` for `start`.
///
/// Every top-level `var(...)` in `value` is replaced by its resolution and the
/// text around it is kept, so `1px solid var(--c)` becomes `1px solid red`.
///
/// For one reference, `start` and then each ancestor element is visited. At
/// every element the referenced names are tried in encounter order and the first
/// non-empty value wins. A winning value that references other variables is
/// resolved again from `start`; if that fails the raw value is used as found.
/// When no element defines any of the names the innermost default is used, and
/// with no default the reference is left in place.
///
/// Returns `None` when no reference in `value` could be resolved.
pub fn resolve_variable<O>(doc: &Document, oracle: &O, value: &str, start: NodeId) -> Option<String>
where
    O: StyleOracle + ?Sized,
{
    let mut resolving: Vec<String> = Vec::new();
    substitute_references(doc, oracle, value, start, &mut resolving)
}

/// Splice the resolution of each top-level reference of `value` into its span.
fn substitute_references<O>(
    doc: &Document,
    oracle: &O,
    value: &str,
    start: NodeId,
    resolving: &mut Vec<String>,
) -> Option<String>
where
    O: StyleOracle + ?Sized,
{
    let mut substituted = String::with_capacity(value.len());
    let mut copied_up_to = 0usize;
    let mut any_resolved = false;
    for span in reference_spans(value) {
        substituted.push_str(value.get(copied_up_to..span.start).unwrap_or_default());
        let reference = value.get(span.clone()).unwrap_or_default();
        let resolved = resolve_reference(doc, oracle, reference, start, resolving);
        any_resolved |= resolved.is_some();
        substituted.push_str(resolved.as_deref().unwrap_or(reference));
        copied_up_to = span.end;
    }
    substituted.push_str(value.get(copied_up_to..).unwrap_or_default());
    any_resolved.then_some(substituted)
}

/// Resolve a single `var(...)` reference, fallbacks included.
fn resolve_reference<O>(
    doc: &Document,
    oracle: &O,
    reference: &str,
    start: NodeId,
    resolving: &mut Vec<String>,
) -> Option<String>
where
    O: StyleOracle + ?Sized,
{
    let references = extract_references(reference);
    if references.is_empty() {
        return None;
    }
    trace!("resolving {:?} from {start:?}", references.names);

    let mut current = Some(start);
    while let Some(element) = current {
        for name in &references.names {
            // A name already on the stack refers back to itself.
            if resolving.contains(name) {
                continue;
            }
            let Some(found) = oracle
                .value_for(element, name)
                .filter(|found| !found.trim().is_empty())
            else {
                continue;
            };
            debug!(
                "{name} = {found:?} defined on <{}> {element:?}",
                doc.tag_name(element).unwrap_or("?")
            );
            if !contains_var_reference(found) {
                return Some(found.to_owned());
            }
            resolving.push(name.clone());
            let nested = substitute_references(doc, oracle, found, start, resolving);
            resolving.pop();
            return Some(nested.unwrap_or_else(|| found.to_owned()));
        }
        current = doc.parent_element(element);
    }

    trace!("{:?} undefined, default {:?}", references.names, references.default);
    references.default
}
