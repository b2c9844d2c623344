//! CSS Custom Properties for Cascading Variables Module Level 1: CSS variables.
//! Spec: <https://www.w3.org/TR/css-variables-1/>
//!
//! String-level helpers for values that reference custom properties. The style
//! oracle used at build time reports `var(...)` as an opaque string, so these
//! helpers only need to find which names a value refers to and which literal it
//! falls back to; resolving the names is left to the caller.

#![forbid(unsafe_code)]

use core::ops::Range;

/// Opening token of a variable reference.
const VAR_OPEN: &str = "var(";

/// Custom property names referenced by a value and the literal default at the
/// end of its fallback chain.
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#using-variables>
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VarReferences {
    /// Names in encounter order, outermost reference first.
    pub names: Vec<String>,
    /// Literal fallback supplied by the innermost reference, if any.
    pub default: Option<String>,
}

impl VarReferences {
    /// True when the value referenced no custom property at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// True if `value` contains a `var(` reference and needs substitution.
#[inline]
pub fn contains_var_reference(value: &str) -> bool {
    value.contains(VAR_OPEN)
}

/// True if `name` is a custom property name (`--*`).
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#custom-property>
#[inline]
pub fn is_custom_property(name: &str) -> bool {
    name.starts_with("--")
}

/// Extract the custom property names referenced by `value` through nested
/// `var()` fallbacks, together with the terminal literal default.
///
/// Only the first `var(` of each level is followed, and only the text after its
/// name is descended into, so `var(--a, var(--b, yellow))` yields `[--a, --b]`
/// with default `yellow`. A reference whose parenthesis is never closed, or whose
/// name is empty, does not count as a reference.
///
/// A default is only reported when at least one name was found: a plain literal
/// yields neither names nor default.
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#using-variables>
pub fn extract_references(value: &str) -> VarReferences {
    let mut names: Vec<String> = Vec::new();
    let mut remaining = value;
    while let Some((name, fallback)) = split_first_reference(remaining) {
        names.push(name.to_owned());
        remaining = fallback;
    }
    let default = if names.is_empty() {
        None
    } else {
        literal_default(remaining)
    };
    VarReferences { names, default }
}

/// Find the first `var(` in `text` and split its arguments into the trimmed name
/// and the text that follows the name (leading comma included).
fn split_first_reference(text: &str) -> Option<(&str, &str)> {
    let open = text.find(VAR_OPEN)?;
    let args_text = text.get(open.saturating_add(VAR_OPEN.len())..)?;
    let args = args_text.get(..matching_close(args_text)?)?;
    let (name, fallback) = match args.find(',') {
        Some(comma) => (args.get(..comma)?, args.get(comma..)?),
        None => (args, ""),
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((name, fallback))
}

/// Byte offset of the `)` closing an argument list whose `(` was already consumed.
fn matching_close(args: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, character) in args.char_indices() {
        match character {
            '(' => depth = depth.saturating_add(1),
            ')' if depth == 0 => return Some(index),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// The literal left once every nested reference has been consumed: one leading
/// comma and the surrounding whitespace are dropped, and nothing left means no default.
fn literal_default(remaining: &str) -> Option<String> {
    let trimmed = remaining.trim();
    let literal = trimmed.strip_prefix(',').unwrap_or(trimmed).trim();
    (!literal.is_empty()).then(|| literal.to_owned())
}

/// Byte ranges of the top-level `var(...)` references in `value`, left to right.
///
/// A range covers `var(` through its matching `)`, so the text around it can be
/// kept when the reference is substituted: `1px solid var(--c)` yields one range
/// over `var(--c)`. References nested in another reference's fallback are part of
/// the outer range. A reference with an empty name is skipped; scanning stops at
/// an unterminated one.
pub fn reference_spans(value: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut offset = 0usize;
    while let Some(rest) = value.get(offset..) {
        let Some(found) = rest.find(VAR_OPEN) else {
            break;
        };
        let start = offset.saturating_add(found);
        let args_start = start.saturating_add(VAR_OPEN.len());
        let Some(close) = value.get(args_start..).and_then(matching_close) else {
            break;
        };
        let end = args_start.saturating_add(close).saturating_add(1);
        if value
            .get(start..end)
            .is_some_and(|reference| split_first_reference(reference).is_some())
        {
            spans.push(start..end);
        }
        offset = end;
    }
    spans
}
