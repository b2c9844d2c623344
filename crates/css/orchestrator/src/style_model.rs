//! Computed style sets produced by the style computer.

use html::NodeId;
use std::collections::{BTreeMap, HashMap};

/// Declared properties of one element after the cascade, keyed by property name.
///
/// Only properties that some matched rule or the `style` attribute declared are
/// present; nothing is inherited and no initial values are filled in. Iteration
/// is sorted by property name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComputedStyleSet {
    properties: BTreeMap<String, String>,
}

impl ComputedStyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Value of `name`, if declared.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    /// `(name, value)` pairs sorted by name.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for ComputedStyleSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (name, value) in iter {
            set.insert(name, value);
        }
        set
    }
}

/// Computed style sets of every element of one document.
#[derive(Clone, Debug, Default)]
pub struct StyleSnapshot {
    styles: HashMap<NodeId, ComputedStyleSet>,
}

impl StyleSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the set computed for `node`.
    pub fn insert(&mut self, node: NodeId, style: ComputedStyleSet) {
        self.styles.insert(node, style);
    }

    /// Computed style set of `node`; `None` for nodes that are not elements of the document.
    pub fn computed_style(&self, node: NodeId) -> Option<&ComputedStyleSet> {
        self.styles.get(&node)
    }

    /// Value of one property on `node`.
    pub fn property_value(&self, node: NodeId, name: &str) -> Option<&str> {
        self.computed_style(node)?.get(name)
    }

    /// Number of elements with a computed style set.
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iteration_is_sorted_by_name() {
        let set: ComputedStyleSet = [
            ("color", "var(--text)"),
            ("--text", "red"),
            ("background-color", "green"),
        ]
        .into_iter()
        .collect();
        let names: Vec<&str> = set.entries().map(|(name, _)| name).collect();
        assert_eq!(names, ["--text", "background-color", "color"]);
        assert_eq!(set.get("--text"), Some("red"));
    }
}
