//! Read-only view of computed styles consulted while inlining.

use css_color::ColorParser;
use css_orchestrator::{ComputedStyleSet, StyleComputer, StyleSnapshot};
use html::{Document, NodeId};

/// Source of computed style sets, keyed by element.
///
/// The inliner never mutates the oracle, so a snapshot taken before the first
/// write stays valid for the whole run.
pub trait StyleOracle {
    /// Every property declared for `element`, or `None` if the oracle has no
    /// entry for it.
    fn style_for(&self, element: NodeId) -> Option<&ComputedStyleSet>;

    /// Computed text of a substituted `value` for property `name`, as the oracle
    /// would report it had the value been declared literally. `None` rejects the
    /// value for that property.
    fn normalize_value(&self, name: &str, value: &str) -> Option<String>;

    /// Value of `name` on `element`.
    fn value_for(&self, element: NodeId, name: &str) -> Option<&str> {
        self.style_for(element)?.get(name)
    }
}

/// A style snapshot together with the computer that produced it, so substituted
/// values are normalized the same way declared ones were.
pub struct SnapshotOracle<P> {
    snapshot: StyleSnapshot,
    computer: StyleComputer<P>,
}

impl<P: ColorParser> SnapshotOracle<P> {
    /// Compute the styles of `doc` with `computer`.
    pub fn compute(doc: &Document, computer: StyleComputer<P>) -> Self {
        Self {
            snapshot: computer.compute(doc),
            computer,
        }
    }
}

impl<P: ColorParser> StyleOracle for SnapshotOracle<P> {
    fn style_for(&self, element: NodeId) -> Option<&ComputedStyleSet> {
        self.snapshot.computed_style(element)
    }

    fn normalize_value(&self, name: &str, value: &str) -> Option<String> {
        self.computer.normalize_value(name, value)
    }
}
