//! Selectors Level 3: Element matching and specificity.
//! Spec: <https://www.w3.org/TR/selectors-3/>
//!
//! This module implements the subset used by email templates:
//! - Type, universal, class, id, `[attr]` and `[attr=value]` selectors
//! - The `:root` pseudo-class
//! - Combinators: descendant, child, adjacent sibling, general sibling
//! - Specificity calculation
//!
//! A complex selector containing anything else (other pseudo-classes,
//! pseudo-elements, attribute operators, namespaces, escapes) fails to parse
//! and is dropped from its selector list, so it never matches.

#![forbid(unsafe_code)]

mod matcher;
mod parser;
mod specificity;

// Re-export public API
pub use matcher::{matches_complex, matches_compound, matches_selector_list};
pub use parser::{parse_complex_selector, parse_selector_list};
pub use specificity::{Specificity, specificity_of_complex, specificity_of_compound};

/// Read access to an element tree, as much as matching needs.
///
/// Spec references:
/// - Section 3: Selectors overview and element matching
pub trait ElementAdapter {
    type Handle: Copy + Eq;

    /// Parent element; `None` at the top of the tree.
    /// Spec: Section 8, Combinators (for tree relationships)
    fn parent(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Nearest preceding sibling that is an element.
    /// Spec: Section 8.3 (Sibling combinators)
    fn previous_sibling_element(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// Lowercase local name.
    /// Spec: Section 6.1 (Type selectors)
    fn tag_name(&self, element: Self::Handle) -> &str;

    /// Value of the `id` attribute.
    /// Spec: Section 6.5 (ID selectors)
    fn element_id(&self, element: Self::Handle) -> Option<&str>;

    /// Whether `class` is one of the whitespace-separated tokens of the `class` attribute.
    /// Spec: Section 6.4 (Class selectors)
    fn has_class(&self, element: Self::Handle, class: &str) -> bool;

    /// Value of attribute `name`.
    /// Spec: Section 6.3 (Attribute selectors)
    fn attr(&self, element: Self::Handle, name: &str) -> Option<&str>;

    /// True if the element is the root of the document.
    /// Spec: Section 6.6.5.1 (`:root` pseudo-class)
    fn is_root(&self, element: Self::Handle) -> bool {
        self.parent(element).is_none()
    }
}

/// The simple selectors understood by the parser.
/// Spec: Section 6
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Spec: Section 6.1 (Type selectors)
    Type(String),
    /// Spec: Section 6.4 (Class selectors)
    Class(String),
    /// Spec: Section 6.5 (ID selectors)
    IdSelector(String),
    /// Spec: Section 6.3.1 (`[attr]`)
    AttrExists(String),
    /// Spec: Section 6.3.1 (`[attr=value]`)
    AttrEquals { name: String, value: String },
    /// Spec: Section 6.6.5.1 (`:root`)
    Root,
    /// Spec: Section 6.2 (Universal selector)
    Universal,
}

/// Simple selectors that must all match the same element.
/// Spec: Section 3, Sequences of simple selectors
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

/// Relationship between two adjacent compounds.
/// Spec: Section 8, Combinators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

/// Compounds joined by combinators; the last compound is the subject.
///
/// `rest[i].0` is the combinator between the compound before it (`first` for
/// `i == 0`) and `rest[i].1`. The last compound is the subject.
/// Spec: Section 3, 8
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    pub first: CompoundSelector,
    pub rest: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// Index of the subject (right-most) compound.
    #[inline]
    pub fn subject_index(&self) -> usize {
        self.rest.len()
    }

    /// Compound at `index`, counting `first` as zero.
    #[inline]
    pub fn compound(&self, index: usize) -> Option<&CompoundSelector> {
        match index.checked_sub(1) {
            None => Some(&self.first),
            Some(rest_index) => self.rest.get(rest_index).map(|pair| &pair.1),
        }
    }

    /// Combinator to the left of the compound at `index`.
    #[inline]
    pub fn combinator_before(&self, index: usize) -> Option<Combinator> {
        let rest_index = index.checked_sub(1)?;
        self.rest.get(rest_index).map(|pair| pair.0)
    }
}

/// Comma-separated selectors; an element matches if any of them matches.
/// Spec: Section 5, Groups of selectors
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SelectorList {
    pub selectors: Vec<ComplexSelector>,
}
