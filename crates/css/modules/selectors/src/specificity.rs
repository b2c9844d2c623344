//! CSS selector specificity calculation.
//! Spec: <https://www.w3.org/TR/selectors-3/#specificity>

use crate::{ComplexSelector, CompoundSelector, SimpleSelector};

/// Specificity triple (a, b, c).
/// Spec: Section 9, Calculating a selector's specificity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u16, pub u16, pub u16);

impl Specificity {
    /// Component-wise saturating sum.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(
            self.0.saturating_add(other.0),
            self.1.saturating_add(other.1),
            self.2.saturating_add(other.2),
        )
    }
}

/// Compute the specificity of a compound selector.
/// Spec: Section 9, Specificity (a, b, c)
pub fn specificity_of_compound(compound: &CompoundSelector) -> Specificity {
    let mut id_count = 0u16;
    let mut class_attr_count = 0u16;
    let mut type_count = 0u16;
    for simple in &compound.simples {
        match simple {
            SimpleSelector::IdSelector(_) => {
                id_count = id_count.saturating_add(1);
            }
            SimpleSelector::Class(_)
            | SimpleSelector::AttrExists(_)
            | SimpleSelector::AttrEquals { .. }
            | SimpleSelector::Root => {
                class_attr_count = class_attr_count.saturating_add(1);
            }
            SimpleSelector::Type(_) => {
                type_count = type_count.saturating_add(1);
            }
            SimpleSelector::Universal => {}
        }
    }
    Specificity(id_count, class_attr_count, type_count)
}

/// Compute the specificity of a complex selector (sum of its compounds).
/// Spec: Section 9, Specificity accumulation
pub fn specificity_of_complex(sel: &ComplexSelector) -> Specificity {
    sel.rest
        .iter()
        .fold(specificity_of_compound(&sel.first), |total, pair| {
            total.saturating_add(specificity_of_compound(&pair.1))
        })
}
