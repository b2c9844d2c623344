//! CSS Cascading and Inheritance Level 4: Cascade sorting.
//! Spec: <https://www.w3.org/TR/css-cascade-4/>
//!
//! Every declaration comes from the author origin, so origin never takes part
//! in the ordering.

#![forbid(unsafe_code)]

use core::cmp::Ordering;
use css_selectors::Specificity;

/// Priority tuple used to order author declarations in the cascade.
/// Spec: Section 6.1 (Cascade sorting order)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadePriority {
    /// Spec: Section 6.4 (Importance)
    pub important: bool,
    /// Declared in a `style` attribute.
    /// Spec: Section 6.1 (Element-attached styles)
    pub inline: bool,
    /// Zero for inline declarations.
    pub specificity: Specificity,
    /// Source order index, increasing with appearance across all sheets.
    pub source_order: u32,
}

impl CascadePriority {
    /// Priority of a declaration from a style rule.
    #[inline]
    pub const fn rule(important: bool, specificity: Specificity, source_order: u32) -> Self {
        Self {
            important,
            inline: false,
            specificity,
            source_order,
        }
    }

    /// Priority of a declaration from a `style` attribute.
    #[inline]
    pub const fn inline(important: bool, source_order: u32) -> Self {
        Self {
            important,
            inline: true,
            specificity: Specificity(0, 0, 0),
            source_order,
        }
    }
}

/// Compare two `CascadePriority` values according to the cascade rules.
/// Return `Ordering::Greater` if `left` should win over `right`.
/// Spec: Section 6.1 (Cascade sorting order)
pub fn compare_priority(left: &CascadePriority, right: &CascadePriority) -> Ordering {
    // Importance first (important wins)
    if left.important != right.important {
        return bool_order_desc(left.important, right.important);
    }

    // Element-attached declarations beat any selector
    if left.inline != right.inline {
        return bool_order_desc(left.inline, right.inline);
    }

    // Specificity: higher wins
    if left.specificity != right.specificity {
        return left.specificity.cmp(&right.specificity);
    }

    // Source order: later wins
    left.source_order.cmp(&right.source_order)
}

/// Return ordering where true > false.
const fn bool_order_desc(left_wins_if_true: bool, right_wins_if_true: bool) -> Ordering {
    match (left_wins_if_true, right_wins_if_true) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(important: bool, specificity: Specificity, order: u32) -> CascadePriority {
        CascadePriority::rule(important, specificity, order)
    }

    #[test]
    fn important_beats_everything_else() {
        let important = author(true, Specificity(0, 0, 1), 0);
        let inline = CascadePriority::inline(false, 9);
        let by_id = author(false, Specificity(1, 0, 0), 5);
        assert_eq!(compare_priority(&important, &inline), Ordering::Greater);
        assert_eq!(compare_priority(&important, &by_id), Ordering::Greater);
    }

    #[test]
    fn inline_beats_rules_of_any_specificity() {
        let inline = CascadePriority::inline(false, 0);
        let by_id = author(false, Specificity(3, 0, 0), 9);
        assert_eq!(compare_priority(&inline, &by_id), Ordering::Greater);
    }

    #[test]
    fn important_inline_beats_important_rule() {
        let inline = CascadePriority::inline(true, 0);
        let rule = author(true, Specificity(1, 0, 0), 9);
        assert_eq!(compare_priority(&inline, &rule), Ordering::Greater);
    }

    #[test]
    fn specificity_then_source_order() {
        let class = author(false, Specificity(0, 1, 0), 0);
        let tag = author(false, Specificity(0, 0, 1), 1);
        assert_eq!(compare_priority(&class, &tag), Ordering::Greater);

        let early = author(false, Specificity(0, 1, 0), 1);
        let late = author(false, Specificity(0, 1, 0), 2);
        assert_eq!(compare_priority(&late, &early), Ordering::Greater);
    }
}
