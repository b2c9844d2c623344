//! CSS selector matching engine.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::{
    Combinator, ComplexSelector, CompoundSelector, ElementAdapter, SelectorList, SimpleSelector,
};

/// Match a selector list against an element.
/// Spec: Section 5, Groups of selectors
pub fn matches_selector_list<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    list: &SelectorList,
) -> bool {
    list.selectors
        .iter()
        .any(|selector_item| matches_complex(adapter, element, selector_item))
}

/// Match a complex selector against an element (the subject).
/// Spec: Section 3, 8 (Right-to-left matching strategy)
pub fn matches_complex<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
) -> bool {
    matches_from(adapter, element, sel, sel.subject_index())
}

/// Match compound `index` against `element`, then relate the compounds to its left.
///
/// Descendant and general sibling combinators try every candidate, so a failed
/// match further left backtracks to the next ancestor or sibling.
fn matches_from<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    sel: &ComplexSelector,
    index: usize,
) -> bool {
    let Some(compound) = sel.compound(index) else {
        return false;
    };
    if !matches_compound(adapter, element, compound) {
        return false;
    }
    let Some(combinator) = sel.combinator_before(index) else {
        return true;
    };
    let left_index = index.saturating_sub(1);
    match combinator {
        Combinator::Descendant => {
            let mut current_parent = adapter.parent(element);
            while let Some(ancestor_element) = current_parent {
                if matches_from(adapter, ancestor_element, sel, left_index) {
                    return true;
                }
                current_parent = adapter.parent(ancestor_element);
            }
            false
        }
        Combinator::Child => adapter
            .parent(element)
            .is_some_and(|parent_el| matches_from(adapter, parent_el, sel, left_index)),
        Combinator::AdjacentSibling => adapter
            .previous_sibling_element(element)
            .is_some_and(|prev_el| matches_from(adapter, prev_el, sel, left_index)),
        Combinator::GeneralSibling => {
            let mut current_sibling = adapter.previous_sibling_element(element);
            while let Some(sibling_element) = current_sibling {
                if matches_from(adapter, sibling_element, sel, left_index) {
                    return true;
                }
                current_sibling = adapter.previous_sibling_element(sibling_element);
            }
            false
        }
    }
}

/// Match a compound selector against a single element.
/// Spec: Section 6
pub fn matches_compound<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    compound: &CompoundSelector,
) -> bool {
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(adapter, element, simple))
}

fn matches_simple<A: ElementAdapter>(
    adapter: &A,
    element: A::Handle,
    simple: &SimpleSelector,
) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(type_name) => adapter.tag_name(element) == type_name.as_str(),
        SimpleSelector::Class(class_name) => adapter.has_class(element, class_name),
        SimpleSelector::IdSelector(id_value) => adapter
            .element_id(element)
            .is_some_and(|value| value == id_value.as_str()),
        SimpleSelector::AttrExists(name) => adapter.attr(element, name).is_some(),
        SimpleSelector::AttrEquals { name, value } => adapter
            .attr(element, name)
            .is_some_and(|attr_value| attr_value == value.as_str()),
        SimpleSelector::Root => adapter.is_root(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_complex_selector;

    /// Flat test tree: `(tag, parent, classes)` indexed by handle.
    struct Tree {
        nodes: Vec<(&'static str, Option<usize>, &'static str)>,
    }

    impl ElementAdapter for Tree {
        type Handle = usize;

        fn parent(&self, element: usize) -> Option<usize> {
            self.nodes.get(element).and_then(|node| node.1)
        }

        fn previous_sibling_element(&self, element: usize) -> Option<usize> {
            let parent = self.parent(element);
            (0..element).rev().find(|&index| self.parent(index) == parent)
        }

        fn tag_name(&self, element: usize) -> &str {
            self.nodes.get(element).map_or("", |node| node.0)
        }

        fn element_id(&self, _element: usize) -> Option<&str> {
            None
        }

        fn has_class(&self, element: usize, class: &str) -> bool {
            self.nodes
                .get(element)
                .is_some_and(|node| node.2.split_whitespace().any(|token| token == class))
        }

        fn attr(&self, _element: usize, _name: &str) -> Option<&str> {
            None
        }
    }

    /// html > body > (div.outer > (p, span.x > em), p.last)
    fn tree() -> Tree {
        Tree {
            nodes: vec![
                ("html", None, ""),
                ("body", Some(0), ""),
                ("div", Some(1), "outer"),
                ("p", Some(2), ""),
                ("span", Some(2), "x"),
                ("em", Some(4), ""),
                ("p", Some(1), "last"),
            ],
        }
    }

    fn matches(selector: &str, element: usize) -> bool {
        parse_complex_selector(selector)
            .is_some_and(|sel| matches_complex(&tree(), element, &sel))
    }

    #[test]
    fn descendant_and_child() {
        assert!(matches("div em", 5));
        assert!(matches("div > span > em", 5));
        assert!(!matches("div > em", 5));
        assert!(matches("body > p", 6));
        assert!(!matches("div p.last", 6));
    }

    #[test]
    fn descendant_backtracks_past_first_candidate() {
        // The nearest ancestor (`span`) fails the `div` compound; the walk must continue.
        assert!(matches("body > div em", 5));
        assert!(matches("html span em", 5));
    }

    #[test]
    fn sibling_combinators() {
        assert!(matches("p + span", 4));
        assert!(matches("p ~ span", 4));
        assert!(!matches("span + p", 3));
        assert!(matches("div ~ p", 6));
        assert!(matches("div.outer + p.last", 6));
    }

    #[test]
    fn root_and_universal() {
        assert!(matches(":root", 0));
        assert!(!matches(":root", 1));
        assert!(matches(":root > * > .outer", 2));
    }
}
