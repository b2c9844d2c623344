//! CSS selector parsing.
//! Spec: <https://www.w3.org/TR/selectors-3/>

use crate::{Combinator, ComplexSelector, CompoundSelector, SelectorList, SimpleSelector};
use core::mem::take;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Internal tokenizer token kinds.
enum Tok {
    /// A combinator token like child/adjacent/general sibling.
    Combinator(Combinator),
    /// Whitespace, which implies a descendant combinator between compounds.
    Whitespace,
    /// A simple selector token (type, class, id, attribute, universal, `:root`).
    Simple(SimpleSelector),
    /// Syntax outside the supported subset.
    Unsupported,
}

/// Tokenizer over a selector string.
struct SelectorTokenizer<'src> {
    /// Selector source text.
    input: &'src str,
    /// Current byte offset into `input`.
    index: usize,
}

impl<'src> SelectorTokenizer<'src> {
    /// Construct a tokenizer from input.
    #[inline]
    const fn new(input: &'src str) -> Self {
        Self { input, index: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.index).copied()
    }

    #[inline]
    fn bump(&mut self) {
        self.index = self.index.saturating_add(1);
    }

    /// Return the next selector token, if any.
    fn next_token(&mut self) -> Option<Tok> {
        let current = self.peek()?;
        let token = match current {
            byte if byte.is_ascii_whitespace() => {
                self.skip_spaces();
                Tok::Whitespace
            }
            b'*' => {
                self.bump();
                Tok::Simple(SimpleSelector::Universal)
            }
            b'.' => {
                self.bump();
                self.consume_named(SimpleSelector::Class)
            }
            b'#' => {
                self.bump();
                self.consume_named(SimpleSelector::IdSelector)
            }
            b'[' => self.consume_attr(),
            b':' => self.consume_pseudo(),
            b'>' => {
                self.bump();
                Tok::Combinator(Combinator::Child)
            }
            b'+' => {
                self.bump();
                Tok::Combinator(Combinator::AdjacentSibling)
            }
            b'~' => {
                self.bump();
                Tok::Combinator(Combinator::GeneralSibling)
            }
            byte if is_ident_byte(byte) => {
                let ident = self.consume_ident();
                Tok::Simple(SimpleSelector::Type(ident.to_ascii_lowercase()))
            }
            _ => Tok::Unsupported,
        };
        Some(token)
    }

    /// Consume an identifier of ASCII alphanumerics, `-`, `_` and non-ASCII characters.
    fn consume_ident(&mut self) -> &'src str {
        let start = self.index;
        while self.peek().is_some_and(is_ident_byte) {
            self.bump();
        }
        self.input.get(start..self.index).unwrap_or_default()
    }

    /// Parse the identifier after `.` or `#`; case is preserved.
    fn consume_named(&mut self, build: fn(String) -> SimpleSelector) -> Tok {
        let ident = self.consume_ident();
        if ident.is_empty() {
            return Tok::Unsupported;
        }
        Tok::Simple(build(ident.to_owned()))
    }

    /// Parse `:root`. Every other pseudo-class or pseudo-element is unsupported.
    fn consume_pseudo(&mut self) -> Tok {
        self.bump();
        if self.peek() == Some(b':') {
            return Tok::Unsupported;
        }
        let ident = self.consume_ident();
        if ident.eq_ignore_ascii_case("root") && self.peek() != Some(b'(') {
            return Tok::Simple(SimpleSelector::Root);
        }
        Tok::Unsupported
    }

    /// Parse `[name]` or `[name=value]` with a quoted or unquoted value.
    fn consume_attr(&mut self) -> Tok {
        // skip '['
        self.bump();
        self.skip_spaces();
        let name = self.consume_ident().to_ascii_lowercase();
        if name.is_empty() {
            return Tok::Unsupported;
        }
        self.skip_spaces();
        match self.peek() {
            Some(b']') => {
                self.bump();
                Tok::Simple(SimpleSelector::AttrExists(name))
            }
            Some(b'=') => {
                self.bump();
                self.skip_spaces();
                let value = match self.peek() {
                    Some(quote @ (b'"' | b'\'')) => {
                        self.bump();
                        match self.consume_quoted_attr_value(quote) {
                            Some(value) => value,
                            None => return Tok::Unsupported,
                        }
                    }
                    _ => self.consume_ident(),
                };
                self.skip_spaces();
                if self.peek() != Some(b']') {
                    return Tok::Unsupported;
                }
                self.bump();
                Tok::Simple(SimpleSelector::AttrEquals {
                    name,
                    value: value.to_owned(),
                })
            }
            _ => Tok::Unsupported,
        }
    }

    /// Consume a quoted attribute value up to and including the matching quote byte.
    fn consume_quoted_attr_value(&mut self, quote: u8) -> Option<&'src str> {
        let start = self.index;
        while self.peek().is_some_and(|byte| byte != quote) {
            self.bump();
        }
        self.peek()?;
        let value = self.input.get(start..self.index)?;
        self.bump();
        Some(value)
    }

    /// Skip ASCII whitespace.
    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.bump();
        }
    }
}

/// Identifier bytes. Non-ASCII bytes only occur inside multi-byte characters,
/// so slicing on the surrounding ASCII bytes stays on character boundaries.
const fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || byte >= 0x80
}

/// Split a selector list on commas outside brackets and quotes.
fn split_selector_list(input: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (index, character) in input.char_indices() {
        match (quote, character) {
            (Some(open), current) if current == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(character),
            (None, '[' | '(') => depth = depth.saturating_add(1),
            (None, ']' | ')') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(input.get(start..index).unwrap_or_default());
                start = index.saturating_add(1);
            }
            _ => {}
        }
    }
    parts.push(input.get(start..).unwrap_or_default());
    parts
}

/// Parse a selector list from CSS text.
///
/// Selectors that fail to parse are dropped; the remaining ones are kept.
/// Spec: Section 5, Groups of selectors
pub fn parse_selector_list(input: &str) -> SelectorList {
    SelectorList {
        selectors: split_selector_list(input)
            .into_iter()
            .filter_map(parse_complex_selector)
            .collect(),
    }
}

/// Parse one complex selector.
///
/// Returns `None` for empty input, dangling combinators, or any syntax outside
/// the supported subset.
/// Spec: Section 8, Combinators; Section 6: simple selectors
pub fn parse_complex_selector(input: &str) -> Option<ComplexSelector> {
    let mut tokens = SelectorTokenizer::new(input.trim());
    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators: Vec<Combinator> = Vec::new();
    let mut current = CompoundSelector::default();
    let mut pending_combinator: Option<Combinator> = None;

    while let Some(token) = tokens.next_token() {
        match token {
            Tok::Unsupported => return None,
            Tok::Whitespace => {
                if !current.simples.is_empty() {
                    compounds.push(take(&mut current));
                    pending_combinator = Some(Combinator::Descendant);
                }
            }
            Tok::Combinator(comb) => {
                if !current.simples.is_empty() {
                    compounds.push(take(&mut current));
                } else if compounds.is_empty()
                    || pending_combinator.is_some_and(|pending| pending != Combinator::Descendant)
                {
                    return None;
                }
                pending_combinator = Some(comb);
            }
            Tok::Simple(simple) => {
                if current.simples.is_empty() && !compounds.is_empty() {
                    combinators.push(pending_combinator.take().unwrap_or(Combinator::Descendant));
                }
                current.simples.push(simple);
            }
        }
    }

    if current.simples.is_empty() {
        if pending_combinator.is_some_and(|pending| pending != Combinator::Descendant) {
            return None;
        }
    } else {
        compounds.push(current);
    }

    let mut compounds_iter = compounds.into_iter();
    let first = compounds_iter.next()?;
    Some(ComplexSelector {
        first,
        rest: combinators.into_iter().zip(compounds_iter).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compound(simples: Vec<SimpleSelector>) -> CompoundSelector {
        CompoundSelector { simples }
    }

    #[test]
    fn parses_compound_parts() {
        let sel = parse_complex_selector("P.Note#Main[data-x][color=\"hippie\"]");
        let expected = compound(vec![
            SimpleSelector::Type("p".to_owned()),
            SimpleSelector::Class("Note".to_owned()),
            SimpleSelector::IdSelector("Main".to_owned()),
            SimpleSelector::AttrExists("data-x".to_owned()),
            SimpleSelector::AttrEquals {
                name: "color".to_owned(),
                value: "hippie".to_owned(),
            },
        ]);
        assert_eq!(sel.map(|parsed| parsed.first), Some(expected));
    }

    #[test]
    fn keeps_explicit_combinators() {
        let sel = parse_complex_selector("div > p + span ~ a b").unwrap_or_default();
        let combinators: Vec<Combinator> = sel.rest.iter().map(|pair| pair.0).collect();
        assert_eq!(
            combinators,
            [
                Combinator::Child,
                Combinator::AdjacentSibling,
                Combinator::GeneralSibling,
                Combinator::Descendant,
            ]
        );
        assert_eq!(sel.subject_index(), 4);
    }

    #[test]
    fn combinators_without_spaces() {
        let sel = parse_complex_selector("ul>li").unwrap_or_default();
        assert_eq!(sel.rest.len(), 1);
        assert_eq!(sel.rest[0].0, Combinator::Child);
    }

    #[test]
    fn root_pseudo_class() {
        let sel = parse_complex_selector(":root").unwrap_or_default();
        assert_eq!(sel.first.simples, [SimpleSelector::Root]);
    }

    #[test]
    fn unsupported_syntax_is_rejected() {
        assert_eq!(parse_complex_selector("a:hover"), None);
        assert_eq!(parse_complex_selector("p::before"), None);
        assert_eq!(parse_complex_selector("li:nth-child(2)"), None);
        assert_eq!(parse_complex_selector("[lang|=en]"), None);
        assert_eq!(parse_complex_selector("> p"), None);
        assert_eq!(parse_complex_selector("p >"), None);
        assert_eq!(parse_complex_selector("a > > b"), None);
        assert_eq!(parse_complex_selector("."), None);
        assert_eq!(parse_complex_selector(""), None);
    }

    #[test]
    fn list_drops_only_invalid_members() {
        let list = parse_selector_list("a:hover, .button, [title=\"a,b\"]");
        assert_eq!(list.selectors.len(), 2);
        assert_eq!(
            list.selectors[1].first.simples,
            [SimpleSelector::AttrEquals {
                name: "title".to_owned(),
                value: "a,b".to_owned(),
            }]
        );
    }
}
