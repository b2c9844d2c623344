//! CSS Syntax Module Level 3: Parsing and tokenization.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>
//!
//! Only the pieces needed to read `<style>` elements are exposed: top-level
//! qualified rules with their raw prelude and declarations. At-rules (`@media`,
//! `@font-face`, `@import`, ...) are skipped as a whole.
use cssparser::AtRuleParser as CssAtRuleParser;
use cssparser::BasicParseErrorKind;
use cssparser::CowRcStr;
use cssparser::DeclarationParser as CssDeclarationParser;
use cssparser::ParseError;
use cssparser::Parser;
use cssparser::ParserInput;
use cssparser::ParserState;
use cssparser::QualifiedRuleParser as CssQualifiedRuleParser;
use cssparser::RuleBodyItemParser as CssRuleBodyItemParser;
use cssparser::RuleBodyParser as CssRuleBodyParser;
use cssparser::StyleSheetParser;
use log::trace;

/// One `name: value` pair from a rule block, with its importance split off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name. Lowercased unless it is a custom property (`--*`),
    /// whose names are case-sensitive.
    pub name: String,
    /// Raw value text, trimmed, without a trailing `!important`.
    pub value: String,
    /// Set when the value ended in `!important`.
    pub important: bool,
}

/// A qualified rule: the selector text and the declarations of its block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyleRule {
    /// Selector list exactly as written, trimmed.
    pub prelude: String,
    /// Block declarations in source order.
    pub declarations: Vec<Declaration>,
}

/// The qualified rules of one sheet; at-rules are not kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    /// Rules in the order they appear in the sheet.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Total number of declarations across all rules.
    pub fn declaration_count(&self) -> usize {
        self.rules.iter().map(|rule| rule.declarations.len()).sum()
    }
}

/// Split `!important` off the end of a value, returning (`value_without_important`, `important_flag`).
///
/// The flag must be the last thing in the value; `!` and `important` may be
/// separated by whitespace and `important` is matched ASCII case-insensitively.
fn split_important_tail(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if let Some(bang) = trimmed.rfind('!')
        && let Some(flag) = trimmed.get(bang.saturating_add(1)..)
        && flag.trim_start().eq_ignore_ascii_case("important")
        && let Some(prefix) = trimmed.get(..bang)
    {
        return (prefix.trim_end().to_owned(), true);
    }
    (trimmed.to_owned(), false)
}

/// Property names are ASCII case-insensitive except custom properties.
fn normalize_name(name: &str) -> String {
    if name.starts_with("--") {
        name.to_owned()
    } else {
        name.to_ascii_lowercase()
    }
}

/// Collects each declaration of a block with its value text left untokenized.
struct BodyDeclParser;

impl CssDeclarationParser<'_> for BodyDeclParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'input>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
        _decl_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'input, Self::Error>> {
        let start = input.position();
        while input.next_including_whitespace_and_comments().is_ok() {}
        let (value, important) = split_important_tail(input.slice_from(start));
        Ok(Declaration {
            name: normalize_name(&name),
            value,
            important,
        })
    }
}

impl CssAtRuleParser<'_> for BodyDeclParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        _name: CowRcStr<'input>,
        _input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Ok(())
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        // Nested at-rules inside a style block are not supported.
        Err(input.new_error(BasicParseErrorKind::AtRuleBodyInvalid))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        Err(())
    }
}

impl CssQualifiedRuleParser<'_> for BodyDeclParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        _prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        Err(input.new_error(BasicParseErrorKind::QualifiedRuleInvalid))
    }
}

impl CssRuleBodyItemParser<'_, Declaration, ()> for BodyDeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

/// Builds a `StyleRule` for every qualified rule of a sheet and skips at-rules.
struct TopLevelParser;

impl CssAtRuleParser<'_> for TopLevelParser {
    type Prelude = String;
    type AtRule = StyleRule;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        name: CowRcStr<'input>,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok(name.to_string())
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::AtRule, ParseError<'input, Self::Error>> {
        trace!("Skipping @{prelude} block");
        Err(input.new_error(BasicParseErrorKind::AtRuleBodyInvalid))
    }

    #[inline]
    fn rule_without_block(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
    ) -> Result<Self::AtRule, Self::Error> {
        trace!("Skipping @{prelude} statement");
        Err(())
    }
}

impl CssQualifiedRuleParser<'_> for TopLevelParser {
    type Prelude = String;
    type QualifiedRule = StyleRule;
    type Error = ();

    #[inline]
    fn parse_prelude<'input>(
        &mut self,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::Prelude, ParseError<'input, Self::Error>> {
        let start = input.state();
        while input.next_including_whitespace_and_comments().is_ok() {}
        Ok(input.slice_from(start.position()).trim().to_owned())
    }

    #[inline]
    fn parse_block<'input>(
        &mut self,
        prelude: Self::Prelude,
        _state: &ParserState,
        input: &mut Parser<'input, '_>,
    ) -> Result<Self::QualifiedRule, ParseError<'input, Self::Error>> {
        let declarations = parse_declarations_from_block(input);
        Ok(StyleRule {
            prelude,
            declarations,
        })
    }
}

/// Declarations of one `{ ... }` block; invalid ones are dropped.
fn parse_declarations_from_block(block: &mut Parser) -> Vec<Declaration> {
    let mut body = BodyDeclParser;
    CssRuleBodyParser::new(block, &mut body)
        .flatten()
        .filter(|decl| !decl.value.is_empty() || decl.name.starts_with("--"))
        .collect()
}

/// Parse the text of a `<style>` element.
///
/// Invalid rules and declarations are dropped, as CSS error recovery requires.
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut top = TopLevelParser;
    let mut sheet = Stylesheet::default();
    for rule in StyleSheetParser::new(&mut parser, &mut top).flatten() {
        sheet.rules.push(rule);
    }
    trace!(
        "Parsed stylesheet: {} rules, {} declarations",
        sheet.rules.len(),
        sheet.declaration_count()
    );
    sheet
}
