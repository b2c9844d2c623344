//! CSS Style Attributes: style="..." attribute processing.
//! Spec: <https://www.w3.org/TR/css-style-attr/>

#![forbid(unsafe_code)]

use std::collections::HashMap;

/// A single CSS declaration parsed from a style attribute.
///
/// Spec: <https://www.w3.org/TR/css-style-attr/#interpreting>
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    /// Property name. Standard properties are ASCII-lowercased; custom
    /// properties (`--*`) keep their case because they are case-sensitive.
    pub property: String,
    /// Raw value trimmed of surrounding ASCII whitespace, without `!important`.
    pub value: String,
    /// Whether the declaration carried an `!important` flag.
    pub important: bool,
}

/// Parse the value of a `style` attribute into a list of declarations.
///
/// This performs a resilient, string-level parse:
/// - Splits on semicolons (`;`) that are not inside parentheses or quotes, so
///   values such as `url("data:image/png;base64,...")` stay intact.
/// - For each item, splits on the first colon (`:`) into property and value.
/// - Strips a trailing `!important` and records it.
/// - Skips empty or invalid items (no colon, empty property, or empty value after trimming).
///
/// Spec: <https://www.w3.org/TR/css-style-attr/#interpreting>
pub fn parse_style_attribute(input: &str) -> Vec<Declaration> {
    let mut out: Vec<Declaration> = Vec::new();
    for raw_item in split_declarations(input) {
        let item = raw_item.trim_matches(is_ascii_whitespace);
        if item.is_empty() {
            continue;
        }
        let Some((raw_prop, raw_value)) = item.split_once(':') else {
            continue;
        };
        let property_text = raw_prop.trim_matches(is_ascii_whitespace);
        let (value_text, important) = split_important(raw_value.trim_matches(is_ascii_whitespace));
        if property_text.is_empty() || value_text.is_empty() {
            continue;
        }
        out.push(Declaration {
            property: normalize_property_name(property_text),
            value: value_text.to_owned(),
            important,
        });
    }
    out
}

/// Convenience: parse into a map keyed by property name.
///
/// If a property appears multiple times, the last one wins, matching standard
/// source-order behavior for duplicate declarations within the same block.
///
/// Spec: <https://www.w3.org/TR/css-style-attr/#interpreting>
pub fn parse_style_attribute_into_map(input: &str) -> HashMap<String, String> {
    let mut map: HashMap<String, String> = HashMap::new();
    for decl in parse_style_attribute(input) {
        map.insert(decl.property, decl.value);
    }
    map
}

/// Normalize and filter a raw attribute string, keeping only the last occurrence
/// of each property, in the position of that last occurrence.
///
/// Spec: <https://www.w3.org/TR/css-style-attr/#interpreting>
pub fn normalize_style_attribute(input: &str) -> Vec<Declaration> {
    let mut last_index_for_property: HashMap<String, usize> = HashMap::new();
    let declarations = parse_style_attribute(input);
    for (index, decl_item) in declarations.iter().enumerate() {
        last_index_for_property.insert(decl_item.property.clone(), index);
    }
    declarations
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, decl_item)| match last_index_for_property.get(&decl_item.property) {
                Some(&last_index) if last_index == index => Some(decl_item),
                _ => None,
            },
        )
        .collect()
}

/// Serialize property/value pairs into a literal inline style string.
///
/// Pairs are written as `name: value` joined by `"; "` with a trailing `;`, so
/// `[("color", "red"), ("margin", "0")]` becomes `color: red; margin: 0;`.
/// No pairs produce an empty string.
pub fn serialize_declarations<'decl, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'decl str, &'decl str)>,
{
    let mut out = String::new();
    for (property, value) in pairs {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(property);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

/// Split a declaration list on top-level semicolons.
fn split_declarations(input: &str) -> Vec<&str> {
    let mut items: Vec<&str> = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0usize;
    for (index, character) in input.char_indices() {
        match (quote, character) {
            (Some(open), current) if current == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(character),
            (None, '(') => depth = depth.saturating_add(1),
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                items.push(input.get(start..index).unwrap_or_default());
                start = index.saturating_add(1);
            }
            _ => {}
        }
    }
    items.push(input.get(start..).unwrap_or_default());
    items
}

/// Split a trailing `!important` (ASCII case-insensitive) off a value.
fn split_important(value: &str) -> (&str, bool) {
    let Some(bang) = value.rfind('!') else {
        return (value, false);
    };
    let flag = value.get(bang.saturating_add(1)..).unwrap_or_default().trim();
    if flag.eq_ignore_ascii_case("important") {
        let head = value.get(..bang).unwrap_or_default();
        return (head.trim_end_matches(is_ascii_whitespace), true);
    }
    (value, false)
}

/// ASCII whitespace per CSS Syntax (TAB, LF, FF, CR, SPACE).
///
/// Spec: <https://www.w3.org/TR/css-syntax-3/#whitespace>
const fn is_ascii_whitespace(character: char) -> bool {
    matches!(
        character,
        '\u{0009}' | '\u{000A}' | '\u{000C}' | '\u{000D}' | '\u{0020}'
    )
}

/// Lowercase standard property names; custom property names are case-sensitive.
fn normalize_property_name(text: &str) -> String {
    if text.starts_with("--") || !text.bytes().any(|byte| byte.is_ascii_uppercase()) {
        return text.to_owned();
    }
    text.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_declarations() {
        let decls = parse_style_attribute("Color: red; background-color : var(--bg, blue) ;");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "color");
        assert_eq!(decls[0].value, "red");
        assert_eq!(decls[1].property, "background-color");
        assert_eq!(decls[1].value, "var(--bg, blue)");
    }

    #[test]
    fn keeps_custom_property_case() {
        let decls = parse_style_attribute("--Brand-Color: teal");
        assert_eq!(decls[0].property, "--Brand-Color");
    }

    #[test]
    fn important_flag_is_split_off() {
        let decls = parse_style_attribute("color: red !important; margin: 0 ! IMPORTANT");
        assert_eq!(decls[0].value, "red");
        assert!(decls[0].important);
        assert_eq!(decls[1].value, "0");
        assert!(decls[1].important);
    }

    #[test]
    fn semicolons_inside_functions_and_quotes_do_not_split() {
        let decls = parse_style_attribute(
            "background-image: url(data:image/png;base64,AAA); font-family: 'a;b'",
        );
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, "url(data:image/png;base64,AAA)");
        assert_eq!(decls[1].value, "'a;b'");
    }

    #[test]
    fn invalid_items_are_skipped() {
        let decls = parse_style_attribute("color; : red; margin:; padding: 1px");
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].property, "padding");
    }

    #[test]
    fn normalize_keeps_last_occurrence() {
        let decls = normalize_style_attribute("color: red; margin: 0; color: blue");
        let pairs: Vec<(&str, &str)> = decls
            .iter()
            .map(|decl| (decl.property.as_str(), decl.value.as_str()))
            .collect();
        assert_eq!(pairs, [("margin", "0"), ("color", "blue")]);
    }

    #[test]
    fn map_last_wins() {
        let map = parse_style_attribute_into_map("color: red; color: green");
        assert_eq!(map.get("color").map(String::as_str), Some("green"));
    }

    #[test]
    fn serializes_with_trailing_semicolon() {
        let text = serialize_declarations([("color", "red"), ("margin", "0")]);
        assert_eq!(text, "color: red; margin: 0;");
        assert_eq!(serialize_declarations(Vec::<(&str, &str)>::new()), "");
    }

    #[test]
    fn serialized_output_parses_back() {
        let text = serialize_declarations([("color", "red"), ("background-color", "rgb(0, 128, 0)")]);
        let decls = parse_style_attribute(&text);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].value, "rgb(0, 128, 0)");
    }
}
