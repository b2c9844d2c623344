//! CSS Color Module Level 4: Color spaces, color values, and opacity.
//! Spec: <https://www.w3.org/TR/css-color-4/>
//!
//! Besides channel parsing this crate owns the value normalization that the
//! style computer applies to color-valued properties. A normalizer that rejects a
//! value makes the declaration invalid at computed-value time, so it is dropped
//! from the computed style.
use csscolorparser::Color;
use log::trace;

/// Keywords that are valid for every color property and are kept as written.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#currentcolor-color>
/// Spec: <https://www.w3.org/TR/css-cascade-4/#defaulting-keywords>
const KEYWORDS: [&str; 7] = [
    "currentcolor",
    "transparent",
    "inherit",
    "initial",
    "unset",
    "revert",
    "revert-layer",
];

/// Normalizes the value of a color-valued property.
///
/// Returns the computed text for `value`, or `None` when the value is not a
/// color this parser accepts.
pub trait ColorParser {
    /// Normalize `value` or reject it.
    fn parse_color(&self, value: &str) -> Option<String>;
}

impl<P: ColorParser + ?Sized> ColorParser for &P {
    #[inline]
    fn parse_color(&self, value: &str) -> Option<String> {
        (**self).parse_color(value)
    }
}

/// Standard color normalization.
///
/// Named colors and color keywords compute to their lowercase keyword; every
/// other accepted color computes to `rgb(r, g, b)`, or `rgba(r, g, b, a)` when
/// not fully opaque. `var()` references are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardColorParser;

impl ColorParser for StandardColorParser {
    fn parse_color(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        let lowered = trimmed.to_ascii_lowercase();
        if KEYWORDS.contains(&lowered.as_str()) {
            return Some(lowered);
        }
        let parsed: Color = trimmed.parse().ok()?;
        if !lowered.is_empty() && lowered.bytes().all(|byte| byte.is_ascii_alphabetic()) {
            return Some(lowered);
        }
        Some(serialize_rgb(&parsed))
    }
}

/// Serialize a parsed color in legacy `rgb()`/`rgba()` form.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#serializing-sRGB-values>
fn serialize_rgb(color: &Color) -> String {
    let [red, green, blue, alpha] = color.to_rgba8();
    if alpha == u8::MAX {
        return format!("rgb({red}, {green}, {blue})");
    }
    let rounded = (color.a * 1000.0).round() / 1000.0;
    format!("rgba({red}, {green}, {blue}, {rounded})")
}

/// Wraps a parser so that values starting with `var(--` pass through verbatim.
///
/// The standard normalizer rejects variable references, which would drop every
/// color declaration written as `var(--name)` before anything could resolve it.
/// Everything else is delegated to the inner parser.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeepVars<P> {
    inner: P,
}

impl<P: ColorParser> KeepVars<P> {
    /// Wrap `inner`.
    pub const fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: ColorParser> ColorParser for KeepVars<P> {
    fn parse_color(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.starts_with("var(--") {
            trace!("Keeping variable color value verbatim: {trimmed}");
            return Some(trimmed.to_owned());
        }
        self.inner.parse_color(value)
    }
}

/// True for properties whose value is exactly one `<color>`.
///
/// Shorthands such as `border-color` take up to four colors, and properties like
/// `caret-color`, `outline-color`, `fill` and `stroke` accept non-color keywords
/// or paint servers, so none of them are normalized.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#property-index>
pub fn is_color_property(name: &str) -> bool {
    matches!(
        name,
        "color" | "background-color" | "text-decoration-color" | "column-rule-color"
    ) || name
        .strip_prefix("border-")
        .and_then(|rest| rest.strip_suffix("-color"))
        .is_some_and(|side| {
            matches!(
                side,
                "top"
                    | "right"
                    | "bottom"
                    | "left"
                    | "block-start"
                    | "block-end"
                    | "inline-start"
                    | "inline-end"
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_compute_to_lowercase_keyword() {
        let parser = StandardColorParser;
        assert_eq!(parser.parse_color("Red").as_deref(), Some("red"));
        assert_eq!(parser.parse_color("green").as_deref(), Some("green"));
        assert_eq!(parser.parse_color("CurrentColor").as_deref(), Some("currentcolor"));
        assert_eq!(parser.parse_color("inherit").as_deref(), Some("inherit"));
    }

    #[test]
    fn other_colors_compute_to_rgb() {
        let parser = StandardColorParser;
        assert_eq!(parser.parse_color("#00f").as_deref(), Some("rgb(0, 0, 255)"));
        assert_eq!(
            parser.parse_color("rgb(10 20 30)").as_deref(),
            Some("rgb(10, 20, 30)")
        );
        assert_eq!(
            parser.parse_color("rgba(0, 0, 0, 0.5)").as_deref(),
            Some("rgba(0, 0, 0, 0.5)")
        );
    }

    #[test]
    fn standard_parser_rejects_variables_and_garbage() {
        let parser = StandardColorParser;
        assert_eq!(parser.parse_color("var(--brand)"), None);
        assert_eq!(parser.parse_color("hippie"), None);
        assert_eq!(parser.parse_color(""), None);
    }

    #[test]
    fn keep_vars_passes_references_through() {
        let parser = KeepVars::new(StandardColorParser);
        assert_eq!(
            parser.parse_color("var(--brand, red)").as_deref(),
            Some("var(--brand, red)")
        );
        assert_eq!(parser.parse_color("Blue").as_deref(), Some("blue"));
        assert_eq!(parser.parse_color("hippie"), None);
    }

    #[test]
    fn color_property_names() {
        assert!(is_color_property("color"));
        assert!(is_color_property("background-color"));
        assert!(is_color_property("border-left-color"));
        assert!(!is_color_property("border-width"));
        assert!(!is_color_property("background"));
        assert!(!is_color_property("border-color"));
        assert!(!is_color_property("caret-color"));
        assert!(!is_color_property("fill"));
        assert!(!is_color_property("stroke"));
    }
}
