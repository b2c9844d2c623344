//! Stylesheet model consumed by the cascade.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub value: String,
    pub important: bool,
}

/// Author rules of every `<style>` element of a document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Append the rules of a parsed sheet, numbering them after the rules already present.
    pub fn extend_from_parsed(&mut self, parsed: css_syntax::Stylesheet) {
        for style_rule in parsed.rules {
            let source_order = u32::try_from(self.rules.len()).unwrap_or(u32::MAX);
            self.rules.push(Rule {
                source_order,
                prelude: style_rule.prelude,
                declarations: style_rule
                    .declarations
                    .into_iter()
                    .map(|decl| Declaration {
                        name: decl.name,
                        value: decl.value,
                        important: decl.important,
                    })
                    .collect(),
            });
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub source_order: u32,
    pub prelude: String,
    pub declarations: Vec<Declaration>,
}
