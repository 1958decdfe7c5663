//! Stylesheet parser.
//!
//! [CSS Syntax § 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
//!
//! This is not a token-level CSS parser. The source is scanned for
//! `selectors { declarations }` blocks; a block whose selector group fails to
//! parse (including at-rules such as `@media`) is skipped whole, nested
//! braces and all.

use std::collections::HashMap;

use wren_common::warning::warn_once;

use super::shorthand::apply_declaration;
use super::validate::is_valid_declaration;
use crate::selector::{Selector, SelectorError, parse_selector};

/// [§ 5.4.4 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-a-declaration)
///
/// One `name: value` pair, both trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name.
    pub name: String,
    /// Raw property value.
    pub value: String,
}

/// Declarations in first-declared order. Setting an existing property
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationBlock {
    declarations: Vec<Declaration>,
}

impl DeclarationBlock {
    /// An empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of `name`, if declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    /// Declare `name`, overwriting an earlier value.
    pub fn set(&mut self, name: &str, value: &str) {
        if let Some(existing) = self.declarations.iter_mut().find(|d| d.name == name) {
            existing.value = value.to_string();
        } else {
            self.declarations.push(Declaration {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Overwrite this block with every declaration of `other`, key by key.
    pub fn extend_from(&mut self, other: &Self) {
        for decl in &other.declarations {
            self.set(&decl.name, &decl.value);
        }
    }

    /// Declarations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Declaration> {
        self.declarations.iter()
    }

    /// Number of declared properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Whether nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl<'a> IntoIterator for &'a DeclarationBlock {
    type Item = &'a Declaration;
    type IntoIter = std::slice::Iter<'a, Declaration>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
///
/// One selector with its declarations. A selector group (`h1, h2 { }`)
/// contributes one rule per selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// Selector as written, trimmed. Rules are merged by this text.
    pub selector_text: String,
    /// The parsed selector.
    pub selector: Selector,
    /// Declarations, shorthands already expanded.
    pub declarations: DeclarationBlock,
}

/// Rules keyed by selector text, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    rules: Vec<StyleRule>,
    index: HashMap<String, usize>,
}

impl Stylesheet {
    /// An empty stylesheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules in first-seen order.
    #[must_use]
    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    /// Declarations for exactly `selector_text`.
    #[must_use]
    pub fn get(&self, selector_text: &str) -> Option<&DeclarationBlock> {
        self.index
            .get(selector_text)
            .map(|&i| &self.rules[i].declarations)
    }

    /// Number of distinct selectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the sheet holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule for `selector_text`, created empty at the end if absent.
    fn entry(&mut self, selector_text: &str, selector: &Selector) -> &mut StyleRule {
        let i = if let Some(&i) = self.index.get(selector_text) {
            i
        } else {
            self.rules.push(StyleRule {
                selector_text: selector_text.to_string(),
                selector: selector.clone(),
                declarations: DeclarationBlock::new(),
            });
            let i = self.rules.len() - 1;
            let _ = self.index.insert(selector_text.to_string(), i);
            i
        };
        &mut self.rules[i]
    }

    /// Fold `other` into this sheet. For every selector in `other` the
    /// matching rule here is created if missing, then overwritten property by
    /// property. Selectors only present here are kept.
    pub fn merge(&mut self, other: &Self) {
        for rule in &other.rules {
            self.entry(&rule.selector_text, &rule.selector)
                .declarations
                .extend_from(&rule.declarations);
        }
    }
}

/// Parse CSS source text. Never fails; unusable parts are skipped and
/// reported through [`warn_once`].
///
/// ```
/// use wren_css::parser::parse_stylesheet;
///
/// let sheet = parse_stylesheet("h1, .title { color: red; margin: 4px }");
/// assert_eq!(sheet.len(), 2);
/// assert_eq!(sheet.get(".title").unwrap().get("margin-left"), Some("4px"));
/// ```
#[must_use]
pub fn parse_stylesheet(source: &str) -> Stylesheet {
    let source = strip_comments(source);
    let mut sheet = Stylesheet::new();
    let mut rest = source.as_str();

    while let Some(open) = rest.find('{') {
        let prelude = &rest[..open];
        let after_open = &rest[open + 1..];
        let Some(close) = matching_brace(after_open) else {
            warn_once("css", "unterminated block at end of stylesheet ignored");
            break;
        };
        let body = &after_open[..close];
        rest = &after_open[close + 1..];

        // Statement at-rules (`@import url(x);`) end at a semicolon.
        let group = prelude.rsplit(';').next().unwrap_or(prelude).trim();

        let selectors = match parse_selector_group(group) {
            Ok(selectors) => selectors,
            Err(err) => {
                warn_once("css", &format!("rule '{group}' skipped: {err}"));
                continue;
            }
        };

        let declarations = parse_declaration_block(body);
        for (text, selector) in &selectors {
            sheet
                .entry(text, selector)
                .declarations
                .extend_from(&declarations);
        }
    }

    sheet
}

/// Parse a `style` attribute. Values are not validated, but shorthands are
/// expanded.
///
/// ```
/// use wren_css::parser::parse_inline_style;
///
/// let block = parse_inline_style("color: nonsense; padding: 2px");
/// assert_eq!(block.get("color"), Some("nonsense"));
/// assert_eq!(block.get("padding-top"), Some("2px"));
/// ```
#[must_use]
pub fn parse_inline_style(text: &str) -> DeclarationBlock {
    let mut block = DeclarationBlock::new();
    for (name, value) in split_declarations(&strip_comments(text)) {
        apply_declaration(&mut block, name, value);
    }
    block
}

/// Split a selector group on top-level commas. Every selector must parse.
fn parse_selector_group(group: &str) -> Result<Vec<(String, Selector)>, SelectorError> {
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in group.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                selectors.push(parse_one(&group[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    selectors.push(parse_one(&group[start..])?);
    Ok(selectors)
}

fn parse_one(text: &str) -> Result<(String, Selector), SelectorError> {
    let text = text.trim();
    let selector = parse_selector(text)?;
    Ok((text.to_string(), selector))
}

/// Declarations of a rule body, validated and with shorthands expanded.
fn parse_declaration_block(body: &str) -> DeclarationBlock {
    let mut block = DeclarationBlock::new();
    for (name, value) in split_declarations(body) {
        if is_valid_declaration(name, value) {
            apply_declaration(&mut block, name, value);
        } else {
            warn_once("css", &format!("invalid value '{value}' for '{name}' dropped"));
        }
    }
    block
}

/// `a: b; c: d` into trimmed pairs, split on the first colon. Pieces without
/// a colon or with an empty name are skipped.
fn split_declarations(body: &str) -> impl Iterator<Item = (&str, &str)> {
    body.split(';').filter_map(|piece| {
        let (name, value) = piece.split_once(':')?;
        let name = name.trim();
        (!name.is_empty()).then_some((name, value.trim()))
    })
}

/// Byte offset of the `}` closing a block whose `{` was just consumed.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Remove every `/* ... */`. An unterminated comment runs to the end.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a /* x */b/**/c"), "a bc");
        assert_eq!(strip_comments("a /* open"), "a ");
        assert_eq!(strip_comments("/*/ still comment */x"), "x");
    }

    #[test]
    fn test_matching_brace_counts_depth() {
        assert_eq!(matching_brace("a { b } c } d"), Some(10));
        assert_eq!(matching_brace("{ }"), None);
    }

    #[test]
    fn test_split_declarations() {
        let pairs: Vec<_> = split_declarations(" color : red ;; :x; bare; background: url(a:b) ").collect();
        assert_eq!(pairs, [("color", "red"), ("background", "url(a:b)")]);
    }

    #[test]
    fn test_block_set_replaces_in_place() {
        let mut block = DeclarationBlock::new();
        block.set("a", "1");
        block.set("b", "2");
        block.set("a", "3");
        let names: Vec<_> = block.iter().map(|d| (d.name.as_str(), d.value.as_str())).collect();
        assert_eq!(names, [("a", "3"), ("b", "2")]);
    }

    #[test]
    fn test_selector_group_split_ignores_argument_commas() {
        let group = parse_selector_group("a, p:lang(en)").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group[1].0, "p:lang(en)");
        assert!(parse_selector_group("a,").is_err());
    }
}
