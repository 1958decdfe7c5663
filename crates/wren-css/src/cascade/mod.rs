//! CSS Cascading and Style Computation
//!
//! This module implements style computation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/),
//! reduced to what this engine models: one author-plus-default origin, no
//! `!important`, and a fixed list of inherited properties.

pub mod specificity;

use std::collections::{HashMap, HashSet};

use wren_common::warning::warn_once;
use wren_dom::{DomTree, NodeId, NodeType};

pub use specificity::{NO_MATCH, specificity};

use crate::parser::{DeclarationBlock, StyleRule, Stylesheet, parse_inline_style};
use crate::style::{ComputedStyle, INHERITED_PROPERTIES};

/// Deepest tree level that is styled or laid out. Anything below is skipped.
pub const MAX_TREE_DEPTH: usize = 256;

/// Document state that selectors can observe. Read-only for the duration of a
/// cascade and layout pass.
#[derive(Debug, Clone, Default)]
pub struct InteractiveState {
    visited: HashSet<String>,
}

impl InteractiveState {
    /// No visited links.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State with the given link targets marked visited.
    pub fn with_visited<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            visited: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// Mark `href` visited.
    pub fn mark_visited(&mut self, href: &str) {
        let _ = self.visited.insert(href.to_string());
    }

    /// Whether `href` was visited.
    #[must_use]
    pub fn is_visited(&self, href: &str) -> bool {
        self.visited.contains(href)
    }
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// Compute styles for the entire DOM tree given a stylesheet.
/// Returns a map from NodeId to computed style. Element and text nodes get an
/// entry; text nodes only carry inherited properties.
#[must_use]
pub fn compute_styles(
    tree: &DomTree,
    stylesheet: &Stylesheet,
    state: &InteractiveState,
) -> HashMap<NodeId, ComputedStyle> {
    let mut styles = HashMap::new();
    let root_style = ComputedStyle::new();
    for &child in tree.children(tree.root()) {
        compute_node_styles(tree, child, stylesheet, state, &root_style, 1, &mut styles);
    }
    styles
}

fn compute_node_styles(
    tree: &DomTree,
    id: NodeId,
    stylesheet: &Stylesheet,
    state: &InteractiveState,
    parent: &ComputedStyle,
    depth: usize,
    styles: &mut HashMap<NodeId, ComputedStyle>,
) {
    if depth > MAX_TREE_DEPTH {
        warn_once(
            "cascade",
            &format!("tree deeper than {MAX_TREE_DEPTH} levels; deeper nodes are not styled"),
        );
        return;
    }
    let Some(node) = tree.get(id) else { return };

    match &node.node_type {
        NodeType::Element(_) => {
            let computed = compute_style(tree, id, stylesheet, parent, state);
            for &child in tree.children(id) {
                compute_node_styles(tree, child, stylesheet, state, &computed, depth + 1, styles);
            }
            let _ = styles.insert(id, computed);
        }
        NodeType::Text(_) => {
            let _ = styles.insert(id, inherited_only(parent));
        }
        NodeType::Document | NodeType::Comment(_) => {}
    }
}

/// [§ 6.4 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Style of one element given its parent's computed style:
///
/// 1. every rule scoring above zero against the element, applied in ascending
///    score order. On equal scores a universal rule goes before the others,
///    then stylesheet order decides, so the later rule wins
/// 2. inherited properties filled from `parent`
/// 3. the `style` attribute, which overrides everything, with its own
///    inheritance keywords resolved against `parent`
///
/// A node that is not an element gets only the inherited properties.
#[must_use]
pub fn compute_style(
    tree: &DomTree,
    id: NodeId,
    stylesheet: &Stylesheet,
    parent: &ComputedStyle,
    state: &InteractiveState,
) -> ComputedStyle {
    let Some(element) = tree.as_element(id) else {
        return inherited_only(parent);
    };

    let mut matched: Vec<(i32, &StyleRule)> = stylesheet
        .rules()
        .iter()
        .map(|rule| (specificity(&rule.selector, tree, id, state), rule))
        .filter(|(score, _)| *score > 0)
        .collect();
    // `*` and a bare tag both score 1; the tag has to rank higher.
    // Stable, so source order breaks the remaining ties.
    matched.sort_by_key(|(score, rule)| (*score, !rule.selector.global));

    let mut computed = ComputedStyle::new();
    for (_, rule) in matched {
        computed.apply(&rule.declarations);
    }

    inherit(&mut computed, parent);

    if let Some(inline) = element.get_attribute("style") {
        let block = parse_inline_style(inline);
        computed.apply(&block);
        resolve_inline_keywords(&mut computed, &block, parent);
    }

    computed
}

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// Copy each inherited property whose own value is missing, empty or an
/// inheritance keyword.
fn inherit(computed: &mut ComputedStyle, parent: &ComputedStyle) {
    for &property in INHERITED_PROPERTIES {
        if takes_parent_value(property, computed.value(property))
            && let Some(value) = parent.get(property)
        {
            computed.set(property, value);
        }
    }
}

/// Inline `inherit` (and `currentColor` on `color`) resolved after the inline
/// block was applied.
fn resolve_inline_keywords(
    computed: &mut ComputedStyle,
    inline: &DeclarationBlock,
    parent: &ComputedStyle,
) {
    for &property in INHERITED_PROPERTIES {
        let Some(own) = inline.get(property) else { continue };
        if own.is_empty() || !takes_parent_value(property, own) {
            continue;
        }
        if let Some(value) = parent.get(property) {
            computed.set(property, value);
        }
    }
}

/// [§ 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
fn takes_parent_value(property: &str, own: &str) -> bool {
    let own = own.trim();
    own.is_empty()
        || own == "inherit"
        || (property == "color" && matches!(own, "currentColor" | "currentcolor"))
}

fn inherited_only(parent: &ComputedStyle) -> ComputedStyle {
    let mut computed = ComputedStyle::new();
    inherit(&mut computed, parent);
    computed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_stylesheet;

    fn parent_with(pairs: &[(&str, &str)]) -> ComputedStyle {
        let mut style = ComputedStyle::new();
        for (k, v) in pairs {
            style.set(k, v);
        }
        style
    }

    #[test]
    fn test_takes_parent_value() {
        assert!(takes_parent_value("color", ""));
        assert!(takes_parent_value("color", "inherit"));
        assert!(takes_parent_value("color", "currentColor"));
        assert!(takes_parent_value("font-size", "inherit"));
        assert!(!takes_parent_value("background", "currentColor"));
        assert!(!takes_parent_value("color", "red"));
    }

    #[test]
    fn test_equal_scores_later_rule_wins() {
        let mut tree = DomTree::new();
        let p = tree.append_element(tree.root(), "p", &[("class", "a b")]);
        let sheet = parse_stylesheet(".b { color: blue } .a { color: red }");

        let style = compute_style(&tree, p, &sheet, &ComputedStyle::new(), &InteractiveState::new());
        assert_eq!(style.get("color"), Some("red"));
    }

    #[test]
    fn test_tag_outranks_universal_on_equal_score() {
        let mut tree = DomTree::new();
        let div = tree.append_element(tree.root(), "div", &[]);
        let sheet = parse_stylesheet("div { color: green } * { color: black }");

        let style = compute_style(&tree, div, &sheet, &ComputedStyle::new(), &InteractiveState::new());
        assert_eq!(style.get("color"), Some("green"));
    }

    #[test]
    fn test_text_nodes_only_inherit() {
        let mut tree = DomTree::new();
        let p = tree.append_element(tree.root(), "p", &[]);
        let text = tree.append_text(p, "hi");
        let sheet = parse_stylesheet("p { color: green; margin-top: 4px }");

        let styles = compute_styles(&tree, &sheet, &InteractiveState::new());
        assert_eq!(styles[&text].get("color"), Some("green"));
        assert_eq!(styles[&text].get("margin-top"), None);
    }

    #[test]
    fn test_inline_inherit_resolves_to_parent() {
        let mut tree = DomTree::new();
        let p = tree.append_element(tree.root(), "p", &[("style", "color: inherit")]);
        let sheet = parse_stylesheet("p { color: red }");
        let parent = parent_with(&[("color", "blue")]);

        let style = compute_style(&tree, p, &sheet, &parent, &InteractiveState::new());
        assert_eq!(style.get("color"), Some("blue"));
    }

    #[test]
    fn test_depth_guard_stops_styling() {
        let mut tree = DomTree::new();
        let mut parent = tree.root();
        let mut ids = Vec::new();
        for _ in 0..MAX_TREE_DEPTH + 10 {
            parent = tree.append_element(parent, "div", &[]);
            ids.push(parent);
        }
        let sheet = parse_stylesheet("div { color: red }");

        let styles = compute_styles(&tree, &sheet, &InteractiveState::new());
        assert!(styles.contains_key(&ids[MAX_TREE_DEPTH - 1]));
        assert!(!styles.contains_key(&ids[MAX_TREE_DEPTH]));
    }
}
