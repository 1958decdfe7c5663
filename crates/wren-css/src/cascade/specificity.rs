//! Selector matching and scoring.
//!
//! [Selectors Level 4 § 16 Calculating a selector's specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
//!
//! Matching and specificity are one pass: a selector scores a signed integer
//! against an element, and only a positive score counts as a match.
//!
//! | Part | Weight |
//! |---|---|
//! | base | −1, or +1 for `*` |
//! | each `#id` | +100 |
//! | `[attribute]` | +10 |
//! | each `.class` | +10 |
//! | tag | +2 |
//! | each pseudo-class | +1 |
//!
//! Any required part that does not hold makes the score [`NO_MATCH`].

use wren_common::warning::warn_once;
use wren_dom::{DomTree, ElementData, NodeId};

use super::InteractiveState;
use crate::selector::{AttributeMatcher, PseudoClass, PseudoClassKind, Selector};

/// Score of a selector that does not apply to the element.
pub const NO_MATCH: i32 = -1000;

const ID_WEIGHT: i32 = 100;
const CLASS_WEIGHT: i32 = 10;
const ATTRIBUTE_WEIGHT: i32 = 10;
const TAG_WEIGHT: i32 = 2;
const PSEUDO_CLASS_WEIGHT: i32 = 1;

/// Elements that take part in form state pseudo-classes.
const FORM_CONTROLS: &[&str] = &[
    "button", "fieldset", "input", "optgroup", "option", "select", "textarea",
];

/// Score `selector` against element `id`.
///
/// Non-element nodes never match.
#[must_use]
pub fn specificity(
    selector: &Selector,
    tree: &DomTree,
    id: NodeId,
    state: &InteractiveState,
) -> i32 {
    let Some(element) = tree.as_element(id) else {
        return NO_MATCH;
    };

    let mut score = if selector.global { 1 } else { -1 };

    for required in &selector.ids {
        if element.id() != required {
            return NO_MATCH;
        }
        score += ID_WEIGHT;
    }

    if !selector.tag.is_empty() {
        if !selector.tag.eq_ignore_ascii_case(&element.tag_name) {
            return NO_MATCH;
        }
        score += TAG_WEIGHT;
    }

    for class in &selector.classes {
        if !element.has_class(class) {
            return NO_MATCH;
        }
        score += CLASS_WEIGHT;
    }

    if let Some(fragment) = &selector.attribute {
        match AttributeMatcher::compile(fragment) {
            Ok(matcher) if matcher.matches(element) => score += ATTRIBUTE_WEIGHT,
            Ok(_) => return NO_MATCH,
            Err(err) => {
                warn_once("selector", &err.to_string());
                return NO_MATCH;
            }
        }
    }

    for pseudo in &selector.pseudo_classes {
        if !pseudo_class_matches(pseudo, tree, id, element, state) {
            return NO_MATCH;
        }
        score += PSEUDO_CLASS_WEIGHT;
    }

    score
}

/// [Selectors Level 4 § 4-14](https://www.w3.org/TR/selectors-4/#pseudo-classes)
fn pseudo_class_matches(
    pseudo: &PseudoClass,
    tree: &DomTree,
    id: NodeId,
    element: &ElementData,
    state: &InteractiveState,
) -> bool {
    let tag = element.tag_name.as_str();
    match pseudo.kind {
        // § 8.2 The link history pseudo-classes
        PseudoClassKind::Link => element
            .get_attribute("href")
            .is_some_and(|href| !state.is_visited(href)),
        PseudoClassKind::Visited => element
            .get_attribute("href")
            .is_some_and(|href| state.is_visited(href)),

        PseudoClassKind::Not => pseudo
            .argument
            .as_deref()
            .is_some_and(|sub| specificity(sub, tree, id, state) <= 0),

        // § 14 Tree-structural pseudo-classes
        PseudoClassKind::Root => tree.parent(id) == Some(tree.root()),
        PseudoClassKind::Empty => !has_text(tree, id),
        PseudoClassKind::FirstChild => siblings(tree, id, None).next() == Some(id),
        PseudoClassKind::LastChild => siblings(tree, id, None).last() == Some(id),
        PseudoClassKind::OnlyChild => siblings(tree, id, None).count() == 1,
        PseudoClassKind::FirstOfType => siblings(tree, id, Some(tag)).next() == Some(id),
        PseudoClassKind::LastOfType => siblings(tree, id, Some(tag)).last() == Some(id),
        PseudoClassKind::OnlyOfType => siblings(tree, id, Some(tag)).count() == 1,

        // § 7.2 The language pseudo-class
        PseudoClassKind::Lang => pseudo
            .argument
            .as_deref()
            .is_some_and(|range| lang_matches(tree, id, &range.tag)),

        // § 13 Input pseudo-classes
        PseudoClassKind::Checked => {
            element.has_attribute("checked") || (tag == "option" && element.has_attribute("selected"))
        }
        PseudoClassKind::Disabled => {
            FORM_CONTROLS.contains(&tag) && element.has_attribute("disabled")
        }
        PseudoClassKind::Enabled => {
            FORM_CONTROLS.contains(&tag) && !element.has_attribute("disabled")
        }
        PseudoClassKind::Required => is_required_capable(tag) && element.has_attribute("required"),
        PseudoClassKind::Optional => is_required_capable(tag) && !element.has_attribute("required"),
        PseudoClassKind::ReadWrite => is_read_write(element),
        PseudoClassKind::ReadOnly => !is_read_write(element),

        // No pointer, focus, fragment or validation state is modelled.
        PseudoClassKind::Active
        | PseudoClassKind::Hover
        | PseudoClassKind::Focus
        | PseudoClassKind::Target
        | PseudoClassKind::Valid
        | PseudoClassKind::Invalid
        | PseudoClassKind::InRange
        | PseudoClassKind::OutOfRange
        | PseudoClassKind::NthChild
        | PseudoClassKind::NthLastChild
        | PseudoClassKind::NthOfType
        | PseudoClassKind::NthLastOfType => false,
    }
}

/// Element siblings of `id` (itself included), optionally only those named `tag`.
fn siblings<'a>(
    tree: &'a DomTree,
    id: NodeId,
    tag: Option<&'a str>,
) -> impl Iterator<Item = NodeId> + 'a {
    let parent = tree.parent(id).unwrap_or(id);
    tree.element_children(parent).filter(move |&sibling| {
        tag.is_none_or(|tag| tree.tag_name(sibling) == Some(tag))
    })
}

/// Whether any descendant text node is non-empty.
fn has_text(tree: &DomTree, id: NodeId) -> bool {
    tree.children(id).iter().any(|&child| {
        tree.as_text(child).is_some_and(|text| !text.is_empty()) || has_text(tree, child)
    })
}

/// `lang` of the element or its nearest ancestor equals `range` or starts
/// with `range-`, ASCII case-insensitively.
fn lang_matches(tree: &DomTree, id: NodeId, range: &str) -> bool {
    if range.is_empty() {
        return false;
    }
    let Some(lang) = std::iter::once(id)
        .chain(tree.ancestors(id))
        .find_map(|node| tree.as_element(node).and_then(|e| e.get_attribute("lang")))
    else {
        return false;
    };

    let lang = lang.to_ascii_lowercase();
    let range = range.to_ascii_lowercase();
    lang == range
        || lang
            .strip_prefix(range.as_str())
            .is_some_and(|rest| rest.starts_with('-'))
}

fn is_required_capable(tag: &str) -> bool {
    matches!(tag, "input" | "select" | "textarea")
}

fn is_read_write(element: &ElementData) -> bool {
    let editable_control = matches!(element.tag_name.as_str(), "input" | "textarea")
        && !element.has_attribute("readonly")
        && !element.has_attribute("disabled");
    editable_control
        || element
            .get_attribute("contenteditable")
            .is_some_and(|v| v.is_empty() || v.eq_ignore_ascii_case("true"))
}
