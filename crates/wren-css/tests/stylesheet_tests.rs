//! Integration tests for stylesheet parsing, shorthand expansion and merging.

use wren_css::parser::{Stylesheet, parse_inline_style, parse_stylesheet};

fn sides(sheet: &Stylesheet, selector: &str, property: &str) -> [String; 4] {
    let block = sheet.get(selector).unwrap();
    ["top", "right", "bottom", "left"].map(|side| {
        block
            .get(&format!("{property}-{side}"))
            .unwrap_or_default()
            .to_string()
    })
}

#[test]
fn test_margin_four_values() {
    let sheet = parse_stylesheet("div { margin: 1px 2px 3px 4px }");
    assert_eq!(sides(&sheet, "div", "margin"), ["1px", "2px", "3px", "4px"]);
}

#[test]
fn test_margin_one_value() {
    let sheet = parse_stylesheet("div { margin: 5px }");
    assert_eq!(sides(&sheet, "div", "margin"), ["5px", "5px", "5px", "5px"]);
}

#[test]
fn test_padding_two_and_three_values() {
    let sheet = parse_stylesheet("a { padding: 1px 2px } b { padding: 1px 2px 3px }");
    assert_eq!(sides(&sheet, "a", "padding"), ["1px", "2px", "1px", "2px"]);
    assert_eq!(sides(&sheet, "b", "padding"), ["1px", "2px", "3px", "2px"]);
}

#[test]
fn test_margin_bad_arity_is_skipped() {
    let sheet = parse_stylesheet("div { margin: 1px 2px 3px 4px 5px; color: red }");
    let block = sheet.get("div").unwrap();
    assert_eq!(block.get("margin-top"), None);
    assert_eq!(block.get("color"), Some("red"));
}

#[test]
fn test_border_style_keeps_suffix() {
    let sheet = parse_stylesheet("div { border-style: solid dashed }");
    let block = sheet.get("div").unwrap();
    assert_eq!(block.get("border-top-style"), Some("solid"));
    assert_eq!(block.get("border-right-style"), Some("dashed"));
    assert_eq!(block.get("border-bottom-style"), Some("solid"));
    assert_eq!(block.get("border-left-style"), Some("dashed"));
}

#[test]
fn test_border_shorthand_classifies_tokens() {
    let sheet = parse_stylesheet("td { border: 1px solid rgb(0, 0, 255) }");
    let block = sheet.get("td").unwrap();
    for side in ["top", "right", "bottom", "left"] {
        assert_eq!(block.get(&format!("border-{side}-width")), Some("1px"));
        assert_eq!(block.get(&format!("border-{side}-style")), Some("solid"));
        assert_eq!(
            block.get(&format!("border-{side}-color")),
            Some("rgb(0, 0, 255)")
        );
    }
}

#[test]
fn test_invalid_color_dropped() {
    let sheet = parse_stylesheet("p { color: notacolor; background-color: #00ff00 }");
    let block = sheet.get("p").unwrap();
    assert_eq!(block.get("color"), None);
    assert_eq!(block.get("background-color"), Some("#00ff00"));
}

#[test]
fn test_inheritance_keywords_survive_validation() {
    let sheet = parse_stylesheet("p { color: inherit } q { color: currentColor }");
    assert_eq!(sheet.get("p").unwrap().get("color"), Some("inherit"));
    assert_eq!(sheet.get("q").unwrap().get("color"), Some("currentColor"));
}

#[test]
fn test_selector_groups_and_comments() {
    let sheet = parse_stylesheet("/* head */ h1, /* x */ .title { color: red }");
    assert_eq!(sheet.len(), 2);
    assert_eq!(sheet.get("h1").unwrap().get("color"), Some("red"));
    assert_eq!(sheet.get(".title").unwrap().get("color"), Some("red"));
}

#[test]
fn test_invalid_selector_discards_whole_rule() {
    let sheet = parse_stylesheet("h1, ##bad { color: red } p { color: blue }");
    assert!(sheet.get("h1").is_none());
    assert_eq!(sheet.get("p").unwrap().get("color"), Some("blue"));
}

#[test]
fn test_at_rule_block_skipped() {
    let sheet = parse_stylesheet("@media print { p { color: red } } em { color: green }");
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.get("em").unwrap().get("color"), Some("green"));
}

#[test]
fn test_merge_overrides_per_property() {
    let mut base = parse_stylesheet("p { color: red; margin-top: 4px }");
    base.merge(&parse_stylesheet("p { color: blue } span { color: green }"));

    let p = base.get("p").unwrap();
    assert_eq!(p.get("color"), Some("blue"));
    assert_eq!(p.get("margin-top"), Some("4px"));
    assert_eq!(base.get("span").unwrap().get("color"), Some("green"));
}

#[test]
fn test_inline_style_is_unvalidated_but_expanded() {
    let block = parse_inline_style("color: nonsense; margin: 3px");
    assert_eq!(block.get("color"), Some("nonsense"));
    assert_eq!(block.get("margin-left"), Some("3px"));
}
