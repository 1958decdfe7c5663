//! Tests for tree construction, lookups and the JSON description format.

use wren_dom::{DomTree, ElementData, NodeId, NodeSpec, NodeType};

/// `<html><head></head><body><p>one</p><p>two</p></body></html>`
fn small_document() -> (DomTree, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let _head = tree.append_element(html, "head", &[]);
    let body = tree.append_element(html, "body", &[]);
    let p1 = tree.append_element(body, "p", &[("class", "lead  intro")]);
    let _ = tree.append_text(p1, "one");
    let p2 = tree.append_element(body, "p", &[]);
    let _ = tree.append_text(p2, "two");
    (tree, body, p1)
}

// ========== structure ==========

#[test]
fn test_sibling_links_follow_append_order() {
    let (tree, body, p1) = small_document();
    let p2 = tree.children(body)[1];

    assert_eq!(tree.first_child(body), Some(p1));
    assert_eq!(tree.next_sibling(p1), Some(p2));
    assert_eq!(tree.prev_sibling(p2), Some(p1));
    assert_eq!(tree.next_sibling(p2), None);
    assert_eq!(tree.parent(p2), Some(body));
}

#[test]
fn test_append_child_ignores_attached_node() {
    let (mut tree, body, p1) = small_document();
    let other = tree.append_element(NodeId::ROOT, "div", &[]);

    tree.append_child(other, p1);

    assert_eq!(tree.parent(p1), Some(body));
    assert!(tree.children(other).is_empty());
}

#[test]
fn test_depth_counts_ancestors() {
    let (tree, body, p1) = small_document();
    assert_eq!(tree.depth(NodeId::ROOT), 0);
    assert_eq!(tree.depth(body), 2);
    assert_eq!(tree.depth(p1), 3);
}

#[test]
fn test_body_and_head_lookup() {
    let (tree, body, _) = small_document();
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.tag_name(tree.head().unwrap()), Some("head"));
    assert_eq!(tree.tag_name(tree.document_element().unwrap()), Some("html"));
}

#[test]
fn test_text_content_concatenates_descendants() {
    let (tree, body, _) = small_document();
    assert_eq!(tree.text_content(body), "onetwo");
}

// ========== attributes ==========

#[test]
fn test_first_duplicate_attribute_wins() {
    let data = ElementData::new("A")
        .with_attr("href", "/first")
        .with_attr("HREF", "/second");

    assert_eq!(data.tag_name, "a");
    assert_eq!(data.get_attribute("href"), Some("/first"));
    assert_eq!(data.attrs.len(), 2);
}

#[test]
fn test_classes_split_on_whitespace() {
    let (tree, _, p1) = small_document();
    let data = tree.as_element(p1).unwrap();

    assert_eq!(data.classes().collect::<Vec<_>>(), vec!["lead", "intro"]);
    assert!(data.has_class("intro"));
    assert!(!data.has_class("int"));
    assert_eq!(data.id(), "");
}

// ========== JSON description ==========

#[test]
fn test_from_spec_builds_tree() {
    let json = r#"{
        "tag": "body",
        "children": [
            {"comment": "note"},
            {"tag": "p", "attrs": [["style", "color:red"], ["style", "color:blue"]], "children": ["Hi"]}
        ]
    }"#;
    let spec: NodeSpec = serde_json::from_str(json).unwrap();
    let tree = DomTree::from_spec(&spec);

    let body = tree.body().unwrap();
    let children = tree.children(body);
    assert_eq!(children.len(), 2);
    assert!(matches!(
        tree.get(children[0]).unwrap().node_type,
        NodeType::Comment(ref c) if c == "note"
    ));

    let p = children[1];
    let data = tree.as_element(p).unwrap();
    assert_eq!(data.get_attribute("style"), Some("color:red"));
    assert_eq!(tree.as_text(tree.first_child(p).unwrap()), Some("Hi"));
}
