//! Tests for the whole document pipeline: JSON in, styles, display list and
//! pixels out.

use std::fs;
use std::path::PathBuf;

use wren_render::css::{ApproximateFontMetrics, ColorValue, LayoutOptions, NoImages};
use wren_render::dom::{DomTree, NodeId};
use wren_render::{
    FontSet, FsImageLoader, LoadError, RenderOptions, build_document, extract_style_content,
    load_document, render_document,
};

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("wren-pipeline-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

const STYLED_PAGE: &str = r##"{ "tag": "html", "children": [
    { "tag": "head", "children": [
        { "tag": "style", "children": ["p { color: #0000ff } .warn { color: red }"] }
    ] },
    { "tag": "body", "children": [
        { "tag": "p", "children": ["Plain"] },
        { "tag": "p", "attrs": [["class", "warn"]], "children": ["Careful"] }
    ] }
] }"##;

#[test]
fn test_load_document_applies_head_style() {
    let path = temp_file("styled.json", STYLED_PAGE);
    let doc = load_document(&path, &RenderOptions::default()).unwrap();

    assert!(doc.css_text.contains(".warn"));
    assert_eq!(doc.base_dir(), path.parent());

    let list = doc.layout(&LayoutOptions::default(), &ApproximateFontMetrics, &NoImages);
    let runs: Vec<_> = list.text_runs().map(|(_, run)| run).collect();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text, "Plain");
    assert_eq!(runs[0].color, ColorValue::rgb(0, 0, 255));
    assert_eq!(runs[1].color, ColorValue::rgb(255, 0, 0));
}

#[test]
fn test_extra_css_wins_over_page() {
    let path = temp_file("extra.json", STYLED_PAGE);
    let options = RenderOptions {
        extra_css: vec!["p { color: #00ff00 }".to_string()],
        ..RenderOptions::default()
    };
    let doc = load_document(&path, &options).unwrap();
    let list = doc.layout(&options.layout, &ApproximateFontMetrics, &NoImages);
    let (_, first) = list.text_runs().next().unwrap();
    assert_eq!(first.color, ColorValue::rgb(0, 255, 0));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = load_document(
        &std::env::temp_dir().join("wren-does-not-exist.json"),
        &RenderOptions::default(),
    )
    .err()
    .unwrap();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn test_bad_json_is_json_error() {
    let path = temp_file("bad.json", "{ \"tag\": ");
    let err = load_document(&path, &RenderOptions::default()).err().unwrap();
    assert!(matches!(err, LoadError::Json { .. }));
}

#[test]
fn test_style_content_joins_head_styles() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let head = tree.append_element(html, "head", &[]);
    let first = tree.append_element(head, "style", &[]);
    let _ = tree.append_text(first, "a { color: red }");
    let second = tree.append_element(head, "style", &[]);
    let _ = tree.append_text(second, "b { color: blue }");

    assert_eq!(
        extract_style_content(&tree),
        "a { color: red }\nb { color: blue }"
    );
}

#[test]
fn test_visited_targets_reach_the_cascade() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let body = tree.append_element(html, "body", &[]);
    let link = tree.append_element(body, "a", &[("href", "https://seen.example/")]);
    let _ = tree.append_text(link, "seen");

    let options = RenderOptions {
        visited: vec!["https://seen.example/".to_string()],
        ..RenderOptions::default()
    };
    let doc = build_document(tree, &options);
    let link_color = doc.styles[&link].value("color");
    let unvisited = build_document(doc.dom.clone(), &RenderOptions::default()).styles[&link]
        .value("color")
        .to_string();
    assert_ne!(link_color, unvisited);
}

#[test]
fn test_spans_share_a_line_under_default_css() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let body = tree.append_element(html, "body", &[]);
    let div = tree.append_element(body, "div", &[]);
    for label in ["one", "two"] {
        let span = tree.append_element(div, "span", &[]);
        let _ = tree.append_text(span, label);
    }

    let doc = build_document(tree, &RenderOptions::default());
    let list = doc.layout(&LayoutOptions::default(), &ApproximateFontMetrics, &NoImages);
    let runs: Vec<_> = list.text_runs().collect();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].1.text, "one ");
    assert_eq!((runs[0].0.x, runs[0].0.y), (8, 8));
    assert_eq!(runs[1].0.y, 8);
    assert!(runs[1].0.x > runs[0].0.x);
}

#[test]
fn test_render_without_fonts_paints_backgrounds() {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, "html", &[]);
    let body = tree.append_element(html, "body", &[("style", "background-color: #ff0000")]);
    let _ = tree.append_element(
        body,
        "div",
        &[("style", "background-color: #0000ff; width: 10px; height: 10px")],
    );

    let options = RenderOptions {
        layout: LayoutOptions {
            width: 40,
            height: 30,
        },
        use_default_css: false,
        ..RenderOptions::default()
    };
    let doc = build_document(tree, &options);
    let image = render_document(&doc, &options.layout, &FontSet::empty(), &FsImageLoader::new());

    assert_eq!(image.dimensions(), (40, 30));
    assert_eq!(image.get_pixel(35, 25).0, [255, 0, 0, 255]);
    assert_eq!(image.get_pixel(5, 5).0, [0, 0, 255, 255]);
}
