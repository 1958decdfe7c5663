//! CSS Layout Engine
//!
//! A recursive, depth-first box-model walker. Each node is laid out inside a
//! [`Zone`] (the space still available to it), draws straight into a
//! [`DisplayList`], and reports how much of the zone it [`Consumed`] so the
//! caller can advance its cursor.
//!
//! # Relevant Specifications
//!
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`box_model`] - Edge sizes, border resolution and border-box drawing
//! - [`text`] - Font metrics, whitespace normalization and line breaking
//! - [`image`] - Image loading collaborator and `img` content
//! - `list` - `ul`/`ol` and list-item markers
//! - `table` - Row and cell placement
//!
//! # Element kinds
//!
//! How an element draws its own content is decided by its tag (`p`, `img`,
//! `ul`/`ol`, `li`, `table`, the inline text tags, and generic blocks). Where
//! it sits relative to its siblings is decided by `display`: inline boxes
//! advance the cursor to the right and share a line, everything else starts
//! on a new line and advances it down.

pub mod box_model;
pub mod image;
mod list;
mod table;
pub mod text;

use std::collections::HashMap;

use wren_common::warning::warn_once;
use wren_dom::{DomTree, ElementData, NodeId, NodeType};

pub use box_model::{BorderSide, BoxExtent, EdgeSizes, Side, border_side, draw_box};
pub use image::{ImageError, ImageLoader, NoImages, is_remote_source};
pub use list::LIST_TOP_OFFSET;
pub use table::MIN_CELL_WIDTH;
pub use text::{ApproximateFontMetrics, FontMetrics, normalize_whitespace, text_run, wrap_text};

use crate::cascade::MAX_TREE_DEPTH;
use crate::paint::{DisplayCommand, DisplayList, PixelRect};
use crate::style::{ColorValue, ComputedStyle};
use list::Marker;
use text::{leading_text, paragraph_lines};

/// Space left between a block's text and whatever follows it.
pub const TEXT_BUFFER_PX: f32 = 2.0;

/// Elements whose content is laid out as a text-sized box with children
/// following it on the same line.
///
/// [§ 9.2.2 Inline-level elements](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "address", "b", "cite", "code", "dfn", "em", "h1", "h2", "h3", "h4", "h5", "h6",
    "i", "kbd", "label", "mark", "q", "s", "samp", "small", "span", "strong", "sub", "sup", "u",
    "var",
];

static EMPTY_STYLE: ComputedStyle = ComputedStyle::new();

/// Canvas configuration for a layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 500,
            height: 300,
        }
    }
}

/// The rectangle still available to a node: origin plus exclusive far edges.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Zone {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Right edge.
    pub max_x: f32,
    /// Bottom edge.
    pub max_y: f32,
}

impl Zone {
    /// Zone with its origin at `(x, y)` and the given size.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            max_x: x + width,
            max_y: y + height,
        }
    }

    /// Available width, never negative.
    #[must_use]
    pub fn width(&self) -> f32 {
        (self.max_x - self.x).max(0.0)
    }

    /// Available height, never negative.
    #[must_use]
    pub fn height(&self) -> f32 {
        (self.max_y - self.y).max(0.0)
    }
}

/// Space a node used up. Block-level nodes report only height; inline-level
/// nodes report the width they advance the line by and their line height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Consumed {
    /// Horizontal advance.
    pub width: f32,
    /// Vertical advance.
    pub height: f32,
}

/// What an element drew for itself, and where its children go.
#[derive(Debug, Clone, Copy, Default)]
struct Content {
    width: f32,
    height: f32,
    /// Added below the children (bottom padding and border).
    trailing: f32,
    /// `None` when the element already handled its children.
    children: Option<ChildFlow>,
}

/// Origin of an element's children relative to the element's own origin.
#[derive(Debug, Clone, Copy, Default)]
struct ChildFlow {
    dx: f32,
    dy: f32,
    /// The first child is a text node already drawn by the element.
    skip_first_text: bool,
}

/// One layout pass over a styled tree.
///
/// Styles are read-only for the whole pass; draw commands accumulate in
/// emission order.
pub struct LayoutContext<'a> {
    tree: &'a DomTree,
    styles: &'a HashMap<NodeId, ComputedStyle>,
    metrics: &'a dyn FontMetrics,
    images: &'a dyn ImageLoader,
    list: DisplayList,
}

impl<'a> LayoutContext<'a> {
    /// Start a pass with an empty display list.
    #[must_use]
    pub fn new(
        tree: &'a DomTree,
        styles: &'a HashMap<NodeId, ComputedStyle>,
        metrics: &'a dyn FontMetrics,
        images: &'a dyn ImageLoader,
    ) -> Self {
        Self {
            tree,
            styles,
            metrics,
            images,
            list: DisplayList::new(),
        }
    }

    /// Finish the pass.
    #[must_use]
    pub fn into_display_list(self) -> DisplayList {
        self.list
    }

    /// Commands emitted so far.
    #[must_use]
    pub const fn display_list(&self) -> &DisplayList {
        &self.list
    }

    /// Computed style of `id`, empty for nodes the cascade did not reach.
    fn style(&self, id: NodeId) -> &'a ComputedStyle {
        self.styles.get(&id).unwrap_or(&EMPTY_STYLE)
    }

    /// Lay out `id` and its subtree inside `zone`.
    pub fn layout(&mut self, id: NodeId, zone: Zone) -> Consumed {
        let depth = self.tree.depth(id);
        self.layout_node(id, zone, depth, false)
    }

    fn layout_node(&mut self, id: NodeId, zone: Zone, depth: usize, inline: bool) -> Consumed {
        if depth > MAX_TREE_DEPTH {
            warn_once(
                "layout",
                &format!("tree deeper than {MAX_TREE_DEPTH} levels; deeper nodes are not laid out"),
            );
            return Consumed::default();
        }
        let tree = self.tree;
        let Some(node) = tree.get(id) else {
            return Consumed::default();
        };

        match &node.node_type {
            NodeType::Element(element) => self.layout_element(id, element, zone, depth, inline),
            NodeType::Text(text) => self.layout_text(id, text, zone, inline),
            NodeType::Document => self.layout_children(id, zone, depth, false),
            NodeType::Comment(_) => Consumed::default(),
        }
    }

    /// Margin, own content, children; in that order.
    fn layout_element(
        &mut self,
        id: NodeId,
        element: &ElementData,
        zone: Zone,
        depth: usize,
        inline: bool,
    ) -> Consumed {
        let style = self.style(id);
        if style.is_display_none() {
            return Consumed::default();
        }
        let tag = element.tag_name.as_str();

        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[LAYOUT] depth={depth} <{tag}> inline={inline} zone=({:.1},{:.1})-({:.1},{:.1})",
            zone.x, zone.y, zone.max_x, zone.max_y
        );

        // STEP 1: Margins.
        // [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
        let margin_top = style.length_or_zero("margin-top");
        let margin_bottom = style.length_or_zero("margin-bottom");
        let margin_left = style.length_or_zero("margin-left");
        let mut zone = zone;
        zone.y += margin_top;
        zone.x = zone.x.max(margin_left);

        // STEP 2: The element's own box and content.
        let content = match tag {
            "p" => self.layout_paragraph(id, style, zone),
            "img" => self.layout_image(element, zone),
            "ul" | "ol" => Self::layout_list(style),
            "li" => {
                let marker = Marker::for_item(self, id);
                self.layout_list_item(id, style, zone, marker)
            }
            "table" => self.layout_table(id, zone),
            _ if INLINE_TAGS.contains(&tag) => self.layout_inline_box(id, style, zone),
            _ => self.layout_block_box(id, style, zone),
        };

        // STEP 3: Children.
        let (width, height) = match content.children {
            Some(flow) => {
                let child_zone = Zone {
                    x: zone.x + flow.dx,
                    y: zone.y + flow.dy,
                    ..zone
                };
                let children = self.layout_children(id, child_zone, depth, flow.skip_first_text);
                (
                    content.width.max(flow.dx + children.width),
                    content.height.max(flow.dy + children.height),
                )
            }
            None => (content.width, content.height),
        };
        let height = height + content.trailing;

        if inline {
            Consumed {
                width,
                height: margin_top + height,
            }
        } else {
            Consumed {
                width: 0.0,
                height: margin_top + height + margin_bottom,
            }
        }
    }

    /// [§ 9.4 Normal flow](https://www.w3.org/TR/CSS2/visuren.html#normal-flow)
    ///
    /// Inline children advance a cursor to the right and raise the current
    /// line's height. A block child first closes any open line, then advances
    /// the cursor down by its own height.
    fn layout_children(
        &mut self,
        id: NodeId,
        zone: Zone,
        depth: usize,
        skip_first_text: bool,
    ) -> Consumed {
        let tree = self.tree;
        let parent_inline = self.flows_inline(id, false);

        let mut x = zone.x;
        let mut y = zone.y;
        let mut line_height: f32 = 0.0;
        let mut widest: f32 = 0.0;

        for (index, &child) in tree.children(id).iter().enumerate() {
            if index == 0 && skip_first_text && tree.as_text(child).is_some() {
                continue;
            }
            if matches!(tree.get(child).map(|n| &n.node_type), Some(NodeType::Comment(_))) {
                continue;
            }

            let inline = self.flows_inline(child, parent_inline);
            if !inline && line_height > 0.0 {
                y += line_height;
                x = zone.x;
                line_height = 0.0;
            }

            let child_zone = Zone { x, y, ..zone };
            let consumed = self.layout_node(child, child_zone, depth + 1, inline);

            if inline {
                x += consumed.width;
                line_height = line_height.max(consumed.height);
            } else {
                y += consumed.height;
            }
            widest = widest.max(x - zone.x);
        }

        Consumed {
            width: widest,
            height: y - zone.y + line_height,
        }
    }

    /// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
    ///
    /// Elements follow `display`, falling back to the tag when `display` is
    /// unset. Text follows its parent. Images always start a new line.
    fn flows_inline(&self, id: NodeId, parent_inline: bool) -> bool {
        match self.tree.get(id).map(|n| &n.node_type) {
            Some(NodeType::Element(element)) => {
                let tag = element.tag_name.as_str();
                match self.style(id).value("display").trim() {
                    "inline" | "inline-block" => tag != "img",
                    "" => INLINE_TAGS.contains(&tag),
                    _ => false,
                }
            }
            Some(NodeType::Text(_)) => parent_inline,
            _ => false,
        }
    }

    /// Push one text run at `(x, y)` and return its measured width and height.
    fn draw_text(&mut self, style: &ComputedStyle, text: &str, x: f32, y: f32) -> (f32, f32) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let font_size = style.font_size();
        let width = self.metrics.text_width(text, font_size);
        let height = self.metrics.line_height(font_size);
        self.list.push(DisplayCommand::DrawText {
            bounds: PixelRect::from_layout(x, y, width, height),
            run: text_run(style, text),
        });
        (width, height)
    }

    /// A text node that no element consumed.
    ///
    /// Inline text is one unbroken run, with a trailing space when something
    /// follows it. Block text is wrapped to the zone.
    fn layout_text(&mut self, id: NodeId, text: &str, zone: Zone, inline: bool) -> Consumed {
        let normalized = normalize_whitespace(text);
        let trimmed = normalized.trim();
        if trimmed.is_empty() {
            return Consumed::default();
        }
        let style = self.style(id);

        if inline {
            let run = if self.tree.next_sibling(id).is_some() {
                format!("{trimmed} ")
            } else {
                trimmed.to_string()
            };
            let (width, height) = self.draw_text(style, &run, zone.x, zone.y);
            return Consumed { width, height };
        }

        let font_size = style.font_size();
        let line_height = self.metrics.line_height(font_size);
        let mut y = zone.y;
        for line in wrap_text(trimmed, zone.width(), font_size, self.metrics) {
            let _ = self.draw_text(style, &line, zone.x, y);
            y += line_height;
        }
        Consumed {
            width: 0.0,
            height: y - zone.y + TEXT_BUFFER_PX,
        }
    }

    /// Inline text tags: a box sized to the leading text, drawn at the zone
    /// origin, with the children following on the same line.
    fn layout_inline_box(&mut self, id: NodeId, style: &ComputedStyle, zone: Zone) -> Content {
        let font_size = style.font_size();
        let line_height = self.metrics.line_height(font_size);

        let text = leading_text(self.tree, id).map(|text| {
            // [CSS Text § 4.1.1](https://www.w3.org/TR/css-text-3/#white-space-phase-1)
            // Separate the run from whatever follows it.
            let followed = self.tree.children(id).len() > 1 || self.tree.next_sibling(id).is_some();
            if followed { format!("{text} ") } else { text }
        });
        let text_width = text
            .as_deref()
            .map_or(0.0, |text| self.metrics.text_width(text, font_size));

        let max_width = style.get("width").is_none().then_some(text_width);
        let extent = draw_box(&mut self.list, style, zone, Some(line_height), max_width);
        if let Some(text) = &text {
            let _ = self.draw_text(
                style,
                text,
                zone.x + extent.inset_left,
                zone.y + extent.inset_top,
            );
        }

        Content {
            width: extent.width,
            height: extent.height,
            trailing: 0.0,
            children: Some(ChildFlow {
                dx: extent.width,
                dy: 0.0,
                skip_first_text: text.is_some(),
            }),
        }
    }

    /// Generic block: a zone-wide box one line tall (or explicitly sized),
    /// the leading text on its first line, children below it.
    fn layout_block_box(&mut self, id: NodeId, style: &ComputedStyle, zone: Zone) -> Content {
        let font_size = style.font_size();
        let extent = draw_box(
            &mut self.list,
            style,
            zone,
            Some(font_size + font_size / 5.0),
            None,
        );
        let explicit_height = style.get("height").is_some().then_some(extent.height);

        let text = leading_text(self.tree, id);
        let mut text_height = 0.0;
        if let Some(text) = &text {
            let (_, height) = self.draw_text(
                style,
                text,
                zone.x + extent.inset_left,
                zone.y + extent.inset_top,
            );
            text_height = height + TEXT_BUFFER_PX;
        }

        let dy = extent.inset_top + text_height;
        Content {
            width: extent.width,
            height: explicit_height.unwrap_or(dy).max(dy),
            trailing: if explicit_height.is_some() {
                0.0
            } else {
                extent.inset_bottom
            },
            children: Some(ChildFlow {
                dx: extent.inset_left,
                dy,
                skip_first_text: text.is_some(),
            }),
        }
    }

    /// `p`: every descendant's text, split at `br`, wrapped to the content
    /// width, inside a box exactly as tall as the lines.
    fn layout_paragraph(&mut self, id: NodeId, style: &ComputedStyle, zone: Zone) -> Content {
        let styles = self.styles;
        let hidden = |node: NodeId| styles.get(&node).is_some_and(ComputedStyle::is_display_none);
        let logical = paragraph_lines(self.tree, id, &hidden);

        let font_size = style.font_size();
        let line_height = self.metrics.line_height(font_size);
        let padding = EdgeSizes::padding(style);
        let wrap_width = style
            .length("width")
            .unwrap_or(zone.width() - padding.left - padding.right);

        let mut lines: Vec<String> = Vec::new();
        for line in &logical {
            let wrapped = wrap_text(line, wrap_width, font_size, self.metrics);
            if wrapped.is_empty() {
                lines.push(String::new());
            } else {
                lines.extend(wrapped);
            }
        }
        if lines.iter().all(String::is_empty) {
            lines.clear();
        }

        // The box is sized before any line is drawn.
        let text_height = line_height * lines.len() as f32;
        let extent = draw_box(&mut self.list, style, zone, Some(text_height), None);

        let x = zone.x + extent.inset_left;
        let mut y = zone.y + extent.inset_top;
        for line in &lines {
            let _ = self.draw_text(style, line, x, y);
            y += line_height;
        }

        let buffer = if lines.is_empty() { 0.0 } else { TEXT_BUFFER_PX };
        Content {
            width: 0.0,
            height: extent.height.max(y - zone.y + extent.inset_bottom) + buffer,
            trailing: 0.0,
            children: None,
        }
    }
}

/// [§ 9.1.1 The viewport](https://www.w3.org/TR/CSS2/visuren.html#viewport)
///
/// Lay out a whole document onto a canvas.
///
/// The canvas is filled with the body's background (white by default), then
/// the body's children are laid out inside the body's margins. Without a
/// `body`, the document's children are laid out over the full canvas.
#[must_use]
pub fn layout_document(
    tree: &DomTree,
    styles: &HashMap<NodeId, ComputedStyle>,
    options: &LayoutOptions,
    metrics: &dyn FontMetrics,
    images: &dyn ImageLoader,
) -> DisplayList {
    let mut ctx = LayoutContext::new(tree, styles, metrics, images);
    let canvas = Zone::new(0.0, 0.0, options.width as f32, options.height as f32);

    let body = tree.body();
    let body_style = body.map_or(&EMPTY_STYLE, |body| ctx.style(body));

    // [§ 2.11.2 The canvas background and the HTML body element](https://www.w3.org/TR/css-backgrounds-3/#body-background)
    let background = body_style.background_color().unwrap_or(ColorValue::WHITE);
    ctx.list.fill_rect(
        PixelRect {
            x: 0,
            y: 0,
            width: options.width,
            height: options.height,
        },
        background,
    );

    match body {
        Some(body) => {
            let margin = EdgeSizes::margin(body_style);
            let zone = Zone {
                x: canvas.x + margin.left,
                y: canvas.y + margin.top,
                max_x: canvas.max_x - margin.right,
                max_y: canvas.max_y - margin.bottom,
            };
            let depth = tree.depth(body);
            let _ = ctx.layout_children(body, zone, depth, false);
        }
        None => {
            let _ = ctx.layout_children(tree.root(), canvas, 0, false);
        }
    }

    ctx.into_display_list()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::{InteractiveState, compute_styles};
    use crate::parser::parse_stylesheet;

    fn run(tree: &DomTree, css: &str) -> DisplayList {
        let styles = compute_styles(tree, &parse_stylesheet(css), &InteractiveState::new());
        layout_document(
            tree,
            &styles,
            &LayoutOptions::default(),
            &ApproximateFontMetrics,
            &NoImages,
        )
    }

    fn page() -> (DomTree, NodeId) {
        let mut tree = DomTree::new();
        let html = tree.append_element(tree.root(), "html", &[]);
        let body = tree.append_element(html, "body", &[]);
        (tree, body)
    }

    #[test]
    fn test_zone_size_never_negative() {
        let zone = Zone {
            x: 10.0,
            y: 10.0,
            max_x: 5.0,
            max_y: 30.0,
        };
        assert!(zone.width().abs() < f32::EPSILON);
        assert!((zone.height() - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_inline_children_share_a_line() {
        let (mut tree, body) = page();
        let div = tree.append_element(body, "div", &[]);
        let a = tree.append_element(div, "span", &[]);
        let _ = tree.append_text(a, "one");
        let b = tree.append_element(div, "span", &[]);
        let _ = tree.append_text(b, "two");

        let list = run(&tree, "");
        let runs: Vec<_> = list.text_runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].0.y, runs[1].0.y);
        assert!(runs[1].0.x > runs[0].0.x);
        assert_eq!(runs[0].1.text, "one ");
        assert_eq!(runs[1].1.text, "two");
    }

    #[test]
    fn test_blocks_stack() {
        let (mut tree, body) = page();
        let first = tree.append_element(body, "div", &[]);
        let _ = tree.append_text(first, "first");
        let second = tree.append_element(body, "div", &[]);
        let _ = tree.append_text(second, "second");

        let list = run(&tree, "");
        let runs: Vec<_> = list.text_runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].0.x, runs[1].0.x);
        assert!(runs[1].0.y > runs[0].0.y);
    }

    #[test]
    fn test_display_none_skips_subtree() {
        let (mut tree, body) = page();
        let div = tree.append_element(body, "div", &[("style", "display: none")]);
        let _ = tree.append_text(div, "hidden");

        let list = run(&tree, "");
        assert_eq!(list.text_runs().count(), 0);
    }

    #[test]
    fn test_margin_left_clamps_origin() {
        let (mut tree, body) = page();
        let div = tree.append_element(body, "div", &[("style", "margin-left: 50px")]);
        let _ = tree.append_text(div, "x");

        let list = run(&tree, "body { margin: 0 }");
        let (bounds, _) = list.text_runs().next().unwrap();
        assert_eq!(bounds.x, 50);
    }

    #[test]
    fn test_paragraph_box_precedes_lines() {
        let (mut tree, body) = page();
        let p = tree.append_element(body, "p", &[("style", "background-color: yellow")]);
        let _ = tree.append_text(p, "one");
        let _ = tree.append_element(p, "br", &[]);
        let _ = tree.append_text(p, "two");

        let list = run(&tree, "");
        let commands = list.commands();
        // Canvas, paragraph background, two lines.
        assert_eq!(commands.len(), 4);
        let DisplayCommand::FillRect { bounds, .. } = &commands[1] else {
            panic!("expected the paragraph background, got {:?}", commands[1]);
        };
        // Two lines of 16px text at 1.2 line height.
        assert_eq!(bounds.height, 38);
        assert!(matches!(commands[2], DisplayCommand::DrawText { .. }));
        assert!(matches!(commands[3], DisplayCommand::DrawText { .. }));
    }

    #[test]
    fn test_paragraph_wraps_to_zone() {
        let (mut tree, body) = page();
        let p = tree.append_element(body, "p", &[]);
        let _ = tree.append_text(p, "word word word word word word word word");

        let styles = compute_styles(&tree, &parse_stylesheet(""), &InteractiveState::new());
        let options = LayoutOptions {
            width: 100,
            height: 300,
        };
        let list = layout_document(&tree, &styles, &options, &ApproximateFontMetrics, &NoImages);
        assert!(list.text_runs().count() > 1);
        for (bounds, _) in list.text_runs() {
            assert!(bounds.width <= 100);
        }
    }

    #[test]
    fn test_unordered_list_bullets() {
        let (mut tree, body) = page();
        let ul = tree.append_element(body, "ul", &[("style", "padding-left: 40px")]);
        for label in ["a", "b"] {
            let li = tree.append_element(ul, "li", &[]);
            let _ = tree.append_text(li, label);
        }

        let list = run(&tree, "body { margin: 0 }");
        let bullets: Vec<_> = list
            .commands()
            .iter()
            .filter(|c| matches!(c, DisplayCommand::FillCircle { .. }))
            .collect();
        assert_eq!(bullets.len(), 2);
        let DisplayCommand::FillCircle { center_x, radius, .. } = bullets[0] else {
            unreachable!()
        };
        assert_eq!(*radius, 4);
        assert_eq!(*center_x, 44);

        let (first, _) = list.text_runs().next().unwrap();
        // Padding, then one em for the bullet.
        assert_eq!(first.x, 56);
        assert_eq!(first.y, LIST_TOP_OFFSET as i32);
    }

    #[test]
    fn test_ordered_list_markers() {
        let (mut tree, body) = page();
        let ol = tree.append_element(body, "ol", &[("start", "3")]);
        for label in ["a", "b"] {
            let li = tree.append_element(ol, "li", &[]);
            let _ = tree.append_text(li, label);
        }

        let list = run(&tree, "");
        let texts: Vec<_> = list.text_runs().map(|(_, run)| run.text.as_str()).collect();
        assert_eq!(texts, vec!["3.", "a", "4.", "b"]);
    }

    #[test]
    fn test_list_style_none_hides_marker() {
        let (mut tree, body) = page();
        let ul = tree.append_element(body, "ul", &[]);
        let li = tree.append_element(ul, "li", &[("style", "list-style-type: none")]);
        let _ = tree.append_text(li, "a");

        let list = run(&tree, "");
        assert!(
            !list
                .commands()
                .iter()
                .any(|c| matches!(c, DisplayCommand::FillCircle { .. }))
        );
    }

    #[test]
    fn test_item_outside_a_list_has_no_marker() {
        let (mut tree, body) = page();
        let menu = tree.append_element(body, "menu", &[]);
        let li = tree.append_element(menu, "li", &[]);
        let _ = tree.append_text(li, "a");
        let loose = tree.append_element(body, "li", &[]);
        let _ = tree.append_text(loose, "b");

        let list = run(&tree, "");
        assert!(
            !list
                .commands()
                .iter()
                .any(|c| matches!(c, DisplayCommand::FillCircle { .. }))
        );
        let texts: Vec<_> = list.text_runs().map(|(_, run)| run.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_table_rows_and_cells() {
        let (mut tree, body) = page();
        let table = tree.append_element(body, "table", &[]);
        let _ = tree.append_text(table, "\n  ");
        let tbody = tree.append_element(table, "tbody", &[]);
        for _ in 0..2 {
            let tr = tree.append_element(tbody, "tr", &[]);
            for label in ["ab", ""] {
                let td = tree.append_element(tr, "td", &[("style", "background: silver")]);
                let _ = tree.append_text(td, label);
            }
        }

        let list = run(&tree, "body { margin: 0 }");
        let cells: Vec<_> = list
            .commands()
            .iter()
            .skip(1)
            .filter_map(|c| match c {
                DisplayCommand::FillRect { bounds, .. } => Some(*bounds),
                _ => None,
            })
            .collect();
        assert_eq!(cells.len(), 4);
        // "ab" is 19.2px wide; the empty cell gets the minimum width.
        assert_eq!(cells[0].x, 0);
        assert_eq!(cells[1].x, 19);
        assert_eq!(cells[1].width, MIN_CELL_WIDTH as u32);
        assert_eq!(cells[2].x, 0);
        assert!(cells[2].y > cells[0].y);
    }

    #[test]
    fn test_table_without_tbody_is_skipped() {
        let (mut tree, body) = page();
        let table = tree.append_element(body, "table", &[]);
        let tr = tree.append_element(table, "tr", &[]);
        let td = tree.append_element(tr, "td", &[]);
        let _ = tree.append_text(td, "lost");

        let list = run(&tree, "");
        assert_eq!(list.text_runs().count(), 0);
    }

    #[test]
    fn test_depth_guard() {
        let (mut tree, body) = page();
        let mut parent = body;
        for _ in 0..MAX_TREE_DEPTH + 5 {
            parent = tree.append_element(parent, "div", &[]);
        }
        let _ = tree.append_text(parent, "too deep");

        let list = run(&tree, "");
        assert_eq!(list.text_runs().count(), 0);
    }
}
