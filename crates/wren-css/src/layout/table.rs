//! Table layout.
//!
//! [CSS 2.1 § 17 Tables](https://www.w3.org/TR/CSS2/tables.html)
//!
//! A much reduced row/cell model: every row starts at the table's left edge,
//! cells are placed left to right with their own width, and a row is as tall
//! as its tallest cell. Column widths are not shared between rows.

use wren_common::warning::warn_once;
use wren_dom::{DomTree, NodeId, NodeType};

use super::box_model::draw_box;
use super::text::normalize_whitespace;
use super::{Content, LayoutContext, TEXT_BUFFER_PX, Zone};

/// Narrowest a cell's content box gets when it has no explicit `width`.
pub const MIN_CELL_WIDTH: f32 = 10.0;

/// Comments and whitespace-only text between table parts.
fn is_ignorable(tree: &DomTree, id: NodeId) -> bool {
    tree.get(id).is_none_or(|node| match &node.node_type {
        NodeType::Text(text) => text.trim().is_empty(),
        NodeType::Comment(_) => true,
        NodeType::Document | NodeType::Element(_) => false,
    })
}

impl LayoutContext<'_> {
    /// [§ 17.5 Visual layout of table contents](https://www.w3.org/TR/CSS2/tables.html#table-layout)
    ///
    /// The first significant child must be a `tbody`; otherwise the table is
    /// logged and skipped. Rows are the `tbody`'s `tr` children, cells their
    /// `th`/`td` children.
    pub(super) fn layout_table(&mut self, id: NodeId, zone: Zone) -> Content {
        let tree = self.tree;
        let first = tree
            .children(id)
            .iter()
            .copied()
            .find(|&child| !is_ignorable(tree, child));
        let Some(tbody) = first.filter(|&child| tree.tag_name(child) == Some("tbody")) else {
            warn_once("layout", "table without a leading tbody is not laid out");
            return Content::default();
        };

        let mut y = zone.y;
        for row in tree.element_children(tbody) {
            if tree.tag_name(row) != Some("tr") || self.style(row).is_display_none() {
                continue;
            }
            let mut x = zone.x;
            let mut tallest: f32 = 0.0;

            for cell in tree.element_children(row) {
                if !matches!(tree.tag_name(cell), Some("th" | "td")) {
                    continue;
                }
                let style = self.style(cell);
                if style.is_display_none() {
                    continue;
                }

                let text = normalize_whitespace(&tree.text_content(cell));
                let text = text.trim();
                let font_size = style.font_size();
                let content_width = style
                    .length("width")
                    .unwrap_or_else(|| self.metrics.text_width(text, font_size).max(MIN_CELL_WIDTH));
                let content_height = self.metrics.line_height(font_size) + TEXT_BUFFER_PX;

                let cell_zone = Zone { x, y, ..zone };
                let extent = draw_box(
                    &mut self.list,
                    style,
                    cell_zone,
                    Some(content_height),
                    Some(content_width),
                );
                let _ = self.draw_text(style, text, x + extent.inset_left, y + extent.inset_top);

                x += extent.width;
                tallest = tallest.max(extent.height);
            }

            y += tallest;
        }

        Content {
            height: y - zone.y,
            ..Content::default()
        }
    }
}
