//! Lists and list items.
//!
//! [CSS Lists § 3 Markers](https://www.w3.org/TR/css-lists-3/#markers)
//!
//! A list shifts its items right by its own `padding-left`. Items in a `ul`
//! get a filled disc, items in an `ol` a decimal marker. `list-style-type:
//! none` suppresses either.

use wren_dom::NodeId;

use super::text::leading_text;
use super::{ChildFlow, Content, LayoutContext, TEXT_BUFFER_PX, Zone};
use crate::paint::DisplayCommand;
use crate::style::ComputedStyle;

/// Vertical offset added before the first item of a list.
pub const LIST_TOP_OFFSET: f32 = 16.0;

/// Marker drawn in front of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Marker {
    Disc,
    Decimal(i64),
}

impl Marker {
    /// Marker for `item`, from the kind and attributes of its parent list.
    /// Items outside a `ul` or `ol` get none.
    pub(super) fn for_item(ctx: &LayoutContext<'_>, item: NodeId) -> Option<Self> {
        let tree = ctx.tree;
        let list = tree.parent(item)?;
        match tree.tag_name(list)? {
            "ul" => return Some(Self::Disc),
            "ol" => {}
            _ => return None,
        }

        // [§ 4.4.7 The ol element](https://html.spec.whatwg.org/multipage/grouping-content.html#attr-ol-start)
        let start = tree
            .as_element(list)
            .and_then(|ol| ol.get_attribute("start"))
            .and_then(|start| start.trim().parse::<i64>().ok())
            .unwrap_or(1);
        let position = tree
            .element_children(list)
            .filter(|&child| tree.tag_name(child) == Some("li"))
            .position(|child| child == item)
            .unwrap_or(0);
        Some(Self::Decimal(start + position as i64))
    }
}

impl LayoutContext<'_> {
    /// `ul` / `ol`: fixed top offset, children shifted by `padding-left`.
    pub(super) fn layout_list(style: &ComputedStyle) -> Content {
        Content {
            height: LIST_TOP_OFFSET,
            children: Some(ChildFlow {
                dx: style.length_or_zero("padding-left"),
                dy: LIST_TOP_OFFSET,
                skip_first_text: false,
            }),
            ..Content::default()
        }
    }

    /// `li`: marker (if any) at the zone origin, then the item's text and
    /// children shifted right past it.
    ///
    /// The text is the item's own leading text, or failing that the leading
    /// text of its first element child, in which case the children are not
    /// laid out again.
    pub(super) fn layout_list_item(
        &mut self,
        id: NodeId,
        style: &ComputedStyle,
        zone: Zone,
        marker: Option<Marker>,
    ) -> Content {
        let font_size = style.font_size();
        let radius = font_size / 4.0;
        // One em for the marker box, plus the item's padding.
        let gap = font_size + style.length_or_zero("padding-left");

        if let Some(marker) = marker
            && style.value("list-style-type").trim() != "none"
        {
            match marker {
                Marker::Disc => self.list.push(DisplayCommand::FillCircle {
                    center_x: (zone.x + radius).round() as i32,
                    center_y: (zone.y + font_size / 3.0 + radius).round() as i32,
                    radius: radius.round() as u32,
                    color: style.text_color(),
                }),
                Marker::Decimal(n) => {
                    let _ = self.draw_text(style, &format!("{n}."), zone.x, zone.y);
                }
            }
        }

        let own_text = leading_text(self.tree, id);
        let (text, from_child) = match own_text {
            Some(text) => (Some(text), false),
            None => {
                let child_text = self
                    .tree
                    .element_children(id)
                    .next()
                    .and_then(|child| leading_text(self.tree, child));
                let found = child_text.is_some();
                (child_text, found)
            }
        };

        let Some(text) = text else {
            return Content {
                children: Some(ChildFlow {
                    dx: gap,
                    dy: 0.0,
                    skip_first_text: false,
                }),
                ..Content::default()
            };
        };

        let (width, line_height) = self.draw_text(style, &text, zone.x + gap, zone.y);
        let height = line_height + TEXT_BUFFER_PX;
        Content {
            width: gap + width,
            height,
            trailing: 0.0,
            children: (!from_child).then_some(ChildFlow {
                dx: gap,
                dy: height,
                skip_first_text: true,
            }),
        }
    }
}
