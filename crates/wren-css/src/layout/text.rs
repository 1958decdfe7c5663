//! Text measurement, whitespace handling and line breaking.
//!
//! [CSS Text § 4 White Space Processing](https://www.w3.org/TR/css-text-3/#white-space-processing)
//!
//! Glyph shaping belongs to whoever implements [`FontMetrics`]; layout only
//! needs advance widths and a line height.

use wren_dom::{DomTree, NodeId, NodeType};

use crate::paint::TextRun;
use crate::style::ComputedStyle;

const NBSP: char = '\u{a0}';

/// Font metrics interface for text measurement during layout.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
pub trait FontMetrics {
    /// Total advance width of `text` at `font_size`.
    ///
    /// Must match the cursor advancement the renderer uses when it draws the
    /// same run.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Line height for `font_size`.
    ///
    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The initial value of 'line-height' is 'normal'. We recommend a used
    /// value for 'normal' between 1.0 and 1.2."
    fn line_height(&self, font_size: f32) -> f32;
}

/// Fixed-ratio metrics: 0.6em per character, 1.2em per line.
///
/// Used when no font is available, and in tests where exact pixel positions
/// have to be predictable.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl FontMetrics for ApproximateFontMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        text.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO
    }

    fn line_height(&self, font_size: f32) -> f32 {
        const LINE_HEIGHT_RATIO: f32 = 1.2;
        font_size * LINE_HEIGHT_RATIO
    }
}

/// Collapse source newlines and non-breaking spaces.
///
/// - a newline becomes one space, unless it starts the text or follows a space
/// - whitespace that follows a newline (indentation) is dropped
/// - a run of U+00A0 becomes one space
///
/// Ordinary spaces elsewhere are kept as written.
///
/// ```
/// use wren_css::layout::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("Hello\n    world"), "Hello world");
/// assert_eq!(normalize_whitespace("a\u{a0}\u{a0}b"), "a b");
/// ```
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut after_newline = false;

    for (index, ch) in text.chars().enumerate() {
        match ch {
            '\n' => {
                after_newline = true;
                if index > 0 && !matches!(prev, Some(' ' | NBSP)) {
                    out.push(' ');
                    prev = Some(' ');
                }
            }
            '\r' => {}
            c if after_newline && c.is_whitespace() => {}
            NBSP => {
                after_newline = false;
                if prev != Some(NBSP) {
                    out.push(' ');
                }
                prev = Some(NBSP);
            }
            c => {
                after_newline = false;
                out.push(c);
                prev = Some(c);
            }
        }
    }
    out
}

/// Slack allowed when comparing a measured width against the wrap width, so
/// float rounding in the metrics does not push an exact fit onto a new line.
const WRAP_TOLERANCE_PX: f32 = 0.01;

/// Greedy word wrap on spaces.
///
/// A word wider than `max_width` gets a line of its own. A non-positive
/// `max_width` disables wrapping. Empty text yields no lines.
#[must_use]
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font_size: f32,
    metrics: &dyn FontMetrics,
) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    let fits = |line: &str| metrics.text_width(line, font_size) <= max_width + WRAP_TOLERANCE_PX;
    if max_width <= 0.0 || fits(text) {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split(' ').filter(|w| !w.is_empty()) {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if fits(&candidate) {
            line = candidate;
        } else {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// A text run carrying the font and color of `style`.
#[must_use]
pub fn text_run(style: &ComputedStyle, text: &str) -> TextRun {
    TextRun {
        text: text.to_string(),
        font_size: style.font_size(),
        color: style.text_color(),
        font_style: style.font_style(),
        font_weight: style.font_weight(),
    }
}

/// Text of the first child, if that child is a text node with something
/// visible in it. Returned normalized and trimmed.
pub(super) fn leading_text(tree: &DomTree, id: NodeId) -> Option<String> {
    let first = tree.first_child(id)?;
    let text = normalize_whitespace(tree.as_text(first)?);
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Logical lines of a paragraph.
///
/// Text of every descendant is concatenated in tree order; a `br` element
/// starts a new line. Comments and subtrees for which `hidden` returns true
/// contribute nothing. Lines are normalized but not yet wrapped.
pub(super) fn paragraph_lines(
    tree: &DomTree,
    id: NodeId,
    hidden: &dyn Fn(NodeId) -> bool,
) -> Vec<String> {
    fn collect(
        tree: &DomTree,
        id: NodeId,
        hidden: &dyn Fn(NodeId) -> bool,
        lines: &mut Vec<String>,
    ) {
        for &child in tree.children(id) {
            let Some(node) = tree.get(child) else { continue };
            match &node.node_type {
                NodeType::Text(text) => {
                    if let Some(line) = lines.last_mut() {
                        line.push_str(text);
                    }
                }
                NodeType::Element(element) if element.tag_name == "br" => {
                    lines.push(String::new());
                }
                NodeType::Element(_) if !hidden(child) => collect(tree, child, hidden, lines),
                _ => {}
            }
        }
    }

    let mut raw = vec![String::new()];
    collect(tree, id, hidden, &mut raw);
    raw.iter()
        .map(|line| normalize_whitespace(line).trim().to_string())
        .collect()
}
