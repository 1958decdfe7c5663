//! CSS selector parsing, cascade, style computation and box-model layout for
//! the wren engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, universal, id and class selectors, one attribute fragment
//!   - Pseudo-classes, including `:not()` with a simple sub-selector
//!   - Combinators and pseudo-elements are rejected
//!
//! - **Stylesheet parsing** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Comment stripping, selector groups, declaration blocks
//!   - Per-property value validation
//!   - Shorthand expansion (`margin`, `padding`, `border` and its parts)
//!
//! - **Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Signed specificity scores, ascending merge
//!   - Inheritance of a fixed property list
//!   - Inline `style` attributes applied last
//!
//! - **Layout** ([CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/))
//!   - Margins, borders, padding and backgrounds
//!   - Paragraphs, lists, tables and images
//!   - Output as a [`DisplayList`] of draw primitives
//!
//! # Not Implemented
//!
//! - `!important`, `@media` and other at-rules
//! - Percentage, `rem` and viewport units
//! - Floats, positioning, flex and grid

/// Style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box-model layout per [CSS Box Model Level 3](https://www.w3.org/TR/css-box-3/).
pub mod layout;
/// Draw primitives per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// Stylesheet parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Selector parsing per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Computed style and typed values per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod style;
/// Default stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

// Re-exports for convenience
pub use cascade::{InteractiveState, MAX_TREE_DEPTH, compute_style, compute_styles, specificity};
pub use layout::{
    ApproximateFontMetrics, Consumed, FontMetrics, ImageError, ImageLoader, LayoutContext,
    LayoutOptions, NoImages, Zone, layout_document,
};
pub use paint::{DisplayCommand, DisplayList, PixelRect, TextRun};
pub use parser::{DeclarationBlock, Stylesheet, parse_inline_style, parse_stylesheet};
pub use selector::{Selector, SelectorError, parse_selector};
pub use style::{ColorValue, ComputedStyle, FontStyle, FontWeight, ParsedColor, parse_color};
pub use ua_stylesheet::default_stylesheet;
