//! Computed style representation and typed value parsing.
//!
//! Values stay strings in the cascade. The helpers here turn them into
//! numbers, colors and keywords at the point layout needs them:
//! - [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//! - [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//! - [CSS Fonts Level 4](https://www.w3.org/TR/css-fonts-4/)

pub mod color;
pub mod computed;
pub mod font;
pub mod length;

pub use color::{ColorValue, ParsedColor, is_inherit_keyword, parse_color};
pub use computed::{ComputedStyle, INHERITED_PROPERTIES};
pub use font::{FontStyle, FontWeight};
pub use length::{DEFAULT_FONT_SIZE_PX, EM_PX, is_border_style, parse_border_width, parse_length};
