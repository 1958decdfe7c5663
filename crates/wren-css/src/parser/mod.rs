//! Stylesheet parsing.
//!
//! - [`stylesheet`]: rule splitting, declaration blocks, merging
//! - [`shorthand`]: `border`, `margin`, `padding` and friends expanded into longhands
//! - [`validate`]: per-property value checks applied before a declaration is kept

pub mod shorthand;
pub mod stylesheet;
pub mod validate;

pub use shorthand::{apply_declaration, split_value_tokens};
pub use stylesheet::{
    Declaration, DeclarationBlock, StyleRule, Stylesheet, parse_inline_style, parse_stylesheet,
};
pub use validate::is_valid_declaration;
