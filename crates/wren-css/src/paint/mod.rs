//! CSS Painting
//!
//! [CSS 2.1 Appendix E - Elaborate description of Stacking Contexts](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! Layout emits draw primitives straight into a [`DisplayList`]; there is no
//! separate paint tree. The list can then be executed by any renderer.
//!
//! ```text
//! Style → Layout → DisplayList → Render
//! ```

mod display_list;

pub use display_list::{DisplayCommand, DisplayList, PixelRect, TextRun};
