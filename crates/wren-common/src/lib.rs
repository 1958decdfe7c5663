//! Common utilities shared by the wren crates.
//!
//! - **Warnings** - deduplicated diagnostics for recoverable input problems
//! - **Images** - decoded RGBA pixel buffers handed from loaders to layout and paint

pub mod image;
pub mod warning;
