//! Document pipeline for the wren engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Document Loading** - read a JSON element tree from disk
//! - **Style Computation** - default stylesheet, the page's `<style>`, extra sheets
//! - **Layout** - fontdue-measured text and filesystem images
//! - **Software Rendering** - execute the display list into an RGBA image
//!
//! ```text
//! JSON → DomTree → Stylesheet → ComputedStyle → DisplayList → Pixels
//! ```

pub mod font_metrics;
pub mod image_loader;
pub mod renderer;

pub use wren_css as css;
pub use wren_css::layout::ImageError;
pub use wren_dom as dom;

pub use font_metrics::{FontSet, FontdueFontMetrics};
pub use image_loader::FsImageLoader;
pub use renderer::Renderer;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;
use wren_common::warning::clear_warnings;
use wren_css::layout::{FontMetrics, ImageLoader};
use wren_css::{
    ComputedStyle, DisplayList, InteractiveState, LayoutOptions, Stylesheet, compute_styles,
    default_stylesheet, layout_document, parse_stylesheet,
};
use wren_dom::{DomTree, NodeId, NodeSpec};

/// Why a document could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read '{}'", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid element-tree description.
    #[error("'{}' is not a valid element tree", path.display())]
    Json {
        /// File that was being decoded.
        path: PathBuf,
        /// Decoder error, with line and column.
        #[source]
        source: serde_json::Error,
    },
}

/// Everything that shapes one rendering besides the document itself.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Canvas size.
    pub layout: LayoutOptions,
    /// Link targets matched by `:visited`.
    pub visited: Vec<String>,
    /// Extra stylesheet sources, merged after the page's own.
    pub extra_css: Vec<String>,
    /// Put the default stylesheet under the page's.
    pub use_default_css: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: LayoutOptions::default(),
            visited: Vec::new(),
            extra_css: Vec::new(),
            use_default_css: true,
        }
    }
}

/// A fully loaded and styled document.
pub struct LoadedDocument {
    /// Source path, empty for documents built in memory.
    pub source_path: PathBuf,

    /// Element tree.
    pub dom: DomTree,

    /// Text of the page's `<style>` elements.
    pub css_text: String,

    /// Default, page and extra rules, merged.
    pub stylesheet: Stylesheet,

    /// Computed styles per element and text node.
    pub styles: HashMap<NodeId, ComputedStyle>,
}

impl LoadedDocument {
    /// Lay the document out onto a canvas.
    #[must_use]
    pub fn layout(
        &self,
        options: &LayoutOptions,
        metrics: &dyn FontMetrics,
        images: &dyn ImageLoader,
    ) -> DisplayList {
        layout_document(&self.dom, &self.styles, options, metrics, images)
    }

    /// Directory relative image sources resolve against.
    #[must_use]
    pub fn base_dir(&self) -> Option<&Path> {
        self.source_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}

/// Load a document from a JSON element-tree file.
///
/// Warnings from any previous document are forgotten first.
///
/// # Errors
///
/// Returns [`LoadError`] when the file cannot be read or decoded. Problems
/// inside the document (bad CSS, unknown selectors) are only logged.
pub fn load_document(path: &Path, options: &RenderOptions) -> Result<LoadedDocument, LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let spec: NodeSpec = serde_json::from_str(&source).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut doc = build_document(DomTree::from_spec(&spec), options);
    doc.source_path = path.to_path_buf();
    Ok(doc)
}

/// Style an in-memory tree.
#[must_use]
pub fn build_document(dom: DomTree, options: &RenderOptions) -> LoadedDocument {
    clear_warnings();

    let css_text = extract_style_content(&dom);
    let mut stylesheet = if options.use_default_css {
        default_stylesheet().clone()
    } else {
        Stylesheet::new()
    };
    // [CSS Cascading § 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
    // Author rules override the defaults for the same selector.
    stylesheet.merge(&parse_stylesheet(&css_text));
    for extra in &options.extra_css {
        stylesheet.merge(&parse_stylesheet(extra));
    }

    let state = InteractiveState::with_visited(options.visited.iter().cloned());
    let styles = compute_styles(&dom, &stylesheet, &state);

    LoadedDocument {
        source_path: PathBuf::new(),
        dom,
        css_text,
        stylesheet,
        styles,
    }
}

/// Text of every `<style>` element directly inside `<head>`, in order.
///
/// [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
#[must_use]
pub fn extract_style_content(dom: &DomTree) -> String {
    let Some(head) = dom.head() else {
        return String::new();
    };
    dom.element_children(head)
        .filter(|&child| dom.tag_name(child) == Some("style"))
        .map(|style| dom.text_content(style))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lay out and rasterize `doc` with the given fonts and images.
#[must_use]
pub fn render_document(
    doc: &LoadedDocument,
    options: &LayoutOptions,
    fonts: &FontSet,
    images: &dyn ImageLoader,
) -> RgbaImage {
    let metrics = FontdueFontMetrics::new(fonts);
    let display_list = doc.layout(options, &metrics, images);
    let mut renderer = Renderer::new(options.width, options.height, fonts);
    renderer.render(&display_list);
    renderer.into_image()
}
