//! JSON description of an element tree.
//!
//! ```json
//! { "tag": "html", "children": [
//!     { "tag": "body", "children": [
//!         { "tag": "p", "attrs": [["style", "color: red"]], "children": ["Hi"] }
//!     ] }
//! ] }
//! ```
//!
//! A bare string is a text node, `{"comment": "..."}` a comment. Attributes are
//! `[name, value]` pairs so that order and duplicates survive decoding.

use serde::Deserialize;

use crate::{DomTree, ElementData, NodeId, NodeType};

/// One node of a tree description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    /// A text node written as a plain string.
    Text(String),
    /// A comment node.
    Comment {
        /// Comment body.
        comment: String,
    },
    /// An element with optional attributes and children.
    Element {
        /// Tag name.
        tag: String,
        /// `[name, value]` pairs in source order.
        #[serde(default)]
        attrs: Vec<(String, String)>,
        /// Child nodes in document order.
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
}

impl NodeSpec {
    /// Allocate this node (and its subtree) and append it to `parent`.
    pub fn append_to(&self, tree: &mut DomTree, parent: NodeId) {
        match self {
            Self::Text(text) => {
                let _ = tree.append_text(parent, text);
            }
            Self::Comment { comment } => {
                let id = tree.alloc(NodeType::Comment(comment.clone()));
                tree.append_child(parent, id);
            }
            Self::Element {
                tag,
                attrs,
                children,
            } => {
                let data = attrs
                    .iter()
                    .fold(ElementData::new(tag), |data, (name, value)| {
                        data.with_attr(name, value)
                    });
                let id = tree.alloc(NodeType::Element(data));
                tree.append_child(parent, id);
                for child in children {
                    child.append_to(tree, id);
                }
            }
        }
    }
}
