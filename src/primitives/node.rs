//! Node - render output of a section.
//!
//! A plain tree the host turns into real markup. Nodes that stand for a
//! mounted element carry its handle and the motion frame sampled at render
//! time, so the host can apply `opacity`/`transform` without knowing
//! anything about variants.
//!
//! # Example
//!
//! ```ignore
//! let node = Node::element(headline_id, "h2")
//!     .attr("class", "headline")
//!     .text(&content.works.section_title);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::motion::MotionState;
use crate::state::animate;
use crate::types::ElementId;

/// One node of rendered output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    pub tag: &'static str,
    pub element: Option<ElementId>,
    pub key: Option<String>,
    pub attrs: BTreeMap<String, String>,
    pub text: Option<String>,
    /// Visual state at render time, for animated elements.
    pub motion: Option<MotionState>,
    pub children: Vec<Node>,
}

impl Node {
    /// Static node with no backing element.
    pub fn new(tag: &'static str) -> Self {
        Self { tag, ..Default::default() }
    }

    /// Node backed by a mounted element. Samples its current frame.
    pub fn element(id: ElementId, tag: &'static str) -> Self {
        Self {
            tag,
            element: Some(id),
            key: crate::engine::key_of(id),
            motion: animate::frame(id),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append `child` only if present.
    pub fn maybe_child(mut self, child: Option<Node>) -> Self {
        if let Some(child) = child {
            self.children.push(child);
        }
        self
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Depth-first walk, self first.
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }

    /// First node with `attr == value`.
    pub fn find_attr(&self, name: &str, value: &str) -> Option<&Node> {
        self.walk()
            .into_iter()
            .find(|node| node.attrs.get(name).map(String::as_str) == Some(value))
    }

    /// Every node with the given tag.
    pub fn find_all(&self, tag: &str) -> Vec<&Node> {
        self.walk().into_iter().filter(|node| node.tag == tag).collect()
    }

    /// Node rendered for `element`, if present.
    pub fn find_element(&self, element: ElementId) -> Option<&Node> {
        self.walk().into_iter().find(|node| node.element == Some(element))
    }

    /// Concatenated text of this subtree.
    pub fn text_content(&self) -> String {
        self.walk()
            .into_iter()
            .filter_map(|node| node.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }

    pub fn count(&self) -> usize {
        self.walk().len()
    }
}

/// Compact markup, for logs and snapshots.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if let Some(key) = &self.key {
            write!(f, " key=\"{key}\"")?;
        }
        for (name, value) in &self.attrs {
            write!(f, " {name}=\"{value}\"")?;
        }
        if let Some(opacity) = self.motion.and_then(|m| m.opacity) {
            write!(f, " style=\"opacity:{opacity:.2}\"")?;
        }
        write!(f, ">")?;
        if let Some(text) = &self.text {
            write!(f, "{text}")?;
        }
        for child in &self.children {
            write!(f, "{child}")?;
        }
        write!(f, "</{}>", self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{mount_keyed, reset_registry};

    #[test]
    fn test_builder_and_queries() {
        let tree = Node::new("section")
            .attr("id", "pricing")
            .child(Node::new("h2").text("Simple "))
            .child(Node::new("p").text("pricing").attr("data-role", "lede"));

        assert_eq!(tree.count(), 3);
        assert_eq!(tree.text_content(), "Simple pricing");
        assert_eq!(tree.find_attr("data-role", "lede").map(|n| n.tag), Some("p"));
        assert_eq!(tree.find_all("h2").len(), 1);
    }

    #[test]
    fn test_element_node_carries_key() {
        reset_registry();
        let id = mount_keyed("li", None, "pro-0");
        let node = Node::element(id, "li");
        assert_eq!(node.key.as_deref(), Some("pro-0"));
        assert_eq!(node.motion, None);
    }

    #[test]
    fn test_display() {
        let tree = Node::new("ul").child(Node::new("li").key("a").text("one"));
        assert_eq!(tree.to_string(), "<ul><li key=\"a\">one</li></ul>");
    }
}
