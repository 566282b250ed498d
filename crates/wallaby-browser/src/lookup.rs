//! Attribute-bag element lookup.
//!
//! An explicit builder of match criteria - tag name, an ordered list of
//! `(name, value)` attribute pairs, and optional text content - for
//! callers that locate elements by known attributes rather than a query
//! string.

use wallaby_dom::{Document, NodeId};

/// Criteria for finding elements by tag, attributes, and text.
///
/// All supplied criteria must hold for an element to match. An empty
/// lookup matches every element.
#[derive(Debug, Clone, Default)]
pub struct ElementLookup {
    tag: Option<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
}

impl ElementLookup {
    /// Start an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a (case-insensitive) tag name.
    #[must_use]
    pub fn tag(mut self, tag: &str) -> Self {
        self.tag = Some(tag.to_ascii_lowercase());
        self
    }

    /// Require an attribute to have exactly this value. May be called
    /// repeatedly; all pairs must match.
    #[must_use]
    pub fn attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Require the element's trimmed text content to equal `text`.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Check the criteria against one element.
    #[must_use]
    pub fn matches(&self, tree: &Document, id: NodeId) -> bool {
        let Some(element) = tree.as_element(id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if element.tag_name != *tag {
                return false;
            }
        }
        for (name, value) in &self.attributes {
            if element.attrs.get(name) != Some(value.as_str()) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if tree.text_content(id).trim() != text {
                return false;
            }
        }
        true
    }

    /// Find all matching elements under `scope`, in document order.
    #[must_use]
    pub fn find_within(&self, tree: &Document, scope: NodeId) -> Vec<NodeId> {
        tree.descendants(scope)
            .filter(|&id| self.matches(tree, id))
            .collect()
    }

    /// Find all matching elements in the document, in document order.
    #[must_use]
    pub fn find(&self, tree: &Document) -> Vec<NodeId> {
        self.find_within(tree, tree.root())
    }
}
