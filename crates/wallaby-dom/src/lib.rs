//! Document tree implementation for the Wallaby headless browser.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships. A node's `parent` field is a plain index (weak,
//! non-owning); ownership flows strictly parent → children through the
//! children index lists. Detaching a node from its parent therefore never
//! requires touching the node's own subtree, and there are no reference
//! cycles to manage.
//!
//! Attribute names are folded to ASCII lowercase exactly once, at insertion
//! time, so matching code everywhere else can use direct equality. Insertion
//! order is preserved for round-trip serialization.

use std::collections::HashSet;
use std::fmt::Write as _;

/// A type-safe index into the document tree.
///
/// Provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document node is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

/// A single attribute on an element.
///
/// The name is always stored in ASCII lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercase attribute name.
    pub name: String,
    /// Attribute value, entity-decoded by the parser before storage.
    pub value: String,
}

/// An ordered list of attributes with unique, case-folded names.
///
/// Lookup is linear; elements carry a handful of attributes at most, and the
/// ordered representation is what lets serialization reproduce the source
/// attribute order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    attrs: Vec<Attribute>,
}

impl AttributeList {
    /// Create an empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self { attrs: Vec::new() }
    }

    /// Look up an attribute value by case-insensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        let folded = name.to_ascii_lowercase();
        self.attrs
            .iter()
            .find(|a| a.name == folded)
            .map(|a| a.value.as_str())
    }

    /// Returns true if an attribute with this case-insensitive name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set an attribute, replacing the value if the name is already present.
    ///
    /// The name is folded to lowercase before storage.
    pub fn set(&mut self, name: &str, value: &str) {
        let folded = name.to_ascii_lowercase();
        if let Some(existing) = self.attrs.iter_mut().find(|a| a.name == folded) {
            existing.value = value.to_string();
        } else {
            self.attrs.push(Attribute {
                name: folded,
                value: value.to_string(),
            });
        }
    }

    /// Insert an attribute only if the name is not already present.
    ///
    /// Returns true if the attribute was inserted. This is the first-wins
    /// duplicate rule the document builder applies to repeated attribute
    /// names on a single tag.
    pub fn insert_if_absent(&mut self, name: &str, value: &str) -> bool {
        let folded = name.to_ascii_lowercase();
        if self.attrs.iter().any(|a| a.name == folded) {
            return false;
        }
        self.attrs.push(Attribute {
            name: folded,
            value: value.to_string(),
        });
        true
    }

    /// Remove an attribute by case-insensitive name, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let folded = name.to_ascii_lowercase();
        let index = self.attrs.iter().position(|a| a.name == folded)?;
        Some(self.attrs.remove(index).value)
    }

    /// Iterate over the attributes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attrs.iter()
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns true if there are no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeList {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.attrs.iter()
    }
}

/// Element-specific data: a lowercase tag name plus its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// The element's tag name, always lowercase.
    pub tag_name: String,
    /// The element's attribute list.
    pub attrs: AttributeList,
}

impl ElementData {
    /// Create element data with the given tag name and no attributes.
    ///
    /// The tag name is folded to lowercase.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs: AttributeList::new(),
        }
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// The class attribute holds a set of space-separated tokens.
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        match self.attrs.get("class") {
            Some(classlist) => classlist.split_ascii_whitespace().collect(),
            None => HashSet::new(),
        }
    }
}

/// The kind of a node in the tree.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document itself; only ever at [`NodeId::ROOT`].
    Document,
    /// An element with a tag name and attributes.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment node. Conditional comments are stored here too.
    Comment(String),
    /// A CDATA section.
    Cdata(String),
}

/// A node in the tree, storing indices for parent/child/sibling
/// relationships so traversal is O(1) in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is.
    pub kind: NodeKind,
    /// The parent node, if attached. Navigational only, never an ownership
    /// edge.
    pub parent: Option<NodeId>,
    /// Children in document order. These are the owning edges.
    pub children: Vec<NodeId>,
    /// The node immediately following this one among its parent's children.
    pub next_sibling: Option<NodeId>,
    /// The node immediately preceding this one among its parent's children.
    pub prev_sibling: Option<NodeId>,
}

/// HTML tag names that can never have children.
///
/// These elements are not pushed onto the builder's open-element stack and
/// serialize without a closing tag.
pub const VOID_ELEMENTS: [&str; 19] = [
    "area", "base", "basefont", "br", "col", "command", "embed", "frame", "hr", "img", "input",
    "isindex", "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Returns true if the (lowercase) tag name is in the fixed self-closing set.
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(&tag_name)
}

/// Arena-based document tree.
///
/// All nodes live in a contiguous vector indexed by [`NodeId`]. The document
/// node is always at index 0; the single root element (canonically `html`)
/// is its first element child.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    /// Doctype name captured from the source, if any (e.g. `html`).
    pub doctype: Option<String>,
}

impl Document {
    /// Create a new tree containing just the document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            kind: NodeKind::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
            doctype: None,
        }
    }

    /// The document node's ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes in the arena (including detached ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty. A freshly created tree always
    /// contains the document node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID. The node starts detached.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// Append `child` as the last child of `parent`, updating sibling links.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Detach a node from its parent.
    ///
    /// The node's subtree is untouched; only the parent's child list and the
    /// surrounding sibling links change. Detached nodes stay in the arena
    /// and remain addressable by ID.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        let prev = self.nodes[id.0].prev_sibling;
        let next = self.nodes[id.0].next_sibling;

        self.nodes[parent.0].children.retain(|&c| c != id);
        if let Some(p) = prev {
            self.nodes[p.0].next_sibling = next;
        }
        if let Some(n) = next {
            self.nodes[n.0].prev_sibling = prev;
        }
        self.nodes[id.0].parent = None;
        self.nodes[id.0].prev_sibling = None;
        self.nodes[id.0].next_sibling = None;
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Get the next sibling that is an element, skipping text and comment
    /// nodes.
    #[must_use]
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(sib) = current {
            if self.as_element(sib).is_some() {
                return Some(sib);
            }
            current = self.next_sibling(sib);
        }
        None
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings, from immediately before back to the
    /// first child.
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// Iterate over all descendants of a node in document (pre-order)
    /// order. The node itself is not included.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        DescendantIterator { tree: self, stack }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.kind {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Look up an attribute on an element by case-insensitive name.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.as_element(id).and_then(|e| e.attrs.get(name))
    }

    /// Set an attribute on an element. The name is case-folded; an existing
    /// attribute with the same folded name is overwritten.
    ///
    /// Does nothing if `id` is not an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.as_element_mut(id) {
            element.attrs.set(name, value);
        }
    }

    /// Remove an attribute from an element, returning its previous value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        self.as_element_mut(id).and_then(|e| e.attrs.remove(name))
    }

    /// Concatenated text of this node and its descendants, in document
    /// order. CDATA sections contribute their content; comments do not.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Text(s) | NodeKind::Cdata(s)) => out.push_str(s),
            Some(NodeKind::Comment(_)) | None => {}
            Some(NodeKind::Document | NodeKind::Element(_)) => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// The single root element of the document (canonically `html`), if one
    /// exists.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// The first `body` (or `frameset`) child of the root element, if any.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id)
                    .is_some_and(|e| e.tag_name == "body" || e.tag_name == "frameset")
            })
            .copied()
    }

    /// Serialize the whole document back to a markup string.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        if let Some(doctype) = &self.doctype {
            let _ = write!(out, "<!DOCTYPE {doctype}>");
        }
        for &child in self.children(NodeId::ROOT) {
            self.serialize_node(child, &mut out);
        }
        out
    }

    /// Serialize a single node (and its subtree) to a markup string.
    #[must_use]
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(id, &mut out);
        out
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Document => {
                for &child in &node.children {
                    self.serialize_node(child, out);
                }
            }
            NodeKind::Element(data) => {
                let _ = write!(out, "<{}", data.tag_name);
                for attr in &data.attrs {
                    let _ = write!(out, " {}=\"{}\"", attr.name, escape_attribute(&attr.value));
                }
                out.push('>');
                if is_void_element(&data.tag_name) {
                    return;
                }
                for &child in &node.children {
                    self.serialize_node(child, out);
                }
                let _ = write!(out, "</{}>", data.tag_name);
            }
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Comment(data) => {
                let _ = write!(out, "<!--{data}-->");
            }
            NodeKind::Cdata(data) => {
                let _ = write!(out, "<![CDATA[{data}]]>");
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text content for markup output.
#[must_use]
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for markup output.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a Document,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a Document,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// Pre-order iterator over the descendants of a node.
pub struct DescendantIterator<'a> {
    tree: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let children = self.tree.children(id);
        for &child in children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}
