//! Selector operation model.
//!
//! A parsed query is an ordered list of operations over a working set of
//! elements. Filters narrow the set in place; transposes move it to a
//! different set of nodes (descendants, children, siblings) or, for the
//! comma union, snapshot it and start a fresh sub-pipeline. Operations are
//! constructed once per query string, executed once, and hold no mutable
//! state beyond their match parameters.

use wallaby_dom::{Document, ElementData, NodeId};

/// Comparison operator inside an attribute selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    /// `[name]` - the attribute exists.
    Exists,
    /// `[name=value]` - exact match.
    Equals,
    /// `[name!=value]` - value differs, or the attribute is absent.
    NotEquals,
    /// `[name~=value]` - one of the whitespace-delimited words matches.
    Includes,
    /// `[name|=value]` - exact match or delimiter-bounded prefix, for
    /// language-tag-style values (`en` matches `en-US` but not `enx`).
    DashMatch,
    /// `[name^=value]` - prefix match.
    Prefix,
    /// `[name$=value]` - suffix match.
    Suffix,
    /// `[name*=value]` - substring match.
    Substring,
}

/// A single step in a parsed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorOp {
    /// `*` - matches every element.
    All,
    /// `#name` - id match, case-insensitive. Deliberately does not assume
    /// id uniqueness: malformed documents can repeat an id, and every
    /// carrier is returned.
    Id(String),
    /// `.name` - class-membership match.
    Class(String),
    /// `tagname` - element name match (names are compared lowercase).
    Element(String),
    /// `[name op value]` - attribute match.
    Attribute {
        /// Attribute name, matched case-insensitively.
        name: String,
        /// The comparison to apply.
        op: AttributeOp,
        /// Right-hand value; empty for [`AttributeOp::Exists`].
        value: String,
    },
    /// Whitespace combinator: move to all descendants.
    Descendant,
    /// `>` combinator: move to direct children.
    Child,
    /// `+` combinator: move to the immediately following element sibling.
    AdjacentSibling,
    /// `,` - finalize the current sub-pipeline and start a fresh one.
    Union,
}

impl SelectorOp {
    /// Returns true for operations that change which set of nodes is being
    /// considered, as opposed to filters that narrow within the current
    /// set. A valid query never starts or ends with one of these.
    #[must_use]
    pub const fn is_transpose(&self) -> bool {
        matches!(
            self,
            Self::Descendant | Self::Child | Self::AdjacentSibling | Self::Union
        )
    }

    /// Apply this operation as a filter predicate against one element.
    ///
    /// Transpose operations never match; the engine handles them before
    /// filtering.
    #[must_use]
    pub fn matches(&self, tree: &Document, id: NodeId) -> bool {
        let Some(element) = tree.as_element(id) else {
            return false;
        };
        match self {
            Self::All => true,
            Self::Id(value) => element
                .id()
                .is_some_and(|id_value| id_value.eq_ignore_ascii_case(value)),
            Self::Class(value) => element.classes().contains(value.as_str()),
            Self::Element(name) => element.tag_name == *name,
            Self::Attribute { name, op, value } => attribute_matches(element, name, *op, value),
            Self::Descendant | Self::Child | Self::AdjacentSibling | Self::Union => false,
        }
    }
}

/// Evaluate an attribute comparison against an element.
fn attribute_matches(element: &ElementData, name: &str, op: AttributeOp, value: &str) -> bool {
    let actual = element.attrs.get(name);
    match op {
        AttributeOp::Exists => actual.is_some(),
        AttributeOp::Equals => actual == Some(value),
        // Not-equal-or-absent: an element without the attribute matches.
        AttributeOp::NotEquals => actual != Some(value),
        AttributeOp::Includes => {
            actual.is_some_and(|v| v.split_ascii_whitespace().any(|word| word == value))
        }
        // Exact, or a prefix bounded by a non-alphanumeric delimiter: the
        // hyphen of language-tag values (`en-US`), but also the `:` of
        // `[href|=http]` against `http://...`. A plain substring prefix
        // (`httpx`) does not match.
        AttributeOp::DashMatch => actual.is_some_and(|v| {
            v == value
                || v.strip_prefix(value).is_some_and(|rest| {
                    rest.chars().next().is_some_and(|c| !c.is_ascii_alphanumeric())
                })
        }),
        AttributeOp::Prefix => actual.is_some_and(|v| v.starts_with(value)),
        AttributeOp::Suffix => actual.is_some_and(|v| v.ends_with(value)),
        AttributeOp::Substring => actual.is_some_and(|v| v.contains(value)),
    }
}
