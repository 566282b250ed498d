//! Root-normalization post-pass.
//!
//! A light pass that guarantees the canonical single-root invariant: after
//! cleaning, the document has exactly one root element named `html`.
//! Documents that already satisfy the invariant pass through untouched, so
//! cleaning is idempotent.

use wallaby_dom::{Document, ElementData, NodeKind};

/// Normalize the document root to a canonical `html` element.
///
/// If the root element is not (case-insensitively) `html`, it is replaced
/// with a fresh empty `html` element; the old root is detached and
/// discarded. A document with no root element at all gains an empty one.
///
/// Trees produced by the document builder always have an `html` root, so
/// for them this is a no-op; the pass exists as a defensive normalization
/// for trees assembled by other means.
pub fn clean(tree: &mut Document) {
    if let Some(root) = tree.document_element() {
        // Tag names are stored lowercase, so direct equality is the
        // case-insensitive comparison.
        if tree.as_element(root).is_some_and(|e| e.tag_name == "html") {
            return;
        }
        tree.detach(root);
    }
    let root = tree.root();
    let html = tree.alloc(NodeKind::Element(ElementData::new("html")));
    tree.append_child(root, html);
}
