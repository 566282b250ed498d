//! Integration tests for the arena document tree.

use wallaby_dom::{AttributeList, Document, ElementData, NodeId, NodeKind};

/// Helper to build an element node under a parent.
fn add_element(tree: &mut Document, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.alloc(NodeKind::Element(ElementData::new(tag)));
    tree.append_child(parent, id);
    id
}

fn add_text(tree: &mut Document, parent: NodeId, text: &str) -> NodeId {
    let id = tree.alloc(NodeKind::Text(text.to_string()));
    tree.append_child(parent, id);
    id
}

#[test]
fn test_attribute_case_insensitive_round_trip() {
    let mut attrs = AttributeList::new();
    attrs.set("Class", "container");

    // Reading back under any casing yields the same value.
    assert_eq!(attrs.get("class"), Some("container"));
    assert_eq!(attrs.get("CLASS"), Some("container"));
    assert_eq!(attrs.get("Class"), Some("container"));

    // Setting under a different casing overwrites rather than duplicating.
    attrs.set("CLASS", "wide");
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs.get("class"), Some("wide"));
}

#[test]
fn test_attribute_insertion_order_preserved() {
    let mut attrs = AttributeList::new();
    attrs.set("href", "/x");
    attrs.set("Title", "t");
    attrs.set("class", "c");

    let names: Vec<&str> = attrs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["href", "title", "class"]);
}

#[test]
fn test_insert_if_absent_first_wins() {
    let mut attrs = AttributeList::new();
    assert!(attrs.insert_if_absent("class", "first"));
    assert!(!attrs.insert_if_absent("CLASS", "second"));
    assert_eq!(attrs.get("class"), Some("first"));
}

#[test]
fn test_append_child_maintains_sibling_links() {
    let mut tree = Document::new();
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let a = add_element(&mut tree, root, "a");
    let b = add_element(&mut tree, root, "b");
    let c = add_element(&mut tree, root, "c");

    assert_eq!(tree.first_child(root), Some(a));
    assert_eq!(tree.last_child(root), Some(c));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.parent(b), Some(root));
}

#[test]
fn test_detach_leaves_subtree_intact() {
    let mut tree = Document::new();
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let a = add_element(&mut tree, root, "a");
    let b = add_element(&mut tree, root, "b");
    let c = add_element(&mut tree, root, "c");
    let grandchild = add_element(&mut tree, b, "span");

    tree.detach(b);

    // Parent's child list and sibling links are repaired.
    assert_eq!(tree.children(root), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));

    // The detached node keeps its own children: removal never requires
    // updating the subtree.
    assert_eq!(tree.parent(b), None);
    assert_eq!(tree.children(b), &[grandchild]);
    assert_eq!(tree.parent(grandchild), Some(b));
}

#[test]
fn test_descendants_pre_order() {
    let mut tree = Document::new();
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let body = add_element(&mut tree, root, "body");
    let div = add_element(&mut tree, body, "div");
    let span = add_element(&mut tree, div, "span");
    let p = add_element(&mut tree, body, "p");

    let order: Vec<NodeId> = tree.descendants(root).collect();
    assert_eq!(order, vec![body, div, span, p]);
}

#[test]
fn test_ancestors_walk_to_root() {
    let mut tree = Document::new();
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let body = add_element(&mut tree, root, "body");
    let div = add_element(&mut tree, body, "div");

    let chain: Vec<NodeId> = tree.ancestors(div).collect();
    assert_eq!(chain, vec![body, root, NodeId::ROOT]);
    assert!(tree.is_descendant_of(div, root));
    assert!(!tree.is_descendant_of(root, div));
}

#[test]
fn test_next_element_sibling_skips_text() {
    let mut tree = Document::new();
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let a = add_element(&mut tree, root, "a");
    let _ = add_text(&mut tree, root, "between");
    let b = add_element(&mut tree, root, "b");

    assert_eq!(tree.next_element_sibling(a), Some(b));
    assert_eq!(tree.next_element_sibling(b), None);
}

#[test]
fn test_text_content_concatenates_in_order() {
    let mut tree = Document::new();
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let p = add_element(&mut tree, root, "p");
    let _ = add_text(&mut tree, p, "Hello ");
    let em = add_element(&mut tree, p, "em");
    let _ = add_text(&mut tree, em, "world");

    assert_eq!(tree.text_content(p), "Hello world");
}

#[test]
fn test_serialization_round_trip_shape() {
    let mut tree = Document::new();
    tree.doctype = Some("html".to_string());
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let body = add_element(&mut tree, root, "body");
    let a = add_element(&mut tree, body, "a");
    tree.set_attribute(a, "href", "/x?a=1&b=2");
    let _ = add_text(&mut tree, a, "a < b");
    let _ = add_element(&mut tree, body, "br");

    assert_eq!(
        tree.to_html(),
        "<!DOCTYPE html><html><body><a href=\"/x?a=1&amp;b=2\">a &lt; b</a><br></body></html>"
    );
}

#[test]
fn test_void_elements_serialize_without_close_tag() {
    let mut tree = Document::new();
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let _ = add_element(&mut tree, root, "hr");

    assert_eq!(tree.to_html(), "<html><hr></html>");
    assert!(wallaby_dom::is_void_element("br"));
    assert!(!wallaby_dom::is_void_element("div"));
}

#[test]
fn test_document_element_and_body() {
    let mut tree = Document::new();
    let comment = tree.alloc(NodeKind::Comment(" leading ".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let root = add_element(&mut tree, NodeId::ROOT, "html");
    let _head = add_element(&mut tree, root, "head");
    let body = add_element(&mut tree, root, "body");

    assert_eq!(tree.document_element(), Some(root));
    assert_eq!(tree.body(), Some(body));
}
