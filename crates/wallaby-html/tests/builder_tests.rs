//! Integration tests for the document builder and cleaner.

use wallaby_dom::{Document, ElementData, NodeId, NodeKind, VOID_ELEMENTS};
use wallaby_html::{ParseOptions, clean, parse_document};

fn parse(html: &str) -> Document {
    parse_document(html, &ParseOptions::default())
}

/// Helper to get the first element with a tag name, depth-first.
fn find_element(tree: &Document, from: NodeId, tag: &str) -> Option<NodeId> {
    if tree.as_element(from).is_some_and(|e| e.tag_name == tag) {
        return Some(from);
    }
    for &child in tree.children(from) {
        if let Some(found) = find_element(tree, child, tag) {
            return Some(found);
        }
    }
    None
}

fn count_elements(tree: &Document, tag: &str) -> usize {
    tree.descendants(tree.root())
        .filter(|&id| tree.as_element(id).is_some_and(|e| e.tag_name == tag))
        .count()
}

#[test]
fn test_single_html_root() {
    let tree = parse("<html><body>hi</body></html>");
    let root = tree.document_element().expect("root element");
    assert_eq!(tree.as_element(root).unwrap().tag_name, "html");
    assert_eq!(count_elements(&tree, "html"), 1);
}

#[test]
fn test_unmatched_close_tag_tolerance() {
    // No </span>: span is implicitly closed when div closes.
    let tree = parse("<div><span>text</div>");
    let div = find_element(&tree, tree.root(), "div").expect("div");
    let span = find_element(&tree, div, "span").expect("span inside div");
    assert_eq!(tree.text_content(span), "text");

    // And the div really did close: nothing after it nests inside.
    let tree = parse("<div><span>text</div><p>after</p>");
    let p = find_element(&tree, tree.root(), "p").expect("p");
    let div = find_element(&tree, tree.root(), "div").unwrap();
    assert!(!tree.is_descendant_of(p, div));
}

#[test]
fn test_stray_close_tag_is_ignored() {
    let tree = parse("<div></span>text</div>");
    let div = find_element(&tree, tree.root(), "div").expect("div");
    assert_eq!(tree.text_content(div), "text");
}

#[test]
fn test_mis_nested_tags_pop_until_match() {
    // Closing b implicitly closes i; the trailing </i> is then stray.
    let tree = parse("<b><i>text</b></i>");
    let b = find_element(&tree, tree.root(), "b").expect("b");
    let i = find_element(&tree, b, "i").expect("i inside b");
    assert_eq!(tree.text_content(i), "text");
}

#[test]
fn test_self_closing_set_never_has_children() {
    // Even when the source nests content "inside" them.
    for tag in VOID_ELEMENTS {
        let html = format!("<body><{tag}>trapped</{tag}></body>");
        let tree = parse(&html);
        let id = find_element(&tree, tree.root(), tag)
            .unwrap_or_else(|| panic!("expected <{tag}> element"));
        assert!(
            tree.children(id).is_empty(),
            "<{tag}> must never have children"
        );
    }
}

#[test]
fn test_unclosed_elements_close_at_end_of_input() {
    let tree = parse("<div><p>one<p>two");
    // Both paragraphs exist even though nothing was ever closed.
    assert_eq!(count_elements(&tree, "p"), 2);
}

#[test]
fn test_repeated_html_tags_merge_onto_root() {
    let tree = parse(r#"<html lang="en"><html class="x"><body>hi</body></html>"#);
    assert_eq!(count_elements(&tree, "html"), 1);
    let root = tree.document_element().unwrap();
    assert_eq!(tree.get_attribute(root, "lang"), Some("en"));
    assert_eq!(tree.get_attribute(root, "class"), Some("x"));
}

#[test]
fn test_namespace_prefix_is_stripped_from_tags() {
    let tree = parse("<o:p>word</o:p>");
    let p = find_element(&tree, tree.root(), "p").expect("p");
    assert_eq!(tree.text_content(p), "word");
}

#[test]
fn test_attribute_sanitization() {
    let tree = parse(r#"<div XML:LANG="en" xmlns="urn:x" 1bad="y">x</div>"#);
    let div = find_element(&tree, tree.root(), "div").expect("div");
    assert_eq!(tree.get_attribute(div, "xml_lang"), Some("en"));
    assert_eq!(tree.get_attribute(div, "xmlns_"), Some("urn:x"));
    // Invalid identifier names are silently dropped.
    assert_eq!(tree.as_element(div).unwrap().attrs.len(), 2);
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let tree = parse(r#"<div class="a" CLASS="b">x</div>"#);
    let div = find_element(&tree, tree.root(), "div").expect("div");
    assert_eq!(tree.get_attribute(div, "class"), Some("a"));
}

#[test]
fn test_textarea_content_is_verbatim() {
    let tree = parse("<body><textarea>  two\n   lines &amp; raw  </textarea></body>");
    let textarea = find_element(&tree, tree.root(), "textarea").expect("textarea");
    // Unnormalized and undecoded: exactly what the source contained.
    assert_eq!(
        tree.text_content(textarea),
        "  two\n   lines &amp; raw  "
    );
}

#[test]
fn test_pre_content_is_verbatim_when_collapsing() {
    let tree = parse("<body><pre>  col1   col2\n  a      b</pre></body>");
    let pre = find_element(&tree, tree.root(), "pre").expect("pre");
    assert_eq!(tree.text_content(pre), "  col1   col2\n  a      b");
}

#[test]
fn test_ordinary_text_is_collapsed() {
    let tree = parse("<p>a \n\t  b</p>");
    let p = find_element(&tree, tree.root(), "p").expect("p");
    assert_eq!(tree.text_content(p), "a b");
}

#[test]
fn test_comment_and_cdata_children() {
    let tree = parse("<div><!-- note --><![CDATA[data]]></div>");
    let div = find_element(&tree, tree.root(), "div").expect("div");
    let children = tree.children(div);
    assert_eq!(children.len(), 2);
    assert!(matches!(
        &tree.get(children[0]).unwrap().kind,
        NodeKind::Comment(data) if data == " note "
    ));
    assert!(matches!(
        &tree.get(children[1]).unwrap().kind,
        NodeKind::Cdata(data) if data == "data"
    ));
}

#[test]
fn test_doctype_seeds_the_document() {
    let tree = parse("<!DOCTYPE HTML><html><body></body></html>");
    assert_eq!(tree.doctype.as_deref(), Some("html"));
}

#[test]
fn test_script_body_produces_no_elements() {
    let tree = parse(r#"<body><script>var s = "<div>";</script></body>"#);
    assert_eq!(count_elements(&tree, "div"), 0);
    let script = find_element(&tree, tree.root(), "script").expect("script");
    assert_eq!(tree.text_content(script), r#"var s = "<div>";"#);
}

#[test]
fn test_empty_and_non_html_input_still_build() {
    let tree = parse("");
    assert!(tree.document_element().is_some());

    let tree = parse("just some plain text");
    let root = tree.document_element().unwrap();
    assert_eq!(tree.text_content(root), "just some plain text");
}

#[test]
fn test_cleaning_is_idempotent_on_canonical_documents() {
    let mut tree = parse("<html><body>x</body></html>");
    let root_before = tree.document_element().unwrap();
    let count_before = tree.len();

    clean(&mut tree);

    assert_eq!(tree.document_element(), Some(root_before));
    assert_eq!(tree.len(), count_before);
}

#[test]
fn test_cleaning_replaces_a_non_html_root() {
    let mut tree = Document::new();
    let bogus = tree.alloc(NodeKind::Element(ElementData::new("widget")));
    let root = tree.root();
    tree.append_child(root, bogus);

    clean(&mut tree);

    let new_root = tree.document_element().expect("fresh root");
    assert_ne!(new_root, bogus);
    assert_eq!(tree.as_element(new_root).unwrap().tag_name, "html");
    assert!(tree.children(new_root).is_empty());
}

#[test]
fn test_cleaning_gives_an_empty_document_a_root() {
    let mut tree = Document::new();
    clean(&mut tree);
    let root = tree.document_element().expect("created root");
    assert_eq!(tree.as_element(root).unwrap().tag_name, "html");
}
