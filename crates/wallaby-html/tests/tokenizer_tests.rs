//! Integration tests for the tolerant tokenizer.

use wallaby_html::{Token, TokenKind, Tokenizer};

/// Tokenize with whitespace collapsing on (the default parse mode).
fn tokenize(html: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(html.to_string(), true);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// Tokenize preserving whitespace.
fn tokenize_raw(html: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(html.to_string(), false);
    tokenizer.run();
    tokenizer.into_tokens()
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

#[test]
fn test_text_and_elements() {
    let tokens = tokenize("hello <b>world</b>");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::Text,
            TokenKind::ElementOpen,
            TokenKind::Text,
            TokenKind::ElementClose,
        ]
    );
    assert_eq!(tokens[0].primary, "hello ");
    assert_eq!(tokens[1].primary, "b");
    assert_eq!(tokens[2].primary, "world");
    assert_eq!(tokens[3].primary, "b");
}

#[test]
fn test_attributes_follow_their_element_open() {
    let tokens = tokenize(r#"<a href="/x" disabled target=_blank>"#);
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::ElementOpen,
            TokenKind::Attribute,
            TokenKind::Attribute,
            TokenKind::Attribute,
        ]
    );
    assert_eq!(tokens[1].primary, "href");
    assert_eq!(tokens[1].secondary.as_deref(), Some("/x"));
    // Value-less attribute: None, not empty string.
    assert_eq!(tokens[2].primary, "disabled");
    assert_eq!(tokens[2].secondary, None);
    // Bare value terminates at the closing angle bracket.
    assert_eq!(tokens[3].secondary.as_deref(), Some("_blank"));
}

#[test]
fn test_attribute_values_are_entity_decoded() {
    let tokens = tokenize(r#"<a title="a&amp;b &lt;c&gt;">"#);
    assert_eq!(tokens[1].secondary.as_deref(), Some("a&b <c>"));
}

#[test]
fn test_text_is_entity_decoded_raw_is_not() {
    let tokens = tokenize_raw("x &amp; y");
    assert_eq!(tokens[0].primary, "x & y");
    assert_eq!(tokens[0].raw, "x &amp; y");
}

#[test]
fn test_whitespace_collapses_in_primary_not_raw() {
    let tokens = tokenize("a \n\t  b");
    assert_eq!(tokens[0].primary, "a b");
    assert_eq!(tokens[0].raw, "a \n\t  b");
}

#[test]
fn test_comment_with_embedded_angle_bracket() {
    let tokens = tokenize("<!-- a > b --><p>");
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].primary, " a > b ");
    assert_eq!(tokens[1].kind, TokenKind::ElementOpen);
}

#[test]
fn test_unterminated_comment_falls_back_to_next_gt() {
    // No `-->` anywhere: the comment closes at the nearest `>` instead.
    let tokens = tokenize("<!-- broken > after");
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].primary, " broken ");
    assert_eq!(tokens[1].kind, TokenKind::Text);
    assert_eq!(tokens[1].primary, " after");
}

#[test]
fn test_unterminated_comment_runs_to_end_of_input() {
    let tokens = tokenize("<!-- never closed");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].primary, " never closed");
}

#[test]
fn test_comment_with_space_before_dashes() {
    let tokens = tokenize("<! -- spaced -->");
    assert_eq!(tokens[0].kind, TokenKind::Comment);
    assert_eq!(tokens[0].primary, " spaced ");
}

#[test]
fn test_cdata_section() {
    let tokens = tokenize("<![CDATA[x < y && y > z]]>");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Cdata);
    assert_eq!(tokens[0].primary, "x < y && y > z");
}

#[test]
fn test_unterminated_cdata_falls_back() {
    let tokens = tokenize("<![CDATA[oops > rest");
    assert_eq!(tokens[0].kind, TokenKind::Cdata);
    assert_eq!(tokens[0].primary, "oops ");
}

#[test]
fn test_conditional_comment_is_a_comment() {
    let tokens = tokenize("<![if lt IE 9]>old<![endif]>");
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::Comment, TokenKind::Text, TokenKind::Comment]
    );
    assert_eq!(tokens[0].primary, "if lt IE 9");
    assert_eq!(tokens[2].primary, "endif");
}

#[test]
fn test_doctype_declaration() {
    let tokens = tokenize("<!DOCTYPE html><p>");
    assert_eq!(tokens[0].kind, TokenKind::Doctype);
    assert_eq!(tokens[0].primary, "DOCTYPE html");
}

#[test]
fn test_xml_declaration() {
    let tokens = tokenize(r#"<?xml version="1.0" encoding="utf-8"?><html>"#);
    assert_eq!(tokens[0].kind, TokenKind::XmlDeclaration);
    assert_eq!(tokens[0].primary, r#"xml version="1.0" encoding="utf-8""#);
    assert_eq!(tokens[1].kind, TokenKind::ElementOpen);
}

#[test]
fn test_script_content_is_not_retokenized() {
    let tokens = tokenize_raw(r#"<script>if (a < b) { d.write("</div>"); }</script>"#);
    assert_eq!(
        kinds(&tokens),
        vec![TokenKind::ElementOpen, TokenKind::Text, TokenKind::ElementClose]
    );
    // The `<` and `</div>` inside the script body never became tags.
    assert_eq!(tokens[1].primary, r#"if (a < b) { d.write("</div>"); }"#);
    assert_eq!(tokens[2].primary, "script");
}

#[test]
fn test_script_close_tag_is_case_insensitive() {
    let tokens = tokenize_raw("<script>x < 1</SCRIPT>after");
    assert_eq!(tokens[1].primary, "x < 1");
    assert_eq!(tokens[2].kind, TokenKind::ElementClose);
    assert_eq!(tokens[3].primary, "after");
}

#[test]
fn test_unterminated_script_runs_to_end() {
    let tokens = tokenize_raw("<script>var x = 1;");
    assert_eq!(kinds(&tokens), vec![TokenKind::ElementOpen, TokenKind::Text]);
    assert_eq!(tokens[1].primary, "var x = 1;");
}

#[test]
fn test_broken_close_tag_is_truncated_and_resumed() {
    // `</strong</td>` closes strong, then the remainder is re-tokenized.
    let tokens = tokenize("<td><strong>text</strong</td>");
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::ElementOpen,
            TokenKind::ElementOpen,
            TokenKind::Text,
            TokenKind::ElementClose,
            TokenKind::ElementClose,
        ]
    );
    assert_eq!(tokens[3].primary, "strong");
    assert_eq!(tokens[4].primary, "td");
}

#[test]
fn test_errant_lt_ends_tag_read() {
    // Missing `>` on the div: the `<p` recovers as its own tag.
    let tokens = tokenize(r#"<div class="a" <p>text"#);
    assert_eq!(
        kinds(&tokens),
        vec![
            TokenKind::ElementOpen,
            TokenKind::Attribute,
            TokenKind::ElementOpen,
            TokenKind::Text,
        ]
    );
    assert_eq!(tokens[0].primary, "div");
    assert_eq!(tokens[2].primary, "p");
}

#[test]
fn test_lone_lt_is_text() {
    let tokens = tokenize("1 < 2 and 3 > 2");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Text);
    assert_eq!(tokens[0].primary, "1 < 2 and 3 > 2");
}

#[test]
fn test_close_tag_discards_trailing_junk() {
    let tokens = tokenize("</div id=x>rest");
    assert_eq!(tokens[0].kind, TokenKind::ElementClose);
    assert_eq!(tokens[0].primary, "div");
    assert_eq!(tokens[1].primary, "rest");
}

#[test]
fn test_empty_input_yields_no_tokens() {
    assert!(tokenize("").is_empty());
}

#[test]
fn test_self_close_marker_ends_tag_read() {
    let tokens = tokenize("<br/>after");
    assert_eq!(tokens[0].kind, TokenKind::ElementOpen);
    assert_eq!(tokens[0].primary, "br");
    assert_eq!(tokens[1].primary, "after");
}

#[test]
fn test_unterminated_quoted_value_runs_to_end() {
    let tokens = tokenize(r#"<a href="/never closed"#);
    assert_eq!(tokens[1].primary, "href");
    assert_eq!(tokens[1].secondary.as_deref(), Some("/never closed"));
}
