//! Property tests for the tolerant-parsing contract: any input - including
//! hostile garbage - tokenizes and builds without panicking, and the result
//! always satisfies the single-root invariant.

use quickcheck_macros::quickcheck;
use wallaby_html::{ParseOptions, Tokenizer, parse_document};

#[quickcheck]
fn tokenizer_never_panics_and_terminates(input: String) -> bool {
    let mut tokenizer = Tokenizer::new(input, true);
    tokenizer.run();
    true
}

#[quickcheck]
fn tokenizer_output_is_bounded_by_input(input: String) -> bool {
    let len = input.len();
    let mut tokenizer = Tokenizer::new(input, false);
    tokenizer.run();
    // Raw spans are substrings of the input; their total length can never
    // exceed it plus the token count (attribute raws overlap their tag's).
    tokenizer
        .tokens()
        .iter()
        .all(|token| token.raw.len() <= len)
}

#[quickcheck]
fn parse_always_yields_a_single_html_root(input: String) -> bool {
    let tree = parse_document(&input, &ParseOptions::default());
    let Some(root) = tree.document_element() else {
        return false;
    };
    tree.as_element(root).is_some_and(|e| e.tag_name == "html")
}

#[quickcheck]
fn preserving_whitespace_mode_never_panics(input: String) -> bool {
    let _ = parse_document(
        &input,
        &ParseOptions {
            collapse_whitespace: false,
        },
    );
    true
}

/// Angle-bracket-heavy inputs exercise the recovery paths harder than
/// uniformly random strings do.
#[quickcheck]
fn hostile_bracket_soup_never_panics(fragments: Vec<u8>) -> bool {
    let pieces = [
        "<", ">", "</", "<!--", "-->", "<![CDATA[", "]]>", "<![if", "]>", "<script>", "</script>",
        "<div", "=\"", "'", "x", " ",
    ];
    let soup: String = fragments
        .iter()
        .map(|&b| pieces[usize::from(b) % pieces.len()])
        .collect();
    let _ = parse_document(&soup, &ParseOptions::default());
    true
}
