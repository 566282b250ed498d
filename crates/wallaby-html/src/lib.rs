//! Tolerant HTML tokenizer and document builder for the Wallaby browser.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tokenizer** - converts arbitrary, possibly malformed HTML into a flat
//!   stream of structural tokens. Never fails: unterminated constructs are
//!   resolved by documented fallback heuristics.
//! - **Document Builder** - assembles the token stream into a single-rooted,
//!   strictly-nested element tree, recovering from mismatched and unclosed
//!   tags.
//! - **Document Cleaner** - normalizes the root to a canonical `html`
//!   element.
//!
//! # Not Implemented
//!
//! This is deliberately not the WHATWG parsing algorithm: there are no
//! insertion modes, no adoption agency algorithm, no foster parenting, and
//! no script execution. Mis-nested tags like `<b><i>text</b></i>` are
//! recovered by popping the open-element stack until the named tag has been
//! closed, which implicitly closes everything opened inside it. Consumers
//! that need spec-exact tree construction for hostile markup should treat
//! that divergence as documented behavior, not a defect.

/// Document builder and cleaner.
pub mod builder;
/// Tokenizer for converting input into tokens.
pub mod tokenizer;

pub use builder::{DocumentBuilder, clean};
pub use tokenizer::{Token, TokenKind, Tokenizer};

use wallaby_dom::Document;

/// Configuration for a parse run.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Collapse runs of whitespace in text content to a single space.
    ///
    /// This is a presentation normalization: the token `raw` field always
    /// retains the original text, and content under `textarea` (and `pre`,
    /// when collapsing is enabled) is stored verbatim in the tree.
    pub collapse_whitespace: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
        }
    }
}

/// Parse an HTML string into a document tree.
///
/// This is the main entry point: tokenize, build, clean. It accepts any
/// input - including empty strings and non-HTML text - and always produces
/// a tree with a single `html` root element.
#[must_use]
pub fn parse_document(html: &str, options: &ParseOptions) -> Document {
    let mut tokenizer = Tokenizer::new(html.to_string(), options.collapse_whitespace);
    tokenizer.run();
    let builder = DocumentBuilder::new(tokenizer.into_tokens(), options.clone());
    let mut tree = builder.run();
    clean(&mut tree);
    tree
}
