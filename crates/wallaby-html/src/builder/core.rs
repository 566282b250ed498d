//! Stack-based document builder.
//!
//! Assembles the token sequence into a single-rooted element tree. The
//! builder never fails: a stray close tag is ignored, an unclosed element
//! stays open until end of input and is then implicitly closed, and
//! mis-nested tags are recovered by popping the open-element stack until
//! the named tag has been popped. That last rule deliberately diverges from
//! the WHATWG adoption agency algorithm; see the crate-level docs.

use wallaby_common::warning::warn_once;
use wallaby_dom::{Document, ElementData, NodeKind, NodeId, is_void_element};

use crate::ParseOptions;
use crate::tokenizer::{Token, TokenKind};

/// Builds a [`Document`] from a token stream.
pub struct DocumentBuilder {
    tree: Document,
    /// The root `html` element, always present under the document node.
    root_element: NodeId,
    /// Stack of currently-open elements, innermost last. The root element
    /// sits at the bottom; when it is closed the stack may empty, in which
    /// case new content still attaches to the root.
    stack: Vec<NodeId>,
    tokens: Vec<Token>,
    index: usize,
    options: ParseOptions,
}

impl DocumentBuilder {
    /// Create a builder over a complete token sequence.
    #[must_use]
    pub fn new(tokens: Vec<Token>, options: ParseOptions) -> Self {
        let mut tree = Document::new();
        let root_element = tree.alloc(NodeKind::Element(ElementData::new("html")));
        tree.append_child(tree.root(), root_element);
        Self {
            tree,
            root_element,
            stack: vec![root_element],
            tokens,
            index: 0,
            options,
        }
    }

    /// Consume every token and return the assembled tree.
    ///
    /// Structurally incomplete input never fails; any elements still open
    /// at end of input are implicitly closed.
    #[must_use]
    pub fn run(mut self) -> Document {
        while self.index < self.tokens.len() {
            let token = self.tokens[self.index].clone();
            self.index += 1;
            match token.kind {
                TokenKind::ElementOpen => self.handle_element_open(&token),
                TokenKind::ElementClose => self.handle_element_close(&token),
                TokenKind::Text => self.handle_text(token),
                TokenKind::Comment => self.append_leaf(NodeKind::Comment(token.primary)),
                TokenKind::Cdata => self.append_leaf(NodeKind::Cdata(token.primary)),
                TokenKind::Doctype => self.handle_doctype(&token),
                // XML declarations carry no tree content; stray attribute
                // tokens (ones not following an ElementOpen) are dropped.
                TokenKind::XmlDeclaration | TokenKind::Attribute => {}
            }
        }
        self.tree
    }

    /// The element new children attach to: top of the stack, or the root
    /// element once everything has been closed.
    fn current_parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(self.root_element)
    }

    /// Consume the attribute tokens immediately following an `ElementOpen`.
    fn take_attributes(&mut self) -> Vec<(String, Option<String>)> {
        let mut attrs = Vec::new();
        while let Some(token) = self.tokens.get(self.index) {
            if token.kind != TokenKind::Attribute {
                break;
            }
            attrs.push((token.primary.clone(), token.secondary.clone()));
            self.index += 1;
        }
        attrs
    }

    /// Attach sanitized attributes to an element, first occurrence winning
    /// on duplicate (case-folded) names.
    fn attach_attributes(&mut self, id: NodeId, attrs: Vec<(String, Option<String>)>) {
        for (raw_name, value) in attrs {
            match sanitize_attribute_name(&raw_name) {
                Some(name) => {
                    if let Some(element) = self.tree.as_element_mut(id) {
                        let _ = element
                            .attrs
                            .insert_if_absent(&name, value.as_deref().unwrap_or(""));
                    }
                }
                None => {
                    warn_once("HTML", &format!("dropped attribute with invalid name {raw_name:?}"));
                }
            }
        }
    }

    fn handle_element_open(&mut self, token: &Token) {
        let name = sanitize_tag_name(&token.primary);
        let attrs = self.take_attributes();
        if name.is_empty() {
            return;
        }

        // A repeated `<html>` never creates a second root: the existing
        // root element absorbs it (and its attributes).
        if name == "html" {
            self.attach_attributes(self.root_element, attrs);
            if self.stack.is_empty() {
                self.stack.push(self.root_element);
            }
            return;
        }

        let id = self.tree.alloc(NodeKind::Element(ElementData::new(&name)));
        self.attach_attributes(id, attrs);
        self.tree.append_child(self.current_parent(), id);

        // Self-closing tag names cannot have children and are never pushed.
        if !is_void_element(&name) {
            self.stack.push(id);
        }
    }

    fn handle_element_close(&mut self, token: &Token) {
        let name = sanitize_tag_name(&token.primary);
        if name.is_empty() {
            return;
        }
        // Pop until the matching frame has been popped, implicitly closing
        // anything opened inside it. A close tag matching nothing on the
        // stack is silently ignored.
        if let Some(position) = self.stack.iter().rposition(|&id| {
            self.tree
                .as_element(id)
                .is_some_and(|e| e.tag_name == name)
        }) {
            self.stack.truncate(position);
        }
    }

    fn handle_text(&mut self, token: Token) {
        let parent = self.current_parent();
        let parent_tag = self.tree.as_element(parent).map(|e| e.tag_name.as_str());
        // Textarea content is significant verbatim; pre keeps its verbatim
        // form too when whitespace collapsing is active.
        let verbatim = match parent_tag {
            Some("textarea") => true,
            Some("pre") => self.options.collapse_whitespace,
            _ => false,
        };
        let content = if verbatim { token.raw } else { token.primary };
        self.append_leaf(NodeKind::Text(content));
    }

    fn handle_doctype(&mut self, token: &Token) {
        // `DOCTYPE html PUBLIC "..."` → `html`. Only the first doctype
        // seen seeds the document.
        if self.tree.doctype.is_some() {
            return;
        }
        let body = token.primary.trim();
        let rest = if body
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("doctype"))
        {
            &body[7..]
        } else {
            body
        };
        if let Some(name) = rest.split_ascii_whitespace().next() {
            self.tree.doctype = Some(name.to_ascii_lowercase());
        }
    }

    fn append_leaf(&mut self, kind: NodeKind) {
        let parent = self.current_parent();
        let id = self.tree.alloc(kind);
        self.tree.append_child(parent, id);
    }
}

/// Sanitize a tag name: strip any namespace prefix by taking the text after
/// the last `:`, then lowercase.
fn sanitize_tag_name(name: &str) -> String {
    let local = name.rsplit(':').next().unwrap_or(name);
    local.to_ascii_lowercase()
}

/// Sanitize an attribute name.
///
/// Lowercased; a bare `xmlns` gets a trailing `_` (avoiding a collision
/// with reserved namespace semantics) and other `:` characters become `_`.
/// Names that do not then match the identifier pattern (letter/underscore
/// start, then letters/digits/underscore/hyphen/dot) are rejected.
fn sanitize_attribute_name(name: &str) -> Option<String> {
    let lowered = name.to_ascii_lowercase();
    let sanitized = if lowered == "xmlns" {
        "xmlns_".to_string()
    } else {
        lowered.replace(':', "_")
    };

    let mut chars = sanitized.chars();
    let first_valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    if first_valid && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')) {
        Some(sanitized)
    } else {
        None
    }
}
