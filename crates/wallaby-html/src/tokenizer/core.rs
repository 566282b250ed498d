//! Marker-scanning tolerant tokenizer.
//!
//! The tokenizer walks a cursor over the input looking for the next
//! "interesting" marker (`<` followed by something it recognizes); any text
//! before the marker becomes a [`TokenKind::Text`] token. Ambiguous input -
//! an unterminated comment, a tag missing its `>` - is resolved by
//! best-effort heuristics (treat-to-end-of-string or treat-to-next-`>`),
//! never by an error. The worst case for garbage input is a token sequence
//! that does not match author intent; the tokenizer always terminates and
//! always consumes the entire input.

use super::entities::decode_entities;
use super::token::{Token, TokenKind};

/// What a `<` at the scan position introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    /// `<` followed by a letter.
    ElementOpen,
    /// `</` followed by a letter.
    ElementClose,
    /// `<!--`, or `<!` + whitespace + `--`.
    Comment,
    /// `<![CDATA[`.
    Cdata,
    /// `<![` not opening a CDATA section: a conditional-comment block such
    /// as `<![if ...]>` / `<![endif]>`.
    ConditionalComment,
    /// `<!` followed by anything else: a doctype-style declaration.
    Doctype,
    /// `<?xml`.
    XmlDeclaration,
}

/// The tolerant HTML tokenizer.
///
/// Produces the token stream consumed by the document builder. Created
/// per-input; call [`Tokenizer::run`] once, then [`Tokenizer::into_tokens`].
pub struct Tokenizer {
    input: String,
    pos: usize,
    collapse_whitespace: bool,
    tokens: Vec<Token>,
}

impl Tokenizer {
    /// Create a tokenizer for the given input.
    ///
    /// When `collapse_whitespace` is set, runs of whitespace in text tokens
    /// collapse to a single space in `primary`; `raw` always retains the
    /// original text.
    #[must_use]
    pub const fn new(input: String, collapse_whitespace: bool) -> Self {
        Self {
            input,
            pos: 0,
            collapse_whitespace,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire input.
    pub fn run(&mut self) {
        while self.pos < self.input.len() {
            match self.find_next_marker(self.pos) {
                Some((at, marker)) => {
                    self.emit_text(self.pos, at, true);
                    self.pos = at;
                    match marker {
                        Marker::ElementOpen => self.read_element_open(),
                        Marker::ElementClose => self.read_element_close(),
                        Marker::Comment => self.read_comment(),
                        Marker::Cdata => self.read_cdata(),
                        Marker::ConditionalComment => self.read_conditional_comment(),
                        Marker::Doctype => self.read_doctype(),
                        Marker::XmlDeclaration => self.read_xml_declaration(),
                    }
                }
                None => {
                    self.emit_text(self.pos, self.input.len(), true);
                    self.pos = self.input.len();
                }
            }
        }
    }

    /// Consume the tokenizer and return the token stream.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// The tokens produced so far.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Find the next `<` from `from` that introduces a recognized marker.
    /// A `<` that introduces nothing is plain text and is skipped over.
    fn find_next_marker(&self, from: usize) -> Option<(usize, Marker)> {
        let mut i = from;
        while let Some(rel) = self.input[i..].find('<') {
            let at = i + rel;
            if let Some(marker) = self.classify_marker(at) {
                return Some((at, marker));
            }
            i = at + 1;
        }
        None
    }

    /// Classify the marker introduced by the `<` at byte position `at`.
    fn classify_marker(&self, at: usize) -> Option<Marker> {
        let rest = &self.input.as_bytes()[at + 1..];
        match rest.first() {
            Some(b) if b.is_ascii_alphabetic() => Some(Marker::ElementOpen),
            Some(b'/') => rest
                .get(1)
                .filter(|b| b.is_ascii_alphabetic())
                .map(|_| Marker::ElementClose),
            Some(b'!') => {
                let decl = &rest[1..];
                if decl.starts_with(b"--") {
                    Some(Marker::Comment)
                } else if decl.starts_with(b"[CDATA[") {
                    Some(Marker::Cdata)
                } else if decl.starts_with(b"[") {
                    Some(Marker::ConditionalComment)
                } else {
                    // `<!` + optional whitespace + `--` still opens a comment.
                    let mut i = 0;
                    while decl.get(i).is_some_and(u8::is_ascii_whitespace) {
                        i += 1;
                    }
                    if i > 0 && decl[i..].starts_with(b"--") {
                        Some(Marker::Comment)
                    } else {
                        Some(Marker::Doctype)
                    }
                }
            }
            Some(b'?') => {
                if self.input[at + 2..]
                    .get(..3)
                    .is_some_and(|s| s.eq_ignore_ascii_case("xml"))
                {
                    Some(Marker::XmlDeclaration)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Emit the span `[start, end)` as a text token, if non-empty.
    ///
    /// `decode` is false for script raw text, which is stored as written.
    fn emit_text(&mut self, start: usize, end: usize, decode: bool) {
        if start >= end {
            return;
        }
        let raw = &self.input[start..end];
        let mut primary = if decode {
            decode_entities(raw)
        } else {
            raw.to_string()
        };
        if self.collapse_whitespace {
            primary = collapse_whitespace_runs(&primary);
        }
        self.tokens
            .push(Token::new(TokenKind::Text, primary, raw.to_string()));
    }

    /// Read a comment starting at the current `<`.
    ///
    /// Delimited by `-->` where possible; if no `-->` exists the comment is
    /// closed at the next `>` instead, so malformed comments degrade to
    /// whatever sits inside the nearest angle brackets.
    fn read_comment(&mut self) {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        // Skip `<!`, optional whitespace, then the opening `--`.
        let mut i = start + 2;
        while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        i += 2;
        let content_start = i.min(self.input.len());

        let (body_end, after) = match self.input[content_start..].find("-->") {
            Some(rel) => (content_start + rel, content_start + rel + 3),
            None => match self.input[content_start..].find('>') {
                Some(rel) => (content_start + rel, content_start + rel + 1),
                None => (self.input.len(), self.input.len()),
            },
        };

        let body = self.input[content_start..body_end].to_string();
        let raw = self.input[start..after].to_string();
        self.tokens.push(Token::new(TokenKind::Comment, body, raw));
        self.pos = after;
    }

    /// Read a `<![CDATA[ ... ]]>` section, falling back to the next `>`
    /// when unterminated.
    fn read_cdata(&mut self) {
        let start = self.pos;
        let content_start = (start + "<![CDATA[".len()).min(self.input.len());

        let (body_end, after) = match self.input[content_start..].find("]]>") {
            Some(rel) => (content_start + rel, content_start + rel + 3),
            None => match self.input[content_start..].find('>') {
                Some(rel) => (content_start + rel, content_start + rel + 1),
                None => (self.input.len(), self.input.len()),
            },
        };

        let body = self.input[content_start..body_end].to_string();
        let raw = self.input[start..after].to_string();
        self.tokens.push(Token::new(TokenKind::Cdata, body, raw));
        self.pos = after;
    }

    /// Read a conditional-comment block (`<![if ...]>`, `<![endif]>`).
    ///
    /// Treated identically to a comment, with `]>` as its terminator and
    /// the same next-`>` fallback.
    fn read_conditional_comment(&mut self) {
        let start = self.pos;
        let content_start = (start + "<![".len()).min(self.input.len());

        let (body_end, after) = match self.input[content_start..].find("]>") {
            Some(rel) => (content_start + rel, content_start + rel + 2),
            None => match self.input[content_start..].find('>') {
                Some(rel) => (content_start + rel, content_start + rel + 1),
                None => (self.input.len(), self.input.len()),
            },
        };

        let body = self.input[content_start..body_end].to_string();
        let raw = self.input[start..after].to_string();
        self.tokens.push(Token::new(TokenKind::Comment, body, raw));
        self.pos = after;
    }

    /// Read a `<! ... >` declaration (doctype or similar).
    fn read_doctype(&mut self) {
        let start = self.pos;
        let content_start = (start + 2).min(self.input.len());

        let (body_end, after) = match self.input[content_start..].find('>') {
            Some(rel) => (content_start + rel, content_start + rel + 1),
            None => (self.input.len(), self.input.len()),
        };

        let body = self.input[content_start..body_end].trim().to_string();
        let raw = self.input[start..after].to_string();
        self.tokens.push(Token::new(TokenKind::Doctype, body, raw));
        self.pos = after;
    }

    /// Read an `<?xml ... ?>` declaration.
    fn read_xml_declaration(&mut self) {
        let start = self.pos;
        let content_start = (start + 2).min(self.input.len());

        let (body_end, after) = match self.input[content_start..].find("?>") {
            Some(rel) => (content_start + rel, content_start + rel + 2),
            None => match self.input[content_start..].find('>') {
                Some(rel) => (content_start + rel, content_start + rel + 1),
                None => (self.input.len(), self.input.len()),
            },
        };

        let body = self.input[content_start..body_end].trim().to_string();
        let raw = self.input[start..after].to_string();
        self.tokens
            .push(Token::new(TokenKind::XmlDeclaration, body, raw));
        self.pos = after;
    }

    /// Read an opening tag: name, attributes, and one of the three
    /// terminators (`>`, `/>`, or an errant `<` that recovers from a
    /// missing `>`).
    fn read_element_open(&mut self) {
        let start = self.pos;
        let bytes = self.input.as_bytes();
        let name_start = start + 1;
        let mut i = name_start;
        while bytes.get(i).is_some_and(|&b| is_tag_name_byte(b)) {
            i += 1;
        }
        let name = self.input[name_start..i].to_string();

        let mut attributes: Vec<Token> = Vec::new();
        loop {
            while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
                i += 1;
            }
            match bytes.get(i).copied() {
                None => break,
                Some(b'>') => {
                    i += 1;
                    break;
                }
                // An errant `<` ends the tag read without being consumed,
                // recovering from a missing `>`.
                Some(b'<') => break,
                Some(b'/') => {
                    if bytes.get(i + 1) == Some(&b'>') {
                        i += 2;
                        break;
                    }
                    // Stray slash between attributes.
                    i += 1;
                }
                Some(_) => {
                    if let Some((token, next)) = self.read_attribute(i) {
                        attributes.push(token);
                        i = next;
                    } else {
                        i += 1;
                    }
                }
            }
        }

        let raw = self.input[start..i].to_string();
        self.tokens
            .push(Token::new(TokenKind::ElementOpen, name.clone(), raw));
        self.tokens.append(&mut attributes);
        self.pos = i;

        if name.eq_ignore_ascii_case("script") {
            self.read_script_content();
        }
    }

    /// Try to read one attribute at byte position `i`.
    ///
    /// `name`, optionally followed by `=` and a quoted-or-bare value; bare
    /// values terminate at whitespace or `<`/`>`. Returns the token and the
    /// position after the attribute.
    fn read_attribute(&self, i: usize) -> Option<(Token, usize)> {
        let bytes = self.input.as_bytes();
        let name_start = i;
        let mut j = i;
        while bytes
            .get(j)
            .is_some_and(|&b| !b.is_ascii_whitespace() && !matches!(b, b'=' | b'/' | b'<' | b'>'))
        {
            j += 1;
        }
        if j == name_start {
            return None;
        }
        let name = self.input[name_start..j].to_string();

        let mut k = j;
        while bytes.get(k).is_some_and(u8::is_ascii_whitespace) {
            k += 1;
        }
        if bytes.get(k) != Some(&b'=') {
            // Value-less attribute; whitespace we skipped belongs to the
            // next attribute scan.
            let raw = self.input[name_start..j].to_string();
            return Some((Token::attribute(name, None, raw), j));
        }
        k += 1;
        while bytes.get(k).is_some_and(u8::is_ascii_whitespace) {
            k += 1;
        }

        let (value, end) = match bytes.get(k) {
            Some(&q @ (b'"' | b'\'')) => {
                let value_start = k + 1;
                match self.input[value_start..].find(q as char) {
                    Some(rel) => (
                        self.input[value_start..value_start + rel].to_string(),
                        value_start + rel + 1,
                    ),
                    // Unterminated quote: value runs to end of input.
                    None => (self.input[value_start..].to_string(), self.input.len()),
                }
            }
            _ => {
                let value_start = k;
                let mut v = k;
                while bytes
                    .get(v)
                    .is_some_and(|&b| !b.is_ascii_whitespace() && b != b'<' && b != b'>')
                {
                    v += 1;
                }
                (self.input[value_start..v].to_string(), v)
            }
        };

        let raw = self.input[name_start..end].to_string();
        Some((Token::attribute(name, Some(decode_entities(&value)), raw), end))
    }

    /// Read a closing tag: `</name ...>`.
    ///
    /// If the captured name contains an embedded `<` (a symptom of a tag
    /// improperly closed inside another, e.g. `</strong</td>`), the name is
    /// truncated there and the cursor only advances past the truncated
    /// portion, leaving the remainder to be re-tokenized.
    fn read_element_close(&mut self) {
        let start = self.pos;
        let content_start = start + 2;
        let segment_end = self.input[content_start..]
            .find('>')
            .map_or(self.input.len(), |rel| content_start + rel);
        let segment = &self.input[content_start..segment_end];

        if let Some(k) = segment.find('<') {
            let name = first_word(&segment[..k]).to_string();
            let raw = self.input[start..content_start + k].to_string();
            self.tokens
                .push(Token::new(TokenKind::ElementClose, name, raw));
            self.pos = content_start + k;
        } else {
            let name = first_word(segment).to_string();
            let after = (segment_end + 1).min(self.input.len());
            let raw = self.input[start..after].to_string();
            self.tokens
                .push(Token::new(TokenKind::ElementClose, name, raw));
            self.pos = if segment_end < self.input.len() {
                segment_end + 1
            } else {
                self.input.len()
            };
        }
    }

    /// Raw-text mode for `<script>` bodies.
    ///
    /// Content is not re-tokenized as markup until a literal `</script`
    /// (case-insensitive) or a comment start is seen, so `<`/`>` characters
    /// inside script bodies are not misread as tags.
    fn read_script_content(&mut self) {
        loop {
            let rest = &self.input[self.pos..];
            let lower = rest.to_ascii_lowercase();
            let close = lower.find("</script");
            let comment = rest.find("<!--");

            match (close, comment) {
                (Some(c), Some(m)) if m < c => {
                    self.emit_text(self.pos, self.pos + m, false);
                    self.pos += m;
                    self.read_comment();
                }
                (Some(c), _) => {
                    self.emit_text(self.pos, self.pos + c, false);
                    self.pos += c;
                    return;
                }
                (None, Some(m)) => {
                    self.emit_text(self.pos, self.pos + m, false);
                    self.pos += m;
                    self.read_comment();
                }
                (None, None) => {
                    self.emit_text(self.pos, self.input.len(), false);
                    self.pos = self.input.len();
                    return;
                }
            }
        }
    }
}

/// Bytes allowed in a tag name. Letters and digits per the grammar, plus
/// the punctuation real-world markup puts in names: namespace colons
/// (`<o:p>`), custom-element hyphens, and underscores.
const fn is_tag_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b':' | b'-' | b'_')
}

/// First whitespace-delimited word of a close-tag body (anything after the
/// name is discarded).
fn first_word(s: &str) -> &str {
    s.split_ascii_whitespace().next().unwrap_or("")
}

/// Collapse runs of ASCII whitespace to a single space.
fn collapse_whitespace_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
