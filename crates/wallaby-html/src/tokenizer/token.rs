use strum_macros::Display;

/// The kind of a lexical unit emitted by the tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenKind {
    /// An opening tag: `<div`. Followed by zero or more [`TokenKind::Attribute`]
    /// tokens belonging to it.
    ElementOpen,
    /// A closing tag: `</div>`.
    ElementClose,
    /// A single attribute read inside an opening tag.
    Attribute,
    /// A run of character data between tags.
    Text,
    /// A comment, including conditional-comment blocks (`<![if ...]>`),
    /// which are treated identically to comments.
    Comment,
    /// A `<![CDATA[...]]>` section.
    Cdata,
    /// A `<!DOCTYPE ...>` declaration.
    Doctype,
    /// An `<?xml ...?>` declaration.
    XmlDeclaration,
}

/// One lexical unit of the source HTML.
///
/// Tokens are produced in strict left-to-right document order, are
/// immutable once created, and are consumed exactly once by the document
/// builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of unit this is.
    pub kind: TokenKind,
    /// Tag or attribute name, or the decoded text/comment body.
    pub primary: String,
    /// Attribute value, for [`TokenKind::Attribute`] tokens that carry one.
    /// `None` distinguishes a value-less attribute (`disabled`) from an
    /// empty one (`value=""`).
    pub secondary: Option<String>,
    /// The original source substring this token was read from. Used for
    /// verbatim content (`<textarea>`, `<pre>`) and diagnostics.
    pub raw: String,
}

impl Token {
    /// Create a token with no attribute value.
    #[must_use]
    pub const fn new(kind: TokenKind, primary: String, raw: String) -> Self {
        Self {
            kind,
            primary,
            secondary: None,
            raw,
        }
    }

    /// Create an attribute token with an optional value.
    #[must_use]
    pub const fn attribute(name: String, value: Option<String>, raw: String) -> Self {
        Self {
            kind: TokenKind::Attribute,
            primary: name,
            secondary: value,
            raw,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::ElementOpen => write!(f, "<{}>", self.primary),
            TokenKind::ElementClose => write!(f, "</{}>", self.primary),
            TokenKind::Attribute => match &self.secondary {
                Some(value) => write!(f, "{}=\"{value}\"", self.primary),
                None => write!(f, "{}", self.primary),
            },
            TokenKind::Text => write!(f, "Text({:?})", self.primary),
            TokenKind::Comment => write!(f, "<!--{}-->", self.primary),
            TokenKind::Cdata => write!(f, "<![CDATA[{}]]>", self.primary),
            TokenKind::Doctype => write!(f, "<!{}>", self.primary),
            TokenKind::XmlDeclaration => write!(f, "<?{}?>", self.primary),
        }
    }
}
