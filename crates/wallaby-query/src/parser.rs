//! Selector parser and recognizer catalog.
//!
//! The parser walks a cursor over the trimmed query string and, at each
//! position, asks a static catalog of recognizers - one per selector type -
//! which of them matches a prefix. The longest match wins; catalog order
//! breaks ties, and the descendant (bare whitespace) recognizer sits last
//! so that more specific combinators like `>` surrounded by whitespace are
//! preferred over plain whitespace when both could match.
//!
//! The catalog is an explicit static table rather than any kind of runtime
//! discovery, so the priority rule is visible in one place.

use crate::error::{QueryError, QueryErrorKind};
use crate::ops::{AttributeOp, SelectorOp};

/// Outcome of one recognizer at one position.
enum Recognition {
    /// This recognizer does not apply here.
    NoMatch,
    /// Matched a prefix of the given byte length.
    Match(usize, SelectorOp),
    /// The prefix is recognizably this selector type but malformed; carry
    /// the positioned error so parsing fails with a precise diagnostic
    /// instead of a generic "unrecognized" one.
    Malformed {
        /// Byte offset of the problem relative to the recognizer's start.
        offset: usize,
        /// Byte length of the offending span.
        length: usize,
        /// The classification to report.
        kind: QueryErrorKind,
    },
}

type Recognizer = fn(&str) -> Recognition;

/// The recognizer catalog in priority order. Descendant is deliberately
/// last: it only wins when no other recognizer matches at least as much.
const CATALOG: [Recognizer; 9] = [
    recognize_all,
    recognize_id,
    recognize_class,
    recognize_element,
    recognize_attribute,
    recognize_comma,
    recognize_child,
    recognize_adjacent_sibling,
    recognize_descendant,
];

/// Parse a query string into an ordered operation list.
///
/// A query that trims to the empty string parses to zero operations,
/// which is valid (it matches the implicit starting set unchanged).
///
/// # Errors
///
/// Returns a [`QueryError`] when a position matches no recognizer, an
/// attribute selector is malformed, or the query starts or ends with a
/// transpose operation.
pub fn parse_query(query: &str) -> Result<Vec<SelectorOp>, QueryError> {
    let trimmed = query.trim();
    // Character offsets in errors are relative to the original string.
    let leading = query.len() - query.trim_start().len();

    let mut ops = Vec::new();
    let mut pos = 0;

    while pos < trimmed.len() {
        let rest = &trimmed[pos..];
        let mut best: Option<(usize, SelectorOp)> = None;
        let mut malformed: Option<(usize, usize, QueryErrorKind)> = None;

        for recognize in CATALOG {
            match recognize(rest) {
                Recognition::Match(len, op) => {
                    if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
                        best = Some((len, op));
                    }
                }
                Recognition::Malformed {
                    offset,
                    length,
                    kind,
                } => {
                    if malformed.is_none() {
                        malformed = Some((pos + offset, length, kind));
                    }
                }
                Recognition::NoMatch => {}
            }
        }

        match (best, malformed) {
            (Some((len, op)), _) => {
                ops.push(op);
                pos += len;
            }
            (None, Some((offset, length, kind))) => {
                return Err(positioned_error(query, leading + offset, length, kind));
            }
            (None, None) => {
                return Err(positioned_error(
                    query,
                    leading + pos,
                    1,
                    QueryErrorKind::UnrecognizedSelector,
                ));
            }
        }
    }

    // A valid parsed query never starts or ends with a transpose.
    if ops.first().is_some_and(SelectorOp::is_transpose) {
        return Err(positioned_error(
            query,
            leading,
            1,
            QueryErrorKind::LeadingTranspose,
        ));
    }
    if ops.last().is_some_and(SelectorOp::is_transpose) {
        return Err(positioned_error(
            query,
            leading + trimmed.len().saturating_sub(1),
            1,
            QueryErrorKind::TrailingTranspose,
        ));
    }

    Ok(ops)
}

/// Build a [`QueryError`] converting the byte offset to a character offset.
fn positioned_error(
    query: &str,
    byte_offset: usize,
    length: usize,
    kind: QueryErrorKind,
) -> QueryError {
    let mut clamped = byte_offset.min(query.len());
    while !query.is_char_boundary(clamped) {
        clamped -= 1;
    }
    let offset = query[..clamped].chars().count();
    QueryError::new(query.to_string(), offset, length, kind)
}

/// Characters allowed in selector identifiers (tag names, ids, classes,
/// attribute names).
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_')
}

/// Length of the identifier prefix of `s`, in bytes.
fn ident_len(s: &str) -> usize {
    s.chars()
        .take_while(|&c| is_ident_char(c))
        .map(char::len_utf8)
        .sum()
}

/// `*` - the "all" selector.
fn recognize_all(rest: &str) -> Recognition {
    if rest.starts_with('*') {
        Recognition::Match(1, SelectorOp::All)
    } else {
        Recognition::NoMatch
    }
}

/// `#name` - id selector.
fn recognize_id(rest: &str) -> Recognition {
    let Some(after) = rest.strip_prefix('#') else {
        return Recognition::NoMatch;
    };
    let len = ident_len(after);
    if len == 0 {
        return Recognition::NoMatch;
    }
    Recognition::Match(1 + len, SelectorOp::Id(after[..len].to_string()))
}

/// `.name` - class selector.
fn recognize_class(rest: &str) -> Recognition {
    let Some(after) = rest.strip_prefix('.') else {
        return Recognition::NoMatch;
    };
    let len = ident_len(after);
    if len == 0 {
        return Recognition::NoMatch;
    }
    Recognition::Match(1 + len, SelectorOp::Class(after[..len].to_string()))
}

/// `tagname` - element selector. Tag names are folded to lowercase so
/// matching against the tree is direct equality.
fn recognize_element(rest: &str) -> Recognition {
    if !rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Recognition::NoMatch;
    }
    let len = ident_len(rest);
    Recognition::Match(len, SelectorOp::Element(rest[..len].to_ascii_lowercase()))
}

/// `[name op value]` - attribute selector.
fn recognize_attribute(rest: &str) -> Recognition {
    let Some(inner) = rest.strip_prefix('[') else {
        return Recognition::NoMatch;
    };

    // Name.
    let ws = leading_whitespace(inner);
    let name_start = 1 + ws;
    let name_len = ident_len(&inner[ws..]);
    if name_len == 0 {
        return Recognition::Malformed {
            offset: name_start,
            length: 1,
            kind: QueryErrorKind::MalformedAttributeSelector,
        };
    }
    let name = inner[ws..ws + name_len].to_string();

    let mut i = ws + name_len;
    i += leading_whitespace(&inner[i..]);

    // Existence test: `[name]`.
    if inner[i..].starts_with(']') {
        return Recognition::Match(
            1 + i + 1,
            SelectorOp::Attribute {
                name,
                op: AttributeOp::Exists,
                value: String::new(),
            },
        );
    }

    // Comparison operator.
    let (op, op_len) = if inner[i..].starts_with('=') {
        (AttributeOp::Equals, 1)
    } else if inner[i..].starts_with("!=") {
        (AttributeOp::NotEquals, 2)
    } else if inner[i..].starts_with("~=") {
        (AttributeOp::Includes, 2)
    } else if inner[i..].starts_with("|=") {
        (AttributeOp::DashMatch, 2)
    } else if inner[i..].starts_with("^=") {
        (AttributeOp::Prefix, 2)
    } else if inner[i..].starts_with("$=") {
        (AttributeOp::Suffix, 2)
    } else if inner[i..].starts_with("*=") {
        (AttributeOp::Substring, 2)
    } else {
        // Fail fast at parse time on an unrecognized comparison operator.
        let length = inner[i..].find(|c: char| c == '=' || c == ']').map_or(1, |n| n + 1);
        return Recognition::Malformed {
            offset: 1 + i,
            length,
            kind: QueryErrorKind::InvalidAttributeOperator,
        };
    };
    i += op_len;

    // Value runs to the closing bracket; surrounding quotes are stripped
    // only when the first and last characters are an identical quote.
    let Some(close) = inner[i..].find(']') else {
        return Recognition::Malformed {
            offset: 0,
            length: rest.chars().count(),
            kind: QueryErrorKind::MalformedAttributeSelector,
        };
    };
    let value = strip_matching_quotes(inner[i..i + close].trim()).to_string();

    Recognition::Match(
        1 + i + close + 1,
        SelectorOp::Attribute { name, op, value },
    )
}

/// `,` (with surrounding whitespace) - union.
fn recognize_comma(rest: &str) -> Recognition {
    recognize_spaced_symbol(rest, ',', SelectorOp::Union)
}

/// `>` (with surrounding whitespace) - direct child.
fn recognize_child(rest: &str) -> Recognition {
    recognize_spaced_symbol(rest, '>', SelectorOp::Child)
}

/// `+` (with surrounding whitespace) - adjacent sibling.
fn recognize_adjacent_sibling(rest: &str) -> Recognition {
    recognize_spaced_symbol(rest, '+', SelectorOp::AdjacentSibling)
}

/// Bare whitespace - descendant. Lowest priority in the catalog: a spaced
/// `>`/`+`/`,` always produces a longer match and wins.
fn recognize_descendant(rest: &str) -> Recognition {
    let len = leading_whitespace(rest);
    if len == 0 {
        Recognition::NoMatch
    } else {
        Recognition::Match(len, SelectorOp::Descendant)
    }
}

/// Match optional whitespace, `symbol`, optional whitespace.
fn recognize_spaced_symbol(rest: &str, symbol: char, op: SelectorOp) -> Recognition {
    let ws = leading_whitespace(rest);
    if !rest[ws..].starts_with(symbol) {
        return Recognition::NoMatch;
    }
    let after = ws + symbol.len_utf8();
    let trailing = leading_whitespace(&rest[after..]);
    Recognition::Match(after + trailing, op)
}

/// Length of the leading ASCII-whitespace run, in bytes.
fn leading_whitespace(s: &str) -> usize {
    s.len() - s.trim_start_matches(|c: char| c.is_ascii_whitespace()).len()
}

/// Strip surrounding quotes only when the first and last characters are an
/// identical quote character.
fn strip_matching_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first @ ('"' | '\'')), Some(last)) if first == last && value.len() >= 2 => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}
