//! HTML character reference (entity) decoding.
//!
//! Text content and attribute values are entity-decoded before storage in
//! the tree. The full HTML standard defines 2,231 named entities; this
//! table carries the common ones plus the legacy no-semicolon forms, and
//! numeric references (`&#60;`, `&#x3C;`) are decoded in full.

use std::collections::HashMap;
use std::sync::LazyLock;

/// The named character reference table.
/// Maps entity names (without the leading `&`) to their replacement strings.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Most common entities (required for basic HTML)
        ("amp;", "&"),
        ("amp", "&"), // Legacy (no semicolon)
        ("lt;", "<"),
        ("lt", "<"), // Legacy
        ("gt;", ">"),
        ("gt", ">"), // Legacy
        ("quot;", "\""),
        ("quot", "\""), // Legacy
        ("apos;", "'"),
        ("nbsp;", "\u{00A0}"),
        ("nbsp", "\u{00A0}"), // Legacy
        // Common punctuation and symbols
        ("copy;", "\u{00A9}"),   // ©
        ("reg;", "\u{00AE}"),    // ®
        ("trade;", "\u{2122}"),  // ™
        ("sect;", "\u{00A7}"),   // §
        ("para;", "\u{00B6}"),   // ¶
        ("mdash;", "\u{2014}"),  // —
        ("ndash;", "\u{2013}"),  // –
        ("hellip;", "\u{2026}"), // …
        ("bull;", "\u{2022}"),   // •
        ("middot;", "\u{00B7}"), // ·
        ("lsquo;", "\u{2018}"),
        ("rsquo;", "\u{2019}"),
        ("ldquo;", "\u{201C}"),
        ("rdquo;", "\u{201D}"),
        ("laquo;", "\u{00AB}"),  // «
        ("raquo;", "\u{00BB}"),  // »
        // Currency
        ("cent;", "\u{00A2}"),
        ("pound;", "\u{00A3}"),
        ("euro;", "\u{20AC}"),
        ("yen;", "\u{00A5}"),
        // Math symbols
        ("times;", "\u{00D7}"),
        ("divide;", "\u{00F7}"),
        ("plusmn;", "\u{00B1}"),
        ("ne;", "\u{2260}"),
        ("le;", "\u{2264}"),
        ("ge;", "\u{2265}"),
        ("deg;", "\u{00B0}"),
        ("frac12;", "\u{00BD}"),
        ("frac14;", "\u{00BC}"),
        ("frac34;", "\u{00BE}"),
        // Arrows
        ("larr;", "\u{2190}"),
        ("rarr;", "\u{2192}"),
        ("uarr;", "\u{2191}"),
        ("darr;", "\u{2193}"),
    ])
});

/// Look up a named character reference.
///
/// Returns the replacement string if found. The `name` should NOT include
/// the leading `&` but should include the trailing `;` when present in the
/// source (legacy entities also match without it).
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Decode all character references in a string.
///
/// Unknown or malformed references are left as literal text; decoding never
/// fails. This runs over text content and attribute values before they are
/// stored in the tree.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'&' {
            let ch = input[i..].chars().next().unwrap_or('\u{FFFD}');
            out.push(ch);
            i += ch.len_utf8();
            continue;
        }

        match decode_reference(&input[i..]) {
            Some((replacement, consumed)) => {
                out.push_str(&replacement);
                i += consumed;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }

    out
}

/// Try to decode a single reference starting at `&`.
///
/// Returns the replacement text and the number of source bytes consumed
/// (including the `&`).
fn decode_reference(input: &str) -> Option<(String, usize)> {
    let rest = input.strip_prefix('&')?;

    if let Some(numeric) = rest.strip_prefix('#') {
        return decode_numeric(numeric).map(|(s, n)| (s, n + 2));
    }

    // Collect a candidate name: alphanumerics plus an optional trailing
    // semicolon. Entity names are short; cap the scan.
    let mut name_len = 0;
    for (idx, c) in rest.char_indices().take(32) {
        if c.is_ascii_alphanumeric() {
            name_len = idx + c.len_utf8();
        } else {
            break;
        }
    }
    if name_len == 0 {
        return None;
    }

    let has_semicolon = rest[name_len..].starts_with(';');
    if has_semicolon {
        let with_semi = &rest[..=name_len];
        if let Some(replacement) = lookup_entity(with_semi) {
            return Some((replacement.to_string(), 1 + name_len + 1));
        }
    }
    // Legacy form without the semicolon.
    lookup_entity(&rest[..name_len]).map(|replacement| (replacement.to_string(), 1 + name_len))
}

/// Decode a numeric reference body (the part after `&#`).
///
/// Returns the replacement and the number of bytes consumed after `&#`.
fn decode_numeric(body: &str) -> Option<(String, usize)> {
    let (digits_start, radix) = if body.starts_with('x') || body.starts_with('X') {
        (1, 16)
    } else {
        (0, 10)
    };

    let digits: String = body[digits_start..]
        .chars()
        .take_while(|c| c.is_digit(radix))
        .collect();
    if digits.is_empty() {
        return None;
    }

    let mut consumed = digits_start + digits.len();
    if body[consumed..].starts_with(';') {
        consumed += 1;
    }

    let code = u32::from_str_radix(&digits, radix).ok()?;
    let ch = char::from_u32(code).unwrap_or('\u{FFFD}');
    Some((ch.to_string(), consumed))
}

#[cfg(test)]
mod tests {
    use super::decode_entities;

    #[test]
    fn decodes_common_named_entities() {
        assert_eq!(decode_entities("a &amp; b &lt;c&gt;"), "a & b <c>");
    }

    #[test]
    fn decodes_legacy_form_without_semicolon() {
        assert_eq!(decode_entities("fish &amp chips"), "fish & chips");
    }

    #[test]
    fn decodes_numeric_references() {
        assert_eq!(decode_entities("&#60;&#x3E;"), "<>");
    }

    #[test]
    fn leaves_unknown_references_alone() {
        assert_eq!(decode_entities("&unknown; &"), "&unknown; &");
    }
}
