//! Character references: the named-entity table plus escaping helpers.
//!
//! Text nodes and attribute values are stored unescaped. Named references
//! come from a table of the most common entities; numeric references
//! (`&#233;`, `&#xE9;`) are decoded directly. Anything unrecognized is left
//! in the text literally.

use std::collections::HashMap;
use std::sync::LazyLock;

use wren_common::warning::warn_once;

pub use wren_dom::{escape_attribute, escape_text};

/// The named character reference table.
/// Maps entity names (without the leading '&') to their replacement strings.
///
/// Entities are matched WITH the trailing semicolon when present, but a few
/// legacy entities also work without it (e.g. `&amp` matches like `&amp;`).
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
        // Common punctuation and symbols
        ("copy;", "\u{00A9}"),   // ©
        ("reg;", "\u{00AE}"),    // ®
        ("trade;", "\u{2122}"),  // ™
        ("mdash;", "\u{2014}"),  // —
        ("ndash;", "\u{2013}"),  // –
        ("hellip;", "\u{2026}"), // …
        ("bull;", "\u{2022}"),   // •
        ("middot;", "\u{00B7}"), // ·
        ("lsquo;", "\u{2018}"),  // '
        ("rsquo;", "\u{2019}"),  // '
        ("ldquo;", "\u{201C}"),  // "
        ("rdquo;", "\u{201D}"),  // "
        ("laquo;", "\u{00AB}"),  // «
        ("raquo;", "\u{00BB}"),  // »
        // Currency
        ("cent;", "\u{00A2}"),  // ¢
        ("pound;", "\u{00A3}"), // £
        ("euro;", "\u{20AC}"),  // €
        ("yen;", "\u{00A5}"),   // ¥
        // Math symbols
        ("times;", "\u{00D7}"),  // ×
        ("divide;", "\u{00F7}"), // ÷
        ("plusmn;", "\u{00B1}"), // ±
        ("ne;", "\u{2260}"),     // ≠
        ("le;", "\u{2264}"),     // ≤
        ("ge;", "\u{2265}"),     // ≥
        ("deg;", "\u{00B0}"),    // °
        ("frac12;", "\u{00BD}"), // ½
        ("frac14;", "\u{00BC}"), // ¼
        ("frac34;", "\u{00BE}"), // ¾
        // Arrows
        ("larr;", "\u{2190}"), // ←
        ("rarr;", "\u{2192}"), // →
        ("uarr;", "\u{2191}"), // ↑
        ("darr;", "\u{2193}"), // ↓
        // Greek letters (commonly used)
        ("alpha;", "\u{03B1}"),
        ("beta;", "\u{03B2}"),
        ("gamma;", "\u{03B3}"),
        ("delta;", "\u{03B4}"),
        ("pi;", "\u{03C0}"),
        ("sigma;", "\u{03C3}"),
        ("omega;", "\u{03C9}"),
        // Accented characters (common)
        ("Agrave;", "\u{00C0}"),
        ("Aacute;", "\u{00C1}"),
        ("Acirc;", "\u{00C2}"),
        ("Atilde;", "\u{00C3}"),
        ("Auml;", "\u{00C4}"),
        ("agrave;", "\u{00E0}"),
        ("aacute;", "\u{00E1}"),
        ("acirc;", "\u{00E2}"),
        ("atilde;", "\u{00E3}"),
        ("auml;", "\u{00E4}"),
        ("Egrave;", "\u{00C8}"),
        ("Eacute;", "\u{00C9}"),
        ("egrave;", "\u{00E8}"),
        ("eacute;", "\u{00E9}"),
        ("Igrave;", "\u{00CC}"),
        ("Iacute;", "\u{00CD}"),
        ("igrave;", "\u{00EC}"),
        ("iacute;", "\u{00ED}"),
        ("Ograve;", "\u{00D2}"),
        ("Oacute;", "\u{00D3}"),
        ("ograve;", "\u{00F2}"),
        ("oacute;", "\u{00F3}"),
        ("Ugrave;", "\u{00D9}"),
        ("Uacute;", "\u{00DA}"),
        ("ugrave;", "\u{00F9}"),
        ("uacute;", "\u{00FA}"),
        ("ntilde;", "\u{00F1}"),
        ("Ntilde;", "\u{00D1}"),
        ("ccedil;", "\u{00E7}"),
        ("Ccedil;", "\u{00C7}"),
    ])
});

/// Longest entity name we bother scanning for.
const MAX_ENTITY_NAME: usize = 32;

/// Look up a named character reference.
///
/// The `name` should NOT include the leading '&'.
///
/// # Example
/// ```ignore
/// lookup_entity("amp;")  // Returns Some("&")
/// lookup_entity("amp")   // Returns Some("&") - legacy support
/// lookup_entity("xyz;")  // Returns None
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Decode a numeric reference body (`#233` or `#xE9`, without `&`/`;`).
///
/// Code points that are not valid scalar values (NUL, surrogates, beyond
/// U+10FFFF) become U+FFFD.
fn decode_numeric(digits: &str, hex: bool) -> char {
    let radix = if hex { 16 } else { 10 };
    u32::from_str_radix(digits, radix)
        .ok()
        .filter(|&cp| cp != 0)
        .and_then(char::from_u32)
        .unwrap_or('\u{FFFD}')
}

/// Try to decode the character reference at the start of `input`
/// (which begins with `&`). Returns the replacement and the number of bytes
/// consumed.
fn decode_reference(input: &str) -> Option<(String, usize)> {
    let body = &input[1..];

    if let Some(numeric) = body.strip_prefix('#') {
        let (hex, digits_start) = match numeric.as_bytes().first() {
            Some(b'x' | b'X') => (true, 1),
            _ => (false, 0),
        };
        let digits: &str = &numeric[digits_start..];
        let len = digits
            .bytes()
            .take_while(|b| if hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() })
            .count();
        if len == 0 {
            return None;
        }
        let c = decode_numeric(&digits[..len], hex);
        // '&' + '#' + optional 'x' + digits + optional ';'
        let mut consumed = 2 + digits_start + len;
        if digits[len..].starts_with(';') {
            consumed += 1;
        }
        return Some((c.to_string(), consumed));
    }

    let name_len = body
        .bytes()
        .take(MAX_ENTITY_NAME)
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if name_len == 0 {
        return None;
    }
    let name = &body[..name_len];
    if body[name_len..].starts_with(';')
        && let Some(value) = lookup_entity(&body[..=name_len])
    {
        return Some((value.to_string(), name_len + 2));
    }
    if let Some(value) = lookup_entity(name) {
        return Some((value.to_string(), name_len + 1));
    }
    warn_once("HTML", &format!("unknown character reference '&{name}'"));
    None
}

/// Resolve every character reference in `text`.
#[must_use]
pub fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        if let Some((decoded, consumed)) = decode_reference(rest) {
            out.push_str(&decoded);
            rest = &rest[consumed..];
        } else {
            out.push('&');
            rest = &rest[1..];
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_with_and_without_semicolon() {
        assert_eq!(unescape("a &amp; b"), "a & b");
        assert_eq!(unescape("a &amp b"), "a & b");
        assert_eq!(unescape("&lt;b&gt;"), "<b>");
        assert_eq!(unescape("caf&eacute;"), "caf\u{00E9}");
    }

    #[test]
    fn test_numeric() {
        assert_eq!(unescape("&#233;"), "\u{00E9}");
        assert_eq!(unescape("&#xE9;"), "\u{00E9}");
        assert_eq!(unescape("&#x41"), "A");
        assert_eq!(unescape("&#0;"), "\u{FFFD}");
        assert_eq!(unescape("&#xD800;"), "\u{FFFD}");
    }

    #[test]
    fn test_unknown_is_literal() {
        assert_eq!(unescape("&bogus; & &#;"), "&bogus; & &#;");
        assert_eq!(unescape("AT&T"), "AT&T");
    }

    #[test]
    fn test_escape_round_trip() {
        let raw = "if a < b && c > d";
        assert_eq!(unescape(&escape_text(raw)), raw);
        let attr = "say \"hi\"\n";
        assert_eq!(unescape(&escape_attribute(attr)), attr);
    }
}
