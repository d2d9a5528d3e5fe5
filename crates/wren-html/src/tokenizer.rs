//! Markup tokenizer.
//!
//! [`scan_tag`] reads a single tag starting at a `<` in one forward pass,
//! tracking quote state, the tag-name boundary and attribute name/value
//! boundaries. It never fails: malformed input produces an empty or partial
//! name and attribute list, and the caller decides whether the result is a
//! real element.

use wren_dom::Attribute;

use crate::entities::unescape;

/// The result of scanning one tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScannedTag {
    /// Number of bytes consumed, including the final `>` when present.
    pub consumed: usize,
    /// Tag name as written; may be empty for malformed input.
    pub name: String,
    /// Attributes in source order, duplicates preserved.
    pub attributes: Vec<Attribute>,
    /// `</name>` form.
    pub is_closing: bool,
    /// `<name/>` form.
    pub is_self_closing: bool,
}

/// Characters that end a tag name.
const fn ends_tag_name(c: char) -> bool {
    c.is_whitespace() || matches!(c, '<' | '>' | '/' | '&' | '"' | '\'' | '\\' | '=')
}

/// Where the scanner is inside the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    /// Before the first non-whitespace character.
    BeforeName,
    /// Inside the tag name.
    Name,
    /// Between attributes.
    BetweenAttributes,
    /// Inside an attribute name.
    AttributeName,
    /// After `=`, before the value's first character.
    BeforeValue,
    /// Inside an unquoted value.
    UnquotedValue,
    /// Inside a value quoted with the given character.
    QuotedValue(char),
}

/// Attribute under construction.
#[derive(Default)]
struct PendingAttribute {
    name: String,
    value: String,
}

struct TagScanner {
    tag: ScannedTag,
    region: Region,
    pending: Option<PendingAttribute>,
    escaped: bool,
}

impl TagScanner {
    fn finish_attribute(&mut self) {
        if let Some(attr) = self.pending.take()
            && !attr.name.is_empty()
        {
            self.tag
                .attributes
                .push(Attribute::new(attr.name, unescape(&attr.value)));
        }
    }

    fn pending_mut(&mut self) -> &mut PendingAttribute {
        self.pending.get_or_insert_with(PendingAttribute::default)
    }
}

/// Scan the tag at the start of `text`, which must begin with `<`.
///
/// Rules:
/// - the tag name ends at whitespace or any of `< > / & " ' \ =`;
/// - a `/` before any non-whitespace content marks a closing tag, and a
///   `/` after the name (outside quotes and values) marks a self-closing tag;
/// - an unquoted `=` starts a value region; a second `=` while an unquoted
///   value is being built is a spurious separator that ends the attribute;
/// - values are unquoted (ended by whitespace or `>`) or quoted (ended by
///   the matching quote; `\` before that quote escapes it); character
///   references in values are resolved;
/// - scanning stops right after the first `>` outside quotes.
///
/// Without a closing `>`, the whole input is consumed.
#[must_use]
pub fn scan_tag(text: &str) -> ScannedTag {
    let mut scanner = TagScanner {
        tag: ScannedTag::default(),
        region: Region::BeforeName,
        pending: None,
        escaped: false,
    };

    let mut chars = text.char_indices().peekable();
    // Skip the opening '<'.
    if text.starts_with('<') {
        let _ = chars.next();
    }

    while let Some((pos, c)) = chars.next() {
        match scanner.region {
            Region::QuotedValue(quote) => {
                if scanner.escaped {
                    // Only the quote itself is escapable.
                    scanner.escaped = false;
                    let value = &mut scanner.pending_mut().value;
                    if c != quote {
                        value.push('\\');
                    }
                    value.push(c);
                } else if c == '\\' {
                    scanner.escaped = true;
                } else if c == quote {
                    scanner.finish_attribute();
                    scanner.region = Region::BetweenAttributes;
                } else {
                    scanner.pending_mut().value.push(c);
                }
                continue;
            }
            _ if c == '>' => {
                scanner.finish_attribute();
                scanner.tag.consumed = pos + 1;
                return scanner.tag;
            }
            Region::BeforeName => {
                if c == '/' {
                    scanner.tag.is_closing = true;
                } else if !c.is_whitespace() {
                    if ends_tag_name(c) {
                        // No usable name; treat the rest as attributes.
                        scanner.region = Region::BetweenAttributes;
                        handle_between(&mut scanner, c);
                    } else {
                        scanner.tag.name.push(c);
                        scanner.region = Region::Name;
                    }
                }
            }
            Region::Name => {
                if ends_tag_name(c) {
                    scanner.region = Region::BetweenAttributes;
                    handle_between(&mut scanner, c);
                } else {
                    scanner.tag.name.push(c);
                }
            }
            Region::BetweenAttributes => handle_between(&mut scanner, c),
            Region::AttributeName => {
                if c.is_whitespace() {
                    // The name may still be followed by `= value`.
                    scanner.region = Region::BetweenAttributes;
                } else if c == '=' {
                    scanner.region = Region::BeforeValue;
                } else if c == '/' {
                    scanner.finish_attribute();
                    scanner.tag.is_self_closing = true;
                    scanner.region = Region::BetweenAttributes;
                } else {
                    scanner.pending_mut().name.push(c);
                }
            }
            Region::BeforeValue => {
                if c.is_whitespace() {
                    continue;
                }
                if c == '"' || c == '\'' {
                    scanner.region = Region::QuotedValue(c);
                } else {
                    scanner.pending_mut().value.push(c);
                    scanner.region = Region::UnquotedValue;
                }
            }
            Region::UnquotedValue => {
                if c.is_whitespace() {
                    scanner.finish_attribute();
                    scanner.region = Region::BetweenAttributes;
                } else if c == '=' {
                    // Spurious separator: the previous attribute ends here.
                    scanner.finish_attribute();
                    scanner.region = Region::BetweenAttributes;
                } else if c == '/' && matches!(chars.peek(), Some((_, '>'))) {
                    scanner.finish_attribute();
                    scanner.tag.is_self_closing = true;
                    scanner.region = Region::BetweenAttributes;
                } else {
                    scanner.pending_mut().value.push(c);
                }
            }
        }
    }

    // Unterminated tag: keep what we have.
    scanner.finish_attribute();
    scanner.tag.consumed = text.len();
    scanner.tag
}

/// Handle a character between attributes (also the first character after
/// the tag name).
fn handle_between(scanner: &mut TagScanner, c: char) {
    if c.is_whitespace() {
        return;
    }
    match c {
        '/' => {
            scanner.finish_attribute();
            scanner.tag.is_self_closing = true;
        }
        '=' => {
            if scanner.pending.is_some() {
                scanner.region = Region::BeforeValue;
            }
        }
        '"' | '\'' => {
            // Quoted text without a name: consume it as a nameless value.
            scanner.finish_attribute();
            scanner.pending = Some(PendingAttribute::default());
            scanner.region = Region::QuotedValue(c);
        }
        _ => {
            scanner.finish_attribute();
            scanner.pending_mut().name.push(c);
            scanner.region = Region::AttributeName;
        }
    }
}
