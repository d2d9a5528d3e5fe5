//! Bare-URL detection.
//!
//! [`linkify_html`] parses markup, finds URL-like runs inside text nodes that
//! are not already inside an `<a>`, and wraps them in anchors. Everything
//! else is re-serialized as parsed (comments and declarations other than a
//! leading doctype are dropped by the parser).

use std::ops::Range;

use wren_dom::{Node, Visitor, WalkControl, escape_attribute, escape_text, walk};

use crate::parser::parse;

/// Top-level domains accepted for links written without a scheme.
const COMMON_TLDS: &[&str] = &[
    "com", "org", "net", "edu", "gov", "mil", "int", "info", "biz", "io", "dev", "app", "co",
    "us", "uk", "de", "fr", "nl", "eu", "ch", "at", "it", "es", "se", "no", "fi", "dk", "pl",
    "cz", "ru", "jp", "cn", "in", "br", "ca", "au", "nz",
];

/// Characters stripped from the front of a candidate.
const LEADING_PUNCTUATION: &[char] = &['(', '[', '{', '<', '"', '\''];

/// Characters never allowed to end a link.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '"', '\'', '>'];

/// Split a leading `<!doctype …>` off the markup.
fn split_doctype(markup: &str) -> (&str, &str) {
    let trimmed = markup.trim_start();
    let lead = markup.len() - trimmed.len();
    let is_doctype = trimmed
        .get(..9)
        .is_some_and(|head| head.eq_ignore_ascii_case("<!doctype"));
    if !is_doctype {
        return ("", markup);
    }
    match trimmed.find('>') {
        Some(end) => markup.split_at(lead + end + 1),
        None => (markup, ""),
    }
}

/// Whether `host` looks like a domain name: dot-separated non-empty labels of
/// letters, digits and hyphens, ending in an alphabetic top-level label.
fn is_domain_like(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty() && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels_ok && tld_ok
}

/// Split a leading `scheme://` off, if present and well-formed.
fn split_scheme(candidate: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = candidate.split_once("://")?;
    let mut chars = scheme.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'));
    (first_ok && rest_ok && !rest.is_empty()).then_some((scheme, rest))
}

/// Whether a trimmed candidate is a link worth wrapping.
fn is_link(candidate: &str) -> bool {
    if let Some((_, rest)) = split_scheme(candidate) {
        return rest.chars().next().is_some_and(char::is_alphanumeric);
    }
    let host = candidate
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host = host.split(':').next().unwrap_or_default();
    if host.contains('@') || !is_domain_like(host) {
        return false;
    }
    let lowered = host.to_ascii_lowercase();
    lowered.starts_with("www.")
        || lowered
            .rsplit('.')
            .next()
            .is_some_and(|tld| COMMON_TLDS.contains(&tld))
}

/// Count of `open` minus count of `close` in `s`.
fn bracket_balance(s: &str, open: char, close: char) -> isize {
    s.chars().fold(0, |acc, c| {
        if c == open {
            acc + 1
        } else if c == close {
            acc - 1
        } else {
            acc
        }
    })
}

/// Narrow the byte range `word` (a whitespace-free run of `text`) to the URL
/// it contains, dropping surrounding punctuation and unpaired brackets.
fn trim_candidate(text: &str, word: Range<usize>) -> Range<usize> {
    let mut start = word.start;
    let mut end = word.end;

    while let Some(c) = text[start..end].chars().next() {
        if !LEADING_PUNCTUATION.contains(&c) {
            break;
        }
        start += c.len_utf8();
    }

    while let Some(c) = text[start..end].chars().next_back() {
        let candidate = &text[start..end];
        let strip = match c {
            ')' => bracket_balance(candidate, '(', ')') < 0,
            ']' => bracket_balance(candidate, '[', ']') < 0,
            '}' => bracket_balance(candidate, '{', '}') < 0,
            _ => TRAILING_PUNCTUATION.contains(&c),
        };
        if !strip {
            break;
        }
        end -= c.len_utf8();
    }

    start..end
}

/// Byte ranges of the links found in `text`, in order.
#[must_use]
pub fn find_links(text: &str) -> Vec<Range<usize>> {
    let mut links = Vec::new();
    let mut word_start: Option<usize> = None;

    let boundaries = text
        .char_indices()
        .map(|(i, c)| (i, c.is_whitespace()))
        .chain(std::iter::once((text.len(), true)));
    for (i, is_space) in boundaries {
        match (word_start, is_space) {
            (None, false) => word_start = Some(i),
            (Some(start), true) => {
                let range = trim_candidate(text, start..i);
                if !range.is_empty() && is_link(&text[range.clone()]) {
                    links.push(range);
                }
                word_start = None;
            }
            _ => {}
        }
    }
    links
}

/// The `href` for a detected link; scheme-less links get `https://`.
fn href_for(link: &str) -> String {
    if split_scheme(link).is_some() {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}

struct Linker {
    out: String,
    anchor_depth: usize,
    blank_target: bool,
}

impl Linker {
    fn push_text(&mut self, text: &str) {
        if self.anchor_depth > 0 {
            self.out.push_str(&escape_text(text));
            return;
        }
        let mut last = 0;
        for link in find_links(text) {
            self.out.push_str(&escape_text(&text[last..link.start]));
            let url = &text[link.clone()];
            self.out.push_str("<a href=\"");
            self.out.push_str(&escape_attribute(&href_for(url)));
            self.out.push('"');
            if self.blank_target {
                self.out.push_str(" target=\"_blank\"");
            }
            self.out.push('>');
            self.out.push_str(&escape_text(url));
            self.out.push_str("</a>");
            last = link.end;
        }
        self.out.push_str(&escape_text(&text[last..]));
    }
}

impl<'a> Visitor<'a> for Linker {
    fn enter(&mut self, node: &'a Node) -> WalkControl {
        match node {
            Node::Text(t) => self.push_text(&t.content),
            Node::Element(e) => {
                self.out.push_str(&e.open_tag());
                if e.is("a") {
                    self.anchor_depth += 1;
                }
            }
        }
        WalkControl::Continue
    }

    fn exit(&mut self, node: &'a Node) -> WalkControl {
        if let Node::Element(e) = node {
            self.out.push_str(&e.close_tag());
            if e.is("a") {
                self.anchor_depth = self.anchor_depth.saturating_sub(1);
            }
        }
        WalkControl::Continue
    }
}

/// Wrap bare URLs in text with `<a href="…">` anchors.
///
/// Text already inside an anchor is left alone. With `blank_target`, new
/// anchors get `target="_blank"`. A leading doctype is kept verbatim.
///
/// The rest of the output is the parsed tree written back out, not the
/// input with anchors spliced in: comments and other `<!…>`/`<?…>` markup
/// are dropped, attribute values come back double-quoted, and mismatched
/// tags come back repaired.
#[must_use]
pub fn linkify_html(markup: &str, blank_target: bool) -> String {
    let (doctype, body) = split_doctype(markup);
    let nodes = parse(body);
    let mut linker = Linker {
        out: String::from(doctype),
        anchor_depth: 0,
        blank_target,
    };
    let _ = walk(&nodes, &mut linker);
    linker.out
}
