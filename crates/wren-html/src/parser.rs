//! Tolerant tree builder.
//!
//! Markup is consumed as a flat sequence of [`ParseStep`]s (text runs, opened
//! elements, closing tags, end of input) and assembled with an explicit stack
//! of open elements. Nothing here aborts: a closing tag that does not match
//! the innermost open element closes that element implicitly and is then
//! retried against the next one out; a closing tag matching nothing is
//! dropped, and elements still open at the end of input are closed there.

use std::collections::HashSet;

use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter};
use wren_common::warning::warn_once;
use wren_dom::{ElementNode, Node};

use crate::entities::unescape;
use crate::tokenizer::scan_tag;

/// Elements that never have content or a closing tag in HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum HtmlVoidTag {
    Area,
    Base,
    Br,
    Col,
    Command,
    Embed,
    Hr,
    Img,
    Input,
    Keygen,
    Link,
    Meta,
    Param,
    Source,
    Track,
    Wbr,
}

/// A set of tag names treated as void (no content, no closing tag).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoidTags(HashSet<String>);

impl VoidTags {
    /// The HTML void elements.
    #[must_use]
    pub fn html() -> Self {
        Self(HtmlVoidTag::iter().map(|t| t.as_ref().to_string()).collect())
    }

    /// No void elements: every element expects a closing tag (XML).
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether `name` is void (case-insensitive).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_ascii_lowercase())
    }
}

impl<S: AsRef<str>> FromIterator<S> for VoidTags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        )
    }
}

/// One unit of markup as seen by the tree builder.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseStep {
    /// Literal text with character references resolved.
    TextRun(String),
    /// A start tag. `expects_content` is false for self-closing and void
    /// elements, which take no children and no closing tag.
    OpenedElement {
        /// The new, still childless element.
        element: ElementNode,
        /// Whether children and a closing tag may follow.
        expects_content: bool,
    },
    /// A closing tag; whether it matches anything is the builder's call.
    ClosingTag(String),
    /// No more input.
    EndOfInput,
}

/// Whether `s` (starting at `<`) begins something we treat as markup:
/// a start tag, a closing tag, a comment or a declaration.
fn looks_like_markup(s: &str) -> bool {
    let mut chars = s.chars().skip(1);
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => true,
        Some('!' | '?') => true,
        Some('/') => chars.next().is_some_and(|c| c.is_ascii_alphabetic()),
        _ => false,
    }
}

/// Splits markup into [`ParseStep`]s.
pub struct MarkupSteps<'a> {
    input: &'a str,
    pos: usize,
    void_tags: &'a VoidTags,
}

impl<'a> MarkupSteps<'a> {
    /// Start stepping through `input`.
    #[must_use]
    pub const fn new(input: &'a str, void_tags: &'a VoidTags) -> Self {
        Self {
            input,
            pos: 0,
            void_tags,
        }
    }

    /// Byte length of the text run at the start of `rest`: everything up to
    /// the next `<` that starts real markup. A leading literal `<` counts
    /// as text.
    fn text_run_len(rest: &str) -> usize {
        let mut search_from = 0;
        while let Some(offset) = rest[search_from..].find('<') {
            let at = search_from + offset;
            if looks_like_markup(&rest[at..]) {
                return at;
            }
            search_from = at + 1;
        }
        rest.len()
    }

    /// Produce the next step, skipping comments and declarations.
    pub fn next_step(&mut self) -> ParseStep {
        loop {
            let rest = &self.input[self.pos..];
            if rest.is_empty() {
                return ParseStep::EndOfInput;
            }

            if !rest.starts_with('<') || !looks_like_markup(rest) {
                let len = Self::text_run_len(rest);
                self.pos += len;
                return ParseStep::TextRun(unescape(&rest[..len]));
            }

            if let Some(comment) = rest.strip_prefix("<!--") {
                self.pos += comment.find("-->").map_or(rest.len(), |end| end + 7);
                continue;
            }
            if rest.starts_with("<!") || rest.starts_with("<?") {
                self.pos += rest.find('>').map_or(rest.len(), |end| end + 1);
                continue;
            }

            let scanned = scan_tag(rest);
            self.pos += scanned.consumed;
            if !rest[..scanned.consumed].ends_with('>') {
                warn_once("HTML Parser", &format!("unterminated tag <{}", scanned.name));
            }

            if scanned.is_closing {
                return ParseStep::ClosingTag(scanned.name);
            }

            let is_void = scanned.is_self_closing || self.void_tags.contains(&scanned.name);
            let element = if is_void {
                ElementNode::new_self_closing(scanned.name, scanned.attributes)
            } else {
                ElementNode::new(scanned.name, scanned.attributes)
            };
            return ParseStep::OpenedElement {
                element,
                expects_content: !is_void,
            };
        }
    }
}

/// Attach `node` to the innermost open element, or to the top level.
fn append(open: &mut [ElementNode], roots: &mut Vec<Node>, node: Node) {
    match open.last_mut() {
        Some(parent) => parent.append_child(node),
        None => roots.push(node),
    }
}

/// Parse HTML-subset markup with the default void-tag set.
#[must_use]
pub fn parse(markup: &str) -> Vec<Node> {
    parse_with_void_tags(markup, &VoidTags::html())
}

/// Parse with no void tags: every element needs a closing tag or `/>`.
#[must_use]
pub fn parse_xml(markup: &str) -> Vec<Node> {
    parse_with_void_tags(markup, &VoidTags::none())
}

/// Parse markup into top-level sibling nodes.
#[must_use]
pub fn parse_with_void_tags(markup: &str, void_tags: &VoidTags) -> Vec<Node> {
    let mut steps = MarkupSteps::new(markup, void_tags);
    let mut roots: Vec<Node> = Vec::new();
    let mut open: Vec<ElementNode> = Vec::new();

    loop {
        match steps.next_step() {
            ParseStep::EndOfInput => break,
            ParseStep::TextRun(text) => append(&mut open, &mut roots, Node::text(text)),
            ParseStep::OpenedElement {
                element,
                expects_content: true,
            } => open.push(element),
            ParseStep::OpenedElement { element, .. } => {
                append(&mut open, &mut roots, Node::Element(element));
            }
            ParseStep::ClosingTag(name) => {
                // Close elements until one matches; unmatched ones are
                // treated as if they had no closing tag.
                loop {
                    let Some(element) = open.pop() else {
                        warn_once("HTML Parser", &format!("stray closing tag </{name}>"));
                        break;
                    };
                    let matched = element.is(&name);
                    if !matched {
                        warn_once(
                            "HTML Parser",
                            &format!("</{name}> implicitly closes <{}>", element.name()),
                        );
                    }
                    append(&mut open, &mut roots, Node::Element(element));
                    if matched {
                        break;
                    }
                }
            }
        }
    }

    // Elements still open at end of input close implicitly.
    while let Some(element) = open.pop() {
        append(&mut open, &mut roots, Node::Element(element));
    }
    roots
}
