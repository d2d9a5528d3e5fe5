//! Markup to fragments.
//!
//! The parsed tree is walked once with a [`Converter`] holding all nesting
//! state: counters for `b`/`strong`, `i`/`em` and `small`, the stack of open
//! tags that fragments record, and per-element stacks of forced colors and
//! alignments. Block tags (`div`, `p`, `table`, `h1`..`h9`) break the line
//! before and after their content unless the line is already empty; `br`
//! always breaks.

use std::str::FromStr;

use wren_css::{element_text_color, split_declarations};
use wren_dom::{ElementNode, Node, Visitor, WalkControl, walk};
use wren_html::parse;

use crate::fragment::{Align, Fragment, Item, Linebreak, TagInfo, TagSet, heading_level};
use crate::rich_text::RichText;

/// Size factor for a heading level. Nested headings multiply.
const fn heading_scale(level: u8) -> f32 {
    match level {
        1 => 2.5,
        2 => 2.0,
        3 => 1.5,
        4 => 1.2,
        _ => 1.0,
    }
}

/// Size factor inside `small`.
const SMALL_SCALE: f32 = 0.75;

fn is_block(element: &ElementNode) -> bool {
    ["div", "p", "table"].iter().any(|name| element.is(name))
        || heading_level(element.name()).is_some()
}

/// Alignment requested by a block element's `align` attribute or
/// `text-align` declaration; the declaration wins.
fn block_align(element: &ElementNode) -> Option<Align> {
    let from_style = element.attr("style").and_then(|style| {
        split_declarations(style)
            .iter()
            .rev()
            .find(|decl| decl.is("text-align"))
            .and_then(|decl| Align::from_str(&decl.value).ok())
    });
    from_style.or_else(|| element.attr("align").and_then(|a| Align::from_str(a.trim()).ok()))
}

/// Collapse runs of spaces to one.
fn collapse_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Conversion state threaded through the walk.
struct Converter {
    base: Fragment,
    items: Vec<Item>,
    bold: usize,
    italic: usize,
    small: usize,
    open_tags: Vec<TagInfo>,
    colors: Vec<Option<String>>,
    aligns: Vec<Option<Align>>,
    at_block_start: bool,
    after_break: bool,
    line_has_content: bool,
    last_was_space: bool,
}

impl Converter {
    fn new(base: Fragment) -> Self {
        Self {
            base,
            items: Vec::new(),
            bold: 0,
            italic: 0,
            small: 0,
            open_tags: Vec::new(),
            colors: Vec::new(),
            aligns: Vec::new(),
            at_block_start: true,
            after_break: false,
            line_has_content: false,
            last_was_space: false,
        }
    }

    fn push_break(&mut self) {
        self.items.push(Item::Linebreak(Linebreak::default()));
        self.line_has_content = false;
        self.last_was_space = false;
    }

    fn block_boundary(&mut self) {
        if self.line_has_content {
            self.push_break();
        }
        self.at_block_start = true;
    }

    /// Tag recorded on fragments for this element, if any.
    fn recorded_tag(element: &ElementNode) -> Option<TagInfo> {
        let name = element.name().to_ascii_lowercase();
        if heading_level(&name).is_some() {
            Some(TagInfo::block(name))
        } else if name == "small" {
            Some(TagInfo::inline(name))
        } else {
            None
        }
    }

    fn counter(&mut self, element: &ElementNode) -> Option<&mut usize> {
        let name = element.name().to_ascii_lowercase();
        match name.as_str() {
            "b" | "strong" => Some(&mut self.bold),
            "i" | "em" => Some(&mut self.italic),
            "small" => Some(&mut self.small),
            _ => None,
        }
    }

    fn fragment(&self, text: String) -> Fragment {
        let tags: TagSet = self.open_tags.iter().cloned().collect();
        let mut px_size = self.base.px_size;
        for tag in &tags {
            if let Some(level) = heading_level(&tag.name) {
                px_size *= heading_scale(level);
            }
        }
        if self.small > 0 {
            px_size *= SMALL_SCALE;
        }
        let mut fragment = self.base.with_text(text);
        fragment.bold = self.bold > 0 || tags.has_heading();
        fragment.italic = self.italic > 0;
        fragment.px_size = px_size;
        fragment.color = self.colors.iter().rev().find_map(Clone::clone);
        fragment.align = self.aligns.iter().rev().find_map(|a| *a);
        fragment.tags = tags;
        fragment
    }

    fn text(&mut self, raw: &str) {
        let mut text = raw;
        if self.at_block_start || self.after_break {
            text = text.trim_start_matches([' ', '\t', '\n', '\r']);
        }
        let mut text = collapse_spaces(&text.replace(['\n', '\r', '\t'], " "));
        if self.last_was_space && text.starts_with(' ') {
            let _ = text.remove(0);
        }
        let whitespace_only = text.chars().all(|c| c == ' ');
        if text.is_empty() || (whitespace_only && !self.line_has_content) {
            return;
        }

        self.last_was_space = text.ends_with(' ');
        self.line_has_content = true;
        self.at_block_start = false;
        self.after_break = false;
        let fragment = self.fragment(text);
        self.items.push(fragment.into());
    }
}

impl<'a> Visitor<'a> for Converter {
    fn enter(&mut self, node: &'a Node) -> WalkControl {
        let element = match node {
            Node::Text(t) => {
                self.text(&t.content);
                return WalkControl::Continue;
            }
            Node::Element(e) => e,
        };

        if element.is("br") {
            self.push_break();
            self.after_break = true;
        }
        let block = is_block(element);
        if block {
            self.block_boundary();
        }
        if let Some(count) = self.counter(element) {
            *count += 1;
        }
        if let Some(tag) = Self::recorded_tag(element) {
            self.open_tags.push(tag);
        }
        self.colors.push(element_text_color(element));
        self.aligns
            .push(if block { block_align(element) } else { None });
        WalkControl::Continue
    }

    fn exit(&mut self, node: &'a Node) -> WalkControl {
        let Node::Element(element) = node else {
            return WalkControl::Continue;
        };
        if let Some(count) = self.counter(element) {
            *count = count.saturating_sub(1);
        }
        if Self::recorded_tag(element).is_some() {
            let _ = self.open_tags.pop();
        }
        let _ = self.colors.pop();
        let _ = self.aligns.pop();
        if is_block(element) {
            self.block_boundary();
        }
        WalkControl::Continue
    }
}

impl RichText {
    /// Replace the content with fragments derived from markup.
    pub fn set_html(&mut self, markup: &str) {
        let nodes = parse(markup);
        let mut converter = Converter::new(self.default_fragment(""));
        let _ = walk(&nodes, &mut converter);
        self.items = converter.items;
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_spaces() {
        assert_eq!(collapse_spaces("a   b  c"), "a b c");
        assert_eq!(collapse_spaces("  "), " ");
        assert_eq!(collapse_spaces("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
    }

    #[test]
    fn test_block_align() {
        let nodes = parse("<p align=center style='text-align: Right'>x</p><div align=justified>y</div>");
        let p = nodes[0].as_element().expect("p");
        let div = nodes[1].as_element().expect("div");
        assert_eq!(block_align(p), Some(Align::Right));
        assert_eq!(block_align(div), Some(Align::Justified));
    }

    #[test]
    fn test_heading_scale() {
        assert!((heading_scale(1) - 2.5).abs() < f32::EPSILON);
        assert!((heading_scale(7) - 1.0).abs() < f32::EPSILON);
    }
}
