//! Markup serialization.
//!
//! Text re-escapes `&`, `<` and `>`. Attribute values are always emitted
//! double-quoted with `&`, `"`, newline, carriage return, tab and NUL escaped,
//! in their original order.

use std::fmt::Write;

use crate::walk::{Visitor, WalkControl, walk};
use crate::{ElementNode, Node};

/// Escape text content for inclusion in markup.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape an attribute value for a double-quoted attribute.
#[must_use]
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            '\0' => out.push_str("&#0;"),
            _ => out.push(c),
        }
    }
    out
}

impl ElementNode {
    /// The opening tag, including attributes. Self-closing elements end in `/>`.
    #[must_use]
    pub fn open_tag(&self) -> String {
        let mut out = format!("<{}", self.name());
        for attr in self.attributes() {
            let _ = write!(out, " {}=\"{}\"", attr.name, escape_attribute(&attr.value));
        }
        out.push_str(if self.is_self_closing() { "/>" } else { ">" });
        out
    }

    /// The closing tag; empty for self-closing elements.
    #[must_use]
    pub fn close_tag(&self) -> String {
        if self.is_self_closing() {
            String::new()
        } else {
            format!("</{}>", self.name())
        }
    }
}

struct Serializer {
    out: String,
    prettify: bool,
    indent: usize,
    depth: usize,
}

impl Serializer {
    fn line(&mut self, content: &str) {
        if self.prettify {
            self.out.push_str(&" ".repeat(self.depth * self.indent));
            self.out.push_str(content);
            self.out.push('\n');
        } else {
            self.out.push_str(content);
        }
    }
}

impl<'a> Visitor<'a> for Serializer {
    fn enter(&mut self, node: &'a Node) -> WalkControl {
        match node {
            Node::Text(t) => {
                if self.prettify {
                    let trimmed = t.content.trim();
                    if !trimmed.is_empty() {
                        self.line(&escape_text(trimmed));
                    }
                } else {
                    self.out.push_str(&escape_text(&t.content));
                }
            }
            Node::Element(e) => {
                if e.children().is_empty() {
                    // Leaf elements stay on one line.
                    let tag = format!("{}{}", e.open_tag(), e.close_tag());
                    self.line(&tag);
                } else {
                    self.line(&e.open_tag());
                    self.depth += 1;
                }
            }
        }
        WalkControl::Continue
    }

    fn exit(&mut self, node: &'a Node) -> WalkControl {
        if let Node::Element(e) = node
            && !e.children().is_empty()
        {
            self.depth = self.depth.saturating_sub(1);
            self.line(&e.close_tag());
        }
        WalkControl::Continue
    }
}

/// Serialize a list of sibling nodes.
#[must_use]
pub fn serialize_nodes(nodes: &[Node], prettify: bool, indent: usize) -> String {
    let mut serializer = Serializer {
        out: String::new(),
        prettify,
        indent,
        depth: 0,
    };
    let _ = walk(nodes, &mut serializer);
    if prettify {
        let trimmed_len = serializer.out.trim_end().len();
        serializer.out.truncate(trimmed_len);
    }
    serializer.out
}

struct TreeDump {
    out: String,
    depth: usize,
}

impl<'a> Visitor<'a> for TreeDump {
    fn enter(&mut self, node: &'a Node) -> WalkControl {
        let prefix = "  ".repeat(self.depth);
        match node {
            Node::Element(e) => {
                let attrs: Vec<String> = e
                    .attributes()
                    .iter()
                    .map(|a| format!(" {}=\"{}\"", a.name, a.value))
                    .collect();
                let slash = if e.is_self_closing() { "/" } else { "" };
                let _ = writeln!(self.out, "{prefix}<{}{}{slash}>", e.name(), attrs.concat());
            }
            Node::Text(t) => {
                let display = t.content.replace('\n', "\\n").replace(' ', "\u{00B7}");
                let _ = writeln!(self.out, "{prefix}\"{display}\"");
            }
        }
        if !node.children().is_empty() {
            self.depth += 1;
        }
        WalkControl::Continue
    }

    fn exit(&mut self, node: &'a Node) -> WalkControl {
        if !node.children().is_empty() {
            self.depth = self.depth.saturating_sub(1);
        }
        WalkControl::Continue
    }
}

/// Render a tree as an indented, human-readable outline for debugging.
#[must_use]
pub fn dump_tree(nodes: &[Node]) -> String {
    let mut dump = TreeDump {
        out: String::new(),
        depth: 0,
    };
    let _ = walk(nodes, &mut dump);
    dump.out
}
