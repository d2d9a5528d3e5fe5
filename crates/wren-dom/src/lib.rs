//! Document tree for the wren pipeline.
//!
//! This crate provides the lightweight tree produced by the markup parser
//! and consumed by the rich-text converter and link detection.
//!
//! # Design
//!
//! Unlike an arena DOM, every [`ElementNode`] exclusively owns its children.
//! Trees are created fresh on every parse and discarded once converted, so
//! there are no parent or sibling back-pointers. Traversal goes through
//! [`walk`], which keeps an explicit stack instead of recursing, so
//! adversarially deep markup cannot exhaust the call stack.

/// Markup serialization for nodes.
pub mod serialize;
/// Iterative depth-first traversal.
pub mod walk;

pub use serialize::{dump_tree, escape_attribute, escape_text, serialize_nodes};
pub use walk::{Visitor, WalkControl, walk, walk_fn};

/// An attribute on an element, in source order.
///
/// Duplicate names are preserved; lookups through [`ElementNode::attr`]
/// return the last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as written in the markup.
    pub name: String,
    /// Attribute value with character references already resolved.
    pub value: String,
}

impl Attribute {
    /// Create a new attribute with the given name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A run of literal text. Leaf node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextNode {
    /// The raw (unescaped) text content.
    pub content: String,
}

impl TextNode {
    /// Create a text node.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// An element with a name, ordered attributes and owned children.
///
/// Invariant: a self-closing element has no children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    name: String,
    attributes: Vec<Attribute>,
    self_closing: bool,
    children: Vec<Node>,
}

impl ElementNode {
    /// Create an element that may hold content.
    #[must_use]
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
            self_closing: false,
            children: Vec::new(),
        }
    }

    /// Create a self-closing element (`<br/>`, void tags).
    #[must_use]
    pub fn new_self_closing(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into(),
            attributes,
            self_closing: true,
            children: Vec::new(),
        }
    }

    /// The tag name as written in the markup.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive tag name comparison.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// All attributes in source order, duplicates included.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Look up an attribute value by case-insensitive name. Last one wins.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Whether the element was written (or classified) as self-closing.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        self.self_closing
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Consume the element, returning its children.
    #[must_use]
    pub fn into_children(mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// Append a child node.
    ///
    /// Appending to a self-closing element turns it into a regular element,
    /// keeping the "self-closing implies childless" invariant.
    pub fn append_child(&mut self, child: Node) {
        self.self_closing = false;
        self.children.push(child);
    }

    /// Concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let _ = walk_fn(&self.children, |node| {
            if let Node::Text(t) = node {
                out.push_str(&t.content);
            }
            WalkControl::Continue
        });
        out
    }
}

impl Drop for ElementNode {
    // Tear deep trees down iteratively; the default drop recurses per level.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(node) = pending.pop() {
            if let Node::Element(mut e) = node {
                pending.append(&mut e.children);
            }
        }
    }
}

/// A node in the parsed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text.
    Text(TextNode),
    /// An element with attributes and children.
    Element(ElementNode),
}

impl Node {
    /// Shorthand for a text node.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(TextNode::new(content))
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(&t.content),
            Self::Element(_) => None,
        }
    }

    /// Children of an element; empty for text.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Element(e) => e.children(),
            Self::Text(_) => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Text(t) => t.content.clone(),
            Self::Element(e) => e.text_content(),
        }
    }

    /// Re-emit this node as markup.
    ///
    /// With `prettify`, child nodes go on their own lines indented by
    /// `indent` spaces per nesting level.
    #[must_use]
    pub fn serialize(&self, prettify: bool, indent: usize) -> String {
        serialize_nodes(std::slice::from_ref(self), prettify, indent)
    }
}

impl From<ElementNode> for Node {
    fn from(e: ElementNode) -> Self {
        Self::Element(e)
    }
}

impl From<TextNode> for Node {
    fn from(t: TextNode) -> Self {
        Self::Text(t)
    }
}
