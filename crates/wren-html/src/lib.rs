//! Tolerant HTML-subset parsing for the wren pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **Entities**: named and numeric character references, both directions
//! - **Tag scanning** ([`scan_tag`]): one tag at a time, never failing
//! - **Tree building** ([`parse`], [`parse_xml`]): an explicit stack of open
//!   elements with implicit closing for mismatched tags
//! - **Link detection** ([`linkify_html`])
//!
//! # Not Supported
//!
//! - Insertion modes, foster parenting, adoption agency
//! - Raw-text elements (`script`, `style` content is parsed as markup)
//! - Namespaces

/// Character reference decoding and escaping.
pub mod entities;
/// Bare-URL detection and anchor insertion.
pub mod linkify;
/// Tree construction from tag scans.
pub mod parser;
/// Single-tag scanner.
pub mod tokenizer;

pub use entities::{escape_attribute, escape_text, unescape};
pub use linkify::{find_links, linkify_html};
pub use parser::{HtmlVoidTag, MarkupSteps, ParseStep, VoidTags, parse, parse_with_void_tags, parse_xml};
pub use tokenizer::{ScannedTag, scan_tag};

use wren_dom::{Node, dump_tree};

/// Print a parsed tree to stdout for debugging.
pub fn print_tree(nodes: &[Node]) {
    print!("{}", dump_tree(nodes));
}
