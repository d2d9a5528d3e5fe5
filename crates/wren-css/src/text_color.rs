//! Text color lookup.

use wren_dom::{ElementNode, Node};
use wren_html::parse;

use crate::color::resolve_color;
use crate::declarations::split_declarations;

/// The text color an element forces, as canonical `#rrggbb`.
///
/// `color` declarations in the `style` attribute are tried first, then a
/// bare `color` attribute (`<font color=…>`); the first value that resolves
/// wins.
#[must_use]
pub fn element_text_color(element: &ElementNode) -> Option<String> {
    let from_style = element.attr("style").and_then(|style| {
        split_declarations(style)
            .iter()
            .filter(|decl| decl.is("color"))
            .find_map(|decl| resolve_color(&decl.value))
    });
    from_style.or_else(|| element.attr("color").and_then(resolve_color))
}

/// [`element_text_color`] for the first node parsed from `markup`.
#[must_use]
pub fn markup_text_color(markup: &str) -> Option<String> {
    parse(markup)
        .first()
        .and_then(Node::as_element)
        .and_then(element_text_color)
}
