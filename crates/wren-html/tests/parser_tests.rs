//! Integration tests for the tree builder and link detection.

use quickcheck_macros::quickcheck;
use wren_dom::{Node, serialize_nodes};
use wren_html::{linkify_html, parse, parse_with_void_tags, parse_xml};

fn round_trip(markup: &str) -> String {
    serialize_nodes(&parse(markup), false, 0)
}

#[test]
fn test_well_formed_round_trips() {
    for markup in ["<b>hi</b>", "<i>a</i>b", "<h1>T</h1>x"] {
        assert_eq!(round_trip(markup), markup);
    }
}

#[test]
fn test_tree_shape() {
    let nodes = parse("<p>a<b>b</b>c</p>d");
    assert_eq!(nodes.len(), 2);
    let p = nodes[0].as_element().expect("p element");
    assert!(p.is("p"));
    assert_eq!(p.children().len(), 3);
    assert_eq!(p.children()[1].text_content(), "b");
    assert_eq!(nodes[1].as_text(), Some("d"));
}

#[test]
fn test_mismatched_closer_closes_implicitly() {
    assert_eq!(round_trip("<b>x</i>y</b>"), "<b>x</b>y");
    assert_eq!(round_trip("<div><b>x</div>y"), "<div><b>x</b></div>y");
}

#[test]
fn test_unclosed_elements_close_at_end() {
    assert_eq!(round_trip("<b>x<i>y"), "<b>x<i>y</i></b>");
}

#[test]
fn test_stray_closer_dropped() {
    assert_eq!(round_trip("a</p>b"), "ab");
}

#[test]
fn test_void_tags() {
    assert_eq!(round_trip("<p>a<br>b</p>"), "<p>a<br/>b</p>");
    assert_eq!(round_trip("<IMG src=x>"), "<IMG src=\"x\"/>");
    let nodes = parse("<br>x");
    assert_eq!(nodes.len(), 2);
    assert!(nodes[0].as_element().is_some_and(|e| e.is_self_closing()));
}

#[test]
fn test_xml_mode_has_no_void_tags() {
    assert_eq!(serialize_nodes(&parse_xml("<br>x"), false, 0), "<br>x</br>");
    assert_eq!(serialize_nodes(&parse_xml("<br/>x"), false, 0), "<br/>x");
}

#[test]
fn test_custom_void_tags() {
    let void_tags = ["marker"].into_iter().collect();
    let nodes = parse_with_void_tags("<marker>x", &void_tags);
    assert_eq!(serialize_nodes(&nodes, false, 0), "<marker/>x");
}

#[test]
fn test_literal_angle_bracket() {
    let nodes = parse("a < b <3 c");
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].as_text(), Some("a < b <3 c"));
    assert_eq!(round_trip("a < b"), "a &lt; b");
}

#[test]
fn test_comments_and_declarations_skipped() {
    assert_eq!(round_trip("a<!-- <b>c</b> -->b"), "ab");
    assert_eq!(round_trip("<?xml version='1.0'?><r/>"), "<r/>");
    assert_eq!(round_trip("<!DOCTYPE html><p>x</p>"), "<p>x</p>");
    assert_eq!(round_trip("x<!-- never closed"), "x");
}

#[test]
fn test_text_is_unescaped() {
    let nodes = parse("&lt;p&gt; &amp; &copy;");
    assert_eq!(nodes[0].as_text(), Some("<p> & \u{00A9}"));
}

#[test]
fn test_attribute_lookup() {
    let nodes = parse(r#"<font COLOR="red" color="blue">x</font>"#);
    let font = nodes[0].as_element().expect("font element");
    assert_eq!(font.attr("color"), Some("blue"));
    assert_eq!(font.attributes().len(), 2);
}

#[test]
fn test_unterminated_tag_at_end() {
    let nodes = parse("x<b class='y");
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[1].as_element().and_then(|e| e.attr("class")), Some("y"));
}

#[test]
fn test_deep_nesting() {
    let markup = "<b>".repeat(50_000);
    let nodes = parse(&markup);
    assert_eq!(nodes.len(), 1);
    let mut depth = 0;
    let mut current: &[Node] = &nodes;
    while let Some(node) = current.first() {
        depth += 1;
        current = node.children();
    }
    assert_eq!(depth, 50_000);
}

#[quickcheck]
fn prop_parse_never_panics(input: String) -> bool {
    let _ = parse(&input);
    let _ = parse_xml(&input);
    true
}

#[quickcheck]
fn prop_text_without_markup_survives(input: String) -> bool {
    let plain: String = input.chars().filter(|c| !matches!(c, '<' | '&')).collect();
    let nodes = parse(&plain);
    let text: String = nodes.iter().map(Node::text_content).collect();
    text == plain
}

#[test]
fn test_linkify_trailing_period() {
    assert_eq!(
        linkify_html("see www.example.com.", false),
        "see <a href=\"https://www.example.com\">www.example.com</a>."
    );
}

#[test]
fn test_linkify_parentheses() {
    assert_eq!(
        linkify_html("(www.example.com)", false),
        "(<a href=\"https://www.example.com\">www.example.com</a>)"
    );
}

#[test]
fn test_linkify_blank_target() {
    assert_eq!(
        linkify_html("<p>http://a.org/x</p>", true),
        "<p><a href=\"http://a.org/x\" target=\"_blank\">http://a.org/x</a></p>"
    );
}

#[test]
fn test_linkify_skips_existing_anchors() {
    let markup = "<a href=\"https://x.org\">x.org</a> and y.org";
    assert_eq!(
        linkify_html(markup, false),
        "<a href=\"https://x.org\">x.org</a> and <a href=\"https://y.org\">y.org</a>"
    );
}

#[test]
fn test_linkify_keeps_doctype() {
    let out = linkify_html("<!doctype html><b>www.a.com</b>", false);
    assert_eq!(
        out,
        "<!doctype html><b><a href=\"https://www.a.com\">www.a.com</a></b>"
    );
}

#[test]
fn test_linkify_rewrites_from_parsed_tree() {
    let out = linkify_html("<!DOCTYPE html><!-- note --><p class=x>see a.io", false);
    assert_eq!(
        out,
        "<!DOCTYPE html><p class=\"x\">see <a href=\"https://a.io\">a.io</a></p>"
    );
}

#[test]
fn test_linkify_escapes_text() {
    assert_eq!(linkify_html("a &lt; b", false), "a &lt; b");
}
