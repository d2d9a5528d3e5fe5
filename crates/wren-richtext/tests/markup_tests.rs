//! Integration tests for markup conversion and serialization.

use quickcheck_macros::quickcheck;
use wren_richtext::{Fragment, Item, Linebreak, RichText, TagInfo, simplify};

fn from_html(markup: &str) -> RichText {
    let mut rt = RichText::new("Sans", 10.0);
    rt.set_html(markup);
    rt
}

fn fragments(rt: &RichText) -> Vec<&Fragment> {
    rt.fragments().iter().filter_map(Item::as_fragment).collect()
}

fn tag_names(fragment: &Fragment) -> Vec<&str> {
    fragment.tags.iter().map(|t| t.name.as_str()).collect()
}

/// Character, bold, italic, color, size in tenths of a pixel, tag names.
type CharFormat = (char, bool, bool, Option<String>, i64, Vec<String>);

/// Formatting of every character, line breaks included as `\n`.
#[allow(clippy::cast_possible_truncation)]
fn char_formats(rt: &RichText) -> Vec<CharFormat> {
    let mut out = Vec::new();
    for item in rt.fragments() {
        match item {
            Item::Fragment(f) => {
                let tags: Vec<String> = f.tags.iter().map(|t| t.name.clone()).collect();
                for c in f.text.chars() {
                    out.push((
                        c,
                        f.bold,
                        f.italic,
                        f.color.clone(),
                        (f.px_size * 10.0).round() as i64,
                        tags.clone(),
                    ));
                }
            }
            Item::Linebreak(_) => out.push(('\n', false, false, None, 0, Vec::new())),
        }
    }
    out
}

#[test]
fn test_inline_formatting() {
    let rt = from_html("<b>bold</b> and <i>it</i>");
    let frags = fragments(&rt);
    assert_eq!(frags.len(), 3);
    assert!(frags[0].bold && !frags[0].italic);
    assert_eq!(frags[1].text, " and ");
    assert!(!frags[1].bold);
    assert!(frags[2].italic);
    assert_eq!(rt.text(), "bold and it");
    assert_eq!(rt.html(), "<b>bold</b> and <i>it</i>");
}

#[test]
fn test_strong_and_em() {
    let rt = from_html("<strong>s</strong><em>e</em>");
    let frags = fragments(&rt);
    assert!(frags[0].bold);
    assert!(frags[1].italic);
}

#[test]
fn test_heading_size_and_weight() {
    let rt = from_html("<h1>T</h1>x");
    let frags = fragments(&rt);
    assert!((frags[0].px_size - 25.0).abs() < 1e-4);
    assert!(frags[0].bold);
    assert_eq!(frags[0].tags.iter().next(), Some(&TagInfo::block("h1")));
    assert!((frags[1].px_size - 10.0).abs() < 1e-4);
    assert_eq!(rt.text(), "T\nx");
    assert_eq!(rt.html(), "<h1>T</h1>x");
}

#[test]
fn test_nested_headings_multiply() {
    let rt = from_html("<h1><h2>x</h2></h1>");
    let frag = fragments(&rt)[0];
    assert!((frag.px_size - 50.0).abs() < 1e-4);
    assert!(frag.bold);
    assert_eq!(tag_names(frag), ["h1", "h2"]);
}

#[test]
fn test_repeated_heading_counts_once() {
    let rt = from_html("<h1><h1>x</h1></h1>");
    let frag = fragments(&rt)[0];
    assert!((frag.px_size - 25.0).abs() < 1e-4);
    assert_eq!(tag_names(frag), ["h1"]);
}

#[test]
fn test_small() {
    let rt = from_html("<small>s</small><h1><small>x</small></h1>");
    let frags = fragments(&rt);
    assert!((frags[0].px_size - 7.5).abs() < 1e-4);
    assert_eq!(frags[0].tags.iter().next(), Some(&TagInfo::inline("small")));
    assert!((frags[1].px_size - 18.75).abs() < 1e-4);
    assert_eq!(tag_names(frags[1]), ["h1", "small"]);
}

#[test]
fn test_paragraph_whitespace() {
    let rt = from_html("<p>\n  Hello   world\n</p>\n<p>Next</p>");
    assert_eq!(rt.text(), "Hello world \nNext\n");
}

#[test]
fn test_br() {
    assert_eq!(from_html("a<br>b").text(), "a\nb");
    assert_eq!(from_html("a<br/>\n  b").text(), "a\nb");
    assert_eq!(from_html("<br><br>").text(), "\n\n");
}

#[test]
fn test_space_across_nodes() {
    assert_eq!(from_html("<b>a </b> c").text(), "a c");
    assert_eq!(from_html("a\t\tb").text(), "a b");
}

#[test]
fn test_whitespace_between_blocks_dropped() {
    let rt = from_html("<div>a</div> <div>b</div>");
    assert_eq!(rt.text(), "a\nb\n");
}

#[test]
fn test_empty_block_adds_no_break() {
    assert_eq!(from_html("<p></p>x").text(), "x");
    assert_eq!(from_html("a<div><p>b</p></div>").text(), "a\nb\n");
}

#[test]
fn test_colors() {
    let rt = from_html("<font color=red>r</font><span style='color:#00f'>b</span>");
    let frags = fragments(&rt);
    assert_eq!(frags[0].color.as_deref(), Some("#ff0000"));
    assert_eq!(frags[1].color.as_deref(), Some("#0000ff"));
}

#[test]
fn test_nested_colors_restore() {
    let rt = from_html(
        "<span style='color:red'>a<span style='color:blue'>b</span>c</span>d",
    );
    let colors: Vec<Option<&str>> = fragments(&rt).iter().map(|f| f.color.as_deref()).collect();
    assert_eq!(
        colors,
        [Some("#ff0000"), Some("#0000ff"), Some("#ff0000"), None]
    );
}

#[test]
fn test_unknown_color_ignored() {
    let rt = from_html("<span style='color:bogus'>x</span>");
    assert_eq!(fragments(&rt)[0].color, None);
}

#[test]
fn test_entities_decoded_and_escaped() {
    let rt = from_html("a &amp; b &lt;c&gt;");
    assert_eq!(rt.text(), "a & b <c>");
    assert_eq!(rt.html(), "a &amp; b &lt;c&gt;");
}

#[test]
fn test_set_text_is_not_markup() {
    let mut rt = RichText::new("Sans", 10.0);
    rt.set_text("<b>x</b>");
    assert_eq!(rt.text(), "<b>x</b>");
    assert_eq!(rt.html(), "&lt;b&gt;x&lt;/b&gt;");
}

#[test]
fn test_html_reopens_around_blocks() {
    let rt = from_html("<i>a<h1>b</h1>c</i>");
    assert_eq!(rt.html(), "<i>a</i><h1><i>b</i></h1><i>c</i>");
}

#[test]
fn test_html_color_span() {
    let rt = from_html("<b><span style='color:red'>x</span></b>");
    assert_eq!(rt.html(), "<b><span style='color:#ff0000'>x</span></b>");
}

#[test]
fn test_html_keeps_outer_span_open() {
    let rt = from_html("<span style='color:red'>a<b>b</b></span>c");
    assert_eq!(
        rt.html(),
        "<span style='color:#ff0000'>a<b>b</b></span>c"
    );

    let rt = from_html("<i>a<b>b</b>c</i>");
    assert_eq!(rt.html(), "<i>a<b>b</b>c</i>");
}

#[test]
fn test_html_line_breaks() {
    assert_eq!(from_html("a<br>b").html(), "a<br/>b");
    assert_eq!(from_html("a<p>b</p>c").html(), "a<br/>b<br/>c");
    assert_eq!(from_html("<h1>x</h1><br>y").html(), "<h1>x</h1><br/>y");
}

#[test]
fn test_html_round_trip_cases() {
    let cases = [
        "<b>bold <i>both</i></b> plain",
        "<h1>Title</h1><p>Body <small>fine print</small></p>",
        "<h2>a<br>b</h2>c",
        "a<br><h1>x</h1>",
        "<h1>a<h2>b</h2></h1>",
        "<font color=green>g <b>gb</b></font>",
        "x<br><br><br>y",
    ];
    for markup in cases {
        let rt = from_html(markup);
        let again = from_html(&rt.html());
        assert_eq!(char_formats(&rt), char_formats(&again), "{markup}");
    }
}

const TOKENS: &[&str] = &[
    "<b>",
    "</b>",
    "<i>",
    "</i>",
    "<h1>",
    "</h1>",
    "<h2>",
    "</h2>",
    "<small>",
    "</small>",
    "<br>",
    "<p>",
    "</p>",
    "<div>",
    "</div>",
    "<span style='color:red'>",
    "<span style=\"color: #00f\">",
    "</span>",
    "<font color=green>",
    "</font>",
    "word",
    "x",
    " ",
    "  ",
    "\n",
    "&amp;",
    "a, b",
];

#[quickcheck]
fn prop_html_round_trip_keeps_formatting(picks: Vec<u8>) -> bool {
    let markup: String = picks
        .iter()
        .map(|&p| TOKENS[usize::from(p) % TOKENS.len()])
        .collect();
    let rt = from_html(&markup);
    let again = from_html(&rt.html());
    char_formats(&rt) == char_formats(&again)
}

#[test]
fn test_simplify_merges_same_format() {
    let plain = Fragment::new("a", "Sans", 10.0);
    let mut bold = plain.with_text("c");
    bold.bold = true;
    let items: Vec<Item> = vec![
        plain.clone().into(),
        plain.with_text("b").into(),
        plain.with_text("").into(),
        bold.into(),
    ];
    let merged = simplify(items);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].as_fragment().map(|f| f.text.as_str()), Some("ab"));
}

#[test]
fn test_simplify_keeps_linebreaks() {
    let mut rt = RichText::new("Sans", 10.0);
    rt.set_text("a\nb");
    rt.simplify();
    assert_eq!(rt.fragments().len(), 3);
}

fn item_from(choice: u8, bold: bool, italic: bool) -> Item {
    match choice % 5 {
        0 => Item::Linebreak(Linebreak::default()),
        1 => Fragment::new("", "Sans", 10.0).into(),
        k => {
            let mut f = Fragment::new("x".repeat(usize::from(k)), "Sans", 10.0);
            f.bold = bold;
            f.italic = italic;
            f.into()
        }
    }
}

#[quickcheck]
fn prop_simplify_is_idempotent(picks: Vec<(u8, bool, bool)>) -> bool {
    let items: Vec<Item> = picks.iter().map(|&(c, b, i)| item_from(c, b, i)).collect();
    let once = simplify(items);
    let twice = simplify(once.clone());
    once == twice
}

#[quickcheck]
fn prop_simplify_keeps_text(picks: Vec<(u8, bool, bool)>) -> bool {
    let items: Vec<Item> = picks.iter().map(|&(c, b, i)| item_from(c, b, i)).collect();
    let mut before = RichText::new("Sans", 10.0);
    before.set_fragments(items.clone());
    let mut after = RichText::new("Sans", 10.0);
    after.set_fragments(simplify(items));
    let no_neighbors_mergeable = after.fragments().windows(2).all(|pair| {
        match (pair[0].as_fragment(), pair[1].as_fragment()) {
            (Some(a), Some(b)) => !a.same_format(b),
            _ => true,
        }
    });
    before.text() == after.text() && no_neighbors_mergeable
}
