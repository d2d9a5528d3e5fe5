//! Integration tests for inline style parsing and color resolution.

use std::str::FromStr;

use wren_css::{
    ColorParseError, ColorValue, Declaration, element_text_color, markup_text_color,
    resolve_color, split_declarations,
};
use wren_html::parse;

#[test]
fn test_split_keeps_nested_semicolons() {
    let decls = split_declarations("color: red; background: url(a;b)");
    assert_eq!(
        decls,
        vec![
            Declaration::new("color", "red"),
            Declaration::new("background", "url(a;b)"),
        ]
    );
}

#[test]
fn test_split_quotes_and_trailing_semicolon() {
    let decls = split_declarations(" font-family : \"A;B\" ; content:'x' ; ");
    assert_eq!(
        decls,
        vec![
            Declaration::new("font-family", "A;B"),
            Declaration::new("content", "x"),
        ]
    );
}

#[test]
fn test_split_braces_and_escapes() {
    let decls = split_declarations(r"a: {x;y}; b: 'it\'s;ok'");
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].value, "{x;y}");
    assert_eq!(decls[1].value, r"it\'s;ok");
}

#[test]
fn test_split_ignores_pieces_without_colon() {
    let decls = split_declarations("bogus; color: blue");
    assert_eq!(decls, vec![Declaration::new("color", "blue")]);
    assert!(split_declarations("").is_empty());
}

#[test]
fn test_value_colons_kept() {
    let decls = split_declarations("background: url(http://x/y.png)");
    assert_eq!(decls[0].value, "url(http://x/y.png)");
}

#[test]
fn test_resolve_named() {
    assert_eq!(resolve_color("red").as_deref(), Some("#ff0000"));
    assert_eq!(resolve_color("Green").as_deref(), Some("#008000"));
    assert_eq!(resolve_color(" orange ").as_deref(), Some("#ffa500"));
    assert_eq!(resolve_color("GRAY").as_deref(), Some("#808080"));
}

#[test]
fn test_resolve_hex() {
    assert_eq!(resolve_color("#abc").as_deref(), Some("#aabbcc"));
    assert_eq!(resolve_color("#A0B1C2").as_deref(), Some("#a0b1c2"));
}

#[test]
fn test_resolve_rejects_everything_else() {
    for token in ["", "purple", "#abcd", "#12345", "#ggg", "rgb(1,2,3)", "#\u{e9}\u{e9}"] {
        assert_eq!(resolve_color(token), None, "{token:?}");
    }
}

#[test]
fn test_color_value_from_str() {
    assert_eq!(ColorValue::from_str("#f00"), Ok(ColorValue::rgb(255, 0, 0)));
    assert_eq!(
        ColorValue::from_str("#ff000080"),
        Ok(ColorValue {
            r: 255,
            g: 0,
            b: 0,
            a: 128
        })
    );
    assert_eq!(
        "rgb(0, 128, 255)".parse::<ColorValue>(),
        Ok(ColorValue::rgb(0, 128, 255))
    );
    assert_eq!(
        "rgba(0 0 0 / 50%)".parse::<ColorValue>().map(|c| c.a),
        Ok(128)
    );
    assert_eq!("white".parse::<ColorValue>(), Ok(ColorValue::WHITE));
}

#[test]
fn test_color_value_errors() {
    assert_eq!(ColorValue::from_str("  "), Err(ColorParseError::Empty));
    assert!(matches!(
        ColorValue::from_str("#12"),
        Err(ColorParseError::InvalidHex(_))
    ));
    assert!(matches!(
        ColorValue::from_str("rgb(1,2)"),
        Err(ColorParseError::InvalidFunction(_))
    ));
    assert_eq!(
        ColorValue::from_str("chartreuse"),
        Err(ColorParseError::UnknownName("chartreuse".into()))
    );
    assert_eq!(
        ColorValue::from_str("chartreuse").map_err(|e| e.to_string()),
        Err("unknown color name 'chartreuse'".into())
    );
}

#[test]
fn test_element_text_color_style_first() {
    let nodes = parse(r#"<span color="blue" style="font-weight: bold; color: red">x</span>"#);
    let span = nodes[0].as_element().expect("span");
    assert_eq!(element_text_color(span).as_deref(), Some("#ff0000"));
}

#[test]
fn test_element_text_color_falls_back() {
    let nodes = parse(r##"<font color="#0f0" style="color: nonsense">x</font>"##);
    let font = nodes[0].as_element().expect("font");
    assert_eq!(element_text_color(font).as_deref(), Some("#00ff00"));
}

#[test]
fn test_markup_text_color() {
    assert_eq!(
        markup_text_color("<p style='color:#123456'>x</p>").as_deref(),
        Some("#123456")
    );
    assert_eq!(markup_text_color("plain text"), None);
    assert_eq!(markup_text_color("<b>x</b>"), None);
}
