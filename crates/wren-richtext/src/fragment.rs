//! The fragment model.
//!
//! Rich text is a flat list of [`Item`]s: [`Fragment`]s (runs of text in one
//! formatting) and [`Linebreak`] markers. Layout fills in the position and
//! size fields; they are meaningless before the first layout.

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::metrics::FontAttributes;

/// Horizontal alignment of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush left (the default).
    Left,
    /// Centered in the target width.
    Center,
    /// Flush right.
    Right,
    /// Extra space spread across word gaps, except on a paragraph's last line.
    Justified,
}

/// A markup tag a fragment was found inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TagInfo {
    /// Lowercase tag name.
    pub name: String,
    /// Whether the tag forces line breaks around its content.
    pub is_block: bool,
}

impl TagInfo {
    /// A block-level tag (`h1`..`h9`).
    #[must_use]
    pub fn block(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_block: true,
        }
    }

    /// An inline tag (`small`).
    #[must_use]
    pub fn inline(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_block: false,
        }
    }
}

/// Heading level for `h1`..`h9`.
#[must_use]
pub fn heading_level(name: &str) -> Option<u8> {
    let mut chars = name.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('h' | 'H'), Some(digit @ '1'..='9'), None) => {
            digit.to_digit(10).and_then(|d| u8::try_from(d).ok())
        }
        _ => None,
    }
}

/// Ordered set of tags, outermost first. Comparison is by content and
/// order, which the serializer relies on to reconstruct nesting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<TagInfo>);

impl TagSet {
    /// An empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append `tag` as the innermost entry unless already present.
    pub fn insert(&mut self, tag: TagInfo) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    /// Whether a tag with this name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|t| t.name == name)
    }

    /// Whether any tag is block-level.
    #[must_use]
    pub fn has_block(&self) -> bool {
        self.0.iter().any(|t| t.is_block)
    }

    /// Whether any heading tag is present.
    #[must_use]
    pub fn has_heading(&self) -> bool {
        self.0.iter().any(|t| heading_level(&t.name).is_some())
    }

    /// Tags, outermost first.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, TagInfo> {
        self.0.iter()
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<TagInfo> for TagSet {
    fn from_iter<I: IntoIterator<Item = TagInfo>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a TagInfo;
    type IntoIter = std::slice::Iter<'a, TagInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A run of text in one formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    /// The text; never contains a newline.
    pub text: String,
    /// Font family.
    pub font_family: String,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Size in pixels before the draw scale.
    pub px_size: f32,
    /// Forced color as `#rrggbb`.
    pub color: Option<String>,
    /// Tags the text was found inside.
    pub tags: TagSet,
    /// Alignment override for lines starting with this fragment.
    pub align: Option<Align>,
    /// Left edge after layout.
    pub x: f32,
    /// Top edge after layout.
    pub y: f32,
    /// Measured width after layout.
    pub width: f32,
    /// Measured height after layout.
    pub height: f32,
}

impl Fragment {
    /// Unformatted text in the given font.
    #[must_use]
    pub fn new(text: impl Into<String>, font_family: impl Into<String>, px_size: f32) -> Self {
        Self {
            text: text.into(),
            font_family: font_family.into(),
            bold: false,
            italic: false,
            px_size,
            color: None,
            tags: TagSet::new(),
            align: None,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    /// The same formatting with different text and no layout.
    #[must_use]
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            ..self.clone()
        }
    }

    /// Font used to measure and draw this fragment.
    #[must_use]
    pub fn font(&self, draw_scale: f32) -> FontAttributes {
        FontAttributes {
            family: self.font_family.clone(),
            bold: self.bold,
            italic: self.italic,
            px_size: self.px_size * draw_scale,
        }
    }

    /// Number of characters.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether two fragments can be merged into one: same family, weight,
    /// style, color, tags, alignment and size to one decimal.
    #[must_use]
    pub fn same_format(&self, other: &Self) -> bool {
        self.font_family == other.font_family
            && self.bold == other.bold
            && self.italic == other.italic
            && self.color == other.color
            && self.tags == other.tags
            && self.align == other.align
            && size_key(self.px_size) == size_key(other.px_size)
    }
}

/// Pixel size rounded to one decimal, as an integer count of tenths.
#[allow(clippy::cast_possible_truncation)]
fn size_key(px_size: f32) -> i64 {
    (px_size * 10.0).round() as i64
}

/// An explicit line break.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Linebreak {
    /// Pen position where the line ended.
    pub x: f32,
    /// Top of the line this break ends.
    pub y: f32,
}

/// One entry of rich text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    /// Formatted text.
    Fragment(Fragment),
    /// A line break; counts as one `\n` character.
    Linebreak(Linebreak),
}

impl Item {
    /// Character count; a line break counts as one.
    #[must_use]
    pub fn char_count(&self) -> usize {
        match self {
            Self::Fragment(f) => f.char_count(),
            Self::Linebreak(_) => 1,
        }
    }

    /// The fragment, if this is one.
    #[must_use]
    pub const fn as_fragment(&self) -> Option<&Fragment> {
        match self {
            Self::Fragment(f) => Some(f),
            Self::Linebreak(_) => None,
        }
    }

    /// Whether this is a line break.
    #[must_use]
    pub const fn is_linebreak(&self) -> bool {
        matches!(self, Self::Linebreak(_))
    }
}

impl From<Fragment> for Item {
    fn from(f: Fragment) -> Self {
        Self::Fragment(f)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("H9"), Some(9));
        assert_eq!(heading_level("h0"), None);
        assert_eq!(heading_level("h10"), None);
        assert_eq!(heading_level("hr"), None);
    }

    #[test]
    fn test_tag_set_order_and_dedup() {
        let set: TagSet = [
            TagInfo::block("h1"),
            TagInfo::inline("small"),
            TagInfo::block("h1"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
        let names: Vec<&str> = set.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["h1", "small"]);
        assert!(set.has_block());
        assert!(set.has_heading());
    }

    #[test]
    fn test_align_parsing() {
        assert_eq!(Align::from_str("CENTER"), Ok(Align::Center));
        assert_eq!(Align::from_str("justified"), Ok(Align::Justified));
        assert!(Align::from_str("middle").is_err());
        assert_eq!(Align::Right.to_string(), "right");
    }

    #[test]
    fn test_same_format_rounds_size() {
        let a = Fragment::new("a", "Sans", 12.01);
        let b = Fragment::new("b", "Sans", 12.04);
        let c = Fragment::new("c", "Sans", 12.2);
        assert!(a.same_format(&b));
        assert!(!a.same_format(&c));
    }
}
