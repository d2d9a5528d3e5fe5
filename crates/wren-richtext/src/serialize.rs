//! Fragments back to markup.
//!
//! Each item looks only at its neighbors. A fragment's formatting is a list
//! of layers: recorded tags outermost first, then bold, italic and color.
//! Formatting layers the previous fragment already had keep that fragment's
//! order, so a span opened before a `<b>` stays open around it. A fragment
//! opens the layers past the prefix it shares with the previous item and
//! closes, innermost first, the layers past the prefix it shares with the
//! next one. Bold implied by a heading is not written.

use wren_html::escape_text;

use crate::fragment::{Fragment, Item};
use crate::rich_text::RichText;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Layer {
    Tag(String),
    Bold,
    Italic,
    Color(String),
}

impl Layer {
    fn open(&self) -> String {
        match self {
            Self::Tag(name) => format!("<{name}>"),
            Self::Bold => "<b>".to_string(),
            Self::Italic => "<i>".to_string(),
            Self::Color(color) => format!("<span style='color:{color}'>"),
        }
    }

    fn close(&self) -> String {
        match self {
            Self::Tag(name) => format!("</{name}>"),
            Self::Bold => "</b>".to_string(),
            Self::Italic => "</i>".to_string(),
            Self::Color(_) => "</span>".to_string(),
        }
    }
}

/// Layers of `fragment`, with formatting layers also open in `prev` first
/// and in `prev`'s order.
fn fragment_layers(fragment: &Fragment, prev: &[Layer]) -> Vec<Layer> {
    let mut formatting = Vec::new();
    if fragment.bold && !fragment.tags.has_heading() {
        formatting.push(Layer::Bold);
    }
    if fragment.italic {
        formatting.push(Layer::Italic);
    }
    if let Some(color) = &fragment.color {
        formatting.push(Layer::Color(color.clone()));
    }

    let mut layers: Vec<Layer> = fragment
        .tags
        .iter()
        .map(|tag| Layer::Tag(tag.name.clone()))
        .collect();
    for layer in prev {
        if let Some(at) = formatting.iter().position(|f| f == layer) {
            layers.push(formatting.remove(at));
        }
    }
    layers.extend(formatting);
    layers
}

fn layers(item: Option<&Item>, prev: &[Layer]) -> Vec<Layer> {
    item.and_then(Item::as_fragment)
        .map(|f| fragment_layers(f, prev))
        .unwrap_or_default()
}

fn shared_prefix(a: &[Layer], b: &[Layer]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

fn has_block_tag(item: Option<&Item>) -> bool {
    item.and_then(Item::as_fragment)
        .is_some_and(|f| f.tags.has_block())
}

impl Item {
    /// Markup for this item given its neighbors.
    ///
    /// A line break is left out when the previous fragment is in a block
    /// tag, or when it sits between a fragment and a block-tagged fragment;
    /// block tags already break the line when parsed back.
    #[must_use]
    pub fn to_html(&self, prev: Option<&Self>, next: Option<&Self>) -> String {
        let before = layers(prev, &[]);
        let mine = layers(Some(self), &before);
        let after = layers(next, &mine);
        self.write_html(prev, next, [before.as_slice(), mine.as_slice(), after.as_slice()])
    }

    /// `context` holds the previous item's, this item's and the next item's
    /// layers, each ordered after the one before it.
    fn write_html(
        &self,
        prev: Option<&Self>,
        next: Option<&Self>,
        context: [&[Layer]; 3],
    ) -> String {
        let [before, mine, after] = context;
        let Self::Fragment(fragment) = self else {
            let prev_is_fragment = prev.is_some_and(|p| !p.is_linebreak());
            let redundant =
                has_block_tag(prev) || (prev_is_fragment && has_block_tag(next));
            return if redundant {
                String::new()
            } else {
                "<br/>".to_string()
            };
        };

        let open_from = shared_prefix(before, mine);
        let close_from = shared_prefix(mine, after);

        let mut out = String::new();
        for layer in &mine[open_from..] {
            out.push_str(&layer.open());
        }
        out.push_str(&escape_text(&fragment.text));
        for layer in mine[close_from..].iter().rev() {
            out.push_str(&layer.close());
        }
        out
    }
}

impl RichText {
    /// Markup reproducing the visible text and per-character formatting.
    #[must_use]
    pub fn html(&self) -> String {
        let items = &self.items;
        let mut chain: Vec<Vec<Layer>> = Vec::with_capacity(items.len());
        for item in items {
            let prev = chain.last().map(Vec::as_slice).unwrap_or_default();
            let next = layers(Some(item), prev);
            chain.push(next);
        }

        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            let prev = i.checked_sub(1).and_then(|p| items.get(p));
            let before = i.checked_sub(1).map_or(&[][..], |p| chain[p].as_slice());
            let after = chain.get(i + 1).map_or(&[][..], Vec::as_slice);
            let context = [before, chain[i].as_slice(), after];
            out.push_str(&item.write_html(prev, items.get(i + 1), context));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{Linebreak, TagInfo};

    fn fragment(text: &str) -> Fragment {
        Fragment::new(text, "Sans", 12.0)
    }

    #[test]
    fn test_shared_prefix() {
        let a = [Layer::Tag("h1".into()), Layer::Italic];
        let b = [Layer::Tag("h1".into()), Layer::Bold];
        assert_eq!(shared_prefix(&a, &b), 1);
        assert_eq!(shared_prefix(&a, &[]), 0);
    }

    #[test]
    fn test_layers_skip_heading_bold() {
        let mut f = fragment("T");
        f.bold = true;
        f.tags.insert(TagInfo::block("h1"));
        assert_eq!(fragment_layers(&f, &[]), vec![Layer::Tag("h1".into())]);
    }

    #[test]
    fn test_layers_follow_previous_order() {
        let mut f = fragment("b");
        f.bold = true;
        f.color = Some("#ff0000".into());
        assert_eq!(
            fragment_layers(&f, &[]),
            vec![Layer::Bold, Layer::Color("#ff0000".into())]
        );
        assert_eq!(
            fragment_layers(&f, &[Layer::Color("#ff0000".into())]),
            vec![Layer::Color("#ff0000".into()), Layer::Bold]
        );
    }

    #[test]
    fn test_break_omitted_after_block() {
        let mut heading = fragment("T");
        heading.tags.insert(TagInfo::block("h2"));
        let heading = Item::Fragment(heading);
        let plain = Item::Fragment(fragment("x"));
        let lb = Item::Linebreak(Linebreak::default());

        assert_eq!(lb.to_html(Some(&heading), Some(&plain)), "");
        assert_eq!(lb.to_html(Some(&plain), Some(&heading)), "");
        assert_eq!(lb.to_html(None, Some(&heading)), "<br/>");
        assert_eq!(lb.to_html(Some(&lb), Some(&heading)), "<br/>");
        assert_eq!(lb.to_html(Some(&plain), Some(&plain)), "<br/>");
    }
}
