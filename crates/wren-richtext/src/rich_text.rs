//! The rich-text container.

use std::fmt;
use std::sync::Arc;

use crate::error::RichTextError;
use crate::fragment::{Fragment, Item, Linebreak};
use crate::layout::LayoutInfo;
use crate::metrics::{ApproximateFontMetrics, FontAttributes, FontMetrics};

/// Formatted text as a flat list of fragments and line breaks, plus the
/// most recent layout of that list.
///
/// Every mutation discards the layout; position queries need a fresh
/// [`layout`](RichText::layout) call afterwards.
#[derive(Clone)]
pub struct RichText {
    pub(crate) font_family: String,
    pub(crate) px_size: f32,
    pub(crate) draw_scale: f32,
    pub(crate) metrics: Arc<dyn FontMetrics>,
    pub(crate) items: Vec<Item>,
    pub(crate) layout: Option<LayoutInfo>,
}

impl fmt::Debug for RichText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RichText")
            .field("font_family", &self.font_family)
            .field("px_size", &self.px_size)
            .field("draw_scale", &self.draw_scale)
            .field("items", &self.items)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl RichText {
    /// Empty text in the given default font, measured with
    /// [`ApproximateFontMetrics`].
    #[must_use]
    pub fn new(font_family: impl Into<String>, px_size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            px_size,
            draw_scale: 1.0,
            metrics: Arc::new(ApproximateFontMetrics),
            items: Vec::new(),
            layout: None,
        }
    }

    /// Multiply every font size by `scale` when measuring.
    #[must_use]
    pub fn with_draw_scale(mut self, scale: f32) -> Self {
        self.draw_scale = scale;
        self.layout = None;
        self
    }

    /// Measure with `metrics` instead of the approximation.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn FontMetrics>) -> Self {
        self.metrics = metrics;
        self.layout = None;
        self
    }

    /// Default font family.
    #[must_use]
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Default pixel size.
    #[must_use]
    pub const fn px_size(&self) -> f32 {
        self.px_size
    }

    /// Draw scale applied to every font size.
    #[must_use]
    pub const fn draw_scale(&self) -> f32 {
        self.draw_scale
    }

    /// The fragment list. Positions are valid only after a layout.
    #[must_use]
    pub fn fragments(&self) -> &[Item] {
        &self.items
    }

    /// Replace the fragment list as-is.
    pub fn set_fragments(&mut self, items: Vec<Item>) {
        self.items = items;
        self.invalidate();
    }

    /// Number of characters; each line break counts as one.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.items.iter().map(Item::char_count).sum()
    }

    /// Plain text, with `\n` for each line break.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.items {
            match item {
                Item::Fragment(f) => out.push_str(&f.text),
                Item::Linebreak(_) => out.push('\n'),
            }
        }
        out
    }

    /// An unformatted fragment in the default font.
    #[must_use]
    pub fn default_fragment(&self, text: impl Into<String>) -> Fragment {
        Fragment::new(text, self.font_family.clone(), self.px_size)
    }

    /// The default font at the current draw scale.
    pub(crate) fn default_font(&self) -> FontAttributes {
        self.default_fragment("").font(self.draw_scale)
    }

    /// Replace the content with plain text. Newlines become line breaks;
    /// nothing else is interpreted.
    pub fn set_text(&mut self, text: &str) {
        let template = self.default_fragment("");
        self.items = plain_items(&template, &text.replace("\r\n", "\n"));
        self.invalidate();
    }

    /// Merge adjacent fragments with the same formatting.
    pub fn simplify(&mut self) {
        self.items = simplify(std::mem::take(&mut self.items));
        self.invalidate();
    }

    /// Insert plain text before character `char_index`, in the formatting of
    /// the fragment found there (or the one just before it).
    ///
    /// # Errors
    ///
    /// [`RichTextError::IndexOutOfRange`] if `char_index` is past the end.
    pub fn insert_text(&mut self, char_index: usize, text: &str) -> Result<(), RichTextError> {
        let (index, offset) = self.locate(char_index)?;
        let template = self.template_at(index);
        let inserted = plain_items(&template, text);

        let at = if offset > 0 {
            if let Some(Item::Fragment(f)) = self.items.get_mut(index) {
                let split = byte_offset(&f.text, offset);
                let right = f.with_text(&f.text[split..]);
                f.text.truncate(split);
                self.items.insert(index + 1, right.into());
            }
            index + 1
        } else {
            index
        };
        let _ = self.items.splice(at..at, inserted);
        self.invalidate();
        Ok(())
    }

    /// Delete the characters in `start..end`.
    ///
    /// # Errors
    ///
    /// [`RichTextError::IndexOutOfRange`] if the range is reversed or ends
    /// past the end of the text.
    pub fn remove_range(&mut self, start: usize, end: usize) -> Result<(), RichTextError> {
        let len = self.char_count();
        if start > end || end > len {
            return Err(RichTextError::IndexOutOfRange {
                index: start.max(end),
                len,
            });
        }

        let mut pos = 0;
        let mut kept = Vec::with_capacity(self.items.len());
        for item in std::mem::take(&mut self.items) {
            let lo = pos;
            pos += item.char_count();
            if pos <= start || lo >= end {
                kept.push(item);
                continue;
            }
            if let Item::Fragment(mut f) = item {
                f.text = f
                    .text
                    .chars()
                    .enumerate()
                    .filter(|&(k, _)| lo + k < start || lo + k >= end)
                    .map(|(_, c)| c)
                    .collect();
                if !f.text.is_empty() {
                    kept.push(Item::Fragment(f));
                }
            }
        }
        self.items = kept;
        self.invalidate();
        Ok(())
    }

    /// Item index and character offset inside it for `char_index`. The end
    /// of the text maps to `(items.len(), 0)`.
    pub(crate) fn locate(&self, char_index: usize) -> Result<(usize, usize), RichTextError> {
        let mut pos = 0;
        for (i, item) in self.items.iter().enumerate() {
            let count = item.char_count();
            if char_index < pos + count {
                return Ok((i, char_index - pos));
            }
            pos += count;
        }
        if char_index == pos {
            Ok((self.items.len(), 0))
        } else {
            Err(RichTextError::IndexOutOfRange {
                index: char_index,
                len: pos,
            })
        }
    }

    /// Formatting for text inserted before item `index`.
    fn template_at(&self, index: usize) -> Fragment {
        let here = self.items.get(index).and_then(Item::as_fragment);
        let before = index
            .checked_sub(1)
            .and_then(|i| self.items.get(i))
            .and_then(Item::as_fragment);
        here.or(before)
            .map_or_else(|| self.default_fragment(""), |f| f.with_text(""))
    }

    pub(crate) fn invalidate(&mut self) {
        self.layout = None;
    }
}

/// Byte offset of the `chars`-th character of `text`.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

/// Items for plain text in one formatting: a fragment per line, separated by
/// line breaks. Empty lines produce no fragment.
fn plain_items(template: &Fragment, text: &str) -> Vec<Item> {
    let mut items = Vec::new();
    for (n, line) in text.split('\n').enumerate() {
        if n > 0 {
            items.push(Item::Linebreak(Linebreak::default()));
        }
        if !line.is_empty() {
            items.push(template.with_text(line).into());
        }
    }
    items
}

/// Merge adjacent fragments with the same formatting and drop empty ones.
/// Applying it twice gives the same list as applying it once.
#[must_use]
pub fn simplify(items: Vec<Item>) -> Vec<Item> {
    let mut out: Vec<Item> = Vec::with_capacity(items.len());
    for item in items {
        if let Item::Fragment(next) = &item {
            if next.text.is_empty() {
                continue;
            }
            if let Some(Item::Fragment(last)) = out.last_mut()
                && last.same_format(next)
            {
                last.text.push_str(&next.text);
                continue;
            }
        }
        out.push(item);
    }
    out
}
