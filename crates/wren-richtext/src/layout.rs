//! Word-wrapping layout.
//!
//! Fragments are placed left to right on lines no wider than `max_width`.
//! The wrap unit is a "part": a run of text ending right after whitespace or
//! one of `,.:;!'"-=?` (see [`split_parts`]). Whole parts are placed greedily,
//! and whitespace ending a part may hang past the right edge;
//! a fragment whose first part does not fit on a non-empty line moves to a
//! new line; a part that does not fit even on an empty line is cut at the
//! widest character count that fits (at least one character, so layout
//! always makes progress).
//!
//! Wrapping splits fragments but never changes the text. Explicit
//! [`Linebreak`]s end lines; soft wraps insert nothing.

use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;
use wren_common::warning::warn_once;

use crate::error::RichTextError;
use crate::fragment::{Align, Fragment, Item, Linebreak};
use crate::metrics::{FontMetrics, TextExtent};
use crate::rich_text::{RichText, byte_offset, simplify};

/// Characters a part may end with besides whitespace.
const WRAP_PUNCTUATION: &[char] = &[',', '.', ':', ';', '!', '\'', '"', '-', '=', '?'];

/// Split `text` into wrap candidates. Each part ends right after whitespace
/// or wrap punctuation; a trailing run without one is its own part.
#[must_use]
pub fn split_parts(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() || WRAP_PUNCTUATION.contains(&c) {
            let end = i + c.len_utf8();
            parts.push(&text[start..end]);
            start = end;
        }
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

/// One laid-out line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineInfo {
    /// Indices of the line's fragments in [`RichText::fragments`]. A line
    /// break ending the line sits at `range.end` and is not included.
    pub range: Range<usize>,
    /// Top of the line.
    pub y: f32,
    /// Height: the tallest fragment, or a space in the default font.
    pub height: f32,
    /// Width used before alignment.
    pub width: f32,
}

/// Result of the most recent layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutInfo {
    /// Widest line.
    pub width: f32,
    /// Sum of line heights.
    pub height: f32,
    /// Lines in order.
    pub lines: Vec<LineInfo>,
    /// Line number for every item (a line break belongs to the line it ends).
    #[serde(skip)]
    item_lines: Vec<usize>,
}

/// Where to draw a caret.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaretPosition {
    /// Left edge of the character.
    pub x: f32,
    /// Top of the character's line.
    pub y: f32,
    /// Height of that line.
    pub line_height: f32,
}

struct LineBuilder {
    metrics: Arc<dyn FontMetrics>,
    draw_scale: f32,
    space_height: f32,
    max_width: Option<f32>,
    align_if_none: Option<Align>,
    out: Vec<Item>,
    lines: Vec<LineInfo>,
    line_start: usize,
    x: f32,
    y: f32,
    line_height: f32,
    layout_width: f32,
}

impl LineBuilder {
    fn new(text: &RichText, max_width: Option<f32>, align_if_none: Option<Align>) -> Self {
        let space_height = text.metrics.measure(" ", &text.default_font()).height;
        Self {
            metrics: Arc::clone(&text.metrics),
            draw_scale: text.draw_scale,
            space_height,
            max_width,
            align_if_none,
            out: Vec::new(),
            lines: Vec::new(),
            line_start: 0,
            x: 0.0,
            y: 0.0,
            line_height: 0.0,
            layout_width: 0.0,
        }
    }

    fn measure(&self, fragment: &Fragment, text: &str) -> TextExtent {
        self.metrics.measure(text, &fragment.font(self.draw_scale))
    }

    fn line_is_empty(&self) -> bool {
        self.out.len() == self.line_start
    }

    /// Alignment of the line starting at `start`: the first fragment's own
    /// override, else the caller's default.
    fn line_align(&self, start: usize) -> Option<Align> {
        self.out
            .get(start)
            .and_then(Item::as_fragment)
            .and_then(|f| f.align)
            .or(self.align_if_none)
    }

    /// Put `text` (in `fragment`'s formatting) at the pen.
    fn place(&mut self, fragment: &Fragment, text: &str) {
        let extent = self.measure(fragment, text);
        let mut piece = fragment.with_text(text);
        piece.x = self.x;
        piece.y = self.y;
        piece.width = extent.width;
        piece.height = extent.height;
        self.out.push(piece.into());
        self.x += extent.width;
        self.line_height = self.line_height.max(extent.height);
    }

    /// Bytes of `text` covered by the whole parts that fit in `available`.
    /// Trailing whitespace may hang past the line end.
    fn fitting_prefix(&self, fragment: &Fragment, text: &str, available: f32) -> usize {
        let mut fit = 0;
        let mut end = 0;
        for part in split_parts(text) {
            end += part.len();
            if self.measure(fragment, text[..end].trim_end()).width <= available {
                fit = end;
            } else {
                break;
            }
        }
        fit
    }

    /// Bytes of the longest prefix of `text`'s first part that fits in
    /// `available`, but at least one character. Halves the candidate
    /// length while half still does not fit, then steps down one
    /// character at a time.
    fn hard_split(&self, fragment: &Fragment, text: &str, available: f32) -> usize {
        let fits = |chars: usize| {
            self.measure(fragment, &text[..byte_offset(text, chars)]).width <= available
        };
        let mut chars = split_parts(text)
            .first()
            .map_or(1, |part| part.chars().count())
            .max(1);
        while chars > 1 && !fits(chars) {
            if fits(chars / 2) {
                chars -= 1;
            } else {
                chars /= 2;
            }
        }
        byte_offset(text, chars)
    }

    fn place_fragment(&mut self, fragment: &Fragment) {
        let text = fragment.text.as_str();
        let mut start = 0;
        while start < text.len() {
            let remaining = &text[start..];
            let Some(max_width) = self.max_width else {
                self.place(fragment, remaining);
                return;
            };

            // STEP 1: Take as many whole parts as fit on this line.
            let available = max_width - self.x;
            let fit = self.fitting_prefix(fragment, remaining, available);
            if fit == remaining.len() {
                self.place(fragment, remaining);
                return;
            }
            if fit > 0 {
                self.place(fragment, &remaining[..fit]);
                start += fit;
                self.finish_line(false);
                continue;
            }

            // STEP 2: Nothing fits; retry on a fresh line.
            if !self.line_is_empty() {
                self.finish_line(false);
                continue;
            }

            // STEP 3: Not even one part fits on an empty line; cut it.
            let cut = self.hard_split(fragment, remaining, available);
            if self.measure(fragment, &remaining[..cut]).width > available {
                warn_once(
                    "Layout",
                    &format!("'{}' is wider than a {max_width}px line", &remaining[..cut]),
                );
            }
            self.place(fragment, &remaining[..cut]);
            start += cut;
            if start < text.len() {
                self.finish_line(false);
            }
        }
    }

    fn line_break(&mut self) {
        let marker = Linebreak {
            x: self.x,
            y: self.y,
        };
        self.finish_line(true);
        self.out.push(Item::Linebreak(marker));
        self.line_start = self.out.len();
    }

    /// Close the current line. `ends_paragraph` is true for lines ended by a
    /// line break or the end of the text, which are never justified.
    fn finish_line(&mut self, ends_paragraph: bool) {
        let mut width = self.x;
        if !ends_paragraph
            && let Some(max_width) = self.max_width
            && self.line_align(self.line_start) == Some(Align::Justified)
        {
            width = self.justify(max_width);
        }

        let height = if self.line_height > 0.0 {
            self.line_height
        } else {
            self.space_height
        };
        self.lines.push(LineInfo {
            range: self.line_start..self.out.len(),
            y: self.y,
            height,
            width,
        });
        self.layout_width = self.layout_width.max(width);
        self.y += height;
        self.x = 0.0;
        self.line_height = 0.0;
        self.line_start = self.out.len();
    }

    /// Re-place the current line's fragments part by part, spreading the
    /// spare width evenly across the gaps. Returns the new line width, not
    /// counting trailing whitespace.
    fn justify(&mut self, max_width: f32) -> f32 {
        let line: Vec<Item> = self.out.drain(self.line_start..).collect();
        let mut pieces: Vec<Fragment> = Vec::new();
        for fragment in line.iter().filter_map(Item::as_fragment) {
            for part in split_parts(&fragment.text) {
                let extent = self.measure(fragment, part);
                let mut piece = fragment.with_text(part);
                piece.y = fragment.y;
                piece.width = extent.width;
                piece.height = extent.height;
                pieces.push(piece);
            }
        }

        let natural: f32 = pieces.iter().map(|p| p.width).sum();
        let trailing_space = pieces.last().map_or(0.0, |last| {
            last.width - self.measure(last, last.text.trim_end()).width
        });
        let gaps = pieces.len().saturating_sub(1);
        let extra = if gaps > 0 {
            (max_width - (natural - trailing_space)).max(0.0)
        } else {
            0.0
        };

        let mut x = 0.0;
        for (k, piece) in pieces.iter_mut().enumerate() {
            piece.x = if gaps > 0 {
                x + extra * k as f32 / gaps as f32
            } else {
                x
            };
            x += piece.width;
        }
        self.out.extend(pieces.into_iter().map(Item::Fragment));
        if gaps > 0 {
            max_width.max(natural - trailing_space)
        } else {
            natural
        }
    }

    /// Apply center/right alignment and index lines.
    fn finish(mut self) -> (Vec<Item>, LayoutInfo) {
        let target = self.max_width.unwrap_or(self.layout_width);
        for line in &self.lines {
            let align = self.line_align(line.range.start);
            if !matches!(align, Some(Align::Center | Align::Right)) || line.range.is_empty() {
                continue;
            }
            let used: f32 = self.out[line.range.clone()]
                .iter()
                .filter_map(Item::as_fragment)
                .map(|f| f.width)
                .sum();
            let shift = (target - used).max(0.0);
            let dx = if align == Some(Align::Center) {
                (shift / 2.0).floor()
            } else {
                shift
            };
            // A soft-wrapped line ends where the next begins; only a line
            // break at `range.end` belongs to this line.
            let end = match self.out.get(line.range.end) {
                Some(Item::Linebreak(_)) => line.range.end + 1,
                _ => line.range.end,
            };
            for item in &mut self.out[line.range.start..end] {
                match item {
                    Item::Fragment(f) => f.x += dx,
                    Item::Linebreak(lb) => lb.x += dx,
                }
            }
        }

        let mut item_lines = vec![0; self.out.len()];
        for (number, line) in self.lines.iter().enumerate() {
            for slot in &mut item_lines[line.range.clone()] {
                *slot = number;
            }
            if let Some(slot) = item_lines.get_mut(line.range.end) {
                *slot = number;
            }
        }

        let info = LayoutInfo {
            width: self.layout_width,
            height: self.y,
            lines: self.lines,
            item_lines,
        };
        (self.out, info)
    }
}

impl RichText {
    /// Lay the text out in lines no wider than `max_width` (unbounded when
    /// `None`), aligning lines without their own override by
    /// `align_if_none`. Fragments are merged first.
    ///
    /// Returns the widest line's width and the total height.
    pub fn layout(&mut self, max_width: Option<f32>, align_if_none: Option<Align>) -> (f32, f32) {
        let items = simplify(std::mem::take(&mut self.items));
        let ends_with_break = items.last().is_some_and(Item::is_linebreak);

        let mut builder = LineBuilder::new(self, max_width, align_if_none);
        for item in &items {
            match item {
                Item::Linebreak(_) => builder.line_break(),
                Item::Fragment(fragment) => builder.place_fragment(fragment),
            }
        }
        if !builder.line_is_empty() || ends_with_break {
            builder.finish_line(true);
        }

        let (out, info) = builder.finish();
        let size = (info.width, info.height);
        self.items = out;
        self.layout = Some(info);
        size
    }

    /// The current layout, if the text has not changed since.
    #[must_use]
    pub const fn layout_info(&self) -> Option<&LayoutInfo> {
        self.layout.as_ref()
    }

    /// Lines of the current layout; empty without one.
    #[must_use]
    pub fn lines(&self) -> &[LineInfo] {
        self.layout
            .as_ref()
            .map(|info| info.lines.as_slice())
            .unwrap_or_default()
    }

    /// Caret position before character `char_index` (line breaks count as
    /// one character). `char_count()` is valid and gives the end of the text.
    ///
    /// # Errors
    ///
    /// [`RichTextError::NotLaidOut`] without a current layout;
    /// [`RichTextError::IndexOutOfRange`] past the end of the text.
    pub fn character_index_to_offset(
        &self,
        char_index: usize,
    ) -> Result<CaretPosition, RichTextError> {
        let info = self.layout.as_ref().ok_or(RichTextError::NotLaidOut)?;
        let (index, offset) = self.locate(char_index)?;
        let line_height = |item: usize| {
            info.item_lines
                .get(item)
                .and_then(|&line| info.lines.get(line))
                .map_or(0.0, |line| line.height)
        };

        let position = match self.items.get(index) {
            Some(Item::Fragment(f)) => {
                let prefix = &f.text[..byte_offset(&f.text, offset)];
                CaretPosition {
                    x: f.x + self.metrics.measure(prefix, &f.font(self.draw_scale)).width,
                    y: f.y,
                    line_height: line_height(index),
                }
            }
            Some(Item::Linebreak(lb)) => CaretPosition {
                x: lb.x,
                y: lb.y,
                line_height: line_height(index),
            },
            // End of text.
            None => match (self.items.last(), info.lines.last()) {
                (Some(Item::Fragment(f)), _) => CaretPosition {
                    x: f.x + f.width,
                    y: f.y,
                    line_height: line_height(index - 1),
                },
                (Some(Item::Linebreak(_)), Some(line)) => CaretPosition {
                    x: 0.0,
                    y: line.y,
                    line_height: line.height,
                },
                _ => CaretPosition {
                    x: 0.0,
                    y: 0.0,
                    line_height: self.metrics.measure(" ", &self.default_font()).height,
                },
            },
        };
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_parts() {
        assert_eq!(split_parts("aaaa bbbb"), vec!["aaaa ", "bbbb"]);
        assert_eq!(split_parts("a,b.c"), vec!["a,", "b.", "c"]);
        assert_eq!(split_parts("well-known  x"), vec!["well-", "known ", " ", "x"]);
        assert_eq!(split_parts("end."), vec!["end."]);
        assert!(split_parts("").is_empty());
    }

    #[test]
    fn test_split_parts_covers_text() {
        let text = "Hello, w\u{f6}rld! How's it going?yes";
        assert_eq!(split_parts(text).concat(), text);
    }
}
