//! Text measurement.
//!
//! Layout never looks at glyphs itself; it asks a [`FontMetrics`]
//! implementation for the extent of a string in a given font. Measurement
//! may be shared between independent layouts on different threads, so
//! implementations must be `Send + Sync`.

use serde::Serialize;

/// The font a run of text is drawn in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontAttributes {
    /// Font family name.
    pub family: String,
    /// Bold weight.
    pub bold: bool,
    /// Italic style.
    pub italic: bool,
    /// Size in pixels, draw scale already applied.
    pub px_size: f32,
}

/// Rendered size of a string.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TextExtent {
    /// Advance width in pixels.
    pub width: f32,
    /// Line height in pixels.
    pub height: f32,
}

/// Font metrics interface for text measurement during layout.
///
/// Implementors sum per-glyph advances for the width and report the font's
/// line height. The width of a prefix must never exceed the width of the
/// whole string.
pub trait FontMetrics: Send + Sync {
    /// Measure `text` drawn in `font`.
    fn measure(&self, text: &str, font: &FontAttributes) -> TextExtent;
}

/// Approximate font metrics using fixed ratios.
///
/// Without font data, the average advance of Latin glyphs in a proportional
/// font is taken as 0.6 em (bold 10% wider) and the line height as 1.2 em.
/// Used when no real font is available, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl ApproximateFontMetrics {
    /// Advance per character as a fraction of the font size.
    pub const CHAR_WIDTH_RATIO: f32 = 0.6;
    /// Extra advance for bold text.
    pub const BOLD_WIDTH_FACTOR: f32 = 1.1;
    /// Line height as a fraction of the font size.
    pub const LINE_HEIGHT_RATIO: f32 = 1.2;
}

impl FontMetrics for ApproximateFontMetrics {
    fn measure(&self, text: &str, font: &FontAttributes) -> TextExtent {
        let mut advance = font.px_size * Self::CHAR_WIDTH_RATIO;
        if font.bold {
            advance *= Self::BOLD_WIDTH_FACTOR;
        }
        TextExtent {
            width: text.chars().count() as f32 * advance,
            height: font.px_size * Self::LINE_HEIGHT_RATIO,
        }
    }
}
