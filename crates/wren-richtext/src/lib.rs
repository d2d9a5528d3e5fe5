//! Rich text for the wren pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **Fragment model**: formatted text runs and line breaks ([`Item`])
//! - **Markup conversion** ([`RichText::set_html`]) and plain text
//!   ([`RichText::set_text`])
//! - **Layout** ([`RichText::layout`]): greedy word wrap with a
//!   character-level fallback, left/center/right/justified alignment
//! - **Serialization** ([`RichText::html`]) that round-trips visible text
//!   and per-character formatting through [`RichText::set_html`]
//! - **Caret lookup** ([`RichText::character_index_to_offset`])
//!
//! Measurement goes through the [`FontMetrics`] trait; drawing is left to
//! the caller.

/// Markup to fragments.
pub mod convert;
/// Error types.
pub mod error;
/// Fragments, tags and alignment.
pub mod fragment;
/// Line breaking and alignment.
pub mod layout;
/// Text measurement interface.
pub mod metrics;
/// The rich-text container and editing.
pub mod rich_text;
/// Fragments to markup.
pub mod serialize;

pub use error::RichTextError;
pub use fragment::{Align, Fragment, Item, Linebreak, TagInfo, TagSet, heading_level};
pub use layout::{CaretPosition, LayoutInfo, LineInfo, split_parts};
pub use metrics::{ApproximateFontMetrics, FontAttributes, FontMetrics, TextExtent};
pub use rich_text::{RichText, simplify};
