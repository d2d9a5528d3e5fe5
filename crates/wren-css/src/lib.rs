//! Inline style handling for the wren pipeline.
//!
//! # Scope
//!
//! This crate implements:
//! - **Declaration splitting** ([`split_declarations`]): `style="…"` text into
//!   name/value pairs, aware of parentheses, braces and quotes
//! - **Color resolution** ([`resolve_color`]): named and hex colors to a
//!   canonical `#rrggbb` string, never failing
//! - **Strict color values** ([`ColorValue`]): a `FromStr` constructor that
//!   reports clearly invalid literals
//! - **Element text color** ([`element_text_color`])
//!
//! # Not Supported
//!
//! - Stylesheets, selectors, the cascade
//! - Any property other than `color` is split but not interpreted

/// Color values and resolution.
pub mod color;
/// Splitting of inline `style` attribute text.
pub mod declarations;
/// Text color lookup on elements.
pub mod text_color;

pub use color::{ColorParseError, ColorValue, NamedColor, resolve_color};
pub use declarations::{Declaration, split_declarations};
pub use text_color::{element_text_color, markup_text_color};
