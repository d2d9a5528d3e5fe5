//! Inline declaration splitting.
//!
//! A `style` attribute holds `name: value` pairs separated by `;`. Only
//! semicolons at the top level split: nesting inside `(…)` or `{…}` and
//! quoted strings (with `\` escapes) is tracked so that values like
//! `url(a;b)` stay whole.

use serde::Serialize;
use wren_common::warning::warn_once;

/// One `name: value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Property name, trimmed.
    pub name: String,
    /// Value, trimmed, with one layer of surrounding quotes removed.
    pub value: String,
}

impl Declaration {
    /// Create a declaration.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive property name check.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Split `text` at top-level semicolons.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth: usize = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(' | '{') => depth += 1,
            (None, ')' | '}') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                pieces.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
}

/// Remove one layer of matching surrounding quotes.
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value.strip_prefix(quote).and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

/// Split inline style text into declarations.
///
/// Empty pieces are skipped; a piece without `:` is dropped with a warning.
#[must_use]
pub fn split_declarations(css_text: &str) -> Vec<Declaration> {
    split_top_level(css_text)
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .filter_map(|piece| {
            let Some((name, value)) = piece.split_once(':') else {
                warn_once("CSS", &format!("declaration without ':' ignored: {piece}"));
                return None;
            };
            Some(Declaration::new(name.trim(), strip_quotes(value.trim())))
        })
        .collect()
}
