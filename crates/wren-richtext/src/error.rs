//! Errors for rich-text queries.

use thiserror::Error;

/// Error type for [`RichText`](crate::RichText) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RichTextError {
    /// Position lookup without a current layout. Any mutation discards the
    /// previous layout.
    #[error("no current layout; call layout() first")]
    NotLaidOut,
    /// A character index past the end of the text.
    #[error("character index {index} out of range for text of length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of characters in the text.
        len: usize,
    },
}
