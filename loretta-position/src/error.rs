//! Structural errors raised by the position-tracking APIs.
//!
//! These are *programmer* errors in the taxonomy sense (spec §7 item a):
//! callers passed an offset or span that cannot exist for the given source
//! text. The lexer and parser never raise these against user input; they
//! only fire when client code of this crate misuses the API.

use thiserror::Error;

/// Raised by [`crate::LineIndex`] and [`crate::SourceText`] APIs when given
/// an out-of-range offset or a span that does not align to line
/// boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// An offset fell outside `0..=text.len()`.
    #[error("offset {offset} is out of range for text of length {len}")]
    OffsetOutOfRange {
        /// The offending offset.
        offset: usize,
        /// Length of the source text in bytes.
        len: usize,
    },

    /// A line number fell outside the known line range.
    #[error("line {line} is out of range ({count} lines)")]
    LineOutOfRange {
        /// The offending line number.
        line: usize,
        /// Number of lines in the index.
        count: usize,
    },

    /// `TextLine::from_span` was given a span that does not start at a
    /// line start.
    #[error("span does not include start of line")]
    SpanDoesNotIncludeStartOfLine,

    /// `TextLine::from_span` was given a span that does not end at a line
    /// end (with or without the terminator).
    #[error("span does not include end of line")]
    SpanDoesNotIncludeEndOfLine,
}
