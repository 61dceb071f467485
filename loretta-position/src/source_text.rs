//! The owning wrapper around a piece of Lua source, paired with its
//! [`LineIndex`].

use crate::error::RangeError;
use crate::line_index::LineIndex;
use crate::span::{LinePosition, TextSpan};
use std::fmt;
use std::sync::Arc;

/// A single line of source text, as returned by [`SourceText::lines`].
///
/// `end_including_break` always points past the line's terminator (or past
/// its content, for a terminator-less final line); `text` holds the
/// terminator only when it was included via `include_break`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    /// The line's own text.
    pub text: String,
    /// Byte offset of the first character of the line.
    pub start: u32,
    /// Byte offset just past the line's terminator (or its content, if
    /// there is none).
    pub end_including_break: u32,
}

impl TextLine {
    /// Validates that `span` begins at a line start and ends at a line end
    /// (with or without the terminator), returning the corresponding
    /// `TextLine`. When `expand_to_break` is set and `span` ends exactly at
    /// the line's content (excluding its terminator), the terminator is
    /// folded into the returned line's text.
    pub fn from_span(
        source: &SourceText,
        span: TextSpan,
        expand_to_break: bool,
    ) -> Result<TextLine, RangeError> {
        let index = source.line_index();
        let line = index.line_number(span.start)?;
        let line_start = index.line_start(line).ok_or(RangeError::SpanDoesNotIncludeStartOfLine)?;
        if line_start != span.start {
            return Err(RangeError::SpanDoesNotIncludeStartOfLine);
        }

        let end_excl = index
            .line_end_excluding_break(line)
            .ok_or(RangeError::SpanDoesNotIncludeEndOfLine)?;
        let end_incl = index
            .line_end_including_break(line)
            .ok_or(RangeError::SpanDoesNotIncludeEndOfLine)?;

        let (text_end, end_including_break) = if span.end() == end_excl {
            if expand_to_break { (end_incl, end_incl) } else { (end_excl, end_incl) }
        } else if span.end() == end_incl {
            (end_incl, end_incl)
        } else {
            return Err(RangeError::SpanDoesNotIncludeEndOfLine);
        };

        let text = source.substring(TextSpan::from_bounds(span.start, text_end))?.to_string();
        Ok(TextLine { text, start: span.start, end_including_break })
    }
}

/// Immutable source text with an attached [`LineIndex`].
///
/// Cheaply cloneable: the underlying buffer is reference-counted so green
/// tokens and diagnostics can hold a `SourceText` without copying the
/// source.
#[derive(Clone)]
pub struct SourceText {
    text: Arc<str>,
    line_index: Arc<LineIndex>,
}

impl SourceText {
    /// Wraps `text`, building its line index eagerly.
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        let text = text.into();
        let line_index = Arc::new(LineIndex::new(&text));
        Self { text, line_index }
    }

    /// Length of the source in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// True if the source text is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Borrows the full source text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Borrows the line index.
    #[inline]
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Extracts the text covered by `span`.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::OffsetOutOfRange`] if the span falls outside
    /// the text, or if `span.start`/`span.end()` do not land on a UTF-8
    /// character boundary.
    pub fn substring(&self, span: TextSpan) -> Result<&str, RangeError> {
        let range = span.to_range();
        self.text.get(range).ok_or(RangeError::OffsetOutOfRange { offset: span.end() as usize, len: self.len() })
    }

    /// Converts a byte offset into a `(line, UTF-16 column)` position.
    pub fn line_position(&self, offset: u32) -> Result<LinePosition, RangeError> {
        let (line, _) = self.line_index.offset_to_position(offset)?;
        let character = self.line_index.utf16_character(&self.text, offset)?;
        Ok(LinePosition::new(line as u32, character))
    }

    /// Returns every line of the source, in order, excluding terminators.
    pub fn lines(&self) -> Vec<TextLine> {
        let index = &self.line_index;
        (0..index.line_count())
            .map(|line| {
                let start = index.line_start(line).unwrap_or(0);
                let end = index.line_end_excluding_break(line).unwrap_or(start);
                TextLine {
                    text: self.text[start as usize..end as usize].to_string(),
                    start,
                    end_including_break: index.line_end_including_break(line).unwrap_or(end),
                }
            })
            .collect()
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceText").field("len", &self.len()).finish()
    }
}

impl PartialEq for SourceText {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        SourceText::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        SourceText::new(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lines_round_trip() {
        let source = SourceText::new("local x = 1\nprint(x)\n");
        let lines = source.lines();
        assert_eq!(lines.len(), 3); // trailing empty line after the final \n
        assert_eq!(lines[0].text, "local x = 1");
        assert_eq!(lines[1].text, "print(x)");
        assert_eq!(lines[2].text, "");
    }

    #[test]
    fn line_position_counts_utf16() {
        let source = SourceText::new("x = \"héllo\"\ny = 1");
        let pos = source.line_position(12).unwrap();
        assert_eq!(pos.line, 1);
    }

    #[test]
    fn from_span_requires_line_boundaries() {
        let source = SourceText::new("aaa\nbbb\n");
        let ok = TextLine::from_span(&source, TextSpan::from_bounds(0, 3), false).unwrap();
        assert_eq!(ok.text, "aaa");

        let bad = TextLine::from_span(&source, TextSpan::from_bounds(1, 3), false);
        assert!(bad.is_err());
    }

    #[test]
    fn from_span_can_expand_to_break() {
        let source = SourceText::new("aaa\nbbb\n");
        let line = TextLine::from_span(&source, TextSpan::from_bounds(0, 3), true).unwrap();
        assert_eq!(line.text, "aaa\n");
        assert_eq!(line.end_including_break, 4);
    }

    #[test]
    fn substring_out_of_range() {
        let source = SourceText::new("abc");
        assert!(source.substring(TextSpan::from_bounds(0, 10)).is_err());
    }
}
