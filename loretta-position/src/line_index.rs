//! Line-start index over a block of source text.
//!
//! Built with a single forward pass recognizing `\n`, `\r`, the combined
//! `\r\n` pair, and the Unicode line/paragraph separators `U+2028` /
//! `U+2029`. Offsets throughout this crate are byte offsets into the UTF-8
//! source rather than UTF-16 code units — the idiomatic choice for a Rust
//! front end — but [`LineIndex::utf16_character`] is provided for callers
//! (e.g. an LSP layer) that need UTF-16 columns.

use crate::error::RangeError;

/// Maps byte offsets to `(line, column)` pairs and back.
///
/// # Invariants
///
/// - `starts[0] == 0`
/// - `starts` is strictly increasing
/// - `starts.last().unwrap() <= text.len()`, and the final entry's "break
///   length" is always `0` (the last line has no terminator, or the text
///   does not end in one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<u32>,
    break_lens: Vec<u8>,
    text_len: u32,
}

impl LineIndex {
    /// Builds a line index over `text` in a single pass.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut starts = vec![0u32];
        let mut break_lens = Vec::new();
        let mut i = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    break_lens.push(1);
                    i += 1;
                    starts.push(i as u32);
                }
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        break_lens.push(2);
                        i += 2;
                    } else {
                        break_lens.push(1);
                        i += 1;
                    }
                    starts.push(i as u32);
                }
                0xE2 if bytes.get(i + 1) == Some(&0x80)
                    && matches!(bytes.get(i + 2), Some(0xA8) | Some(0xA9)) =>
                {
                    break_lens.push(3);
                    i += 3;
                    starts.push(i as u32);
                }
                _ => i += 1,
            }
        }
        break_lens.push(0);
        Self { starts, break_lens, text_len: text.len() as u32 }
    }

    /// Number of lines (always at least 1, even for empty text).
    #[inline]
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Byte offset of the start of `line`, or `None` if out of range.
    #[inline]
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.starts.get(line).copied()
    }

    /// Length in bytes of the line terminator ending `line` (`0` for the
    /// last line, `1` for `\n`/`\r`, `2` for `\r\n`, `3` for a Unicode
    /// line/paragraph separator).
    #[inline]
    pub fn line_break_len(&self, line: usize) -> Option<u8> {
        self.break_lens.get(line).copied()
    }

    /// Byte offset just past the end of `line`'s content, excluding its
    /// terminator.
    pub fn line_end_excluding_break(&self, line: usize) -> Option<u32> {
        let next = self.starts.get(line + 1).copied().unwrap_or(self.text_len);
        let break_len = self.line_break_len(line)? as u32;
        Some(next - break_len)
    }

    /// Byte offset just past the end of `line`'s terminator (or its
    /// content, if it has none).
    pub fn line_end_including_break(&self, line: usize) -> Option<u32> {
        if line >= self.starts.len() {
            return None;
        }
        Some(self.starts.get(line + 1).copied().unwrap_or(self.text_len))
    }

    /// The line number containing `offset`, found by binary search.
    ///
    /// # Errors
    ///
    /// Returns [`RangeError::OffsetOutOfRange`] if `offset > text.len()`.
    pub fn line_number(&self, offset: u32) -> Result<usize, RangeError> {
        if offset > self.text_len {
            return Err(RangeError::OffsetOutOfRange { offset: offset as usize, len: self.text_len as usize });
        }
        Ok(match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insertion) => insertion - 1,
        })
    }

    /// Converts a byte offset to a `(line, byte-column)` pair. The column
    /// is a byte offset within the line, not a character count; use
    /// [`LineIndex::utf16_character`] for UTF-16 columns.
    pub fn offset_to_position(&self, offset: u32) -> Result<(usize, u32), RangeError> {
        let line = self.line_number(offset)?;
        let start = self.starts[line];
        Ok((line, offset - start))
    }

    /// Converts a byte offset to a UTF-16 column within its line. Requires
    /// the originating source text to re-derive character boundaries.
    pub fn utf16_character(&self, text: &str, offset: u32) -> Result<u32, RangeError> {
        let line = self.line_number(offset)?;
        let start = self.starts[line] as usize;
        let slice = text.get(start..offset as usize).ok_or(RangeError::OffsetOutOfRange {
            offset: offset as usize,
            len: self.text_len as usize,
        })?;
        Ok(slice.chars().map(|c| c.len_utf16() as u32).sum())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn mixed_line_breaks() {
        // S5 from the spec: "a\r\nb\nc" -> starts [0, 3, 5], break lens [2, 1, 0]
        let index = LineIndex::new("a\r\nb\nc");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_start(0), Some(0));
        assert_eq!(index.line_start(1), Some(3));
        assert_eq!(index.line_start(2), Some(5));
        assert_eq!(index.line_break_len(0), Some(2));
        assert_eq!(index.line_break_len(1), Some(1));
        assert_eq!(index.line_break_len(2), Some(0));
    }

    #[test]
    fn empty_text_has_one_line() {
        let index = LineIndex::new("");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_start(0), Some(0));
    }

    #[test]
    fn unicode_separators() {
        let text = "a\u{2028}b\u{2029}c";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_break_len(0), Some(3));
    }

    #[test]
    fn line_number_binary_search() {
        let index = LineIndex::new("aaa\nbbb\nccc");
        assert_eq!(index.line_number(0).unwrap(), 0);
        assert_eq!(index.line_number(3).unwrap(), 0);
        assert_eq!(index.line_number(4).unwrap(), 1);
        assert_eq!(index.line_number(11).unwrap(), 2);
        assert!(index.line_number(12).is_err());
    }

    #[test]
    fn offset_to_position() {
        let index = LineIndex::new("abc\ndef");
        assert_eq!(index.offset_to_position(5).unwrap(), (1, 1));
    }
}
