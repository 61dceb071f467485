//! A sliding lookahead window over the source buffer, plus lexeme-start
//! bookmarks so the lexer can rewind after an abandoned quick scan.

/// Sentinel returned by [`TextWindow::peek`]/[`TextWindow::peek_at`] past
/// the end of the buffer, matching the quick-scan table's `EndOfFile`
/// character class.
pub const EOF_CHAR: char = '\0';

pub struct TextWindow<'a> {
    text: &'a str,
    bytes: &'a [u8],
    offset: usize,
    lexeme_start: usize,
}

impl<'a> TextWindow<'a> {
    pub fn new(text: &'a str) -> Self {
        TextWindow { text, bytes: text.as_bytes(), offset: 0, lexeme_start: 0 }
    }

    pub fn is_at_end(&self) -> bool {
        self.offset >= self.bytes.len()
    }

    /// The current absolute byte offset.
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Marks the current position as the start of the next lexeme.
    pub fn start_lexeme(&mut self) {
        self.lexeme_start = self.offset;
    }

    pub fn lexeme_start_position(&self) -> usize {
        self.lexeme_start
    }

    /// The text of the lexeme from `start_lexeme()` to the current
    /// position.
    pub fn current_lexeme_text(&self) -> &'a str {
        &self.text[self.lexeme_start..self.offset]
    }

    /// Rewinds the window to an earlier offset (used when a quick scan
    /// fails and control falls back to the slow lexer).
    pub fn reset(&mut self, offset: usize) {
        debug_assert!(offset <= self.bytes.len());
        self.offset = offset;
    }

    /// The character at the current position without consuming it, or
    /// [`EOF_CHAR`] at end of input.
    pub fn peek(&self) -> char {
        self.peek_at(0)
    }

    /// The character `offset` positions ahead of the current one,
    /// without consuming anything.
    pub fn peek_at(&self, offset: usize) -> char {
        self.text[self.offset..].chars().nth(offset).unwrap_or(EOF_CHAR)
    }

    /// Consumes and returns the current character, or [`EOF_CHAR`] if
    /// already at end of input.
    pub fn advance(&mut self) -> char {
        let ch = self.peek();
        if ch != EOF_CHAR {
            self.offset += ch.len_utf8();
        }
        ch
    }

    /// Consumes the current character if it equals `expected`.
    pub fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Bytes of lookahead remaining, used by the quick scan to decide
    /// whether `MAX_CACHED_TOKEN_SIZE` worth of lookahead is available.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn full_text(&self) -> &'a str {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_walks_utf8_safely() {
        let mut w = TextWindow::new("a\u{00e9}b");
        assert_eq!(w.advance(), 'a');
        assert_eq!(w.advance(), '\u{00e9}');
        assert_eq!(w.advance(), 'b');
        assert_eq!(w.advance(), EOF_CHAR);
        assert!(w.is_at_end());
    }

    #[test]
    fn lexeme_bookmark_and_reset() {
        let mut w = TextWindow::new("local x");
        w.start_lexeme();
        w.advance();
        w.advance();
        assert_eq!(w.current_lexeme_text(), "lo");
        let checkpoint = w.position();
        w.advance();
        w.reset(checkpoint);
        assert_eq!(w.peek(), 'c');
    }

    #[test]
    fn peek_does_not_consume() {
        let mut w = TextWindow::new("ab");
        assert_eq!(w.peek(), 'a');
        assert_eq!(w.peek(), 'a');
        assert_eq!(w.peek_at(1), 'b');
        w.advance();
        assert_eq!(w.peek(), 'b');
    }
}
