//! A token-at-a-time view over the lexer's output, tracking the
//! absolute byte position needed for diagnostics and folding recovered
//! (skipped) tokens into the next real token's leading trivia.

use std::collections::VecDeque;

use loretta_green::{Diagnostic, GreenToken, GreenTrivia, Severity};
use loretta_position::TextSpan;
use loretta_syntax::SyntaxKind;

pub struct TokenCursor {
    tokens: VecDeque<GreenToken>,
    offset: u32,
    pending_skipped: Vec<GreenTrivia>,
}

fn leading_width(token: &GreenToken) -> u32 {
    token.leading_trivia().iter().map(GreenTrivia::full_width).sum()
}

impl TokenCursor {
    pub fn new(tokens: Vec<GreenToken>) -> Self {
        TokenCursor { tokens: tokens.into(), offset: 0, pending_skipped: Vec::new() }
    }

    pub fn current_kind(&self) -> SyntaxKind {
        self.tokens.front().map(GreenToken::kind).unwrap_or(SyntaxKind::EndOfFileToken)
    }

    /// The kind `ahead` tokens from the current one, without consuming
    /// anything; used to disambiguate numeric vs. generic `for` and
    /// assignment vs. expression statements.
    pub fn peek_kind(&self, ahead: usize) -> SyntaxKind {
        self.tokens.get(ahead).map(GreenToken::kind).unwrap_or(SyntaxKind::EndOfFileToken)
    }

    pub fn is_at_end(&self) -> bool {
        self.current_kind() == SyntaxKind::EndOfFileToken
    }

    /// Absolute span of the current token's own text, excluding its
    /// leading/trailing trivia.
    pub fn current_span(&self) -> TextSpan {
        match self.tokens.front() {
            Some(token) => TextSpan::new(self.offset + leading_width(token), token.width()),
            None => TextSpan::empty(self.offset),
        }
    }

    /// Removes the current token, folding any trivia skipped during
    /// recovery into its leading trivia, and advances past it.
    pub fn bump(&mut self) -> GreenToken {
        let token = self.tokens.pop_front().unwrap_or_else(|| GreenToken::new(SyntaxKind::EndOfFileToken, Some("")));
        self.offset += token.full_width();
        if self.pending_skipped.is_empty() {
            token
        } else {
            let mut leading: Vec<GreenTrivia> = self.pending_skipped.drain(..).collect();
            leading.extend(token.leading_trivia().iter().cloned());
            token.with_leading_trivia(leading)
        }
    }

    /// Consumes the current token if it has kind `kind`; otherwise
    /// leaves the stream untouched, records a diagnostic at the current
    /// position, and synthesizes a zero-width missing token so the tree
    /// still has a slot to put in that position.
    pub fn expect(&mut self, kind: SyntaxKind, diagnostics: &mut Vec<Diagnostic>) -> GreenToken {
        if self.current_kind() == kind {
            return self.bump();
        }
        let diagnostic = Diagnostic::at_span(
            "LOPS0001",
            Severity::Error,
            format!("expected {kind:?}, found {:?}", self.current_kind()),
            self.current_span(),
        );
        diagnostics.push(diagnostic.clone());
        GreenToken::missing(kind).with_diagnostics(vec![diagnostic])
    }

    /// Folds the current token, together with its own leading/trailing
    /// trivia text, into a single `SkippedTokenTrivia` piece pending on
    /// whichever token is emitted next. Used when a statement is stuck
    /// on a token that starts nothing recognizable.
    pub fn skip_one(&mut self) {
        let Some(token) = self.tokens.pop_front() else { return };
        let mut text = String::new();
        for trivia in token.leading_trivia() {
            text.push_str(trivia.text());
        }
        text.push_str(token.text());
        for trivia in token.trailing_trivia() {
            text.push_str(trivia.text());
        }
        self.offset += token.full_width();
        self.pending_skipped.push(GreenTrivia::new(SyntaxKind::SkippedTokenTrivia, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loretta_green::GreenToken;

    fn tok(kind: SyntaxKind) -> GreenToken {
        GreenToken::new(kind, None::<&str>)
    }

    #[test]
    fn bump_advances_offset_by_full_width() {
        let mut cursor = TokenCursor::new(vec![
            tok(SyntaxKind::LocalKeyword).with_trailing_trivia(vec![GreenTrivia::new(SyntaxKind::WhitespaceTrivia, " ")]),
            tok(SyntaxKind::EndOfFileToken),
        ]);
        assert_eq!(cursor.current_span(), TextSpan::new(0, 5));
        cursor.bump();
        assert_eq!(cursor.current_span(), TextSpan::new(6, 0));
    }

    #[test]
    fn expect_mismatch_synthesizes_missing_token() {
        let mut cursor = TokenCursor::new(vec![tok(SyntaxKind::EndOfFileToken)]);
        let mut diagnostics = Vec::new();
        let missing = cursor.expect(SyntaxKind::IdentifierToken, &mut diagnostics);
        assert!(missing.is_missing());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id.as_ref(), "LOPS0001");
    }

    #[test]
    fn skipped_token_becomes_leading_trivia_of_next() {
        let mut cursor = TokenCursor::new(vec![tok(SyntaxKind::BadToken), tok(SyntaxKind::EndOfFileToken)]);
        cursor.skip_one();
        let next = cursor.bump();
        assert_eq!(next.leading_trivia()[0].kind(), SyntaxKind::SkippedTokenTrivia);
    }
}
