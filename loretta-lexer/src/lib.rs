//! Turns Lua source text into a flat stream of green tokens, each
//! carrying the exact leading/trailing trivia around it.
//!
//! Lexing never aborts on malformed input: anything unrecognizable
//! becomes a [`loretta_syntax::SyntaxKind::BadToken`] carrying a
//! diagnostic, and scanning continues from the next character.

mod char_flags;
mod long_bracket;
mod quick_scan;
mod slow_lexer;
mod text_window;
mod trivia;

use loretta_cache::TokenCache;
use loretta_green::{Diagnostic, GreenToken};
use loretta_syntax::{LuaDialect, SyntaxKind};
use tracing::{debug, trace};

pub use quick_scan::MAX_CACHED_TOKEN_SIZE;
pub use text_window::TextWindow;

/// Drives the quick-scan/slow-lexer pipeline over a source buffer,
/// owning the token cache used across the whole lex.
pub struct Lexer<'a> {
    window: TextWindow<'a>,
    dialect: LuaDialect,
    cache: TokenCache,
    at_start: bool,
    emitted_eof: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str, dialect: LuaDialect) -> Self {
        Lexer { window: TextWindow::new(text), dialect, cache: TokenCache::new(), at_start: true, emitted_eof: false }
    }

    /// Lexes every token in the buffer, including the final
    /// `EndOfFileToken`, and every diagnostic raised along the way.
    pub fn lex_all(mut self) -> (Vec<GreenToken>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        let mut diagnostics = Vec::new();
        while let Some(token) = self.next_token(&mut diagnostics) {
            let is_eof = token.kind() == SyntaxKind::EndOfFileToken;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        (tokens, diagnostics)
    }

    fn next_token(&mut self, diagnostics: &mut Vec<Diagnostic>) -> Option<GreenToken> {
        if self.emitted_eof {
            return None;
        }

        let (leading, mut leading_diags) = trivia::scan_leading_trivia(&mut self.window, self.at_start);
        self.at_start = false;
        diagnostics.append(&mut leading_diags);

        let token = if self.window.is_at_end() {
            self.emitted_eof = true;
            GreenToken::new(SyntaxKind::EndOfFileToken, Some(""))
        } else {
            self.scan_one_token()
        };
        diagnostics.extend(token.diagnostics().iter().cloned());

        let trailing = trivia::scan_trailing_trivia(&mut self.window);
        let leading: std::sync::Arc<[_]> = leading.into();
        let trailing: std::sync::Arc<[_]> = trailing.into();
        trace!(kind = ?token.kind(), leading = leading.len(), trailing = trailing.len(), "lexed token");
        Some(token.with_leading_trivia(leading).with_trailing_trivia(trailing))
    }

    fn scan_one_token(&mut self) -> GreenToken {
        let start = self.window.position();
        let can_quick_scan = self.window.remaining() >= MAX_CACHED_TOKEN_SIZE || self.window.is_at_end();

        if can_quick_scan {
            if let Some(result) = quick_scan::quick_scan(&mut self.window) {
                let len = (self.window.position() - start) as u32;
                let text = &self.window.full_text()[start..self.window.position()];
                if let Some(token) = self.token_from_quick_scan(result.shape, text, result.hash, len) {
                    debug!(shape = ?result.shape, len, "quick scan hit");
                    return token;
                }
            }
            self.window.reset(start);
        }

        slow_lexer::scan_token(&mut self.window, self.dialect, &mut self.cache)
    }

    fn token_from_quick_scan(&mut self, shape: quick_scan::QuickScanShape, text: &str, hash: u64, len: u32) -> Option<GreenToken> {
        use quick_scan::QuickScanShape;
        match shape {
            QuickScanShape::Identifier => {
                let continue_ok = self.dialect.continue_statement;
                Some(self.cache.get_or_insert_identifier(text, hash, |kind| kind != SyntaxKind::ContinueKeyword || continue_ok))
            }
            QuickScanShape::Integer => {
                let value = text.parse::<i64>().ok()?;
                Some(GreenToken::new(SyntaxKind::NumberToken, Some(text)).with_value(loretta_green::TokenValue::Integer(value)))
            }
            QuickScanShape::Punctuation => {
                let kind = quick_scan::resolve_punctuation(text, self.dialect)?;
                Some(self.cache.get_or_insert_token(hash, len, kind, || GreenToken::new(kind, None::<&str>)))
            }
            QuickScanShape::Whitespace | QuickScanShape::EndOfLine => {
                // The token-level quick scan only ever reaches these
                // shapes if trivia scanning above already consumed the
                // run; treated as a miss so the slow lexer produces the
                // real token that follows.
                None
            }
        }
    }
}

/// Lexes `text` under `dialect` in one call.
pub fn lex(text: &str, dialect: LuaDialect) -> (Vec<GreenToken>, Vec<Diagnostic>) {
    Lexer::new(text, dialect).lex_all()
}
