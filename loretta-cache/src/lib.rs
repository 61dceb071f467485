//! Interning for green tokens and trivia, keyed by hashed source text.
//!
//! The lexer computes an FNV-1a hash over each lexeme as it scans (see
//! [`fnv::IncrementalFnv`]) and uses it, plus the lexeme's length and
//! kind, as the cache key — no text comparison happens unless a
//! collision on `(hash, len, kind)` occurs. Per the single-threaded lexer
//! contract, a cache is owned by exactly one lexer; concurrent lookups
//! against the same cache are not supported.

mod fnv;
mod table;

pub use fnv::{hash_bytes, IncrementalFnv};

use loretta_green::{GreenToken, GreenTrivia};
use loretta_syntax::SyntaxKind;
use table::Table;

const DEFAULT_CAPACITY: usize = 2048;

/// Interns green tokens by `(hash, length, kind)` of their text.
pub struct TokenCache {
    tokens: Table<GreenToken>,
    trivia: Table<GreenTrivia>,
}

impl TokenCache {
    pub fn new() -> Self {
        TokenCache { tokens: Table::with_capacity(DEFAULT_CAPACITY), trivia: Table::with_capacity(DEFAULT_CAPACITY / 4) }
    }

    /// Looks up a token by the hash/length of its source text and its
    /// kind, calling `factory` to build (and cache) one on miss.
    pub fn get_or_insert_token(&mut self, hash: u64, len: u32, kind: SyntaxKind, factory: impl FnOnce() -> GreenToken) -> GreenToken {
        self.tokens.get_or_insert_with(hash, len, kind, factory)
    }

    /// Looks up an identifier-shaped token, classifying it as a keyword
    /// if `text` matches one of the active dialect's reserved words.
    /// `is_active_keyword` lets the caller gate dialect-specific and soft
    /// keywords (e.g. `continue` in GLua but not standard Lua).
    pub fn get_or_insert_identifier(
        &mut self,
        text: &str,
        hash: u64,
        is_active_keyword: impl Fn(SyntaxKind) -> bool,
    ) -> GreenToken {
        let kind = loretta_syntax::lookup_keyword(text)
            .filter(|&k| is_active_keyword(k))
            .unwrap_or(SyntaxKind::IdentifierToken);
        self.get_or_insert_token(hash, text.len() as u32, kind, || GreenToken::new(kind, Some(std::sync::Arc::<str>::from(text))))
    }

    /// Whitespace and end-of-line trivia, keyed by raw text only (no
    /// kind distinction needed: the caller already knows which trivia
    /// kind it is producing).
    pub fn get_or_insert_trivia(&mut self, kind: SyntaxKind, text: &str, hash: u64, factory: impl FnOnce() -> GreenTrivia) -> GreenTrivia {
        self.trivia.get_or_insert_with(hash, text.len() as u32, kind, factory)
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_becomes_keyword_when_active() {
        let mut cache = TokenCache::new();
        let hash = hash_bytes(b"end");
        let token = cache.get_or_insert_identifier("end", hash, |_| true);
        assert_eq!(token.kind(), SyntaxKind::EndKeyword);
    }

    #[test]
    fn identifier_stays_identifier_when_keyword_inactive() {
        let mut cache = TokenCache::new();
        let hash = hash_bytes(b"continue");
        let token = cache.get_or_insert_identifier("continue", hash, |_| false);
        assert_eq!(token.kind(), SyntaxKind::IdentifierToken);
    }

    #[test]
    fn plain_identifier_is_not_a_keyword() {
        let mut cache = TokenCache::new();
        let hash = hash_bytes(b"foo");
        let token = cache.get_or_insert_identifier("foo", hash, |_| true);
        assert_eq!(token.kind(), SyntaxKind::IdentifierToken);
    }

    #[test]
    fn trivia_lookup_reuses_cached_entry() {
        let mut cache = TokenCache::new();
        let text = "    ";
        let hash = hash_bytes(text.as_bytes());
        let mut calls = 0;
        let _ = cache.get_or_insert_trivia(SyntaxKind::WhitespaceTrivia, text, hash, || {
            calls += 1;
            GreenTrivia::new(SyntaxKind::WhitespaceTrivia, text)
        });
        let _ = cache.get_or_insert_trivia(SyntaxKind::WhitespaceTrivia, text, hash, || {
            calls += 1;
            GreenTrivia::new(SyntaxKind::WhitespaceTrivia, text)
        });
        assert_eq!(calls, 1);
    }
}
