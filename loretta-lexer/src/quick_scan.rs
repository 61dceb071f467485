//! The quick-scan DFA: a fixed 10×10 `CharFlags × QuickScanState`
//! transition table that recognizes the overwhelming majority of real
//! Lua tokens (identifiers, keywords, decimal integers, single-char
//! punctuation, short operators, and whitespace/newline trivia runs) in
//! one forward pass, hashing as it goes so a cache hit needs no further
//! work.
//!
//! Anything outside that fast path — long strings, fractional or
//! hex/binary numeric literals, comments, quoted strings, non-ASCII
//! bytes — drives the DFA into [`QuickScanState::Bad`], and the caller
//! rewinds to the lexeme start and runs the full slow lexer instead.

use loretta_cache::IncrementalFnv;
use loretta_syntax::{LuaDialect, SyntaxKind};

use crate::char_flags::{classify_char, CharFlags, CHAR_FLAGS_COUNT};
use crate::text_window::TextWindow;

/// The ten states the quick scan actively transitions between, plus the
/// two terminal values `Done`/`Bad` a lookup can land on. The invariant
/// `Bad as u8 == Done as u8 + 1` is what lets callers test "are we
/// finished" with a single `state as u8 >= Done as u8` comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum QuickScanState {
    Initial = 0,
    FollowingWhite = 1,
    FollowingCr = 2,
    FollowingLf = 3,
    Ident = 4,
    Number = 5,
    Punctuation = 6,
    Dot = 7,
    CompoundPunctStart = 8,
    DoneAfterNext = 9,
    Done = 10,
    Bad = 11,
}

const ACTIVE_STATES: usize = 10;

const fn row(state: QuickScanState) -> [QuickScanState; CHAR_FLAGS_COUNT] {
    use CharFlags::*;
    use QuickScanState::*;
    match state {
        Initial => {
            let mut r = [Bad; CHAR_FLAGS_COUNT];
            r[White as usize] = FollowingWhite;
            r[Cr as usize] = FollowingCr;
            r[Lf as usize] = FollowingLf;
            r[Letter as usize] = Ident;
            r[Digit as usize] = Number;
            r[Punct as usize] = Punctuation;
            r[CharFlags::Dot as usize] = QuickScanState::Dot;
            r[CharFlags::CompoundPunctStart as usize] = QuickScanState::CompoundPunctStart;
            r[Complex as usize] = Bad;
            r[EndOfFile as usize] = Bad;
            r
        }
        FollowingWhite => {
            let mut r = [Done; CHAR_FLAGS_COUNT];
            r[White as usize] = FollowingWhite;
            r
        }
        FollowingCr => {
            let mut r = [Done; CHAR_FLAGS_COUNT];
            r[Lf as usize] = DoneAfterNext;
            r
        }
        FollowingLf => [Done; CHAR_FLAGS_COUNT],
        Ident => {
            let mut r = [Done; CHAR_FLAGS_COUNT];
            r[Letter as usize] = Ident;
            r[Digit as usize] = Ident;
            r
        }
        Number => {
            let mut r = [Done; CHAR_FLAGS_COUNT];
            r[Digit as usize] = Number;
            r[CharFlags::Dot as usize] = Bad;
            r[Letter as usize] = Bad;
            r
        }
        Punctuation => [Done; CHAR_FLAGS_COUNT],
        QuickScanState::Dot => {
            let mut r = [Done; CHAR_FLAGS_COUNT];
            r[CharFlags::Dot as usize] = QuickScanState::CompoundPunctStart;
            r[Digit as usize] = Bad;
            r
        }
        QuickScanState::CompoundPunctStart => {
            let mut r = [Done; CHAR_FLAGS_COUNT];
            r[CharFlags::CompoundPunctStart as usize] = DoneAfterNext;
            r[CharFlags::Dot as usize] = DoneAfterNext;
            r
        }
        DoneAfterNext | Done | Bad => [Done; CHAR_FLAGS_COUNT],
    }
}

const fn build_matrix() -> [[QuickScanState; CHAR_FLAGS_COUNT]; ACTIVE_STATES] {
    [
        row(QuickScanState::Initial),
        row(QuickScanState::FollowingWhite),
        row(QuickScanState::FollowingCr),
        row(QuickScanState::FollowingLf),
        row(QuickScanState::Ident),
        row(QuickScanState::Number),
        row(QuickScanState::Punctuation),
        row(QuickScanState::Dot),
        row(QuickScanState::CompoundPunctStart),
        row(QuickScanState::DoneAfterNext),
    ]
}

static TRANSITIONS: [[QuickScanState; CHAR_FLAGS_COUNT]; ACTIVE_STATES] = build_matrix();

/// Tokens long enough to force slow lexing even on an otherwise-clean
/// quick scan; matches the spec's cached-token size ceiling.
pub const MAX_CACHED_TOKEN_SIZE: usize = 42;

/// What kind of lexeme the quick scan landed on, used by the lexer to
/// decide how to turn the recognized span into a token without
/// re-deriving its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickScanShape {
    Whitespace,
    EndOfLine,
    Identifier,
    Integer,
    /// Punctuation/operator text; the caller still must resolve it
    /// through [`loretta_syntax::kind_from_text`] since the DFA's
    /// character-class granularity can accept shapes (like `=<`) with no
    /// real [`SyntaxKind`].
    Punctuation,
}

pub struct QuickScanResult {
    pub shape: QuickScanShape,
    pub hash: u64,
}

fn classify_at(window: &TextWindow, offset: usize) -> CharFlags {
    if window.remaining() <= offset {
        CharFlags::EndOfFile
    } else {
        classify_char(window.peek_at(offset))
    }
}

fn shape_for(final_active_state: QuickScanState) -> Option<QuickScanShape> {
    match final_active_state {
        QuickScanState::FollowingWhite => Some(QuickScanShape::Whitespace),
        QuickScanState::FollowingCr | QuickScanState::FollowingLf => Some(QuickScanShape::EndOfLine),
        QuickScanState::Ident => Some(QuickScanShape::Identifier),
        QuickScanState::Number => Some(QuickScanShape::Integer),
        QuickScanState::Punctuation | QuickScanState::Dot | QuickScanState::CompoundPunctStart | QuickScanState::DoneAfterNext => {
            Some(QuickScanShape::Punctuation)
        }
        QuickScanState::Initial | QuickScanState::Done | QuickScanState::Bad => None,
    }
}

/// Runs the quick scan from the window's current position. Only
/// attempted by the lexer when at least [`MAX_CACHED_TOKEN_SIZE`] bytes
/// of lookahead remain (or the rest of the buffer is shorter than that
/// and this is genuinely the tail). Returns `None` on [`QuickScanState::Bad`]
/// or a too-long lexeme, in which case the caller must reset the window
/// to the lexeme start and use the slow lexer.
pub fn quick_scan(window: &mut TextWindow) -> Option<QuickScanResult> {
    let start = window.position();
    let mut state = QuickScanState::Initial;
    let mut last_active = QuickScanState::Initial;
    let mut hash = IncrementalFnv::new();

    loop {
        let flags = classify_at(window, 0);
        let next = TRANSITIONS[state as usize][flags as usize];
        if next as u8 >= QuickScanState::Done as u8 {
            if next == QuickScanState::Bad {
                return None;
            }
            break;
        }
        let ch = window.advance();
        hash.push_char(ch);
        state = next;
        last_active = next;
        if window.position() - start > MAX_CACHED_TOKEN_SIZE {
            return None;
        }
    }

    let shape = shape_for(last_active)?;
    Some(QuickScanResult { shape, hash: hash.finish() })
}

/// Resolves a [`QuickScanShape::Punctuation`] lexeme's text to a real
/// kind, or `None` if the DFA over-accepted a combination (e.g. `=<`,
/// or a dialect-gated operator like `//` without integer division
/// enabled) that the slow lexer must instead resolve character by
/// character.
pub fn resolve_punctuation(text: &str, dialect: LuaDialect) -> Option<SyntaxKind> {
    let gated_ok = match text {
        "//" => dialect.integer_division,
        "<<" | ">>" => dialect.bitwise_operators,
        "::" => dialect.goto_labels,
        _ => true,
    };
    if gated_ok {
        loretta_syntax::kind_from_text(text)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> (Option<QuickScanShape>, usize) {
        let mut window = TextWindow::new(text);
        match quick_scan(&mut window) {
            Some(result) => (Some(result.shape), window.position()),
            None => (None, window.position()),
        }
    }

    #[test]
    fn identifier_stops_before_operator() {
        let (shape, consumed) = scan("foo+1");
        assert_eq!(shape, Some(QuickScanShape::Identifier));
        assert_eq!(consumed, 3);
    }

    #[test]
    fn integer_run_stops_cleanly() {
        let (shape, consumed) = scan("123;");
        assert_eq!(shape, Some(QuickScanShape::Integer));
        assert_eq!(consumed, 3);
    }

    #[test]
    fn fractional_number_falls_back() {
        let (shape, _) = scan("1.5");
        assert_eq!(shape, None);
    }

    #[test]
    fn triple_dot_vararg_is_recognized() {
        let (shape, consumed) = scan("... ");
        assert_eq!(shape, Some(QuickScanShape::Punctuation));
        assert_eq!(consumed, 3);
    }

    #[test]
    fn double_dot_concat_stops_at_two() {
        let (shape, consumed) = scan("..x");
        assert_eq!(shape, Some(QuickScanShape::Punctuation));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn single_dot_index_access() {
        let (shape, consumed) = scan(".x");
        assert_eq!(shape, Some(QuickScanShape::Punctuation));
        assert_eq!(consumed, 1);
    }

    #[test]
    fn equals_equals_is_recognized_then_resolved() {
        let (shape, consumed) = scan("==y");
        assert_eq!(shape, Some(QuickScanShape::Punctuation));
        assert_eq!(consumed, 2);
        assert_eq!(resolve_punctuation("==", LuaDialect::lua54()), Some(SyntaxKind::EqualsEqualsToken));
    }

    #[test]
    fn string_literal_always_falls_back() {
        let (shape, consumed) = scan("\"hi\"");
        assert_eq!(shape, None);
        assert_eq!(consumed, 0);
    }

    #[test]
    fn crlf_is_a_single_end_of_line() {
        let (shape, consumed) = scan("\r\nx");
        assert_eq!(shape, Some(QuickScanShape::EndOfLine));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn whitespace_run_is_recognized() {
        let (shape, consumed) = scan("   x");
        assert_eq!(shape, Some(QuickScanShape::Whitespace));
        assert_eq!(consumed, 3);
    }

    #[test]
    fn ungated_compound_operator_is_rejected() {
        assert_eq!(resolve_punctuation("//", LuaDialect::lua51()), None);
        assert_eq!(resolve_punctuation("//", LuaDialect::lua53()), Some(SyntaxKind::DoubleSlashToken));
    }

    #[test]
    fn overlong_lexeme_forces_slow_path() {
        let long_ident = "a".repeat(MAX_CACHED_TOKEN_SIZE + 5);
        let (shape, _) = scan(&long_ident);
        assert_eq!(shape, None);
    }
}
