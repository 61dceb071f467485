//! Leading and trailing trivia: whitespace runs, line breaks, comments,
//! and the shebang line.

use loretta_green::{Diagnostic, GreenTrivia, Severity};
use loretta_position::TextSpan;
use loretta_syntax::SyntaxKind;

use crate::long_bracket;
use crate::text_window::TextWindow;

fn is_end_of_line_start(ch: char) -> bool {
    ch == '\r' || ch == '\n'
}

fn scan_whitespace_run(window: &mut TextWindow) -> GreenTrivia {
    window.start_lexeme();
    while matches!(window.peek(), ' ' | '\t' | '\x0b' | '\x0c') {
        window.advance();
    }
    GreenTrivia::new(SyntaxKind::WhitespaceTrivia, window.current_lexeme_text())
}

fn scan_end_of_line(window: &mut TextWindow) -> GreenTrivia {
    window.start_lexeme();
    if window.peek() == '\r' {
        window.advance();
        window.advance_if('\n');
    } else {
        window.advance();
    }
    GreenTrivia::new(SyntaxKind::EndOfLineTrivia, window.current_lexeme_text())
}

/// Consumes a `#!...` shebang line; only valid as the very first trivia
/// piece lexed from a compilation unit.
fn scan_shebang(window: &mut TextWindow) -> GreenTrivia {
    window.start_lexeme();
    window.advance();
    window.advance();
    while !window.is_at_end() && !is_end_of_line_start(window.peek()) {
        window.advance();
    }
    GreenTrivia::new(SyntaxKind::ShebangTrivia, window.current_lexeme_text())
}

fn scan_single_line_comment(window: &mut TextWindow) -> GreenTrivia {
    window.start_lexeme();
    window.advance();
    window.advance();
    while !window.is_at_end() && !is_end_of_line_start(window.peek()) {
        window.advance();
    }
    GreenTrivia::new(SyntaxKind::SingleLineCommentTrivia, window.current_lexeme_text())
}

fn scan_long_comment(window: &mut TextWindow, level: usize, start: usize) -> (GreenTrivia, Vec<Diagnostic>) {
    let (_, terminated) = long_bracket::read_body(window, level);
    let text = &window.full_text()[start..window.position()];
    let mut diagnostics = Vec::new();
    if !terminated {
        diagnostics.push(Diagnostic::at_span(
            "LOLX0002",
            Severity::Error,
            "unterminated long comment",
            TextSpan::new(start as u32, (window.position() - start) as u32),
        ));
    }
    (GreenTrivia::new(SyntaxKind::MultiLineCommentTrivia, text), diagnostics)
}

/// Attempts to recognize a `--` comment (short or long) at the window's
/// current position. Returns `None` without consuming anything if the
/// next two characters aren't `--`.
fn try_scan_comment(window: &mut TextWindow) -> Option<(GreenTrivia, Vec<Diagnostic>)> {
    if window.peek() != '-' || window.peek_at(1) != '-' {
        return None;
    }
    let start = window.position();
    window.advance();
    window.advance();
    if window.peek() == '[' {
        let checkpoint = window.position();
        if let Some(level) = long_bracket::try_open(window) {
            return Some(scan_long_comment(window, level, start));
        }
        window.reset(checkpoint);
    }
    window.reset(start);
    Some((scan_single_line_comment(window), Vec::new()))
}

/// Collects every piece of leading trivia before the next real token:
/// whitespace, line breaks, comments, and — only at the very start of
/// the file — a shebang line.
pub fn scan_leading_trivia(window: &mut TextWindow, at_start_of_file: bool) -> (Vec<GreenTrivia>, Vec<Diagnostic>) {
    let mut trivia = Vec::new();
    let mut diagnostics = Vec::new();
    let mut first = at_start_of_file;

    loop {
        if first && window.peek() == '#' && window.peek_at(1) == '!' {
            trivia.push(scan_shebang(window));
            first = false;
            continue;
        }
        first = false;

        match window.peek() {
            ' ' | '\t' | '\x0b' | '\x0c' => trivia.push(scan_whitespace_run(window)),
            '\r' | '\n' => trivia.push(scan_end_of_line(window)),
            _ => {
                if let Some((piece, mut diags)) = try_scan_comment(window) {
                    trivia.push(piece);
                    diagnostics.append(&mut diags);
                } else {
                    break;
                }
            }
        }
    }

    (trivia, diagnostics)
}

/// Collects trailing trivia after a token: whitespace up to and
/// including the first end-of-line, but never a comment (a comment
/// belongs to the *next* token's leading trivia).
pub fn scan_trailing_trivia(window: &mut TextWindow) -> Vec<GreenTrivia> {
    let mut trivia = Vec::new();
    loop {
        match window.peek() {
            ' ' | '\t' | '\x0b' | '\x0c' => trivia.push(scan_whitespace_run(window)),
            '\r' | '\n' => {
                trivia.push(scan_end_of_line(window));
                break;
            }
            _ => break,
        }
    }
    trivia
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shebang_only_recognized_at_start() {
        let mut w = TextWindow::new("#!/usr/bin/env lua\nlocal x");
        let (trivia, _) = scan_leading_trivia(&mut w, true);
        assert_eq!(trivia[0].kind(), SyntaxKind::ShebangTrivia);
    }

    #[test]
    fn short_comment_stops_before_newline() {
        let mut w = TextWindow::new("-- hi\nx");
        let (trivia, diags) = scan_leading_trivia(&mut w, false);
        assert!(diags.is_empty());
        assert_eq!(trivia[0].kind(), SyntaxKind::SingleLineCommentTrivia);
        assert_eq!(trivia[0].text(), "-- hi");
        assert_eq!(trivia[1].kind(), SyntaxKind::EndOfLineTrivia);
    }

    #[test]
    fn long_comment_spans_lines() {
        let mut w = TextWindow::new("--[[ a\nb ]]x");
        let (trivia, diags) = scan_leading_trivia(&mut w, false);
        assert!(diags.is_empty());
        assert_eq!(trivia[0].kind(), SyntaxKind::MultiLineCommentTrivia);
        assert_eq!(w.peek(), 'x');
    }

    #[test]
    fn unterminated_long_comment_is_diagnosed() {
        let mut w = TextWindow::new("--[[ nope");
        let (_, diags) = scan_leading_trivia(&mut w, false);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].id.as_ref(), "LOLX0002");
    }

    #[test]
    fn trailing_trivia_stops_after_first_eol() {
        let mut w = TextWindow::new("  \n\n  next");
        let trivia = scan_trailing_trivia(&mut w);
        assert_eq!(trivia.len(), 2);
        assert_eq!(trivia[1].kind(), SyntaxKind::EndOfLineTrivia);
        assert_eq!(w.peek(), '\n');
    }
}
