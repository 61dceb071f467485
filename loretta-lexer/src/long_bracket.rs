//! `[=*[ ... ]=*]` long-bracket bodies, shared between long comments and
//! long string literals — only the level (the number of `=` signs) has to
//! match between opener and closer.

use crate::text_window::TextWindow;

/// Attempts to consume a long-bracket opener (`[`, then zero or more `=`,
/// then `[`) starting at the window's current position. Leaves the window
/// untouched and returns `None` if the sequence isn't a long bracket at
/// all (a lone `[` or `[=` not followed by a second `[`).
pub fn try_open(window: &mut TextWindow) -> Option<usize> {
    let checkpoint = window.position();
    if window.peek() != '[' {
        return None;
    }
    window.advance();
    let mut level = 0usize;
    while window.peek() == '=' {
        window.advance();
        level += 1;
    }
    if window.peek() == '[' {
        window.advance();
        Some(level)
    } else {
        window.reset(checkpoint);
        None
    }
}

/// Reads the body of a long bracket up to and including its matching
/// closer, skipping a single leading newline immediately after the
/// opener per Lua's long-string convention. Returns the body text
/// (without the surrounding brackets) and whether a closer was found
/// before end of input.
pub fn read_body(window: &mut TextWindow, level: usize) -> (String, bool) {
    if window.peek() == '\r' {
        window.advance();
        window.advance_if('\n');
    } else if window.peek() == '\n' {
        window.advance();
    }

    let mut body = String::new();
    loop {
        if window.is_at_end() {
            return (body, false);
        }
        if window.peek() == ']' {
            let checkpoint = window.position();
            window.advance();
            let mut seen = 0usize;
            while window.peek() == '=' {
                window.advance();
                seen += 1;
            }
            if seen == level && window.peek() == ']' {
                window.advance();
                return (body, true);
            }
            window.reset(checkpoint);
        }
        body.push(window.advance());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_double_bracket() {
        let mut w = TextWindow::new("[[hello]]");
        let level = try_open(&mut w).unwrap();
        assert_eq!(level, 0);
        let (body, terminated) = read_body(&mut w, level);
        assert_eq!(body, "hello");
        assert!(terminated);
    }

    #[test]
    fn leveled_bracket_ignores_shorter_closer() {
        let mut w = TextWindow::new("[==[a]]b]==]c");
        let level = try_open(&mut w).unwrap();
        assert_eq!(level, 2);
        let (body, terminated) = read_body(&mut w, level);
        assert_eq!(body, "a]]b");
        assert!(terminated);
        assert_eq!(w.peek(), 'c');
    }

    #[test]
    fn leading_newline_is_skipped() {
        let mut w = TextWindow::new("[[\nhello]]");
        let level = try_open(&mut w).unwrap();
        let (body, _) = read_body(&mut w, level);
        assert_eq!(body, "hello");
    }

    #[test]
    fn unterminated_reports_false() {
        let mut w = TextWindow::new("[[abc");
        let level = try_open(&mut w).unwrap();
        let (body, terminated) = read_body(&mut w, level);
        assert_eq!(body, "abc");
        assert!(!terminated);
    }

    #[test]
    fn single_bracket_is_not_a_long_opener() {
        let mut w = TextWindow::new("[x]");
        assert_eq!(try_open(&mut w), None);
        assert_eq!(w.peek(), '[');
    }
}
