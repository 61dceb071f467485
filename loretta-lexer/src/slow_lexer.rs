//! The fully general lexer: numeric literals, quoted and long-bracket
//! strings, identifiers/keywords, and every operator, including the
//! dialect-gated ones the quick scan never attempts. Reached whenever
//! the quick scan bails into [`crate::quick_scan::QuickScanState::Bad`]
//! or the remaining input is too short to quick-scan safely.

use loretta_cache::{hash_bytes, TokenCache};
use loretta_green::{Diagnostic, GreenToken, Severity, TokenValue};
use loretta_position::TextSpan;
use loretta_syntax::{kind_from_text, LuaDialect, SyntaxKind};

use crate::long_bracket;
use crate::text_window::TextWindow;

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn diag(code: &'static str, message: impl Into<std::sync::Arc<str>>, start: usize, end: usize) -> Diagnostic {
    Diagnostic::at_span(code, Severity::Error, message, TextSpan::from_bounds(start as u32, end as u32))
}

/// Scans one full token (no trivia) starting at the window's current
/// position, which must already be the lexeme start.
pub fn scan_token(window: &mut TextWindow, dialect: LuaDialect, cache: &mut TokenCache) -> GreenToken {
    window.start_lexeme();
    if window.is_at_end() {
        return GreenToken::new(SyntaxKind::EndOfFileToken, Some(""));
    }

    let ch = window.peek();
    if is_ident_start(ch) {
        return scan_identifier(window, dialect, cache);
    }
    if ch.is_ascii_digit() {
        return scan_number(window, dialect);
    }
    if ch == '"' || ch == '\'' {
        return scan_quoted_string(window);
    }
    if ch == '[' && matches!(window.peek_at(1), '[' | '=') {
        let checkpoint = window.position();
        if let Some(level) = long_bracket::try_open(window) {
            return scan_long_string(window, level, checkpoint);
        }
        window.reset(checkpoint);
    }

    scan_operator(window, dialect)
}

fn scan_identifier(window: &mut TextWindow, dialect: LuaDialect, cache: &mut TokenCache) -> GreenToken {
    while is_ident_continue(window.peek()) {
        window.advance();
    }
    let text = window.current_lexeme_text();
    let hash = hash_bytes(text.as_bytes());
    cache.get_or_insert_identifier(text, hash, |kind| kind != SyntaxKind::ContinueKeyword || dialect.continue_statement)
}

fn scan_decimal_digits(window: &mut TextWindow) {
    while window.peek().is_ascii_digit() {
        window.advance();
    }
}

fn scan_hex_digits(window: &mut TextWindow) {
    while window.peek().is_ascii_hexdigit() {
        window.advance();
    }
}

fn scan_number(window: &mut TextWindow, dialect: LuaDialect) -> GreenToken {
    let start = window.position();
    let mut is_float = false;
    let mut is_hex = false;

    if window.peek() == '0' && matches!(window.peek_at(1), 'x' | 'X') {
        is_hex = true;
        window.advance();
        window.advance();
        scan_hex_digits(window);
        if window.peek() == '.' {
            is_float = true;
            window.advance();
            scan_hex_digits(window);
        }
        if matches!(window.peek(), 'p' | 'P') {
            is_float = true;
            window.advance();
            if matches!(window.peek(), '+' | '-') {
                window.advance();
            }
            scan_decimal_digits(window);
        }
    } else {
        scan_decimal_digits(window);
        if window.peek() == '.' {
            is_float = true;
            window.advance();
            scan_decimal_digits(window);
        }
        if matches!(window.peek(), 'e' | 'E') {
            is_float = true;
            window.advance();
            if matches!(window.peek(), '+' | '-') {
                window.advance();
            }
            scan_decimal_digits(window);
        }
    }

    let text = window.current_lexeme_text().to_string();
    let mut diagnostics = Vec::new();
    let value = if is_hex && is_float && !dialect.hex_float_literals {
        diagnostics.push(diag("LOLX0004", "hex float literals are not enabled for this dialect", start, window.position()));
        TokenValue::Number(0.0)
    } else if is_float {
        match parse_float(&text) {
            Some(value) => TokenValue::Number(value),
            None => {
                diagnostics.push(diag("LOLX0004", "malformed numeric literal", start, window.position()));
                TokenValue::Number(0.0)
            }
        }
    } else if is_hex {
        match i64::from_str_radix(text.trim_start_matches("0x").trim_start_matches("0X"), 16) {
            Ok(value) => TokenValue::Integer(value),
            Err(_) => TokenValue::Number(parse_float(&text).unwrap_or(0.0)),
        }
    } else {
        match text.parse::<i64>() {
            Ok(value) => TokenValue::Integer(value),
            Err(_) => match parse_float(&text) {
                Some(value) => TokenValue::Number(value),
                None => {
                    diagnostics.push(diag("LOLX0004", "malformed numeric literal", start, window.position()));
                    TokenValue::Number(0.0)
                }
            },
        }
    };

    let token = GreenToken::new(SyntaxKind::NumberToken, Some(text)).with_value(value);
    if diagnostics.is_empty() {
        token
    } else {
        token.with_diagnostics(diagnostics)
    }
}

fn parse_float(text: &str) -> Option<f64> {
    if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        parse_hex_float(rest)
    } else {
        text.parse::<f64>().ok()
    }
}

fn parse_hex_float(rest: &str) -> Option<f64> {
    let (mantissa, exponent) = match rest.split_once(['p', 'P']) {
        Some((m, e)) => (m, e.parse::<i32>().ok()?),
        None => (rest, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let int_value = if int_part.is_empty() { 0u64 } else { u64::from_str_radix(int_part, 16).ok()? };
    let mut value = int_value as f64;
    let mut scale = 1.0 / 16.0;
    for ch in frac_part.chars() {
        value += (ch.to_digit(16)? as f64) * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exponent))
}

fn unescape_byte(window: &mut TextWindow, out: &mut String, start: usize) -> Option<Diagnostic> {
    let escape_start = window.position() - 1;
    match window.peek() {
        'n' => {
            window.advance();
            out.push('\n');
            None
        }
        't' => {
            window.advance();
            out.push('\t');
            None
        }
        'a' => {
            window.advance();
            out.push('\u{7}');
            None
        }
        'b' => {
            window.advance();
            out.push('\u{8}');
            None
        }
        'f' => {
            window.advance();
            out.push('\u{c}');
            None
        }
        'r' => {
            window.advance();
            out.push('\r');
            None
        }
        'v' => {
            window.advance();
            out.push('\u{b}');
            None
        }
        '\\' | '"' | '\'' => {
            out.push(window.advance());
            None
        }
        '\n' | '\r' => {
            window.advance();
            out.push('\n');
            None
        }
        'z' => {
            window.advance();
            while matches!(window.peek(), ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c') {
                window.advance();
            }
            None
        }
        'x' => {
            window.advance();
            let mut hex = String::new();
            for _ in 0..2 {
                if window.peek().is_ascii_hexdigit() {
                    hex.push(window.advance());
                }
            }
            match u8::from_str_radix(&hex, 16) {
                Ok(byte) => {
                    out.push(byte as char);
                    None
                }
                Err(_) => Some(diag("LOLX0003", "invalid hex escape sequence", start + escape_start, window.position())),
            }
        }
        d if d.is_ascii_digit() => {
            let mut digits = String::new();
            for _ in 0..3 {
                if window.peek().is_ascii_digit() {
                    digits.push(window.advance());
                } else {
                    break;
                }
            }
            match digits.parse::<u32>() {
                Ok(value) if value <= 255 => {
                    out.push(value as u8 as char);
                    None
                }
                _ => Some(diag("LOLX0003", "invalid decimal escape sequence", start + escape_start, window.position())),
            }
        }
        _ => {
            let bad = window.advance();
            out.push(bad);
            Some(diag("LOLX0003", format!("unknown escape sequence '\\{bad}'"), start + escape_start, window.position()))
        }
    }
}

fn scan_quoted_string(window: &mut TextWindow) -> GreenToken {
    let start = window.position();
    let quote = window.advance();
    let mut value = String::new();
    let mut diagnostics = Vec::new();
    let mut terminated = false;

    loop {
        match window.peek() {
            c if c == quote => {
                window.advance();
                terminated = true;
                break;
            }
            '\0' if window.is_at_end() => break,
            '\n' | '\r' => break,
            '\\' => {
                window.advance();
                if let Some(d) = unescape_byte(window, &mut value, start) {
                    diagnostics.push(d);
                }
            }
            _ => value.push(window.advance()),
        }
    }

    if !terminated {
        diagnostics.push(diag("LOLX0001", "unterminated string literal", start, window.position()));
    }

    let text = window.current_lexeme_text().to_string();
    let token = GreenToken::new(SyntaxKind::StringToken, Some(text)).with_value(TokenValue::Str(value.into()));
    if diagnostics.is_empty() {
        token
    } else {
        token.with_diagnostics(diagnostics)
    }
}

fn scan_long_string(window: &mut TextWindow, level: usize, start: usize) -> GreenToken {
    let (body, terminated) = long_bracket::read_body(window, level);
    let mut diagnostics = Vec::new();
    if !terminated {
        diagnostics.push(diag("LOLX0001", "unterminated long string literal", start, window.position()));
    }
    let text = window.full_text()[start..window.position()].to_string();
    let token = GreenToken::new(SyntaxKind::StringToken, Some(text)).with_value(TokenValue::Str(body.into()));
    if diagnostics.is_empty() {
        token
    } else {
        token.with_diagnostics(diagnostics)
    }
}

/// Every multi-character operator, longest first so prefix matches don't
/// shadow longer ones. Dialect gating for the ones that need it happens
/// where each match is resolved below.
const COMPOUND_OPERATORS: &[&str] = &["...", "..", "::", "//", "<<", ">>", "==", "~=", "<=", ">="];

fn scan_operator(window: &mut TextWindow, dialect: LuaDialect) -> GreenToken {
    let start = window.position();
    let remaining = &window.full_text()[start..];

    for &text in COMPOUND_OPERATORS {
        if remaining.starts_with(text) {
            let gated_ok = match text {
                "//" => dialect.integer_division,
                "<<" | ">>" => dialect.bitwise_operators,
                "::" => dialect.goto_labels,
                _ => true,
            };
            if gated_ok {
                if let Some(kind) = kind_from_text(text) {
                    for _ in 0..text.chars().count() {
                        window.advance();
                    }
                    return GreenToken::new(kind, None::<&str>);
                }
            }
        }
    }

    let ch = window.advance();
    let single = ch.to_string();
    let gated_ok = match ch {
        '&' | '|' => dialect.bitwise_operators,
        '~' => true,
        _ => true,
    };
    if gated_ok {
        if let Some(kind) = kind_from_text(&single) {
            return GreenToken::new(kind, None::<&str>);
        }
    }

    GreenToken::new(SyntaxKind::BadToken, Some(single))
        .with_diagnostics(vec![diag("LOLX0005", format!("unexpected character '{ch}'"), start, window.position())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use loretta_cache::TokenCache;

    fn scan(text: &str, dialect: LuaDialect) -> GreenToken {
        let mut window = TextWindow::new(text);
        let mut cache = TokenCache::new();
        scan_token(&mut window, dialect, &mut cache)
    }

    #[test]
    fn decimal_integer() {
        let token = scan("42", LuaDialect::lua54());
        assert_eq!(token.kind(), SyntaxKind::NumberToken);
        assert_eq!(token.value(), Some(&TokenValue::Integer(42)));
    }

    #[test]
    fn decimal_float() {
        let token = scan("3.25", LuaDialect::lua54());
        assert_eq!(token.value(), Some(&TokenValue::Number(3.25)));
    }

    #[test]
    fn hex_integer() {
        let token = scan("0x1F", LuaDialect::lua54());
        assert_eq!(token.value(), Some(&TokenValue::Integer(31)));
    }

    #[test]
    fn hex_float_needs_dialect_support() {
        let token = scan("0x1p4", LuaDialect::lua51());
        assert!(!token.diagnostics().is_empty());
    }

    #[test]
    fn quoted_string_handles_escapes() {
        let token = scan(r#""a\tb""#, LuaDialect::lua54());
        assert_eq!(token.value(), Some(&TokenValue::Str("a\tb".into())));
    }

    #[test]
    fn unterminated_string_is_diagnosed() {
        let token = scan("\"no end", LuaDialect::lua54());
        assert_eq!(token.diagnostics().len(), 1);
    }

    #[test]
    fn long_string_round_trips() {
        let token = scan("[[hi]]", LuaDialect::lua54());
        assert_eq!(token.value(), Some(&TokenValue::Str("hi".into())));
    }

    #[test]
    fn integer_division_gated_by_dialect() {
        // Without the dialect feature, "//" lexes as two plain slashes
        // rather than the combined operator; only the parser rejects it.
        let mut window = TextWindow::new("//");
        let token = scan_token(&mut window, LuaDialect::lua51(), &mut TokenCache::new());
        assert_eq!(token.kind(), SyntaxKind::SlashToken);
        let token = scan("//", LuaDialect::lua53());
        assert_eq!(token.kind(), SyntaxKind::DoubleSlashToken);
    }

    #[test]
    fn unknown_character_produces_bad_token() {
        let token = scan("@", LuaDialect::lua54());
        assert_eq!(token.kind(), SyntaxKind::BadToken);
        assert_eq!(token.diagnostics().len(), 1);
    }
}
