//! String and quoted literal scanning
//!
//! Both literals are lexed piecewise so that every fragment and escape becomes its own token (and later its own
//! CST node). Escapes are decoded here; each escape token also keeps the sequence as written.

use super::tokens::{Escape, EscapeKind, TokenKind};
use super::{Lexer, Mode};
use crate::diagnostics::LexError;
use crate::span::Span;

// ============================================================================
// Escape sequence handling
// ============================================================================

/// Result of decoding one escape sequence (after the backslash).
enum EscapeResult {
    /// Well-formed escape
    Char(EscapeKind, char),
    /// Malformed escape; the message explains why
    Invalid(EscapeKind, String),
    /// End of input right after the backslash
    Eof,
}

/// Decode the character named by a single-character escape (`\n`, `\"`, `\q`, ...).
///
/// C-style control escapes map to their control character; anything else stands for itself.
fn decode_simple(c: char) -> char {
    match c {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0C}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0B}',
        other => other,
    }
}

impl<'a> Lexer<'a> {
    /// Take up to `max` characters matching `pred`, returning them as a slice.
    fn take_while_max(&mut self, max: usize, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        let mut taken = 0;
        while taken < max && self.peek().is_some_and(&pred) {
            self.advance();
            taken += 1;
        }
        &self.source[start..self.pos]
    }

    /// Decode one escape sequence. Called after consuming the backslash.
    fn scan_escape_body(&mut self) -> EscapeResult {
        let Some(c) = self.peek() else {
            return EscapeResult::Eof;
        };
        match c {
            'x' => {
                self.advance();
                let hex = self.take_while_max(2, |c| c.is_ascii_hexdigit());
                if hex.len() < 2 {
                    return EscapeResult::Invalid(EscapeKind::Hex, "`\\x` needs exactly two hex digits".into());
                }
                decode_scalar(EscapeKind::Hex, hex)
            }
            'u' if self.peek_next() == Some('{') => {
                self.advance();
                self.advance();
                let hex = self.take_while_max(usize::MAX, |c| c.is_ascii_hexdigit());
                if hex.is_empty() || self.peek() != Some('}') {
                    return EscapeResult::Invalid(
                        EscapeKind::UnicodeBracketed,
                        "`\\u{...}` needs one or more hex digits and a closing `}`".into(),
                    );
                }
                self.advance();
                decode_scalar(EscapeKind::UnicodeBracketed, hex)
            }
            'u' => {
                self.advance();
                let hex = self.take_while_max(4, |c| c.is_ascii_hexdigit());
                if hex.len() < 4 {
                    return EscapeResult::Invalid(
                        EscapeKind::UnicodeUnbracketed,
                        "`\\u` needs exactly four hex digits".into(),
                    );
                }
                decode_scalar(EscapeKind::UnicodeUnbracketed, hex)
            }
            '0'..='7' => {
                let digits = self.take_while_max(3, |c| matches!(c, '0'..='7'));
                match u32::from_str_radix(digits, 8).ok().and_then(char::from_u32) {
                    Some(ch) => EscapeResult::Char(EscapeKind::Octal, ch),
                    None => EscapeResult::Invalid(EscapeKind::Octal, format!("invalid octal escape `\\{digits}`")),
                }
            }
            other => {
                self.advance();
                EscapeResult::Char(EscapeKind::Ignore, decode_simple(other))
            }
        }
    }

    // ========================================================================
    // String mode
    // ========================================================================

    /// Scan one piece of a string literal: a fragment, an escape, or the closing quote.
    pub(super) fn scan_string_piece(&mut self) {
        let start = self.pos;
        match self.peek() {
            Some('"') => {
                self.advance();
                self.add_token(TokenKind::StringEnd, start);
                self.pop_mode();
            }
            Some('\\') => self.scan_escape(start),
            Some(_) => {
                while self.peek().is_some_and(|c| c != '"' && c != '\\') {
                    self.advance();
                }
                let text = self.source[start..self.pos].to_string();
                self.add_token(TokenKind::StringFragment(text), start);
            }
            None => {}
        }
    }

    fn scan_escape(&mut self, start: usize) {
        self.advance(); // '\\'
        match self.scan_escape_body() {
            EscapeResult::Char(kind, value) => {
                let raw = self.source[start..self.pos].to_string();
                self.add_token(TokenKind::Escape(Escape { kind, value, raw }), start);
            }
            EscapeResult::Invalid(kind, message) => {
                self.error(LexError::InvalidEscape, message, Span::new(start, self.pos));
                let value = char::REPLACEMENT_CHARACTER;
                let raw = self.source[start..self.pos].to_string();
                self.add_token(TokenKind::Escape(Escape { kind, value, raw }), start);
            }
            EscapeResult::Eof => {
                self.error(
                    LexError::InvalidEscape,
                    "escape sequence at end of input",
                    Span::new(start, self.pos),
                );
            }
        }
    }

    // ========================================================================
    // Quoted mode
    // ========================================================================

    /// Consume `%fence{` (of byte length `len`) and enter quoted mode.
    pub(super) fn scan_quoted_open(&mut self, start: usize, len: usize) {
        // `%` + fence + `{`
        let fence = self.source[start + 1..start + len - 1].to_string();
        self.bump(len);
        self.add_token(TokenKind::QuotedStart(fence), start);
        self.push_mode(Mode::Quoted { open: start });
    }

    /// Scan one piece of a quoted literal: a fragment, `\}`, or the closing brace.
    ///
    /// ## Notes
    /// - A backslash not followed by `}` is ordinary fragment text.
    pub(super) fn scan_quoted_piece(&mut self) {
        let start = self.pos;
        match (self.peek(), self.peek_next()) {
            (Some('}'), _) => {
                self.advance();
                self.add_token(TokenKind::QuotedEnd, start);
                self.pop_mode();
            }
            (Some('\\'), Some('}')) => {
                self.advance();
                self.advance();
                self.add_token(TokenKind::QuotedEscape, start);
            }
            (Some(_), _) => {
                loop {
                    match (self.peek(), self.peek_next()) {
                        (None, _) | (Some('}'), _) | (Some('\\'), Some('}')) => break,
                        _ => {
                            self.advance();
                        }
                    }
                }
                let text = self.source[start..self.pos].to_string();
                self.add_token(TokenKind::QuotedFragment(text), start);
            }
            (None, _) => {}
        }
    }
}

fn decode_scalar(kind: EscapeKind, hex: &str) -> EscapeResult {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(ch) => EscapeResult::Char(kind, ch),
        None => EscapeResult::Invalid(kind, format!("`{hex}` is not a Unicode scalar value")),
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::{ErrorKind, LexError};
    use crate::lexer::{Escape, EscapeKind, TokenKind, lex, lex_recovering};

    fn kinds(source: &str) -> Vec<TokenKind> {
        let tokens = lex(source).unwrap_or_else(|errs| panic!("lex({source:?}) failed: {errs:?}"));
        tokens.into_iter().map(|t| t.kind).filter(|k| *k != TokenKind::Eof).collect()
    }

    fn esc(kind: EscapeKind, value: char, raw: &str) -> TokenKind {
        TokenKind::Escape(Escape {
            kind,
            value,
            raw: raw.to_string(),
        })
    }

    #[test]
    fn test_hex_escape_splits_fragments() {
        assert_eq!(
            kinds(r#""a\x41b""#),
            vec![
                TokenKind::StringStart,
                TokenKind::StringFragment("a".into()),
                esc(EscapeKind::Hex, 'A', r"\x41"),
                TokenKind::StringFragment("b".into()),
                TokenKind::StringEnd,
            ]
        );
    }

    #[test]
    fn test_escape_kinds() {
        let escapes: Vec<_> = kinds(r#""\n\"\q\101\u00e9\u{1F600}\0""#)
            .into_iter()
            .filter_map(|k| match k {
                TokenKind::Escape(e) => Some((e.kind, e.value)),
                _ => None,
            })
            .collect();
        assert_eq!(
            escapes,
            vec![
                (EscapeKind::Ignore, '\n'),
                (EscapeKind::Ignore, '"'),
                (EscapeKind::Ignore, 'q'),
                (EscapeKind::Octal, 'A'),
                (EscapeKind::UnicodeUnbracketed, 'é'),
                (EscapeKind::UnicodeBracketed, '😀'),
                (EscapeKind::Octal, '\0'),
            ]
        );
    }

    #[test]
    fn test_octal_takes_at_most_three_digits() {
        assert_eq!(
            kinds(r#""\1014""#),
            vec![
                TokenKind::StringStart,
                esc(EscapeKind::Octal, 'A', r"\101"),
                TokenKind::StringFragment("4".into()),
                TokenKind::StringEnd,
            ]
        );
    }

    #[test]
    fn test_invalid_escapes_are_reported() {
        for source in [r#""\xZ1""#, r#""\u12""#, r#""\u{}""#, r#""\u{D800}""#] {
            let (tokens, errors) = lex_recovering(source);
            assert_eq!(errors.len(), 1, "{source}: {errors:?}");
            assert_eq!(errors[0].kind, ErrorKind::Lex(LexError::InvalidEscape));
            assert!(
                tokens
                    .iter()
                    .any(|t| matches!(&t.kind, TokenKind::Escape(e) if e.value == char::REPLACEMENT_CHARACTER)),
                "{source}: {tokens:?}"
            );
        }
    }

    #[test]
    fn test_string_may_span_lines() {
        assert_eq!(
            kinds("\"a\nb\""),
            vec![
                TokenKind::StringStart,
                TokenKind::StringFragment("a\nb".into()),
                TokenKind::StringEnd,
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let (tokens, errors) = lex_recovering("x \"abc");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Lex(LexError::UnterminatedLiteral));
        assert_eq!(errors[0].span.start, 2);
        // A zero-width closing token keeps the stream balanced.
        let end = &tokens[tokens.len() - 2];
        assert_eq!(end.kind, TokenKind::StringEnd);
        assert!(end.span.is_empty());
    }

    #[test]
    fn test_quoted_fence_and_escape() {
        assert_eq!(
            kinds(r"%re{a\}b}"),
            vec![
                TokenKind::QuotedStart("re".into()),
                TokenKind::QuotedFragment("a".into()),
                TokenKind::QuotedEscape,
                TokenKind::QuotedFragment("b".into()),
                TokenKind::QuotedEnd,
            ]
        );
    }

    #[test]
    fn test_quoted_keeps_other_backslashes() {
        assert_eq!(
            kinds(r"%re{\d+}"),
            vec![
                TokenKind::QuotedStart("re".into()),
                TokenKind::QuotedFragment(r"\d+".into()),
                TokenKind::QuotedEnd,
            ]
        );
    }

    #[test]
    fn test_unterminated_quoted() {
        let (tokens, errors) = lex_recovering("%sh{echo");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Lex(LexError::UnterminatedLiteral));
        assert!(tokens.iter().any(|t| t.kind == TokenKind::QuotedEnd));
    }
}
