//! Lexer for the Dash language
//!
//! Handles tokenization including:
//! - Symbols, keyword tokens (`name:`), numbers, paths and reserved words
//! - Operators (`$`, `.`, `=`) and punctuation
//! - String literals (`"..."`) with escape decoding
//! - Quoted literals (`%fence{...}`) where only `\}` is an escape
//! - Shell commands after `$`, up to the terminating `;`
//! - Comments (`# ...`), emitted as trivia tokens
//!
//! ## Module Structure
//!
//! - `tokens` - Token types (TokenKind, Token, Escape)
//! - `strings` - String/quoted literal scanning and escape decoding
//! - `shell` - Shell-argument scanning

mod shell;
mod strings;
pub mod tokens;

use std::collections::VecDeque;

pub use tokens::{Escape, EscapeKind, Token, TokenKind};

use crate::diagnostics::{LexError, SyntaxError};
use crate::span::{LineIndex, Span};
use dash_core::lang::operators::{self, OperatorId};
use dash_core::lang::punctuation::{self, PunctuationId};
use dash_core::lang::reserved;

// ============================================================================
// LEXER STATE
// ----------------------------------------------------------------------------
// Modes form a stack. The bottom is always top-level code.
//
// [Code] --`"`--> [String] --`"`--> pop
// [Code] --`%sym{`--> [Quoted] --`}`--> pop
// [Code] --`$`--> [Shell] --`;`--> pop
// [Shell] --`${`--> [Code until `}`] --`}`--> pop
// [Shell] --`sym(`--> [Code until `)`] --`)`--> pop
// ============================================================================

/// Lexical context on the mode stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Ordinary forms. `closer` ends the mode when seen at bracket depth zero.
    Code {
        closer: Option<PunctuationId>,
        depth: usize,
    },
    /// Shell command arguments. `open` is the offset of the `$`.
    Shell { open: usize, at_arg_start: bool },
    /// Inside `"..."`. `open` is the offset of the opening quote.
    String { open: usize },
    /// Inside `%fence{...}`. `open` is the offset of the `%`.
    Quoted { open: usize },
}

const TOP_LEVEL: Mode = Mode::Code {
    closer: None,
    depth: 0,
};

/// Lexer for Dash source code.
///
/// Tokens are produced on demand through [`Lexer::next_token`] (or the `Iterator` impl); every stream ends with a
/// single `Eof` token. Errors are collected rather than aborting, and unterminated constructs still get a
/// zero-width closing token so the parser sees a balanced stream.
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    index: LineIndex<'a>,
    modes: Vec<Mode>,
    pending: VecDeque<Token>,
    errors: Vec<SyntaxError>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            index: LineIndex::new(source),
            modes: vec![TOP_LEVEL],
            pending: VecDeque::new(),
            errors: Vec::new(),
            finished: false,
        }
    }

    /// Produce the next token, or `None` once `Eof` has been returned.
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(token);
            }
            if self.finished {
                return None;
            }
            if self.is_at_end() {
                self.finish();
            } else {
                self.scan_token();
            }
        }
    }

    /// Errors collected so far.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Tokenize the entire source code.
    ///
    /// Returns a vector of tokens on success, or a vector of errors on failure.
    /// The token stream always ends with an `Eof` token.
    pub fn tokenize(self) -> Result<Vec<Token>, Vec<SyntaxError>> {
        let (tokens, errors) = self.tokenize_recovering();
        if errors.is_empty() { Ok(tokens) } else { Err(errors) }
    }

    /// Tokenize the entire source, returning the (balanced) token stream together with any errors.
    pub fn tokenize_recovering(mut self) -> (Vec<Token>, Vec<SyntaxError>) {
        let tokens = self.by_ref().collect();
        (tokens, self.errors)
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut iter = self.rest().chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advance by `len` bytes (must land on a char boundary).
    fn bump(&mut self, len: usize) {
        self.pos += len;
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
        self.pos > start
    }

    // ========================================================================
    // Token / error helpers
    // ========================================================================

    fn add_token(&mut self, kind: TokenKind, start: usize) {
        let span = Span::new(start, self.pos);
        let pos = self.index.position(start);
        self.pending.push_back(Token::new(kind, span, pos));
    }

    fn add_op(&mut self, id: OperatorId, start: usize) {
        self.add_token(TokenKind::Operator(id), start);
    }

    fn add_punct(&mut self, id: PunctuationId, start: usize) {
        self.add_token(TokenKind::Punctuation(id), start);
    }

    fn error(&mut self, kind: LexError, message: impl Into<String>, span: Span) -> &mut SyntaxError {
        let pos = self.index.position(span.start);
        self.errors.push(SyntaxError::new(kind, message, span, pos));
        let last = self.errors.len() - 1;
        &mut self.errors[last]
    }

    // ========================================================================
    // Mode stack
    // ========================================================================

    fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(TOP_LEVEL)
    }

    fn push_mode(&mut self, mode: Mode) {
        tracing::trace!(?mode, offset = self.pos, "push lexer mode");
        self.modes.push(mode);
    }

    fn pop_mode(&mut self) {
        // The top-level code mode is never popped.
        if self.modes.len() > 1 {
            let mode = self.modes.pop();
            tracing::trace!(?mode, offset = self.pos, "pop lexer mode");
        }
    }

    /// Close every mode still open at end of input, then emit `Eof`.
    fn finish(&mut self) {
        let end = self.pos;
        while self.modes.len() > 1 {
            match self.mode() {
                Mode::String { open } => {
                    self.error(LexError::UnterminatedLiteral, "unterminated string", Span::new(open, open + 1))
                        .hints
                        .push("add a closing `\"`".to_string());
                    self.add_token(TokenKind::StringEnd, end);
                }
                Mode::Quoted { open } => {
                    self.error(
                        LexError::UnterminatedLiteral,
                        "unterminated quoted literal",
                        Span::new(open, open + 1),
                    )
                    .hints
                    .push("add a closing `}`".to_string());
                    self.add_token(TokenKind::QuotedEnd, end);
                }
                Mode::Shell { open, .. } => {
                    self.error(
                        LexError::UnterminatedLiteral,
                        "unterminated shell command",
                        Span::new(open, open + 1),
                    )
                    .hints
                    .push("end the command with `;`".to_string());
                    self.add_punct(PunctuationId::Semicolon, end);
                }
                // Unclosed brackets are reported by the parser.
                Mode::Code { .. } => {}
            }
            self.pop_mode();
        }
        self.add_token(TokenKind::Eof, end);
        self.finished = true;
    }

    // ========================================================================
    // Main scanning dispatch
    // ========================================================================

    fn scan_token(&mut self) {
        match self.mode() {
            Mode::Code { .. } => self.scan_code(),
            Mode::Shell { .. } => self.scan_shell(),
            Mode::String { .. } => self.scan_string_piece(),
            Mode::Quoted { .. } => self.scan_quoted_piece(),
        }
    }

    fn scan_code(&mut self) {
        self.skip_whitespace();

        let start = self.pos;
        let Some(c) = self.peek() else {
            return;
        };

        match c {
            '#' => self.scan_comment(start),
            '"' => {
                self.advance();
                self.add_token(TokenKind::StringStart, start);
                self.push_mode(Mode::String { open: start });
            }
            '(' => self.open_bracket(PunctuationId::LParen, start),
            '[' => self.open_bracket(PunctuationId::LBracket, start),
            '{' => self.open_bracket(PunctuationId::LBrace, start),
            ')' => self.close_bracket(PunctuationId::RParen, start),
            ']' => self.close_bracket(PunctuationId::RBracket, start),
            '}' => self.close_bracket(PunctuationId::RBrace, start),
            ',' => self.simple_punct(PunctuationId::Comma, start),
            ':' => self.simple_punct(PunctuationId::Colon, start),
            ';' => self.simple_punct(PunctuationId::Semicolon, start),
            '$' => {
                self.advance();
                self.add_op(OperatorId::Dollar, start);
                self.push_mode(Mode::Shell {
                    open: start,
                    at_arg_start: true,
                });
            }
            _ => self.scan_atom(start, c),
        }
    }

    fn scan_comment(&mut self, start: usize) {
        self.advance(); // '#'
        let text_start = self.pos;
        while self.peek().is_some_and(|c| c != '\n') {
            self.advance();
        }
        let text = self.source[text_start..self.pos].to_string();
        self.add_token(TokenKind::Comment(text), start);
    }

    fn simple_punct(&mut self, id: PunctuationId, start: usize) {
        self.advance();
        self.add_punct(id, start);
    }

    fn open_bracket(&mut self, id: PunctuationId, start: usize) {
        self.simple_punct(id, start);
        if let Some(Mode::Code { depth, .. }) = self.modes.last_mut() {
            *depth += 1;
        }
    }

    fn close_bracket(&mut self, id: PunctuationId, start: usize) {
        self.simple_punct(id, start);
        match self.modes.last_mut() {
            Some(Mode::Code {
                closer: Some(closer),
                depth: 0,
            }) if *closer == id => self.pop_mode(),
            Some(Mode::Code { depth, .. }) if *depth > 0 => *depth -= 1,
            _ => {}
        }
    }

    /// Scan a symbol, keyword, number, path, or the opening of a quoted literal by longest match.
    fn scan_atom(&mut self, start: usize, c: char) {
        let rest = self.rest();
        let number = number_len(rest);
        let path = path_len(rest);
        let symbol = symbol_len(rest);
        let quoted = quoted_open_len(rest);

        // Longest match wins; on a tie a number beats a symbol (`-1`).
        let longest = number.max(path).max(symbol).max(quoted);
        if longest == 0 {
            self.advance();
            if c == '.' {
                self.add_op(OperatorId::Dot, start);
            } else {
                self.error(
                    LexError::UnexpectedCharacter,
                    format!("unexpected character `{c}`"),
                    Span::new(start, self.pos),
                );
            }
            return;
        }

        if number == longest {
            self.bump(number);
            self.add_token(TokenKind::Number(rest[..number].to_string()), start);
        } else if quoted == longest {
            self.scan_quoted_open(start, quoted);
        } else if path == longest {
            self.bump(path);
            self.add_token(TokenKind::Path(rest[..path].to_string()), start);
        } else {
            self.bump(symbol);
            self.finish_symbol(start, &rest[..symbol]);
        }
    }

    /// Classify a scanned symbol: keyword token, reserved word, spelled operator/punctuation, or plain symbol.
    fn finish_symbol(&mut self, start: usize, text: &str) {
        if self.peek() == Some(':') {
            self.advance();
            self.add_token(TokenKind::Keyword(text.to_string()), start);
        } else if let Some(id) = reserved::from_str(text) {
            self.add_token(TokenKind::Reserved(id), start);
        } else if let Some(id) = operators::from_str(text) {
            self.add_op(id, start);
        } else if let Some(id) = punctuation::from_str(text) {
            self.add_punct(id, start);
        } else {
            self.add_token(TokenKind::Symbol(text.to_string()), start);
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

// ============================================================================
// Character classes
// ============================================================================

/// Characters that can never appear in a symbol.
fn is_symbol_excluded(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | '"' | '(' | ')' | '[' | ']' | '{' | '}' | ';' | '^' | '/' | ':' | '#' | '.' | '$')
}

pub(crate) fn is_symbol_start(c: char) -> bool {
    !is_symbol_excluded(c) && !c.is_ascii_digit()
}

pub(crate) fn is_symbol_continue(c: char) -> bool {
    !is_symbol_excluded(c)
}

pub(crate) fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '-' | '*' | '_')
}

/// Byte length of the symbol at the start of `s`, or 0.
pub(crate) fn symbol_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if is_symbol_start(c) => {}
        _ => return 0,
    }
    chars
        .find(|&(_, c)| !is_symbol_continue(c))
        .map_or(s.len(), |(i, _)| i)
}

/// Byte length of `[+-]?[0-9]+` at the start of `s`, or 0.
fn number_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let sign = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits = bytes[sign..].iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 { 0 } else { sign + digits }
}

/// Byte length of the path at the start of `s`: a run of path characters containing `/`. Otherwise 0.
pub(crate) fn path_len(s: &str) -> usize {
    let len = s.find(|c: char| !is_path_char(c)).unwrap_or(s.len());
    if s[..len].contains('/') { len } else { 0 }
}

/// Byte length of `%fence{` at the start of `s`, or 0.
pub(crate) fn quoted_open_len(s: &str) -> usize {
    let Some(after) = s.strip_prefix('%') else {
        return 0;
    };
    let fence = symbol_len(after);
    if fence > 0 && after[fence..].starts_with('{') {
        1 + fence + 1
    } else {
        0
    }
}

/// Convenience function to lex a source string.
///
/// This is a shorthand for `Lexer::new(source).tokenize()`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex(source: &str) -> Result<Vec<Token>, Vec<SyntaxError>> {
    Lexer::new(source).tokenize()
}

/// Lex a source string without failing: the returned token stream is always usable by the parser.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn lex_recovering(source: &str) -> (Vec<Token>, Vec<SyntaxError>) {
    Lexer::new(source).tokenize_recovering()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use dash_core::lang::reserved::ReservedId;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let tokens = lex(source).unwrap_or_else(|errs| panic!("lex({source:?}) failed: {errs:?}"));
        tokens.into_iter().map(|t| t.kind).filter(|k| *k != TokenKind::Eof).collect()
    }

    fn sym(s: &str) -> TokenKind {
        TokenKind::Symbol(s.to_string())
    }

    #[test]
    fn test_punctuation_registry_parity() {
        for p in punctuation::PUNCTUATION {
            let source = match p.id {
                // Closers only make sense after their opener.
                PunctuationId::RParen => "()",
                PunctuationId::RBracket => "[]",
                PunctuationId::RBrace => "{}",
                _ => p.canonical,
            };
            let tokens = lex(source).unwrap_or_else(|errs| panic!("lex({source:?}) failed: {errs:?}"));
            assert!(
                tokens.iter().any(|t| t.kind.is_punctuation(p.id)),
                "lex({source:?}) did not produce {:?}: {tokens:?}",
                p.id
            );
        }
    }

    #[test]
    fn test_reserved_registry_parity() {
        for r in reserved::RESERVED {
            assert_eq!(kinds(r.canonical), vec![TokenKind::Reserved(r.id)]);
        }
    }

    #[test]
    fn test_operator_registry_parity() {
        for o in operators::active() {
            for &sp in o.spellings {
                let (tokens, _) = lex_recovering(sp);
                assert!(tokens[0].kind.is_operator(o.id), "lex({sp:?}) gave {tokens:?}");
            }
        }
    }

    #[test]
    fn test_symbols_allow_operator_characters() {
        assert_eq!(
            kinds("foo-bar *x* <=> a=b %p"),
            vec![sym("foo-bar"), sym("*x*"), sym("<=>"), sym("a=b"), sym("%p")]
        );
    }

    #[test]
    fn test_standalone_equals_and_arrow() {
        assert_eq!(
            kinds("a = b -> c"),
            vec![
                sym("a"),
                TokenKind::Operator(OperatorId::Assign),
                sym("b"),
                TokenKind::Punctuation(PunctuationId::Arrow),
                sym("c"),
            ]
        );
    }

    #[test]
    fn test_numbers_beat_symbols_on_ties() {
        assert_eq!(
            kinds("42 -1 +7 - 1x"),
            vec![
                TokenKind::Number("42".into()),
                TokenKind::Number("-1".into()),
                TokenKind::Number("+7".into()),
                sym("-"),
                TokenKind::Number("1".into()),
                sym("x"),
            ]
        );
    }

    #[test]
    fn test_keyword_requires_adjacent_colon() {
        assert_eq!(kinds("name:"), vec![TokenKind::Keyword("name".into())]);
        assert_eq!(
            kinds("name :"),
            vec![sym("name"), TokenKind::Punctuation(PunctuationId::Colon)]
        );
        // A reserved spelling followed by `:` is a keyword token.
        assert_eq!(kinds("type:"), vec![TokenKind::Keyword("type".into())]);
    }

    #[test]
    fn test_paths() {
        assert_eq!(
            kinds("./foo /usr/bin a/b.txt ../up"),
            vec![
                TokenKind::Path("./foo".into()),
                TokenKind::Path("/usr/bin".into()),
                TokenKind::Path("a/b.txt".into()),
                TokenKind::Path("../up".into()),
            ]
        );
    }

    #[test]
    fn test_dot_operator() {
        assert_eq!(
            kinds("a.b"),
            vec![sym("a"), TokenKind::Operator(OperatorId::Dot), sym("b")]
        );
    }

    #[test]
    fn test_comment_is_trivia_token() {
        let tokens = lex("a # note\nb").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Comment(" note".into()));
        assert_eq!(tokens[1].span, Span::new(2, 8));
        assert_eq!(tokens[2].kind, sym("b"));
    }

    #[test]
    fn test_reserved_words() {
        assert_eq!(
            kinds("fun type true false null"),
            vec![
                TokenKind::Reserved(ReservedId::Fun),
                TokenKind::Reserved(ReservedId::Type),
                TokenKind::Reserved(ReservedId::True),
                TokenKind::Reserved(ReservedId::False),
                TokenKind::Reserved(ReservedId::Null),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = lex("a\n  bb").unwrap();
        assert_eq!((tokens[1].pos.line, tokens[1].pos.column), (2, 3));
        assert_eq!(tokens[1].span, Span::new(4, 6));
    }

    #[test]
    fn test_unicode_whitespace_separates_symbols() {
        let tokens = lex("a\u{85}b\u{a0}c").unwrap();
        let symbols: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .map(|t| (t.kind.clone(), t.span))
            .collect();
        assert_eq!(
            symbols,
            vec![
                (sym("a"), Span::new(0, 1)),
                (sym("b"), Span::new(3, 4)),
                (sym("c"), Span::new(6, 7)),
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, errors) = lex_recovering("a ^ b");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Lex(LexError::UnexpectedCharacter));
        assert_eq!(errors[0].span, Span::new(2, 3));
        // Lexing continues past the bad character.
        assert_eq!(tokens[1].kind, sym("b"));
    }

    #[test]
    fn test_brackets_track_nesting() {
        assert_eq!(
            kinds("f(a [b] {c: 1})"),
            vec![
                sym("f"),
                TokenKind::Punctuation(PunctuationId::LParen),
                sym("a"),
                TokenKind::Punctuation(PunctuationId::LBracket),
                sym("b"),
                TokenKind::Punctuation(PunctuationId::RBracket),
                TokenKind::Punctuation(PunctuationId::LBrace),
                TokenKind::Keyword("c".into()),
                TokenKind::Number("1".into()),
                TokenKind::Punctuation(PunctuationId::RBrace),
                TokenKind::Punctuation(PunctuationId::RParen),
            ]
        );
    }

    #[test]
    fn test_stream_always_ends_with_single_eof() {
        for source in ["", "a", "\"open", "$ echo", "%q{x"] {
            let (tokens, _) = lex_recovering(source);
            assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
            assert_eq!(tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(), 1);
        }
    }
}
