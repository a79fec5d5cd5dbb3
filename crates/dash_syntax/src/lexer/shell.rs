//! Shell-argument scanning
//!
//! After a `$` operator the lexer switches to shell mode until the next bare `;`. Whitespace separates arguments.
//! At the start of an argument the lexer recognizes the structured forms (strings, quoted literals, calls, paths,
//! comments); anywhere else only raw text and `$` variables exist.

use super::tokens::TokenKind;
use super::{Lexer, Mode, is_path_char, is_symbol_start, quoted_open_len, symbol_len};
use crate::diagnostics::LexError;
use crate::span::Span;
use dash_core::lang::punctuation::PunctuationId;

impl<'a> Lexer<'a> {
    fn shell_at_arg_start(&self) -> bool {
        matches!(self.mode(), Mode::Shell { at_arg_start: true, .. })
    }

    fn set_shell_arg_start(&mut self, value: bool) {
        if let Some(Mode::Shell { at_arg_start, .. }) = self.modes.last_mut() {
            *at_arg_start = value;
        }
    }

    pub(super) fn scan_shell(&mut self) {
        if self.skip_whitespace() {
            self.set_shell_arg_start(true);
        }

        let start = self.pos;
        let Some(c) = self.peek() else {
            return;
        };
        let at_arg_start = self.shell_at_arg_start();
        // Nested modes pushed below return here mid-argument.
        self.set_shell_arg_start(false);

        match c {
            ';' => {
                self.advance();
                self.add_punct(PunctuationId::Semicolon, start);
                self.pop_mode();
            }
            '$' => self.scan_shell_var(start),
            '#' if at_arg_start => self.scan_comment(start),
            '"' if at_arg_start => {
                self.advance();
                self.add_token(TokenKind::StringStart, start);
                self.push_mode(Mode::String { open: start });
            }
            '%' if at_arg_start && quoted_open_len(self.rest()) > 0 => {
                let len = quoted_open_len(self.rest());
                self.scan_quoted_open(start, len);
            }
            _ if at_arg_start && self.call_prefix_len() > 0 => {
                let len = self.call_prefix_len();
                let name = self.rest()[..len].to_string();
                self.bump(len);
                self.add_token(TokenKind::Symbol(name), start);
                let paren = self.pos;
                self.advance();
                self.add_punct(PunctuationId::LParen, paren);
                self.push_mode(Mode::Code {
                    closer: Some(PunctuationId::RParen),
                    depth: 0,
                });
            }
            _ if at_arg_start && self.path_word_len() > 0 => {
                let len = self.path_word_len();
                let text = self.rest()[..len].to_string();
                self.bump(len);
                self.add_token(TokenKind::Path(text), start);
            }
            _ => self.scan_shell_text(start),
        }
    }

    /// Byte length of `name` when the input starts with `name(`, otherwise 0.
    fn call_prefix_len(&self) -> usize {
        let rest = self.rest();
        let len = symbol_len(rest);
        if len > 0 && rest[len..].starts_with('(') { len } else { 0 }
    }

    /// Byte length of the whole whitespace-delimited word if it is a path, otherwise 0.
    fn path_word_len(&self) -> usize {
        let rest = self.rest();
        let len = rest.find(|c: char| c.is_whitespace() || c == ';').unwrap_or(rest.len());
        let word = &rest[..len];
        if word.contains('/') && word.chars().all(is_path_char) { len } else { 0 }
    }

    fn scan_shell_text(&mut self, start: usize) {
        while self.peek().is_some_and(|c| !c.is_whitespace() && c != '$' && c != ';') {
            self.advance();
        }
        let text = self.source[start..self.pos].to_string();
        self.add_token(TokenKind::ShellText(text), start);
    }

    /// Scan `$name` or `${`. A `$` followed by anything else is an error.
    fn scan_shell_var(&mut self, start: usize) {
        self.advance(); // '$'
        match self.peek() {
            Some('{') => {
                self.advance();
                self.add_token(TokenKind::ShellVarOpen, start);
                self.push_mode(Mode::Code {
                    closer: Some(PunctuationId::RBrace),
                    depth: 0,
                });
            }
            Some(c) if is_symbol_start(c) => {
                let len = symbol_len(self.rest());
                let name = self.rest()[..len].to_string();
                self.bump(len);
                self.add_token(TokenKind::ShellVar(name), start);
            }
            _ => {
                self.error(
                    LexError::UnexpectedCharacter,
                    "`$` in a shell command must start a variable",
                    Span::new(start, self.pos),
                )
                .hints
                .push("write `$name` or `${form}`".to_string());
            }
        }
    }
}
