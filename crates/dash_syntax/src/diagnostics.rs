//! Positioned lexing and parsing errors.
//!
//! Every error the frontend reports is a [`SyntaxError`]: a kind, a byte span, the line/column of the span start,
//! the set of things that would have been accepted, plus free-form notes and hints.
//!
//! ## Notes
//! - `SyntaxError` implements [`miette::Diagnostic`] (code, label, help) but carries no source text; callers attach
//!   the source when rendering (see the `dash` CLI).

use std::fmt;

use miette::{Diagnostic, LabeledSpan};

use crate::span::{Position, Span};

/// Errors raised while turning text into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum LexError {
    #[error("unterminated literal")]
    UnterminatedLiteral,
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("invalid escape sequence")]
    InvalidEscape,
}

/// Errors raised while turning tokens into a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unclosed delimiter")]
    UnclosedDelimiter,
    #[error("missing required field")]
    MissingRequiredField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ErrorKind {
    /// Stable diagnostic code, e.g. `dash::parse::unexpected_token`.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Lex(LexError::UnterminatedLiteral) => "dash::lex::unterminated_literal",
            ErrorKind::Lex(LexError::UnexpectedCharacter) => "dash::lex::unexpected_character",
            ErrorKind::Lex(LexError::InvalidEscape) => "dash::lex::invalid_escape",
            ErrorKind::Parse(ParseError::UnexpectedToken) => "dash::parse::unexpected_token",
            ErrorKind::Parse(ParseError::UnclosedDelimiter) => "dash::parse::unclosed_delimiter",
            ErrorKind::Parse(ParseError::MissingRequiredField) => "dash::parse::missing_required_field",
        }
    }
}

/// A lexing or parsing error with location information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub pos: Position,
    /// Human-readable descriptions of what would have been accepted here.
    pub expected: Vec<String>,
    pub notes: Vec<String>,
    pub hints: Vec<String>,
}

impl SyntaxError {
    pub fn new(kind: impl Into<ErrorKind>, message: impl Into<String>, span: Span, pos: Position) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            span,
            pos,
            expected: Vec::new(),
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn with_expected<I, S>(mut self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected.extend(expected.into_iter().map(Into::into));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hints.push(hint.into());
        self
    }

    pub fn is_lex(&self) -> bool {
        matches!(self.kind, ErrorKind::Lex(_))
    }

    /// Render the `expected ...` clause, if any.
    pub fn expected_summary(&self) -> Option<String> {
        match self.expected.as_slice() {
            [] => None,
            [one] => Some(format!("expected {one}")),
            [init @ .., last] => Some(format!("expected one of {}, or {last}", init.join(", "))),
        }
    }
}

struct Help<'a>(&'a SyntaxError);

impl fmt::Display for Help<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = self
            .0
            .expected_summary()
            .into_iter()
            .chain(self.0.hints.iter().cloned())
            .chain(self.0.notes.iter().map(|n| format!("note: {n}")));
        if let Some(first) = lines.next() {
            f.write_str(&first)?;
        }
        for line in lines {
            write!(f, "\n{line}")?;
        }
        Ok(())
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        if self.expected.is_empty() && self.hints.is_empty() && self.notes.is_empty() {
            None
        } else {
            Some(Box::new(Help(self)))
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new_with_span(Some(self.kind.to_string()), self.span);
        Some(Box::new(std::iter::once(label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_summary() {
        let err = SyntaxError::new(ParseError::UnexpectedToken, "x", Span::empty(0), Position::default());
        assert_eq!(err.expected_summary(), None);
        let err = err.with_expected(["`)`"]);
        assert_eq!(err.expected_summary().as_deref(), Some("expected `)`"));
        let err = err.with_expected(["a form", "`,`"]);
        assert_eq!(
            err.expected_summary().as_deref(),
            Some("expected one of `)`, a form, or `,`")
        );
    }

    #[test]
    fn test_diagnostic_code_and_help() {
        let err = SyntaxError::new(
            LexError::UnterminatedLiteral,
            "unterminated string",
            Span::new(3, 4),
            Position { line: 1, column: 4 },
        )
        .with_hint("add a closing `\"`");
        assert_eq!(err.to_string(), "unterminated string");
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("dash::lex::unterminated_literal")
        );
        assert_eq!(err.help().map(|h| h.to_string()).as_deref(), Some("add a closing `\"`"));
        assert_eq!(err.labels().map(|l| l.count()), Some(1));
        assert!(err.is_lex());
    }
}
