//! Syntax frontend for the Dash language (the Bass grammar): lexer, parser, concrete syntax tree, diagnostics.
//!
//! The parser is error-tolerant: [`parse`] always returns a tree, with placeholder `ERROR` nodes standing in for
//! malformed regions, together with the list of errors found.
//!
//! ## Notes
//! - This crate is "syntax-only": it does not evaluate, resolve names, or check types.
//! - Vocabulary identity (reserved words/operators/punctuation) comes from `dash_core::lang` registries.
//! - All spans are byte offsets into the original text; positions are 1-based line/column.
//!
//! ## Examples
//! ```rust
//! let parsed = dash_syntax::parse("greeting = \"hi\"");
//! assert!(parsed.is_ok());
//! assert_eq!(parsed.source.body.len(), 1);
//!
//! let broken = dash_syntax::parse("[a, ), b]");
//! assert_eq!(broken.errors.len(), 1);
//! ```
//!
//! ## See also
//! - `dash_core::lang` for registry-backed language vocabulary.

pub mod cst;
pub mod diagnostics;
pub mod lexer;
pub mod options;
pub mod parser;
pub mod span;
pub mod token_helpers;

use cst::Source;
use diagnostics::SyntaxError;
use options::ParseOptions;

/// Result of parsing a whole text: the tree plus every lexical and syntax error, ordered by position.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub source: Source,
    pub errors: Vec<SyntaxError>,
}

impl Parsed {
    /// Return `true` if the text was well-formed.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Strict view: the tree when there were no errors, otherwise the errors.
    pub fn into_result(self) -> Result<Source, Vec<SyntaxError>> {
        if self.errors.is_empty() {
            Ok(self.source)
        } else {
            Err(self.errors)
        }
    }
}

/// Lex and parse `text` with default options (tolerant, comments kept, no error limit).
pub fn parse(text: &str) -> Parsed {
    parse_with(text, &ParseOptions::default())
}

/// Lex and parse `text`.
///
/// ## Notes
/// - Lexical errors count toward the error limit before the parser runs; with [`options::Recovery::FailFast`] a
///   lexical error means the parser records nothing further.
/// - The parser still runs when the lexer reported errors; the lexer already resynchronized, so the tree covers
///   the whole input.
#[tracing::instrument(skip_all, fields(len = text.len()))]
pub fn parse_with(text: &str, options: &ParseOptions) -> Parsed {
    let (tokens, mut errors) = lexer::lex_recovering(text);
    let limit = options.error_limit();
    if let Some(limit) = limit {
        errors.truncate(limit);
    }
    let remaining = limit.map(|limit| limit.saturating_sub(errors.len()));

    let (source, parse_errors) = parser::Parser::new(&tokens)
        .with_options(options)
        .with_error_limit(remaining)
        .parse();

    errors.extend(parse_errors);
    errors.sort_by_key(|e| e.span.start);
    tracing::debug!(forms = source.body.len(), errors = errors.len(), "parsed text");
    Parsed { source, errors }
}
