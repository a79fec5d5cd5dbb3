//! Parser for the Dash language
//!
//! Converts a token stream into a concrete syntax tree rooted at [`Source`]. Forms are parsed by recursive descent;
//! infix operators (`$`, `.`, `=`) by precedence climbing over the `dash_core::lang::operators` table.
//!
//! ## Notes
//! - The parser never gives up on the whole input. A malformed region becomes a `Form::Error` placeholder (where a
//!   form is expected), an error is recorded, and parsing resumes at the next comma, closer, or form start.
//! - Comment tokens are lifted out of the stream before parsing and end up on [`Source::comments`].
//!
//! ## Examples
//!
//! ```rust
//! use dash_syntax::{lexer, parser};
//!
//! let tokens = lexer::lex("f(1, k: 2)").unwrap();
//! let source = parser::parse(&tokens).unwrap();
//! assert_eq!(source.body.len(), 1);
//! ```

use crate::cst::*;
use crate::diagnostics::{ParseError, SyntaxError};
use crate::lexer::{Token, TokenKind};
use crate::options::ParseOptions;
use crate::span::{Position, Span};
use dash_core::lang::operators::{self, Operand, OperatorId};
use dash_core::lang::punctuation::{self, PunctuationId};
use dash_core::lang::reserved::ReservedId;

// NOTE: This module is split across multiple files using `include!` to keep all parser
// methods in the same Rust module (preserving privacy + call patterns) while avoiding
// a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/forms.rs");
include!("parser/decl.rs");
include!("parser/literals.rs");
include!("parser/shell.rs");
include!("parser/api.rs");
include!("parser/tests.rs");
