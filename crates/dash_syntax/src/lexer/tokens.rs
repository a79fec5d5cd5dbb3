//! Token types for the Dash lexer.
//!
//! Vocabulary tokens carry **registry-backed IDs**:
//! - `Reserved(ReservedId)` for `fun`, `type`, `true`, `false`, `null`
//! - `Operator(OperatorId)` for `$`, `.`, `=`
//! - `Punctuation(PunctuationId)` for delimiters, separators, `;` and `->`
//!
//! String, quoted and shell literals are not single tokens: the lexer emits their pieces (start, fragments,
//! escapes, end) so the parser can build one CST node per piece.
//!
//! ## Notes
//! - Use `crate::token_helpers` for ergonomic token matching at call sites.

use dash_core::lang::operators::OperatorId;
use dash_core::lang::punctuation::PunctuationId;
use dash_core::lang::reserved::ReservedId;

use crate::span::{Position, Span};

// ============================================================================
// TOKEN TYPES
// ============================================================================

/// Kind of token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ========== Vocabulary (ID-based) ==========
    Reserved(ReservedId),
    Operator(OperatorId),
    Punctuation(PunctuationId),

    // ========== Atoms ==========
    Symbol(String),
    /// `name:` lexed as one unit; the payload excludes the colon.
    Keyword(String),
    Number(String),
    Path(String),

    // ========== String literal pieces ==========
    StringStart,
    StringFragment(String),
    Escape(Escape),
    StringEnd,

    // ========== Quoted literal pieces ==========
    /// `%fence{`; the payload is the fence name.
    QuotedStart(String),
    QuotedFragment(String),
    /// `\}`
    QuotedEscape,
    QuotedEnd,

    // ========== Shell arguments ==========
    ShellText(String),
    /// `$name` inside a shell command; the payload excludes the `$`.
    ShellVar(String),
    /// `${`, followed by a form and a closing `}`.
    ShellVarOpen,

    // ========== Trivia ==========
    /// `# ...` up to the end of the line; the payload excludes the `#`.
    Comment(String),

    Eof,
}

/// Decoding rule used by an escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscapeKind {
    /// `\` followed by any other character (`\n`, `\"`, `\q`, ...).
    Ignore,
    /// `\` followed by one to three octal digits.
    Octal,
    /// `\xHH`
    Hex,
    /// `\uHHHH`
    UnicodeUnbracketed,
    /// `\u{H...}`
    UnicodeBracketed,
}

impl EscapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EscapeKind::Ignore => "Ignore",
            EscapeKind::Octal => "Octal",
            EscapeKind::Hex => "Hex",
            EscapeKind::UnicodeUnbracketed => "UnicodeUnbracketed",
            EscapeKind::UnicodeBracketed => "UnicodeBracketed",
        }
    }
}

/// A decoded escape sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escape {
    pub kind: EscapeKind,
    /// Decoded character; `U+FFFD` when the sequence was malformed.
    pub value: char,
    /// The sequence as written, backslash included.
    pub raw: String,
}

/// A token with its kind, source span and start position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub pos: Position,
}

impl Token {
    /// Construct a new token.
    pub fn new(kind: TokenKind, span: Span, pos: Position) -> Self {
        Self { kind, span, pos }
    }
}

impl TokenKind {
    /// Short human description used in "expected/found" messages.
    pub fn describe(&self) -> String {
        use dash_core::lang::{operators, punctuation, reserved};
        match self {
            TokenKind::Reserved(id) => format!("`{}`", reserved::as_str(*id)),
            TokenKind::Operator(id) => format!("`{}`", operators::as_str(*id)),
            TokenKind::Punctuation(id) => format!("`{}`", punctuation::as_str(*id)),
            TokenKind::Symbol(s) => format!("symbol `{s}`"),
            TokenKind::Keyword(k) => format!("keyword `{k}:`"),
            TokenKind::Number(n) => format!("number `{n}`"),
            TokenKind::Path(p) => format!("path `{p}`"),
            TokenKind::StringStart => "string".to_string(),
            TokenKind::StringFragment(_) => "string content".to_string(),
            TokenKind::Escape(_) => "escape sequence".to_string(),
            TokenKind::StringEnd => "`\"`".to_string(),
            TokenKind::QuotedStart(fence) => format!("quoted literal `%{fence}{{`"),
            TokenKind::QuotedFragment(_) => "quoted content".to_string(),
            TokenKind::QuotedEscape => "`\\}`".to_string(),
            TokenKind::QuotedEnd => "`}`".to_string(),
            TokenKind::ShellText(t) => format!("shell text `{t}`"),
            TokenKind::ShellVar(v) => format!("shell variable `${v}`"),
            TokenKind::ShellVarOpen => "`${`".to_string(),
            TokenKind::Comment(_) => "comment".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}
