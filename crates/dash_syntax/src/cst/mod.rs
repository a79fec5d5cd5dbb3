//! Concrete syntax tree for Dash.
//!
//! The tree is made of plain owned structs and enums: every node owns its children and records the byte span of
//! the source it was parsed from. Two views are offered:
//!
//! - the **typed** view (this module): `Form`, `Call`, `Fun`, ... with Rust fields;
//! - the **generic** view ([`NodeRef`]): node kind, span and named-field access by grammar field name
//!   (`Left`, `AnonymousArgs`, ...), for consumers that walk trees uniformly.
//!
//! ## Notes
//! - Comments never appear inside named fields; they are collected on [`Source::comments`].
//! - `Form::Error` (and `ShellArg::Error`) mark regions the parser could not make sense of. Each one has a
//!   matching entry in the error list returned by the parser.
//!
//! ## Examples
//! ```rust
//! use dash_syntax::cst::{Form, InfixKind};
//!
//! let source = dash_syntax::parse("a . b = c").into_result().unwrap();
//! let Form::Infix(assign) = &source.body[0] else { panic!("expected infix") };
//! assert_eq!(assign.kind, InfixKind::Equal);
//! ```

mod node;
mod sexp;
mod visit;

pub use node::{Field, NodeKind, NodeRef, Supertype};
pub use visit::{
    Visitor, walk_call, walk_form, walk_fun, walk_infix, walk_keyval, walk_shell, walk_shell_arg, walk_source,
    walk_type_decl, walk_type_expr,
};

pub use crate::lexer::EscapeKind;
use crate::span::Span;
use dash_core::lang::operators::OperatorId;

// ============================================================================
// Root
// ============================================================================

/// The root of every tree: zero or more top-level forms in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Source {
    pub body: Vec<Form>,
    /// Comments, in source order (trivia; not part of any field).
    pub comments: Vec<Comment>,
    pub span: Span,
}

/// A `# ...` comment. `text` excludes the leading `#`.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

// ============================================================================
// Forms
// ============================================================================

/// Any syntactic unit that can stand on its own.
#[derive(Debug, Clone, PartialEq)]
pub enum Form {
    Call(Call),
    Infix(Box<Infix>),
    Fun(Fun),
    Type(TypeDecl),
    Literal(Literal),
    Symbol(Symbol),
    List(List),
    Record(Record),
    Path(PathLit),
    /// Placeholder for a region that failed to parse.
    Error(ErrorNode),
}

impl Form {
    pub fn span(&self) -> Span {
        match self {
            Form::Call(n) => n.span,
            Form::Infix(n) => n.span,
            Form::Fun(n) => n.span,
            Form::Type(n) => n.span,
            Form::Literal(n) => n.span(),
            Form::Symbol(n) => n.span,
            Form::List(n) => n.span,
            Form::Record(n) => n.span,
            Form::Path(n) => n.span,
            Form::Error(n) => n.span,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Form::Error(_))
    }
}

/// An identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub span: Span,
}

/// `name:`; `name` excludes the colon, `span` includes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub name: String,
    pub span: Span,
}

/// `./a`, `/usr/bin`, `a/b`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathLit {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorNode {
    pub span: Span,
}

// ============================================================================
// Calls and key/value pairs
// ============================================================================

/// `name(args...)`, with `(` immediately after the name.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: Symbol,
    pub args: KwArgs,
    pub span: Span,
}

/// The parenthesized argument list of a call: positional forms first, then `keyword value` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct KwArgs {
    pub anonymous: Vec<Form>,
    pub named: Vec<KeyVal>,
    pub span: Span,
}

/// `keyword: value`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyVal {
    pub keyword: Keyword,
    pub value: Form,
    pub span: Span,
}

// ============================================================================
// Infix
// ============================================================================

/// Which infix production a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfixKind {
    /// `form $ shell;`
    Dollar,
    /// `form . form`
    Dot,
    /// `form = form`
    Equal,
}

impl InfixKind {
    pub fn from_operator(id: OperatorId) -> Option<Self> {
        match id {
            OperatorId::Dollar => Some(InfixKind::Dollar),
            OperatorId::Dot => Some(InfixKind::Dot),
            OperatorId::Assign => Some(InfixKind::Equal),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InfixKind::Dollar => "Dollar",
            InfixKind::Dot => "Dot",
            InfixKind::Equal => "Equal",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Infix {
    pub kind: InfixKind,
    pub left: Form,
    pub operator: Operator,
    pub right: InfixRhs,
    pub span: Span,
}

/// The operator token of an infix node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Operator {
    pub id: OperatorId,
    pub span: Span,
}

/// Right operand: a form for `.`/`=`, a shell command for `$`.
#[derive(Debug, Clone, PartialEq)]
pub enum InfixRhs {
    Form(Form),
    Shell(Shell),
}

impl InfixRhs {
    pub fn span(&self) -> Span {
        match self {
            InfixRhs::Form(f) => f.span(),
            InfixRhs::Shell(s) => s.span,
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// `fun [name] [(params)] [: ret] { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Fun {
    pub name: Option<Symbol>,
    pub arg_types: Option<KwTypes>,
    pub return_type: Option<TypeExpr>,
    pub body: Vec<Form>,
    pub span: Span,
}

/// `(name: Type ...)` parameter list of a `fun`.
#[derive(Debug, Clone, PartialEq)]
pub struct KwTypes {
    pub named: Vec<KeyType>,
    pub span: Span,
}

/// `name: Type`
#[derive(Debug, Clone, PartialEq)]
pub struct KeyType {
    pub keyword: Keyword,
    pub ty: TypeExpr,
    pub span: Span,
}

/// `type [name] { fields and funs }`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: Option<Symbol>,
    pub body: Vec<FieldOrFun>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldOrFun {
    Field(KeyVal),
    Fun(Fun),
}

impl FieldOrFun {
    pub fn span(&self) -> Span {
        match self {
            FieldOrFun::Field(kv) => kv.span,
            FieldOrFun::Fun(f) => f.span,
        }
    }
}

/// Type expression: `Int`, `[Int]`, `A -> B`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Named(Symbol),
    List(Box<ListType>),
    Fun(Box<FunType>),
}

impl TypeExpr {
    pub fn span(&self) -> Span {
        match self {
            TypeExpr::Named(s) => s.span,
            TypeExpr::List(l) => l.span,
            TypeExpr::Fun(f) => f.span,
        }
    }
}

/// `[Inner]`
#[derive(Debug, Clone, PartialEq)]
pub struct ListType {
    pub inner: TypeExpr,
    pub span: Span,
}

/// `param -> ret`; right-associative, so `ret` may itself be a `FunType`.
#[derive(Debug, Clone, PartialEq)]
pub struct FunType {
    pub param: TypeExpr,
    pub ret: TypeExpr,
    pub span: Span,
}

// ============================================================================
// Collections
// ============================================================================

/// `[a, b c,]`
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub values: Vec<Form>,
    pub span: Span,
}

/// `{a: 1, b: 2}`
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key_values: Vec<KeyVal>,
    pub span: Span,
}

// ============================================================================
// Literals
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(Number),
    Boolean(Boolean),
    String(StringLit),
    Quoted(Quoted),
    Null(Null),
}

impl Literal {
    pub fn span(&self) -> Span {
        match self {
            Literal::Number(n) => n.span,
            Literal::Boolean(b) => b.span,
            Literal::String(s) => s.span,
            Literal::Quoted(q) => q.span,
            Literal::Null(n) => n.span,
        }
    }
}

/// Integer literal, kept as written (`-1`, `+7`).
#[derive(Debug, Clone, PartialEq)]
pub struct Number {
    pub text: String,
    pub span: Span,
}

impl Number {
    /// Parse the literal as an `i64`, if it fits.
    pub fn value(&self) -> Option<i64> {
        self.text.parse().ok()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boolean {
    pub value: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Null {
    pub span: Span,
}

/// `"..."`: raw fragments interleaved with decoded escapes.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLit {
    pub content: Vec<StringPart>,
    pub span: Span,
}

impl StringLit {
    /// The logical string value: fragments and decoded escapes concatenated in order.
    pub fn value(&self) -> String {
        let mut out = String::new();
        for part in &self.content {
            match part {
                StringPart::Fragment(f) => out.push_str(&f.text),
                StringPart::Escape(e) => out.push(e.value),
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StringPart {
    Fragment(StringFragment),
    Escape(EscapeSequence),
}

impl StringPart {
    pub fn span(&self) -> Span {
        match self {
            StringPart::Fragment(f) => f.span,
            StringPart::Escape(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringFragment {
    pub text: String,
    pub span: Span,
}

/// One escape: how it was written (`raw`, including the backslash) and what it means (`value`).
#[derive(Debug, Clone, PartialEq)]
pub struct EscapeSequence {
    pub kind: EscapeKind,
    pub value: char,
    pub raw: String,
    pub span: Span,
}

/// `%fence{...}`: only `\}` is an escape.
#[derive(Debug, Clone, PartialEq)]
pub struct Quoted {
    pub fence: String,
    pub parts: Vec<QuotedPart>,
    pub span: Span,
}

impl Quoted {
    /// The body with `\}` unescaped.
    pub fn value(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                QuotedPart::Fragment(f) => out.push_str(&f.text),
                QuotedPart::Escape(_) => out.push('}'),
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuotedPart {
    Fragment(QuotedFragment),
    Escape(QuotedEscape),
}

impl QuotedPart {
    pub fn span(&self) -> Span {
        match self {
            QuotedPart::Fragment(f) => f.span,
            QuotedPart::Escape(e) => e.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuotedFragment {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuotedEscape {
    pub span: Span,
}

// ============================================================================
// Shell
// ============================================================================

/// `command arg...;` on the right of `$`.
#[derive(Debug, Clone, PartialEq)]
pub struct Shell {
    pub command: ShellArg,
    pub arguments: Vec<ShellArg>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellArg {
    Call(Call),
    Quoted(Quoted),
    String(StringLit),
    Path(PathLit),
    Text(TextArg),
    Var(ShellVar),
    Error(ErrorNode),
}

impl ShellArg {
    pub fn span(&self) -> Span {
        match self {
            ShellArg::Call(n) => n.span,
            ShellArg::Quoted(n) => n.span,
            ShellArg::String(n) => n.span,
            ShellArg::Path(n) => n.span,
            ShellArg::Text(n) => n.span,
            ShellArg::Var(n) => n.span,
            ShellArg::Error(n) => n.span,
        }
    }
}

/// Raw shell text, possibly glued to `$var`/`${form}` interpolations (`pre$HOME/x`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextArg {
    pub parts: Vec<TextPart>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextPart {
    Text(TextFragment),
    Var(ShellVar),
}

impl TextPart {
    pub fn span(&self) -> Span {
        match self {
            TextPart::Text(t) => t.span,
            TextPart::Var(v) => v.span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub span: Span,
}

/// `$name` or `${form}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellVar {
    pub target: ShellVarTarget,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellVarTarget {
    Symbol(Symbol),
    Form(Box<Form>),
}
