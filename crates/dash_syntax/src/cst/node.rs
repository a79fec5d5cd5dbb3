//! Generic, name-addressed view over the typed tree.
//!
//! [`NodeRef`] borrows any node of the CST and exposes it uniformly: a [`NodeKind`] tag using the grammar's node
//! names, its span, leaf text, and children addressed by grammar field name. Tree walkers, renderers and tests use
//! this view so they don't need one `match` per node type.
//!
//! ## Notes
//! - Optional fields that are absent (`fun` without a name) are omitted: `field("Name")` returns `None`.
//! - Repeated fields are always present, possibly empty.
//! - `form` and `literal` are supertypes, not node kinds: a `Form::Symbol` is viewed as a `Symbol` node.

use super::*;
use crate::span::Span;
use dash_core::lang::operators::{self, OperatorId};

// ============================================================================
// Kinds and supertypes
// ============================================================================

/// Concrete node kind, named as in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Source,
    Comment,
    Call,
    KwArgs,
    KeyVal,
    Keyword,
    Symbol,
    Infix,
    DollarOperator,
    DotOperator,
    AssignOperator,
    Fun,
    KwTypes,
    KeyType,
    Type,
    FunType,
    ListType,
    List,
    Record,
    Path,
    Number,
    Boolean,
    String,
    StringFragment,
    EscapeSequence,
    Quoted,
    QuotedFragment,
    QuotedEscape,
    Null,
    Shell,
    TextArg,
    ShellText,
    ShellVar,
    Error,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Source => "source",
            NodeKind::Comment => "comment",
            NodeKind::Call => "Call",
            NodeKind::KwArgs => "kwargs",
            NodeKind::KeyVal => "keyval",
            NodeKind::Keyword => "keyword",
            NodeKind::Symbol => "Symbol",
            NodeKind::Infix => "Infix",
            NodeKind::DollarOperator => "dollarOperator",
            NodeKind::DotOperator => "dotOperator",
            NodeKind::AssignOperator => "assignOperator",
            NodeKind::Fun => "Fun",
            NodeKind::KwTypes => "kwtypes",
            NodeKind::KeyType => "keytype",
            NodeKind::Type => "Type",
            NodeKind::FunType => "funType",
            NodeKind::ListType => "listType",
            NodeKind::List => "List",
            NodeKind::Record => "Record",
            NodeKind::Path => "Path",
            NodeKind::Number => "Number",
            NodeKind::Boolean => "Boolean",
            NodeKind::String => "String",
            NodeKind::StringFragment => "stringFragment",
            NodeKind::EscapeSequence => "escapeSequence",
            NodeKind::Quoted => "Quoted",
            NodeKind::QuotedFragment => "quotedFragment",
            NodeKind::QuotedEscape => "quotedEscape",
            NodeKind::Null => "Null",
            NodeKind::Shell => "Shell",
            NodeKind::TextArg => "textarg",
            NodeKind::ShellText => "shellText",
            NodeKind::ShellVar => "shellvar",
            NodeKind::Error => "ERROR",
        }
    }

    /// Kind of the node built for an operator token.
    pub fn for_operator(id: OperatorId) -> NodeKind {
        match id {
            OperatorId::Dollar => NodeKind::DollarOperator,
            OperatorId::Dot => NodeKind::DotOperator,
            _ => NodeKind::AssignOperator,
        }
    }

    pub fn is_literal(self) -> bool {
        Supertype::Literal.covers(self)
    }

    pub fn is_form(self) -> bool {
        Supertype::Form.covers(self)
    }

    /// Supertypes this kind belongs to, outermost first.
    pub fn supertypes(self) -> &'static [Supertype] {
        if self.is_literal() {
            &[Supertype::Form, Supertype::Literal]
        } else if self.is_form() {
            &[Supertype::Form]
        } else {
            &[]
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstract node categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Supertype {
    Form,
    Literal,
}

impl Supertype {
    pub fn as_str(self) -> &'static str {
        match self {
            Supertype::Form => "form",
            Supertype::Literal => "literal",
        }
    }

    /// Whether `kind` is one of the concrete kinds this supertype stands for.
    pub fn covers(self, kind: NodeKind) -> bool {
        let literal = matches!(
            kind,
            NodeKind::Number | NodeKind::Boolean | NodeKind::String | NodeKind::Quoted | NodeKind::Null
        );
        match self {
            Supertype::Literal => literal,
            Supertype::Form => {
                literal
                    || matches!(
                        kind,
                        NodeKind::Call
                            | NodeKind::Infix
                            | NodeKind::Fun
                            | NodeKind::Type
                            | NodeKind::Symbol
                            | NodeKind::List
                            | NodeKind::Record
                            | NodeKind::Path
                    )
            }
        }
    }
}

// ============================================================================
// NodeRef
// ============================================================================

/// A borrowed reference to any node in the tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Source(&'a Source),
    Comment(&'a Comment),
    Call(&'a Call),
    KwArgs(&'a KwArgs),
    KeyVal(&'a KeyVal),
    Keyword(&'a Keyword),
    Symbol(&'a Symbol),
    Infix(&'a Infix),
    Operator(&'a Operator),
    Fun(&'a Fun),
    KwTypes(&'a KwTypes),
    KeyType(&'a KeyType),
    Type(&'a TypeDecl),
    FunType(&'a FunType),
    ListType(&'a ListType),
    List(&'a List),
    Record(&'a Record),
    Path(&'a PathLit),
    Number(&'a Number),
    Boolean(&'a Boolean),
    String(&'a StringLit),
    StringFragment(&'a StringFragment),
    EscapeSequence(&'a EscapeSequence),
    Quoted(&'a Quoted),
    QuotedFragment(&'a QuotedFragment),
    QuotedEscape(&'a QuotedEscape),
    Null(&'a Null),
    Shell(&'a Shell),
    TextArg(&'a TextArg),
    ShellText(&'a TextFragment),
    ShellVar(&'a ShellVar),
    Error(&'a ErrorNode),
}

/// Content of a named field.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<'a> {
    Node(NodeRef<'a>),
    Nodes(Vec<NodeRef<'a>>),
}

impl<'a> Field<'a> {
    /// The single child, if this is a single-node field.
    pub fn as_node(&self) -> Option<NodeRef<'a>> {
        match self {
            Field::Node(n) => Some(*n),
            Field::Nodes(_) => None,
        }
    }

    /// All children in the field, in source order.
    pub fn nodes(&self) -> Vec<NodeRef<'a>> {
        match self {
            Field::Node(n) => vec![*n],
            Field::Nodes(ns) => ns.clone(),
        }
    }
}

fn many<'a, T: 'a>(items: &'a [T]) -> Field<'a>
where
    NodeRef<'a>: From<&'a T>,
{
    Field::Nodes(items.iter().map(NodeRef::from).collect())
}

fn one<'a>(node: impl Into<NodeRef<'a>>) -> Field<'a> {
    Field::Node(node.into())
}

impl<'a> NodeRef<'a> {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeRef::Source(_) => NodeKind::Source,
            NodeRef::Comment(_) => NodeKind::Comment,
            NodeRef::Call(_) => NodeKind::Call,
            NodeRef::KwArgs(_) => NodeKind::KwArgs,
            NodeRef::KeyVal(_) => NodeKind::KeyVal,
            NodeRef::Keyword(_) => NodeKind::Keyword,
            NodeRef::Symbol(_) => NodeKind::Symbol,
            NodeRef::Infix(_) => NodeKind::Infix,
            NodeRef::Operator(op) => NodeKind::for_operator(op.id),
            NodeRef::Fun(_) => NodeKind::Fun,
            NodeRef::KwTypes(_) => NodeKind::KwTypes,
            NodeRef::KeyType(_) => NodeKind::KeyType,
            NodeRef::Type(_) => NodeKind::Type,
            NodeRef::FunType(_) => NodeKind::FunType,
            NodeRef::ListType(_) => NodeKind::ListType,
            NodeRef::List(_) => NodeKind::List,
            NodeRef::Record(_) => NodeKind::Record,
            NodeRef::Path(_) => NodeKind::Path,
            NodeRef::Number(_) => NodeKind::Number,
            NodeRef::Boolean(_) => NodeKind::Boolean,
            NodeRef::String(_) => NodeKind::String,
            NodeRef::StringFragment(_) => NodeKind::StringFragment,
            NodeRef::EscapeSequence(_) => NodeKind::EscapeSequence,
            NodeRef::Quoted(_) => NodeKind::Quoted,
            NodeRef::QuotedFragment(_) => NodeKind::QuotedFragment,
            NodeRef::QuotedEscape(_) => NodeKind::QuotedEscape,
            NodeRef::Null(_) => NodeKind::Null,
            NodeRef::Shell(_) => NodeKind::Shell,
            NodeRef::TextArg(_) => NodeKind::TextArg,
            NodeRef::ShellText(_) => NodeKind::ShellText,
            NodeRef::ShellVar(_) => NodeKind::ShellVar,
            NodeRef::Error(_) => NodeKind::Error,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            NodeRef::Source(n) => n.span,
            NodeRef::Comment(n) => n.span,
            NodeRef::Call(n) => n.span,
            NodeRef::KwArgs(n) => n.span,
            NodeRef::KeyVal(n) => n.span,
            NodeRef::Keyword(n) => n.span,
            NodeRef::Symbol(n) => n.span,
            NodeRef::Infix(n) => n.span,
            NodeRef::Operator(n) => n.span,
            NodeRef::Fun(n) => n.span,
            NodeRef::KwTypes(n) => n.span,
            NodeRef::KeyType(n) => n.span,
            NodeRef::Type(n) => n.span,
            NodeRef::FunType(n) => n.span,
            NodeRef::ListType(n) => n.span,
            NodeRef::List(n) => n.span,
            NodeRef::Record(n) => n.span,
            NodeRef::Path(n) => n.span,
            NodeRef::Number(n) => n.span,
            NodeRef::Boolean(n) => n.span,
            NodeRef::String(n) => n.span,
            NodeRef::StringFragment(n) => n.span,
            NodeRef::EscapeSequence(n) => n.span,
            NodeRef::Quoted(n) => n.span,
            NodeRef::QuotedFragment(n) => n.span,
            NodeRef::QuotedEscape(n) => n.span,
            NodeRef::Null(n) => n.span,
            NodeRef::Shell(n) => n.span,
            NodeRef::TextArg(n) => n.span,
            NodeRef::ShellText(n) => n.span,
            NodeRef::ShellVar(n) => n.span,
            NodeRef::Error(n) => n.span,
        }
    }

    /// Leaf text: the name of a symbol or keyword, a literal as written, the fence of a quoted literal, the raw
    /// escape sequence, or the operator spelling. `None` for interior nodes.
    pub fn text(&self) -> Option<&'a str> {
        match *self {
            NodeRef::Comment(n) => Some(n.text.as_str()),
            NodeRef::Keyword(n) => Some(n.name.as_str()),
            NodeRef::Symbol(n) => Some(n.name.as_str()),
            NodeRef::Operator(n) => Some(operators::as_str(n.id)),
            NodeRef::Path(n) => Some(n.text.as_str()),
            NodeRef::Number(n) => Some(n.text.as_str()),
            NodeRef::Boolean(n) => Some(if n.value { "true" } else { "false" }),
            NodeRef::StringFragment(n) => Some(n.text.as_str()),
            NodeRef::EscapeSequence(n) => Some(n.raw.as_str()),
            NodeRef::Quoted(n) => Some(n.fence.as_str()),
            NodeRef::QuotedFragment(n) => Some(n.text.as_str()),
            NodeRef::QuotedEscape(_) => Some("\\}"),
            NodeRef::ShellText(n) => Some(n.text.as_str()),
            _ => None,
        }
    }

    /// Production variant, for nodes that record one (`Infix` and `escapeSequence`).
    pub fn variant(&self) -> Option<&'static str> {
        match self {
            NodeRef::Infix(n) => Some(n.kind.as_str()),
            NodeRef::EscapeSequence(n) => Some(n.kind.as_str()),
            _ => None,
        }
    }

    /// Named fields in grammar order. Absent optional fields are left out.
    pub fn fields(&self) -> Vec<(&'static str, Field<'a>)> {
        let mut out = Vec::new();
        match *self {
            NodeRef::Source(n) => out.push(("Body", many(&n.body))),
            NodeRef::Call(n) => {
                out.push(("Name", one(&n.name)));
                out.push(("Args", one(&n.args)));
            }
            NodeRef::KwArgs(n) => {
                out.push(("AnonymousArgs", many(&n.anonymous)));
                out.push(("NamedArgs", many(&n.named)));
            }
            NodeRef::KeyVal(n) => {
                out.push(("Keyword", one(&n.keyword)));
                out.push(("Value", one(&n.value)));
            }
            NodeRef::Infix(n) => {
                out.push(("Left", one(&n.left)));
                out.push(("Operator", one(&n.operator)));
                out.push(("Right", one(&n.right)));
            }
            NodeRef::Fun(n) => {
                if let Some(name) = &n.name {
                    out.push(("Name", one(name)));
                }
                if let Some(args) = &n.arg_types {
                    out.push(("ArgTypes", one(args)));
                }
                if let Some(ret) = &n.return_type {
                    out.push(("ReturnType", one(ret)));
                }
                out.push(("Body", many(&n.body)));
            }
            NodeRef::KwTypes(n) => out.push(("NamedArgs", many(&n.named))),
            NodeRef::KeyType(n) => {
                out.push(("Keyword", one(&n.keyword)));
                out.push(("Type", one(&n.ty)));
            }
            NodeRef::Type(n) => {
                if let Some(name) = &n.name {
                    out.push(("Name", one(name)));
                }
                out.push(("Body", many(&n.body)));
            }
            NodeRef::FunType(n) => {
                out.push(("Param", one(&n.param)));
                out.push(("Return", one(&n.ret)));
            }
            NodeRef::ListType(n) => out.push(("Inner", one(&n.inner))),
            NodeRef::List(n) => out.push(("Values", many(&n.values))),
            NodeRef::Record(n) => out.push(("KeyValues", many(&n.key_values))),
            NodeRef::String(n) => out.push(("Content", many(&n.content))),
            NodeRef::Quoted(n) => out.push(("Content", many(&n.parts))),
            NodeRef::Shell(n) => {
                out.push(("Command", one(&n.command)));
                out.push(("Arguments", many(&n.arguments)));
            }
            NodeRef::TextArg(n) => out.push(("Parts", many(&n.parts))),
            NodeRef::ShellVar(n) => out.push(("Target", one(&n.target))),
            _ => {}
        }
        out
    }

    /// Look up one field by its grammar name.
    pub fn field(&self, name: &str) -> Option<Field<'a>> {
        self.fields().into_iter().find(|(n, _)| *n == name).map(|(_, f)| f)
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeRef<'a>> {
        self.fields().into_iter().flat_map(|(_, f)| f.nodes()).collect()
    }

    /// This node and every node below it, in pre-order.
    pub fn descendants(&self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        let mut stack = vec![*self];
        while let Some(node) = stack.pop() {
            out.push(node);
            let mut children = node.children();
            children.reverse();
            stack.extend(children);
        }
        out
    }
}

// ============================================================================
// Conversions
// ============================================================================

macro_rules! node_ref_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for NodeRef<'a> {
                fn from(node: &'a $ty) -> Self {
                    NodeRef::$variant(node)
                }
            }
        )*
    };
}

node_ref_from! {
    Source => Source,
    Comment => Comment,
    Call => Call,
    KwArgs => KwArgs,
    KeyVal => KeyVal,
    Keyword => Keyword,
    Symbol => Symbol,
    Infix => Infix,
    Operator => Operator,
    Fun => Fun,
    KwTypes => KwTypes,
    KeyType => KeyType,
    TypeDecl => Type,
    FunType => FunType,
    ListType => ListType,
    List => List,
    Record => Record,
    PathLit => Path,
    Number => Number,
    Boolean => Boolean,
    StringLit => String,
    StringFragment => StringFragment,
    EscapeSequence => EscapeSequence,
    Quoted => Quoted,
    QuotedFragment => QuotedFragment,
    QuotedEscape => QuotedEscape,
    Null => Null,
    Shell => Shell,
    TextArg => TextArg,
    TextFragment => ShellText,
    ShellVar => ShellVar,
    ErrorNode => Error,
}

impl<'a> From<&'a Form> for NodeRef<'a> {
    fn from(form: &'a Form) -> Self {
        match form {
            Form::Call(n) => NodeRef::Call(n),
            Form::Infix(n) => NodeRef::Infix(n),
            Form::Fun(n) => NodeRef::Fun(n),
            Form::Type(n) => NodeRef::Type(n),
            Form::Literal(n) => n.into(),
            Form::Symbol(n) => NodeRef::Symbol(n),
            Form::List(n) => NodeRef::List(n),
            Form::Record(n) => NodeRef::Record(n),
            Form::Path(n) => NodeRef::Path(n),
            Form::Error(n) => NodeRef::Error(n),
        }
    }
}

impl<'a> From<&'a Literal> for NodeRef<'a> {
    fn from(lit: &'a Literal) -> Self {
        match lit {
            Literal::Number(n) => NodeRef::Number(n),
            Literal::Boolean(n) => NodeRef::Boolean(n),
            Literal::String(n) => NodeRef::String(n),
            Literal::Quoted(n) => NodeRef::Quoted(n),
            Literal::Null(n) => NodeRef::Null(n),
        }
    }
}

impl<'a> From<&'a InfixRhs> for NodeRef<'a> {
    fn from(rhs: &'a InfixRhs) -> Self {
        match rhs {
            InfixRhs::Form(f) => f.into(),
            InfixRhs::Shell(s) => NodeRef::Shell(s),
        }
    }
}

impl<'a> From<&'a FieldOrFun> for NodeRef<'a> {
    fn from(item: &'a FieldOrFun) -> Self {
        match item {
            FieldOrFun::Field(kv) => NodeRef::KeyVal(kv),
            FieldOrFun::Fun(f) => NodeRef::Fun(f),
        }
    }
}

impl<'a> From<&'a TypeExpr> for NodeRef<'a> {
    fn from(ty: &'a TypeExpr) -> Self {
        match ty {
            TypeExpr::Named(s) => NodeRef::Symbol(s),
            TypeExpr::List(l) => NodeRef::ListType(l),
            TypeExpr::Fun(f) => NodeRef::FunType(f),
        }
    }
}

impl<'a> From<&'a StringPart> for NodeRef<'a> {
    fn from(part: &'a StringPart) -> Self {
        match part {
            StringPart::Fragment(f) => NodeRef::StringFragment(f),
            StringPart::Escape(e) => NodeRef::EscapeSequence(e),
        }
    }
}

impl<'a> From<&'a QuotedPart> for NodeRef<'a> {
    fn from(part: &'a QuotedPart) -> Self {
        match part {
            QuotedPart::Fragment(f) => NodeRef::QuotedFragment(f),
            QuotedPart::Escape(e) => NodeRef::QuotedEscape(e),
        }
    }
}

impl<'a> From<&'a ShellArg> for NodeRef<'a> {
    fn from(arg: &'a ShellArg) -> Self {
        match arg {
            ShellArg::Call(n) => NodeRef::Call(n),
            ShellArg::Quoted(n) => NodeRef::Quoted(n),
            ShellArg::String(n) => NodeRef::String(n),
            ShellArg::Path(n) => NodeRef::Path(n),
            ShellArg::Text(n) => NodeRef::TextArg(n),
            ShellArg::Var(n) => NodeRef::ShellVar(n),
            ShellArg::Error(n) => NodeRef::Error(n),
        }
    }
}

impl<'a> From<&'a TextPart> for NodeRef<'a> {
    fn from(part: &'a TextPart) -> Self {
        match part {
            TextPart::Text(t) => NodeRef::ShellText(t),
            TextPart::Var(v) => NodeRef::ShellVar(v),
        }
    }
}

impl<'a> From<&'a ShellVarTarget> for NodeRef<'a> {
    fn from(target: &'a ShellVarTarget) -> Self {
        match target {
            ShellVarTarget::Symbol(s) => NodeRef::Symbol(s),
            ShellVarTarget::Form(f) => NodeRef::from(&**f),
        }
    }
}

impl Source {
    /// Generic view of the root.
    pub fn node(&self) -> NodeRef<'_> {
        NodeRef::Source(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(source: &str) -> Source {
        crate::parse(source).into_result().unwrap_or_else(|errs| panic!("parse({source:?}) failed: {errs:?}"))
    }

    #[test]
    fn test_supertypes() {
        assert_eq!(NodeKind::Number.supertypes(), &[Supertype::Form, Supertype::Literal]);
        assert_eq!(NodeKind::Call.supertypes(), &[Supertype::Form]);
        assert!(NodeKind::KeyVal.supertypes().is_empty());
        assert!(!Supertype::Literal.covers(NodeKind::Symbol));
        assert!(Supertype::Form.covers(NodeKind::Path));
    }

    #[test]
    fn test_named_fields_of_call() {
        let source = tree("f(1, 2, k: 3, j: 4)");
        let call = source.node().children()[0];
        assert_eq!(call.kind(), NodeKind::Call);
        assert_eq!(call.field("Name").and_then(|f| f.as_node()).and_then(|n| n.text()), Some("f"));

        let args = call.field("Args").and_then(|f| f.as_node()).unwrap();
        assert_eq!(args.field("AnonymousArgs").unwrap().nodes().len(), 2);
        let named: Vec<_> = args
            .field("NamedArgs")
            .unwrap()
            .nodes()
            .iter()
            .map(|kv| kv.field("Keyword").and_then(|f| f.as_node()).and_then(|n| n.text()))
            .collect();
        assert_eq!(named, vec![Some("k"), Some("j")]);
    }

    #[test]
    fn test_absent_optional_field() {
        let source = tree("fun { x }");
        let fun = source.node().children()[0];
        assert!(fun.field("Name").is_none());
        assert!(fun.field("ReturnType").is_none());
        assert_eq!(fun.field("Body").unwrap().nodes().len(), 1);
        assert!(fun.field("Nope").is_none());
    }

    #[test]
    fn test_infix_variant_and_operator_kind() {
        let source = tree("a . b");
        let infix = source.node().children()[0];
        assert_eq!(infix.variant(), Some("Dot"));
        let op = infix.field("Operator").and_then(|f| f.as_node()).unwrap();
        assert_eq!(op.kind(), NodeKind::DotOperator);
        assert_eq!(op.text(), Some("."));
    }

    #[test]
    fn test_descendants_are_preorder() {
        let source = tree("[a, b]");
        let kinds: Vec<_> = source.node().descendants().iter().map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Source, NodeKind::List, NodeKind::Symbol, NodeKind::Symbol]
        );
    }

    #[test]
    fn test_child_spans_are_within_parent() {
        let source = tree(r#"x $ echo ${f("s")} pre$y; fun g(a: [Int]): A -> B { a }"#);
        for node in source.node().descendants() {
            let span = node.span();
            for child in node.children() {
                let c = child.span();
                assert!(span.start <= c.start && c.end <= span.end, "{node:?} does not contain {child:?}");
            }
        }
    }
}
