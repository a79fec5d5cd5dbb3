/// Grammar context the parser is currently inside.
///
/// Contexts form a stack. They decide which token ends the current sequence, whether commas separate its
/// elements, and where error recovery may resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Source,
    Args,
    FunParams,
    FunBody,
    TypeBody,
    List,
    Record,
    Shell,
    ShellVar,
}

impl Context {
    fn closer(self) -> Option<PunctuationId> {
        match self {
            Context::Source => None,
            Context::Args | Context::FunParams => Some(PunctuationId::RParen),
            Context::List => Some(PunctuationId::RBracket),
            Context::FunBody | Context::TypeBody | Context::Record | Context::ShellVar => Some(PunctuationId::RBrace),
            Context::Shell => Some(PunctuationId::Semicolon),
        }
    }

    fn comma_separated(self) -> bool {
        matches!(self, Context::Args | Context::FunParams | Context::List | Context::Record)
    }

    fn describe(self) -> &'static str {
        match self {
            Context::Source => "top-level forms",
            Context::Args => "call arguments",
            Context::FunParams => "parameter list",
            Context::FunBody => "function body",
            Context::TypeBody => "type body",
            Context::List => "list",
            Context::Record => "record",
            Context::Shell => "shell command",
            Context::ShellVar => "`${...}` interpolation",
        }
    }

    /// Tokens at which recovery may stop once it has skipped at least one token.
    fn resume(self) -> fn(&TokenKind) -> bool {
        match self {
            Context::Source | Context::FunBody | Context::ShellVar => can_start_form,
            Context::Record | Context::TypeBody | Context::FunParams => starts_entry,
            Context::Args | Context::List | Context::Shell => never,
        }
    }
}

/// Return `true` if `kind` can begin a form.
fn can_start_form(kind: &TokenKind) -> bool {
    match kind {
        TokenKind::Symbol(_)
        | TokenKind::Number(_)
        | TokenKind::Path(_)
        | TokenKind::StringStart
        | TokenKind::QuotedStart(_)
        | TokenKind::Reserved(_) => true,
        TokenKind::Operator(id) => *id == OperatorId::Assign,
        TokenKind::Punctuation(p) => matches!(p, PunctuationId::LBracket | PunctuationId::LBrace | PunctuationId::Arrow),
        TokenKind::Keyword(k) => k == "fun",
        _ => false,
    }
}

fn never(_: &TokenKind) -> bool {
    false
}

/// Return `true` if `kind` begins a record/type entry or a parameter.
fn starts_entry(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Keyword(_)) || kind.is_reserved(ReservedId::Fun)
}

/// Deepest form nesting the parser descends into before reporting an error.
const MAX_NESTING: usize = 128;

const FORM_START: [&str; 7] = ["symbol", "literal", "path", "`[`", "`{`", "`fun`", "`type`"];

/// Used when a caller hands over a token stream without a trailing `Eof`.
static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: Span { start: 0, end: 0 },
    pos: Position { line: 1, column: 1 },
};

/// Parser state.
///
/// ## Notes
/// - The parser is single-pass with bounded lookahead (one token, plus adjacency checks between neighbours).
/// - Most parsing helpers are implemented on `Parser` but split across multiple files.
pub struct Parser<'a> {
    tokens: Vec<&'a Token>,
    pos: usize,
    /// End offset of the last consumed token
    last_end: usize,
    comments: Vec<Comment>,
    errors: Vec<SyntaxError>,
    contexts: Vec<Context>,
    /// Current form nesting, bounded by `MAX_NESTING`
    depth: usize,
    /// Stop after this many errors
    limit: Option<usize>,
}

impl<'a> Parser<'a> {
    /// Create a new parser for a token stream.
    ///
    /// ## Parameters
    /// - `tokens`: Token stream produced by `dash_syntax::lexer`. Comment tokens are collected as trivia.
    pub fn new(tokens: &'a [Token]) -> Self {
        let mut significant = Vec::with_capacity(tokens.len());
        let mut comments = Vec::new();
        for token in tokens {
            match &token.kind {
                TokenKind::Comment(text) => comments.push(Comment {
                    text: text.clone(),
                    span: token.span,
                }),
                _ => significant.push(token),
            }
        }
        if !significant.last().is_some_and(|t| t.kind == TokenKind::Eof) {
            significant.push(&EOF_TOKEN);
        }
        Self {
            tokens: significant,
            pos: 0,
            last_end: 0,
            comments,
            errors: Vec::new(),
            contexts: Vec::new(),
            depth: 0,
            limit: None,
        }
    }

    /// Apply comment and error-limit settings from `options`.
    pub fn with_options(mut self, options: &ParseOptions) -> Self {
        if !options.keep_comments {
            self.comments.clear();
        }
        self.limit = options.error_limit();
        self
    }

    /// Stop recording errors (and stop parsing) once `limit` errors have been seen.
    pub fn with_error_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Parse the entire token stream.
    ///
    /// Always produces a tree; the error list is empty exactly when the input was well-formed.
    pub fn parse(mut self) -> (Source, Vec<SyntaxError>) {
        let mut body = Vec::new();
        self.contexts.push(Context::Source);

        while !self.is_at_end() && !self.halted() {
            body.push(self.form());
        }

        self.contexts.pop();
        let end = self.tokens.last().map_or(0, |t| t.span.end);
        tracing::debug!(forms = body.len(), errors = self.errors.len(), "parsed source");
        let source = Source {
            body,
            comments: self.comments,
            span: Span::new(0, end),
        };
        (source, self.errors)
    }
}
