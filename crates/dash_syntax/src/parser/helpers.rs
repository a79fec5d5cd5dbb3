/// Token-stream helpers and error recovery.
///
/// This chunk contains the low-level primitives used throughout parsing:
/// - Peeking/consuming tokens (`peek`, `advance`)
/// - Matching / expecting punctuation and reserved words
/// - Error reporting (`report`, `unexpected`) honouring the error limit
/// - Error recovery (`synchronize`, `recover`, `close`)
impl<'a> Parser<'a> {
    // ========================================================================
    // Helpers
    // ========================================================================

    /// Return `true` if the current token is [`TokenKind::Eof`].
    fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    /// Return the current token without consuming it.
    fn peek(&self) -> &'a Token {
        self.tokens[self.pos]
    }

    /// Advance to the next token and return the token we just consumed.
    fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if !self.is_at_end() {
            self.pos += 1;
            self.last_end = token.span.end;
        }
        token
    }

    /// Return `true` if the current token is the given punctuation.
    fn check_punct(&self, id: PunctuationId) -> bool {
        self.peek().kind.is_punctuation(id)
    }

    fn match_punct(&mut self, id: PunctuationId) -> bool {
        if self.check_punct(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    fn context(&self) -> Context {
        self.contexts.last().copied().unwrap_or(Context::Source)
    }

    /// Run `f` with `ctx` pushed on the context stack.
    fn within<T>(&mut self, ctx: Context, f: impl FnOnce(&mut Self) -> T) -> T {
        self.contexts.push(ctx);
        let out = f(self);
        self.contexts.pop();
        out
    }

    /// Return `true` if the current token closes some context below the innermost one.
    fn at_enclosing_closer(&self) -> bool {
        let kind = &self.peek().kind;
        let n = self.contexts.len().saturating_sub(1);
        self.contexts[..n]
            .iter()
            .any(|ctx| ctx.closer().is_some_and(|c| kind.is_punctuation(c)))
    }

    /// Return `true` if a delimited sequence ending in `closer` should stop here.
    fn at_sequence_end(&self, closer: PunctuationId) -> bool {
        self.halted() || self.is_at_end() || self.check_punct(closer) || self.at_enclosing_closer()
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Return `true` once the configured number of errors has been recorded.
    fn halted(&self) -> bool {
        self.limit.is_some_and(|limit| self.errors.len() >= limit)
    }

    fn error_at(&self, kind: ParseError, message: impl Into<String>, token: &Token) -> SyntaxError {
        SyntaxError::new(kind, message, token.span, token.pos)
    }

    /// Record an error unless the error limit has been reached.
    fn report(&mut self, error: SyntaxError) {
        if self.halted() {
            return;
        }
        tracing::debug!(kind = ?error.kind, span = ?error.span, message = %error.message, "parse error");
        self.errors.push(error);
    }

    /// Report the current token as unexpected in the current context.
    fn unexpected<I, S>(&mut self, expected: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let token = self.peek();
        let message = format!("unexpected {} in {}", token.kind.describe(), self.context().describe());
        let error = self.error_at(ParseError::UnexpectedToken, message, token).with_expected(expected);
        self.report(error);
    }

    /// Consume `closer` or report the delimiter opened by `open` as unclosed.
    fn close(&mut self, closer: PunctuationId, open: &Token) {
        if self.match_punct(closer) {
            return;
        }
        let found = self.peek().kind.describe();
        let error = self
            .error_at(
                ParseError::UnclosedDelimiter,
                format!("unclosed {}", open.kind.describe()),
                open,
            )
            .with_expected([format!("`{}`", punctuation::as_str(closer))])
            .with_note(format!("found {found} instead"));
        self.report(error);
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    /// Return `true` if the current token belongs to an enclosing construct and must not be skipped.
    fn at_recovery_boundary(&self) -> bool {
        let kind = &self.peek().kind;
        let ctx = self.context();
        self.is_at_end()
            || self
                .contexts
                .iter()
                .any(|c| c.closer().is_some_and(|closer| kind.is_punctuation(closer)))
            || (ctx.comma_separated() && kind.is_punctuation(PunctuationId::Comma))
    }

    /// Skip tokens until a plausible restart point at the current nesting depth.
    ///
    /// Stops (without consuming) at a closer, a comma or a `;` at depth zero, or at a token accepted by
    /// `resume` once at least one token has been skipped. Brackets, `${` and `$ ...;` are skipped as units.
    fn synchronize(&mut self, resume: fn(&TokenKind) -> bool) {
        let mut depth = 0usize;
        let mut skipped = false;
        loop {
            let kind = &self.peek().kind;
            match kind {
                TokenKind::Eof => break,
                TokenKind::Punctuation(p) if punctuation::is_opener(*p) => depth += 1,
                TokenKind::ShellVarOpen => depth += 1,
                TokenKind::Operator(operators::OperatorId::Dollar) => depth += 1,
                TokenKind::Punctuation(p) if punctuation::is_closer(*p) || *p == PunctuationId::Semicolon => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Punctuation(PunctuationId::Comma) if depth == 0 => break,
                _ if depth == 0 && skipped && resume(kind) => break,
                _ => {}
            }
            self.advance();
            skipped = true;
        }
    }

    /// Skip a malformed region and return a placeholder covering it.
    ///
    /// If resynchronizing made no progress and the current token is not owned by an enclosing construct, the
    /// token is consumed so the caller always moves forward.
    fn recover(&mut self) -> ErrorNode {
        let start_pos = self.pos;
        let start = self.peek().span.start;
        self.synchronize(self.context().resume());
        if self.pos == start_pos && !self.at_recovery_boundary() {
            self.advance();
        }
        let span = if self.pos == start_pos {
            Span::empty(start)
        } else {
            self.span_from(start)
        };
        tracing::trace!(?span, context = ?self.context(), "recovered");
        ErrorNode { span }
    }
}
