/// Form parsing: precedence climbing, primaries, calls and collections.
///
/// ## Notes
/// - `form_bp(min)` only consumes operators the registry marks as active; reserved rows have no spelling, so the
///   lexer never produces them.
/// - A symbol is a call only when `(` follows it with no gap (`f(x)`, not `f (x)`).
impl<'a> Parser<'a> {
    // ========================================================================
    // Forms
    // ========================================================================

    fn form(&mut self) -> Form {
        self.form_bp(0)
    }

    /// Parse a form whose infix operators all have precedence `>= min`.
    ///
    /// Each call and each infix node built here counts toward `MAX_NESTING`. Past the limit the rest of the
    /// region is skipped and replaced by an error node.
    fn form_bp(&mut self, min: u8) -> Form {
        if self.depth >= MAX_NESTING {
            let token = self.peek();
            let error = self
                .error_at(ParseError::UnexpectedToken, "nesting too deep", token)
                .with_note(format!("forms may nest at most {MAX_NESTING} levels"));
            self.report(error);
            return Form::Error(self.recover());
        }
        let entry = self.depth;
        self.depth += 1;
        let mut left = self.primary();

        while !self.halted() {
            let Some(id) = self.peek().kind.infix_operator() else {
                break;
            };
            let info = operators::info_for(id);
            let Some(kind) = InfixKind::from_operator(id) else {
                break;
            };
            if info.precedence < min {
                break;
            }

            let op_token = self.advance();
            let operator = Operator { id, span: op_token.span };
            let right = match info.operand {
                Operand::Shell => InfixRhs::Shell(self.shell()),
                Operand::Form => InfixRhs::Form(self.form_bp(operators::right_binding_power(id))),
            };
            let span = left.span().merge(right.span());
            left = Form::Infix(Box::new(Infix {
                kind,
                left,
                operator,
                right,
                span,
            }));
            self.depth += 1;
        }

        self.depth = entry;
        left
    }

    fn primary(&mut self) -> Form {
        let token = self.peek();
        match &token.kind {
            TokenKind::Symbol(name) => self.symbol_or_call(name.clone()),
            // At form start `=` and `->` are ordinary symbol spellings.
            TokenKind::Operator(OperatorId::Assign) => {
                self.symbol_or_call(operators::as_str(OperatorId::Assign).to_string())
            }
            TokenKind::Punctuation(PunctuationId::Arrow) => {
                self.symbol_or_call(punctuation::as_str(PunctuationId::Arrow).to_string())
            }
            TokenKind::Number(text) => {
                self.advance();
                Form::Literal(Literal::Number(Number {
                    text: text.clone(),
                    span: token.span,
                }))
            }
            TokenKind::Path(text) => {
                self.advance();
                Form::Path(PathLit {
                    text: text.clone(),
                    span: token.span,
                })
            }
            TokenKind::StringStart => Form::Literal(Literal::String(self.string_lit())),
            TokenKind::QuotedStart(_) => Form::Literal(Literal::Quoted(self.quoted_lit())),
            TokenKind::Reserved(id) => match id {
                ReservedId::True | ReservedId::False => {
                    self.advance();
                    Form::Literal(Literal::Boolean(Boolean {
                        value: *id == ReservedId::True,
                        span: token.span,
                    }))
                }
                ReservedId::Null => {
                    self.advance();
                    Form::Literal(Literal::Null(Null { span: token.span }))
                }
                ReservedId::Fun => Form::Fun(self.fun()),
                ReservedId::Type => Form::Type(self.type_decl()),
            },
            // `fun: T { ... }` lexes its first two characters as a keyword token.
            TokenKind::Keyword(name) if name == "fun" => Form::Fun(self.fun()),
            TokenKind::Punctuation(PunctuationId::LBracket) => Form::List(self.list()),
            TokenKind::Punctuation(PunctuationId::LBrace) => Form::Record(self.record()),
            TokenKind::Operator(OperatorId::Dollar) => {
                let error = self
                    .error_at(ParseError::UnexpectedToken, "shell command without a left operand", token)
                    .with_hint("write a form before `$`, as in `x $ echo ${x};`");
                self.report(error);
                self.advance();
                // Still consume the command so its `;` doesn't surface as a second error.
                self.shell();
                Form::Error(ErrorNode {
                    span: self.span_from(token.span.start),
                })
            }
            _ => {
                self.unexpected(FORM_START);
                Form::Error(self.recover())
            }
        }
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// Consume the current token as a symbol named `name`, or as a call when `(` follows with no gap.
    fn symbol_or_call(&mut self, name: String) -> Form {
        let token = self.advance();
        let symbol = Symbol { name, span: token.span };
        if self.check_punct(PunctuationId::LParen) && token.is_adjacent_to(self.peek()) {
            Form::Call(self.call(symbol))
        } else {
            Form::Symbol(symbol)
        }
    }

    /// Parse `(args...)` after the callee name. The current token is `(`.
    fn call(&mut self, name: Symbol) -> Call {
        let open = self.advance();
        let mut anonymous = Vec::new();
        let mut named: Vec<KeyVal> = Vec::new();

        self.within(Context::Args, |p| {
            while !p.at_sequence_end(PunctuationId::RParen) {
                if matches!(p.peek().kind, TokenKind::Keyword(_)) {
                    named.push(p.keyval());
                } else {
                    let first = p.peek();
                    let form = p.form();
                    if let Some(last) = named.last() {
                        let error = SyntaxError::new(
                            ParseError::UnexpectedToken,
                            "positional argument after named arguments",
                            form.span(),
                            first.pos,
                        )
                        .with_hint(format!(
                            "move it before `{}:` or give it a name",
                            last.keyword.name
                        ));
                        p.report(error);
                    } else {
                        anonymous.push(form);
                    }
                }
                p.match_punct(PunctuationId::Comma);
            }
            p.close(PunctuationId::RParen, open);
        });

        let args = KwArgs {
            anonymous,
            named,
            span: self.span_from(open.span.start),
        };
        Call {
            span: self.span_from(name.span.start),
            name,
            args,
        }
    }

    /// Parse `keyword: value`. The current token is the keyword.
    fn keyval(&mut self) -> KeyVal {
        let token = self.advance();
        let name = match &token.kind {
            TokenKind::Keyword(name) => name.clone(),
            _ => String::new(),
        };
        let keyword = Keyword {
            name,
            span: token.span,
        };
        let value = if can_start_form(&self.peek().kind) || self.peek().kind.is_operator(OperatorId::Dollar)
        {
            self.form()
        } else {
            let error = self
                .error_at(
                    ParseError::MissingRequiredField,
                    format!("missing value for `{}:`", keyword.name),
                    token,
                )
                .with_expected(["a form"]);
            self.report(error);
            Form::Error(ErrorNode {
                span: Span::empty(keyword.span.end),
            })
        };
        KeyVal {
            span: keyword.span.merge(value.span()),
            keyword,
            value,
        }
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// `[` (form [`,`])* `]`
    fn list(&mut self) -> List {
        let open = self.advance();
        let mut values = Vec::new();
        self.within(Context::List, |p| {
            while !p.at_sequence_end(PunctuationId::RBracket) {
                values.push(p.form());
                p.match_punct(PunctuationId::Comma);
            }
            p.close(PunctuationId::RBracket, open);
        });
        List {
            values,
            span: self.span_from(open.span.start),
        }
    }

    /// `{` (keyval [`,`])* `}`
    fn record(&mut self) -> Record {
        let open = self.advance();
        let mut key_values = Vec::new();
        self.within(Context::Record, |p| {
            while !p.at_sequence_end(PunctuationId::RBrace) {
                if matches!(p.peek().kind, TokenKind::Keyword(_)) {
                    key_values.push(p.keyval());
                } else {
                    p.unexpected(["keyword"]);
                    p.recover();
                }
                p.match_punct(PunctuationId::Comma);
            }
            p.close(PunctuationId::RBrace, open);
        });
        Record {
            key_values,
            span: self.span_from(open.span.start),
        }
    }
}
