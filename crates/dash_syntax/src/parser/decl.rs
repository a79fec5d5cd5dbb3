/// Declaration parsing: `fun`, `type`, parameter lists and type expressions.
impl<'a> Parser<'a> {
    // ========================================================================
    // Functions
    // ========================================================================

    /// `fun [name] [(params)] [: type] { forms }`
    ///
    /// The current token is `fun`, or the keyword token `fun:` when the function is anonymous and has a return
    /// type. A name written `name:` is split the same way: the colon introduces the return type.
    fn fun(&mut self) -> Fun {
        let start = self.advance();
        let mut has_return = matches!(start.kind, TokenKind::Keyword(_));
        let mut name = None;
        let mut arg_types = None;

        if !has_return {
            let token = self.peek();
            match &token.kind {
                TokenKind::Symbol(n) => {
                    self.advance();
                    name = Some(Symbol {
                        name: n.clone(),
                        span: token.span,
                    });
                }
                TokenKind::Keyword(n) => {
                    self.advance();
                    name = Some(Symbol {
                        name: n.clone(),
                        span: Span::new(token.span.start, token.span.end - 1),
                    });
                    has_return = true;
                }
                _ => {}
            }
        }

        if !has_return {
            if self.check_punct(PunctuationId::LParen) {
                arg_types = Some(self.kwtypes());
            }
            has_return = self.match_punct(PunctuationId::Colon);
        }

        let return_type = if has_return { self.type_expr() } else { None };
        let body = self.body(Context::FunBody, "`fun`", |p| Some(p.form()));

        Fun {
            name,
            arg_types,
            return_type,
            body,
            span: self.span_from(start.span.start),
        }
    }

    /// `(` (keyword type [`,`])* `)`
    fn kwtypes(&mut self) -> KwTypes {
        let open = self.advance();
        let mut named = Vec::new();
        self.within(Context::FunParams, |p| {
            while !p.at_sequence_end(PunctuationId::RParen) {
                let token = p.peek();
                if let TokenKind::Keyword(name) = &token.kind {
                    p.advance();
                    let keyword = Keyword {
                        name: name.clone(),
                        span: token.span,
                    };
                    if let Some(ty) = p.type_expr() {
                        named.push(KeyType {
                            span: keyword.span.merge(ty.span()),
                            keyword,
                            ty,
                        });
                    }
                } else {
                    p.unexpected(["parameter such as `name: Type`"]);
                    p.recover();
                }
                p.match_punct(PunctuationId::Comma);
            }
            p.close(PunctuationId::RParen, open);
        });
        KwTypes {
            named,
            span: self.span_from(open.span.start),
        }
    }

    /// `{ item* }` for function and type bodies. Reports a missing body instead of failing.
    fn body<T>(&mut self, ctx: Context, owner: &str, mut item: impl FnMut(&mut Self) -> Option<T>) -> Vec<T> {
        let mut items = Vec::new();
        if !self.check_punct(PunctuationId::LBrace) {
            let error = self
                .error_at(
                    ParseError::MissingRequiredField,
                    format!("{owner} needs a body"),
                    self.peek(),
                )
                .with_expected(["`{`"]);
            self.report(error);
            return items;
        }

        let open = self.advance();
        self.within(ctx, |p| {
            while !p.at_sequence_end(PunctuationId::RBrace) {
                if let Some(value) = item(p) {
                    items.push(value);
                }
                if ctx.comma_separated() {
                    p.match_punct(PunctuationId::Comma);
                }
            }
            p.close(PunctuationId::RBrace, open);
        });
        items
    }

    // ========================================================================
    // Types
    // ========================================================================

    /// `type [name] { (keyval | fun)* }`
    fn type_decl(&mut self) -> TypeDecl {
        let start = self.advance();
        let token = self.peek();
        let name = match &token.kind {
            TokenKind::Symbol(n) => {
                self.advance();
                Some(Symbol {
                    name: n.clone(),
                    span: token.span,
                })
            }
            _ => None,
        };

        let body = self.body(Context::TypeBody, "`type`", |p| match &p.peek().kind {
            TokenKind::Keyword(_) => Some(FieldOrFun::Field(p.keyval())),
            TokenKind::Reserved(ReservedId::Fun) => Some(FieldOrFun::Fun(p.fun())),
            _ => {
                p.unexpected(["field such as `name: value`", "`fun`"]);
                p.recover();
                None
            }
        });

        TypeDecl {
            name,
            body,
            span: self.span_from(start.span.start),
        }
    }

    /// Type expression: `Name`, `[Inner]`, or `A -> B` (right-associative).
    ///
    /// Reports and returns `None` when no type is present.
    fn type_expr(&mut self) -> Option<TypeExpr> {
        if self.depth >= MAX_NESTING {
            let error = self
                .error_at(ParseError::UnexpectedToken, "nesting too deep", self.peek())
                .with_note(format!("types may nest at most {MAX_NESTING} levels"));
            self.report(error);
            self.recover();
            return None;
        }
        self.depth += 1;
        let ty = self.type_expr_inner();
        self.depth -= 1;
        ty
    }

    fn type_expr_inner(&mut self) -> Option<TypeExpr> {
        let token = self.peek();
        let atom = match &token.kind {
            TokenKind::Symbol(name) => {
                self.advance();
                TypeExpr::Named(Symbol {
                    name: name.clone(),
                    span: token.span,
                })
            }
            TokenKind::Punctuation(PunctuationId::LBracket) => {
                self.advance();
                let inner = self.within(Context::List, |p| {
                    let inner = p.type_expr();
                    p.close(PunctuationId::RBracket, token);
                    inner
                })?;
                TypeExpr::List(Box::new(ListType {
                    inner,
                    span: self.span_from(token.span.start),
                }))
            }
            _ => {
                let kind = if self.at_recovery_boundary() || self.check_punct(PunctuationId::LBrace) {
                    ParseError::MissingRequiredField
                } else {
                    ParseError::UnexpectedToken
                };
                let error = self
                    .error_at(kind, format!("expected a type, found {}", token.kind.describe()), token)
                    .with_expected(["type name", "`[`"]);
                self.report(error);
                if kind == ParseError::UnexpectedToken {
                    self.advance();
                }
                return None;
            }
        };

        if !self.match_punct(PunctuationId::Arrow) {
            return Some(atom);
        }
        match self.type_expr() {
            Some(ret) => {
                let span = atom.span().merge(ret.span());
                Some(TypeExpr::Fun(Box::new(FunType { param: atom, ret, span })))
            }
            None => Some(atom),
        }
    }
}
