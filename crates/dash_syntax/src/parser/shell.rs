/// Shell command parsing (the right operand of `$`).
///
/// ## Notes
/// - The lexer decides what each shell word is; the parser only groups adjacent text and variables into one
///   `textarg` and parses the forms inside `${...}` and call arguments.
/// - The lexer always terminates a shell command with `;` (zero-width when the source forgot it).
impl<'a> Parser<'a> {
    /// `command argument* ;`. The `$` has already been consumed.
    fn shell(&mut self) -> Shell {
        let start = self.peek().span.start;
        self.within(Context::Shell, |p| {
            let command = if p.check_punct(PunctuationId::Semicolon) || p.is_at_end() {
                let error = p
                    .error_at(ParseError::MissingRequiredField, "shell command is empty", p.peek())
                    .with_hint("write a command after `$`, as in `x $ echo;`");
                p.report(error);
                ShellArg::Error(ErrorNode {
                    span: Span::empty(p.peek().span.start),
                })
            } else {
                p.shell_arg()
            };

            let mut arguments = Vec::new();
            while !p.at_sequence_end(PunctuationId::Semicolon) {
                arguments.push(p.shell_arg());
            }
            p.close_shell();

            Shell {
                command,
                arguments,
                span: p.span_from(start),
            }
        })
    }

    fn close_shell(&mut self) {
        if self.match_punct(PunctuationId::Semicolon) {
            return;
        }
        let error = self
            .error_at(ParseError::UnclosedDelimiter, "shell command is not terminated", self.peek())
            .with_expected(["`;`"]);
        self.report(error);
    }

    fn shell_arg(&mut self) -> ShellArg {
        let token = self.peek();
        match &token.kind {
            TokenKind::Symbol(name) => {
                self.advance();
                let symbol = Symbol {
                    name: name.clone(),
                    span: token.span,
                };
                if self.check_punct(PunctuationId::LParen) {
                    ShellArg::Call(self.call(symbol))
                } else {
                    ShellArg::Text(TextArg {
                        parts: vec![TextPart::Text(TextFragment {
                            text: symbol.name,
                            span: symbol.span,
                        })],
                        span: token.span,
                    })
                }
            }
            TokenKind::StringStart => ShellArg::String(self.string_lit()),
            TokenKind::QuotedStart(_) => ShellArg::Quoted(self.quoted_lit()),
            TokenKind::Path(text) => {
                self.advance();
                ShellArg::Path(PathLit {
                    text: text.clone(),
                    span: token.span,
                })
            }
            TokenKind::ShellText(_) => ShellArg::Text(self.text_arg()),
            TokenKind::ShellVar(_) | TokenKind::ShellVarOpen => ShellArg::Var(self.shell_var()),
            _ => {
                self.unexpected(["shell argument"]);
                self.advance();
                ShellArg::Error(ErrorNode { span: token.span })
            }
        }
    }

    /// Raw text glued to any directly following text and `$` variables.
    fn text_arg(&mut self) -> TextArg {
        let start = self.peek().span.start;
        let mut parts = Vec::new();
        loop {
            let token = self.peek();
            let glued = parts.is_empty() || token.span.start == self.last_end;
            match &token.kind {
                TokenKind::ShellText(text) if glued => {
                    self.advance();
                    parts.push(TextPart::Text(TextFragment {
                        text: text.clone(),
                        span: token.span,
                    }));
                }
                TokenKind::ShellVar(_) | TokenKind::ShellVarOpen if glued && !parts.is_empty() => {
                    parts.push(TextPart::Var(self.shell_var()));
                }
                _ => break,
            }
        }
        TextArg {
            parts,
            span: self.span_from(start),
        }
    }

    /// `$name` or `${form}`.
    fn shell_var(&mut self) -> ShellVar {
        let token = self.advance();
        match &token.kind {
            TokenKind::ShellVar(name) => ShellVar {
                target: ShellVarTarget::Symbol(Symbol {
                    name: name.clone(),
                    span: Span::new(token.span.start + 1, token.span.end),
                }),
                span: token.span,
            },
            _ => {
                let form = self.within(Context::ShellVar, |p| {
                    let form = if p.at_sequence_end(PunctuationId::RBrace) {
                        // An unterminated `${` is reported once, by `close` below.
                        if p.check_punct(PunctuationId::RBrace) {
                            let error = p
                                .error_at(ParseError::MissingRequiredField, "empty interpolation", token)
                                .with_expected(["a form"]);
                            p.report(error);
                        }
                        Form::Error(ErrorNode {
                            span: Span::empty(token.span.end),
                        })
                    } else {
                        p.form()
                    };
                    if !p.at_sequence_end(PunctuationId::RBrace) {
                        p.unexpected(["`}`"]);
                        p.recover();
                    }
                    p.close(PunctuationId::RBrace, token);
                    form
                });
                ShellVar {
                    target: ShellVarTarget::Form(Box::new(form)),
                    span: self.span_from(token.span.start),
                }
            }
        }
    }
}
