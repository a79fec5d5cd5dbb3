/// String and quoted literal assembly.
///
/// The lexer already split both literals into pieces and decoded the escapes; these rules only collect the
/// pieces into nodes.
impl<'a> Parser<'a> {
    /// `"` (fragment | escape)* `"`. The current token is the opening quote.
    fn string_lit(&mut self) -> StringLit {
        let open = self.advance();
        let mut content = Vec::new();
        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::StringFragment(text) => {
                    self.advance();
                    content.push(StringPart::Fragment(StringFragment {
                        text: text.clone(),
                        span: token.span,
                    }));
                }
                TokenKind::Escape(escape) => {
                    self.advance();
                    content.push(StringPart::Escape(EscapeSequence {
                        kind: escape.kind,
                        value: escape.value,
                        raw: escape.raw.clone(),
                        span: token.span,
                    }));
                }
                TokenKind::StringEnd => {
                    self.advance();
                    break;
                }
                _ => {
                    self.close_literal(open);
                    break;
                }
            }
        }
        StringLit {
            content,
            span: self.span_from(open.span.start),
        }
    }

    /// `%fence{` (fragment | `\}`)* `}`. The current token is the opening `%fence{`.
    fn quoted_lit(&mut self) -> Quoted {
        let open = self.advance();
        let fence = match &open.kind {
            TokenKind::QuotedStart(fence) => fence.clone(),
            _ => String::new(),
        };
        let mut parts = Vec::new();
        loop {
            let token = self.peek();
            match &token.kind {
                TokenKind::QuotedFragment(text) => {
                    self.advance();
                    parts.push(QuotedPart::Fragment(QuotedFragment {
                        text: text.clone(),
                        span: token.span,
                    }));
                }
                TokenKind::QuotedEscape => {
                    self.advance();
                    parts.push(QuotedPart::Escape(QuotedEscape { span: token.span }));
                }
                TokenKind::QuotedEnd => {
                    self.advance();
                    break;
                }
                _ => {
                    self.close_literal(open);
                    break;
                }
            }
        }
        Quoted {
            fence,
            parts,
            span: self.span_from(open.span.start),
        }
    }

    /// Literal pieces ran out without a closing token. The lexer always closes literals, so this only happens
    /// with hand-built token streams.
    fn close_literal(&mut self, open: &Token) {
        let error = self.error_at(
            ParseError::UnclosedDelimiter,
            format!("unclosed {}", open.kind.describe()),
            open,
        );
        self.report(error);
    }
}
