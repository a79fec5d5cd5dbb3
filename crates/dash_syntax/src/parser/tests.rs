#[cfg(test)]
/// Parser unit tests.
///
/// These tests focus on precedence and associativity, the shape of each production, and on the parser's error
/// recovery behavior (one error per malformed region, no cascades).
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::lexer;

    fn parse_str(source: &str) -> Result<Source, Vec<SyntaxError>> {
        let tokens = lexer::lex(source)?;
        parse(&tokens)
    }

    fn parse_ok(source: &str) -> Source {
        parse_str(source).unwrap_or_else(|errs| panic!("parse({source:?}) failed: {errs:?}"))
    }

    /// Parse input that lexes cleanly but is expected to contain syntax errors.
    fn parse_errs(source: &str) -> (Source, Vec<SyntaxError>) {
        let (tokens, lex_errors) = lexer::lex_recovering(source);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
        Parser::new(&tokens).parse()
    }

    fn single(source: &str) -> Form {
        let mut tree = parse_ok(source);
        assert_eq!(tree.body.len(), 1, "expected one form in {source:?}: {:?}", tree.body);
        tree.body.remove(0)
    }

    fn sym(form: &Form) -> &str {
        match form {
            Form::Symbol(s) => &s.name,
            other => panic!("expected symbol, got {other:?}"),
        }
    }

    fn infix(form: &Form) -> &Infix {
        match form {
            Form::Infix(i) => i,
            other => panic!("expected infix, got {other:?}"),
        }
    }

    fn rhs(infix: &Infix) -> &Form {
        match &infix.right {
            InfixRhs::Form(f) => f,
            InfixRhs::Shell(s) => panic!("expected form operand, got shell {s:?}"),
        }
    }

    fn shell(form: &Form) -> &Shell {
        match &infix(form).right {
            InfixRhs::Shell(s) => s,
            InfixRhs::Form(f) => panic!("expected shell operand, got {f:?}"),
        }
    }

    fn text_parts(arg: &ShellArg) -> Vec<String> {
        match arg {
            ShellArg::Text(t) => t
                .parts
                .iter()
                .map(|p| match p {
                    TextPart::Text(t) => t.text.clone(),
                    TextPart::Var(v) => match &v.target {
                        ShellVarTarget::Symbol(s) => format!("${}", s.name),
                        ShellVarTarget::Form(_) => "${..}".to_string(),
                    },
                })
                .collect(),
            other => panic!("expected textarg, got {other:?}"),
        }
    }

    fn kinds(errors: &[SyntaxError]) -> Vec<ErrorKind> {
        errors.iter().map(|e| e.kind).collect()
    }

    // ========================================================================
    // Precedence
    // ========================================================================

    #[test]
    fn test_dot_binds_tighter_than_assign() {
        let form = single("a . b = c");
        let eq = infix(&form);
        assert_eq!(eq.kind, InfixKind::Equal);
        let dot = infix(&eq.left);
        assert_eq!(dot.kind, InfixKind::Dot);
        assert_eq!((sym(&dot.left), sym(rhs(dot))), ("a", "b"));
        assert_eq!(sym(rhs(eq)), "c");
    }

    #[test]
    fn test_assign_is_right_associative() {
        let form = single("a = b = c");
        let outer = infix(&form);
        assert_eq!(sym(&outer.left), "a");
        let inner = infix(rhs(outer));
        assert_eq!(inner.kind, InfixKind::Equal);
        assert_eq!((sym(&inner.left), sym(rhs(inner))), ("b", "c"));
    }

    #[test]
    fn test_dot_is_left_associative() {
        let form = single("a . b . c");
        let outer = infix(&form);
        assert_eq!(sym(rhs(outer)), "c");
        assert_eq!(infix(&outer.left).kind, InfixKind::Dot);
    }

    #[test]
    fn test_dollar_and_dot_group_left_to_right() {
        let form = single("a . b $ ls; . c");
        let outer = infix(&form);
        assert_eq!(outer.kind, InfixKind::Dot);
        let dollar = infix(&outer.left);
        assert_eq!(dollar.kind, InfixKind::Dollar);
        assert_eq!(infix(&dollar.left).kind, InfixKind::Dot);
    }

    #[test]
    fn test_infix_span_covers_operands() {
        let form = single("ab = cd");
        assert_eq!(form.span(), Span::new(0, 7));
        assert_eq!(infix(&form).operator.span, Span::new(3, 4));
    }

    // ========================================================================
    // Calls and collections
    // ========================================================================

    #[test]
    fn test_call_arguments() {
        let Form::Call(call) = single("f(1, 2, k: 3, j: 4)") else {
            panic!("expected call");
        };
        assert_eq!(call.name.name, "f");
        assert_eq!(call.args.anonymous.len(), 2);
        let names: Vec<_> = call.args.named.iter().map(|kv| kv.keyword.name.as_str()).collect();
        assert_eq!(names, ["k", "j"]);
        assert_eq!(call.args.span, Span::new(1, 19));
    }

    #[test]
    fn test_call_commas_are_optional() {
        let Form::Call(call) = single("f(a b k: c j: d)") else {
            panic!("expected call");
        };
        assert_eq!(call.args.anonymous.len(), 2);
        assert_eq!(call.args.named.len(), 2);
    }

    #[test]
    fn test_keyword_named_fun_is_an_argument() {
        let Form::Call(call) = single("f(fun: 1)") else {
            panic!("expected call");
        };
        assert_eq!(call.args.named[0].keyword.name, "fun");
    }

    #[test]
    fn test_call_needs_adjacent_paren() {
        let (tree, errors) = parse_errs("f (1)");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::UnexpectedToken)]);
        assert_eq!(sym(&tree.body[0]), "f");
        assert!(tree.body[1].is_error());
        assert_eq!(tree.body[1].span(), Span::new(2, 5));
    }

    #[test]
    fn test_positional_after_named_is_an_error() {
        let (tree, errors) = parse_errs("f(k: 3, 1)");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::UnexpectedToken)]);
        assert_eq!(errors[0].span, Span::new(8, 9));
        let Form::Call(call) = &tree.body[0] else {
            panic!("expected call");
        };
        assert!(call.args.anonymous.is_empty());
        assert_eq!(call.args.named.len(), 1);
    }

    #[test]
    fn test_unclosed_call_keeps_partial_node() {
        let (tree, errors) = parse_errs("f(1, 2");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::UnclosedDelimiter)]);
        assert_eq!(errors[0].span, Span::new(1, 2));
        let Form::Call(call) = &tree.body[0] else {
            panic!("expected call");
        };
        assert_eq!(call.args.anonymous.len(), 2);
    }

    #[test]
    fn test_trailing_commas() {
        let Form::List(list) = single("[1, 2,]") else {
            panic!("expected list");
        };
        assert_eq!(list.values.len(), 2);

        let Form::Record(record) = single("{a: 1,}") else {
            panic!("expected record");
        };
        assert_eq!(record.key_values.len(), 1);
        assert_eq!(record.key_values[0].keyword.span, Span::new(1, 3));
    }

    #[test]
    fn test_empty_collections() {
        assert!(matches!(single("[]"), Form::List(l) if l.values.is_empty()));
        assert!(matches!(single("{}"), Form::Record(r) if r.key_values.is_empty()));
    }

    #[test]
    fn test_method_call_on_dot() {
        let form = single("a.b(c)");
        let dot = infix(&form);
        assert!(matches!(rhs(dot), Form::Call(c) if c.name.name == "b"));
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    #[test]
    fn test_fun_with_everything() {
        let Form::Fun(fun) = single("fun add(a: Int, b: Int): Int { a }") else {
            panic!("expected fun");
        };
        assert_eq!(fun.name.as_ref().map(|n| n.name.as_str()), Some("add"));
        let params = fun.arg_types.as_ref().map(|a| a.named.len());
        assert_eq!(params, Some(2));
        assert!(matches!(&fun.return_type, Some(TypeExpr::Named(t)) if t.name == "Int"));
        assert_eq!(fun.body.len(), 1);
    }

    #[test]
    fn test_fun_keyword_name_is_split() {
        let Form::Fun(fun) = single("fun add: Int { 1 }") else {
            panic!("expected fun");
        };
        let name = fun.name.as_ref().map(|n| (n.name.as_str(), n.span));
        assert_eq!(name, Some(("add", Span::new(4, 7))));
        assert!(fun.arg_types.is_none());
        assert!(fun.return_type.is_some());
    }

    #[test]
    fn test_anonymous_fun_with_return_type() {
        let Form::Fun(fun) = single("fun: Int { 1 }") else {
            panic!("expected fun");
        };
        assert!(fun.name.is_none());
        assert!(matches!(&fun.return_type, Some(TypeExpr::Named(t)) if t.name == "Int"));
    }

    #[test]
    fn test_fun_without_body() {
        let (tree, errors) = parse_errs("fun f");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::MissingRequiredField)]);
        assert!(matches!(&tree.body[0], Form::Fun(f) if f.body.is_empty()));
    }

    #[test]
    fn test_type_arrow_is_right_associative() {
        let Form::Fun(fun) = single("fun f(g: A -> B -> C) { g }") else {
            panic!("expected fun");
        };
        let ty = fun.arg_types.as_ref().map(|a| &a.named[0].ty);
        let Some(TypeExpr::Fun(outer)) = ty else {
            panic!("expected function type, got {ty:?}");
        };
        assert!(matches!(&outer.param, TypeExpr::Named(a) if a.name == "A"));
        assert!(matches!(&outer.ret, TypeExpr::Fun(inner) if matches!(&inner.param, TypeExpr::Named(b) if b.name == "B")));
    }

    #[test]
    fn test_list_types() {
        let Form::Fun(fun) = single("fun f(xs: [Int]): [[Str]] { xs }") else {
            panic!("expected fun");
        };
        let Some(TypeExpr::List(outer)) = &fun.return_type else {
            panic!("expected list type");
        };
        assert!(matches!(&outer.inner, TypeExpr::List(_)));
        assert_eq!(outer.span, Span::new(18, 25));
    }

    #[test]
    fn test_type_declaration() {
        let Form::Type(decl) = single("type Point { x: 1 y: 2 fun norm { x } }") else {
            panic!("expected type");
        };
        assert_eq!(decl.name.as_ref().map(|n| n.name.as_str()), Some("Point"));
        assert_eq!(decl.body.len(), 3);
        assert!(matches!(decl.body[0], FieldOrFun::Field(_)));
        assert!(matches!(decl.body[2], FieldOrFun::Fun(_)));
    }

    #[test]
    fn test_type_body_has_no_commas() {
        let (tree, errors) = parse_errs("type T { a: 1, b: 2 }");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::UnexpectedToken)]);
        assert_eq!(errors[0].span, Span::new(13, 14));
        assert!(matches!(&tree.body[0], Form::Type(t) if t.body.len() == 2));
    }

    #[test]
    fn test_deep_type_nesting_is_reported() {
        let depth = 2000;
        let source = format!("fun(f: {}Int{}) {{ f }}", "[".repeat(depth), "]".repeat(depth));
        let (tree, errors) = parse_errs(&source);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "nesting too deep");
        assert!(matches!(&tree.body[0], Form::Fun(f) if f.body.len() == 1));
    }

    #[test]
    fn test_anonymous_type() {
        assert!(matches!(single("type { a: 1 }"), Form::Type(t) if t.name.is_none() && t.body.len() == 1));
    }

    // ========================================================================
    // Literals
    // ========================================================================

    #[test]
    fn test_atoms() {
        let tree = parse_ok("true false null -12 ./bin/x sym");
        let rendered: Vec<_> = tree.body.iter().map(|f| NodeRef::from(f).kind()).collect();
        assert_eq!(
            rendered,
            [
                NodeKind::Boolean,
                NodeKind::Boolean,
                NodeKind::Null,
                NodeKind::Number,
                NodeKind::Path,
                NodeKind::Symbol,
            ]
        );
        assert!(matches!(&tree.body[3], Form::Literal(Literal::Number(n)) if n.value() == Some(-12)));
    }

    #[test]
    fn test_string_pieces_and_value() {
        let Form::Literal(Literal::String(s)) = single(r#""a\x41b""#) else {
            panic!("expected string");
        };
        assert_eq!(s.content.len(), 3);
        let StringPart::Escape(esc) = &s.content[1] else {
            panic!("expected escape");
        };
        assert_eq!((esc.kind, esc.value, esc.raw.as_str()), (EscapeKind::Hex, 'A', r"\x41"));
        assert_eq!(s.value(), "aAb");
    }

    #[test]
    fn test_quoted_pieces_and_value() {
        let Form::Literal(Literal::Quoted(q)) = single(r"%re{a\}b}") else {
            panic!("expected quoted");
        };
        assert_eq!(q.fence, "re");
        assert!(matches!(
            q.parts.as_slice(),
            [QuotedPart::Fragment(_), QuotedPart::Escape(_), QuotedPart::Fragment(_)]
        ));
        assert_eq!(q.value(), "a}b");
    }

    // ========================================================================
    // Shell
    // ========================================================================

    #[test]
    fn test_shell_with_interpolation() {
        let form = single("x $ echo ${x} foo;");
        assert_eq!(infix(&form).kind, InfixKind::Dollar);
        let shell = shell(&form);
        assert_eq!(text_parts(&shell.command), ["echo"]);
        assert_eq!(shell.arguments.len(), 2);
        assert!(matches!(
            &shell.arguments[0],
            ShellArg::Var(ShellVar { target: ShellVarTarget::Form(f), .. }) if sym(f) == "x"
        ));
        assert_eq!(text_parts(&shell.arguments[1]), ["foo"]);
        assert_eq!(shell.span, Span::new(4, 18));
    }

    #[test]
    fn test_shell_structured_arguments() {
        let form = single(r#"x $ grep(pattern) "file" ./dir %sh{raw};"#);
        let shell = shell(&form);
        assert!(matches!(&shell.command, ShellArg::Call(c) if c.name.name == "grep"));
        assert!(matches!(
            shell.arguments.as_slice(),
            [ShellArg::String(_), ShellArg::Path(_), ShellArg::Quoted(_)]
        ));
    }

    #[test]
    fn test_text_and_variables_glue() {
        let form = single("x $ echo pre$HOME/x $USER;");
        let shell = shell(&form);
        assert_eq!(text_parts(&shell.arguments[0]), ["pre", "$HOME", "/x"]);
        assert!(matches!(
            &shell.arguments[1],
            ShellArg::Var(ShellVar { target: ShellVarTarget::Symbol(s), span }) if s.name == "USER" && span.len() == 5
        ));
    }

    #[test]
    fn test_string_braces_inside_interpolation() {
        let form = single(r#"x $ echo ${f("}")};"#);
        let ShellArg::Var(var) = &shell(&form).arguments[0] else {
            panic!("expected shellvar");
        };
        assert!(matches!(&var.target, ShellVarTarget::Form(f) if matches!(**f, Form::Call(_))));
    }

    #[test]
    fn test_empty_shell_command() {
        let (tree, errors) = parse_errs("x $ ;");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::MissingRequiredField)]);
        assert!(matches!(shell(&tree.body[0]).command, ShellArg::Error(_)));
    }

    #[test]
    fn test_dollar_without_left_operand() {
        let (tree, errors) = parse_errs("$ echo; a");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::UnexpectedToken)]);
        assert_eq!(tree.body.len(), 2);
        assert_eq!(tree.body[0].span(), Span::new(0, 7));
        assert_eq!(sym(&tree.body[1]), "a");
    }

    #[test]
    fn test_operator_spellings_are_symbols_at_form_start() {
        let Form::Call(call) = single("=(a, b)") else {
            panic!("expected call");
        };
        assert_eq!(call.name.name, "=");
        assert_eq!(call.args.anonymous.len(), 2);

        let Form::Call(call) = single("f(=)") else {
            panic!("expected call");
        };
        assert_eq!(sym(&call.args.anonymous[0]), "=");

        let Form::Call(call) = single("f(->)") else {
            panic!("expected call");
        };
        assert_eq!(sym(&call.args.anonymous[0]), "->");

        let assign = single("x = =(a, b)");
        assert!(matches!(rhs(infix(&assign)), Form::Call(c) if c.name.name == "="));

        let Form::List(list) = single("[->, =]") else {
            panic!("expected list");
        };
        let names: Vec<_> = list.values.iter().map(sym).collect();
        assert_eq!(names, ["->", "="]);
    }

    #[test]
    fn test_spelled_symbol_needs_adjacent_paren() {
        let tree = parse_ok("= [a]");
        assert_eq!(tree.body.len(), 2);
        assert_eq!(sym(&tree.body[0]), "=");
    }

    // ========================================================================
    // Nesting
    // ========================================================================

    #[test]
    fn test_nesting_up_to_the_limit_parses() {
        let source = format!("{}{}", "[".repeat(MAX_NESTING), "]".repeat(MAX_NESTING));
        let tree = parse_ok(&source);
        assert_eq!(tree.body[0].span(), Span::new(0, source.len()));
    }

    #[test]
    fn test_deep_nesting_is_reported_not_overflowed() {
        let depth = 5000;
        let source = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let (tree, errors) = parse_errs(&source);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Parse(ParseError::UnexpectedToken));
        assert_eq!(errors[0].message, "nesting too deep");
        assert_eq!(errors[0].span, Span::new(MAX_NESTING, MAX_NESTING + 1));
        assert_eq!(tree.body.len(), 1);
        assert_eq!(tree.body[0].span(), Span::new(0, source.len()));
    }

    #[test]
    fn test_deep_unclosed_nesting_terminates() {
        let source = "f(".repeat(3000);
        let (_, errors) = parse_errs(&source);
        assert!(errors.iter().any(|e| e.message == "nesting too deep"));
        assert!(errors.len() <= MAX_NESTING + 2);
    }

    #[test]
    fn test_long_infix_chains_are_bounded() {
        let source = format!("{}a", "a . ".repeat(3000));
        let (tree, errors) = parse_errs(&source);
        assert!(errors.iter().all(|e| e.message == "nesting too deep"));
        assert!(!errors.is_empty());
        assert_eq!(tree.body.last().map(|f| f.span().end), Some(source.len()));
    }

    // ========================================================================
    // Recovery
    // ========================================================================

    #[test]
    fn test_recovery_inside_list() {
        let (tree, errors) = parse_errs("[a, ), b]");
        assert_eq!(errors.len(), 1);
        let Form::List(list) = &tree.body[0] else {
            panic!("expected list");
        };
        assert_eq!(list.values.len(), 3);
        assert!(list.values[1].is_error());
        assert_eq!(sym(&list.values[2]), "b");
    }

    #[test]
    fn test_recovery_at_top_level() {
        let (tree, errors) = parse_errs("a ) b");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span, Span::new(2, 3));
        assert_eq!(tree.body.len(), 3);
        assert_eq!(sym(&tree.body[2]), "b");
    }

    #[test]
    fn test_recovery_skips_bracketed_region() {
        let (tree, errors) = parse_errs(": (a [b]) c");
        assert_eq!(errors.len(), 1);
        assert_eq!(tree.body.len(), 2);
        assert_eq!(tree.body[0].span(), Span::new(0, 9));
    }

    #[test]
    fn test_unclosed_list_stops_at_enclosing_closer() {
        let (tree, errors) = parse_errs("f([1, 2)");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::UnclosedDelimiter)]);
        assert_eq!(errors[0].span, Span::new(2, 3));
        let Form::Call(call) = &tree.body[0] else {
            panic!("expected call");
        };
        assert!(matches!(&call.args.anonymous[0], Form::List(l) if l.values.len() == 2));
        assert_eq!(call.span, Span::new(0, 8));
    }

    #[test]
    fn test_missing_keyval_value() {
        let (tree, errors) = parse_errs("{a: }");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::MissingRequiredField)]);
        let Form::Record(record) = &tree.body[0] else {
            panic!("expected record");
        };
        assert!(record.key_values[0].value.is_error());
    }

    #[test]
    fn test_record_rejects_positional_entry() {
        let (tree, errors) = parse_errs("{a: 1, 2}");
        assert_eq!(kinds(&errors), [ErrorKind::Parse(ParseError::UnexpectedToken)]);
        assert!(matches!(&tree.body[0], Form::Record(r) if r.key_values.len() == 1));
    }

    #[test]
    fn test_error_message_names_context() {
        let (_, errors) = parse_errs("[a, )]");
        assert_eq!(errors[0].message, "unexpected `)` in list");
        assert!(!errors[0].expected.is_empty());
    }

    #[test]
    fn test_error_limit_stops_parsing() {
        let (tokens, _) = lexer::lex_recovering("[), )] x ) )");
        let (_, errors) = Parser::new(&tokens).with_error_limit(Some(1)).parse();
        assert_eq!(errors.len(), 1);
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    #[test]
    fn test_comments_are_trivia() {
        let tree = parse_ok("a # one\n[b # two\n]");
        assert_eq!(tree.body.len(), 2);
        let texts: Vec<_> = tree.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, [" one", " two"]);
    }

    #[test]
    fn test_comments_can_be_dropped() {
        let tokens = lexer::lex("a # one").unwrap();
        let (tree, _) = parse_recovering(&tokens, &ParseOptions::new().with_comments(false));
        assert!(tree.comments.is_empty());
    }

    #[test]
    fn test_empty_token_stream() {
        let (tree, errors) = Parser::new(&[]).parse();
        assert!(tree.body.is_empty());
        assert!(errors.is_empty());
    }
}
