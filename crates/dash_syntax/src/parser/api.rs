/// Parse a token stream into a [`Source`] tree.
///
/// This is the strict entrypoint: any error makes the whole parse fail.
///
/// ## Parameters
/// - `tokens`: Token stream produced by `dash_syntax::lexer`.
///
/// ## Errors
/// Returns `Err(Vec<SyntaxError>)` with every error found (the parser still recovers internally, so one call
/// reports as many problems as it can).
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Source, Vec<SyntaxError>> {
    let (source, errors) = Parser::new(tokens).parse();
    if errors.is_empty() { Ok(source) } else { Err(errors) }
}

/// Parse a token stream, always returning a tree together with the errors found.
#[tracing::instrument(skip_all, fields(token_count = tokens.len()))]
pub fn parse_recovering(tokens: &[Token], options: &ParseOptions) -> (Source, Vec<SyntaxError>) {
    Parser::new(tokens).with_options(options).parse()
}
