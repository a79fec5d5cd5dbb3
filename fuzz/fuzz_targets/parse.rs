#![no_main]

use dash_syntax::{lexer, parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        // The tolerant entrypoint must accept anything and keep spans in bounds
        let parsed = dash_syntax::parse(s);
        for form in &parsed.source.body {
            let span = form.span();
            assert!(span.start <= span.end && span.end <= s.len());
        }

        // The strict pipeline must agree on whether the input is well-formed
        if let Ok(tokens) = lexer::lex(s) {
            assert_eq!(parser::parse(&tokens).is_ok(), parsed.is_ok());
        }
    }
});
