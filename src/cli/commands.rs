//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use dash_core::lang::reference;
use dash_syntax::cst::{Field, NodeRef, Source};
use dash_syntax::diagnostics::SyntaxError;
use dash_syntax::lexer;
use dash_syntax::options::ParseOptions;
use miette::{NamedSource, Report};
use serde_json::{Map, Value, json};

use super::{CliError, CliResult, ExitCode, TreeFormat};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while lexing.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read a source file, rejecting files over `MAX_SOURCE_SIZE`.
///
/// ## Errors
/// - The file cannot be accessed or read
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(path: &Path) -> CliResult<String> {
    let display = path.display();
    let metadata = fs::metadata(path).map_err(|e| CliError::failure(format!("Cannot access file '{display}': {e}")))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{display}' is too large ({} bytes, max {MAX_SOURCE_SIZE} bytes)",
            metadata.len(),
        )));
    }

    fs::read_to_string(path).map_err(|e| CliError::failure(format!("Error reading file '{display}': {e}")))
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Render errors with miette, each one pointing into `source`.
pub fn render_diagnostics(file_name: &str, source: &str, errors: &[SyntaxError]) -> String {
    let mut out = String::new();
    for error in errors {
        let report = Report::new(error.clone()).with_source_code(NamedSource::new(file_name, source.to_string()));
        let _ = writeln!(out, "{report:?}");
    }
    out
}

fn error_summary(count: usize) -> String {
    if count == 1 {
        "1 syntax error".to_string()
    } else {
        format!("{count} syntax errors")
    }
}

// ============================================================================
// Tree rendering
// ============================================================================

/// JSON object for a node: `kind`, `span`, optional `variant`/`text`, and `fields` keyed by grammar field name.
pub fn node_to_json(node: NodeRef<'_>) -> Value {
    let span = node.span();
    let mut object = Map::new();
    object.insert("kind".into(), json!(node.kind().as_str()));
    object.insert("span".into(), json!([span.start, span.end]));
    if let Some(variant) = node.variant() {
        object.insert("variant".into(), json!(variant));
    }
    if let Some(text) = node.text() {
        object.insert("text".into(), json!(text));
    }

    let mut fields = Map::new();
    for (name, field) in node.fields() {
        let value = match field {
            Field::Node(child) => node_to_json(child),
            Field::Nodes(children) => Value::Array(children.into_iter().map(node_to_json).collect()),
        };
        fields.insert(name.into(), value);
    }
    if !fields.is_empty() {
        object.insert("fields".into(), Value::Object(fields));
    }
    Value::Object(object)
}

/// Render a parsed tree in the requested format.
pub fn render_tree(source: &Source, format: TreeFormat) -> CliResult<String> {
    match format {
        TreeFormat::Sexp => Ok(source.to_sexp()),
        TreeFormat::Debug => Ok(format!("{source:#?}")),
        TreeFormat::Json => {
            let mut root = node_to_json(source.node());
            if let Value::Object(object) = &mut root {
                let comments: Vec<Value> = source.comments.iter().map(|c| node_to_json(c.into())).collect();
                if !comments.is_empty() {
                    object.insert("comments".into(), Value::Array(comments));
                }
            }
            serde_json::to_string_pretty(&root).map_err(|e| CliError::failure(format!("Error encoding JSON: {e}")))
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

/// Print every token with its position, then any lexical errors.
pub fn lex_file(path: &Path) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let (tokens, errors) = lexer::lex_recovering(&source);

    for token in &tokens {
        println!(
            "{}:{}\t{}..{}\t{:?}",
            token.pos.line, token.pos.column, token.span.start, token.span.end, token.kind
        );
    }

    if errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        let rendered = render_diagnostics(&path.display().to_string(), &source, &errors);
        Err(CliError::failure(format!("{rendered}{}", error_summary(errors.len()))))
    }
}

/// Print the syntax tree of a file, then its diagnostics.
///
/// The tree is printed even when the file has errors; malformed regions show up as `ERROR` nodes.
pub fn parse_file(path: &Path, format: TreeFormat, options: &ParseOptions) -> CliResult<ExitCode> {
    let source = read_source(path)?;
    let parsed = dash_syntax::parse_with(&source, options);
    println!("{}", render_tree(&parsed.source, format)?);

    if parsed.is_ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        let rendered = render_diagnostics(&path.display().to_string(), &source, &parsed.errors);
        Err(CliError::failure(format!("{rendered}{}", error_summary(parsed.errors.len()))))
    }
}

/// Parse each file and report diagnostics. Fails if any file has errors.
pub fn check_files(paths: &[PathBuf], options: &ParseOptions) -> CliResult<ExitCode> {
    let mut total = 0;
    let mut failed = 0;

    for path in paths {
        let source = read_source(path)?;
        let parsed = dash_syntax::parse_with(&source, options);
        tracing::debug!(file = %path.display(), errors = parsed.errors.len(), "checked");
        if parsed.is_ok() {
            continue;
        }
        failed += 1;
        total += parsed.errors.len();
        eprint!("{}", render_diagnostics(&path.display().to_string(), &source, &parsed.errors));
    }

    if failed == 0 {
        println!("{} file(s) ok", paths.len());
        Ok(ExitCode::SUCCESS)
    } else {
        Err(CliError::failure(format!(
            "{} in {failed} of {} file(s)",
            error_summary(total),
            paths.len()
        )))
    }
}

/// Print the language vocabulary reference.
pub fn print_vocab() -> CliResult<ExitCode> {
    print!("{}", reference::render_markdown());
    Ok(ExitCode::SUCCESS)
}
