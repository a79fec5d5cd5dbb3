//! CLI module for the Dash syntax tools
//!
//! ## Commands
//!
//! - `lex <file>` - Print the token stream
//! - `parse <file>` - Print the syntax tree (`--format sexp|json|debug`), then diagnostics
//! - `check <file>...` - Parse each file and report diagnostics
//! - `vocab` - Print reserved words, punctuation and the operator precedence table
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use dash_syntax::options::ParseOptions;

use crate::version::DASH_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Lexer, parser and diagnostics for the Dash language
#[derive(Parser, Debug)]
#[command(name = "dash")]
#[command(version = DASH_VERSION)]
#[command(about = "Lexer, parser and diagnostics for the Dash language", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Tree output format for `dash parse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TreeFormat {
    /// One-line S-expression with field labels
    #[default]
    Sexp,
    /// Nested JSON objects (`kind`, `span`, `text`, `fields`)
    Json,
    /// Rust `Debug` output of the typed tree
    Debug,
}

/// Flags shared by the commands that parse.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ParseFlags {
    /// Stop at the first error
    #[arg(long)]
    pub fail_fast: bool,
    /// Drop comments instead of keeping them as trivia
    #[arg(long)]
    pub no_comments: bool,
    /// Stop after this many errors
    #[arg(long, value_name = "N")]
    pub max_errors: Option<usize>,
}

impl ParseFlags {
    pub fn to_options(&self) -> ParseOptions {
        let mut options = if self.fail_fast {
            ParseOptions::fail_fast()
        } else {
            ParseOptions::new()
        };
        options = options.with_comments(!self.no_comments);
        if let Some(max) = self.max_errors {
            options = options.with_max_errors(max);
        }
        options
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the token stream of a file
    Lex {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Parse a file and print its syntax tree
    Parse {
        /// Source file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = TreeFormat::Sexp)]
        format: TreeFormat,
        #[command(flatten)]
        flags: ParseFlags,
    },

    /// Parse files and report diagnostics
    Check {
        /// Source files
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        flags: ParseFlags,
    },

    /// Print reserved words, punctuation and the operator precedence table
    Vocab,
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Lex { file } => commands::lex_file(&file),
        Command::Parse { file, format, flags } => commands::parse_file(&file, format, &flags.to_options()),
        Command::Check { files, flags } => commands::check_files(&files, &flags.to_options()),
        Command::Vocab => commands::print_vocab(),
    }
}

// ============================================================================
// Tests
// ============================================================================
