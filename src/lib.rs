#![forbid(unsafe_code)]
//! Dash language tooling
//!
//! This crate provides the `dash` command-line tool on top of the syntax frontend: token dumps, tree dumps
//! (S-expression, JSON, `Debug`), diagnostics rendered with miette, and the vocabulary reference.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod version;

pub use dash_syntax::{Parsed, cst, diagnostics, lexer, options, parse, parse_with, parser};
