//! Dash language vocabulary registries.
//!
//! This module is the “front door” for language-level vocabulary: reserved words, infix operators (with the full
//! precedence ladder), and punctuation.
//!
//! Callers work with **stable IDs** (e.g. `ReservedId`, `OperatorId`) and look up spellings/metadata via registry
//! tables instead of comparing strings all over the lexer and parser.
//!
//! ## Notes
//! - Registries are **pure**: no CST types, no IO, no side effects.
//! - The lexer/parser enforce syntax; registries provide spellings and metadata for shared use (diagnostics, docs,
//!   highlighting).
//!
//! ## Examples
//! ```rust
//! use dash_core::lang::reserved::{self, ReservedId};
//!
//! assert_eq!(reserved::from_str("fun"), Some(ReservedId::Fun));
//! assert_eq!(reserved::as_str(ReservedId::Null), "null");
//! ```
//!
//! ## See also
//! - `cargo run -p dash_core --bin generate_lang_reference` to generate a Markdown reference table.

pub mod operators;
pub mod punctuation;
pub mod reference;
pub mod registry;
pub mod reserved;
