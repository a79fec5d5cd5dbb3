//! Reserved words of the Dash language.
//!
//! Dash has very few reserved words: two declaration introducers (`fun`, `type`) and three literal spellings
//! (`true`, `false`, `null`). Every other identifier-looking run of characters is a plain symbol.
//!
//! ## Notes
//! - Lookup via [`from_str`] is **case-sensitive**.
//! - A reserved spelling immediately followed by `:` (for example `type:`) is a keyword token, not a reserved word.
//!   The lexer applies that longest-match rule before consulting this table.
//!
//! ## Examples
//! ```rust
//! use dash_core::lang::reserved::{self, ReservedCategory, ReservedId};
//!
//! assert_eq!(reserved::from_str("true"), Some(ReservedId::True));
//! assert_eq!(reserved::category(ReservedId::Type), ReservedCategory::Declaration);
//! assert_eq!(reserved::from_str("True"), None);
//! ```

use super::registry::{Example, SinceVersion, Stability};

/// Stable identifier for every reserved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedId {
    // Declarations
    Fun,
    Type,

    // Literals
    True,
    False,
    Null,
}

/// High-level grouping for documentation and tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservedCategory {
    /// Introduces a `Fun` or `Type` declaration.
    Declaration,
    /// Spells a literal value.
    Literal,
}

/// Metadata for a reserved word.
#[derive(Debug, Clone, Copy)]
pub struct ReservedInfo {
    pub id: ReservedId,
    pub canonical: &'static str,
    pub category: ReservedCategory,
    pub description: &'static str,
    pub since_version: Option<SinceVersion>,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all reserved words, indexed by `ReservedId as usize`.
pub const RESERVED: &[ReservedInfo] = &[
    info(
        ReservedId::Fun,
        "fun",
        ReservedCategory::Declaration,
        "Introduce a function, optionally named, with typed parameters and a body.",
        &[Example {
            code: "fun add (x: Int y: Int): Int { x }",
            note: None,
        }],
    ),
    info(
        ReservedId::Type,
        "type",
        ReservedCategory::Declaration,
        "Introduce a record type made of fields and methods.",
        &[Example {
            code: "type Point { x: 0 y: 0 }",
            note: None,
        }],
    ),
    info(
        ReservedId::True,
        "true",
        ReservedCategory::Literal,
        "Boolean true.",
        &[],
    ),
    info(
        ReservedId::False,
        "false",
        ReservedCategory::Literal,
        "Boolean false.",
        &[],
    ),
    info(
        ReservedId::Null,
        "null",
        ReservedCategory::Literal,
        "The null value.",
        &[],
    ),
];

/// Return the canonical spelling for a reserved word.
pub fn as_str(id: ReservedId) -> &'static str {
    info_for(id).canonical
}

/// Return the category for a reserved word.
pub fn category(id: ReservedId) -> ReservedCategory {
    info_for(id).category
}

/// Return the full metadata entry for a reserved word.
pub fn info_for(id: ReservedId) -> &'static ReservedInfo {
    &RESERVED[id as usize]
}

/// Resolve a spelling to a reserved word.
///
/// ## Notes
/// - Matching is **case-sensitive**.
pub fn from_str(s: &str) -> Option<ReservedId> {
    RESERVED.iter().find(|r| r.canonical == s).map(|r| r.id)
}

const fn info(
    id: ReservedId,
    canonical: &'static str,
    category: ReservedCategory,
    description: &'static str,
    examples: &'static [Example],
) -> ReservedInfo {
    ReservedInfo {
        id,
        canonical,
        category,
        description,
        since_version: Some("0.1.0"),
        stability: Stability::Stable,
        examples,
    }
}
