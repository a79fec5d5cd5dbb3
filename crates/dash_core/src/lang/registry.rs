//! Shareable metadata for `dash_core::lang` registries.
//!
//! Every registry (reserved words, operators, punctuation) is a `const` table of small `Copy` records. This module
//! holds the metadata types those records have in common.
//!
//! ## Notes
//! - Metadata is meant for tooling/docs/diagnostics; the lexer and parser remain the source of truth for what is
//!   legal syntax.

/// Identify the language version a vocabulary item is available since.
///
/// ## Examples
/// ```rust
/// use dash_core::lang::registry::SinceVersion;
///
/// let since: SinceVersion = "0.1.0";
/// assert!(!since.is_empty());
/// ```
pub type SinceVersion = &'static str;

/// Describe the lifecycle status of a language vocabulary item.
///
/// ## Notes
/// - `Reserved` marks items that own a slot in the grammar (for example a precedence level) but have no surface
///   spelling yet. The lexer never produces them.
///
/// ## Examples
/// ```rust
/// use dash_core::lang::registry::Stability;
///
/// assert!(Stability::Stable.is_active());
/// assert!(!Stability::Reserved.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stability {
    Stable,
    Reserved,
    Deprecated,
}

impl Stability {
    /// Return `true` if items with this status are recognized by the lexer/parser.
    pub const fn is_active(self) -> bool {
        !matches!(self, Stability::Reserved)
    }
}

/// Represent a small example snippet for documentation.
///
/// ## Examples
/// ```rust
/// use dash_core::lang::registry::Example;
///
/// let ex = Example {
///     code: "x = 1",
///     note: Some("Bind `x`."),
/// };
/// assert!(ex.code.contains('='));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Example {
    pub code: &'static str,
    pub note: Option<&'static str>,
}
