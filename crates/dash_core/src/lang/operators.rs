//! Infix operator vocabulary and the precedence ladder.
//!
//! Dash currently has three active infix operators: `$` (run the following shell command against the left form),
//! `.` (access) and `=` (binding). The grammar also reserves precedence slots for arithmetic, concatenation,
//! relational and logical operators. Those rows live in [`OPERATORS`] with [`Stability::Reserved`] and no spelling,
//! so turning one on is a matter of giving it a spelling rather than restructuring the parser.
//!
//! ## Notes
//! - Precedence values come from [`PrecLevel`]; higher binds tighter.
//! - Lookup via [`from_str`] is **case-sensitive** and only ever yields active operators.
//! - [`OPERATORS`] is indexed by `OperatorId as usize`; the guardrail tests enforce that layout.
//!
//! ## Examples
//! ```rust
//! use dash_core::lang::operators::{self, Associativity, OperatorId};
//!
//! assert_eq!(operators::from_str("."), Some(OperatorId::Dot));
//! assert_eq!(operators::info_for(OperatorId::Assign).precedence, 5);
//! assert_eq!(operators::info_for(OperatorId::Assign).associativity, Associativity::Right);
//! assert_eq!(operators::from_str("+"), None); // reserved, not yet spelled
//! ```

use super::registry::{Example, SinceVersion, Stability};

/// Define how operators associate when chained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
}

/// Named rungs of the precedence ladder, tightest first.
///
/// ## Notes
/// - Several rungs (`Prefix`, `Hash`, `App`, `Neg`, `Cons`, `Prod`, `If`, `Seq`, `Match`) have no operator attached
///   at all today; they are kept so the numbering stays stable as the language grows.
/// - `Dot` and `Dollar` share a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrecLevel {
    Prefix,
    Dot,
    Dollar,
    Hash,
    App,
    Neg,
    Pow,
    Mult,
    Add,
    Cons,
    Concat,
    Rel,
    And,
    Or,
    Prod,
    Assign,
    If,
    Seq,
    Match,
}

impl PrecLevel {
    /// Every rung, tightest first.
    pub const ALL: [PrecLevel; 19] = [
        PrecLevel::Prefix,
        PrecLevel::Dot,
        PrecLevel::Dollar,
        PrecLevel::Hash,
        PrecLevel::App,
        PrecLevel::Neg,
        PrecLevel::Pow,
        PrecLevel::Mult,
        PrecLevel::Add,
        PrecLevel::Cons,
        PrecLevel::Concat,
        PrecLevel::Rel,
        PrecLevel::And,
        PrecLevel::Or,
        PrecLevel::Prod,
        PrecLevel::Assign,
        PrecLevel::If,
        PrecLevel::Seq,
        PrecLevel::Match,
    ];

    /// Numeric binding strength of this rung (higher binds tighter).
    pub const fn value(self) -> u8 {
        match self {
            PrecLevel::Prefix => 19,
            PrecLevel::Dot | PrecLevel::Dollar => 18,
            PrecLevel::Hash => 17,
            PrecLevel::App => 16,
            PrecLevel::Neg => 15,
            PrecLevel::Pow => 14,
            PrecLevel::Mult => 13,
            PrecLevel::Add => 12,
            PrecLevel::Cons => 11,
            PrecLevel::Concat => 10,
            PrecLevel::Rel => 9,
            PrecLevel::And => 8,
            PrecLevel::Or => 7,
            PrecLevel::Prod => 6,
            PrecLevel::Assign => 5,
            PrecLevel::If => 4,
            PrecLevel::Seq => 3,
            PrecLevel::Match => 2,
        }
    }
}

/// Grammar used for the right-hand operand of an infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    /// Any form, parsed by precedence climbing.
    Form,
    /// A shell command terminated by `;`.
    Shell,
}

/// Stable identifier for every infix operator, active or reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorId {
    // Active
    Dollar,
    Dot,
    Assign,

    // Reserved precedence space
    Pow,
    Mult,
    Add,
    Concat,
    Rel,
    And,
    Or,
}

/// Metadata for an operator.
///
/// ## Notes
/// - `spellings` is empty for reserved rows.
/// - `node_name` is the CST node kind for the operator token (`dollarOperator`, ...).
/// - `variant` is the label of the `Infix` production built with this operator (`Dollar`, `Dot`, `Equal`).
#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub id: OperatorId,
    pub spellings: &'static [&'static str],
    pub level: PrecLevel,
    pub precedence: u8,
    pub associativity: Associativity,
    pub operand: Operand,
    pub node_name: &'static str,
    pub variant: &'static str,
    pub since_version: Option<SinceVersion>,
    pub stability: Stability,
    pub examples: &'static [Example],
}

/// Registry of all operators, indexed by `OperatorId as usize`.
pub const OPERATORS: &[OperatorInfo] = &[
    // Active
    OperatorInfo {
        examples: &[Example {
            code: "src $ ls -la;",
            note: Some("Run `ls -la` against `src`."),
        }],
        ..op(
            OperatorId::Dollar,
            &["$"],
            PrecLevel::Dollar,
            Associativity::Left,
            Operand::Shell,
            "dollarOperator",
            "Dollar",
        )
    },
    OperatorInfo {
        examples: &[Example {
            code: "config.name",
            note: None,
        }],
        ..op(
            OperatorId::Dot,
            &["."],
            PrecLevel::Dot,
            Associativity::Left,
            Operand::Form,
            "dotOperator",
            "Dot",
        )
    },
    OperatorInfo {
        examples: &[Example {
            code: "a = b = 1",
            note: Some("Right-associative: `a = (b = 1)`."),
        }],
        ..op(
            OperatorId::Assign,
            &["="],
            PrecLevel::Assign,
            Associativity::Right,
            Operand::Form,
            "assignOperator",
            "Equal",
        )
    },
    // Reserved precedence space
    reserved(OperatorId::Pow, PrecLevel::Pow, Associativity::Right, "powOperator", "Pow"),
    reserved(OperatorId::Mult, PrecLevel::Mult, Associativity::Left, "multOperator", "Mult"),
    reserved(OperatorId::Add, PrecLevel::Add, Associativity::Left, "addOperator", "Add"),
    reserved(
        OperatorId::Concat,
        PrecLevel::Concat,
        Associativity::Right,
        "concatOperator",
        "Concat",
    ),
    reserved(OperatorId::Rel, PrecLevel::Rel, Associativity::Left, "relOperator", "Rel"),
    reserved(OperatorId::And, PrecLevel::And, Associativity::Right, "andOperator", "And"),
    reserved(OperatorId::Or, PrecLevel::Or, Associativity::Right, "orOperator", "Or"),
];

/// Return the full metadata entry for an operator.
pub fn info_for(id: OperatorId) -> &'static OperatorInfo {
    &OPERATORS[id as usize]
}

/// Return the canonical spelling of an active operator, or `""` for a reserved one.
pub fn as_str(id: OperatorId) -> &'static str {
    info_for(id).spellings.first().copied().unwrap_or("")
}

/// Resolve an operator spelling to its identifier.
///
/// ## Returns
/// - `Some(OperatorId)` if an **active** operator has this spelling.
/// - `None` otherwise (reserved rows have no spelling).
pub fn from_str(spelling: &str) -> Option<OperatorId> {
    OPERATORS
        .iter()
        .filter(|o| o.stability.is_active())
        .find(|o| {
            let spellings: &[&str] = o.spellings;
            spellings.contains(&spelling)
        })
        .map(|o| o.id)
}

/// Minimum precedence for the right-hand operand of `id`.
///
/// Left-associative operators bind their right side one level tighter so that `a . b . c` groups as
/// `(a . b) . c`; right-associative operators reuse their own level so `a = b = c` groups as `a = (b = c)`.
pub fn right_binding_power(id: OperatorId) -> u8 {
    let info = info_for(id);
    match info.associativity {
        Associativity::Left => info.precedence + 1,
        Associativity::Right => info.precedence,
    }
}

/// Iterate over the active operators.
pub fn active() -> impl Iterator<Item = &'static OperatorInfo> {
    OPERATORS.iter().filter(|o| o.stability.is_active())
}

// --- helpers -----------------------------------------------------------------

const fn op(
    id: OperatorId,
    spellings: &'static [&'static str],
    level: PrecLevel,
    associativity: Associativity,
    operand: Operand,
    node_name: &'static str,
    variant: &'static str,
) -> OperatorInfo {
    OperatorInfo {
        id,
        spellings,
        level,
        precedence: level.value(),
        associativity,
        operand,
        node_name,
        variant,
        since_version: Some("0.1.0"),
        stability: Stability::Stable,
        examples: &[],
    }
}

const fn reserved(
    id: OperatorId,
    level: PrecLevel,
    associativity: Associativity,
    node_name: &'static str,
    variant: &'static str,
) -> OperatorInfo {
    OperatorInfo {
        since_version: None,
        stability: Stability::Reserved,
        ..op(id, &[], level, associativity, Operand::Form, node_name, variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_table() {
        let active: Vec<_> = active().map(|o| (o.id, o.precedence, o.associativity)).collect();
        assert_eq!(
            active,
            vec![
                (OperatorId::Dollar, 18, Associativity::Left),
                (OperatorId::Dot, 18, Associativity::Left),
                (OperatorId::Assign, 5, Associativity::Right),
            ]
        );
    }

    #[test]
    fn test_reserved_levels_are_preserved() {
        let levels: Vec<_> = OPERATORS
            .iter()
            .filter(|o| !o.stability.is_active())
            .map(|o| (o.id, o.precedence))
            .collect();
        assert_eq!(
            levels,
            vec![
                (OperatorId::Pow, 14),
                (OperatorId::Mult, 13),
                (OperatorId::Add, 12),
                (OperatorId::Concat, 10),
                (OperatorId::Rel, 9),
                (OperatorId::And, 8),
                (OperatorId::Or, 7),
            ]
        );
    }

    #[test]
    fn test_right_binding_power() {
        assert_eq!(right_binding_power(OperatorId::Dot), 19);
        assert_eq!(right_binding_power(OperatorId::Dollar), 19);
        assert_eq!(right_binding_power(OperatorId::Assign), 5);
    }

    #[test]
    fn test_shell_operand() {
        assert_eq!(info_for(OperatorId::Dollar).operand, Operand::Shell);
        assert_eq!(info_for(OperatorId::Dot).operand, Operand::Form);
    }

    #[test]
    fn test_ladder_is_strictly_descending_except_shared_rung() {
        for pair in PrecLevel::ALL.windows(2) {
            let (hi, lo) = (pair[0].value(), pair[1].value());
            if pair[0] == PrecLevel::Dot {
                assert_eq!(hi, lo, "dot and dollar share a rung");
            } else {
                assert!(hi > lo, "{:?} ({hi}) should bind tighter than {:?} ({lo})", pair[0], pair[1]);
            }
        }
    }
}
