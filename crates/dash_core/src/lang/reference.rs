//! Render the vocabulary registries as Markdown.
//!
//! Used by the `generate_lang_reference` binary and by `dash vocab`.

use std::fmt::Write as _;

use super::{operators, punctuation, reserved};

/// Render every registry into one Markdown document.
///
/// ## Examples
/// ```rust
/// let md = dash_core::lang::reference::render_markdown();
/// assert!(md.starts_with("# Dash language reference"));
/// assert!(md.contains("| Dollar | `$` | 18 | Left | Shell |"));
/// ```
pub fn render_markdown() -> String {
    let mut out = String::new();
    out.push_str("# Dash language reference\n\n");
    out.push_str("Generated from `dash_core::lang`. Do not edit by hand.\n\n");

    render_reserved_section(&mut out);
    render_operators_section(&mut out);
    render_precedence_section(&mut out);
    render_punctuation_section(&mut out);

    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

fn render_reserved_section(out: &mut String) {
    out.push_str("## Reserved words\n\n");
    out.push_str("| Id | Spelling | Category | Description |\n");
    out.push_str("|---|---|---|---|\n");
    for r in reserved::RESERVED {
        let _ = writeln!(
            out,
            "| {:?} | `{}` | {:?} | {} |",
            r.id, r.canonical, r.category, r.description
        );
    }
    out.push('\n');
}

fn render_operators_section(out: &mut String) {
    out.push_str("## Operators\n\n");
    out.push_str("- **Precedence**: higher binds tighter.\n");
    out.push_str("- **Operand**: grammar of the right-hand side (`Shell` means a `;`-terminated command).\n");
    out.push_str("- Reserved rows hold a precedence slot but have no spelling yet.\n\n");
    out.push_str("| Id | Spelling | Precedence | Associativity | Operand | Node | Stability |\n");
    out.push_str("|---|---|---:|---|---|---|---|\n");
    for o in operators::OPERATORS {
        let spellings = o
            .spellings
            .iter()
            .map(|s| format!("`{s}`"))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            out,
            "| {:?} | {} | {} | {:?} | {:?} | `{}` | {:?} |",
            o.id, spellings, o.precedence, o.associativity, o.operand, o.node_name, o.stability
        );
    }
    out.push('\n');
}

fn render_precedence_section(out: &mut String) {
    out.push_str("## Precedence ladder\n\n");
    out.push_str("| Level | Value | Operators |\n");
    out.push_str("|---|---:|---|\n");
    for level in operators::PrecLevel::ALL {
        let ops = operators::OPERATORS
            .iter()
            .filter(|o| o.level == level)
            .map(|o| format!("{:?}", o.id))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "| {:?} | {} | {} |", level, level.value(), ops);
    }
    out.push('\n');
}

fn render_punctuation_section(out: &mut String) {
    out.push_str("## Punctuation\n\n");
    out.push_str("| Id | Spelling | Category |\n");
    out.push_str("|---|---|---|\n");
    for p in punctuation::PUNCTUATION {
        let _ = writeln!(out, "| {:?} | `{}` | {:?} |", p.id, p.canonical, p.category);
    }
    out.push('\n');
}
