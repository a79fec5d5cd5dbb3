//! S-expression rendering of the tree.
//!
//! Format: `(Kind Variant "text" Field: child Field: [child child])`. Absent optional fields and empty repeated
//! fields are omitted, which keeps snapshots short.

use std::fmt::Write;

use super::NodeRef;
use super::node::Field;

impl NodeRef<'_> {
    /// Render this node and its subtree on one line.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, *self);
        out
    }
}

impl super::Source {
    pub fn to_sexp(&self) -> String {
        self.node().to_sexp()
    }
}

fn write_node(out: &mut String, node: NodeRef<'_>) {
    out.push('(');
    out.push_str(node.kind().as_str());
    if let Some(variant) = node.variant() {
        out.push(' ');
        out.push_str(variant);
    }
    if let Some(text) = node.text() {
        // Debug formatting quotes and escapes the text.
        let _ = write!(out, " {text:?}");
    }
    for (name, field) in node.fields() {
        match field {
            Field::Node(child) => {
                let _ = write!(out, " {name}: ");
                write_node(out, child);
            }
            Field::Nodes(children) if children.is_empty() => {}
            Field::Nodes(children) => {
                let _ = write!(out, " {name}: [");
                for (i, child) in children.into_iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    write_node(out, child);
                }
                out.push(']');
            }
        }
    }
    out.push(')');
}

#[cfg(test)]
mod tests {
    fn sexp(source: &str) -> String {
        let parsed = crate::parse(source);
        assert!(parsed.errors.is_empty(), "parse({source:?}) failed: {:?}", parsed.errors);
        parsed.source.to_sexp()
    }

    #[test]
    fn test_leaf_text_is_quoted() {
        assert_eq!(sexp("a"), r#"(source Body: [(Symbol "a")])"#);
        assert_eq!(sexp("\"q\\\"\""), r#"(source Body: [(String Content: [(stringFragment "q") (escapeSequence Ignore "\\\"")])])"#);
    }

    #[test]
    fn test_empty_sequences_are_omitted() {
        assert_eq!(sexp("[]"), "(source Body: [(List)])");
        assert_eq!(sexp(""), "(source)");
    }

    #[test]
    fn test_infix_shows_variant() {
        assert_eq!(
            sexp("a . b"),
            r#"(source Body: [(Infix Dot Left: (Symbol "a") Operator: (dotOperator ".") Right: (Symbol "b"))])"#
        );
    }
}
