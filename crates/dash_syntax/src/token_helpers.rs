//! Small helper APIs for working with `Token` / `TokenKind`.
//!
//! These helpers exist to reduce repetitive `matches!(...)` at call sites and to make it easy
//! to work with ID-based tokens.

use crate::lexer::{Token, TokenKind};
use dash_core::lang::operators::{self, OperatorId};
use dash_core::lang::punctuation::PunctuationId;
use dash_core::lang::reserved::ReservedId;

impl TokenKind {
    /// Return the reserved-word id, if this is a reserved-word token.
    pub fn reserved_id(&self) -> Option<ReservedId> {
        match self {
            TokenKind::Reserved(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given reserved word.
    pub fn is_reserved(&self, id: ReservedId) -> bool {
        matches!(self, TokenKind::Reserved(r) if *r == id)
    }

    /// Return the operator id, if this is an operator token.
    pub fn operator_id(&self) -> Option<OperatorId> {
        match self {
            TokenKind::Operator(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given operator.
    pub fn is_operator(&self, id: OperatorId) -> bool {
        matches!(self, TokenKind::Operator(o) if *o == id)
    }

    /// Return the operator id if this token is an infix operator the grammar currently accepts.
    pub fn infix_operator(&self) -> Option<OperatorId> {
        self.operator_id().filter(|id| operators::info_for(*id).stability.is_active())
    }

    /// Return the punctuation id, if this is a punctuation token.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        match self {
            TokenKind::Punctuation(id) => Some(*id),
            _ => None,
        }
    }

    /// Return `true` if this is the given punctuation.
    pub fn is_punctuation(&self, id: PunctuationId) -> bool {
        matches!(self, TokenKind::Punctuation(p) if *p == id)
    }

    /// Return `true` for tokens that are not part of the grammar proper (comments).
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment(_))
    }
}

impl Token {
    /// Convenience wrapper for `self.kind.reserved_id()`.
    pub fn reserved_id(&self) -> Option<ReservedId> {
        self.kind.reserved_id()
    }

    /// Convenience wrapper for `self.kind.operator_id()`.
    pub fn operator_id(&self) -> Option<OperatorId> {
        self.kind.operator_id()
    }

    /// Convenience wrapper for `self.kind.punctuation_id()`.
    pub fn punctuation_id(&self) -> Option<PunctuationId> {
        self.kind.punctuation_id()
    }

    /// Return `true` if `next` starts exactly where this token ends.
    pub fn is_adjacent_to(&self, next: &Token) -> bool {
        self.span.end == next.span.start
    }
}
