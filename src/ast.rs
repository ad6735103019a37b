//! Operator and literal tokens consumed by expression lowering.
//!
//! These enumerations mirror the lexical grammar of Lark. The value layer
//! does not own the lexer; it only needs the token kinds that reach it
//! through expression nodes: binary operators, unary operators, and the
//! literal kinds that become compile-time constants.

use std::fmt;

/// A binary operator token.
///
/// The full lexical grammar is represented here; the lowering engine
/// currently implements a subset and reports `UnimplementedOperator` for
/// the rest (`%`, `>`, `>=`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinOp {
    /// The source-text spelling of this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }

    /// Whether this operator yields a boolean result.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge
        )
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A unary operator token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Pos,
    /// `&`
    Addr,
    /// `!`
    Not,
    /// `*`
    Deref,
}

impl UnaryOp {
    /// The source-text spelling of this operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::Addr => "&",
            UnaryOp::Not => "!",
            UnaryOp::Deref => "*",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The kind of a literal token, as classified by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LitKind {
    /// An integer literal: `42`, `0xFF`, `0o17`, `0b101`, `017`.
    Int,
    /// A floating-point literal: `1.5`, `2e10`.
    Float,
    /// An imaginary literal: `3i`.
    Imag,
    /// A character literal: `'a'`, `'\n'`.
    Char,
    /// A string literal: `"hello"` or a raw backtick string.
    Str,
}
