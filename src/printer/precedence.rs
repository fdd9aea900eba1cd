//! Operator precedence levels
//!
//! A child is parenthesized when its level is below the level of the
//! context it is printed in.

use crate::expr::{BoolOp, Expr, Number};

/// Inline conditionals (`a if c else b`)
pub const LAMBDA: u32 = 1;
pub const OR: u32 = 20;
pub const AND: u32 = 30;
pub const RELATIONAL: u32 = 35;
pub const ADD: u32 = 40;
pub const MUL: u32 = 50;
pub const POW: u32 = 60;
pub const FUNC: u32 = 70;
pub const ATOM: u32 = 1000;

/// Dialect-independent precedence of a node.
///
/// Negative numbers and products with a negative leading coefficient print
/// with a leading minus and therefore rank as sums. Rationals print as a
/// quotient and rank as products.
pub fn precedence(expr: &Expr) -> u32 {
    match expr {
        Expr::Number(n) if n.is_negative() => ADD,
        Expr::Number(Number::Rational(_, _)) => MUL,
        Expr::Number(_)
        | Expr::Symbol(_)
        | Expr::Constant(_)
        | Expr::Bool(_)
        | Expr::Derivative(_, _) => ATOM,
        Expr::Add(_) => ADD,
        Expr::Mul(_) if expr.has_minus_sign() => ADD,
        Expr::Mul(_) => MUL,
        Expr::Pow(_, _) => POW,
        Expr::Function(_, _) => FUNC,
        Expr::Relational(_, _, _) => RELATIONAL,
        Expr::Piecewise { .. } => LAMBDA,
        Expr::Boolean(BoolOp::And, _) => AND,
        Expr::Boolean(BoolOp::Or, _) => OR,
    }
}
