//! Arithmetic operators for building expressions
//!
//! `Expr` combines with `Expr`, `Symbol`, `f64`, `i64` and `i32` on either
//! side. Subtraction and division are expressed through `Add`/`Mul` with
//! negated or inverted operands, the way the printers expect them.

use std::ops::{Add, Div, Mul, Neg, Sub};

use super::{Expr, Number, Symbol};

fn add_exprs(lhs: Expr, rhs: Expr) -> Expr {
    Expr::sum([lhs, rhs])
}

fn sub_exprs(lhs: Expr, rhs: Expr) -> Expr {
    Expr::sum([lhs, rhs.negated()])
}

fn mul_exprs(lhs: Expr, rhs: Expr) -> Expr {
    // numeric coefficients lead
    match (&lhs, &rhs) {
        (Expr::Number(_), _) => Expr::product([lhs, rhs]),
        (_, Expr::Number(_)) => Expr::product([rhs, lhs]),
        _ => Expr::product([lhs, rhs]),
    }
}

fn div_exprs(lhs: Expr, rhs: Expr) -> Expr {
    match rhs {
        Expr::Number(Number::Integer(n)) if n != 0 => match Number::rational(1, n) {
            Ok(inverse) => mul_exprs(Expr::Number(inverse), lhs),
            Err(_) => mul_exprs(lhs, Expr::integer(n).pow(-1)),
        },
        other => mul_exprs(lhs, other.pow(-1)),
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.negated()
    }
}

impl Neg for Symbol {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::from(self).negated()
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $func:ident) => {
        impl<T: Into<Expr>> $trait<T> for Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                $func(self, rhs.into())
            }
        }

        impl<T: Into<Expr>> $trait<T> for Symbol {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                $func(Expr::from(self), rhs.into())
            }
        }

        impl $trait<Expr> for f64 {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $func(Expr::from(self), rhs)
            }
        }

        impl $trait<Expr> for i64 {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $func(Expr::from(self), rhs)
            }
        }

        impl $trait<Expr> for i32 {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $func(Expr::from(self), rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add_exprs);
impl_binary_op!(Sub, sub, sub_exprs);
impl_binary_op!(Mul, mul, mul_exprs);
impl_binary_op!(Div, div, div_exprs);
