//! # Expression Tree
//!
//! A small symbolic expression tree: numbers, symbols, sums, products,
//! powers, function calls, relations, boolean combinations, piecewise
//! selections and derivative placeholders.
//!
//! Trees are built with the constructors on [`Expr`], with the arithmetic
//! operators from [`ops`], or by parsing text with [`parse_expr`]. No
//! simplification happens beyond flattening nested sums and products and
//! folding the sign of a negated coefficient.
//!
//! ```
//! use modelparams_rs::expr::{parse_expr, Expr, Symbol};
//!
//! let x = Expr::from(Symbol::new("x"));
//! let y = Expr::from(Symbol::new("y"));
//! let built = (x.clone() + y.clone()) * 2;
//!
//! assert_eq!(built.to_string(), "2*(x + y)");
//! assert_eq!(parse_expr("(x + y)*2").unwrap().free_symbols().len(), 2);
//! ```

pub mod number;
pub mod ops;
pub mod parser;
pub mod symbol;

pub use number::Number;
pub use parser::parse_expr;
pub use symbol::{derivative_name, Symbol};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

/// Errors raised while building or parsing expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Failed to parse expression: {message}")]
    Parse { message: String },

    #[error("Division by zero in rational literal")]
    ZeroDenominator,

    #[error("expected a relational or boolean condition, got {kind}")]
    ExpectedCondition { kind: NodeKind },

    #[error("expected a '<', '<=', '>' or '>=' condition, got '{op}'")]
    ExpectedOrdering { op: RelOp },

    #[error("Piecewise needs a final (value, True) branch")]
    MissingDefault,

    #[error("{function}() takes {expected} arguments, got {got}")]
    Arity {
        function: String,
        expected: String,
        got: usize,
    },
}

/// Relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl RelOp {
    /// Infix token
    pub fn symbol(&self) -> &'static str {
        match self {
            RelOp::Eq => "==",
            RelOp::Ne => "!=",
            RelOp::Lt => "<",
            RelOp::Le => "<=",
            RelOp::Gt => ">",
            RelOp::Ge => ">=",
        }
    }

    /// Lowercase call name (`lt`, `ge`, ...)
    pub fn call_name(&self) -> &'static str {
        match self {
            RelOp::Eq => "eq",
            RelOp::Ne => "ne",
            RelOp::Lt => "lt",
            RelOp::Le => "le",
            RelOp::Gt => "gt",
            RelOp::Ge => "ge",
        }
    }

    /// Apply the relation to two floats.
    pub fn compare(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            RelOp::Eq => lhs == rhs,
            RelOp::Ne => lhs != rhs,
            RelOp::Lt => lhs < rhs,
            RelOp::Le => lhs <= rhs,
            RelOp::Gt => lhs > rhs,
            RelOp::Ge => lhs >= rhs,
        }
    }
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

/// Named mathematical constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constant {
    Pi,
    E,
    Infinity,
    NaN,
}

impl Constant {
    pub fn value(&self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::Infinity => f64::INFINITY,
            Constant::NaN => f64::NAN,
        }
    }
}

/// Node kinds, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Number,
    Symbol,
    Constant,
    Bool,
    Add,
    Mul,
    Pow,
    Function,
    Relational,
    Piecewise,
    And,
    Or,
    Derivative,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Number => "Number",
            NodeKind::Symbol => "Symbol",
            NodeKind::Constant => "Constant",
            NodeKind::Bool => "Bool",
            NodeKind::Add => "Add",
            NodeKind::Mul => "Mul",
            NodeKind::Pow => "Pow",
            NodeKind::Function => "Function",
            NodeKind::Relational => "Relational",
            NodeKind::Piecewise => "Piecewise",
            NodeKind::And => "And",
            NodeKind::Or => "Or",
            NodeKind::Derivative => "Derivative",
        };
        write!(f, "{}", name)
    }
}

/// Symbolic expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Number(Number),
    Symbol(Symbol),
    Constant(Constant),
    Bool(bool),
    /// Sum of terms; `a - b` is `Add([a, Mul([-1, b])])`
    Add(Vec<Expr>),
    /// Product of factors; `a / b` is `Mul([a, Pow(b, -1)])`
    Mul(Vec<Expr>),
    Pow(Box<Expr>, Box<Expr>),
    /// Call of a named function; names are kept as written
    Function(String, Vec<Expr>),
    Relational(RelOp, Box<Expr>, Box<Expr>),
    /// `(value, condition)` branches tried in order, then `otherwise`
    Piecewise {
        branches: Vec<(Expr, Expr)>,
        otherwise: Box<Expr>,
    },
    Boolean(BoolOp, Vec<Expr>),
    /// Placeholder for `d f / d x`
    Derivative(Symbol, Symbol),
}

impl Expr {
    pub fn integer(value: i64) -> Self {
        Expr::Number(Number::Integer(value))
    }

    pub fn float(value: f64) -> Self {
        Expr::Number(Number::Float(value))
    }

    pub fn rational(p: i64, q: i64) -> Result<Self, ExprError> {
        Ok(Expr::Number(Number::rational(p, q)?))
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Expr::Symbol(Symbol::new(name))
    }

    /// Sum of `terms`, flattening nested sums and dropping literal zeros.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for term in terms {
            match term {
                Expr::Add(inner) => flat.extend(inner),
                Expr::Number(n) if n.is_zero() => {}
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expr::integer(0),
            1 => flat.remove(0),
            _ => Expr::Add(flat),
        }
    }

    /// Product of `factors`, flattening nested products and dropping literal ones.
    pub fn product(factors: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for factor in factors {
            match factor {
                Expr::Mul(inner) => flat.extend(inner),
                Expr::Number(n) if n.is_one() => {}
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => Expr::integer(1),
            1 => flat.remove(0),
            _ => Expr::Mul(flat),
        }
    }

    /// `self ** exponent`
    pub fn pow(self, exponent: impl Into<Expr>) -> Self {
        Expr::Pow(Box::new(self), Box::new(exponent.into()))
    }

    /// `self ** (1/2)`
    pub fn sqrt(self) -> Self {
        self.pow(Expr::Number(Number::Rational(1, 2)))
    }

    /// Additive inverse, folding the sign into a leading numeric coefficient.
    pub fn negated(self) -> Self {
        match self {
            Expr::Number(n) => Expr::Number(n.negate()),
            Expr::Mul(mut factors) => match factors.first() {
                Some(Expr::Number(n)) => {
                    let coefficient = n.negate();
                    factors[0] = Expr::Number(coefficient);
                    Expr::product(factors)
                }
                _ => {
                    factors.insert(0, Expr::integer(-1));
                    Expr::Mul(factors)
                }
            },
            other => Expr::Mul(vec![Expr::integer(-1), other]),
        }
    }

    /// Call of the function `name`.
    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Function(name.into(), args)
    }

    pub fn relational(op: RelOp, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Expr::Relational(op, Box::new(lhs.into()), Box::new(rhs.into()))
    }

    pub fn lt(self, rhs: impl Into<Expr>) -> Self {
        Expr::relational(RelOp::Lt, self, rhs)
    }

    pub fn le(self, rhs: impl Into<Expr>) -> Self {
        Expr::relational(RelOp::Le, self, rhs)
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> Self {
        Expr::relational(RelOp::Gt, self, rhs)
    }

    pub fn ge(self, rhs: impl Into<Expr>) -> Self {
        Expr::relational(RelOp::Ge, self, rhs)
    }

    pub fn equals(self, rhs: impl Into<Expr>) -> Self {
        Expr::relational(RelOp::Eq, self, rhs)
    }

    pub fn not_equals(self, rhs: impl Into<Expr>) -> Self {
        Expr::relational(RelOp::Ne, self, rhs)
    }

    /// Boolean combination, flattening nested uses of the same connective.
    pub fn boolean(op: BoolOp, operands: impl IntoIterator<Item = Expr>) -> Self {
        let mut flat = Vec::new();
        for operand in operands {
            match operand {
                Expr::Boolean(inner_op, inner) if inner_op == op => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            Expr::Boolean(op, flat)
        }
    }

    pub fn and(self, other: Expr) -> Self {
        Expr::boolean(BoolOp::And, [self, other])
    }

    pub fn or(self, other: Expr) -> Self {
        Expr::boolean(BoolOp::Or, [self, other])
    }

    /// Placeholder for the derivative of `f` with respect to `x`.
    pub fn derivative(f: Symbol, x: Symbol) -> Self {
        Expr::Derivative(f, x)
    }

    /// Piecewise selection from `(value, condition)` pairs.
    ///
    /// The last pair must have the condition `True`; it becomes the default.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelparams_rs::expr::Expr;
    ///
    /// let x = Expr::symbol("x");
    /// let pw = Expr::piecewise(vec![
    ///     (Expr::from(1), x.clone().lt(0)),
    ///     (x.clone(), Expr::from(true)),
    /// ])
    /// .unwrap();
    /// assert_eq!(pw.to_string(), "Piecewise((1, x < 0), (x, True))");
    ///
    /// assert!(Expr::piecewise(vec![(Expr::from(1), x.lt(0))]).is_err());
    /// ```
    pub fn piecewise(mut pairs: Vec<(Expr, Expr)>) -> Result<Self, ExprError> {
        match pairs.pop() {
            Some((otherwise, Expr::Bool(true))) => {
                if pairs.is_empty() {
                    Ok(otherwise)
                } else {
                    Ok(Expr::Piecewise {
                        branches: pairs,
                        otherwise: Box::new(otherwise),
                    })
                }
            }
            _ => Err(ExprError::MissingDefault),
        }
    }

    /// `if_true` where `condition` holds, `if_false` elsewhere.
    pub fn conditional(
        condition: Expr,
        if_true: impl Into<Expr>,
        if_false: impl Into<Expr>,
    ) -> Result<Self, ExprError> {
        match condition {
            Expr::Bool(true) => Ok(if_true.into()),
            Expr::Bool(false) => Ok(if_false.into()),
            Expr::Relational(..) | Expr::Boolean(..) => Ok(Expr::Piecewise {
                branches: vec![(if_true.into(), condition)],
                otherwise: Box::new(if_false.into()),
            }),
            other => Err(ExprError::ExpectedCondition { kind: other.kind() }),
        }
    }

    /// Smooth replacement for a conditional over an ordering relation.
    ///
    /// With `H = 1/(1 + exp((lhs - rhs)/sigma))`, a `<`/`<=` condition
    /// yields `if_true*(1 - H) + if_false*H` and a `>`/`>=` condition
    /// yields `if_true*H + if_false*(1 - H)`.
    pub fn continuous_conditional(
        condition: Expr,
        if_true: impl Into<Expr>,
        if_false: impl Into<Expr>,
        sigma: f64,
    ) -> Result<Self, ExprError> {
        let (op, lhs, rhs) = match condition {
            Expr::Relational(op, lhs, rhs) => (op, *lhs, *rhs),
            other => return Err(ExprError::ExpectedCondition { kind: other.kind() }),
        };
        let (if_true, if_false) = (if_true.into(), if_false.into());

        let exponent = (lhs - rhs) / sigma;
        let h = (Expr::integer(1) + Expr::func("exp", vec![exponent])).pow(-1);
        let one_minus_h = Expr::integer(1) - h.clone();

        match op {
            RelOp::Lt | RelOp::Le => Ok(if_true * one_minus_h + if_false * h),
            RelOp::Gt | RelOp::Ge => Ok(if_true * h + if_false * one_minus_h),
            op => Err(ExprError::ExpectedOrdering { op }),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Expr::Number(_) => NodeKind::Number,
            Expr::Symbol(_) => NodeKind::Symbol,
            Expr::Constant(_) => NodeKind::Constant,
            Expr::Bool(_) => NodeKind::Bool,
            Expr::Add(_) => NodeKind::Add,
            Expr::Mul(_) => NodeKind::Mul,
            Expr::Pow(_, _) => NodeKind::Pow,
            Expr::Function(_, _) => NodeKind::Function,
            Expr::Relational(_, _, _) => NodeKind::Relational,
            Expr::Piecewise { .. } => NodeKind::Piecewise,
            Expr::Boolean(BoolOp::And, _) => NodeKind::And,
            Expr::Boolean(BoolOp::Or, _) => NodeKind::Or,
            Expr::Derivative(_, _) => NodeKind::Derivative,
        }
    }

    /// Direct children, in order.
    pub fn args(&self) -> Vec<&Expr> {
        match self {
            Expr::Number(_)
            | Expr::Symbol(_)
            | Expr::Constant(_)
            | Expr::Bool(_)
            | Expr::Derivative(_, _) => Vec::new(),
            Expr::Add(items) | Expr::Mul(items) | Expr::Function(_, items) | Expr::Boolean(_, items) => {
                items.iter().collect()
            }
            Expr::Pow(a, b) | Expr::Relational(_, a, b) => vec![a.as_ref(), b.as_ref()],
            Expr::Piecewise {
                branches,
                otherwise,
            } => {
                let mut out: Vec<&Expr> = branches.iter().flat_map(|(v, c)| [v, c]).collect();
                out.push(otherwise.as_ref());
                out
            }
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Expr::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_integer)
    }

    pub fn is_integer(&self) -> bool {
        self.as_integer().is_some()
    }

    /// Leaf nodes
    pub fn is_atom(&self) -> bool {
        self.args().is_empty()
    }

    /// Whether the expression prints with a leading minus sign: a negative
    /// number, or a product whose first factor is a negative number.
    pub fn has_minus_sign(&self) -> bool {
        match self {
            Expr::Number(n) => n.is_negative(),
            Expr::Mul(factors) => factors
                .first()
                .and_then(Expr::as_number)
                .map(Number::is_negative)
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Symbols the expression depends on, derivative placeholders excluded.
    pub fn free_symbols(&self) -> BTreeSet<Symbol> {
        let mut out = BTreeSet::new();
        self.walk(&mut |e| {
            if let Expr::Symbol(s) = e {
                out.insert(s.clone());
            }
        });
        out
    }

    /// `(f, x)` pairs of every derivative placeholder in the expression.
    pub fn derivatives(&self) -> BTreeSet<(Symbol, Symbol)> {
        let mut out = BTreeSet::new();
        self.walk(&mut |e| {
            if let Expr::Derivative(f, x) = e {
                out.insert((f.clone(), x.clone()));
            }
        });
        out
    }

    /// Sorted names to resolve when evaluating the expression.
    ///
    /// Derivative placeholders contribute their `d{f}_d{x}` name when
    /// `include_derivatives` is set.
    pub fn symbol_names(&self, include_derivatives: bool) -> Vec<String> {
        let mut names: BTreeSet<String> = self
            .free_symbols()
            .into_iter()
            .map(|s| s.name().to_string())
            .collect();
        if include_derivatives {
            names.extend(self.derivatives().iter().map(|(f, x)| derivative_name(f, x)));
        }
        names.into_iter().collect()
    }

    /// Replace symbols according to `mapping`.
    pub fn subs(&self, mapping: &HashMap<Symbol, Expr>) -> Expr {
        match self {
            Expr::Symbol(s) => mapping.get(s).cloned().unwrap_or_else(|| self.clone()),
            Expr::Number(_) | Expr::Constant(_) | Expr::Bool(_) | Expr::Derivative(_, _) => {
                self.clone()
            }
            Expr::Add(terms) => Expr::sum(terms.iter().map(|t| t.subs(mapping))),
            Expr::Mul(factors) => Expr::product(factors.iter().map(|f| f.subs(mapping))),
            Expr::Pow(base, exp) => base.subs(mapping).pow(exp.subs(mapping)),
            Expr::Function(name, args) => {
                Expr::Function(name.clone(), args.iter().map(|a| a.subs(mapping)).collect())
            }
            Expr::Relational(op, lhs, rhs) => {
                Expr::relational(*op, lhs.subs(mapping), rhs.subs(mapping))
            }
            Expr::Piecewise {
                branches,
                otherwise,
            } => Expr::Piecewise {
                branches: branches
                    .iter()
                    .map(|(v, c)| (v.subs(mapping), c.subs(mapping)))
                    .collect(),
                otherwise: Box::new(otherwise.subs(mapping)),
            },
            Expr::Boolean(op, operands) => {
                Expr::boolean(*op, operands.iter().map(|o| o.subs(mapping)))
            }
        }
    }

    fn walk(&self, visit: &mut impl FnMut(&Expr)) {
        visit(self);
        for child in self.args() {
            child.walk(visit);
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = crate::printer::sympycode(self).map_err(|_| fmt::Error)?;
        write!(f, "{}", text)
    }
}

impl From<Number> for Expr {
    fn from(value: Number) -> Self {
        Expr::Number(value)
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::integer(value)
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::integer(value as i64)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::float(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Bool(value)
    }
}

impl From<Symbol> for Expr {
    fn from(value: Symbol) -> Self {
        Expr::Symbol(value)
    }
}

impl From<&Symbol> for Expr {
    fn from(value: &Symbol) -> Self {
        Expr::Symbol(value.clone())
    }
}

impl From<Constant> for Expr {
    fn from(value: Constant) -> Self {
        Expr::Constant(value)
    }
}
