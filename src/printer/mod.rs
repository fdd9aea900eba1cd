//! # Code Printer
//!
//! Renders an [`Expr`] as source text for a target [`Dialect`]: C, C++,
//! Python with a bare, `math`, `np`/`numpy` or `ufl` namespace, MATLAB,
//! Octave, or sympy's own string form.
//!
//! Rendering is a pure function of the tree and the dialect. Children are
//! parenthesized only where precedence requires it, products are split into
//! a numerator and a denominator, and small integer powers are expanded
//! into repeated multiplication.
//!
//! ```
//! use modelparams_rs::expr::Expr;
//! use modelparams_rs::printer::{ccode, matlabcode, pythoncode};
//!
//! let a = Expr::symbol("a");
//! let b = Expr::symbol("b");
//! let c = Expr::symbol("c");
//!
//! assert_eq!(ccode(&((a.clone() + b.clone()) * c.clone()), None).unwrap(), "(a + b)*c");
//! assert_eq!(pythoncode(&(a.clone() * b.clone() + c), None, "np").unwrap(), "a*b + c");
//! assert_eq!(matlabcode(&a.clone().pow(Expr::float(2.5)), Some("y")).unwrap(), "y = a^2.5");
//! ```

pub mod dialect;
pub mod precedence;

pub use dialect::{
    ConditionalStyle, Dialect, FunctionRule, Language, LiteralStyle, Namespace, PowerStyle,
    RelationalStyle,
};

use log::trace;
use thiserror::Error;

use crate::expr::number::format_float;
use crate::expr::{derivative_name, BoolOp, Constant, Expr, NodeKind, Number, RelOp, Symbol};
use precedence::{precedence, ADD, AND, ATOM, FUNC, LAMBDA, MUL, OR, POW, RELATIONAL};

/// Errors raised while rendering
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("{kind} is not supported by the {dialect} printer: {reason}")]
    Unsupported {
        kind: NodeKind,
        dialect: String,
        reason: String,
    },

    #[error("Unknown dialect '{0}'")]
    UnknownDialect(String),

    #[error("{function}() expects {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: usize,
        got: usize,
    },
}

type RenderResult<T> = Result<T, RenderError>;

/// Expression printer for one dialect
#[derive(Debug, Clone)]
pub struct Printer {
    dialect: Dialect,
}

impl Printer {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Printer for a dialect name accepted by [`Dialect::from_name`].
    pub fn for_dialect(name: &str) -> RenderResult<Self> {
        Ok(Self::new(Dialect::from_name(name)?))
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Render `expr`, optionally as an assignment to `assign_to`.
    ///
    /// # Arguments
    ///
    /// * `expr` - Expression to render
    /// * `assign_to` - Target name; when given, the result is a full
    ///   assignment statement in the dialect's syntax
    ///
    /// # Returns
    ///
    /// The source text, or a [`RenderError`] naming the node kind the
    /// dialect cannot express.
    pub fn render(&self, expr: &Expr, assign_to: Option<&str>) -> RenderResult<String> {
        trace!("rendering {} for {}", expr.kind(), self.dialect.name);
        let body = self.print(expr)?;
        Ok(match assign_to {
            Some(target) => self.dialect.assignment(target, &body),
            None => body,
        })
    }

    /// Render `expr` as an expression.
    pub fn print(&self, expr: &Expr) -> RenderResult<String> {
        match expr {
            Expr::Number(n) => Ok(self.number(n)),
            Expr::Symbol(s) => Ok(s.to_string()),
            Expr::Constant(c) => Ok(self.constant(*c)),
            Expr::Bool(b) => self.bool_literal(*b),
            Expr::Add(terms) => self.add(terms),
            Expr::Mul(factors) => self.mul(factors),
            Expr::Pow(base, exp) => self.pow(base, exp),
            Expr::Function(name, args) => self.function(name, args),
            Expr::Relational(op, lhs, rhs) => self.relational(*op, lhs, rhs),
            Expr::Piecewise {
                branches,
                otherwise,
            } => self.piecewise(branches, otherwise),
            Expr::Boolean(op, operands) => self.boolean(*op, operands),
            Expr::Derivative(f, x) => Ok(self.derivative(f, x)),
        }
    }

    /// Precedence of `expr` as this dialect prints it.
    pub fn precedence(&self, expr: &Expr) -> u32 {
        match expr {
            Expr::Pow(_, exp) => self.pow_precedence(exp),
            Expr::Relational(..) => match self.dialect.relational {
                RelationalStyle::Call(_) => FUNC,
                RelationalStyle::Infix => RELATIONAL,
            },
            Expr::Piecewise { .. } => match self.dialect.conditional {
                ConditionalStyle::InlineIf { .. } => LAMBDA,
                ConditionalStyle::Piecewise => FUNC,
                ConditionalStyle::Ternary | ConditionalStyle::Call(_) | ConditionalStyle::Blend => {
                    ATOM
                }
            },
            other => precedence(other),
        }
    }

    fn pow_precedence(&self, exp: &Expr) -> u32 {
        if self.dialect.expand_powers {
            match exp.as_integer() {
                Some(1) => return POW,
                Some(-3..=-1) | Some(2..=3) => return MUL,
                _ => {}
            }
            if let (Some(n), Some(_)) = (exp.as_number(), &self.dialect.sqrt) {
                if n.is_half() {
                    return FUNC;
                }
                if n.is_minus_half() {
                    return MUL;
                }
            }
        }
        match self.dialect.power {
            PowerStyle::Call(_) => FUNC,
            PowerStyle::Operator(_) => POW,
        }
    }

    /// Render, wrapping in parentheses when `expr` binds looser than `level`.
    fn paren(&self, expr: &Expr, level: u32) -> RenderResult<String> {
        let text = self.print(expr)?;
        if self.precedence(expr) < level {
            Ok(format!("({})", text))
        } else {
            Ok(text)
        }
    }

    /// Like [`Printer::paren`], also wrapping at equal precedence.
    fn paren_strict(&self, expr: &Expr, level: u32) -> RenderResult<String> {
        let text = self.print(expr)?;
        if self.precedence(expr) <= level {
            Ok(format!("({})", text))
        } else {
            Ok(text)
        }
    }

    fn unsupported<T>(&self, kind: NodeKind, reason: impl Into<String>) -> RenderResult<T> {
        Err(RenderError::Unsupported {
            kind,
            dialect: self.dialect.name.clone(),
            reason: reason.into(),
        })
    }

    fn integer_literal(&self, value: i64) -> String {
        match self.dialect.literals {
            LiteralStyle::Decimal => format!("{}.0", value),
            LiteralStyle::AsIs => value.to_string(),
        }
    }

    fn float_literal(&self, value: f64) -> String {
        if value.is_nan() {
            self.dialect.nan.clone()
        } else if value.is_infinite() {
            if value > 0.0 {
                self.dialect.infinity.clone()
            } else {
                format!("-{}", self.dialect.infinity)
            }
        } else {
            format_float(value)
        }
    }

    fn number(&self, n: &Number) -> String {
        match *n {
            Number::Integer(v) => self.integer_literal(v),
            Number::Rational(p, q) => {
                format!("{}/{}", self.integer_literal(p), self.integer_literal(q))
            }
            Number::Float(v) => self.float_literal(v),
        }
    }

    fn constant(&self, c: Constant) -> String {
        match c {
            Constant::Pi => self.dialect.pi.clone(),
            Constant::E => self.dialect.e.clone(),
            Constant::Infinity => self.dialect.infinity.clone(),
            Constant::NaN => self.dialect.nan.clone(),
        }
    }

    fn bool_literal(&self, value: bool) -> RenderResult<String> {
        match self.dialect.booleans {
            Some((t, f)) => Ok(if value { t } else { f }.to_string()),
            None => self.unsupported(NodeKind::Bool, "boolean literals have no equivalent"),
        }
    }

    fn derivative(&self, f: &Symbol, x: &Symbol) -> String {
        match self.dialect.language {
            Language::Sympy => format!("Derivative({}, {})", f, x),
            _ => derivative_name(f, x),
        }
    }

    fn add(&self, terms: &[Expr]) -> RenderResult<String> {
        if terms.is_empty() {
            return Ok(self.integer_literal(0));
        }
        let mut out = String::new();
        for (i, term) in terms.iter().enumerate() {
            let text = self.paren(term, ADD)?;
            if i == 0 {
                out.push_str(&text);
            } else if let Some(rest) = text.strip_prefix('-') {
                out.push_str(" - ");
                out.push_str(rest);
            } else {
                out.push_str(" + ");
                out.push_str(&text);
            }
        }
        Ok(out)
    }

    /// Products are split into numerator and denominator factors.
    ///
    /// Powers with a negative rational exponent and the denominator of a
    /// rational coefficient go below the line. A negative leading
    /// coefficient becomes a sign; `-1` disappears entirely.
    fn mul(&self, factors: &[Expr]) -> RenderResult<String> {
        let mut sign = "";
        let mut items: Vec<Expr> = factors.to_vec();
        if let Some(n) = items.first().and_then(Expr::as_number).copied() {
            if n.is_negative() {
                sign = "-";
                if n.is_minus_one() {
                    items.remove(0);
                } else {
                    items[0] = Expr::Number(n.negate());
                }
            }
        }

        let mut numerator: Vec<Expr> = Vec::new();
        let mut denominator: Vec<Expr> = Vec::new();
        for item in items {
            match item {
                Expr::Pow(base, exp) => match exp.as_number().copied() {
                    Some(n) if n.is_rational() && n.is_negative() => {
                        if n.is_minus_one() {
                            denominator.push(*base);
                        } else {
                            denominator.push((*base).pow(Expr::Number(n.negate())));
                        }
                    }
                    _ => numerator.push(Expr::Pow(base, exp)),
                },
                Expr::Number(Number::Rational(p, q)) => {
                    if p != 1 {
                        numerator.push(Expr::integer(p));
                    }
                    denominator.push(Expr::integer(q));
                }
                other => numerator.push(other),
            }
        }
        if numerator.is_empty() {
            numerator.push(Expr::integer(1));
        }

        let numerator_text = numerator
            .iter()
            .map(|f| self.paren(f, MUL))
            .collect::<RenderResult<Vec<_>>>()?
            .join("*");

        match denominator.len() {
            0 => Ok(format!("{}{}", sign, numerator_text)),
            1 => Ok(format!(
                "{}{}/{}",
                sign,
                numerator_text,
                self.paren_strict(&denominator[0], MUL)?
            )),
            _ => {
                let denominator_text = denominator
                    .iter()
                    .map(|f| self.paren(f, MUL))
                    .collect::<RenderResult<Vec<_>>>()?
                    .join("*");
                Ok(format!("{}{}/({})", sign, numerator_text, denominator_text))
            }
        }
    }

    fn power_factor(&self, base: &Expr) -> RenderResult<String> {
        if self.dialect.wrap_power_factors {
            Ok(format!("({})", self.print(base)?))
        } else {
            self.paren(base, MUL)
        }
    }

    fn pow(&self, base: &Expr, exp: &Expr) -> RenderResult<String> {
        let one = self.dialect.one();
        if self.dialect.expand_powers {
            if let Some(n) = exp.as_integer() {
                match n {
                    1 => return self.paren(base, POW),
                    -1 => return Ok(format!("{}/{}", one, self.paren(base, POW)?)),
                    2 | 3 | -2 | -3 => {
                        let factor = self.power_factor(base)?;
                        let product = vec![factor; n.unsigned_abs() as usize].join("*");
                        return Ok(if n > 0 {
                            product
                        } else {
                            format!("{}/({})", one, product)
                        });
                    }
                    _ => {}
                }
            }
            if let (Some(n), Some(sqrt)) = (exp.as_number(), &self.dialect.sqrt) {
                if n.is_half() {
                    return Ok(format!("{}({})", sqrt, self.print(base)?));
                }
                if n.is_minus_half() {
                    return Ok(format!("1/{}({})", sqrt, self.print(base)?));
                }
            }
        }
        match &self.dialect.power {
            PowerStyle::Call(name) => Ok(format!(
                "{}({}, {})",
                name,
                self.print(base)?,
                self.print(exp)?
            )),
            PowerStyle::Operator(op) => Ok(format!(
                "{}{}{}",
                self.paren_strict(base, POW)?,
                op,
                self.paren_strict(exp, POW)?
            )),
        }
    }

    fn function(&self, name: &str, args: &[Expr]) -> RenderResult<String> {
        let rendered = args
            .iter()
            .map(|a| self.print(a))
            .collect::<RenderResult<Vec<_>>>()?
            .join(", ");
        let prefix = self.dialect.prefix.as_str();

        match self.dialect.function_rule(name) {
            None => Ok(format!("{}({})", name, rendered)),
            Some(FunctionRule::Rename { target, qualified }) => Ok(format!(
                "{}{}({})",
                if *qualified { prefix } else { "" },
                target,
                rendered
            )),
            Some(FunctionRule::CopySign) => {
                if args.len() != 1 {
                    return Err(RenderError::Arity {
                        function: name.to_string(),
                        expected: 1,
                        got: args.len(),
                    });
                }
                Ok(format!(
                    "{}copysign({}, {})",
                    prefix,
                    self.dialect.one(),
                    rendered
                ))
            }
            Some(FunctionRule::Abs { real, integer }) => {
                let target = match args {
                    [arg] if arg.is_integer() => integer,
                    _ => real,
                };
                Ok(format!("{}{}({})", prefix, target, rendered))
            }
        }
    }

    /// Integer literals compared directly print without a decimal point.
    fn relational_operand(&self, expr: &Expr, wrap: bool) -> RenderResult<String> {
        if let Some(n) = expr.as_integer() {
            return Ok(n.to_string());
        }
        if wrap {
            self.paren_strict(expr, RELATIONAL)
        } else {
            self.print(expr)
        }
    }

    fn relational(&self, op: RelOp, lhs: &Expr, rhs: &Expr) -> RenderResult<String> {
        match &self.dialect.relational {
            RelationalStyle::Call(prefix) => Ok(format!(
                "{}{}({}, {})",
                prefix,
                op.call_name(),
                self.relational_operand(lhs, false)?,
                self.relational_operand(rhs, false)?
            )),
            RelationalStyle::Infix => {
                let token = if op == RelOp::Ne {
                    self.dialect.not_equal
                } else {
                    op.symbol()
                };
                Ok(format!(
                    "{} {} {}",
                    self.relational_operand(lhs, true)?,
                    token,
                    self.relational_operand(rhs, true)?
                ))
            }
        }
    }

    fn boolean(&self, op: BoolOp, operands: &[Expr]) -> RenderResult<String> {
        let kind = match op {
            BoolOp::And => NodeKind::And,
            BoolOp::Or => NodeKind::Or,
        };
        if let Some(max) = self.dialect.boolean_arity {
            if operands.len() > max {
                return self.unsupported(
                    kind,
                    format!("expected at most {} operands, got {}", max, operands.len()),
                );
            }
        }
        let (token, level) = match op {
            BoolOp::And => (self.dialect.and_token, AND),
            BoolOp::Or => (self.dialect.or_token, OR),
        };
        Ok(operands
            .iter()
            .map(|o| self.paren(o, level))
            .collect::<RenderResult<Vec<_>>>()?
            .join(&format!(" {} ", token)))
    }

    fn piecewise(&self, branches: &[(Expr, Expr)], otherwise: &Expr) -> RenderResult<String> {
        match &self.dialect.conditional {
            ConditionalStyle::Ternary => {
                let mut out = self.print(otherwise)?;
                for (value, condition) in branches.iter().rev() {
                    out = format!(
                        "({} ? {} : {})",
                        self.print(condition)?,
                        self.print(value)?,
                        out
                    );
                }
                Ok(out)
            }
            ConditionalStyle::InlineIf { wrapper } => {
                let mut out = self.paren(otherwise, LAMBDA)?;
                for (value, condition) in branches.iter().rev() {
                    let condition = match wrapper {
                        Some(call) => format!("{}({})", call, self.print(condition)?),
                        None => self.paren_strict(condition, LAMBDA)?,
                    };
                    out = format!(
                        "{} if {} else {}",
                        self.paren_strict(value, LAMBDA)?,
                        condition,
                        out
                    );
                }
                Ok(out)
            }
            ConditionalStyle::Call(name) => {
                let mut out = self.print(otherwise)?;
                for (value, condition) in branches.iter().rev() {
                    out = format!(
                        "{}({}, {}, {})",
                        name,
                        self.print(condition)?,
                        self.print(value)?,
                        out
                    );
                }
                Ok(out)
            }
            ConditionalStyle::Blend => {
                let mut out = self.print(otherwise)?;
                for (value, condition) in branches.iter().rev() {
                    let condition = self.print(condition)?;
                    out = format!(
                        "(({})*({}) + (1 - ({}))*({}))",
                        condition,
                        self.print(value)?,
                        condition,
                        out
                    );
                }
                Ok(out)
            }
            ConditionalStyle::Piecewise => {
                let mut parts = Vec::with_capacity(branches.len() + 1);
                for (value, condition) in branches {
                    parts.push(format!("({}, {})", self.print(value)?, self.print(condition)?));
                }
                parts.push(format!("({}, True)", self.print(otherwise)?));
                Ok(format!("Piecewise({})", parts.join(", ")))
            }
        }
    }
}

/// Render `expr` for the dialect called `dialect`.
pub fn render(expr: &Expr, dialect: &str, assign_to: Option<&str>) -> RenderResult<String> {
    Printer::for_dialect(dialect)?.render(expr, assign_to)
}

/// C99 source
pub fn ccode(expr: &Expr, assign_to: Option<&str>) -> RenderResult<String> {
    Printer::new(Dialect::c()).render(expr, assign_to)
}

/// C++ source with `std::` math functions
pub fn cppcode(expr: &Expr, assign_to: Option<&str>) -> RenderResult<String> {
    Printer::new(Dialect::cpp()).render(expr, assign_to)
}

/// Python source using `namespace` (`""`, `math`, `np`, `numpy`, `ufl`)
pub fn pythoncode(expr: &Expr, assign_to: Option<&str>, namespace: &str) -> RenderResult<String> {
    let namespace = Namespace::from_name(namespace)
        .ok_or_else(|| RenderError::UnknownDialect(namespace.to_string()))?;
    Printer::new(Dialect::python(namespace)).render(expr, assign_to)
}

/// MATLAB source
pub fn matlabcode(expr: &Expr, assign_to: Option<&str>) -> RenderResult<String> {
    Printer::new(Dialect::matlab()).render(expr, assign_to)
}

/// Octave source
pub fn octavecode(expr: &Expr, assign_to: Option<&str>) -> RenderResult<String> {
    Printer::new(Dialect::octave()).render(expr, assign_to)
}

/// Sympy's string form
pub fn sympycode(expr: &Expr) -> RenderResult<String> {
    Printer::new(Dialect::sympy()).print(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn step() -> Expr {
        Expr::piecewise(vec![
            (Expr::integer(1), x().lt(0)),
            (x().pow(2), Expr::Bool(true)),
        ])
        .unwrap()
    }

    #[test]
    fn test_piecewise_c() {
        assert_eq!(ccode(&step(), None).unwrap(), "(x < 0 ? 1.0 : (x)*(x))");
    }

    #[test]
    fn test_piecewise_python() {
        assert_eq!(
            pythoncode(&step(), None, "math").unwrap(),
            "1.0 if x < 0 else x*x"
        );
        assert_eq!(
            pythoncode(&step(), None, "np").unwrap(),
            "1.0 if np.all(x < 0) else x*x"
        );
        assert_eq!(
            pythoncode(&step(), None, "ufl").unwrap(),
            "ufl.conditional(ufl.lt(x, 0), 1.0, x*x)"
        );
    }

    #[test]
    fn test_piecewise_matlab_and_sympy() {
        assert_eq!(
            matlabcode(&step(), None).unwrap(),
            "((x < 0)*(1) + (1 - (x < 0))*(x*x))"
        );
        assert_eq!(
            sympycode(&step()).unwrap(),
            "Piecewise((1, x < 0), (x**2, True))"
        );
    }

    #[test]
    fn test_integer_literals() {
        assert_eq!(ccode(&Expr::integer(2), None).unwrap(), "2.0");
        assert_eq!(cppcode(&Expr::integer(2), None).unwrap(), "2.0");
        assert_eq!(pythoncode(&Expr::integer(2), None, "math").unwrap(), "2.0");
        assert_eq!(pythoncode(&Expr::integer(2), None, "").unwrap(), "2");
        assert_eq!(matlabcode(&Expr::integer(2), None).unwrap(), "2");
    }

    #[test]
    fn test_sqrt_everywhere() {
        let e = x().pow(Expr::float(0.5));
        assert_eq!(ccode(&e, None).unwrap(), "sqrt(x)");
        assert_eq!(cppcode(&e, None).unwrap(), "std::sqrt(x)");
        assert_eq!(pythoncode(&e, None, "math").unwrap(), "math.sqrt(x)");
        assert_eq!(pythoncode(&e, None, "np").unwrap(), "np.sqrt(x)");
        assert_eq!(pythoncode(&e, None, "ufl").unwrap(), "ufl.sqrt(x)");
        assert_eq!(pythoncode(&e, None, "").unwrap(), "sqrt(x)");
        assert_eq!(matlabcode(&e, None).unwrap(), "sqrt(x)");
    }

    #[test]
    fn test_parenthesization() {
        let (a, b, c) = (Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("c"));
        let sum_times = Expr::Mul(vec![a.clone() + b.clone(), c.clone()]);
        assert_eq!(ccode(&sum_times, None).unwrap(), "(a + b)*c");
        assert_eq!(ccode(&(a.clone() * b.clone() + c.clone()), None).unwrap(), "a*b + c");
        assert_eq!(ccode(&(a.clone() - b.clone()), None).unwrap(), "a - b");
        assert_eq!(
            ccode(&(a.clone() - (b.clone() + c.clone())), None).unwrap(),
            "a - (b + c)"
        );
    }

    #[test]
    fn test_mul_split() {
        let (a, b) = (Expr::symbol("a"), Expr::symbol("b"));
        assert_eq!(ccode(&(a.clone() / b.clone()), None).unwrap(), "a/b");
        assert_eq!(ccode(&(a.clone() / 2), None).unwrap(), "a/2.0");
        assert_eq!(ccode(&(-a.clone()), None).unwrap(), "-a");
        assert_eq!(ccode(&(-(a.clone() * 2)), None).unwrap(), "-2.0*a");
        assert_eq!(
            ccode(&Expr::Mul(vec![a.clone(), b.clone().pow(-2)]), None).unwrap(),
            "a/((b)*(b))"
        );
        assert_eq!(
            pythoncode(&(Expr::integer(1) / (a.clone() * b.clone())), None, "math").unwrap(),
            "1.0/(a*b)"
        );
        assert_eq!(
            pythoncode(
                &Expr::Mul(vec![Expr::symbol("c"), a.clone().pow(-1), b.clone().pow(-1)]),
                None,
                "math"
            )
            .unwrap(),
            "c/(a*b)"
        );
    }

    #[test]
    fn test_power_rules() {
        assert_eq!(ccode(&x().pow(-1), None).unwrap(), "1.0/x");
        assert_eq!(ccode(&x().pow(3), None).unwrap(), "(x)*(x)*(x)");
        assert_eq!(ccode(&x().pow(-2), None).unwrap(), "1.0/((x)*(x))");
        assert_eq!(ccode(&x().pow(Expr::float(-0.5)), None).unwrap(), "1/sqrt(x)");
        assert_eq!(ccode(&x().pow(4), None).unwrap(), "pow(x, 4.0)");
        assert_eq!(cppcode(&x().pow(4), None).unwrap(), "std::pow(x, 4.0)");
        assert_eq!(pythoncode(&x().pow(4), None, "math").unwrap(), "math.pow(x, 4.0)");
        assert_eq!(pythoncode(&x().pow(4), None, "ufl").unwrap(), "ufl.elem_pow(x, 4.0)");
        assert_eq!(pythoncode(&x().pow(-3), None, "np").unwrap(), "1.0/(x*x*x)");
        assert_eq!(matlabcode(&x().pow(4), None).unwrap(), "x^4");
        assert_eq!(
            pythoncode(&(x() + Expr::integer(1)).pow(2), None, "math").unwrap(),
            "(x + 1.0)*(x + 1.0)"
        );
        assert_eq!(sympycode(&x().pow(-1)).unwrap(), "x**(-1)");
    }

    #[test]
    fn test_functions() {
        let f = |name: &str| Expr::func(name, vec![x()]);
        assert_eq!(ccode(&f("sign"), None).unwrap(), "copysign(1.0, x)");
        assert_eq!(pythoncode(&f("sign"), None, "math").unwrap(), "math.copysign(1.0, x)");
        assert_eq!(pythoncode(&f("sign"), None, "ufl").unwrap(), "ufl.sign(x)");
        assert_eq!(pythoncode(&f("sign"), None, "").unwrap(), "sign(x)");
        assert_eq!(ccode(&f("Abs"), None).unwrap(), "fabs(x)");
        assert_eq!(
            cppcode(&Expr::func("Abs", vec![Expr::integer(-3)]), None).unwrap(),
            "std::abs(-3.0)"
        );
        assert_eq!(pythoncode(&f("Abs"), None, "math").unwrap(), "math.fabs(x)");
        assert_eq!(pythoncode(&f("Abs"), None, "np").unwrap(), "np.abs(x)");
        assert_eq!(pythoncode(&f("log"), None, "ufl").unwrap(), "ufl.ln(x)");
        assert_eq!(pythoncode(&f("ceiling"), None, "np").unwrap(), "np.ceil(x)");
        assert_eq!(matlabcode(&f("ceiling"), None).unwrap(), "ceil(x)");
        assert_eq!(
            pythoncode(&Expr::func("Max", vec![x(), Expr::integer(0)]), None, "math").unwrap(),
            "max(x, 0.0)"
        );
        assert_eq!(ccode(&f("myfunc"), None).unwrap(), "myfunc(x)");
    }

    #[test]
    fn test_constants() {
        let pi = Expr::Constant(Constant::Pi);
        assert_eq!(ccode(&pi, None).unwrap(), "M_PI");
        assert_eq!(pythoncode(&pi, None, "np").unwrap(), "np.pi");
        assert_eq!(matlabcode(&Expr::Constant(Constant::E), None).unwrap(), "exp(1)");
        assert_eq!(sympycode(&Expr::Constant(Constant::Infinity)).unwrap(), "oo");
    }

    #[test]
    fn test_booleans() {
        let y = Expr::symbol("y");
        let both = x().lt(1).and(y.clone().gt(2));
        assert_eq!(ccode(&both, None).unwrap(), "x < 1 && y > 2");
        assert_eq!(pythoncode(&both, None, "math").unwrap(), "x < 1 and y > 2");
        assert_eq!(matlabcode(&both, None).unwrap(), "x < 1 & y > 2");
        assert_eq!(
            pythoncode(&both, None, "ufl").unwrap(),
            "ufl.lt(x, 1) and ufl.gt(y, 2)"
        );

        let three = both.and(Expr::symbol("z").ge(0));
        let err = pythoncode(&three, None, "ufl").unwrap_err();
        assert!(matches!(
            err,
            RenderError::Unsupported {
                kind: NodeKind::And,
                ..
            }
        ));

        let err = pythoncode(&Expr::Bool(true), None, "ufl").unwrap_err();
        assert!(err.to_string().contains("Bool"));
    }

    #[test]
    fn test_relational_tokens() {
        let ne = x().not_equals(Expr::symbol("y"));
        assert_eq!(ccode(&ne, None).unwrap(), "x != y");
        assert_eq!(matlabcode(&ne, None).unwrap(), "x ~= y");
        assert_eq!(ccode(&x().le(Expr::float(1.5)), None).unwrap(), "x <= 1.5");
    }

    #[test]
    fn test_assignment() {
        assert_eq!(ccode(&x(), Some("y")).unwrap(), "y = x");
        assert_eq!(pythoncode(&x(), Some("y"), "math").unwrap(), "y = x");
        assert_eq!(render(&x(), "octave", Some("y")).unwrap(), "y = x");
        assert!(render(&x(), "cobol", None).is_err());
    }

    #[test]
    fn test_derivative_names() {
        let d = Expr::derivative(Symbol::new("V"), Symbol::new("t"));
        assert_eq!(ccode(&d, None).unwrap(), "dV_dt");
        assert_eq!(sympycode(&d).unwrap(), "Derivative(V, t)");
    }
}
