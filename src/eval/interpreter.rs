//! Interpreter for rendered `math`/`np` code
//!
//! The evaluator renders an expression with the printer, reads the text back
//! with the code-mode parser, and walks the resulting tree here. Walking the
//! printer's own output keeps evaluation faithful to what generated code
//! would compute.

use std::collections::HashMap;

use crate::eval::namespace::FunctionNamespace;
use crate::eval::{EvalError, EvalValue};
use crate::expr::parser::parse_code;
use crate::expr::{derivative_name, BoolOp, Expr};

/// Context for expression evaluation, providing variable values
pub trait EvaluationContext {
    /// Get the value of a variable
    fn get_variable(&self, name: &str) -> Option<&EvalValue>;

    /// Check if a variable exists
    fn has_variable(&self, name: &str) -> bool {
        self.get_variable(name).is_some()
    }
}

impl EvaluationContext for HashMap<String, EvalValue> {
    fn get_variable(&self, name: &str) -> Option<&EvalValue> {
        self.get(name)
    }
}

/// Tree walker over parsed code
pub struct Interpreter<'a, C: EvaluationContext> {
    context: &'a C,
    namespace: FunctionNamespace,
}

impl<'a, C: EvaluationContext> Interpreter<'a, C> {
    pub fn new(context: &'a C, namespace: FunctionNamespace) -> Self {
        Self { context, namespace }
    }

    /// Parse `code` as rendered source text and evaluate it.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use modelparams_rs::eval::{EvalValue, FunctionNamespace, Interpreter};
    ///
    /// let mut values = HashMap::new();
    /// values.insert("x".to_string(), EvalValue::Scalar(-2.0));
    ///
    /// let interpreter = Interpreter::new(&values, FunctionNamespace::Math);
    /// let v = interpreter.evaluate_code("1.0 if x < 0 else math.sqrt(x)").unwrap();
    /// assert_eq!(v, EvalValue::Scalar(1.0));
    /// ```
    pub fn evaluate_code(&self, code: &str) -> Result<EvalValue, EvalError> {
        let expr = parse_code(code)?;
        self.evaluate(&expr)
    }

    pub fn evaluate(&self, expr: &Expr) -> Result<EvalValue, EvalError> {
        match expr {
            Expr::Number(n) => Ok(EvalValue::Scalar(n.to_f64())),
            Expr::Constant(c) => Ok(EvalValue::Scalar(c.value())),
            Expr::Bool(b) => Ok(EvalValue::Bool(*b)),
            Expr::Symbol(s) => self.variable(s.name()),
            Expr::Derivative(f, x) => self.variable(&derivative_name(f, x)),
            Expr::Add(terms) => self.fold(terms, |a, b| a + b),
            Expr::Mul(factors) => self.fold(factors, |a, b| a * b),
            Expr::Pow(base, exponent) => {
                let base = self.evaluate(base)?;
                let exponent = self.evaluate(exponent)?;
                power(&base, &exponent)
            }
            Expr::Function(name, args) => {
                // Evaluate all arguments
                let args = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.namespace.call(name, &args)
            }
            Expr::Relational(op, lhs, rhs) => {
                let lhs = self.evaluate(lhs)?;
                let rhs = self.evaluate(rhs)?;
                lhs.compare(&rhs, *op)
            }
            Expr::Piecewise {
                branches,
                otherwise,
            } => {
                for (value, condition) in branches {
                    if self.evaluate(condition)?.truth()? {
                        return self.evaluate(value);
                    }
                }
                self.evaluate(otherwise)
            }
            Expr::Boolean(op, operands) => {
                // Short-circuit like `and`/`or`
                let stop_at = *op == BoolOp::Or;
                for operand in operands {
                    if self.evaluate(operand)?.truth()? == stop_at {
                        return Ok(EvalValue::Bool(stop_at));
                    }
                }
                Ok(EvalValue::Bool(!stop_at))
            }
        }
    }

    fn variable(&self, name: &str) -> Result<EvalValue, EvalError> {
        if let Some(value) = self.context.get_variable(name) {
            return Ok(value.clone());
        }
        match self.namespace.constant(name) {
            Some(value) => Ok(EvalValue::Scalar(value)),
            None => Err(EvalError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    fn fold(&self, items: &[Expr], f: impl Fn(f64, f64) -> f64 + Copy) -> Result<EvalValue, EvalError> {
        let mut iter = items.iter();
        let mut acc = match iter.next() {
            Some(first) => self.evaluate(first)?,
            None => return Err(EvalError::InvalidArgument {
                function: "operator".to_string(),
                message: "no operands".to_string(),
            }),
        };
        for item in iter {
            acc = acc.zip_with(&self.evaluate(item)?, f)?;
        }
        Ok(acc)
    }
}

/// `base ** exponent`; a zero scalar base with a negative exponent is a
/// division by zero.
fn power(base: &EvalValue, exponent: &EvalValue) -> Result<EvalValue, EvalError> {
    if let (Some(b), Some(e)) = (base.as_f64(), exponent.as_f64()) {
        if b == 0.0 && e < 0.0 {
            return Err(EvalError::DivisionByZero);
        }
    }
    base.zip_with(exponent, f64::powf)
}
