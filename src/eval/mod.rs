//! # Dependency Evaluator
//!
//! Computes the value of an expression over registered parameters, which is
//! how a [`SlaveParam`](crate::parameters::SlaveParam) produces its value.
//!
//! Evaluation runs in five steps:
//!
//! 1. Collect the symbol names of the expression, optionally including the
//!    `d{f}_d{x}` names of derivative placeholders
//! 2. Resolve every name, first from [`EvalOptions`] values, then from the
//!    [`SymbolRegistry`]; registered slaves are evaluated recursively
//! 3. Require all array values to share one length, and pick the `np`
//!    namespace if any value is an array, else the `math` namespace
//! 4. Render the expression with the printer for that namespace
//! 5. Parse the rendered text back and interpret it
//!
//! Nothing is cached: every call sees the current parameter values.

pub mod interpreter;
pub mod namespace;
pub mod value;

pub use interpreter::{EvaluationContext, Interpreter};
pub use namespace::FunctionNamespace;
pub use value::EvalValue;

use log::debug;
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

use crate::error::ErrorKind;
use crate::expr::{Expr, ExprError};
use crate::parameters::registry::{RegisteredParam, SymbolRegistry};
use crate::printer::{Printer, RenderError};

/// Errors raised while evaluating expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Expr(#[from] ExprError),

    #[error("No parameter with name '{name}' registered. Remember to declare Params which should be used in expression with names.")]
    UnknownSymbol { name: String },

    #[error("parameter '{name}' has a non-numeric value of type '{got}'")]
    NonNumeric { name: String, got: String },

    #[error("expected all ArrayParams in an expression to be of equal size.")]
    SizeMismatch { sizes: Vec<usize> },

    #[error("operands could not be broadcast together with shapes ({lhs},) ({rhs},)")]
    ShapeMismatch { lhs: usize, rhs: usize },

    #[error("circular dependency through parameter '{name}'")]
    CircularDependency { name: String },

    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("Undefined function: {name}")]
    UndefinedFunction { name: String },

    #[error("{function}() takes {expected} argument(s), got {got}")]
    Arity {
        function: String,
        expected: usize,
        got: usize,
    },

    #[error("{function}(): {message}")]
    InvalidArgument { function: String, message: String },

    #[error("float division by zero")]
    DivisionByZero,

    #[error("The truth value of an array with more than one element is ambiguous. Use a.any() or a.all()")]
    AmbiguousTruth,
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::NonNumeric { .. } | EvalError::Arity { .. } => ErrorKind::TypeError,
            _ => ErrorKind::ValueError,
        }
    }
}

/// Options for [`eval_param_expr`]
///
/// # Examples
///
/// ```
/// use modelparams_rs::eval::{eval_param_expr, EvalOptions, EvalValue};
/// use modelparams_rs::expr::Expr;
/// use modelparams_rs::parameters::SymbolRegistry;
///
/// let registry = SymbolRegistry::new();
/// let options = EvalOptions::new().with_value("x", 4.0);
///
/// let v = eval_param_expr(&Expr::symbol("x").sqrt(), &registry, &options).unwrap();
/// assert_eq!(v, EvalValue::Scalar(2.0));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalOptions {
    /// Resolve derivative placeholders by their `d{f}_d{x}` names
    pub include_derivatives: bool,
    /// Values taking priority over registered parameters
    pub values: HashMap<String, EvalValue>,
}

impl EvalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_derivatives(mut self, include: bool) -> Self {
        self.include_derivatives = include;
        self
    }

    pub fn with_value(mut self, name: &str, value: impl Into<EvalValue>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }
}

/// Evaluate `expr` with the current values of the parameters it references.
///
/// # Arguments
///
/// * `expr` - Expression over named parameters
/// * `registry` - Parameters the expression's symbols resolve to
/// * `options` - Derivative handling and overriding values
///
/// # Returns
///
/// A scalar, array or boolean value, or an [`EvalError`] when a symbol is
/// unknown, array lengths differ, or the rendered code fails to evaluate.
///
/// # Examples
///
/// ```
/// use modelparams_rs::eval::{eval_param_expr, EvalOptions};
/// use modelparams_rs::parameters::{ArrayParam, ScalarParam, SymbolRegistry};
///
/// let mut registry = SymbolRegistry::new();
/// let v = registry.register(ArrayParam::new(vec![1.0, 2.0]).unwrap().with_name("v").unwrap()).unwrap();
/// let k = registry.register(ScalarParam::new(3.0).unwrap().with_name("k").unwrap()).unwrap();
///
/// let value = eval_param_expr(&(k * v), &registry, &EvalOptions::new()).unwrap();
/// assert_eq!(value.as_array().unwrap().to_vec(), vec![3.0, 6.0]);
/// ```
pub fn eval_param_expr(
    expr: &Expr,
    registry: &SymbolRegistry,
    options: &EvalOptions,
) -> Result<EvalValue, EvalError> {
    let mut visiting = Vec::new();
    evaluate(expr, registry, options, &mut visiting)
}

fn evaluate(
    expr: &Expr,
    registry: &SymbolRegistry,
    options: &EvalOptions,
    visiting: &mut Vec<String>,
) -> Result<EvalValue, EvalError> {
    let names = expr.symbol_names(options.include_derivatives);
    let mut values = HashMap::with_capacity(names.len());
    for name in names {
        let value = resolve(&name, registry, options, visiting)?;
        values.insert(name, value);
    }

    let sizes: BTreeSet<usize> = values.values().filter_map(EvalValue::len).collect();
    if sizes.len() > 1 {
        return Err(EvalError::SizeMismatch {
            sizes: sizes.into_iter().collect(),
        });
    }

    let namespace = FunctionNamespace::for_values(values.values());
    let code = Printer::for_dialect(namespace.dialect())?.render(expr, None)?;
    debug!("evaluating '{}' in the {} namespace", code, namespace.dialect());

    Interpreter::new(&values, namespace).evaluate_code(&code)
}

fn resolve(
    name: &str,
    registry: &SymbolRegistry,
    options: &EvalOptions,
    visiting: &mut Vec<String>,
) -> Result<EvalValue, EvalError> {
    if let Some(value) = options.values.get(name) {
        return Ok(value.clone());
    }
    match registry.get(name) {
        Some(RegisteredParam::Scalar(param)) => {
            EvalValue::try_from(param.value()).map_err(|got| EvalError::NonNumeric {
                name: name.to_string(),
                got,
            })
        }
        Some(RegisteredParam::Array(param)) => Ok(EvalValue::Array(param.values().clone())),
        Some(RegisteredParam::Slave(param)) => {
            if visiting.iter().any(|n| n == name) {
                return Err(EvalError::CircularDependency {
                    name: name.to_string(),
                });
            }
            visiting.push(name.to_string());
            let value = evaluate(param.expr(), registry, options, visiting);
            visiting.pop();
            value
        }
        None => Err(EvalError::UnknownSymbol {
            name: name.to_string(),
        }),
    }
}
