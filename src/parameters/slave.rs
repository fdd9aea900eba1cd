//! Parameters computed from other parameters

use serde::{Deserialize, Serialize};

use crate::config::FormatConfig;
use crate::eval::{eval_param_expr, EvalError, EvalOptions, EvalValue};
use crate::expr::{Expr, Symbol};
use crate::parameters::param::sealed::ParamAccess;
use crate::parameters::param::{Check, Param, ParamKind, Parameter, ParameterError, ReprOptions};
use crate::parameters::registry::SymbolRegistry;
use crate::parameters::scalar::ScalarParam;
use crate::parameters::value::Value;

/// A read-only parameter defined by an expression of other parameters
///
/// The value is never stored: every read evaluates the expression against
/// the current values in a [`SymbolRegistry`].
///
/// # Examples
///
/// ```
/// use modelparams_rs::parameters::{ScalarParam, SlaveParam, SymbolRegistry};
///
/// let mut registry = SymbolRegistry::new();
/// let p = registry.register(ScalarParam::new(2.0).unwrap().with_name("p").unwrap()).unwrap();
/// let q = registry.register(ScalarParam::new(3.0).unwrap().with_name("q").unwrap()).unwrap();
///
/// let s = SlaveParam::new(p + q);
/// assert_eq!(s.value(&registry).unwrap().as_f64(), Some(5.0));
///
/// registry.set_value("p", 10.0).unwrap();
/// assert_eq!(s.value(&registry).unwrap().as_f64(), Some(13.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaveParam {
    scalar: ScalarParam,
    expr: Expr,
}

impl SlaveParam {
    pub fn new(expr: impl Into<Expr>) -> Self {
        let param = Param::with_kind(ParamKind::SlaveParam, Value::Float(0.0), Check::None);
        Self {
            scalar: ScalarParam::from_param(param),
            expr: expr.into(),
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.scalar = self.scalar.with_unit(unit);
        self
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, ParameterError> {
        self.scalar = self.scalar.with_name(name)?;
        Ok(self)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.scalar = self.scalar.with_description(description);
        self
    }

    /// The defining expression
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn unit(&self) -> &str {
        self.scalar.unit()
    }

    pub fn sym(&self) -> Symbol {
        self.scalar.sym()
    }

    /// Always fails: a computed parameter cannot be assigned.
    pub fn set_value(&mut self, _value: impl Into<Value>) -> Result<(), ParameterError> {
        Err(ParameterError::ReadOnly {
            name: self.scalar.name().to_string(),
        })
    }

    /// Evaluate the expression with the current parameter values
    pub fn value(&self, registry: &SymbolRegistry) -> Result<EvalValue, EvalError> {
        eval_param_expr(&self.expr, registry, &EvalOptions::new().include_derivatives(true))
    }

    /// `"{value} - SlaveParam({expr})"`
    pub fn format_data(&self, registry: &SymbolRegistry, width: usize) -> Result<String, EvalError> {
        let value = Value::from(self.value(registry)?);
        Ok(format!(
            "{} - SlaveParam({})",
            value.format(&FormatConfig::default(), width),
            self.expr
        ))
    }

    pub fn copy_with(&self, options: ReprOptions) -> Self {
        Self {
            scalar: self.scalar.copy_with(options),
            expr: self.expr.clone(),
        }
    }
}

impl ParamAccess for SlaveParam {
    fn param_mut(&mut self) -> &mut Param {
        self.scalar.param_mut()
    }
}

impl Parameter for SlaveParam {
    fn param(&self) -> &Param {
        self.scalar.param()
    }

    fn repr_with(&self, options: ReprOptions) -> String {
        self.scalar
            .param()
            .repr_parts(&self.expr.to_string(), options, Some(self.scalar.unit()))
    }
}

impl From<&SlaveParam> for Expr {
    fn from(param: &SlaveParam) -> Self {
        Expr::Symbol(param.sym())
    }
}
