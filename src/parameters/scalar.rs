//! Scalar parameters with a range, a unit and a symbol

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::expr::{Expr, Symbol};
use crate::parameters::param::sealed::ParamAccess;
use crate::parameters::param::{Check, Param, ParamKind, Parameter, ParameterError, ReprOptions};
use crate::parameters::range::Range;
use crate::parameters::value::Value;
use crate::units::{Unit, UnitError};

fn dimensionless() -> String {
    "1".to_string()
}

/// A numeric parameter checked against a [`Range`] and carrying a unit
///
/// Once named, the parameter is represented in expressions by a symbol of
/// the same name; see [`ScalarParam::sym`].
///
/// # Examples
///
/// ```
/// use modelparams_rs::parameters::{Range, ScalarParam};
///
/// let mut param = ScalarParam::new(5)
///     .unwrap()
///     .with_range(Range::new().ge(0.0).lt(10.0))
///     .unwrap();
///
/// let err = param.set_value(56).unwrap_err();
/// assert_eq!(err.to_string(), "Illegal value: 56 ∉ [0, 10)");
///
/// param.set_value(6.3).unwrap();
/// assert_eq!(param.value_f64(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarParam {
    param: Param,
    #[serde(default = "dimensionless")]
    unit: String,
}

impl ScalarParam {
    /// Create an unnamed, unbounded, dimensionless scalar parameter.
    ///
    /// # Errors
    ///
    /// [`ParameterError::NotNumeric`] unless `value` is an int or a float.
    pub fn new(value: impl Into<Value>) -> std::result::Result<Self, ParameterError> {
        let value = value.into();
        if !value.value_type().is_numeric() {
            return Err(ParameterError::NotNumeric {
                kind: ParamKind::ScalarParam,
                got: value.value_type(),
            });
        }
        Ok(Self::from_param(Param::with_kind(
            ParamKind::ScalarParam,
            value,
            Check::None,
        )))
    }

    pub(crate) fn from_param(param: Param) -> Self {
        Self {
            param,
            unit: dimensionless(),
        }
    }

    /// Restrict the value to `range`; the current value must lie in it.
    pub fn with_range(mut self, range: Range) -> std::result::Result<Self, ParameterError> {
        range.validate()?;
        self.param.set_check(Check::Range(range));
        self.param.check(self.param.value().clone())?;
        Ok(self)
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> std::result::Result<Self, ParameterError> {
        self.param.set_name(name)?;
        Ok(self)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.param = self.param.with_description(description);
        self
    }

    pub fn range(&self) -> Range {
        match self.param.constraint() {
            Check::Range(range) => *range,
            _ => Range::new(),
        }
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Symbol standing for this parameter, a dummy while unnamed
    pub fn sym(&self) -> Symbol {
        if self.param.name().is_empty() {
            Symbol::dummy()
        } else {
            Symbol::new(self.param.name())
        }
    }

    /// [`ScalarParam::sym`] as an expression
    pub fn expr(&self) -> Expr {
        Expr::Symbol(self.sym())
    }

    pub fn value(&self) -> &Value {
        self.param.value()
    }

    pub fn value_f64(&self) -> f64 {
        self.param.value().as_f64().unwrap_or(f64::NAN)
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> std::result::Result<(), ParameterError> {
        self.param.set_value(value)
    }

    /// Take the value of `other`, converted into this parameter's unit.
    ///
    /// A dimensionless side is assumed to share the other side's unit.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelparams_rs::parameters::ScalarParam;
    ///
    /// let mut t = ScalarParam::new(1.0).unwrap().with_unit("ms");
    /// t.update(&ScalarParam::new(2.0).unwrap().with_unit("s")).unwrap();
    /// assert!((t.value_f64() - 2000.0).abs() < 1e-9);
    /// ```
    pub fn update(&mut self, other: &ScalarParam) -> Result<()> {
        debug!("Update parameter {}", self.param.name());
        let mut self_unit = Unit::parse(&self.unit)?;
        let mut other_unit = Unit::parse(&other.unit)?;
        if other_unit.is_dimensionless() {
            other_unit = self_unit.clone();
        }
        if self_unit.is_dimensionless() {
            self_unit = other_unit.clone();
        }
        let factor = other_unit.conversion_factor_to(&self_unit)?;
        if factor == 1.0 {
            self.set_value(other.value().clone())?;
        } else {
            self.set_value(other.value_f64() * factor)?;
        }
        Ok(())
    }

    /// New unnamed parameter holding this value expressed in `unit`
    pub fn convert_to(&self, unit: &str) -> std::result::Result<ScalarParam, UnitError> {
        let factor = Unit::parse(&self.unit)?.conversion_factor_to(&Unit::parse(unit)?)?;
        let param = Param::with_kind(
            ParamKind::ScalarParam,
            Value::Float(self.value_f64() * factor),
            Check::None,
        );
        Ok(Self::from_param(param).with_unit(unit))
    }

    pub fn format_data(&self, value: Option<&Value>, not_in: bool, width: usize) -> String {
        self.param.format_data(value, not_in, width)
    }

    /// Copy, dropping the arguments `options` excludes
    pub fn copy_with(&self, options: ReprOptions) -> Self {
        Self {
            param: self.param.copy_with(options),
            unit: if options.unit {
                self.unit.clone()
            } else {
                dimensionless()
            },
        }
    }
}

impl ParamAccess for ScalarParam {
    fn param_mut(&mut self) -> &mut Param {
        &mut self.param
    }
}

impl Parameter for ScalarParam {
    fn param(&self) -> &Param {
        &self.param
    }

    fn repr_with(&self, options: ReprOptions) -> String {
        self.param
            .repr_parts(&self.param.value().repr_literal(), options, Some(&self.unit))
    }
}

impl fmt::Display for ScalarParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.param, f)
    }
}

impl From<&ScalarParam> for Expr {
    fn from(param: &ScalarParam) -> Self {
        param.expr()
    }
}
