//! Fixed-length array parameters

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parameters::param::sealed::ParamAccess;
use crate::parameters::param::{Check, Param, ParamKind, Parameter, ParameterError, ReprOptions};
use crate::parameters::range::Range;
use crate::parameters::scalar::ScalarParam;
use crate::parameters::value::{Value, ValueType};

/// An assignment to an [`ArrayParam`]
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayAssign {
    /// Replace every element; the length must match
    Whole(Array1<f64>),
    /// Set every element to the same value
    Broadcast(f64),
    /// Set a single element
    Point(usize, f64),
}

impl From<Array1<f64>> for ArrayAssign {
    fn from(values: Array1<f64>) -> Self {
        ArrayAssign::Whole(values)
    }
}

impl From<Vec<f64>> for ArrayAssign {
    fn from(values: Vec<f64>) -> Self {
        ArrayAssign::Whole(Array1::from(values))
    }
}

impl From<f64> for ArrayAssign {
    fn from(value: f64) -> Self {
        ArrayAssign::Broadcast(value)
    }
}

impl From<(usize, f64)> for ArrayAssign {
    fn from((index, value): (usize, f64)) -> Self {
        ArrayAssign::Point(index, value)
    }
}

/// A range checked parameter holding a one-dimensional float array
///
/// # Examples
///
/// ```
/// use modelparams_rs::parameters::ArrayParam;
///
/// let mut param = ArrayParam::with_size(0.0, 3).unwrap();
/// param.set_value(2.0).unwrap();
/// param.set_value((1, 5.0)).unwrap();
/// assert_eq!(param.values().to_vec(), vec![2.0, 5.0, 2.0]);
///
/// assert!(param.set_value(vec![1.0, 2.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ArrayData")]
pub struct ArrayParam {
    scalar: ScalarParam,
}

#[derive(Deserialize)]
struct ArrayData {
    scalar: ScalarParam,
}

impl TryFrom<ArrayData> for ArrayParam {
    type Error = ParameterError;

    fn try_from(data: ArrayData) -> Result<Self, Self::Error> {
        let param = data.scalar.param();
        if param.value_type() != ValueType::Array || param.value().as_array().is_none() {
            return Err(ParameterError::TypeMismatch {
                expected: ValueType::Array.to_string(),
                name: param.name().to_string(),
            });
        }
        Ok(Self {
            scalar: data.scalar,
        })
    }
}

impl ArrayParam {
    pub fn new(values: Vec<f64>) -> Result<Self, ParameterError> {
        Self::from_array(Array1::from(values))
    }

    pub fn from_array(values: Array1<f64>) -> Result<Self, ParameterError> {
        if values.is_empty() {
            return Err(ParameterError::EmptyArray);
        }
        Ok(Self::from_nonempty(values))
    }

    /// `size` copies of `value`
    pub fn with_size(value: f64, size: usize) -> Result<Self, ParameterError> {
        Self::from_array(Array1::from_elem(size, value))
    }

    pub(crate) fn from_nonempty(values: Array1<f64>) -> Self {
        let param = Param::with_kind(ParamKind::ArrayParam, Value::Array(values), Check::None);
        Self {
            scalar: ScalarParam::from_param(param),
        }
    }

    /// Restrict every element to `range`
    pub fn with_range(mut self, range: Range) -> Result<Self, ParameterError> {
        range.validate()?;
        let param = self.scalar.param_mut();
        param.set_check(Check::Range(range));
        param.check(param.value().clone())?;
        Ok(self)
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

    pub fn values(&self) -> &Array1<f64> {
        match self.scalar.value() {
            Value::Array(values) => values,
            _ => unreachable!("an ArrayParam always stores an array"),
        }
    }

    fn values_mut(&mut self) -> &mut Array1<f64> {
        match self.scalar.param_mut().value_mut() {
            Value::Array(values) => values,
            _ => unreachable!("an ArrayParam always stores an array"),
        }
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values().get(index).copied()
    }

    pub fn scalar(&self) -> &ScalarParam {
        &self.scalar
    }

    pub fn range(&self) -> Range {
        self.scalar.range()
    }

    pub fn unit(&self) -> &str {
        self.scalar.unit()
    }

    pub fn sym(&self) -> crate::expr::Symbol {
        self.scalar.sym()
    }

    pub fn expr(&self) -> crate::expr::Expr {
        self.scalar.expr()
    }

    /// Assign the whole array, broadcast a scalar, or set one element.
    ///
    /// Every assigned value goes through the range check; on failure the
    /// array is left unchanged.
    pub fn set_value(&mut self, assign: impl Into<ArrayAssign>) -> Result<(), ParameterError> {
        match assign.into() {
            ArrayAssign::Whole(values) => {
                if values.len() != self.len() {
                    return Err(ParameterError::SizeMismatch {
                        expected: self.len(),
                        got: values.len(),
                    });
                }
                let checked = self.scalar.param().check(Value::Array(values))?;
                self.scalar.param_mut().set_value_unchecked(checked);
            }
            ArrayAssign::Broadcast(value) => {
                let value = self.check_element(value)?;
                self.values_mut().fill(value);
            }
            ArrayAssign::Point(index, value) => {
                let size = self.len();
                if index >= size {
                    return Err(ParameterError::IndexOutOfBounds { index, size });
                }
                let value = self.check_element(value)?;
                self.values_mut()[index] = value;
            }
        }
        Ok(())
    }

    fn check_element(&self, value: f64) -> Result<f64, ParameterError> {
        self.scalar.param().check_element(value)
    }

    /// Change the length, repeating the current elements cyclically
    pub fn resize(&mut self, size: usize) -> Result<(), ParameterError> {
        if size == 0 {
            return Err(ParameterError::EmptyArray);
        }
        let old = self.values().clone();
        if old.len() != size {
            let resized = Array1::from_shape_fn(size, |i| old[i % old.len()]);
            self.scalar
                .param_mut()
                .set_value_unchecked(Value::Array(resized));
        }
        Ok(())
    }

    pub fn format_data(&self, value: Option<&Value>, not_in: bool, width: usize) -> String {
        self.scalar.format_data(value, not_in, width)
    }

    pub fn copy_with(&self, options: ReprOptions) -> Self {
        Self {
            scalar: self.scalar.copy_with(options),
        }
    }
}

impl ParamAccess for ArrayParam {
    fn param_mut(&mut self) -> &mut Param {
        self.scalar.param_mut()
    }
}

impl Parameter for ArrayParam {
    fn param(&self) -> &Param {
        self.scalar.param()
    }

    fn repr_with(&self, options: ReprOptions) -> String {
        self.scalar.repr_with(options)
    }
}

impl fmt::Display for ArrayParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.scalar, f)
    }
}

impl From<&ArrayParam> for crate::expr::Expr {
    fn from(param: &ArrayParam) -> Self {
        param.expr()
    }
}
