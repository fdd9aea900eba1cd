//! Values produced while evaluating rendered expressions

use ndarray::Array1;
use std::fmt;

use crate::eval::EvalError;
use crate::expr::RelOp;
use crate::parameters::value::Value;

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum EvalValue {
    Scalar(f64),
    Array(Array1<f64>),
    Bool(bool),
    /// Elementwise comparison of arrays
    Mask(Array1<bool>),
}

impl EvalValue {
    /// Scalar view; bools count as 0 and 1
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            EvalValue::Scalar(v) => Some(v),
            EvalValue::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array1<f64>> {
        match self {
            EvalValue::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Length of an array or mask value
    pub fn len(&self) -> Option<usize> {
        match self {
            EvalValue::Array(values) => Some(values.len()),
            EvalValue::Mask(values) => Some(values.len()),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        self.len().is_some()
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            EvalValue::Scalar(_) => "float",
            EvalValue::Array(_) => "array",
            EvalValue::Bool(_) => "bool",
            EvalValue::Mask(_) => "bool array",
        }
    }

    fn operand(&self) -> Operand {
        match self {
            EvalValue::Scalar(v) => Operand::Scalar(*v),
            EvalValue::Bool(b) => Operand::Scalar(if *b { 1.0 } else { 0.0 }),
            EvalValue::Array(values) => Operand::Array(values.clone()),
            EvalValue::Mask(values) => Operand::Array(values.mapv(|b| if b { 1.0 } else { 0.0 })),
        }
    }

    /// Apply `f` to every element
    pub(crate) fn map(&self, f: impl Fn(f64) -> f64) -> EvalValue {
        match self.operand() {
            Operand::Scalar(v) => EvalValue::Scalar(f(v)),
            Operand::Array(values) => EvalValue::Array(values.mapv(f)),
        }
    }

    /// Elementwise combination, broadcasting scalars against arrays
    pub(crate) fn zip_with(
        &self,
        other: &EvalValue,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<EvalValue, EvalError> {
        match (self.operand(), other.operand()) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Ok(EvalValue::Scalar(f(a, b))),
            (Operand::Array(a), Operand::Scalar(b)) => Ok(EvalValue::Array(a.mapv(|x| f(x, b)))),
            (Operand::Scalar(a), Operand::Array(b)) => Ok(EvalValue::Array(b.mapv(|x| f(a, x)))),
            (Operand::Array(a), Operand::Array(b)) => {
                if a.len() != b.len() {
                    return Err(EvalError::ShapeMismatch {
                        lhs: a.len(),
                        rhs: b.len(),
                    });
                }
                Ok(EvalValue::Array(
                    a.iter().zip(b.iter()).map(|(x, y)| f(*x, *y)).collect(),
                ))
            }
        }
    }

    /// Scalar operands give a bool, array operands an elementwise mask
    pub(crate) fn compare(&self, other: &EvalValue, op: RelOp) -> Result<EvalValue, EvalError> {
        match (self.operand(), other.operand()) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Ok(EvalValue::Bool(op.compare(a, b))),
            (Operand::Array(a), Operand::Scalar(b)) => {
                Ok(EvalValue::Mask(a.mapv(|x| op.compare(x, b))))
            }
            (Operand::Scalar(a), Operand::Array(b)) => {
                Ok(EvalValue::Mask(b.mapv(|x| op.compare(a, x))))
            }
            (Operand::Array(a), Operand::Array(b)) => {
                if a.len() != b.len() {
                    return Err(EvalError::ShapeMismatch {
                        lhs: a.len(),
                        rhs: b.len(),
                    });
                }
                Ok(EvalValue::Mask(
                    a.iter().zip(b.iter()).map(|(x, y)| op.compare(*x, *y)).collect(),
                ))
            }
        }
    }

    /// Truth value of a condition; arrays of more than one element have none.
    pub(crate) fn truth(&self) -> Result<bool, EvalError> {
        match self {
            EvalValue::Bool(b) => Ok(*b),
            EvalValue::Scalar(v) => Ok(*v != 0.0),
            EvalValue::Array(values) if values.len() == 1 => Ok(values[0] != 0.0),
            EvalValue::Mask(values) if values.len() == 1 => Ok(values[0]),
            _ => Err(EvalError::AmbiguousTruth),
        }
    }

    /// Whether every element is true
    pub(crate) fn all(&self) -> bool {
        match self {
            EvalValue::Bool(b) => *b,
            EvalValue::Scalar(v) => *v != 0.0,
            EvalValue::Array(values) => values.iter().all(|v| *v != 0.0),
            EvalValue::Mask(values) => values.iter().all(|b| *b),
        }
    }

    pub(crate) fn has_nan(&self) -> bool {
        match self {
            EvalValue::Scalar(v) => v.is_nan(),
            EvalValue::Array(values) => values.iter().any(|v| v.is_nan()),
            _ => false,
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        match self {
            EvalValue::Scalar(v) => v.is_finite(),
            EvalValue::Array(values) => values.iter().all(|v| v.is_finite()),
            _ => true,
        }
    }
}

enum Operand {
    Scalar(f64),
    Array(Array1<f64>),
}

impl fmt::Display for EvalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalValue::Scalar(v) => write!(f, "{}", v),
            EvalValue::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            EvalValue::Array(values) => write!(f, "{}", values),
            EvalValue::Mask(values) => write!(f, "{}", values),
        }
    }
}

impl From<f64> for EvalValue {
    fn from(value: f64) -> Self {
        EvalValue::Scalar(value)
    }
}

impl From<Array1<f64>> for EvalValue {
    fn from(values: Array1<f64>) -> Self {
        EvalValue::Array(values)
    }
}

impl From<bool> for EvalValue {
    fn from(value: bool) -> Self {
        EvalValue::Bool(value)
    }
}

impl From<EvalValue> for Value {
    fn from(value: EvalValue) -> Self {
        match value {
            EvalValue::Scalar(v) => Value::Float(v),
            EvalValue::Bool(b) => Value::Bool(b),
            EvalValue::Array(values) => Value::Array(values),
            EvalValue::Mask(values) => Value::Array(values.mapv(|b| if b { 1.0 } else { 0.0 })),
        }
    }
}

impl TryFrom<&Value> for EvalValue {
    type Error = String;

    /// Numeric parameter values enter the evaluation namespace as floats.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(b) => Ok(EvalValue::Bool(*b)),
            Value::Int(i) => Ok(EvalValue::Scalar(*i as f64)),
            Value::Float(v) => Ok(EvalValue::Scalar(*v)),
            Value::Array(values) => Ok(EvalValue::Array(values.clone())),
            Value::Str(_) => Err(value.value_type().to_string()),
        }
    }
}
