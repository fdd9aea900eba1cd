//! Unit-aware arithmetic between parameters and plain numbers
//!
//! `+` and `-` convert the right operand into the left operand's unit and
//! fail for incompatible dimensions, except that a dimensionless side takes
//! the other side's unit. `*` and `/` combine units, and powers require a
//! dimensionless exponent. Results are new unnamed parameters holding floats.

use log::warn;
use ndarray::Array1;
use std::ops::{Add, Div, Mul, Sub};

use crate::expr::RelOp;
use crate::parameters::{ArrayParam, Param, ParamKind, ScalarParam};
use crate::parameters::param::Check;
use crate::parameters::value::Value;
use crate::units::{Unit, UnitError};

/// Numeric part of a quantity
#[derive(Debug, Clone, PartialEq)]
pub enum Magnitude {
    Scalar(f64),
    Array(Array1<f64>),
}

impl Magnitude {
    fn len(&self) -> Option<usize> {
        match self {
            Magnitude::Scalar(_) => None,
            Magnitude::Array(values) => Some(values.len()),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Magnitude {
        match self {
            Magnitude::Scalar(v) => Magnitude::Scalar(f(v)),
            Magnitude::Array(values) => Magnitude::Array(values.mapv(f)),
        }
    }

    /// Elementwise combination, broadcasting scalars
    fn zip_with(self, other: Magnitude, f: impl Fn(f64, f64) -> f64) -> Result<Magnitude, UnitError> {
        match (self, other) {
            (Magnitude::Scalar(a), Magnitude::Scalar(b)) => Ok(Magnitude::Scalar(f(a, b))),
            (Magnitude::Array(a), Magnitude::Scalar(b)) => Ok(Magnitude::Array(a.mapv(|x| f(x, b)))),
            (Magnitude::Scalar(a), Magnitude::Array(b)) => Ok(Magnitude::Array(b.mapv(|x| f(a, x)))),
            (Magnitude::Array(a), Magnitude::Array(b)) => {
                if a.len() != b.len() {
                    return Err(UnitError::SizeMismatch {
                        lhs: a.len(),
                        rhs: b.len(),
                    });
                }
                Ok(Magnitude::Array(
                    a.iter().zip(b.iter()).map(|(x, y)| f(*x, *y)).collect(),
                ))
            }
        }
    }
}

/// A magnitude together with its unit
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    pub magnitude: Magnitude,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(magnitude: Magnitude, unit: Unit) -> Self {
        Self { magnitude, unit }
    }

    /// Convert into `target`
    pub fn to_unit(&self, target: &Unit) -> Result<Quantity, UnitError> {
        let factor = self.unit.conversion_factor_to(target)?;
        Ok(Quantity::new(
            self.magnitude.clone().map(|v| v * factor),
            target.clone(),
        ))
    }

    /// Bring `other` into a unit shared with `self` for `+`, `-` or a comparison
    fn align(self, other: Quantity, op: &str) -> Result<(Quantity, Quantity), UnitError> {
        if self.unit == other.unit {
            return Ok((self, other));
        }
        warn!(
            "Units does not match when computing {} {} {}",
            self.unit, op, other.unit
        );
        if self.unit.is_dimensionless() {
            let unit = other.unit.clone();
            return Ok((Quantity::new(self.magnitude, unit), other));
        }
        if other.unit.is_dimensionless() {
            let unit = self.unit.clone();
            return Ok((self, Quantity::new(other.magnitude, unit)));
        }
        let other = other.to_unit(&self.unit)?;
        Ok((self, other))
    }

    pub fn try_add(self, other: Quantity) -> Result<Quantity, UnitError> {
        let (lhs, rhs) = self.align(other, "+")?;
        let magnitude = lhs.magnitude.zip_with(rhs.magnitude, |a, b| a + b)?;
        Ok(Quantity::new(magnitude, lhs.unit))
    }

    pub fn try_sub(self, other: Quantity) -> Result<Quantity, UnitError> {
        let (lhs, rhs) = self.align(other, "-")?;
        let magnitude = lhs.magnitude.zip_with(rhs.magnitude, |a, b| a - b)?;
        Ok(Quantity::new(magnitude, lhs.unit))
    }

    pub fn try_mul(self, other: Quantity) -> Result<Quantity, UnitError> {
        let unit = self.unit.mul(&other.unit);
        let magnitude = self.magnitude.zip_with(other.magnitude, |a, b| a * b)?;
        Ok(Quantity::new(magnitude, unit))
    }

    pub fn try_div(self, other: Quantity) -> Result<Quantity, UnitError> {
        let unit = self.unit.div(&other.unit);
        let magnitude = self.magnitude.zip_with(other.magnitude, |a, b| a / b)?;
        Ok(Quantity::new(magnitude, unit))
    }

    /// Raise to a dimensionless power.
    ///
    /// # Errors
    ///
    /// * [`UnitError::UnitExponent`] if the exponent has a unit
    /// * [`UnitError::FractionalPower`] if the resulting unit would need a
    ///   non-integer exponent
    pub fn try_pow(self, exponent: Quantity) -> Result<Quantity, UnitError> {
        if !exponent.unit.is_dimensionless() {
            return Err(UnitError::UnitExponent {
                unit: exponent.unit.to_string(),
            });
        }
        let unit = match (&exponent.magnitude, self.unit.is_dimensionless()) {
            (_, true) => Unit::dimensionless(),
            (Magnitude::Scalar(e), false) => self.unit.powf(*e)?,
            (Magnitude::Array(values), false) => {
                return Err(UnitError::SizeMismatch {
                    lhs: self.magnitude.len().unwrap_or(1),
                    rhs: values.len(),
                })
            }
        };
        let magnitude = self.magnitude.zip_with(exponent.magnitude, f64::powf)?;
        Ok(Quantity::new(magnitude, unit))
    }

    /// Compare two scalar quantities after unit alignment
    pub fn try_compare(self, other: Quantity, op: RelOp) -> Result<bool, UnitError> {
        let (lhs, rhs) = self.align(other, op.symbol())?;
        match (lhs.magnitude, rhs.magnitude) {
            (Magnitude::Scalar(a), Magnitude::Scalar(b)) => Ok(op.compare(a, b)),
            (a, b) => Err(UnitError::SizeMismatch {
                lhs: a.len().unwrap_or(1),
                rhs: b.len().unwrap_or(1),
            }),
        }
    }
}

/// Conversion into a [`Quantity`]
pub trait ToQuantity {
    fn to_quantity(&self) -> Result<Quantity, UnitError>;
}

impl ToQuantity for f64 {
    fn to_quantity(&self) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(Magnitude::Scalar(*self), Unit::dimensionless()))
    }
}

impl ToQuantity for ScalarParam {
    fn to_quantity(&self) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(
            Magnitude::Scalar(self.value_f64()),
            Unit::parse(self.unit())?,
        ))
    }
}

impl ToQuantity for ArrayParam {
    fn to_quantity(&self) -> Result<Quantity, UnitError> {
        Ok(Quantity::new(
            Magnitude::Array(self.values().clone()),
            Unit::parse(self.unit())?,
        ))
    }
}

impl<T: ToQuantity> ToQuantity for &T {
    fn to_quantity(&self) -> Result<Quantity, UnitError> {
        (**self).to_quantity()
    }
}

/// Building a parameter from an arithmetic result
trait FromQuantity: Sized {
    fn from_quantity(quantity: Quantity) -> Self;
}

impl FromQuantity for ScalarParam {
    fn from_quantity(quantity: Quantity) -> Self {
        let value = match quantity.magnitude {
            Magnitude::Scalar(v) => v,
            Magnitude::Array(_) => unreachable!("scalar operands produce scalar results"),
        };
        let param = Param::with_kind(ParamKind::ScalarParam, Value::Float(value), Check::None);
        ScalarParam::from_param(param).with_unit(&quantity.unit.to_string())
    }
}

impl FromQuantity for ArrayParam {
    fn from_quantity(quantity: Quantity) -> Self {
        let values = match quantity.magnitude {
            Magnitude::Array(values) => values,
            Magnitude::Scalar(v) => Array1::from(vec![v]),
        };
        ArrayParam::from_nonempty(values).with_unit(&quantity.unit.to_string())
    }
}

macro_rules! impl_quantity_op {
    ($trait:ident, $method:ident, $quantity_method:ident, $lhs:ty, $rhs:ty, $out:ty) => {
        impl $trait<$rhs> for $lhs {
            type Output = Result<$out, UnitError>;

            fn $method(self, rhs: $rhs) -> Self::Output {
                let result = self.to_quantity()?.$quantity_method(rhs.to_quantity()?)?;
                Ok(<$out>::from_quantity(result))
            }
        }
    };
}

macro_rules! impl_quantity_ops {
    ($lhs:ty, $rhs:ty, $out:ty) => {
        impl_quantity_op!(Add, add, try_add, $lhs, $rhs, $out);
        impl_quantity_op!(Sub, sub, try_sub, $lhs, $rhs, $out);
        impl_quantity_op!(Mul, mul, try_mul, $lhs, $rhs, $out);
        impl_quantity_op!(Div, div, try_div, $lhs, $rhs, $out);
    };
}

impl_quantity_ops!(&ScalarParam, &ScalarParam, ScalarParam);
impl_quantity_ops!(&ScalarParam, f64, ScalarParam);
impl_quantity_ops!(f64, &ScalarParam, ScalarParam);
impl_quantity_ops!(&ArrayParam, &ArrayParam, ArrayParam);
impl_quantity_ops!(&ArrayParam, &ScalarParam, ArrayParam);
impl_quantity_ops!(&ScalarParam, &ArrayParam, ArrayParam);
impl_quantity_ops!(&ArrayParam, f64, ArrayParam);
impl_quantity_ops!(f64, &ArrayParam, ArrayParam);

impl ScalarParam {
    /// `self ** exponent`; the exponent must be dimensionless.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelparams_rs::parameters::ScalarParam;
    ///
    /// let area = ScalarParam::new(4.0).unwrap().with_unit("m**2");
    /// let side = area.pow(&ScalarParam::new(0.5).unwrap()).unwrap();
    /// assert_eq!(side.value_f64(), 2.0);
    /// assert_eq!(side.unit(), "m");
    ///
    /// let time = ScalarParam::new(2.0).unwrap().with_unit("s");
    /// assert!(area.pow(&time).is_err());
    /// ```
    pub fn pow(&self, exponent: &impl ToQuantity) -> Result<ScalarParam, UnitError> {
        let result = self.to_quantity()?.try_pow(exponent.to_quantity()?)?;
        Ok(ScalarParam::from_quantity(result))
    }

    /// Absolute value of the magnitude
    pub fn abs(&self) -> f64 {
        self.value_f64().abs()
    }

    fn compare(&self, other: &impl ToQuantity, op: RelOp) -> Result<bool, UnitError> {
        self.to_quantity()?.try_compare(other.to_quantity()?, op)
    }

    pub fn try_lt(&self, other: &impl ToQuantity) -> Result<bool, UnitError> {
        self.compare(other, RelOp::Lt)
    }

    pub fn try_le(&self, other: &impl ToQuantity) -> Result<bool, UnitError> {
        self.compare(other, RelOp::Le)
    }

    pub fn try_gt(&self, other: &impl ToQuantity) -> Result<bool, UnitError> {
        self.compare(other, RelOp::Gt)
    }

    pub fn try_ge(&self, other: &impl ToQuantity) -> Result<bool, UnitError> {
        self.compare(other, RelOp::Ge)
    }
}

impl ArrayParam {
    /// Elementwise `self ** exponent`; the exponent must be dimensionless.
    pub fn pow(&self, exponent: &impl ToQuantity) -> Result<ArrayParam, UnitError> {
        let result = self.to_quantity()?.try_pow(exponent.to_quantity()?)?;
        Ok(ArrayParam::from_quantity(result))
    }
}
