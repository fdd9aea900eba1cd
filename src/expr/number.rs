//! Numeric literals of the expression tree

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ExprError;

/// A numeric literal.
///
/// Integers and rationals are kept exact so printers can decide whether a
/// power is an integer power, a square root, or something general.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Number {
    Integer(i64),
    /// Normalized: denominator greater than one, numerator and denominator coprime.
    Rational(i64, i64),
    Float(#[serde(with = "crate::parameters::value::real")] f64),
}

impl Number {
    /// Create a normalized rational `p/q`.
    ///
    /// Returns an `Integer` when the fraction reduces to a whole number.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelparams_rs::expr::Number;
    ///
    /// assert_eq!(Number::rational(2, 4).unwrap(), Number::Rational(1, 2));
    /// assert_eq!(Number::rational(6, -3).unwrap(), Number::Integer(-2));
    /// assert!(Number::rational(1, 0).is_err());
    /// ```
    pub fn rational(p: i64, q: i64) -> Result<Self, ExprError> {
        if q == 0 {
            return Err(ExprError::ZeroDenominator);
        }
        let g = gcd(p.abs(), q.abs()).max(1);
        let sign = if q < 0 { -1 } else { 1 };
        let (p, q) = (sign * p / g, sign * q / g);
        if q == 1 {
            Ok(Number::Integer(p))
        } else {
            Ok(Number::Rational(p, q))
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    pub fn is_rational(&self) -> bool {
        matches!(self, Number::Integer(_) | Number::Rational(_, _))
    }

    pub fn is_negative(&self) -> bool {
        match *self {
            Number::Integer(n) => n < 0,
            Number::Rational(p, _) => p < 0,
            Number::Float(f) => f < 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            Number::Integer(n) => n == 0,
            Number::Rational(_, _) => false,
            Number::Float(f) => f == 0.0,
        }
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Number::Integer(1))
    }

    pub fn is_minus_one(&self) -> bool {
        matches!(self, Number::Integer(-1))
    }

    /// `1/2` or `0.5`
    pub fn is_half(&self) -> bool {
        match *self {
            Number::Rational(1, 2) => true,
            Number::Float(f) => f == 0.5,
            _ => false,
        }
    }

    /// `-1/2` or `-0.5`
    pub fn is_minus_half(&self) -> bool {
        match *self {
            Number::Rational(-1, 2) => true,
            Number::Float(f) => f == -0.5,
            _ => false,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match *self {
            Number::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match *self {
            Number::Integer(n) => n as f64,
            Number::Rational(p, q) => p as f64 / q as f64,
            Number::Float(f) => f,
        }
    }

    /// Exact product of two integers or rationals; `None` for floats or on overflow.
    pub fn mul_exact(&self, other: &Number) -> Option<Number> {
        let (p1, q1) = self.as_fraction()?;
        let (p2, q2) = other.as_fraction()?;
        Number::rational(p1.checked_mul(p2)?, q1.checked_mul(q2)?).ok()
    }

    fn as_fraction(&self) -> Option<(i64, i64)> {
        match *self {
            Number::Integer(n) => Some((n, 1)),
            Number::Rational(p, q) => Some((p, q)),
            Number::Float(_) => None,
        }
    }

    /// Additive inverse.
    pub fn negate(&self) -> Number {
        match *self {
            Number::Integer(n) => Number::Integer(-n),
            Number::Rational(p, q) => Number::Rational(-p, q),
            Number::Float(f) => Number::Float(-f),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Integer(n) => write!(f, "{}", n),
            Number::Rational(p, q) => write!(f, "{}/{}", p, q),
            Number::Float(x) => write!(f, "{}", format_float(x)),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Integer(value)
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Number::Float(value)
    }
}

/// Shortest round-tripping text for a float, always with a decimal point or exponent.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    format!("{:?}", value)
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}
