//! Physical units
//!
//! A unit string such as `"mV"`, `"mole*m**-3"` or `"1/ms"` parses into a
//! product of prefixed base units with integer exponents. Each unit has an
//! SI scale factor and a dimension vector over (kg, m, s, A, mol, K, cd),
//! which is all that conversion and compatibility checks need.

pub mod arithmetic;

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{all_consuming, opt, recognize},
    multi::many0,
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};
use std::fmt;
use thiserror::Error;

use crate::error::ErrorKind;

pub use arithmetic::{Magnitude, Quantity};

/// Errors that can occur when parsing, converting or combining units
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UnitError {
    #[error("cannot parse unit '{unit}': {message}")]
    Parse { unit: String, message: String },

    #[error("unknown unit '{unit}'")]
    UnknownUnit { unit: String },

    #[error("Cannot convert from '{from}' to '{to}'")]
    Dimensionality { from: String, to: String },

    #[error("Exponents cannot have unit")]
    UnitExponent { unit: String },

    #[error("cannot raise '{unit}' to the power {exponent}")]
    FractionalPower { unit: String, exponent: f64 },

    #[error("expected operands of equal size, got {lhs} and {rhs}")]
    SizeMismatch { lhs: usize, rhs: usize },
}

impl UnitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            UnitError::UnitExponent { .. } => ErrorKind::Unsupported,
            _ => ErrorKind::ValueError,
        }
    }
}

/// Number of base dimensions: kg, m, s, A, mol, K, cd
pub const DIMENSIONS: usize = 7;

/// Exponents of the base dimensions
pub type Dimension = [i32; DIMENSIONS];

const DIMENSIONLESS: Dimension = [0; DIMENSIONS];

/// Base units: symbol, scale to SI, dimension
const BASE_UNITS: &[(&str, f64, Dimension)] = &[
    ("g", 1e-3, [1, 0, 0, 0, 0, 0, 0]),
    ("m", 1.0, [0, 1, 0, 0, 0, 0, 0]),
    ("s", 1.0, [0, 0, 1, 0, 0, 0, 0]),
    ("A", 1.0, [0, 0, 0, 1, 0, 0, 0]),
    ("mol", 1.0, [0, 0, 0, 0, 1, 0, 0]),
    ("mole", 1.0, [0, 0, 0, 0, 1, 0, 0]),
    ("K", 1.0, [0, 0, 0, 0, 0, 1, 0]),
    ("cd", 1.0, [0, 0, 0, 0, 0, 0, 1]),
    ("Hz", 1.0, [0, 0, -1, 0, 0, 0, 0]),
    ("N", 1.0, [1, 1, -2, 0, 0, 0, 0]),
    ("Pa", 1.0, [1, -1, -2, 0, 0, 0, 0]),
    ("J", 1.0, [1, 2, -2, 0, 0, 0, 0]),
    ("W", 1.0, [1, 2, -3, 0, 0, 0, 0]),
    ("C", 1.0, [0, 0, 1, 1, 0, 0, 0]),
    ("V", 1.0, [1, 2, -3, -1, 0, 0, 0]),
    ("F", 1.0, [-1, -2, 4, 2, 0, 0, 0]),
    ("S", 1.0, [-1, -2, 3, 2, 0, 0, 0]),
    ("Ohm", 1.0, [1, 2, -3, -2, 0, 0, 0]),
    ("l", 1e-3, [0, 3, 0, 0, 0, 0, 0]),
    ("L", 1e-3, [0, 3, 0, 0, 0, 0, 0]),
    ("M", 1e3, [0, -3, 0, 0, 1, 0, 0]),
    ("rad", 1.0, DIMENSIONLESS),
    ("sr", 1.0, DIMENSIONLESS),
    ("min", 60.0, [0, 0, 1, 0, 0, 0, 0]),
    ("h", 3600.0, [0, 0, 1, 0, 0, 0, 0]),
];

const PREFIXES: &[(&str, f64)] = &[
    ("da", 1e1),
    ("h", 1e2),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
    ("E", 1e18),
    ("Z", 1e21),
    ("Y", 1e24),
    ("d", 1e-1),
    ("c", 1e-2),
    ("m", 1e-3),
    ("u", 1e-6),
    ("µ", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
    ("z", 1e-21),
    ("y", 1e-24),
];

fn base_unit(symbol: &str) -> Option<(f64, Dimension)> {
    BASE_UNITS
        .iter()
        .find(|(name, _, _)| *name == symbol)
        .map(|(_, scale, dim)| (*scale, *dim))
}

/// Scale and dimension of a possibly prefixed symbol such as `ms` or `kg`.
///
/// Unprefixed names win, so `min` is minutes and `Pa` is pascal.
fn resolve(symbol: &str) -> Result<(f64, Dimension), UnitError> {
    if let Some(found) = base_unit(symbol) {
        return Ok(found);
    }
    for (prefix, factor) in PREFIXES {
        if let Some(rest) = symbol.strip_prefix(prefix) {
            if let Some((scale, dim)) = base_unit(rest) {
                return Ok((factor * scale, dim));
            }
        }
    }
    Err(UnitError::UnknownUnit {
        unit: symbol.to_string(),
    })
}

/// One prefixed base unit raised to an integer power
#[derive(Debug, Clone, PartialEq)]
struct Factor {
    symbol: String,
    exponent: i32,
}

/// A parsed unit
///
/// # Examples
///
/// ```
/// use modelparams_rs::units::Unit;
///
/// let unit = Unit::parse("mole*m**-3").unwrap();
/// assert_eq!(unit.to_string(), "mole*m**-3");
///
/// let factor = Unit::parse("mM").unwrap().conversion_factor_to(&unit).unwrap();
/// assert!((factor - 1.0).abs() < 1e-12);
///
/// assert!(Unit::parse("ms").unwrap().conversion_factor_to(&Unit::parse("m").unwrap()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    factors: Vec<Factor>,
    scale: f64,
    dimension: Dimension,
}

impl Unit {
    pub fn dimensionless() -> Self {
        Self {
            factors: Vec::new(),
            scale: 1.0,
            dimension: DIMENSIONLESS,
        }
    }

    /// Parse a unit string. `"1"` and the empty string are dimensionless.
    pub fn parse(text: &str) -> Result<Self, UnitError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::dimensionless());
        }
        let terms = match all_consuming(delimited(multispace0, product, multispace0)).parse(text) {
            Ok((_, terms)) => terms,
            Err(err) => {
                return Err(UnitError::Parse {
                    unit: text.to_string(),
                    message: err.to_string(),
                })
            }
        };
        Self::from_terms(terms)
    }

    fn from_terms(terms: Vec<(String, i32)>) -> Result<Self, UnitError> {
        let mut unit = Self::dimensionless();
        for (symbol, exponent) in terms {
            let (scale, dim) = resolve(&symbol)?;
            unit.push(symbol, exponent, scale, &dim);
        }
        Ok(unit)
    }

    fn push(&mut self, symbol: String, exponent: i32, scale: f64, dim: &Dimension) {
        self.scale *= scale.powi(exponent);
        for (total, d) in self.dimension.iter_mut().zip(dim) {
            *total += d * exponent;
        }
        match self.factors.iter_mut().find(|f| f.symbol == symbol) {
            Some(factor) => factor.exponent += exponent,
            None => self.factors.push(Factor { symbol, exponent }),
        }
        self.factors.retain(|f| f.exponent != 0);
    }

    /// Factor to SI base units
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// True when written without any unit, e.g. `"1"`
    pub fn is_dimensionless(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn is_compatible(&self, other: &Unit) -> bool {
        self.dimension == other.dimension
    }

    /// Factor converting magnitudes in `self` to magnitudes in `target`.
    pub fn conversion_factor_to(&self, target: &Unit) -> Result<f64, UnitError> {
        if !self.is_compatible(target) {
            return Err(UnitError::Dimensionality {
                from: self.to_string(),
                to: target.to_string(),
            });
        }
        Ok(self.scale / target.scale)
    }

    pub fn mul(&self, other: &Unit) -> Unit {
        let mut unit = self.clone();
        for factor in &other.factors {
            unit.push_factor(factor, 1);
        }
        unit
    }

    pub fn div(&self, other: &Unit) -> Unit {
        let mut unit = self.clone();
        for factor in &other.factors {
            unit.push_factor(factor, -1);
        }
        unit
    }

    fn push_factor(&mut self, factor: &Factor, sign: i32) {
        // Every stored factor has already been resolved once
        if let Ok((scale, dim)) = resolve(&factor.symbol) {
            self.push(factor.symbol.clone(), sign * factor.exponent, scale, &dim);
        }
    }

    pub fn powi(&self, exponent: i32) -> Unit {
        let mut unit = Self::dimensionless();
        for factor in &self.factors {
            unit.push_factor(factor, exponent);
        }
        unit
    }

    /// Raise to a real power; every resulting exponent must be an integer.
    pub fn powf(&self, exponent: f64) -> Result<Unit, UnitError> {
        let mut unit = Self::dimensionless();
        for factor in &self.factors {
            let scaled = factor.exponent as f64 * exponent;
            if (scaled - scaled.round()).abs() > 1e-9 {
                return Err(UnitError::FractionalPower {
                    unit: self.to_string(),
                    exponent,
                });
            }
            let (scale, dim) = resolve(&factor.symbol)?;
            unit.push(factor.symbol.clone(), scaled.round() as i32, scale, &dim);
        }
        Ok(unit)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .factors
            .iter()
            .map(|factor| match factor.exponent {
                1 => factor.symbol.clone(),
                e => format!("{}**{}", factor.symbol, e),
            })
            .collect();
        write!(f, "{}", parts.join("*"))
    }
}

impl std::str::FromStr for Unit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s)
    }
}

type Terms = Vec<(String, i32)>;

/// `factor (('*' | '/') factor)*`
fn product(input: &str) -> IResult<&str, Terms> {
    let (input, mut terms) = factor(input)?;
    let (input, rest) = many0(pair(
        delimited(multispace0, alt((char('*'), char('/'))), multispace0),
        factor,
    ))
    .parse(input)?;
    for (op, more) in rest {
        let sign = if op == '/' { -1 } else { 1 };
        terms.extend(more.into_iter().map(|(symbol, e)| (symbol, sign * e)));
    }
    Ok((input, terms))
}

/// An atom with an optional `**n` or `^n` exponent
fn factor(input: &str) -> IResult<&str, Terms> {
    let (input, terms) = atom(input)?;
    let (input, exponent) = opt(preceded(
        delimited(multispace0, alt((tag("**"), tag("^"))), multispace0),
        alt((integer, delimited(char('('), integer, char(')')))),
    ))
    .parse(input)?;
    let exponent = exponent.unwrap_or(1);
    Ok((
        input,
        terms.into_iter().map(|(symbol, e)| (symbol, e * exponent)).collect(),
    ))
}

fn atom(input: &str) -> IResult<&str, Terms> {
    alt((
        delimited(char('('), delimited(multispace0, product, multispace0), char(')')),
        one,
        named_unit,
    ))
    .parse(input)
}

/// `1`, as in `1/ms`
fn one(input: &str) -> IResult<&str, Terms> {
    let (input, _) = char('1').parse(input)?;
    Ok((input, Vec::new()))
}

fn named_unit(input: &str) -> IResult<&str, Terms> {
    let (input, name) = take_while1(|c: char| c.is_alphabetic() || c == 'µ').parse(input)?;
    Ok((input, vec![(name.to_string(), 1)]))
}

fn integer(input: &str) -> IResult<&str, i32> {
    let (rest, digits) = recognize(pair(opt(char('-')), digit1)).parse(input)?;
    match digits.parse::<i32>() {
        Ok(value) => Ok((rest, value)),
        Err(_) => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse() {
        assert!(Unit::parse("1").unwrap().is_dimensionless());
        assert_eq!(Unit::parse("m**2").unwrap().dimension(), [0, 2, 0, 0, 0, 0, 0]);
        assert_eq!(Unit::parse("1/ms").unwrap().to_string(), "ms**-1");
        assert_eq!(Unit::parse("m * s^-1").unwrap().to_string(), "m*s**-1");
        assert_eq!(Unit::parse("(m*s)**2").unwrap().to_string(), "m**2*s**2");
        assert!(Unit::parse("m/m").unwrap().is_dimensionless());
    }

    #[test]
    fn test_prefixes() {
        assert_relative_eq!(Unit::parse("ms").unwrap().scale(), 1e-3);
        assert_relative_eq!(Unit::parse("kg").unwrap().scale(), 1.0);
        assert_relative_eq!(Unit::parse("mV").unwrap().scale(), 1e-3);
        assert_relative_eq!(Unit::parse("µm").unwrap().scale(), 1e-6);
        assert_relative_eq!(Unit::parse("dam").unwrap().scale(), 10.0);
        assert_relative_eq!(Unit::parse("min").unwrap().scale(), 60.0);
        assert_eq!(Unit::parse("Pa").unwrap().dimension(), [1, -1, -2, 0, 0, 0, 0]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            Unit::parse("parsec"),
            Err(UnitError::UnknownUnit {
                unit: "parsec".to_string()
            })
        );
        assert!(matches!(Unit::parse("m**"), Err(UnitError::Parse { .. })));
        let err = Unit::parse("m").unwrap().conversion_factor_to(&Unit::parse("s").unwrap());
        assert_eq!(err.unwrap_err().to_string(), "Cannot convert from 'm' to 's'");
    }

    #[test]
    fn test_conversion() {
        let s = Unit::parse("s").unwrap();
        let ms = Unit::parse("ms").unwrap();
        assert_relative_eq!(s.conversion_factor_to(&ms).unwrap(), 1000.0);
        let molar = Unit::parse("M").unwrap();
        let si = Unit::parse("mol*m**-3").unwrap();
        assert_relative_eq!(molar.conversion_factor_to(&si).unwrap(), 1000.0);
    }

    #[test]
    fn test_algebra() {
        let m2 = Unit::parse("m**2").unwrap();
        let s = Unit::parse("s").unwrap();
        assert_eq!(m2.mul(&s).to_string(), "m**2*s");
        assert_eq!(m2.div(&s).to_string(), "m**2*s**-1");
        assert_eq!(m2.powf(0.5).unwrap().to_string(), "m");
        assert_eq!(s.powi(-2).to_string(), "s**-2");
        assert!(s.powf(0.5).is_err());
    }
}
