//! Numeric ranges for scalar and array parameters
//!
//! A range has an optional lower bound, inclusive (`ge`) or exclusive (`gt`),
//! and an optional upper bound, inclusive (`le`) or exclusive (`lt`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::FormatConfig;
use crate::expr::number::format_float;

/// Errors that can occur when defining a range
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RangeError {
    #[error("Cannot specify both 'ge' and 'gt'")]
    BothLower,

    #[error("Cannot specify both 'le' and 'lt'")]
    BothUpper,

    #[error("expected the minimal value to be less than the maximal value, got {min} > {max}")]
    InvalidBounds { min: f64, max: f64 },
}

/// Interval a numeric value must lie in.
///
/// # Examples
///
/// ```
/// use modelparams_rs::parameters::Range;
///
/// let range = Range::new().ge(0.0).lt(10.0);
/// assert!(range.validate().is_ok());
/// assert!(range.contains(0.0));
/// assert!(!range.contains(10.0));
/// assert_eq!(range.in_str("5"), "5 ∈ [0, 10)");
/// assert_eq!(range.not_in_str("15"), "15 ∉ [0, 10)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ge: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    le: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lt: Option<f64>,
}

impl Range {
    /// Unbounded range
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lower bound
    pub fn ge(mut self, value: f64) -> Self {
        self.ge = Some(value);
        self
    }

    /// Inclusive upper bound
    pub fn le(mut self, value: f64) -> Self {
        self.le = Some(value);
        self
    }

    /// Exclusive lower bound
    pub fn gt(mut self, value: f64) -> Self {
        self.gt = Some(value);
        self
    }

    /// Exclusive upper bound
    pub fn lt(mut self, value: f64) -> Self {
        self.lt = Some(value);
        self
    }

    /// Check that the bounds are consistent.
    pub fn validate(&self) -> Result<(), RangeError> {
        if self.ge.is_some() && self.gt.is_some() {
            return Err(RangeError::BothLower);
        }
        if self.le.is_some() && self.lt.is_some() {
            return Err(RangeError::BothUpper);
        }
        let (min, max) = (self.min(), self.max());
        if min > max {
            return Err(RangeError::InvalidBounds { min, max });
        }
        Ok(())
    }

    pub fn is_unbounded(&self) -> bool {
        self.ge.is_none() && self.le.is_none() && self.gt.is_none() && self.lt.is_none()
    }

    /// Lower bound, or negative infinity
    pub fn min(&self) -> f64 {
        self.ge.or(self.gt).unwrap_or(f64::NEG_INFINITY)
    }

    /// Upper bound, or infinity
    pub fn max(&self) -> f64 {
        self.le.or(self.lt).unwrap_or(f64::INFINITY)
    }

    pub fn contains(&self, value: f64) -> bool {
        let above = match (self.ge, self.gt) {
            (Some(ge), _) => value >= ge,
            (_, Some(gt)) => value > gt,
            _ => true,
        };
        let below = match (self.le, self.lt) {
            (Some(le), _) => value <= le,
            (_, Some(lt)) => value < lt,
            _ => true,
        };
        above && below && !value.is_nan()
    }

    /// Interval notation, e.g. `[0, 10)`
    pub fn interval(&self) -> String {
        let config = FormatConfig::default();
        format!(
            "{}{}, {}{}",
            if self.gt.is_some() { "(" } else { "[" },
            bound_text(self.min(), &config),
            bound_text(self.max(), &config),
            if self.lt.is_some() { ")" } else { "]" }
        )
    }

    /// `"{value} ∈ {interval}"`, or just the value when unbounded
    pub fn in_str(&self, value: &str) -> String {
        if self.is_unbounded() {
            value.to_string()
        } else {
            format!("{} ∈ {}", value, self.interval())
        }
    }

    /// `"{value} ∉ {interval}"`, or just the value when unbounded
    pub fn not_in_str(&self, value: &str) -> String {
        if self.is_unbounded() {
            value.to_string()
        } else {
            format!("{} ∉ {}", value, self.interval())
        }
    }

    /// Keyword arguments recreating this range, e.g. `ge=0.0, lt=10.0`
    pub fn arg_repr(&self) -> String {
        [("ge", self.ge), ("le", self.le), ("gt", self.gt), ("lt", self.lt)]
            .iter()
            .filter_map(|(key, bound)| bound.map(|b| format!("{}={}", key, format_float(b))))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn bound_text(value: f64, config: &FormatConfig) -> String {
    if value.is_infinite() {
        config.format_float(value)
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format_float(value)
    }
}
