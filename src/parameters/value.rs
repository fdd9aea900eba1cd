//! Parameter values
//!
//! A parameter holds exactly one of: a bool, an integer, a float, a string,
//! or a one-dimensional float array.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::FormatConfig;
use crate::expr::number::format_float;

/// A parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(#[serde(with = "real")] f64),
    Str(String),
    Array(#[serde(with = "array_as_vec")] Array1<f64>),
}

/// Type tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    Int,
    Float,
    Str,
    Array,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Str => "str",
            ValueType::Array => "array",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Value {
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Str(_) => ValueType::Str,
            Value::Array(_) => ValueType::Array,
        }
    }

    /// Numeric view of a scalar value; bools count as 0 and 1.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
            Value::Int(i) => Some(i as f64),
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array1<f64>> {
        match self {
            Value::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Human readable form, padded to `width`.
    ///
    /// Floats use the configured notation, infinities print as `∞`, strings
    /// are quoted, and arrays longer than the abbreviation threshold show
    /// only their first two and last two elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelparams_rs::config::FormatConfig;
    /// use modelparams_rs::parameters::Value;
    ///
    /// let config = FormatConfig::default();
    /// let long = Value::from(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    /// assert_eq!(long.format(&config, 0), "[1, 2, ..., 4, 5]");
    /// assert_eq!(Value::from(f64::INFINITY).format(&config, 0), "∞");
    /// assert_eq!(Value::from("bada").format(&config, 8), "  'bada'");
    /// ```
    pub fn format(&self, config: &FormatConfig, width: usize) -> String {
        let text = match self {
            Value::Bool(b) => python_bool(*b).to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) if f.is_infinite() => config.format_float(*f),
            Value::Float(f) => format_float(*f),
            Value::Str(s) => quote(s),
            Value::Array(values) => {
                if values.len() > config.abbreviate_after {
                    let n = values.len();
                    format!(
                        "[{}, {}, ..., {}, {}]",
                        config.format_float(values[0]),
                        config.format_float(values[1]),
                        config.format_float(values[n - 2]),
                        config.format_float(values[n - 1])
                    )
                } else {
                    let items: Vec<String> = values.iter().map(|v| format_float(*v)).collect();
                    format!("[{}]", items.join(", "))
                }
            }
        };
        config.justify(&text, width)
    }

    /// Literal form that [`crate::parameters::from_repr`] reads back.
    pub fn repr_literal(&self) -> String {
        match self {
            Value::Bool(b) => python_bool(*b).to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Str(s) => quote(s),
            Value::Array(values) => {
                let items: Vec<String> = values.iter().map(|v| format_float(*v)).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(&FormatConfig::default(), 0))
    }
}

fn python_bool(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

pub(crate) fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Value::Array(Array1::from(value))
    }
}

impl From<Array1<f64>> for Value {
    fn from(value: Array1<f64>) -> Self {
        Value::Array(value)
    }
}

/// Floats as JSON numbers; non-finite floats as the strings `inf`, `-inf`
/// and `nan`, which JSON numbers cannot hold.
pub(crate) mod real {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::expr::number::format_float;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    pub(crate) struct Real(#[serde(with = "super::real")] pub f64);

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&format_float(*value))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => parse_non_finite(&text)
                .ok_or_else(|| D::Error::custom(format!("invalid float '{}'", text))),
        }
    }

    pub(crate) fn parse_non_finite(text: &str) -> Option<f64> {
        match text {
            "inf" => Some(f64::INFINITY),
            "-inf" => Some(f64::NEG_INFINITY),
            "nan" => Some(f64::NAN),
            _ => None,
        }
    }
}

mod array_as_vec {
    use ndarray::Array1;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::real::Real;

    pub fn serialize<S: Serializer>(values: &Array1<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| Real(*v)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Array1<f64>, D::Error> {
        let values = Vec::<Real>::deserialize(deserializer)?;
        Ok(values.into_iter().map(|Real(v)| v).collect())
    }
}
