//! Parameter definition and implementation
//!
//! [`Param`] is the building block of the parameter system: a typed value
//! with an optional name, a description and a check that every assignment
//! goes through. [`OptionParam`] and [`ConstParam`] are thin constructors
//! that install a membership or an equality check.

use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::FormatConfig;
use crate::error::ErrorKind;
use crate::expr::number::format_float;
use crate::parameters::range::{Range, RangeError};
use crate::parameters::value::{quote, Value, ValueType};

/// Errors that can occur when working with parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("expected '{expected}' while setting parameter{}", quoted(.name))]
    TypeMismatch { expected: String, name: String },

    #[error("Illegal value{}: {constraint}", quoted(.name))]
    IllegalValue { name: String, constraint: String },

    #[error("Cannot set name attribute of {kind}, it is already set to '{name}'")]
    NameAlreadySet { kind: ParamKind, name: String },

    #[error("cannot assign to a computed parameter{}", quoted(.name))]
    ReadOnly { name: String },

    #[error("{0}")]
    InvalidOptions(String),

    #[error("All values of the 'option check' need to be of type: '{expected}'")]
    OptionType { expected: ValueType },

    #[error("expected a numeric value while creating a {kind}, got '{got}'")]
    NotNumeric { kind: ParamKind, got: ValueType },

    #[error("expected the passed array to be of size: '{expected}', got '{got}'")]
    SizeMismatch { expected: usize, got: usize },

    #[error("index {index} is out of bounds for an array of size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("expected an array with at least 1 element")]
    EmptyArray,

    #[error("a parameter needs a name before it can be registered")]
    Unnamed,

    #[error("a parameter named '{name}' is already registered")]
    DuplicateSymbol { name: String },

    #[error("No parameter with name '{name}' registered")]
    NotFound { name: String },

    #[error("cannot parse parameter representation: {message}")]
    Repr { message: String },

    #[error("Range error: {0}")]
    Range(#[from] RangeError),
}

impl ParameterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParameterError::TypeMismatch { .. }
            | ParameterError::NameAlreadySet { .. }
            | ParameterError::ReadOnly { .. }
            | ParameterError::OptionType { .. }
            | ParameterError::NotNumeric { .. } => ErrorKind::TypeError,
            _ => ErrorKind::ValueError,
        }
    }
}

/// `" 'name'"`, or nothing for an unnamed parameter
fn quoted(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!(" '{}'", name)
    }
}

/// The closed set of parameter variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamKind {
    Param,
    OptionParam,
    ConstParam,
    ScalarParam,
    ArrayParam,
    SlaveParam,
}

impl ParamKind {
    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::Param => "Param",
            ParamKind::OptionParam => "OptionParam",
            ParamKind::ConstParam => "ConstParam",
            ParamKind::ScalarParam => "ScalarParam",
            ParamKind::ArrayParam => "ArrayParam",
            ParamKind::SlaveParam => "SlaveParam",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Validation predicate of a parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Check {
    None,
    /// Value must be one of the options
    Options(Vec<Value>),
    /// Value must equal the original value
    Constant(Value),
    /// Numeric value, or every array element, must lie in the range
    Range(Range),
}

impl Check {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Check::None => true,
            Check::Options(options) => options.contains(value),
            Check::Constant(constant) => constant == value,
            Check::Range(range) => match value {
                Value::Array(values) => values.iter().all(|v| range.contains(*v)),
                other => other.as_f64().map_or(false, |v| range.contains(v)),
            },
        }
    }

    fn render(&self, formatted: String, not_in: bool) -> String {
        match self {
            Check::None => formatted,
            Check::Options(options) => {
                let op = if not_in { "∉" } else { "∈" };
                format!("{} {} {}", formatted, op, options_literal(options))
            }
            Check::Constant(constant) if not_in => {
                format!("{} != {}", formatted, constant.repr_literal())
            }
            Check::Constant(_) => format!("{} - Constant", formatted),
            Check::Range(range) if not_in => range.not_in_str(&formatted),
            Check::Range(range) => range.in_str(&formatted),
        }
    }

    /// Constructor arguments recreating this check, without a leading comma
    pub fn arg_repr(&self) -> String {
        match self {
            Check::Options(options) => options_literal(options),
            Check::Range(range) => range.arg_repr(),
            Check::None | Check::Constant(_) => String::new(),
        }
    }
}

fn options_literal(options: &[Value]) -> String {
    let items: Vec<String> = options.iter().map(Value::repr_literal).collect();
    format!("[{}]", items.join(", "))
}

/// Which optional arguments to include in a `repr` or a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReprOptions {
    pub checkarg: bool,
    pub name: bool,
    pub description: bool,
    pub unit: bool,
}

impl Default for ReprOptions {
    fn default() -> Self {
        Self {
            checkarg: true,
            name: true,
            description: true,
            unit: true,
        }
    }
}

/// A typed value with a set-once name and a validation check
///
/// The value type is fixed at construction. Assignments are coerced between
/// `int` and `float` (and from `0`/`1` to `bool`), then type checked, then
/// validated; a failed assignment leaves the old value in place.
///
/// # Examples
///
/// ```
/// use modelparams_rs::parameters::Param;
///
/// let mut param = Param::new(45).with_name("jada").unwrap();
/// assert_eq!(param.repr(), "Param(45, name='jada')");
///
/// param.set_value(56.7).unwrap();
/// assert_eq!(param.value().as_f64(), Some(56.0));
/// assert!(param.set_value("bada").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ParamData")]
pub struct Param {
    kind: ParamKind,
    value: Value,
    value_type: ValueType,
    name: String,
    description: String,
    check: Check,
}

/// Deserialized fields of a [`Param`], checked before use
#[derive(Deserialize)]
struct ParamData {
    kind: ParamKind,
    value: Value,
    value_type: ValueType,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    check: Check,
}

impl TryFrom<ParamData> for Param {
    type Error = ParameterError;

    /// Loaded values go through the same type and range checks as assignments.
    fn try_from(data: ParamData) -> Result<Self, Self::Error> {
        let value = match (data.value_type, data.value) {
            // `"inf"` and `"nan"` read back as floats
            (ValueType::Str, Value::Float(f)) if !f.is_finite() => Value::Str(format_float(f)),
            (_, value) => value,
        };
        if value.as_array().map_or(false, |values| values.is_empty()) {
            return Err(ParameterError::EmptyArray);
        }
        let mut param = Param {
            kind: data.kind,
            value: Value::Bool(false),
            value_type: data.value_type,
            name: data.name,
            description: data.description,
            check: data.check,
        };
        param.value = param.check(value)?;
        Ok(param)
    }
}

impl Param {
    /// Create an unchecked parameter whose type is taken from `value`
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            kind: ParamKind::Param,
            value_type: value.value_type(),
            value,
            name: String::new(),
            description: String::new(),
            check: Check::None,
        }
    }

    pub(crate) fn with_kind(kind: ParamKind, value: Value, check: Check) -> Self {
        Self {
            kind,
            check,
            ..Self::new(value)
        }
    }

    /// Set the name of a freshly created parameter
    pub fn with_name(mut self, name: &str) -> Result<Self, ParameterError> {
        self.set_name(name)?;
        Ok(self)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn constraint(&self) -> &Check {
        &self.check
    }

    /// Set the name. Only allowed while the parameter is unnamed.
    pub fn set_name(&mut self, name: &str) -> Result<(), ParameterError> {
        if !self.name.is_empty() {
            return Err(ParameterError::NameAlreadySet {
                kind: self.kind,
                name: self.name.clone(),
            });
        }
        self.name = name.to_string();
        Ok(())
    }

    /// Check `value` and assign it
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<(), ParameterError> {
        self.value = self.check(value.into())?;
        Ok(())
    }

    pub(crate) fn set_check(&mut self, check: Check) {
        self.check = check;
    }

    /// Assign without running the check
    pub(crate) fn set_value_unchecked(&mut self, value: Value) {
        self.value = value;
    }

    pub(crate) fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Coerce, type check and validate `value`, returning what would be stored.
    ///
    /// # Errors
    ///
    /// * [`ParameterError::TypeMismatch`] if the coerced value has the wrong type
    /// * [`ParameterError::IllegalValue`] if the check rejects it
    pub fn check(&self, value: Value) -> Result<Value, ParameterError> {
        let value = self.coerce(value);

        if value.value_type() != self.value_type {
            return Err(ParameterError::TypeMismatch {
                expected: self.value_type.to_string(),
                name: self.name.clone(),
            });
        }
        self.validate(value)
    }

    /// Check one element of an array parameter against the range.
    pub(crate) fn check_element(&self, value: f64) -> Result<f64, ParameterError> {
        self.validate(Value::Float(value))?;
        Ok(value)
    }

    fn validate(&self, value: Value) -> Result<Value, ParameterError> {
        if !self.check.accepts(&value) {
            return Err(ParameterError::IllegalValue {
                name: self.name.clone(),
                constraint: self.format_data(Some(&value), true, 0),
            });
        }
        Ok(value)
    }

    fn coerce(&self, value: Value) -> Value {
        match (self.value_type, value) {
            (ValueType::Int, Value::Float(f)) if fits_i64(f) => {
                info!(
                    "Converting {} to {}{}",
                    f,
                    f.trunc() as i64,
                    quoted(&self.name)
                );
                Value::Int(f.trunc() as i64)
            }
            (ValueType::Float | ValueType::Array, Value::Int(i)) => Value::Float(i as f64),
            (ValueType::Bool, Value::Int(i)) if i == 0 || i == 1 => {
                info!(
                    "Converting {} to '{}' while setting parameter{}",
                    i,
                    if i == 1 { "True" } else { "False" },
                    quoted(&self.name)
                );
                Value::Bool(i == 1)
            }
            (_, value) => value,
        }
    }

    /// Format `value` (or the stored value) together with the check.
    ///
    /// With `not_in` the text describes a violation, e.g. `56 ∉ [0, 10)`.
    pub fn format_data(&self, value: Option<&Value>, not_in: bool, width: usize) -> String {
        let value = value.unwrap_or(&self.value);
        let formatted = value.format(&FormatConfig::default(), width);
        self.check.render(formatted, not_in)
    }

    /// Machine readable representation including the selected arguments.
    ///
    /// Only parameters that carry a unit honor `options.unit`.
    pub fn repr_with(&self, options: ReprOptions) -> String {
        self.repr_parts(&self.value.repr_literal(), options, None)
    }

    pub fn repr(&self) -> String {
        self.repr_with(ReprOptions::default())
    }

    pub(crate) fn repr_parts(&self, value: &str, options: ReprOptions, unit: Option<&str>) -> String {
        let mut text = format!("{}({}", self.kind, value);
        // Options are part of what an OptionParam is
        let checkarg = options.checkarg || self.kind == ParamKind::OptionParam;
        let check_repr = self.check.arg_repr();
        if checkarg && !check_repr.is_empty() {
            text.push_str(", ");
            text.push_str(&check_repr);
        }
        if let Some(unit) = unit.filter(|u| options.unit && *u != "1") {
            text.push_str(&format!(", unit={}", quote(unit)));
        }
        if options.name && !self.name.is_empty() {
            text.push_str(&format!(", name={}", quote(&self.name)));
        }
        if options.description && !self.description.is_empty() {
            text.push_str(&format!(", description={}", quote(&self.description)));
        }
        text.push(')');
        text
    }

    /// Copy, dropping the arguments `options` excludes
    pub fn copy_with(&self, options: ReprOptions) -> Self {
        Self {
            kind: self.kind,
            value: self.value.clone(),
            value_type: self.value_type,
            name: if options.name { self.name.clone() } else { String::new() },
            description: if options.description {
                self.description.clone()
            } else {
                String::new()
            },
            check: if options.checkarg || self.kind == ParamKind::OptionParam {
                self.check.clone()
            } else {
                Check::None
            },
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_data(None, false, 0))
    }
}

/// Whether `f` truncates to an `i64` without saturating
fn fits_i64(f: f64) -> bool {
    f.is_finite() && f.trunc().abs() < 9_223_372_036_854_775_808.0
}

pub(crate) mod sealed {
    use super::Param;

    /// Write access to the stored [`Param`]; only the crate may bypass the
    /// variant's own `set_value`.
    pub trait ParamAccess {
        fn param_mut(&mut self) -> &mut Param;
    }
}

use sealed::ParamAccess;

/// Behaviour shared by all parameter variants
pub trait Parameter: ParamAccess {
    fn param(&self) -> &Param;

    fn name(&self) -> &str {
        self.param().name()
    }

    fn set_name(&mut self, name: &str) -> Result<(), ParameterError> {
        self.param_mut().set_name(name)
    }

    fn description(&self) -> &str {
        self.param().description()
    }

    fn kind(&self) -> ParamKind {
        self.param().kind()
    }

    fn repr_with(&self, options: ReprOptions) -> String {
        self.param().repr_with(options)
    }

    fn repr(&self) -> String {
        self.repr_with(ReprOptions::default())
    }
}

impl ParamAccess for Param {
    fn param_mut(&mut self) -> &mut Param {
        self
    }
}

impl Parameter for Param {
    fn param(&self) -> &Param {
        self
    }
}

/// A parameter restricted to a fixed set of options
///
/// # Examples
///
/// ```
/// use modelparams_rs::parameters::{OptionParam, Value};
///
/// let param = OptionParam::new(45, vec![Value::from(45), Value::from(56)]).unwrap();
/// assert_eq!(param.to_string(), "45 ∈ [45, 56]");
///
/// let err = OptionParam::new(46, vec![Value::from(45), Value::from(56)]).unwrap_err();
/// assert_eq!(err.to_string(), "Illegal value: 46 ∉ [45, 56]");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionParam {
    param: Param,
}

impl OptionParam {
    pub fn new(value: impl Into<Value>, options: Vec<Value>) -> Result<Self, ParameterError> {
        if options.len() < 2 {
            return Err(ParameterError::InvalidOptions(
                "expected the options argument to be at least of length 2".to_string(),
            ));
        }
        if let Some(option) = options.iter().find(|o| o.value_type() == ValueType::Array) {
            return Err(ParameterError::InvalidOptions(format!(
                "options can only be 'str' and scalars got: '{}'",
                option.value_type()
            )));
        }

        let value = value.into();
        let value_type = value.value_type();
        let mut param = Param::with_kind(ParamKind::OptionParam, value.clone(), Check::Options(options));
        param.set_value(value)?;

        if let Check::Options(options) = &param.check {
            if options.iter().any(|o| o.value_type() != value_type) {
                return Err(ParameterError::OptionType {
                    expected: value_type,
                });
            }
        }
        Ok(Self { param })
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, ParameterError> {
        self.param.set_name(name)?;
        Ok(self)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.param = self.param.with_description(description);
        self
    }

    pub fn options(&self) -> &[Value] {
        match &self.param.check {
            Check::Options(options) => options,
            _ => &[],
        }
    }

    pub fn value(&self) -> &Value {
        self.param.value()
    }

    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<(), ParameterError> {
        self.param.set_value(value)
    }
}

impl ParamAccess for OptionParam {
    fn param_mut(&mut self) -> &mut Param {
        &mut self.param
    }
}

impl Parameter for OptionParam {
    fn param(&self) -> &Param {
        &self.param
    }
}

impl fmt::Display for OptionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.param, f)
    }
}

/// A parameter that only accepts its original value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstParam {
    param: Param,
}

impl ConstParam {
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            param: Param::with_kind(ParamKind::ConstParam, value.clone(), Check::Constant(value)),
        }
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, ParameterError> {
        self.param.set_name(name)?;
        Ok(self)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.param = self.param.with_description(description);
        self
    }

    pub fn value(&self) -> &Value {
        self.param.value()
    }

    /// Succeeds only for a value equal to the original one
    pub fn set_value(&mut self, value: impl Into<Value>) -> Result<(), ParameterError> {
        self.param.set_value(value)
    }
}

impl ParamAccess for ConstParam {
    fn param_mut(&mut self) -> &mut Param {
        &mut self.param
    }
}

impl Parameter for ConstParam {
    fn param(&self) -> &Param {
        &self.param
    }
}

impl fmt::Display for ConstParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.param, f)
    }
}
