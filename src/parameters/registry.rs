//! Symbol registry
//!
//! Maps parameter names to the parameters that expressions refer to. The
//! registry is an explicit value owned by the caller and handed to the
//! evaluator; registering a second parameter under a taken name is an error
//! unless [`SymbolRegistry::replace`] is used.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::eval::{eval_param_expr, EvalError, EvalOptions, EvalValue};
use crate::expr::Symbol;
use crate::parameters::array::{ArrayAssign, ArrayParam};
use crate::parameters::param::{Parameter, ParameterError};
use crate::parameters::scalar::ScalarParam;
use crate::parameters::slave::SlaveParam;
use crate::parameters::value::Value;

/// Error type for registry persistence
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("parameter stored as '{key}' is named '{name}'")]
    NameMismatch { key: String, name: String },
}

/// A parameter that can be referenced from expressions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegisteredParam {
    Scalar(ScalarParam),
    Array(ArrayParam),
    Slave(SlaveParam),
}

impl RegisteredParam {
    pub fn as_parameter(&self) -> &dyn Parameter {
        match self {
            RegisteredParam::Scalar(p) => p,
            RegisteredParam::Array(p) => p,
            RegisteredParam::Slave(p) => p,
        }
    }

    pub fn name(&self) -> &str {
        self.as_parameter().name()
    }

    pub fn sym(&self) -> Symbol {
        match self {
            RegisteredParam::Scalar(p) => p.sym(),
            RegisteredParam::Array(p) => p.sym(),
            RegisteredParam::Slave(p) => p.sym(),
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            RegisteredParam::Scalar(p) => p.unit(),
            RegisteredParam::Array(p) => p.unit(),
            RegisteredParam::Slave(p) => p.unit(),
        }
    }
}

impl From<ScalarParam> for RegisteredParam {
    fn from(param: ScalarParam) -> Self {
        RegisteredParam::Scalar(param)
    }
}

impl From<ArrayParam> for RegisteredParam {
    fn from(param: ArrayParam) -> Self {
        RegisteredParam::Array(param)
    }
}

impl From<SlaveParam> for RegisteredParam {
    fn from(param: SlaveParam) -> Self {
        RegisteredParam::Slave(param)
    }
}

/// Named parameters available to expression evaluation
///
/// # Examples
///
/// ```
/// use modelparams_rs::parameters::{ScalarParam, SymbolRegistry};
///
/// let mut registry = SymbolRegistry::new();
/// let sym = registry
///     .register(ScalarParam::new(1.0).unwrap().with_name("g_Na").unwrap())
///     .unwrap();
/// assert_eq!(sym.name(), "g_Na");
///
/// // A second parameter with the same name is rejected
/// let again = ScalarParam::new(2.0).unwrap().with_name("g_Na").unwrap();
/// assert!(registry.register(again).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolRegistry {
    params: BTreeMap<String, RegisteredParam>,
}

impl SymbolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named parameter and return its symbol.
    ///
    /// # Errors
    ///
    /// * [`ParameterError::Unnamed`] if the parameter has no name
    /// * [`ParameterError::DuplicateSymbol`] if the name is taken
    pub fn register(&mut self, param: impl Into<RegisteredParam>) -> Result<Symbol, ParameterError> {
        let param = param.into();
        let name = registered_name(&param)?;
        if self.params.contains_key(&name) {
            return Err(ParameterError::DuplicateSymbol { name });
        }
        let sym = param.sym();
        self.params.insert(name, param);
        Ok(sym)
    }

    /// Register a parameter, replacing any parameter of the same name.
    ///
    /// Returns the replaced parameter.
    pub fn replace(
        &mut self,
        param: impl Into<RegisteredParam>,
    ) -> Result<Option<RegisteredParam>, ParameterError> {
        let param = param.into();
        let name = registered_name(&param)?;
        let previous = self.params.insert(name.clone(), param);
        if previous.is_some() {
            warn!("Replacing the registered parameter '{}'", name);
        }
        Ok(previous)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredParam> {
        self.params.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut RegisteredParam> {
        self.params.get_mut(name)
    }

    pub fn scalar(&self, name: &str) -> Option<&ScalarParam> {
        match self.params.get(name) {
            Some(RegisteredParam::Scalar(p)) => Some(p),
            _ => None,
        }
    }

    pub fn scalar_mut(&mut self, name: &str) -> Option<&mut ScalarParam> {
        match self.params.get_mut(name) {
            Some(RegisteredParam::Scalar(p)) => Some(p),
            _ => None,
        }
    }

    pub fn array(&self, name: &str) -> Option<&ArrayParam> {
        match self.params.get(name) {
            Some(RegisteredParam::Array(p)) => Some(p),
            _ => None,
        }
    }

    pub fn array_mut(&mut self, name: &str) -> Option<&mut ArrayParam> {
        match self.params.get_mut(name) {
            Some(RegisteredParam::Array(p)) => Some(p),
            _ => None,
        }
    }

    pub fn slave(&self, name: &str) -> Option<&SlaveParam> {
        match self.params.get(name) {
            Some(RegisteredParam::Slave(p)) => Some(p),
            _ => None,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RegisteredParam)> {
        self.params.iter().map(|(name, param)| (name.as_str(), param))
    }

    pub fn remove(&mut self, name: &str) -> Option<RegisteredParam> {
        self.params.remove(name)
    }

    /// Assign a new value to a registered parameter.
    ///
    /// Scalars take any numeric value; arrays take a whole array, a scalar
    /// to broadcast or an `(index, value)` pair; slaves always fail.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<(), ParameterError> {
        let value = value.into();
        match self.params.get_mut(name) {
            Some(RegisteredParam::Scalar(p)) => p.set_value(value),
            Some(RegisteredParam::Array(p)) => match value {
                Value::Array(values) => p.set_value(ArrayAssign::Whole(values)),
                other => match other.as_f64() {
                    Some(v) if other.value_type().is_numeric() => p.set_value(v),
                    _ => Err(ParameterError::TypeMismatch {
                        expected: "scalar or array".to_string(),
                        name: name.to_string(),
                    }),
                },
            },
            Some(RegisteredParam::Slave(p)) => p.set_value(value),
            None => Err(ParameterError::NotFound {
                name: name.to_string(),
            }),
        }
    }

    /// Current value of a registered parameter, evaluating slaves
    pub fn value_of(&self, name: &str) -> Result<EvalValue, EvalError> {
        let expr = crate::expr::Expr::symbol(name);
        eval_param_expr(&expr, self, &EvalOptions::new().include_derivatives(true))
    }

    /// Serialize the registry to a JSON string
    ///
    /// # Examples
    ///
    /// ```
    /// use modelparams_rs::parameters::{ScalarParam, SymbolRegistry};
    ///
    /// let mut registry = SymbolRegistry::new();
    /// registry
    ///     .register(ScalarParam::new(1.5).unwrap().with_unit("ms").with_name("dt").unwrap())
    ///     .unwrap();
    ///
    /// let json = registry.to_json().unwrap();
    /// let loaded = SymbolRegistry::from_json(&json).unwrap();
    /// assert_eq!(loaded, registry);
    /// ```
    pub fn to_json(&self) -> Result<String, SerializationError> {
        let json = serde_json::to_string_pretty(self)?;
        Ok(json)
    }

    /// Load a registry from JSON; every value is type and range checked.
    pub fn from_json(json: &str) -> Result<Self, SerializationError> {
        let registry: SymbolRegistry = serde_json::from_str(json)?;
        if let Some((key, param)) = registry.iter().find(|(key, param)| param.name() != *key) {
            return Err(SerializationError::NameMismatch {
                key: key.to_string(),
                name: param.name().to_string(),
            });
        }
        Ok(registry)
    }

    /// Save the registry to a JSON file
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), SerializationError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load a registry from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, SerializationError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        Self::from_json(&contents)
    }
}

fn registered_name(param: &RegisteredParam) -> Result<String, ParameterError> {
    match param.name() {
        "" => Err(ParameterError::Unnamed),
        name => Ok(name.to_string()),
    }
}
