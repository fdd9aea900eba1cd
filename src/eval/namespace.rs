//! Function namespaces available to rendered code
//!
//! Scalar expressions are rendered for, and evaluated in, the `math`
//! namespace; expressions over arrays use the `np` namespace, whose
//! functions apply elementwise. A few unqualified builtins (`abs`, `max`,
//! `min`, `pow`) are available in both.

use crate::eval::{EvalError, EvalValue};

/// Which namespace evaluates a rendered expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionNamespace {
    Math,
    NumPy,
}

/// One-argument functions shared by both namespaces
fn unary_function(name: &str) -> Option<fn(f64) -> f64> {
    let f: fn(f64) -> f64 = match name {
        "sin" => f64::sin,
        "cos" => f64::cos,
        "tan" => f64::tan,
        "asin" => f64::asin,
        "acos" => f64::acos,
        "atan" => f64::atan,
        "sinh" => f64::sinh,
        "cosh" => f64::cosh,
        "tanh" => f64::tanh,
        "asinh" => f64::asinh,
        "acosh" => f64::acosh,
        "atanh" => f64::atanh,
        "exp" => f64::exp,
        "log" => f64::ln,
        "log10" => f64::log10,
        "sqrt" => f64::sqrt,
        "floor" => f64::floor,
        "ceil" => f64::ceil,
        "erf" => libm::erf,
        "erfc" => libm::erfc,
        _ => return None,
    };
    Some(f)
}

/// Two-argument functions shared by both namespaces
fn binary_function(name: &str) -> Option<fn(f64, f64) -> f64> {
    let f: fn(f64, f64) -> f64 = match name {
        "atan2" => f64::atan2,
        "pow" => f64::powf,
        "fmod" => |x, y| x % y,
        "copysign" => f64::copysign,
        _ => return None,
    };
    Some(f)
}

/// Sign with `sign(0) == 0`
fn sign(x: f64) -> f64 {
    if x == 0.0 || x.is_nan() {
        x
    } else {
        x.signum()
    }
}

fn expect_args<'v>(
    function: &str,
    args: &'v [EvalValue],
    expected: usize,
) -> Result<&'v [EvalValue], EvalError> {
    if args.len() == expected {
        Ok(args)
    } else {
        Err(EvalError::Arity {
            function: function.to_string(),
            expected,
            got: args.len(),
        })
    }
}

impl FunctionNamespace {
    /// `NumPy` as soon as any value is an array
    pub fn for_values<'a>(values: impl IntoIterator<Item = &'a EvalValue>) -> Self {
        if values.into_iter().any(EvalValue::is_array) {
            FunctionNamespace::NumPy
        } else {
            FunctionNamespace::Math
        }
    }

    /// Printer dialect whose output this namespace evaluates
    pub fn dialect(&self) -> &'static str {
        match self {
            FunctionNamespace::Math => "math",
            FunctionNamespace::NumPy => "np",
        }
    }

    /// Name without the namespace qualifier, if it carries one
    fn unqualified<'n>(&self, name: &'n str) -> Option<&'n str> {
        match self {
            FunctionNamespace::Math => name.strip_prefix("math."),
            FunctionNamespace::NumPy => name
                .strip_prefix("np.")
                .or_else(|| name.strip_prefix("numpy.")),
        }
    }

    /// Value of a qualified constant such as `math.pi`
    pub fn constant(&self, name: &str) -> Option<f64> {
        match self.unqualified(name)? {
            "pi" => Some(std::f64::consts::PI),
            "e" => Some(std::f64::consts::E),
            "inf" => Some(f64::INFINITY),
            "nan" => Some(f64::NAN),
            _ => None,
        }
    }

    /// Call the function `name` as written in rendered code.
    ///
    /// # Errors
    ///
    /// * [`EvalError::UndefinedFunction`] for names the namespace lacks
    /// * [`EvalError::Arity`] for a wrong number of arguments
    /// * [`EvalError::InvalidArgument`] for `math` functions given arrays or
    ///   arguments outside their domain
    pub fn call(&self, name: &str, args: &[EvalValue]) -> Result<EvalValue, EvalError> {
        match self.unqualified(name) {
            Some(function) => self.call_qualified(name, function, args),
            None => call_builtin(name, args),
        }
    }

    fn call_qualified(
        &self,
        name: &str,
        function: &str,
        args: &[EvalValue],
    ) -> Result<EvalValue, EvalError> {
        if let Some(f) = unary_function(function) {
            let args = expect_args(name, args, 1)?;
            return self.checked(name, args, args[0].map(f));
        }
        if let Some(f) = binary_function(function) {
            let args = expect_args(name, args, 2)?;
            let result = args[0].zip_with(&args[1], f)?;
            return self.checked(name, args, result);
        }
        match (self, function) {
            (FunctionNamespace::Math, "fabs") | (FunctionNamespace::NumPy, "abs") => {
                let args = expect_args(name, args, 1)?;
                self.checked(name, args, args[0].map(f64::abs))
            }
            (FunctionNamespace::NumPy, "sign") => {
                let args = expect_args(name, args, 1)?;
                Ok(args[0].map(sign))
            }
            (FunctionNamespace::NumPy, "all") => {
                let args = expect_args(name, args, 1)?;
                Ok(EvalValue::Bool(args[0].all()))
            }
            _ => Err(EvalError::UndefinedFunction {
                name: name.to_string(),
            }),
        }
    }

    /// `math` functions take scalars only and reject results outside the
    /// real domain; `np` functions propagate `nan` and `inf`.
    fn checked(
        &self,
        name: &str,
        args: &[EvalValue],
        result: EvalValue,
    ) -> Result<EvalValue, EvalError> {
        if *self == FunctionNamespace::NumPy {
            return Ok(result);
        }
        if let Some(array) = args.iter().find(|a| a.is_array()) {
            return Err(EvalError::InvalidArgument {
                function: name.to_string(),
                message: format!("must be real number, not {}", array.type_name()),
            });
        }
        let inputs_nan = args.iter().any(EvalValue::has_nan);
        let inputs_finite = args.iter().all(EvalValue::is_finite);
        if result.has_nan() && !inputs_nan {
            return Err(EvalError::InvalidArgument {
                function: name.to_string(),
                message: "math domain error".to_string(),
            });
        }
        if !result.is_finite() && inputs_finite && !result.has_nan() {
            return Err(EvalError::InvalidArgument {
                function: name.to_string(),
                message: "math range error".to_string(),
            });
        }
        Ok(result)
    }
}

/// Unqualified builtins
fn call_builtin(name: &str, args: &[EvalValue]) -> Result<EvalValue, EvalError> {
    match name {
        "abs" => {
            let args = expect_args(name, args, 1)?;
            Ok(args[0].map(f64::abs))
        }
        "pow" => {
            let args = expect_args(name, args, 2)?;
            args[0].zip_with(&args[1], f64::powf)
        }
        "max" | "min" => {
            if args.is_empty() {
                return Err(EvalError::Arity {
                    function: name.to_string(),
                    expected: 1,
                    got: 0,
                });
            }
            let mut best: Option<f64> = None;
            for arg in args {
                if arg.is_array() {
                    return Err(EvalError::AmbiguousTruth);
                }
                let value = arg.as_f64().unwrap_or(f64::NAN);
                best = Some(match best {
                    None => value,
                    Some(current) if name == "max" && value > current => value,
                    Some(current) if name == "min" && value < current => value,
                    Some(current) => current,
                });
            }
            Ok(EvalValue::Scalar(best.unwrap_or(f64::NAN)))
        }
        _ => Err(EvalError::UndefinedFunction {
            name: name.to_string(),
        }),
    }
}
