use thiserror::Error;

use crate::eval::EvalError;
use crate::expr::ExprError;
use crate::parameters::{ParameterError, SerializationError};
use crate::printer::RenderError;
use crate::units::UnitError;

/// Error types for the modelparams-rs library.
///
/// Every module reports its own error enum; this type unifies them so that
/// callers crossing module boundaries can use a single `?`.
#[derive(Error, Debug)]
pub enum ModelParamsError {
    /// Error while building or parsing an expression.
    #[error(transparent)]
    Expr(#[from] ExprError),

    /// Error while rendering an expression for a target dialect.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Error while creating, naming or assigning a parameter.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Error in unit parsing, conversion or unit arithmetic.
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// Error while evaluating a derived expression.
    #[error(transparent)]
    Eval(#[from] EvalError),

    /// Error while persisting a registry.
    #[error(transparent)]
    Serialization(#[from] SerializationError),
}

/// Coarse classification of errors, mirroring the split between a value of
/// the wrong type, a value of the right type but outside what is allowed,
/// and operations a target cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong type, assignment to a read-only parameter, or a rename.
    TypeError,
    /// Right type, illegal value.
    ValueError,
    /// The operation or construct is not supported.
    Unsupported,
}

impl ModelParamsError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelParamsError::Expr(_) => ErrorKind::ValueError,
            ModelParamsError::Render(_) => ErrorKind::ValueError,
            ModelParamsError::Parameter(err) => err.kind(),
            ModelParamsError::Unit(err) => err.kind(),
            ModelParamsError::Eval(err) => err.kind(),
            ModelParamsError::Serialization(_) => ErrorKind::ValueError,
        }
    }
}

/// Result type alias for modelparams-rs operations.
pub type Result<T> = std::result::Result<T, ModelParamsError>;
