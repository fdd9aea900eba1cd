//! # modelparams-rs
//!
//! `modelparams-rs` couples a small symbolic expression engine with a
//! parameter model for numerical simulation code.
//!
//! The library provides:
//! - An expression tree with a parser, operator overloads and tree queries
//! - A code printer rendering expressions as C, C++, Python (bare, `math`,
//!   `np`/`numpy`, `ufl` namespaces) and MATLAB/Octave source text
//! - Typed, validated parameters (`Param`, `OptionParam`, `ConstParam`,
//!   `ScalarParam`, `ArrayParam`, `SlaveParam`) with units and ranges
//! - A symbol registry and a dependency evaluator that computes derived
//!   parameters by rendering and interpreting their expressions
//! - Unit-aware arithmetic between scalar parameters
//!
//! ## Basic Usage
//!
//! ```
//! use modelparams_rs::expr::{Expr, Symbol};
//! use modelparams_rs::printer::{ccode, pythoncode};
//!
//! let x = Expr::from(Symbol::new("x"));
//! let expr = Expr::piecewise(vec![
//!     (Expr::from(1), x.clone().lt(0)),
//!     (x.clone().pow(2), Expr::from(true)),
//! ])
//! .unwrap();
//!
//! assert_eq!(ccode(&expr, None).unwrap(), "(x < 0 ? 1.0 : (x)*(x))");
//! assert_eq!(pythoncode(&expr, None, "math").unwrap(), "1.0 if x < 0 else x*x");
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod eval;
pub mod expr;
pub mod parameters;
pub mod printer;
pub mod units;

// Re-exports for convenience
pub use config::FormatConfig;
pub use error::{ErrorKind, ModelParamsError, Result};
pub use eval::{eval_param_expr, EvalOptions, EvalValue};
pub use expr::{parse_expr, Expr, Symbol};
pub use parameters::{
    ArrayParam, ConstParam, OptionParam, Param, Parameter, ScalarParam, SlaveParam,
    SymbolRegistry, Value,
};
pub use printer::{Dialect, Printer};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
