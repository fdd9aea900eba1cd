//! # Parameter System
//!
//! Typed, validated parameters for model code, and the registry through
//! which expressions refer to them.
//!
//! ## Key Features
//!
//! - **Typed values**: the value type is fixed at construction; assignments
//!   are coerced between `int` and `float` and checked
//! - **Checks**: option sets, constants, and `ge`/`le`/`gt`/`lt` ranges
//! - **Units**: scalar and array parameters carry a unit string used by
//!   unit-aware arithmetic
//! - **Derived parameters**: a [`SlaveParam`] is an expression of other
//!   parameters, recomputed on every read
//! - **Round trips**: every parameter has a `repr` that [`from_repr`] reads
//!   back, and the registry persists to JSON with serde
//!
//! ## Core Components
//!
//! - [`Param`], [`OptionParam`], [`ConstParam`]: general values
//! - [`ScalarParam`], [`ArrayParam`]: numeric values with range and unit
//! - [`SlaveParam`]: computed values
//! - [`SymbolRegistry`]: names to parameters, consulted by the evaluator
//!
//! ## Example Usage
//!
//! ```rust
//! use modelparams_rs::parameters::{Range, ScalarParam, SlaveParam, SymbolRegistry};
//!
//! let mut registry = SymbolRegistry::new();
//!
//! let g = registry
//!     .register(
//!         ScalarParam::new(0.3)
//!             .unwrap()
//!             .with_range(Range::new().ge(0.0))
//!             .unwrap()
//!             .with_name("g")
//!             .unwrap(),
//!     )
//!     .unwrap();
//! let e = registry
//!     .register(ScalarParam::new(-77.0).unwrap().with_unit("mV").with_name("E").unwrap())
//!     .unwrap();
//!
//! let current = SlaveParam::new(g * e);
//! let value = current.value(&registry).unwrap().as_f64().unwrap();
//! assert!((value + 23.1).abs() < 1e-12);
//!
//! // Range checks apply to every assignment
//! assert!(registry.set_value("g", -1.0).is_err());
//! ```

pub mod array;
pub mod param;
pub mod range;
pub mod registry;
pub mod repr;
pub mod scalar;
pub mod slave;
pub mod value;


// Re-export key types
pub use array::{ArrayAssign, ArrayParam};
pub use param::{Check, ConstParam, OptionParam, Param, ParamKind, Parameter, ParameterError, ReprOptions};
pub use range::{Range, RangeError};
pub use registry::{RegisteredParam, SerializationError, SymbolRegistry};
pub use repr::{from_repr, AnyParam};
pub use scalar::ScalarParam;
pub use slave::SlaveParam;
pub use value::{Value, ValueType};
