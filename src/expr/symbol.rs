//! Named leaves of the expression tree

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named symbol.
///
/// A symbol with an empty name is a placeholder ("dummy") used by
/// parameters that have not been named yet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol {
    name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Placeholder symbol for an unnamed parameter.
    pub fn dummy() -> Self {
        Self {
            name: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_dummy(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "_dummy")
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

/// Name under which the derivative `d f / d x` is looked up and rendered.
///
/// ```
/// use modelparams_rs::expr::{derivative_name, Symbol};
///
/// assert_eq!(derivative_name(&Symbol::new("V"), &Symbol::new("t")), "dV_dt");
/// ```
pub fn derivative_name(f: &Symbol, x: &Symbol) -> String {
    format!("d{}_d{}", f.name(), x.name())
}
