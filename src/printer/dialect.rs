//! Target dialect descriptors
//!
//! A [`Dialect`] is a table of rendering choices: how literals look, how
//! powers, conditionals and relations are spelled, which prefix qualifies
//! math functions, and how individual functions are renamed. The printer
//! reads these tables; no dialect needs its own printer type.

use std::collections::HashMap;
use std::fmt;

use super::RenderError;

/// Source language family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    C,
    Cpp,
    Python,
    Matlab,
    Sympy,
}

/// Namespace prefix used by the Python dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Bare,
    Math,
    Np,
    Numpy,
    Ufl,
}

impl Namespace {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" => Some(Namespace::Bare),
            "math" => Some(Namespace::Math),
            "np" => Some(Namespace::Np),
            "numpy" => Some(Namespace::Numpy),
            "ufl" => Some(Namespace::Ufl),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Namespace::Bare => "",
            Namespace::Math => "math",
            Namespace::Np => "np",
            Namespace::Numpy => "numpy",
            Namespace::Ufl => "ufl",
        }
    }

    /// `"math."`, `"np."`, ... or `""`
    pub fn prefix(&self) -> String {
        match self {
            Namespace::Bare => String::new(),
            other => format!("{}.", other.name()),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How integer literals are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralStyle {
    /// `2` becomes `2.0`
    Decimal,
    AsIs,
}

/// How a general power is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerStyle {
    /// `name(base, exp)`
    Call(String),
    /// `base op exp`
    Operator(&'static str),
}

/// How a piecewise selection is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionalStyle {
    /// `(c ? a : b)`
    Ternary,
    /// `a if c else b`, the condition optionally wrapped in a call
    InlineIf { wrapper: Option<String> },
    /// `name(c, a, b)`
    Call(String),
    /// `((c)*(a) + (1 - (c))*(b))`
    Blend,
    /// `Piecewise((a, c), (b, True))`
    Piecewise,
}

/// How relations are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationalStyle {
    /// `a < b`
    Infix,
    /// `{prefix}lt(a, b)`
    Call(String),
}

/// Rendering rule for a known function
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionRule {
    Rename {
        target: &'static str,
        qualified: bool,
    },
    /// `sign(x)` as `copysign(1, x)`
    CopySign,
    /// Absolute value, choosing the integer variant for integer arguments
    Abs {
        real: &'static str,
        integer: &'static str,
    },
}

const ELEMENTARY: [&str; 21] = [
    "sin", "cos", "tan", "asin", "acos", "atan", "atan2", "sinh", "cosh", "tanh", "asinh",
    "acosh", "atanh", "exp", "log", "log10", "sqrt", "floor", "erf", "erfc", "fmod",
];

/// A rendering target.
///
/// # Examples
///
/// ```
/// use modelparams_rs::printer::{Dialect, Printer};
/// use modelparams_rs::expr::Expr;
///
/// let printer = Printer::new(Dialect::from_name("cpp").unwrap());
/// let e = Expr::func("Max", vec![Expr::symbol("a"), Expr::symbol("b")]);
/// assert_eq!(printer.print(&e).unwrap(), "fmax(a, b)");
///
/// assert!(Dialect::from_name("fortran").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Dialect {
    pub(crate) name: String,
    pub(crate) language: Language,
    pub(crate) namespace: Option<Namespace>,
    pub(crate) prefix: String,
    pub(crate) literals: LiteralStyle,
    pub(crate) power: PowerStyle,
    pub(crate) sqrt: Option<String>,
    pub(crate) expand_powers: bool,
    pub(crate) wrap_power_factors: bool,
    pub(crate) conditional: ConditionalStyle,
    pub(crate) relational: RelationalStyle,
    pub(crate) not_equal: &'static str,
    pub(crate) and_token: &'static str,
    pub(crate) or_token: &'static str,
    pub(crate) boolean_arity: Option<usize>,
    pub(crate) booleans: Option<(&'static str, &'static str)>,
    pub(crate) functions: HashMap<&'static str, FunctionRule>,
    pub(crate) pi: String,
    pub(crate) e: String,
    pub(crate) infinity: String,
    pub(crate) nan: String,
}

fn elementary_functions() -> HashMap<&'static str, FunctionRule> {
    ELEMENTARY
        .iter()
        .map(|&name| {
            (
                name,
                FunctionRule::Rename {
                    target: name,
                    qualified: true,
                },
            )
        })
        .collect()
}

fn rename(target: &'static str, qualified: bool) -> FunctionRule {
    FunctionRule::Rename { target, qualified }
}

impl Dialect {
    fn c_family(name: &str, language: Language, prefix: &str) -> Self {
        let mut functions = elementary_functions();
        functions.insert("max", rename("fmax", false));
        functions.insert("min", rename("fmin", false));
        functions.insert("ceiling", rename("ceil", true));
        functions.insert("ceil", rename("ceil", true));
        functions.insert(
            "abs",
            FunctionRule::Abs {
                real: "fabs",
                integer: "abs",
            },
        );
        functions.insert("sign", FunctionRule::CopySign);

        Self {
            name: name.to_string(),
            language,
            namespace: None,
            prefix: prefix.to_string(),
            literals: LiteralStyle::Decimal,
            power: PowerStyle::Call(format!("{}pow", prefix)),
            sqrt: Some(format!("{}sqrt", prefix)),
            expand_powers: true,
            wrap_power_factors: true,
            conditional: ConditionalStyle::Ternary,
            relational: RelationalStyle::Infix,
            not_equal: "!=",
            and_token: "&&",
            or_token: "||",
            boolean_arity: None,
            booleans: if language == Language::Cpp {
                Some(("true", "false"))
            } else {
                Some(("1", "0"))
            },
            functions,
            pi: "M_PI".to_string(),
            e: "M_E".to_string(),
            infinity: "INFINITY".to_string(),
            nan: "NAN".to_string(),
        }
    }

    /// C99
    pub fn c() -> Self {
        Self::c_family("c", Language::C, "")
    }

    /// C++ with `std::`-qualified math functions
    pub fn cpp() -> Self {
        Self::c_family("cpp", Language::Cpp, "std::")
    }

    /// Python with the given module prefix for math functions
    pub fn python(namespace: Namespace) -> Self {
        let prefix = namespace.prefix();
        let mut functions = elementary_functions();
        functions.insert("max", rename("max", false));
        functions.insert("min", rename("min", false));
        functions.insert("ceiling", rename("ceil", true));
        functions.insert("ceil", rename("ceil", true));
        functions.insert(
            "abs",
            if namespace == Namespace::Math {
                rename("fabs", true)
            } else {
                rename("abs", true)
            },
        );
        match namespace {
            Namespace::Ufl => {
                functions.insert("log", rename("ln", true));
                functions.insert("sign", rename("sign", true));
            }
            Namespace::Bare => {
                functions.insert("sign", rename("sign", false));
            }
            _ => {
                functions.insert("sign", FunctionRule::CopySign);
            }
        }

        let (power, conditional, relational) = match namespace {
            Namespace::Ufl => (
                PowerStyle::Call("ufl.elem_pow".to_string()),
                ConditionalStyle::Call("ufl.conditional".to_string()),
                RelationalStyle::Call("ufl.".to_string()),
            ),
            Namespace::Np | Namespace::Numpy => (
                PowerStyle::Call(format!("{}pow", prefix)),
                ConditionalStyle::InlineIf {
                    wrapper: Some(format!("{}all", prefix)),
                },
                RelationalStyle::Infix,
            ),
            _ => (
                PowerStyle::Call(format!("{}pow", prefix)),
                ConditionalStyle::InlineIf { wrapper: None },
                RelationalStyle::Infix,
            ),
        };

        let (pi, e, infinity, nan) = match namespace {
            Namespace::Bare => (
                "pi".to_string(),
                "E".to_string(),
                "float('inf')".to_string(),
                "float('nan')".to_string(),
            ),
            _ => (
                format!("{}pi", prefix),
                format!("{}e", prefix),
                format!("{}inf", prefix),
                format!("{}nan", prefix),
            ),
        };

        Self {
            name: if namespace == Namespace::Bare {
                "python".to_string()
            } else {
                format!("python ({})", namespace)
            },
            language: Language::Python,
            namespace: Some(namespace),
            literals: if namespace == Namespace::Bare {
                LiteralStyle::AsIs
            } else {
                LiteralStyle::Decimal
            },
            power,
            sqrt: Some(format!("{}sqrt", prefix)),
            expand_powers: true,
            wrap_power_factors: false,
            conditional,
            relational,
            not_equal: "!=",
            and_token: "and",
            or_token: "or",
            boolean_arity: if namespace == Namespace::Ufl {
                Some(2)
            } else {
                None
            },
            booleans: if namespace == Namespace::Ufl {
                None
            } else {
                Some(("True", "False"))
            },
            functions,
            pi,
            e,
            infinity,
            nan,
            prefix,
        }
    }

    /// MATLAB
    pub fn matlab() -> Self {
        let mut functions = elementary_functions();
        functions.insert("max", rename("max", false));
        functions.insert("min", rename("min", false));
        functions.insert("ceiling", rename("ceil", false));
        functions.insert("ceil", rename("ceil", false));
        functions.insert("abs", rename("abs", false));
        functions.insert("sign", rename("sign", false));
        functions.insert("fmod", rename("mod", false));

        Self {
            name: "matlab".to_string(),
            language: Language::Matlab,
            namespace: None,
            prefix: String::new(),
            literals: LiteralStyle::AsIs,
            power: PowerStyle::Operator("^"),
            sqrt: Some("sqrt".to_string()),
            expand_powers: true,
            wrap_power_factors: false,
            conditional: ConditionalStyle::Blend,
            relational: RelationalStyle::Infix,
            not_equal: "~=",
            and_token: "&",
            or_token: "|",
            boolean_arity: None,
            booleans: Some(("true", "false")),
            functions,
            pi: "pi".to_string(),
            e: "exp(1)".to_string(),
            infinity: "Inf".to_string(),
            nan: "NaN".to_string(),
        }
    }

    /// Octave, rendered like MATLAB
    pub fn octave() -> Self {
        Self {
            name: "octave".to_string(),
            ..Self::matlab()
        }
    }

    /// Sympy's own string form; reads back with [`crate::expr::parse_expr`]
    pub fn sympy() -> Self {
        Self {
            name: "sympy".to_string(),
            language: Language::Sympy,
            namespace: None,
            prefix: String::new(),
            literals: LiteralStyle::AsIs,
            power: PowerStyle::Operator("**"),
            sqrt: None,
            expand_powers: false,
            wrap_power_factors: false,
            conditional: ConditionalStyle::Piecewise,
            relational: RelationalStyle::Infix,
            not_equal: "!=",
            and_token: "&",
            or_token: "|",
            boolean_arity: None,
            booleans: Some(("True", "False")),
            functions: HashMap::new(),
            pi: "pi".to_string(),
            e: "E".to_string(),
            infinity: "oo".to_string(),
            nan: "nan".to_string(),
        }
    }

    /// Look up a dialect by name.
    ///
    /// Accepts `c`, `cpp`/`c++`, `matlab`, `octave`, `sympy`, `python`, and the
    /// Python namespaces `""`, `math`, `np`, `numpy`, `ufl`.
    pub fn from_name(name: &str) -> Result<Self, RenderError> {
        match name.to_ascii_lowercase().as_str() {
            "c" => Ok(Self::c()),
            "cpp" | "c++" => Ok(Self::cpp()),
            "matlab" => Ok(Self::matlab()),
            "octave" => Ok(Self::octave()),
            "sympy" => Ok(Self::sympy()),
            "python" => Ok(Self::python(Namespace::Bare)),
            other => Namespace::from_name(other)
                .map(Self::python)
                .ok_or_else(|| RenderError::UnknownDialect(name.to_string())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Python namespace, if this is a Python dialect
    pub fn namespace(&self) -> Option<Namespace> {
        self.namespace
    }

    /// Qualifier placed before math function names
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The literal one
    pub fn one(&self) -> &'static str {
        match self.literals {
            LiteralStyle::Decimal => "1.0",
            LiteralStyle::AsIs => "1",
        }
    }

    /// Rule for a function name, matched case-insensitively.
    pub fn function_rule(&self, name: &str) -> Option<&FunctionRule> {
        self.functions.get(name.to_ascii_lowercase().as_str())
    }

    /// `target = value` in every language.
    pub fn assignment(&self, target: &str, value: &str) -> String {
        format!("{} = {}", target, value)
    }
}
