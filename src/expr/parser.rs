//! Text to expression parsing
//!
//! Accepts the operator syntax produced by the sympy and Python dialects of
//! the printer, plus a few spellings from the other dialects (`^`, `&&`,
//! `||`, `~=`). Precedence, loosest first:
//!
//! `a if c else b`, `or`, `and`, relations, `+ -`, `* /`, unary minus,
//! `** ^` (right associative), calls and atoms.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, multispace0},
    combinator::recognize,
    error::{ErrorKind, ParseError},
    multi::many0,
    number::complete::recognize_float,
    sequence::pair,
    IResult, Parser,
};

use super::{BoolOp, Constant, Expr, ExprError, Number, RelOp, Symbol};

/// Parse a symbolic expression.
///
/// Bare `pi`, `E`, `oo` and `nan` are constants, and the constructor calls
/// `Piecewise`, `Conditional`, `ContinuousConditional`, `Eq`/`Ne`/`Lt`/`Le`/
/// `Gt`/`Ge`, `And`/`Or`, `Derivative`, `sqrt` and `pow` build the matching
/// nodes.
///
/// # Examples
///
/// ```
/// use modelparams_rs::expr::{parse_expr, Expr};
///
/// let e = parse_expr("Piecewise((1, x < 0), (x**2, True))").unwrap();
/// assert_eq!(e.to_string(), "Piecewise((1, x < 0), (x**2, True))");
///
/// let e = parse_expr("a - b/c").unwrap();
/// assert_eq!(e.free_symbols().len(), 3);
///
/// assert!(parse_expr("a +").is_err());
/// ```
pub fn parse_expr(input: &str) -> Result<Expr, ExprError> {
    parse_with(input, Mode::Symbolic)
}

/// Parse generated source text.
///
/// Every identifier is a symbol or a function name as written; namespace
/// constants such as `math.pi` stay dotted symbols.
pub(crate) fn parse_code(input: &str) -> Result<Expr, ExprError> {
    parse_with(input, Mode::Code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Symbolic,
    Code,
}

#[derive(Debug)]
enum SyntaxError<'a> {
    Nom(&'a str, ErrorKind),
    Invalid(ExprError),
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        SyntaxError::Nom(input, kind)
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type Res<'a, T> = IResult<&'a str, T, SyntaxError<'a>>;

const KEYWORDS: [&str; 5] = ["if", "else", "and", "or", "not"];

fn parse_with(input: &str, mode: Mode) -> Result<Expr, ExprError> {
    match expression(input, mode) {
        Ok((remainder, expr)) => {
            // Make sure the entire input was consumed
            if remainder.trim().is_empty() {
                Ok(expr)
            } else {
                Err(ExprError::Parse {
                    message: format!("Unexpected trailing characters: '{}'", remainder.trim()),
                })
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(ExprError::Parse {
            message: "incomplete input".to_string(),
        }),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(match e {
            SyntaxError::Invalid(err) => err,
            SyntaxError::Nom(at, kind) => ExprError::Parse {
                message: format!(
                    "unexpected input at position {}: '{}' ({:?})",
                    input.len() - at.len(),
                    at,
                    kind
                ),
            },
        }),
    }
}

fn invalid<'a, T>(err: ExprError) -> Res<'a, T> {
    Err(nom::Err::Failure(SyntaxError::Invalid(err)))
}

fn mismatch<'a, T>(input: &'a str, kind: ErrorKind) -> Res<'a, T> {
    Err(nom::Err::Error(SyntaxError::Nom(input, kind)))
}

fn ws(input: &str) -> Res<'_, &str> {
    multispace0(input)
}

/// Skip whitespace, then match `t`.
fn token<'a>(input: &'a str, t: &'static str) -> Res<'a, &'a str> {
    let (input, _) = ws(input)?;
    tag(t).parse(input)
}

/// Match a whole word.
fn keyword<'a>(input: &'a str, word: &'static str) -> Res<'a, &'a str> {
    let (rest, matched) = token(input, word)?;
    if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
        return mismatch(input, ErrorKind::Tag);
    }
    Ok((rest, matched))
}

/// Parse an identifier, allowing dotted names such as `math.pi`
fn identifier(input: &str) -> Res<'_, &str> {
    let (input, _) = ws(input)?;
    let mut parser = recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_"), tag(".")))),
    ));
    let (rest, name) = parser.parse(input)?;
    if KEYWORDS.contains(&name) {
        return mismatch(input, ErrorKind::Tag);
    }
    Ok((rest, name))
}

/// Parse a numeric literal; integers stay exact
fn number(input: &str) -> Res<'_, Expr> {
    let (input, _) = ws(input)?;
    // Signs belong to the unary layer
    if input.starts_with(['+', '-']) {
        return mismatch(input, ErrorKind::Float);
    }
    let (rest, text) = recognize_float(input)?;

    if text.contains(['.', 'e', 'E']) {
        match text.parse::<f64>() {
            Ok(value) => Ok((rest, Expr::float(value))),
            Err(_) => mismatch(input, ErrorKind::Float),
        }
    } else {
        match text.parse::<i64>() {
            Ok(value) => Ok((rest, Expr::integer(value))),
            Err(_) => match text.parse::<f64>() {
                Ok(value) => Ok((rest, Expr::float(value))),
                Err(_) => mismatch(input, ErrorKind::Digit),
            },
        }
    }
}

fn expression(input: &str, mode: Mode) -> Res<'_, Expr> {
    conditional(input, mode)
}

/// `value if condition else otherwise`
fn conditional(input: &str, mode: Mode) -> Res<'_, Expr> {
    let (input, value) = or_expr(input, mode)?;
    let after_if = match keyword(input, "if") {
        Ok((after_if, _)) => after_if,
        Err(_) => return Ok((input, value)),
    };
    let (rest, condition) = or_expr(after_if, mode)?;
    let (rest, _) = keyword(rest, "else")?;
    let (rest, otherwise) = conditional(rest, mode)?;

    let expr = match condition {
        Expr::Bool(true) => value,
        Expr::Bool(false) => otherwise,
        condition => match otherwise {
            Expr::Piecewise {
                branches,
                otherwise,
            } => {
                let mut all = vec![(value, condition)];
                all.extend(branches);
                Expr::Piecewise {
                    branches: all,
                    otherwise,
                }
            }
            otherwise => Expr::Piecewise {
                branches: vec![(value, condition)],
                otherwise: Box::new(otherwise),
            },
        },
    };
    Ok((rest, expr))
}

fn or_expr(input: &str, mode: Mode) -> Res<'_, Expr> {
    let (mut input, first) = and_expr(input, mode)?;
    let mut operands = vec![first];
    loop {
        let after_op = match token(input, "||")
            .or_else(|_| token(input, "|"))
            .or_else(|_| keyword(input, "or"))
        {
            Ok((after_op, _)) => after_op,
            Err(_) => break,
        };
        let (rest, operand) = and_expr(after_op, mode)?;
        operands.push(operand);
        input = rest;
    }
    Ok((input, Expr::boolean(BoolOp::Or, operands)))
}

fn and_expr(input: &str, mode: Mode) -> Res<'_, Expr> {
    let (mut input, first) = relation(input, mode)?;
    let mut operands = vec![first];
    loop {
        let after_op = match token(input, "&&")
            .or_else(|_| token(input, "&"))
            .or_else(|_| keyword(input, "and"))
        {
            Ok((after_op, _)) => after_op,
            Err(_) => break,
        };
        let (rest, operand) = relation(after_op, mode)?;
        operands.push(operand);
        input = rest;
    }
    Ok((input, Expr::boolean(BoolOp::And, operands)))
}

fn relational_operator(input: &str) -> Res<'_, RelOp> {
    let (input, _) = ws(input)?;
    let (rest, op) = alt((
        tag("=="),
        tag("!="),
        tag("~="),
        tag("<="),
        tag(">="),
        tag("<"),
        tag(">"),
    ))
    .parse(input)?;
    let op = match op {
        "==" => RelOp::Eq,
        "!=" | "~=" => RelOp::Ne,
        "<=" => RelOp::Le,
        ">=" => RelOp::Ge,
        "<" => RelOp::Lt,
        _ => RelOp::Gt,
    };
    Ok((rest, op))
}

fn relation(input: &str, mode: Mode) -> Res<'_, Expr> {
    let (input, lhs) = additive(input, mode)?;
    match relational_operator(input) {
        Ok((after_op, op)) => {
            let (rest, rhs) = additive(after_op, mode)?;
            Ok((rest, Expr::relational(op, lhs, rhs)))
        }
        Err(_) => Ok((input, lhs)),
    }
}

/// Parse an additive expression (expr + expr, expr - expr)
fn additive(input: &str, mode: Mode) -> Res<'_, Expr> {
    let (mut input, first) = term(input, mode)?;
    let mut terms = vec![first];
    loop {
        let (after_op, negate) = match token(input, "+") {
            Ok((after_op, _)) => (after_op, false),
            Err(_) => match token(input, "-") {
                Ok((after_op, _)) => (after_op, true),
                Err(_) => break,
            },
        };
        let (rest, operand) = term(after_op, mode)?;
        terms.push(if negate { operand.negated() } else { operand });
        input = rest;
    }
    Ok((input, Expr::sum(terms)))
}

/// Parse a multiplicative expression (expr * expr, expr / expr)
fn term(input: &str, mode: Mode) -> Res<'_, Expr> {
    let (mut input, first) = unary(input, mode)?;
    let mut factors = vec![first];
    loop {
        let (trimmed, _) = ws(input)?;
        if trimmed.starts_with("**") {
            break;
        }
        let (after_op, divide) = match token(input, "*") {
            Ok((after_op, _)) => (after_op, false),
            Err(_) => match token(input, "/") {
                Ok((after_op, _)) => (after_op, true),
                Err(_) => break,
            },
        };
        let (rest, operand) = unary(after_op, mode)?;
        let operand = if divide { inverse(operand) } else { operand };
        // Exact literals fold, so `-1/2` is the rational `-1/2`
        let folded = match (factors.last(), &operand) {
            (Some(Expr::Number(a)), Expr::Number(b)) => a.mul_exact(b),
            _ => None,
        };
        match folded {
            Some(n) => {
                factors.pop();
                factors.push(Expr::Number(n));
            }
            None => factors.push(operand),
        }
        input = rest;
    }
    Ok((input, Expr::product(factors)))
}

fn inverse(divisor: Expr) -> Expr {
    match divisor {
        Expr::Number(Number::Integer(n)) if n != 0 => match Number::rational(1, n) {
            Ok(inverse) => Expr::Number(inverse),
            Err(_) => Expr::integer(n).pow(-1),
        },
        other => other.pow(-1),
    }
}

/// Parse a unary expression (-expr, +expr)
fn unary(input: &str, mode: Mode) -> Res<'_, Expr> {
    if let Ok((after_op, _)) = token(input, "-") {
        let (rest, operand) = unary(after_op, mode)?;
        return Ok((rest, operand.negated()));
    }
    if let Ok((after_op, _)) = token(input, "+") {
        return unary(after_op, mode);
    }
    power(input, mode)
}

/// Parse a power expression (expr ** expr, expr ^ expr), right associative
fn power(input: &str, mode: Mode) -> Res<'_, Expr> {
    let (input, base) = primary(input, mode)?;
    let after_op = match token(input, "**").or_else(|_| token(input, "^")) {
        Ok((after_op, _)) => after_op,
        Err(_) => return Ok((input, base)),
    };
    let (rest, exponent) = unary(after_op, mode)?;
    Ok((rest, base.pow(exponent)))
}

/// Parse a parenthesized expression
fn parens(input: &str, mode: Mode) -> Res<'_, Expr> {
    let (input, _) = token(input, "(")?;
    let (input, expr) = expression(input, mode)?;
    let (input, _) = token(input, ")")?;
    Ok((input, expr))
}

/// Parse a primary expression (number, call, name or parenthesized expression)
fn primary(input: &str, mode: Mode) -> Res<'_, Expr> {
    if let Ok(result) = number(input) {
        return Ok(result);
    }
    if let Ok((rest, name)) = identifier(input) {
        if let Ok((after_paren, _)) = token(rest, "(") {
            return call(name, after_paren, mode);
        }
        return Ok((rest, name_to_expr(name, mode)));
    }
    parens(input, mode)
}

fn name_to_expr(name: &str, mode: Mode) -> Expr {
    match (name, mode) {
        ("True", _) => Expr::Bool(true),
        ("False", _) => Expr::Bool(false),
        ("pi", Mode::Symbolic) => Expr::Constant(Constant::Pi),
        ("E", Mode::Symbolic) => Expr::Constant(Constant::E),
        ("oo", Mode::Symbolic) => Expr::Constant(Constant::Infinity),
        ("nan", Mode::Symbolic) => Expr::Constant(Constant::NaN),
        _ => Expr::Symbol(Symbol::new(name)),
    }
}

/// Arguments after the opening parenthesis, through the closing one
fn arguments(input: &str, mode: Mode) -> Res<'_, Vec<Expr>> {
    if let Ok((rest, _)) = token(input, ")") {
        return Ok((rest, Vec::new()));
    }
    let (mut input, first) = expression(input, mode)?;
    let mut args = vec![first];
    while let Ok((after_comma, _)) = token(input, ",") {
        let (rest, arg) = expression(after_comma, mode)?;
        args.push(arg);
        input = rest;
    }
    let (input, _) = token(input, ")")?;
    Ok((input, args))
}

/// `(value, condition), ...)` of a Piecewise call
fn piecewise_pairs(input: &str, mode: Mode) -> Res<'_, Vec<(Expr, Expr)>> {
    let mut pairs = Vec::new();
    let mut input = input;
    loop {
        let (rest, _) = token(input, "(")?;
        let (rest, value) = expression(rest, mode)?;
        let (rest, _) = token(rest, ",")?;
        let (rest, condition) = expression(rest, mode)?;
        let (rest, _) = token(rest, ")")?;
        pairs.push((value, condition));
        match token(rest, ",") {
            Ok((after_comma, _)) => input = after_comma,
            Err(_) => {
                input = rest;
                break;
            }
        }
    }
    let (input, _) = token(input, ")")?;
    Ok((input, pairs))
}

fn check_arity(name: &str, expected: &str, got: usize, ok: bool) -> Result<(), ExprError> {
    if ok {
        Ok(())
    } else {
        Err(ExprError::Arity {
            function: name.to_string(),
            expected: expected.to_string(),
            got,
        })
    }
}

fn call<'a>(name: &'a str, input: &'a str, mode: Mode) -> Res<'a, Expr> {
    let (rest, built) = if mode == Mode::Symbolic && name == "Piecewise" {
        let (rest, pairs) = piecewise_pairs(input, mode)?;
        (rest, Expr::piecewise(pairs))
    } else {
        let (rest, args) = arguments(input, mode)?;
        match mode {
            Mode::Code => (rest, Ok(Expr::Function(name.to_string(), args))),
            Mode::Symbolic => (rest, build_call(name, args)),
        }
    };
    match built {
        Ok(expr) => Ok((rest, expr)),
        Err(err) => invalid(err),
    }
}

/// Map constructor calls onto tree nodes; anything else stays a function call.
fn build_call(name: &str, mut args: Vec<Expr>) -> Result<Expr, ExprError> {
    let n = args.len();
    match name {
        "Conditional" => {
            check_arity(name, "3", n, n == 3)?;
            let if_false = args.remove(2);
            let if_true = args.remove(1);
            Expr::conditional(args.remove(0), if_true, if_false)
        }
        "ContinuousConditional" => {
            check_arity(name, "3 or 4", n, n == 3 || n == 4)?;
            let sigma = if n == 4 {
                match args.remove(3) {
                    Expr::Number(sigma) => sigma.to_f64(),
                    _ => {
                        return Err(ExprError::Arity {
                            function: name.to_string(),
                            expected: "a numeric sigma and 4".to_string(),
                            got: n,
                        })
                    }
                }
            } else {
                1.0
            };
            let if_false = args.remove(2);
            let if_true = args.remove(1);
            Expr::continuous_conditional(args.remove(0), if_true, if_false, sigma)
        }
        "Eq" | "Ne" | "Lt" | "Le" | "Gt" | "Ge" => {
            check_arity(name, "2", n, n == 2)?;
            let op = match name {
                "Eq" => RelOp::Eq,
                "Ne" => RelOp::Ne,
                "Lt" => RelOp::Lt,
                "Le" => RelOp::Le,
                "Gt" => RelOp::Gt,
                _ => RelOp::Ge,
            };
            let rhs = args.remove(1);
            Ok(Expr::relational(op, args.remove(0), rhs))
        }
        "And" => Ok(Expr::boolean(BoolOp::And, args)),
        "Or" => Ok(Expr::boolean(BoolOp::Or, args)),
        "sqrt" => {
            check_arity(name, "1", n, n == 1)?;
            Ok(args.remove(0).sqrt())
        }
        "pow" => {
            check_arity(name, "2", n, n == 2)?;
            let exponent = args.remove(1);
            Ok(args.remove(0).pow(exponent))
        }
        "Derivative" => match (args.first(), args.get(1), n) {
            (Some(Expr::Symbol(f)), Some(Expr::Symbol(x)), 2) => {
                Ok(Expr::derivative(f.clone(), x.clone()))
            }
            _ => Err(ExprError::Arity {
                function: name.to_string(),
                expected: "2 symbol".to_string(),
                got: n,
            }),
        },
        _ => Ok(Expr::Function(name.to_string(), args)),
    }
}
