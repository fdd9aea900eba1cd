//! Reading parameters back from their `repr` text
//!
//! `repr` produces constructor-call text such as
//! `ScalarParam(1.0, ge=0.0, unit='ms', name='dt')`. [`from_repr`] parses
//! any such text into the matching parameter type.

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag},
    character::complete::{char, multispace0},
    combinator::{all_consuming, map, opt, value},
    multi::separated_list0,
    number::complete::recognize_float,
    sequence::delimited,
    IResult, Parser,
};
use ndarray::Array1;

use crate::expr::parse_expr;
use crate::parameters::array::ArrayParam;
use crate::parameters::param::sealed::ParamAccess;
use crate::parameters::param::{ConstParam, OptionParam, Param, Parameter, ParameterError};
use crate::parameters::range::Range;
use crate::parameters::scalar::ScalarParam;
use crate::parameters::slave::SlaveParam;
use crate::parameters::value::Value;

/// Any parameter variant
#[derive(Debug, Clone, PartialEq)]
pub enum AnyParam {
    Param(Param),
    Option(OptionParam),
    Const(ConstParam),
    Scalar(ScalarParam),
    Array(ArrayParam),
    Slave(SlaveParam),
}

impl AnyParam {
    pub fn as_parameter(&self) -> &dyn Parameter {
        match self {
            AnyParam::Param(p) => p,
            AnyParam::Option(p) => p,
            AnyParam::Const(p) => p,
            AnyParam::Scalar(p) => p,
            AnyParam::Array(p) => p,
            AnyParam::Slave(p) => p,
        }
    }

    pub fn repr(&self) -> String {
        self.as_parameter().repr()
    }
}

/// Parse the output of `repr` back into a parameter.
///
/// # Examples
///
/// ```
/// use modelparams_rs::parameters::{from_repr, AnyParam, Parameter, Range, ScalarParam};
///
/// let param = ScalarParam::new(1.0)
///     .unwrap()
///     .with_range(Range::new().ge(0.0))
///     .unwrap()
///     .with_unit("ms")
///     .with_name("dt")
///     .unwrap();
///
/// let parsed = from_repr(&param.repr()).unwrap();
/// assert_eq!(parsed, AnyParam::Scalar(param));
/// ```
pub fn from_repr(text: &str) -> Result<AnyParam, ParameterError> {
    let text = text.trim();
    let open = text.find('(').ok_or_else(|| repr_error("expected a constructor call"))?;
    if !text.ends_with(')') {
        return Err(repr_error("expected a closing parenthesis"));
    }
    let kind = &text[..open];
    let args = split_args(&text[open + 1..text.len() - 1])?;

    let mut positional = Vec::new();
    let mut keywords = Keywords::default();
    for arg in args {
        match keyword_split(arg) {
            Some((key, raw)) => keywords.set(key, raw)?,
            None if keywords.is_empty() => positional.push(arg),
            None => return Err(repr_error("positional argument after keyword argument")),
        }
    }

    let first = *positional
        .first()
        .ok_or_else(|| repr_error("missing the value argument"))?;

    let param = match (kind, positional.len()) {
        ("Param", 1) => AnyParam::Param(Param::new(parse_literal(first)?)),
        ("ConstParam", 1) => AnyParam::Const(ConstParam::new(parse_literal(first)?)),
        ("OptionParam", 2) => {
            let options = parse_list(positional[1])?;
            AnyParam::Option(OptionParam::new(parse_literal(first)?, options)?)
        }
        ("ScalarParam", 1) => {
            let param = ScalarParam::new(parse_literal(first)?)?;
            AnyParam::Scalar(keywords.apply_scalar(param)?)
        }
        ("ArrayParam", 1) => {
            let values = match parse_literal(first)? {
                Value::Array(values) => values,
                other => match other.as_f64() {
                    Some(v) => Array1::from(vec![v]),
                    None => return Err(repr_error("expected an array value")),
                },
            };
            let mut param = ArrayParam::from_array(values)?;
            if let Some(range) = keywords.range() {
                param = param.with_range(range)?;
            }
            if let Some(unit) = &keywords.unit {
                param = param.with_unit(unit);
            }
            AnyParam::Array(param)
        }
        ("SlaveParam", 1) => {
            let expr = parse_expr(first).map_err(|err| repr_error(&err.to_string()))?;
            let mut param = SlaveParam::new(expr);
            if let Some(unit) = &keywords.unit {
                param = param.with_unit(unit);
            }
            AnyParam::Slave(param)
        }
        _ => {
            return Err(repr_error(&format!(
                "unexpected constructor '{}' with {} positional arguments",
                kind,
                positional.len()
            )))
        }
    };

    keywords.apply_common(param)
}

fn repr_error(message: &str) -> ParameterError {
    ParameterError::Repr {
        message: message.to_string(),
    }
}

#[derive(Debug, Default)]
struct Keywords {
    ge: Option<f64>,
    le: Option<f64>,
    gt: Option<f64>,
    lt: Option<f64>,
    unit: Option<String>,
    name: Option<String>,
    description: Option<String>,
}

impl Keywords {
    fn is_empty(&self) -> bool {
        self.ge.is_none()
            && self.le.is_none()
            && self.gt.is_none()
            && self.lt.is_none()
            && self.unit.is_none()
            && self.name.is_none()
            && self.description.is_none()
    }

    fn set(&mut self, key: &str, raw: &str) -> Result<(), ParameterError> {
        let literal = parse_literal(raw)?;
        let number = || {
            literal
                .as_f64()
                .ok_or_else(|| repr_error(&format!("expected a number for '{}'", key)))
        };
        let text = || {
            literal
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| repr_error(&format!("expected a string for '{}'", key)))
        };
        match key {
            "ge" => self.ge = Some(number()?),
            "le" => self.le = Some(number()?),
            "gt" => self.gt = Some(number()?),
            "lt" => self.lt = Some(number()?),
            "unit" => self.unit = Some(text()?),
            "name" => self.name = Some(text()?),
            "description" => self.description = Some(text()?),
            other => return Err(repr_error(&format!("unknown keyword '{}'", other))),
        }
        Ok(())
    }

    fn range(&self) -> Option<Range> {
        let mut range = Range::new();
        if let Some(v) = self.ge {
            range = range.ge(v);
        }
        if let Some(v) = self.le {
            range = range.le(v);
        }
        if let Some(v) = self.gt {
            range = range.gt(v);
        }
        if let Some(v) = self.lt {
            range = range.lt(v);
        }
        if range.is_unbounded() {
            None
        } else {
            Some(range)
        }
    }

    fn apply_scalar(&self, mut param: ScalarParam) -> Result<ScalarParam, ParameterError> {
        if let Some(range) = self.range() {
            param = param.with_range(range)?;
        }
        if let Some(unit) = &self.unit {
            param = param.with_unit(unit);
        }
        Ok(param)
    }

    fn apply_common(&self, mut param: AnyParam) -> Result<AnyParam, ParameterError> {
        let param_ref = match &mut param {
            AnyParam::Param(p) => p.param_mut(),
            AnyParam::Option(p) => p.param_mut(),
            AnyParam::Const(p) => p.param_mut(),
            AnyParam::Scalar(p) => p.param_mut(),
            AnyParam::Array(p) => p.param_mut(),
            AnyParam::Slave(p) => p.param_mut(),
        };
        if let Some(name) = &self.name {
            param_ref.set_name(name)?;
        }
        if let Some(description) = &self.description {
            *param_ref = param_ref.clone().with_description(description);
        }
        Ok(param)
    }
}

/// Split at top-level commas, respecting brackets and quotes
fn split_args(text: &str) -> Result<Vec<&str>, ParameterError> {
    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth -= 1,
            ',' if depth == 0 => {
                args.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
        if depth < 0 {
            return Err(repr_error("unbalanced brackets"));
        }
    }
    if depth != 0 || quote.is_some() {
        return Err(repr_error("unbalanced brackets or quotes"));
    }
    let last = text[start..].trim();
    if !last.is_empty() {
        args.push(last);
    }
    Ok(args)
}

/// `key=value` with `key` an identifier
fn keyword_split(arg: &str) -> Option<(&str, &str)> {
    let (key, rest) = arg.split_once('=')?;
    let key = key.trim();
    if rest.starts_with('=') || key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, rest.trim()))
}

fn parse_literal(text: &str) -> Result<Value, ParameterError> {
    all_consuming(delimited(multispace0, literal, multispace0))
        .parse(text)
        .map(|(_, value)| value)
        .map_err(|err| repr_error(&format!("cannot read literal '{}': {}", text, err)))
}

/// A list literal of mixed scalars and strings
fn parse_list(text: &str) -> Result<Vec<Value>, ParameterError> {
    all_consuming(delimited(multispace0, list, multispace0))
        .parse(text)
        .map(|(_, values)| values)
        .map_err(|err| repr_error(&format!("cannot read list '{}': {}", text, err)))
}

fn literal(input: &str) -> IResult<&str, Value> {
    alt((
        value(Value::Bool(true), tag("True")),
        value(Value::Bool(false), tag("False")),
        value(Value::Float(f64::INFINITY), tag("inf")),
        value(Value::Float(f64::NEG_INFINITY), tag("-inf")),
        value(Value::Float(f64::NAN), tag("nan")),
        map(string, Value::Str),
        number,
        array,
    ))
    .parse(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    let (rest, text) = recognize_float(input)?;
    let value = if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().map(Value::Float).ok()
    } else {
        text.parse::<i64>().map(Value::Int).ok()
    };
    match value {
        Some(value) => Ok((rest, value)),
        None => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Float,
        ))),
    }
}

/// Quoted string with backslash escapes
fn string(input: &str) -> IResult<&str, String> {
    delimited(
        char('\''),
        map(
            opt(escaped_transform(
                is_not("\\'"),
                '\\',
                alt((value("\\", tag("\\")), value("'", tag("'")))),
            )),
            Option::unwrap_or_default,
        ),
        char('\''),
    )
    .parse(input)
}

fn list(input: &str) -> IResult<&str, Vec<Value>> {
    delimited(
        char('['),
        separated_list0(
            delimited(multispace0, char(','), multispace0),
            delimited(multispace0, literal, multispace0),
        ),
        char(']'),
    )
    .parse(input)
}

/// A numeric list becomes an array
fn array(input: &str) -> IResult<&str, Value> {
    let (rest, items) = list(input)?;
    let numbers: Option<Vec<f64>> = items
        .iter()
        .map(|item| match item {
            Value::Int(_) | Value::Float(_) => item.as_f64(),
            _ => None,
        })
        .collect();
    match numbers {
        Some(values) if !values.is_empty() => Ok((rest, Value::from(values))),
        _ => Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        ))),
    }
}
