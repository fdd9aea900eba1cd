//! Tests for ScalarParam, ArrayParam and SlaveParam

use modelparams_rs::eval::EvalValue;
use modelparams_rs::expr::Expr;
use modelparams_rs::parameters::{
    ArrayAssign, ArrayParam, Parameter, ParameterError, Range, ScalarParam, SlaveParam,
    SymbolRegistry, Value,
};
use approx::assert_relative_eq;

use crate::test_helpers::{array_approx_eq, init_logging};

#[test]
fn test_scalar_range() {
    init_logging();
    let mut p = ScalarParam::new(1.0)
        .unwrap()
        .with_range(Range::new().ge(0.0).lt(10.0))
        .unwrap()
        .with_unit("ms")
        .with_name("dt")
        .unwrap();

    p.set_value(5).unwrap();
    assert_eq!(p.value_f64(), 5.0);
    assert!(p.set_value(10.0).is_err());
    assert!(p.set_value(-1.0).is_err());
    assert_eq!(p.value_f64(), 5.0);
    assert_eq!(p.unit(), "ms");
}

#[test]
fn test_scalar_rejects_non_numeric() {
    assert!(matches!(
        ScalarParam::new("x"),
        Err(ParameterError::NotNumeric { .. })
    ));
}

#[test]
fn test_scalar_unit_conversion() {
    let p = ScalarParam::new(1.5).unwrap().with_unit("s");
    let ms = p.convert_to("ms").unwrap();
    assert_relative_eq!(ms.value_f64(), 1500.0);
    assert_eq!(ms.unit(), "ms");
    assert!(p.convert_to("mV").is_err());

    let mut target = ScalarParam::new(1.0).unwrap().with_unit("ms");
    target.update(&ScalarParam::new(0.25).unwrap().with_unit("s")).unwrap();
    assert_relative_eq!(target.value_f64(), 250.0);
}

#[test]
fn test_array_assignment() {
    let mut a = ArrayParam::new(vec![1.0, 2.0, 3.0])
        .unwrap()
        .with_range(Range::new().ge(0.0))
        .unwrap();

    a.set_value(0.5).unwrap();
    assert!(array_approx_eq(a.values(), &[0.5, 0.5, 0.5], 1e-12));

    a.set_value(ArrayAssign::Point(1, 4.0)).unwrap();
    assert_eq!(a.get(1), Some(4.0));

    a.set_value(vec![1.0, 2.0, 3.0]).unwrap();
    assert!(matches!(
        a.set_value(vec![1.0, 2.0]),
        Err(ParameterError::SizeMismatch { expected: 3, got: 2 })
    ));
    assert!(matches!(
        a.set_value(ArrayAssign::Point(7, 1.0)),
        Err(ParameterError::IndexOutOfBounds { .. })
    ));

    // A failed write leaves the array intact
    assert!(a.set_value(vec![1.0, -2.0, 3.0]).is_err());
    assert!(array_approx_eq(a.values(), &[1.0, 2.0, 3.0], 1e-12));
}

#[test]
fn test_array_resize_and_display() {
    let mut a = ArrayParam::new(vec![1.0, 2.0]).unwrap();
    a.resize(5).unwrap();
    assert!(array_approx_eq(a.values(), &[1.0, 2.0, 1.0, 2.0, 1.0], 1e-12));
    assert!(a.resize(0).is_err());

    let long = ArrayParam::new(vec![1.0, 2.0, 3.0, 4.0, 5.0])
        .unwrap()
        .with_range(Range::new().ge(0.0))
        .unwrap();
    assert_eq!(long.to_string(), "[1, 2, ..., 4, 5] ∈ [0, ∞]");
}

#[test]
fn test_slave_is_read_only() {
    let mut s = SlaveParam::new(Expr::symbol("a") * 2).with_name("s").unwrap();
    assert!(matches!(
        s.set_value(1.0),
        Err(ParameterError::ReadOnly { .. })
    ));
    assert_eq!(s.name(), "s");
}

#[test]
fn test_slave_live_update() {
    let mut registry = SymbolRegistry::new();
    let p = registry
        .register(ScalarParam::new(2.0).unwrap().with_name("p").unwrap())
        .unwrap();
    let q = registry
        .register(ScalarParam::new(3.0).unwrap().with_name("q").unwrap())
        .unwrap();
    let s = SlaveParam::new(p + q);

    assert_eq!(s.value(&registry).unwrap(), EvalValue::Scalar(5.0));
    registry.set_value("p", 10.0).unwrap();
    assert_eq!(s.value(&registry).unwrap(), EvalValue::Scalar(13.0));
    assert_eq!(s.format_data(&registry, 0).unwrap(), "13.0 - SlaveParam(p + q)");
}

#[test]
fn test_slave_array_size_mismatch() {
    let mut registry = SymbolRegistry::new();
    let a = registry
        .register(ArrayParam::new(vec![1.0, 2.0]).unwrap().with_name("a").unwrap())
        .unwrap();
    let b = registry
        .register(ArrayParam::new(vec![1.0, 2.0, 3.0]).unwrap().with_name("b").unwrap())
        .unwrap();
    let s = SlaveParam::new(a * b);
    let err = s.value(&registry).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected all ArrayParams in an expression to be of equal size."
    );
}

#[test]
fn test_array_stores_only_arrays() {
    let mut a = ArrayParam::new(vec![1.0, 2.0]).unwrap().with_name("a").unwrap();

    // The generic check never lets a scalar replace the array
    let err = a.param().check(Value::Float(2.0)).unwrap_err();
    assert!(matches!(err, ParameterError::TypeMismatch { .. }));
    assert!(a.param().check(Value::from(vec![3.0, 4.0])).is_ok());

    // Broadcasting goes through set_value
    a.set_value(2.0).unwrap();
    assert_eq!(a.len(), 2);
    assert_eq!(a.values().to_vec(), vec![2.0, 2.0]);
}
