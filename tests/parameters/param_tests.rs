//! Tests for Param, OptionParam and ConstParam

use modelparams_rs::parameters::{ConstParam, OptionParam, Param, ParamKind, ParameterError, Value};
use modelparams_rs::ErrorKind;

#[test]
fn test_param_creation() {
    let p = Param::new(45).with_name("jada").unwrap().with_description("a value");
    assert_eq!(p.name(), "jada");
    assert_eq!(p.description(), "a value");
    assert_eq!(p.value(), &Value::Int(45));
    assert_eq!(p.kind(), ParamKind::Param);
}

#[test]
fn test_value_type_is_fixed() {
    let mut p = Param::new(1.5);

    // Integers are accepted by float parameters
    p.set_value(2).unwrap();
    assert_eq!(p.value(), &Value::Float(2.0));

    let err = p.set_value("text").unwrap_err();
    assert!(matches!(err, ParameterError::TypeMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::TypeError);
    assert_eq!(p.value(), &Value::Float(2.0));
}

#[test]
fn test_option_param() {
    let mut p = OptionParam::new(45, vec![45.into(), 56.into()])
        .unwrap()
        .with_name("bada")
        .unwrap();
    assert_eq!(p.to_string(), "45 ∈ [45, 56]");

    p.set_value(56).unwrap();
    let err = p.set_value(57).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueError);
    assert_eq!(p.value(), &Value::Int(56));

    assert!(matches!(
        OptionParam::new(1, vec![1.into()]),
        Err(ParameterError::InvalidOptions(_))
    ));
}

#[test]
fn test_string_options() {
    let mut p = OptionParam::new("bada", vec!["bada".into(), "wuabba".into()])
        .unwrap()
        .with_name("jada")
        .unwrap();
    let err = p.set_value("snada").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Illegal value 'jada': 'snada' ∉ ['bada', 'wuabba']"
    );
}

#[test]
fn test_const_param() {
    let mut c = ConstParam::new(45).with_name("bada").unwrap();
    assert_eq!(c.to_string(), "45 - Constant");
    c.set_value(45).unwrap();
    let err = c.set_value(56).unwrap_err();
    assert_eq!(err.to_string(), "Illegal value 'bada': 56 != 45");
}

#[test]
fn test_rename_is_rejected() {
    let mut p = Param::new(true).with_name("flag").unwrap();
    let err = p.set_name("other").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
    assert_eq!(p.name(), "flag");
}

#[test]
fn test_int_rejects_non_finite_floats() {
    let mut p = Param::new(3);
    p.set_value(7.9).unwrap();
    assert_eq!(p.value(), &Value::Int(7));

    for value in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN, 1e300] {
        let err = p.set_value(value).unwrap_err();
        assert!(matches!(err, ParameterError::TypeMismatch { .. }));
    }
    assert_eq!(p.value(), &Value::Int(7));
}
