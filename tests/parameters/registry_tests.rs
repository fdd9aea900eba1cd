//! Tests for the SymbolRegistry

use modelparams_rs::parameters::{
    ArrayParam, ParameterError, Range, RegisteredParam, ScalarParam, SerializationError,
    SlaveParam, SymbolRegistry,
};
use modelparams_rs::expr::Expr;
use modelparams_rs::EvalValue;

use crate::test_helpers::init_logging;

fn named(name: &str, value: f64) -> ScalarParam {
    ScalarParam::new(value).unwrap().with_name(name).unwrap()
}

#[test]
fn test_registration() {
    let mut registry = SymbolRegistry::new();
    let sym = registry.register(named("a", 1.0)).unwrap();
    assert_eq!(sym.name(), "a");

    assert_eq!(
        registry.register(named("a", 2.0)).unwrap_err(),
        ParameterError::DuplicateSymbol {
            name: "a".to_string()
        }
    );
    assert_eq!(
        registry.register(ScalarParam::new(1.0).unwrap()).unwrap_err(),
        ParameterError::Unnamed
    );
}

#[test]
fn test_replace_is_last_writer_wins() {
    init_logging();
    let mut registry = SymbolRegistry::new();
    registry.register(named("a", 1.0)).unwrap();
    let previous = registry.replace(named("a", 2.0)).unwrap();
    assert!(matches!(previous, Some(RegisteredParam::Scalar(_))));
    assert_eq!(registry.value_of("a").unwrap(), EvalValue::Scalar(2.0));
}

#[test]
fn test_values_through_registry() {
    let mut registry = SymbolRegistry::new();
    registry.register(named("a", 1.0)).unwrap();
    registry
        .register(ArrayParam::new(vec![1.0, 2.0]).unwrap().with_name("v").unwrap())
        .unwrap();
    registry
        .register(SlaveParam::new(Expr::symbol("a") * Expr::symbol("v")).with_name("s").unwrap())
        .unwrap();

    registry.set_value("a", 3.0).unwrap();
    let s = registry.value_of("s").unwrap();
    assert_eq!(s.as_array().unwrap().to_vec(), vec![3.0, 6.0]);

    assert!(matches!(
        registry.set_value("s", 1.0),
        Err(ParameterError::ReadOnly { .. })
    ));
    assert!(matches!(
        registry.set_value("missing", 1.0),
        Err(ParameterError::NotFound { .. })
    ));
}

#[test]
fn test_json_round_trip() {
    let mut registry = SymbolRegistry::new();
    registry
        .register(named("dt", 0.1).with_unit("ms").with_description("time step"))
        .unwrap();
    registry
        .register(SlaveParam::new(Expr::symbol("dt") * 2).with_name("two_dt").unwrap())
        .unwrap();

    let json = registry.to_json().unwrap();
    let loaded = SymbolRegistry::from_json(&json).unwrap();
    assert_eq!(loaded, registry);
    assert_eq!(loaded.names().collect::<Vec<_>>(), vec!["dt", "two_dt"]);

    assert!(SymbolRegistry::from_json("{not json").is_err());
}

#[test]
fn test_json_keeps_non_finite_values() {
    let mut registry = SymbolRegistry::new();
    registry.register(named("t_end", f64::INFINITY)).unwrap();
    registry.register(named("floor", f64::NEG_INFINITY)).unwrap();
    registry
        .register(
            ArrayParam::new(vec![0.0, f64::INFINITY])
                .unwrap()
                .with_name("limits")
                .unwrap(),
        )
        .unwrap();

    let json = registry.to_json().unwrap();
    assert!(json.contains("\"inf\""));
    let loaded = SymbolRegistry::from_json(&json).unwrap();
    assert_eq!(loaded, registry);
    assert_eq!(loaded.value_of("t_end").unwrap(), EvalValue::Scalar(f64::INFINITY));
}

#[test]
fn test_json_values_are_checked() {
    let mut registry = SymbolRegistry::new();
    registry
        .register(ArrayParam::new(vec![1.0, 2.0]).unwrap().with_name("v").unwrap())
        .unwrap();
    registry
        .register(
            named("g", 1.0)
                .with_range(Range::new().ge(0.0))
                .unwrap(),
        )
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&registry.to_json().unwrap()).unwrap();

    // A number where the array belongs
    let mut scalar_in_array = json.clone();
    scalar_in_array["v"]["Array"]["scalar"]["param"]["value"] = serde_json::json!(2.0);
    let err = SymbolRegistry::from_json(&scalar_in_array.to_string()).unwrap_err();
    assert!(matches!(err, SerializationError::JsonError(_)));

    // An empty array
    let mut empty = json.clone();
    empty["v"]["Array"]["scalar"]["param"]["value"] = serde_json::json!([]);
    assert!(SymbolRegistry::from_json(&empty.to_string()).is_err());

    // A value outside the stored range
    let mut out_of_range = json.clone();
    out_of_range["g"]["Scalar"]["param"]["value"] = serde_json::json!(-1.0);
    assert!(SymbolRegistry::from_json(&out_of_range.to_string()).is_err());

    // A parameter stored under another name
    let mut renamed = json.clone();
    renamed["g"]["Scalar"]["param"]["name"] = serde_json::json!("h");
    let err = SymbolRegistry::from_json(&renamed.to_string()).unwrap_err();
    assert!(matches!(err, SerializationError::NameMismatch { .. }));

    assert_eq!(SymbolRegistry::from_json(&json.to_string()).unwrap(), registry);
}
