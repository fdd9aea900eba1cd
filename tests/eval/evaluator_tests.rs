//! Tests for evaluating expressions over registered parameters

use approx::assert_relative_eq;
use ndarray::Array1;

use modelparams_rs::eval::{
    eval_param_expr, EvalError, EvalOptions, EvalValue, EvaluationContext, FunctionNamespace,
    Interpreter,
};
use modelparams_rs::expr::{parse_expr, Expr};
use modelparams_rs::parameters::{ArrayParam, ScalarParam, SlaveParam, SymbolRegistry};
use modelparams_rs::ErrorKind;

use crate::test_helpers::{array_approx_eq, init_logging};

fn step() -> Expr {
    parse_expr("Piecewise((1, x < 0), (x**2, True))").unwrap()
}

fn with_scalar(name: &str, value: f64) -> SymbolRegistry {
    let mut registry = SymbolRegistry::new();
    registry
        .register(ScalarParam::new(value).unwrap().with_name(name).unwrap())
        .unwrap();
    registry
}

fn with_array(name: &str, values: Vec<f64>) -> SymbolRegistry {
    let mut registry = SymbolRegistry::new();
    registry
        .register(ArrayParam::new(values).unwrap().with_name(name).unwrap())
        .unwrap();
    registry
}

#[test]
fn test_piecewise_over_scalars() {
    init_logging();
    let options = EvalOptions::new();
    let below = eval_param_expr(&step(), &with_scalar("x", -1.0), &options).unwrap();
    assert_eq!(below, EvalValue::Scalar(1.0));
    let above = eval_param_expr(&step(), &with_scalar("x", 3.0), &options).unwrap();
    assert_eq!(above, EvalValue::Scalar(9.0));
}

#[test]
fn test_piecewise_over_arrays_tests_every_element() {
    init_logging();
    let options = EvalOptions::new();

    // Only a condition holding for all elements selects its branch
    let mixed = eval_param_expr(&step(), &with_array("x", vec![-1.0, 2.0]), &options).unwrap();
    assert_eq!(mixed, EvalValue::from(Array1::from(vec![1.0, 4.0])));

    let negative = eval_param_expr(&step(), &with_array("x", vec![-1.0, -2.0]), &options).unwrap();
    assert_eq!(negative, EvalValue::Scalar(1.0));
}

#[test]
fn test_relations_give_bools_or_masks() {
    let e = Expr::symbol("x").lt(1);
    let options = EvalOptions::new();
    assert_eq!(
        eval_param_expr(&e, &with_scalar("x", 0.5), &options).unwrap(),
        EvalValue::Bool(true)
    );
    assert_eq!(
        eval_param_expr(&e, &with_array("x", vec![0.5, 1.5]), &options).unwrap(),
        EvalValue::Mask(Array1::from(vec![true, false]))
    );
}

#[test]
fn test_math_and_numpy_domains() {
    let root = Expr::symbol("x").sqrt();
    let options = EvalOptions::new();

    let err = eval_param_expr(&root, &with_scalar("x", -4.0), &options).unwrap_err();
    assert!(matches!(err, EvalError::InvalidArgument { .. }));
    assert_eq!(err.kind(), ErrorKind::ValueError);

    let value = eval_param_expr(&root, &with_array("x", vec![4.0, -4.0]), &options).unwrap();
    let values = value.as_array().unwrap();
    assert_relative_eq!(values[0], 2.0);
    assert!(values[1].is_nan());
}

#[test]
fn test_elementwise_functions() {
    let e = Expr::func("exp", vec![Expr::symbol("x")]) + Expr::func("Abs", vec![Expr::symbol("x")]);
    let value = eval_param_expr(&e, &with_array("x", vec![0.0, -1.0]), &EvalOptions::new()).unwrap();
    let expected = [1.0, (-1.0f64).exp() + 1.0];
    assert!(array_approx_eq(value.as_array().unwrap(), &expected, 1e-12));
}

#[test]
fn test_division_by_zero() {
    let e = Expr::integer(1) / Expr::symbol("x");
    let err = eval_param_expr(&e, &with_scalar("x", 0.0), &EvalOptions::new()).unwrap_err();
    assert_eq!(err, EvalError::DivisionByZero);
    assert_eq!(err.to_string(), "float division by zero");
}

#[test]
fn test_overrides_switch_namespace() {
    let registry = with_scalar("x", 2.0);
    let e = Expr::symbol("x") * 3;

    let scalar = eval_param_expr(&e, &registry, &EvalOptions::new()).unwrap();
    assert_eq!(scalar, EvalValue::Scalar(6.0));

    let options = EvalOptions::new().with_value("x", Array1::from(vec![1.0, 2.0]));
    let array = eval_param_expr(&e, &registry, &options).unwrap();
    assert_eq!(array, EvalValue::from(Array1::from(vec![3.0, 6.0])));
}

#[test]
fn test_slaves_over_mixed_values() {
    let mut registry = with_array("v", vec![-80.0, -60.0]);
    registry
        .register(ScalarParam::new(-70.0).unwrap().with_name("v_rest").unwrap())
        .unwrap();
    registry
        .register(
            SlaveParam::new(Expr::symbol("v") - Expr::symbol("v_rest"))
                .with_name("dv")
                .unwrap(),
        )
        .unwrap();

    let e = Expr::symbol("dv").pow(2);
    let value = eval_param_expr(&e, &registry, &EvalOptions::new()).unwrap();
    assert_eq!(value, EvalValue::from(Array1::from(vec![100.0, 100.0])));

    let err = eval_param_expr(&(Expr::symbol("dv") + Expr::symbol("w")), &registry, &EvalOptions::new())
        .unwrap_err();
    assert_eq!(
        err,
        EvalError::UnknownSymbol {
            name: "w".to_string()
        }
    );
}

struct Clock {
    t: EvalValue,
}

impl EvaluationContext for Clock {
    fn get_variable(&self, name: &str) -> Option<&EvalValue> {
        (name == "t").then_some(&self.t)
    }
}

#[test]
fn test_interpreter_with_custom_context() {
    let clock = Clock {
        t: EvalValue::Scalar(0.5),
    };
    assert!(clock.has_variable("t"));
    assert!(!clock.has_variable("x"));

    let interpreter = Interpreter::new(&clock, FunctionNamespace::Math);
    let v = interpreter.evaluate_code("2.0*t + math.cos(math.pi)").unwrap();
    assert_relative_eq!(v.as_f64().unwrap(), 0.0, epsilon = 1e-12);

    let err = interpreter.evaluate_code("math.sqrt(t, t)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn test_fractional_literals_survive_rendering() {
    init_logging();
    let registry = with_scalar("x", 1.0);
    let options = EvalOptions::new();

    let v = eval_param_expr(&parse_expr("x + 0.5").unwrap(), &registry, &options).unwrap();
    assert_eq!(v, EvalValue::Scalar(1.5));

    let v = eval_param_expr(&parse_expr("(x + 3)**0.5").unwrap(), &registry, &options).unwrap();
    assert_relative_eq!(v.as_f64().unwrap(), 2.0);

    let v = eval_param_expr(&parse_expr("(x + 3)**(-1/2)").unwrap(), &registry, &options).unwrap();
    assert_relative_eq!(v.as_f64().unwrap(), 0.5);

    let v = eval_param_expr(&parse_expr("x*2.25/3").unwrap(), &registry, &options).unwrap();
    assert_relative_eq!(v.as_f64().unwrap(), 0.75);
}

#[test]
fn test_slave_with_fractional_offset() {
    let mut registry = with_scalar("a", 2.0);
    registry
        .register(ArrayParam::new(vec![0.25, 1.75]).unwrap().with_name("b").unwrap())
        .unwrap();

    let shifted = SlaveParam::new(parse_expr("a + 0.5").unwrap());
    assert_eq!(shifted.value(&registry).unwrap(), EvalValue::Scalar(2.5));

    let mixed = SlaveParam::new(parse_expr("b*0.5 + a").unwrap());
    let value = mixed.value(&registry).unwrap();
    assert!(array_approx_eq(
        value.as_array().unwrap(),
        &[2.125, 2.875],
        1e-12
    ));
}
