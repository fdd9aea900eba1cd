//! A potassium current over a voltage sweep, wired through the registry
//!
//! Exercises the registry, a derived parameter, the printers and the
//! evaluator together the way model code uses them.

use approx::assert_relative_eq;
use ndarray::Array1;

use modelparams_rs::eval::{eval_param_expr, EvalOptions, EvalValue};
use modelparams_rs::expr::{Expr, Symbol};
use modelparams_rs::parameters::{
    from_repr, AnyParam, ArrayParam, Parameter, Range, RegisteredParam, ScalarParam, SlaveParam,
    SymbolRegistry,
};
use modelparams_rs::printer::{ccode, matlabcode, pythoncode};
use modelparams_rs::{ErrorKind, ModelParamsError};

use crate::test_helpers::{array_approx_eq, init_logging};

struct Model {
    registry: SymbolRegistry,
    current: SlaveParam,
}

fn build_model() -> Result<Model, ModelParamsError> {
    let mut registry = SymbolRegistry::new();
    let g_k = registry.register(
        ScalarParam::new(0.36)?
            .with_range(Range::new().ge(0.0))?
            .with_unit("mS")
            .with_name("g_K")?
            .with_description("potassium conductance"),
    )?;
    let e_k = registry.register(
        ScalarParam::new(-77.0)?
            .with_unit("mV")
            .with_name("E_K")?,
    )?;
    let v = registry.register(
        ArrayParam::new(vec![-77.0, -65.0, 0.0])?
            .with_unit("mV")
            .with_name("V")?,
    )?;

    let current = SlaveParam::new(g_k * (v - e_k))
        .with_unit("uA")
        .with_name("I_K")?;
    registry.register(current.clone())?;
    Ok(Model { registry, current })
}

#[test]
fn test_generated_code() {
    let model = build_model().unwrap();
    let expr = model.current.expr();

    assert_eq!(ccode(expr, Some("I_K")).unwrap(), "I_K = g_K*(V - E_K)");
    assert_eq!(pythoncode(expr, Some("I_K"), "np").unwrap(), "I_K = g_K*(V - E_K)");
    assert_eq!(matlabcode(expr, Some("I_K")).unwrap(), "I_K = g_K*(V - E_K)");
}

#[test]
fn test_current_follows_parameters() {
    init_logging();
    let mut model = build_model().unwrap();

    let value = model.current.value(&model.registry).unwrap();
    assert!(array_approx_eq(value.as_array().unwrap(), &[0.0, 4.32, 27.72], 1e-9));

    // Updates are seen on the next read
    model.registry.set_value("g_K", 0.5).unwrap();
    model.registry.set_value("V", Array1::from(vec![-87.0, 23.0])).unwrap_err();
    model.registry.set_value("V", -57.0).unwrap();
    let value = model.registry.value_of("I_K").unwrap();
    assert!(array_approx_eq(value.as_array().unwrap(), &[10.0, 10.0, 10.0], 1e-9));

    // Range checks still guard the inputs
    let err: ModelParamsError = model.registry.set_value("g_K", -0.1).unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::ValueError);
    let err: ModelParamsError = model.registry.set_value("I_K", 1.0).unwrap_err().into();
    assert_eq!(err.kind(), ErrorKind::TypeError);
}

#[test]
fn test_membrane_equation_with_derivative() {
    let mut model = build_model().unwrap();
    model
        .registry
        .register(ScalarParam::new(1.0).unwrap().with_unit("uF").with_name("C_m").unwrap())
        .unwrap();

    // C_m*dV/dt + I_K is zero on the model's trajectory
    let dv_dt = Expr::derivative(Symbol::new("V"), Symbol::new("t"));
    let balance = Expr::symbol("C_m") * dv_dt.clone() + Expr::symbol("I_K");
    assert_eq!(ccode(&dv_dt, None).unwrap(), "dV_dt");

    let rates = Array1::from(vec![0.0, -4.32, -27.72]);
    let options = EvalOptions::new()
        .include_derivatives(true)
        .with_value("dV_dt", rates);
    let residual = eval_param_expr(&balance, &model.registry, &options).unwrap();
    for r in residual.as_array().unwrap() {
        assert_relative_eq!(*r, 0.0, epsilon = 1e-9);
    }
}

#[test]
fn test_scalar_sweep_uses_math_namespace() {
    let model = build_model().unwrap();
    let options = EvalOptions::new().with_value("V", -50.0);
    let value = eval_param_expr(model.current.expr(), &model.registry, &options).unwrap();
    assert!(matches!(value, EvalValue::Scalar(_)));
    assert_relative_eq!(value.as_f64().unwrap(), 0.36 * 27.0, epsilon = 1e-9);
}

#[test]
fn test_model_persistence() {
    let model = build_model().unwrap();

    let json = model.registry.to_json().unwrap();
    let loaded = SymbolRegistry::from_json(&json).unwrap();
    assert_eq!(loaded, model.registry);
    match loaded.get("g_K") {
        Some(RegisteredParam::Scalar(g)) => {
            assert_eq!(g.description(), "potassium conductance");
            assert_eq!(g.unit(), "mS");
        }
        other => panic!("expected a scalar parameter, got {:?}", other),
    }
    assert_eq!(
        loaded.value_of("I_K").unwrap(),
        model.registry.value_of("I_K").unwrap()
    );

    let repr = model.current.repr();
    assert_eq!(repr, "SlaveParam(g_K*(V - E_K), unit='uA', name='I_K')");
    assert_eq!(from_repr(&repr).unwrap(), AnyParam::Slave(model.current.clone()));
}
