//! Tests for unit parsing, conversion and unit-aware arithmetic

use approx::assert_relative_eq;
use modelparams_rs::parameters::{ArrayParam, Range, ScalarParam};
use modelparams_rs::units::{Unit, UnitError};
use modelparams_rs::{ErrorKind, ModelParamsError};

use crate::test_helpers::{array_approx_eq, init_logging};

fn quantity(value: f64, unit: &str) -> ScalarParam {
    ScalarParam::new(value).unwrap().with_unit(unit)
}

#[test]
fn test_ohms_law_in_physiological_units() {
    init_logging();
    let g = quantity(0.3, "mS");
    let v = quantity(-77.0, "mV");

    let current = (&g * &v).unwrap();
    assert_relative_eq!(current.value_f64(), -23.1, epsilon = 1e-12);
    assert_eq!(current.unit(), "mS*mV");

    let in_micro_amps = current.convert_to("uA").unwrap();
    assert_relative_eq!(in_micro_amps.value_f64(), -23.1, epsilon = 1e-9);
    assert!(current.convert_to("mV").is_err());
}

#[test]
fn test_mixed_units_are_aligned_to_lhs() {
    init_logging();
    let sum = (&quantity(2.0, "ms") + &quantity(1.0, "s")).unwrap();
    assert_relative_eq!(sum.value_f64(), 1002.0);
    assert_eq!(sum.unit(), "ms");

    let err = (&quantity(1.0, "mV") - &quantity(1.0, "ms")).unwrap_err();
    assert!(matches!(err, UnitError::Dimensionality { .. }));

    let err: ModelParamsError = err.into();
    assert_eq!(err.kind(), ErrorKind::ValueError);
}

#[test]
fn test_results_are_plain_parameters() {
    let dt = ScalarParam::new(0.5)
        .unwrap()
        .with_range(Range::new().gt(0.0))
        .unwrap()
        .with_unit("ms")
        .with_name("dt")
        .unwrap();

    // The result keeps neither name nor range
    let mut doubled = (2.0 * &dt).unwrap();
    assert_eq!(doubled.unit(), "ms");
    assert!(doubled.sym().is_dummy());
    assert!(doubled.set_value(-1.0).is_ok());
}

#[test]
fn test_power_and_exponent_units() {
    let area = quantity(3.0, "um").pow(&2.0).unwrap();
    assert_relative_eq!(area.value_f64(), 9.0);
    assert_eq!(area.unit(), "um**2");

    let side = area.pow(&0.5).unwrap();
    assert_relative_eq!(side.value_f64(), 3.0);
    assert_eq!(side.unit(), "um");

    let err = quantity(2.0, "1").pow(&quantity(2.0, "s")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);
}

#[test]
fn test_update_converts_into_own_unit() {
    let mut v = quantity(-65.0, "mV");
    v.update(&quantity(-0.07, "V")).unwrap();
    assert_relative_eq!(v.value_f64(), -70.0, epsilon = 1e-9);

    // A dimensionless source is taken as given
    v.update(&quantity(-60.0, "1")).unwrap();
    assert_relative_eq!(v.value_f64(), -60.0);

    assert!(v.update(&quantity(1.0, "s")).is_err());
}

#[test]
fn test_array_quantities() {
    let conductances = ArrayParam::new(vec![0.1, 0.2, 0.4]).unwrap().with_unit("mS");
    let driving_force = quantity(10.0, "mV");

    let currents = (&conductances * &driving_force).unwrap();
    assert!(array_approx_eq(currents.values(), &[1.0, 2.0, 4.0], 1e-12));
    assert_eq!(currents.unit(), "mS*mV");

    let halved = (&conductances / 2.0).unwrap();
    assert!(array_approx_eq(halved.values(), &[0.05, 0.1, 0.2], 1e-12));

    let squared = conductances.pow(&2.0).unwrap();
    assert_eq!(squared.unit(), "mS**2");
}

#[test]
fn test_unit_strings() {
    let unit: Unit = "mmole/l".parse().unwrap();
    assert_eq!(unit.to_string(), "mmole*l**-1");
    let molar = Unit::parse("mM").unwrap();
    assert_relative_eq!(unit.conversion_factor_to(&molar).unwrap(), 1.0, epsilon = 1e-12);
}
