//! Tests for rendering expressions in every dialect

use modelparams_rs::expr::{parse_expr, Expr};
use modelparams_rs::printer::{
    ccode, cppcode, matlabcode, octavecode, pythoncode, render, sympycode, Dialect, Printer,
    RenderError,
};

fn step() -> Expr {
    parse_expr("Piecewise((1, x < 0), (x**2, True))").unwrap()
}

#[test]
fn test_step_function_per_dialect() {
    let e = step();
    assert_eq!(ccode(&e, None).unwrap(), "(x < 0 ? 1.0 : (x)*(x))");
    assert_eq!(cppcode(&e, None).unwrap(), "(x < 0 ? 1.0 : (x)*(x))");
    assert_eq!(pythoncode(&e, None, "math").unwrap(), "1.0 if x < 0 else x*x");
    assert_eq!(pythoncode(&e, None, "np").unwrap(), "1.0 if np.all(x < 0) else x*x");
    assert_eq!(pythoncode(&e, None, "numpy").unwrap(), "1.0 if numpy.all(x < 0) else x*x");
    assert_eq!(
        pythoncode(&e, None, "ufl").unwrap(),
        "ufl.conditional(ufl.lt(x, 0), 1.0, x*x)"
    );
    assert_eq!(matlabcode(&e, None).unwrap(), "((x < 0)*(1) + (1 - (x < 0))*(x*x))");
    assert_eq!(octavecode(&e, None).unwrap(), matlabcode(&e, None).unwrap());
    assert_eq!(sympycode(&e).unwrap(), "Piecewise((1, x < 0), (x**2, True))");
}

#[test]
fn test_square_roots() {
    let e = parse_expr("x**0.5").unwrap();
    for (dialect, expected) in [
        ("c", "sqrt(x)"),
        ("cpp", "std::sqrt(x)"),
        ("", "sqrt(x)"),
        ("math", "math.sqrt(x)"),
        ("np", "np.sqrt(x)"),
        ("ufl", "ufl.sqrt(x)"),
        ("matlab", "sqrt(x)"),
    ] {
        assert_eq!(render(&e, dialect, None).unwrap(), expected, "dialect {:?}", dialect);
    }
}

#[test]
fn test_reciprocal_square_roots() {
    let e = parse_expr("x**(-1/2)").unwrap();
    for (dialect, expected) in [
        ("c", "1/sqrt(x)"),
        ("cpp", "1/std::sqrt(x)"),
        ("", "1/sqrt(x)"),
        ("math", "1/math.sqrt(x)"),
        ("np", "1/np.sqrt(x)"),
        ("ufl", "1/ufl.sqrt(x)"),
        ("matlab", "1/sqrt(x)"),
    ] {
        assert_eq!(render(&e, dialect, None).unwrap(), expected, "dialect {:?}", dialect);
    }
    assert_eq!(sympycode(&e).unwrap(), "x**(-1/2)");
}

#[test]
fn test_assignment_has_no_terminator() {
    let e = parse_expr("a + 0.5").unwrap();
    for (dialect, expected) in [
        ("c", "y = a + 0.5"),
        ("cpp", "y = a + 0.5"),
        ("python", "y = a + 0.5"),
        ("math", "y = a + 0.5"),
        ("matlab", "y = a + 0.5"),
        ("octave", "y = a + 0.5"),
    ] {
        assert_eq!(render(&e, dialect, Some("y")).unwrap(), expected, "dialect {:?}", dialect);
    }
}

#[test]
fn test_parenthesization() {
    assert_eq!(ccode(&parse_expr("(a + b)*c").unwrap(), None).unwrap(), "(a + b)*c");
    assert_eq!(ccode(&parse_expr("a*b + c").unwrap(), None).unwrap(), "a*b + c");
    assert_eq!(
        pythoncode(&parse_expr("(a + b)*c").unwrap(), None, "math").unwrap(),
        "(a + b)*c"
    );
}

#[test]
fn test_assignments() {
    let e = parse_expr("g*(V - E_K)").unwrap();
    assert_eq!(ccode(&e, Some("I")).unwrap(), "I = g*(V - E_K)");
    assert_eq!(pythoncode(&e, Some("I"), "np").unwrap(), "I = g*(V - E_K)");
    assert_eq!(matlabcode(&e, Some("I")).unwrap(), "I = g*(V - E_K)");
}

#[test]
fn test_unknown_dialect() {
    assert!(matches!(
        Dialect::from_name("fortran"),
        Err(RenderError::UnknownDialect(_))
    ));
    assert!(Printer::for_dialect("cpp").is_ok());
}

#[test]
fn test_unrenderable_nodes() {
    let e = parse_expr("a < 1 and b < 2 and c < 3").unwrap();
    let err = pythoncode(&e, None, "ufl").unwrap_err();
    assert!(matches!(err, RenderError::Unsupported { .. }));
    let err: modelparams_rs::ModelParamsError = err.into();
    assert_eq!(err.kind(), modelparams_rs::ErrorKind::ValueError);
}
