//! Tests for parsing expression text

use modelparams_rs::expr::{parse_expr, Expr, ExprError, NodeKind, Symbol};

#[test]
fn test_expression_parsing() {
    let e = parse_expr("42").unwrap();
    assert!(e.free_symbols().is_empty());

    let e = parse_expr("x + y").unwrap();
    assert_eq!(e.free_symbols().len(), 2);

    let e = parse_expr("2 * (x + 1)").unwrap();
    assert_eq!(e.kind(), NodeKind::Mul);
    assert_eq!(e.free_symbols().len(), 1);

    let e = parse_expr("x^2").unwrap();
    assert_eq!(e, Expr::symbol("x").pow(2));
}

#[test]
fn test_display_round_trip() {
    for text in [
        "a*b + c",
        "(a + b)*c",
        "Piecewise((1, x < 0), (x**2, True))",
        "exp(-t/tau)",
    ] {
        let e = parse_expr(text).unwrap();
        let again = parse_expr(&e.to_string()).unwrap();
        assert_eq!(again, e, "round trip of {}", text);
    }
}

#[test]
fn test_constructor_calls() {
    let e = parse_expr("Conditional(V > 0, 1, 0)").unwrap();
    assert_eq!(e.kind(), NodeKind::Piecewise);

    let e = parse_expr("ContinuousConditional(V > 0, 1, 0, 0.1)").unwrap();
    assert_eq!(e.kind(), NodeKind::Add);

    let e = parse_expr("Derivative(V, t)").unwrap();
    assert_eq!(e, Expr::derivative(Symbol::new("V"), Symbol::new("t")));
    assert_eq!(e.symbol_names(true), vec!["dV_dt"]);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(parse_expr("x +"), Err(ExprError::Parse { .. })));
    assert!(matches!(parse_expr("(x"), Err(ExprError::Parse { .. })));
    assert_eq!(
        parse_expr("Piecewise((1, x < 0))").unwrap_err(),
        ExprError::MissingDefault
    );
}
