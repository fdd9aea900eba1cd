//! Tests for building and querying expression trees

use modelparams_rs::expr::{Expr, NodeKind, Symbol};
use std::collections::HashMap;

#[test]
fn test_operator_overloads() {
    let x = Symbol::new("x");
    let y = Symbol::new("y");

    let e = (x.clone() + y.clone()) * 2;
    assert_eq!(e.kind(), NodeKind::Mul);
    assert_eq!(e.to_string(), "2*(x + y)");

    let e = x.clone() - y.clone();
    assert_eq!(e.kind(), NodeKind::Add);
    assert_eq!(e.to_string(), "x - y");

    let e = -Expr::from(x);
    assert!(e.has_minus_sign());
}

#[test]
fn test_queries() {
    let e = Expr::symbol("g") * (Expr::symbol("V") - Expr::symbol("E"));
    let names: Vec<String> = e.free_symbols().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["E", "V", "g"]);
    assert_eq!(e.args().len(), 2);
    assert!(!e.is_atom());
    assert!(Expr::symbol("g").is_atom());
}

#[test]
fn test_substitution() {
    let e = Expr::symbol("a") * Expr::symbol("b");
    let mut mapping = HashMap::new();
    mapping.insert(Symbol::new("b"), Expr::symbol("c") + 1);
    let substituted = e.subs(&mapping);
    assert_eq!(substituted.to_string(), "a*(c + 1)");
}

#[test]
fn test_piecewise_requires_default() {
    let x = Expr::symbol("x");
    assert!(Expr::piecewise(vec![(Expr::from(1), x.clone().lt(0))]).is_err());

    let pw = Expr::piecewise(vec![
        (Expr::from(1), x.clone().lt(0)),
        (x.clone(), Expr::from(true)),
    ])
    .unwrap();
    assert_eq!(pw.kind(), NodeKind::Piecewise);
}

#[test]
fn test_serde_round_trip() {
    let e = Expr::func("exp", vec![Expr::symbol("t").negated()]) / Expr::symbol("tau");
    let json = serde_json::to_string(&e).unwrap();
    let back: Expr = serde_json::from_str(&json).unwrap();
    assert_eq!(back, e);
}
