//! Tests for repr and from_repr

use modelparams_rs::expr::parse_expr;
use modelparams_rs::parameters::{
    from_repr, AnyParam, ArrayParam, ConstParam, OptionParam, Param, Parameter, ParameterError,
    Range, ReprOptions, ScalarParam, SlaveParam,
};

#[test]
fn test_repr_text() {
    assert_eq!(
        Param::new(45).with_name("jada").unwrap().repr(),
        "Param(45, name='jada')"
    );
    assert_eq!(
        OptionParam::new(45, vec![45.into(), 56.into()])
            .unwrap()
            .with_name("bada")
            .unwrap()
            .repr(),
        "OptionParam(45, [45, 56], name='bada')"
    );
    assert_eq!(
        ScalarParam::new(1.0)
            .unwrap()
            .with_range(Range::new().ge(0.0))
            .unwrap()
            .with_unit("ms")
            .with_name("dt")
            .unwrap()
            .repr(),
        "ScalarParam(1.0, ge=0.0, unit='ms', name='dt')"
    );
    assert_eq!(
        ArrayParam::with_size(1.5, 3).unwrap().repr(),
        "ArrayParam([1.5, 1.5, 1.5])"
    );
}

#[test]
fn test_repr_options() {
    let p = ScalarParam::new(2.0)
        .unwrap()
        .with_range(Range::new().le(5.0))
        .unwrap()
        .with_unit("mV")
        .with_name("v")
        .unwrap()
        .with_description("voltage");

    let bare = p.repr_with(ReprOptions {
        checkarg: false,
        name: false,
        description: false,
        unit: false,
    });
    assert_eq!(bare, "ScalarParam(2.0)");
}

#[test]
fn test_round_trips() {
    let originals = vec![
        AnyParam::Param(Param::new("text").with_name("label").unwrap()),
        AnyParam::Param(Param::new(true)),
        AnyParam::Option(
            OptionParam::new(1.5, vec![1.5.into(), 2.5.into()])
                .unwrap()
                .with_description("choice"),
        ),
        AnyParam::Const(ConstParam::new(7).with_name("seven").unwrap()),
        AnyParam::Scalar(
            ScalarParam::new(-77.0)
                .unwrap()
                .with_range(Range::new().gt(-100.0).lt(0.0))
                .unwrap()
                .with_unit("mV")
                .with_name("E_K")
                .unwrap(),
        ),
        AnyParam::Array(
            ArrayParam::new(vec![0.1, 0.2, 0.3, 0.4, 0.5])
                .unwrap()
                .with_range(Range::new().ge(0.0).le(1.0))
                .unwrap(),
        ),
        AnyParam::Slave(
            SlaveParam::new(parse_expr("g*(V - E_K)").unwrap())
                .with_unit("uA")
                .with_name("I")
                .unwrap(),
        ),
    ];

    for original in originals {
        let text = original.repr();
        assert_eq!(from_repr(&text).unwrap(), original, "round trip of {}", text);
    }
}

#[test]
fn test_malformed_repr() {
    for text in [
        "ScalarParam",
        "ScalarParam(1.0",
        "Unknown(1)",
        "ScalarParam('x')",
        "ScalarParam(name='x', 1.0)",
    ] {
        assert!(from_repr(text).is_err(), "accepted {}", text);
    }
    assert!(matches!(
        from_repr("Unknown(1)"),
        Err(ParameterError::Repr { .. })
    ));
}
