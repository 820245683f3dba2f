use dice_calc::ops::{Divide, Join, Multiply, NegJoin, Negative, Power, Size, Sum};
use dice_calc::{parse, DResult, Expression, Session, Value};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn literal() -> impl Strategy<Value = Expression> {
    prop_oneof![
        (0u32..1000).prop_map(|x| Expression::literal(x)),
        (0u32..400).prop_map(|x| Expression::literal(x as f64 / 4.0)),
    ]
}

/// Expression trees without random operators, so evaluation is repeatable.
fn expression() -> impl Strategy<Value = Expression> {
    let leaf = prop_oneof![
        4 => literal(),
        1 => "[a-z \"\\\\]{0,6}".prop_map(Expression::Str),
    ];
    leaf.prop_recursive(4, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Expression::List),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::binary(l, Join, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::binary(l, NegJoin, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::binary(l, Multiply, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::binary(l, Divide, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::binary(l, Power, r)),
            inner.clone().prop_map(|r| Expression::prefix(Negative, r)),
            inner.clone().prop_map(|r| Expression::prefix(Size, r)),
            inner.prop_map(|r| Expression::prefix(Sum, r)),
        ]
    })
}

fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        (-1000i32..1000).prop_map(|x| Value::from(x as f64)),
        "[a-z]{0,4}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::List)
    })
}

fn numeric_list() -> impl Strategy<Value = Value> {
    let leaf = (-1000i32..1000).prop_map(|x| Value::from(x as f64 / 8.0));
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Value::List)
    })
}

/// Division by zero and overflow are errors, so generated trees may fail.
fn evaluate(expr: Expression) -> DResult<Value> {
    let mut session = Session::with_roller(StdRng::seed_from_u64(0));
    session.evaluate_expression(expr).map(|eval| eval.value)
}

proptest! {
    #[test]
    fn parse_round_trip(expr in expression()) {
        let code = expr.to_code();
        let parsed = parse(&code).unwrap();
        prop_assert_eq!(&parsed, &expr);
        prop_assert_eq!(parsed.to_code(), code);
    }

    #[test]
    fn evaluate_round_trip(expr in expression()) {
        let value = match evaluate(expr) {
            Ok(value) => value,
            Err(_) => return Ok(()),
        };
        prop_assert!(value.is_finite());
        let again = evaluate(parse(&value.to_code()).unwrap()).unwrap();
        prop_assert_eq!(again.to_code(), value.to_code());
    }

    #[test]
    fn coercion_laws(x in value()) {
        let list = Value::List(x.as_list());
        prop_assert_eq!(list.as_single().value, x.as_single().value);
        prop_assert_eq!(list.as_list(), x.as_list());
    }

    #[test]
    fn negation_is_involutive(x in numeric_list()) {
        prop_assert_eq!(x.negate().negate(), x);
    }

    #[test]
    fn shuffle_preserves_items(items in prop::collection::vec(0u32..50, 0..20), seed: u64) {
        let list = Expression::List(items.iter().map(|&x| Expression::literal(x)).collect());
        let mut session = Session::with_roller(StdRng::seed_from_u64(seed));
        let shuffled = session
            .evaluate(&format!("{}?", list.to_code()))
            .unwrap()
            .value;

        let mut got: Vec<u32> = shuffled
            .as_list()
            .iter()
            .map(|v| v.as_single().value as u32)
            .collect();
        let mut expected = items.clone();
        got.sort_unstable();
        expected.sort_unstable();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn size_counts_top_level_items(items in prop::collection::vec(expression(), 0..6)) {
        let n = items.len();
        if let Ok(value) = evaluate(Expression::prefix(Size, Expression::List(items))) {
            prop_assert_eq!(value, Value::from(n as f64));
        }
    }
}
